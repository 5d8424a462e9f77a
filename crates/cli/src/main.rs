//! Leadline CLI: the main entry point.
//!
//! Commands:
//! - `onboard`      Create config, FAQ, and data directory
//! - `bridge`       Serve one conversation's tool calls over stdin/stdout
//! - `leads`        Inspect the lead store
//! - `faq`          Print the knowledge base
//! - `instructions` Print the consultant instructions
//! - `tools`        Print tool definitions for the runtime
//! - `config`       Show or validate configuration
//! - `status`       Show system status
//! - `doctor`       Diagnose system health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "leadline",
    about = "Leadline — lead capture for conversational sales assistants",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration, FAQ, and data directory
    Onboard,

    /// Handle one conversation's tool calls as JSON lines on stdin/stdout
    Bridge {
        /// Session id assigned by the runtime (e.g. the room name)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Inspect saved leads
    Leads {
        #[command(subcommand)]
        action: LeadsAction,
    },

    /// Print the knowledge base
    Faq,

    /// Print the consultant instructions
    Instructions,

    /// Print tool definitions as JSON
    Tools,

    /// Show or validate configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show system status
    Status,

    /// Diagnose system health
    Doctor,
}

#[derive(Subcommand)]
enum LeadsAction {
    /// List saved leads, oldest first
    List {
        /// Only show the newest N leads
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only show qualified leads
        #[arg(short, long)]
        qualified: bool,
    },

    /// Count saved leads
    Count,

    /// Copy all saved leads to a JSON file
    Export {
        /// Output file path
        output: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to command output and the bridge protocol.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Bridge { session } => commands::bridge::run(session).await?,
        Commands::Leads { action } => match action {
            LeadsAction::List { limit, qualified } => commands::leads::list(limit, qualified).await?,
            LeadsAction::Count => commands::leads::count().await?,
            LeadsAction::Export { output } => commands::leads::export(&output).await?,
        },
        Commands::Faq => commands::knowledge::faq().await?,
        Commands::Instructions => commands::knowledge::instructions().await?,
        Commands::Tools => commands::bridge::tools().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
