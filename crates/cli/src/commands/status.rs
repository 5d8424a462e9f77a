//! `leadline status`: Show system status.

use leadline_config::AppConfig;
use leadline_core::store::LeadStore;

use super::{load_config, open_store};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config);

    println!("🚴 Leadline Status");
    println!("==================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Lead store:    {}", config.store.path.display());
    println!("  Lock timeout:  {}ms", config.store.lock_timeout_ms);
    println!(
        "  Partial leads: {}",
        if config.store.allow_unqualified_commit { "saved" } else { "refused" }
    );
    println!("  FAQ:           {}", config.knowledge.faq_path.display());
    println!(
        "  Persona:       {}, {} at {}",
        config.persona.agent_name, config.persona.role, config.persona.company
    );

    match store.count().await {
        Ok(n) => println!("  Leads saved:   {n}"),
        Err(e) => println!("  Leads saved:   unavailable ({e})"),
    }

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `leadline onboard` first");
    }

    Ok(())
}
