//! Subcommand implementations.

pub mod bridge;
pub mod config_cmd;
pub mod doctor;
pub mod knowledge;
pub mod leads;
pub mod onboard;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use leadline_config::{AppConfig, KnowledgeBase};
use leadline_core::error::{Error, Result};
use leadline_core::tool::ToolRegistry;
use leadline_store::JsonFileLeadStore;

pub(crate) fn load_config() -> Result<AppConfig> {
    AppConfig::load().map_err(|e| Error::Config {
        message: e.to_string(),
    })
}

pub(crate) fn open_store(config: &AppConfig) -> JsonFileLeadStore {
    JsonFileLeadStore::new(config.store.path.clone())
        .with_lock_timeout(Duration::from_millis(config.store.lock_timeout_ms))
}

/// The tool registry every session of this process shares.
pub(crate) fn build_registry(config: &AppConfig) -> Arc<ToolRegistry> {
    let store = Arc::new(open_store(config));
    let knowledge = KnowledgeBase::shared(&config.knowledge.faq_path);
    Arc::new(leadline_tools::default_registry(
        store,
        knowledge,
        config.store.allow_unqualified_commit,
    ))
}
