//! `leadline doctor`: Diagnose system health.

use leadline_config::{AppConfig, KnowledgeBase};
use leadline_core::store::LeadStore;

use super::open_store;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Leadline Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let config = if AppConfig::config_path().exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                println!("\n  ⚠️  1 issue(s) found. Fix the config before other checks can run.");
                return Ok(());
            }
        }
    } else {
        println!("  ⚠️  No config file — using defaults (run `leadline onboard`)");
        issues += 1;
        AppConfig::default()
    };

    // Lead store
    let store = open_store(&config);
    match store.load().await {
        Ok(records) if config.store.path.exists() => {
            println!("  ✅ Lead store readable ({} leads)", records.len());
        }
        Ok(_) => println!("  ✅ Lead store will be created on the first saved lead"),
        Err(e) if e.is_malformed() => {
            println!("  ❌ Lead store is malformed: {e}");
            println!("     The next saved lead replaces it. Back it up first.");
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Lead store not accessible: {e}");
            issues += 1;
        }
    }

    // Knowledge base
    if config.knowledge.faq_path.exists() {
        match KnowledgeBase::try_load_or_init(&config.knowledge.faq_path) {
            Ok(kb) if kb.is_empty() => {
                println!("  ⚠️  FAQ is empty");
                issues += 1;
            }
            Ok(kb) => println!("  ✅ FAQ loaded ({} entries)", kb.len()),
            Err(e) => {
                println!("  ❌ FAQ unreadable: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  No FAQ file — defaults are written on first use");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
