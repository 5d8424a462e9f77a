//! `leadline config`: Configuration management commands.

use leadline_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if !config.store.allow_unqualified_commit {
                warnings.push("Unqualified leads will not be saved (allow_unqualified_commit = false)");
            }

            if config.store.lock_timeout_ms < 100 {
                warnings.push("store.lock_timeout_ms below 100ms may drop leads under load");
            }

            if config.store.path.extension().is_none_or(|e| e != "json") {
                warnings.push("store.path does not end in .json");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Store:     {}", config.store.path.display());
            println!("   FAQ:       {}", config.knowledge.faq_path.display());
            println!(
                "   Persona:   {} ({}, {})",
                config.persona.agent_name, config.persona.role, config.persona.company
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn config_path_is_valid() {
        let path = leadline_config::AppConfig::config_path();
        assert!(path.to_str().unwrap().contains("config.toml"));
    }
}
