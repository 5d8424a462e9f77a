//! `leadline onboard`: First-time setup.

use leadline_config::{AppConfig, KnowledgeBase};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🚴 Leadline — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let faq_existed = config.knowledge.faq_path.exists();
    let kb = KnowledgeBase::try_load_or_init(&config.knowledge.faq_path)?;
    if faq_existed {
        println!("  FAQ exists: {} ({} entries)", config.knowledge.faq_path.display(), kb.len());
    } else {
        println!("✅ Created FAQ with {} default entries: {}", kb.len(), config.knowledge.faq_path.display());
    }

    if let Some(parent) = config.store.path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
        println!("✅ Created lead store directory: {}", parent.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Edit {} to set your persona and store path", config_path.display());
    println!("   2. Point your voice runtime at: leadline bridge");
    println!("   3. Review captured leads with: leadline leads list\n");

    println!("🎉 Setup complete!\n");

    Ok(())
}
