//! `leadline faq` and `leadline instructions`: Print what the assistant knows.

use leadline_agent::Instructions;
use leadline_config::KnowledgeBase;

use super::load_config;

pub async fn faq() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let kb = KnowledgeBase::try_load_or_init(&config.knowledge.faq_path)?;

    println!("📘 FAQ ({} entries, {})", kb.len(), config.knowledge.faq_path.display());
    println!("=====");
    for (i, entry) in kb.entries().iter().enumerate() {
        println!("{:>2}. {}", i + 1, entry.question);
        println!("    {}", entry.answer);
    }

    Ok(())
}

pub async fn instructions() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let kb = KnowledgeBase::load_or_init(&config.knowledge.faq_path);
    println!("{}", Instructions::render(&config.persona, &kb));
    Ok(())
}
