//! `leadline leads`: Read-only views of the lead store.
//!
//! These never rewrite the store. A malformed store is reported to the
//! operator instead of being silently treated as empty.

use leadline_core::error::{Result, StoreError};
use leadline_core::lead::{LeadField, LeadRecord};
use leadline_core::store::LeadStore;

use super::{load_config, open_store};

async fn load_records() -> Result<Vec<LeadRecord>> {
    let config = load_config()?;
    let store = open_store(&config);
    match store.load().await {
        Ok(records) => Ok(records),
        Err(e @ StoreError::MalformedData { .. }) => {
            println!("❌ {e}");
            println!("   The next saved lead will start a new file and discard this content.");
            println!("   Back it up now if it matters.");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list(limit: Option<usize>, qualified_only: bool) -> Result<()> {
    let records = load_records().await?;
    let selected: Vec<&LeadRecord> = records
        .iter()
        .filter(|r| !qualified_only || r.profile.is_qualified())
        .collect();
    let skip = limit.map_or(0, |n| selected.len().saturating_sub(n));

    if selected.is_empty() {
        println!("📭 No leads saved yet.");
        return Ok(());
    }

    println!("📇 Leads ({} shown of {})", selected.len() - skip, records.len());
    println!("=======================");
    for record in selected.iter().skip(skip) {
        let marker = if record.profile.is_qualified() { "✅" } else { "⚪" };
        println!(
            "{marker} {}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.profile.get(LeadField::Name).unwrap_or("(no name)")
        );
        for field in LeadField::ALL.into_iter().skip(1) {
            if let Some(value) = record.profile.get(field) {
                println!("     {:<10} {value}", field.as_str());
            }
        }
    }

    Ok(())
}

pub async fn count() -> Result<()> {
    let records = load_records().await?;
    let qualified = records.iter().filter(|r| r.profile.is_qualified()).count();
    println!("{} leads ({} qualified)", records.len(), qualified);
    Ok(())
}

pub async fn export(output: &str) -> Result<()> {
    let records = load_records().await?;
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(output, &json)?;
    println!("📤 Exported {} leads to {output}", records.len());
    Ok(())
}
