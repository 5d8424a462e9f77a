//! Submit tool: saves the lead and hands back the closing remark.
//!
//! Called once, when the prospect is wrapping up. Store failures never end the
//! conversation: the runtime gets an apology to speak instead.

use async_trait::async_trait;
use leadline_core::error::ToolError;
use leadline_core::session::SessionState;
use leadline_core::store::LeadStore;
use leadline_core::tool::{Tool, ToolResult};
use std::sync::Arc;
use tracing::{error, info};

/// Spoken when the lead could not be saved.
pub const STORE_FAILURE_APOLOGY: &str = "I'm sorry, I wasn't able to save your details just now. A member of our team will follow up with you. Thanks for calling, goodbye!";

pub struct SubmitLeadTool {
    store: Arc<dyn LeadStore>,
    allow_unqualified: bool,
}

impl SubmitLeadTool {
    /// Partial (unqualified) leads are saved too.
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self {
            store,
            allow_unqualified: true,
        }
    }

    /// Whether leads missing name, email, or use case may be saved.
    pub fn allow_unqualified(mut self, allow: bool) -> Self {
        self.allow_unqualified = allow;
        self
    }
}

#[async_trait]
impl Tool for SubmitLeadTool {
    fn name(&self) -> &str {
        "submit_lead_and_end"
    }

    fn description(&self) -> &str {
        "Saves the lead to the database and signals the end of the call. Call this when the user says goodbye or 'that's all'. Speak the returned text to the user."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        session: &mut SessionState,
        _arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        if let Some(at) = session.committed_at() {
            return Ok(ToolResult::failed(
                "This lead was already saved. Say goodbye to the customer.",
            )
            .with_data(serde_json::json!({ "committed_at": at })));
        }

        let profile = session.profile();
        let missing = profile.missing_required();
        if !self.allow_unqualified && !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
            info!(session = %session.id(), missing = ?names, "Refusing to save unqualified lead");
            return Ok(ToolResult::failed(format!(
                "Lead not saved yet. Still missing: {}. Ask for these before ending the call.",
                names.join(", ")
            ))
            .with_data(serde_json::json!({ "missing_required": names })));
        }

        match self.store.commit(profile).await {
            Ok(record) => {
                let summary = profile.closing_summary();
                let qualified = profile.is_qualified();
                session.mark_committed(record.timestamp);
                info!(
                    session = %session.id(),
                    store = self.store.name(),
                    qualified,
                    "Lead saved"
                );
                Ok(ToolResult::ok(summary).with_data(serde_json::json!({
                    "record": record,
                    "qualified": qualified,
                })))
            }
            Err(e) => {
                error!(session = %session.id(), error = %e, "Failed to save lead");
                Ok(ToolResult::failed(STORE_FAILURE_APOLOGY)
                    .with_data(serde_json::json!({ "error": e.to_string() })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::lead::{LeadField, LeadPatch};
    use leadline_store::{InMemoryLeadStore, JsonFileLeadStore};

    fn qualified_session() -> SessionState {
        let mut session = SessionState::new();
        session.update(
            &LeadPatch::new()
                .with(LeadField::Name, "Alex")
                .with(LeadField::Email, "a@x.com")
                .with(LeadField::UseCase, "Gravel Setup"),
        );
        session
    }

    #[tokio::test]
    async fn saves_lead_and_returns_summary() {
        let store = Arc::new(InMemoryLeadStore::new());
        let tool = SubmitLeadTool::new(store.clone());
        let mut session = qualified_session();

        let result = tool
            .execute(&mut session, serde_json::json!({}))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("Alex"));
        assert!(result.output.contains("Gravel Setup"));
        assert!(result.output.contains("a@x.com"));
        assert!(session.is_committed());

        let records = store.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].profile.name.as_deref(), Some("Alex"));
        assert!(records[0].profile.company.is_none());
    }

    #[tokio::test]
    async fn second_submit_does_not_append() {
        let store = Arc::new(InMemoryLeadStore::new());
        let tool = SubmitLeadTool::new(store.clone());
        let mut session = qualified_session();

        tool.execute(&mut session, serde_json::Value::Null).await.unwrap();
        let again = tool.execute(&mut session, serde_json::Value::Null).await.unwrap();

        assert!(!again.success);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unqualified_lead_saved_by_default() {
        let store = Arc::new(InMemoryLeadStore::new());
        let tool = SubmitLeadTool::new(store.clone());
        let mut session = SessionState::new();
        session.update(&LeadPatch::new().with(LeadField::Company, "Acme Club"));

        let result = tool.execute(&mut session, serde_json::Value::Null).await.unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["qualified"], false);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unqualified_lead_refused_when_disallowed() {
        let store = Arc::new(InMemoryLeadStore::new());
        let tool = SubmitLeadTool::new(store.clone()).allow_unqualified(false);
        let mut session = SessionState::new();
        session.update(&LeadPatch::new().with(LeadField::Name, "Alex"));

        let result = tool.execute(&mut session, serde_json::Value::Null).await.unwrap();

        assert!(!result.success);
        assert!(result.output.contains("email"));
        assert!(result.output.contains("use_case"));
        assert!(!session.is_committed());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn store_failure_becomes_apology() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = Arc::new(JsonFileLeadStore::new(blocker.join("leads_db.json")));
        let tool = SubmitLeadTool::new(store);
        let mut session = qualified_session();

        let result = tool.execute(&mut session, serde_json::Value::Null).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.output, STORE_FAILURE_APOLOGY);
        assert!(!session.is_committed());
    }
}
