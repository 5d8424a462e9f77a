//! One conversation's view of the lead capture tools.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use leadline_core::lead::LeadProfile;
use leadline_core::session::{SessionId, SessionState};
use leadline_core::tool::{ToolCall, ToolDefinition, ToolRegistry, ToolResult};
use tracing::{debug, info, warn};

/// Binds a [`SessionState`] to the shared tool registry.
///
/// Calls are handled one at a time, in the order the runtime makes them.
pub struct LeadSession {
    state: SessionState,
    tools: Arc<ToolRegistry>,
    calls_handled: u64,
}

impl LeadSession {
    /// Start a conversation with an empty lead profile.
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self::with_state(tools, SessionState::new())
    }

    /// Start a conversation under a runtime-assigned id (e.g. the room name).
    pub fn with_id(tools: Arc<ToolRegistry>, id: SessionId) -> Self {
        Self::with_state(tools, SessionState::with_id(id))
    }

    fn with_state(tools: Arc<ToolRegistry>, state: SessionState) -> Self {
        info!(session = %state.id(), "Session started");
        Self {
            state,
            tools,
            calls_handled: 0,
        }
    }

    pub fn id(&self) -> &SessionId {
        self.state.id()
    }

    pub fn profile(&self) -> &LeadProfile {
        self.state.profile()
    }

    pub fn is_qualified(&self) -> bool {
        self.state.profile().is_qualified()
    }

    pub fn is_committed(&self) -> bool {
        self.state.is_committed()
    }

    /// Tool definitions to hand to the runtime's language model.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    /// Run one tool call.
    ///
    /// Tool errors (unknown tool, bad arguments) are reported back as an
    /// unsuccessful result so the runtime can recover; they never end the session.
    pub async fn handle(&mut self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        self.calls_handled += 1;

        let result = match self.tools.execute(&mut self.state, call).await {
            Ok(result) => result,
            Err(e) => {
                warn!(session = %self.state.id(), tool = %call.name, error = %e, "Tool call failed");
                ToolResult {
                    call_id: call.id.clone(),
                    success: false,
                    output: format!("Error: {e}"),
                    data: None,
                }
            }
        };

        debug!(
            session = %self.state.id(),
            tool = %call.name,
            success = result.success,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tool call handled"
        );
        result
    }

    /// How long the conversation has been running.
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.state.started_at()
    }

    /// End the conversation. Nothing is persisted here.
    pub fn end(self) -> LeadProfile {
        let committed = self.state.is_committed();
        let calls = self.calls_handled;
        let duration_secs = self.elapsed().num_seconds();
        let id = self.state.id().clone();
        let profile = self.state.into_profile();

        if committed {
            info!(session = %id, calls, duration_secs, "Session ended, lead saved");
        } else {
            info!(
                session = %id,
                calls,
                duration_secs,
                fields_captured = profile.filled_count(),
                "Session ended without saving a lead"
            );
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_config::KnowledgeBase;
    use leadline_core::store::LeadStore;
    use leadline_store::InMemoryLeadStore;

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: format!("call_{name}"),
            name: name.into(),
            arguments,
        }
    }

    fn registry(store: Arc<InMemoryLeadStore>) -> Arc<ToolRegistry> {
        Arc::new(leadline_tools::default_registry(
            store,
            Arc::new(KnowledgeBase::builtin()),
            true,
        ))
    }

    #[tokio::test]
    async fn full_conversation_saves_one_lead() {
        let store = Arc::new(InMemoryLeadStore::new());
        let mut session = LeadSession::new(registry(store.clone()));

        session
            .handle(&call("update_lead_profile", serde_json::json!({"name": "Alex"})))
            .await;
        session
            .handle(&call("knowledge_base_query", serde_json::json!({"query": "fitting cost"})))
            .await;
        session
            .handle(&call(
                "update_lead_profile",
                serde_json::json!({"email": "a@x.com", "use_case": "Gravel Setup"}),
            ))
            .await;
        assert!(session.is_qualified());

        let result = session
            .handle(&call("submit_lead_and_end", serde_json::json!({})))
            .await;
        assert!(result.success);
        assert_eq!(result.call_id, "call_submit_lead_and_end");
        assert!(session.is_committed());

        let profile = session.end();
        assert_eq!(profile.email.as_deref(), Some("a@x.com"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn abandoned_session_persists_nothing() {
        let store = Arc::new(InMemoryLeadStore::new());
        let mut session = LeadSession::new(registry(store.clone()));
        session
            .handle(&call("update_lead_profile", serde_json::json!({"company": "Acme Club"})))
            .await;

        let profile = session.end();
        assert_eq!(profile.company.as_deref(), Some("Acme Club"));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[test]
    fn elapsed_counts_from_session_start() {
        let session = LeadSession::new(registry(Arc::new(InMemoryLeadStore::new())));
        let elapsed = session.elapsed();
        assert!(elapsed >= chrono::Duration::zero());
        assert!(elapsed < chrono::Duration::minutes(1));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_not_fatal() {
        let store = Arc::new(InMemoryLeadStore::new());
        let mut session = LeadSession::with_id(registry(store), SessionId::from("room-7"));

        let result = session
            .handle(&call("book_fitting", serde_json::json!({})))
            .await;
        assert!(!result.success);
        assert!(result.output.contains("book_fitting"));
        assert_eq!(session.id().to_string(), "room-7");
    }

    #[tokio::test]
    async fn sessions_sharing_a_registry_stay_isolated() {
        let store = Arc::new(InMemoryLeadStore::new());
        let tools = registry(store);
        let mut a = LeadSession::new(tools.clone());
        let b = LeadSession::new(tools);

        a.handle(&call("update_lead_profile", serde_json::json!({"name": "Alex"})))
            .await;
        assert_eq!(a.profile().name.as_deref(), Some("Alex"));
        assert!(b.profile().name.is_none());
        assert_eq!(a.tool_definitions().len(), 3);
    }
}
