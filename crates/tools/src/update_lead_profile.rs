//! Lead profile update tool: records facts the prospect mentions.

use async_trait::async_trait;
use leadline_core::error::ToolError;
use leadline_core::lead::LeadPatch;
use leadline_core::session::SessionState;
use leadline_core::tool::{Tool, ToolResult};
use tracing::debug;

pub struct UpdateLeadProfileTool;

#[async_trait]
impl Tool for UpdateLeadProfileTool {
    fn name(&self) -> &str {
        "update_lead_profile"
    }

    fn description(&self) -> &str {
        "Captures lead details the customer provides during the conversation. Only call this when the user explicitly provides information; pass only the fields you just learned."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Customer's name"
                },
                "company": {
                    "type": "string",
                    "description": "Customer's cycling club or current bike brand"
                },
                "email": {
                    "type": "string",
                    "description": "Customer's email address"
                },
                "role": {
                    "type": "string",
                    "description": "Customer's main riding category (e.g., weekend warrior, racer, commuter)"
                },
                "use_case": {
                    "type": "string",
                    "description": "What specific type of bike or service they are interested in (e.g., custom road bike, gravel wheels, performance coaching)"
                },
                "team_size": {
                    "type": "string",
                    "description": "Individual or size of their cycling team"
                },
                "timeline": {
                    "type": "string",
                    "description": "When they plan to acquire the bike/service (e.g., Spring 2026, Now, within 6 months)"
                }
            }
        })
    }

    async fn execute(
        &self,
        session: &mut SessionState,
        arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let patch: LeadPatch = match arguments {
            serde_json::Value::Null => LeadPatch::new(),
            serde_json::Value::Object(_) => serde_json::from_value(arguments)
                .map_err(|e| ToolError::InvalidArguments(format!("Bad lead fields: {e}")))?,
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "Expected an object of lead fields, got {other}"
                )));
            }
        };

        let written = session.update(&patch);
        let profile = session.profile();
        debug!(session = %session.id(), fields_written = written, "update_lead_profile");

        let missing: Vec<&str> = profile.missing_required().iter().map(|f| f.as_str()).collect();
        Ok(
            ToolResult::ok("Lead profile updated. Continue the conversation.").with_data(
                serde_json::json!({
                    "fields_written": written,
                    "profile": profile,
                    "qualified": profile.is_qualified(),
                    "missing_required": missing,
                }),
            ),
        )
    }
}
