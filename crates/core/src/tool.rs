//! Tool trait: the function-call surface the conversational runtime drives.
//!
//! The runtime's reasoning step decides when to call a tool (record a fact,
//! look something up, wrap up the call). Each call runs against the calling
//! conversation's [`SessionState`], which the caller owns exclusively.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ToolError;
use crate::session::SessionState;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the runtime's function call id)
    #[serde(default)]
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool did what was asked
    pub success: bool,

    /// Text handed back to the runtime (often spoken to the user)
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            call_id: String::new(),
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(output)
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A tool description in the shape function-calling runtimes expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The core Tool trait.
///
/// Tools are registered once and shared by every session; per-conversation
/// data lives in the `SessionState` passed to `execute`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "update_lead_profile").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the runtime).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool against one session with the given arguments.
    async fn execute(
        &self,
        session: &mut SessionState,
        arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for the runtime.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// Sessions use this to:
/// 1. Get tool definitions to hand to the runtime
/// 2. Look up and execute tools when the runtime requests them
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool call against a session. The result carries the call's id.
    pub async fn execute(
        &self,
        session: &mut SessionState,
        call: &ToolCall,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        let mut result = tool.execute(session, call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::LeadField;
    use crate::lead::LeadPatch;

    /// Records the caller's name on the session, for unit tests.
    struct NameTool;

    #[async_trait]
    impl Tool for NameTool {
        fn name(&self) -> &str { "set_name" }
        fn description(&self) -> &str { "Stores the prospect's name" }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" }
                },
                "required": ["name"]
            })
        }
        async fn execute(
            &self,
            session: &mut SessionState,
            arguments: serde_json::Value,
        ) -> Result<ToolResult, ToolError> {
            let name = arguments["name"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidArguments("Missing 'name' argument".into()))?;
            session.update(&LeadPatch::new().with(LeadField::Name, name));
            Ok(ToolResult::ok(format!("Hello {name}")))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NameTool));
        assert!(registry.get("set_name").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NameTool));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "set_name");
    }

    #[tokio::test]
    async fn registry_execute_mutates_session() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NameTool));
        let mut session = SessionState::new();

        let call = ToolCall {
            id: "call_1".into(),
            name: "set_name".into(),
            arguments: serde_json::json!({"name": "Alex"}),
        };
        let result = registry.execute(&mut session, &call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.call_id, "call_1");
        assert_eq!(result.output, "Hello Alex");
        assert_eq!(session.profile().name.as_deref(), Some("Alex"));
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let mut session = SessionState::new();
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&mut session, &call).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[test]
    fn tool_call_arguments_default_to_null() {
        let call: ToolCall = serde_json::from_str(r#"{"name": "submit_lead_and_end"}"#).unwrap();
        assert!(call.id.is_empty());
        assert!(call.arguments.is_null());
    }
}
