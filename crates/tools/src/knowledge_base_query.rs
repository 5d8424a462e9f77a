//! Knowledge base query tool: looks up answers in the product FAQ.
//!
//! Matching is plain keyword overlap over the loaded FAQ; the runtime's
//! language model phrases the answer.

use async_trait::async_trait;
use leadline_config::KnowledgeBase;
use leadline_core::error::ToolError;
use leadline_core::session::SessionState;
use leadline_core::tool::{Tool, ToolResult};
use std::sync::Arc;

/// Said when nothing in the FAQ fits.
const NO_ANSWER: &str = "No FAQ entry matches. Say you'll check with our Master Builder and email the details; do not guess prices.";

pub struct KnowledgeBaseQueryTool {
    knowledge: Arc<KnowledgeBase>,
}

impl KnowledgeBaseQueryTool {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Tool for KnowledgeBaseQueryTool {
    fn name(&self) -> &str {
        "knowledge_base_query"
    }

    fn description(&self) -> &str {
        "Search the company FAQ for answers about bikes, fittings, pricing, financing, and lead times. Returns matching question/answer pairs sorted by relevance."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The customer's question or its key words"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default 3)",
                    "default": 3
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        _session: &mut SessionState,
        arguments: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let top_k = arguments["top_k"].as_u64().unwrap_or(3).clamp(1, 10) as usize;

        let matches = self.knowledge.search(query, top_k);
        if matches.is_empty() {
            return Ok(ToolResult::ok(NO_ANSWER).with_data(serde_json::json!([])));
        }

        let data = serde_json::to_value(&matches).map_err(|e| ToolError::ExecutionFailed {
            tool_name: self.name().to_string(),
            reason: e.to_string(),
        })?;
        let output = matches
            .iter()
            .map(|m| format!("Q: {}\nA: {}", m.question, m.answer))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ToolResult::ok(output).with_data(data))
    }
}
