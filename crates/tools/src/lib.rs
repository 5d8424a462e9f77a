//! Lead capture tools for Leadline.
//!
//! These are the functions the conversational runtime calls while talking to
//! a prospect: record facts as they come up, look up product answers, and
//! save the lead when the call wraps up.

pub mod knowledge_base_query;
pub mod submit_lead;
pub mod update_lead_profile;

use leadline_config::KnowledgeBase;
use leadline_core::store::LeadStore;
use leadline_core::tool::ToolRegistry;
use std::sync::Arc;

pub use knowledge_base_query::KnowledgeBaseQueryTool;
pub use submit_lead::{STORE_FAILURE_APOLOGY, SubmitLeadTool};
pub use update_lead_profile::UpdateLeadProfileTool;

/// Create a registry with all lead capture tools.
///
/// `allow_unqualified` controls whether `submit_lead_and_end` saves leads
/// that are still missing name, email, or use case.
pub fn default_registry(
    store: Arc<dyn LeadStore>,
    knowledge: Arc<KnowledgeBase>,
    allow_unqualified: bool,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(UpdateLeadProfileTool));
    registry.register(Box::new(
        SubmitLeadTool::new(store).allow_unqualified(allow_unqualified),
    ));
    registry.register(Box::new(KnowledgeBaseQueryTool::new(knowledge)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_store::InMemoryLeadStore;

    #[test]
    fn registry_has_every_tool() {
        let registry = default_registry(
            Arc::new(InMemoryLeadStore::new()),
            Arc::new(KnowledgeBase::builtin()),
            true,
        );
        let mut names = registry.names();
        names.sort();
        assert_eq!(
            names,
            vec!["knowledge_base_query", "submit_lead_and_end", "update_lead_profile"]
        );
    }
}
