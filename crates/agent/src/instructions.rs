//! System instructions for the consultant persona.

use leadline_config::{KnowledgeBase, PersonaConfig};

/// Rendered instruction text for the runtime's language model.
#[derive(Debug, Clone)]
pub struct Instructions {
    text: String,
}

impl Instructions {
    pub fn render(persona: &PersonaConfig, knowledge: &KnowledgeBase) -> Self {
        let faq = if knowledge.is_empty() {
            "(no FAQ loaded)".to_string()
        } else {
            knowledge.prompt_text()
        };

        let text = format!(
            r#"You are '{agent}', a friendly and professional {role} for '{company}'.

YOUR KNOWLEDGE BASE (FAQ):
{faq}

YOUR GOAL:
1. Answer questions about our custom bikes, fittings, and services using the FAQ.
2. QUALIFY THE LEAD: naturally ask for the following details during the chat:
   - Name
   - Company / Role (riding style or club)
   - Email
   - What specific bike or service they are looking for (use case)
   - Timeline (when they want the new bike)

BEHAVIOR:
- Be conversational. Don't interrogate the user: answer a question, THEN ask for a detail.
- Use `update_lead_profile` immediately when you hear new info.
- Use `knowledge_base_query` when a question is not covered above.
- When the user is done, use `submit_lead_and_end` and read its result to the user.

RESTRICTIONS:
- If you don't know an answer, say "I'll check with our Master Builder and email you the details." Never invent prices.
"#,
            agent = persona.agent_name,
            role = persona.role,
            company = persona.company,
        );

        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Instructions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_persona_and_faq() {
        let text = Instructions::render(&PersonaConfig::default(), &KnowledgeBase::builtin());
        assert!(text.as_str().contains("'Liam'"));
        assert!(text.as_str().contains("Bikeya Company"));
        assert!(text.as_str().contains("$350"));
        assert!(text.as_str().contains("submit_lead_and_end"));
    }

    #[test]
    fn empty_knowledge_base_is_marked() {
        let text = Instructions::render(&PersonaConfig::default(), &KnowledgeBase::default());
        assert!(text.to_string().contains("(no FAQ loaded)"));
    }
}
