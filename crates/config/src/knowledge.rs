//! Knowledge base: the static FAQ the assistant answers product questions from.
//!
//! The FAQ lives in a JSON file next to the config. When the file is missing
//! it is created with the built-in answers, then loaded. After startup the
//! knowledge base is read-only.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ConfigError;

/// One question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A ranked FAQ match.
#[derive(Debug, Clone, Serialize)]
pub struct FaqMatch<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub score: f64,
}

/// The loaded FAQ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
}

static SHARED: OnceCell<Arc<KnowledgeBase>> = OnceCell::new();

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "you", "your", "does", "what", "how", "are", "any", "can", "with",
    "much", "this", "that", "have", "our", "is", "do", "of", "a", "an", "to", "it", "in",
];

impl KnowledgeBase {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// The built-in Bikeya FAQ.
    pub fn builtin() -> Self {
        Self::new(vec![
            FaqEntry::new(
                "What kind of bikes does Bikeya sell?",
                "Bikeya specializes in custom-built, high-performance road, gravel, and time trial bikes. We focus on lightweight carbon frames and personalized component selection.",
            ),
            FaqEntry::new(
                "How much does a custom bike fitting session cost?",
                "Our comprehensive 3D dynamic bike fitting session, essential for all custom orders, is priced at $350. This fee is often waived if you purchase a complete bike package.",
            ),
            FaqEntry::new(
                "Do you offer financing or payment plans?",
                "Yes, we partner with specialized cycling finance companies to offer 6 and 12-month payment plans, subject to approval.",
            ),
            FaqEntry::new(
                "What is the typical lead time for a custom bike?",
                "Depending on component availability, a custom Bikeya frame and build takes approximately 8 to 12 weeks from the final fit session to delivery.",
            ),
        ])
    }

    /// Create the FAQ file with the built-in answers if it is missing, then load it.
    pub fn try_load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError {
                    path: parent.to_path_buf(),
                    reason: e.to_string(),
                })?;
            }
            let json = serde_json::to_string_pretty(&Self::builtin()).map_err(|e| {
                ConfigError::ParseError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;
            // Several processes may start at once; none should read a half-written file.
            let temp_path = path.with_extension(format!("{}.tmp", std::process::id()));
            std::fs::write(&temp_path, json)
                .and_then(|()| std::fs::rename(&temp_path, path))
                .map_err(|e| {
                    let _ = std::fs::remove_file(&temp_path);
                    ConfigError::ReadError {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    }
                })?;
            debug!(path = %path.display(), "Wrote default FAQ");
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Like [`KnowledgeBase::try_load_or_init`], but a broken FAQ never stops
    /// the assistant: failures are logged and yield an empty knowledge base.
    pub fn load_or_init(path: &Path) -> Self {
        match Self::try_load_or_init(path) {
            Ok(kb) => kb,
            Err(e) => {
                warn!(error = %e, "Could not load FAQ, continuing without a knowledge base");
                Self::default()
            }
        }
    }

    /// Process-wide knowledge base, loaded on first access.
    ///
    /// Later calls return the same instance regardless of `path`.
    pub fn shared(path: &Path) -> Arc<Self> {
        SHARED
            .get_or_init(|| Arc::new(Self::load_or_init(path)))
            .clone()
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The FAQ as compact JSON, for embedding in agent instructions.
    pub fn prompt_text(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_default()
    }

    /// Rank entries by how many of the query's keywords they mention.
    ///
    /// Entries with no keyword in common are dropped; ties keep FAQ order.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<FaqMatch<'_>> {
        let terms = keywords(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<FaqMatch<'_>> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let haystack = keywords(&format!("{} {}", entry.question, entry.answer));
                let hits = terms.iter().filter(|t| haystack.contains(*t)).count();
                (hits > 0).then(|| FaqMatch {
                    question: &entry.question,
                    answer: &entry.answer,
                    score: hits as f64 / terms.len() as f64,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);
        matches
    }
}

fn keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 1 && !STOPWORDS.contains(&w.as_str()))
        .map(|w| w.trim_end_matches('s').to_string())
        .filter(|w| !w.is_empty())
        .collect()
}
