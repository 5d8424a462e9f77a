//! Per-conversation state.
//!
//! One [`SessionState`] exists per live conversation and exclusively owns that
//! conversation's [`LeadProfile`]. Sessions never share profiles, so profile
//! updates need no synchronization; only the lead store is shared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lead::{LeadPatch, LeadProfile, apply_update};

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State for one conversation.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: SessionId,
    profile: LeadProfile,
    started_at: DateTime<Utc>,
    committed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Start a session with an empty profile.
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            profile: LeadProfile::new(),
            started_at: Utc::now(),
            committed_at: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn profile(&self) -> &LeadProfile {
        &self.profile
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Merge newly learned facts into this session's profile.
    pub fn update(&mut self, patch: &LeadPatch) -> usize {
        apply_update(&mut self.profile, patch)
    }

    /// When the lead was committed, if it has been.
    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.committed_at
    }

    pub fn is_committed(&self) -> bool {
        self.committed_at.is_some()
    }

    /// Record that the profile was durably committed.
    pub fn mark_committed(&mut self, at: DateTime<Utc>) {
        self.committed_at = Some(at);
    }

    /// Tear the session down and hand back the final profile.
    ///
    /// Nothing is persisted here; only an explicit store commit persists.
    pub fn into_profile(self) -> LeadProfile {
        self.profile
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
