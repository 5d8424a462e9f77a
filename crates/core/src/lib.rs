//! # Leadline Core
//!
//! Domain types, traits, and error definitions for Leadline, the lead
//! capture back end of a conversational sales assistant.
//! This crate does **no I/O**; it defines the domain model
//! that the store, tool, and agent crates implement against.
//!
//! ## Layout
//!
//! - [`lead`]: the prospect profile, partial updates, and the qualification rule
//! - [`store`]: the append-only lead store contract
//! - [`session`]: per-conversation state
//! - [`tool`]: the function-call surface the conversational runtime drives

pub mod error;
pub mod lead;
pub mod session;
pub mod store;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result, StoreError, ToolError};
pub use lead::{LeadField, LeadPatch, LeadProfile, LeadRecord, apply_update, is_qualified};
pub use session::{SessionId, SessionState};
pub use store::LeadStore;
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
