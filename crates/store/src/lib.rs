//! Lead store implementations for Leadline.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryLeadStore;
pub use json_file::JsonFileLeadStore;
