//! Storage backends implementing the core service traits

pub mod in_memory;

pub use in_memory::InMemoryStore;
