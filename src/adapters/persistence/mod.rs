//! Persistence Adapters - Student Document Storage
//!
//! Implements the `StudentStore` port: a JSON file with atomic
//! tmp-then-rename writes, and an in-memory store.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
