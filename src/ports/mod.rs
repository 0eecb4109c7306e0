//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `StudentStore`: whole-document persistence (JSON file or memory)

pub mod storage;

pub use storage::StudentStore;
