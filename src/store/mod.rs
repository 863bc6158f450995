//! Record storage for Pink Tower.
//!
//! This module provides the on-device datastore: a generic record-store
//! trait with predicate-based queries, a JSON-file backend for
//! production, and an in-memory backend for tests.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{Datastore, Record, RecordStore};
