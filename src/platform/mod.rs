//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, one file per key on native, memory for tests)

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
pub use storage::{KeyValueStore, MemoryStore};
