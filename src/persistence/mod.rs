//! Save/load persistence
//!
//! Features:
//! - Single JSON snapshot of the whole session under one key
//! - Field-by-field restore: bad fields are skipped, not fatal
//! - Puzzle text is re-derived from the stored alphabet, never trusted blindly
//! - Corrupt or out-of-range snapshots fall back to a fresh session

pub mod snapshot;

pub use snapshot::{deserialize, serialize};
