//! Editing surface: text buffer, snapshot history, formatting operations.
//!
//! The buffer is rope-backed with cursor and selection management, designed
//! for integration into the TEA architecture. History and formatting operate
//! on it from the update layer.

mod buffer;
mod history;

pub mod format;

pub use buffer::{Cursor, EditBuffer};
pub use history::{MAX_SNAPSHOTS, SnapshotHistory};
