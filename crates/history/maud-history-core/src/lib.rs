//! Maud history core
//!
//! A bounded, rewindable log of whole-model snapshots. Undo and redo move a
//! cursor through the log; writing a new checkpoint discards everything ahead
//! of the cursor.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod history;
pub mod snapshot;

pub use checkpoint::Checkpoint;
pub use config::{HistoryConfig, MIN_CHECKPOINTS};
pub use error::{HistoryError, Result};
pub use history::{CheckpointHistory, HistoryStatus};
pub use snapshot::{Snapshot, Snapshotting};
