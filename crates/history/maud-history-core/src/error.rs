use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The retention limit must keep at least two checkpoints.
    #[error("checkpoint limit {requested} is below the minimum of 2")]
    InvalidLimit { requested: usize },

    #[error("snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A model refused to restore a snapshot.
    #[error("restore failed: {0}")]
    Restore(String),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
