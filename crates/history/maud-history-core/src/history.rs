//! Checkpoint history: linear undo/redo over model snapshots.
//!
//! `next_index` is the slot the next checkpoint will occupy; the checkpoint
//! at `next_index - 1` is the current one. Checkpoints at or beyond
//! `next_index` are *vulnerable*: redo can reach them, and the next
//! [`CheckpointHistory::add_checkpoint`] discards them.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::checkpoint::Checkpoint;
use crate::config::{HistoryConfig, MIN_CHECKPOINTS};
use crate::error::{HistoryError, Result};
use crate::snapshot::Snapshotting;

/// Outcome of an undo/redo request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryStatus {
    /// The model now holds checkpoint `index`.
    Restored { index: usize },
    NothingToUndo,
    NothingToRedo,
}

impl HistoryStatus {
    pub fn is_restored(&self) -> bool {
        matches!(self, HistoryStatus::Restored { .. })
    }

    /// Status-bar text.
    pub fn message(&self) -> String {
        match self {
            HistoryStatus::Restored { index } => format!("restored checkpoint [{index}]"),
            HistoryStatus::NothingToUndo => "There are no earlier checkpoints.".to_string(),
            HistoryStatus::NothingToRedo => "There are no later checkpoints.".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct CheckpointHistory {
    checkpoints: VecDeque<Checkpoint>,
    next_index: usize,
    pending_events: Vec<String>,
    config: HistoryConfig,
}

impl Default for CheckpointHistory {
    fn default() -> Self {
        Self {
            checkpoints: VecDeque::new(),
            next_index: 0,
            pending_events: Vec::new(),
            config: HistoryConfig::default(),
        }
    }
}

impl CheckpointHistory {
    pub fn new(config: HistoryConfig) -> Result<Self> {
        check_limit(config.max_checkpoints)?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn count_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn checkpoint(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    /// True when redo is possible.
    pub fn has_vulnerable(&self) -> bool {
        self.count_vulnerable() > 0
    }

    pub fn count_vulnerable(&self) -> usize {
        self.checkpoints.len().saturating_sub(self.next_index)
    }

    /// Record what the next checkpoint will capture.
    pub fn add_event(&mut self, description: impl Into<String>) {
        let description = description.into();
        debug!("history event: {description}");
        self.pending_events.push(description);
    }

    /// Descriptions recorded since the last checkpoint or restore.
    pub fn pending_events(&self) -> &[String] {
        &self.pending_events
    }

    pub fn is_auto_add(&self) -> bool {
        self.config.auto_add
    }

    pub fn set_auto_add(&mut self, auto_add: bool) {
        self.config.auto_add = auto_add;
    }

    pub fn max_checkpoints(&self) -> usize {
        self.config.max_checkpoints
    }

    /// Change the retention limit and evict down to it.
    pub fn set_max_checkpoints(&mut self, max_checkpoints: usize) -> Result<()> {
        check_limit(max_checkpoints)?;
        self.config.max_checkpoints = max_checkpoints;
        self.enforce_limit();
        Ok(())
    }

    /// Evict oldest checkpoints until the limit holds. Returns how many were
    /// evicted.
    pub fn enforce_limit(&mut self) -> usize {
        let mut evicted = 0;
        while self.checkpoints.len() > self.config.max_checkpoints {
            self.checkpoints.pop_front();
            self.next_index = self.next_index.saturating_sub(1);
            evicted += 1;
        }
        if evicted > 0 {
            debug!("evicted {evicted} oldest checkpoint(s)");
        }
        evicted
    }

    /// Drop every checkpoint and pending event.
    pub fn clear(&mut self) {
        self.checkpoints.clear();
        self.next_index = 0;
        self.pending_events.clear();
    }

    /// Discard vulnerable checkpoints, then append a snapshot of `model`
    /// labelled with the pending events. Returns the new checkpoint's index.
    ///
    /// If capturing fails the history is left as it was.
    pub fn add_checkpoint<M: Snapshotting + ?Sized>(&mut self, model: &M) -> Result<usize> {
        let snapshot = model.capture()?;

        let discarded = self.count_vulnerable();
        self.checkpoints.truncate(self.next_index);
        let events = std::mem::take(&mut self.pending_events);
        self.checkpoints.push_back(Checkpoint::new(snapshot, events));
        self.next_index += 1;
        self.enforce_limit();

        assert_eq!(
            self.checkpoints.len(),
            self.next_index,
            "checkpoint count out of step with next index"
        );
        let index = self.next_index - 1;
        debug!("added checkpoint [{index}], discarded {discarded} vulnerable");
        Ok(index)
    }

    /// Add a checkpoint only in auto-add mode.
    pub fn auto_add<M: Snapshotting + ?Sized>(&mut self, model: &M) -> Result<Option<usize>> {
        if self.config.auto_add {
            self.add_checkpoint(model).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Step back one checkpoint.
    ///
    /// At the head of the log (nothing to redo) the current state is first
    /// saved as a precautionary checkpoint, so redo can return to it.
    pub fn undo<M: Snapshotting + ?Sized>(&mut self, model: &mut M) -> Result<HistoryStatus> {
        let at_head = !self.has_vulnerable();
        let can_undo = self.next_index > 1 || (at_head && !self.checkpoints.is_empty());
        if !can_undo {
            warn!("undo: nothing to undo");
            return Ok(HistoryStatus::NothingToUndo);
        }

        if at_head {
            self.add_checkpoint(model)?;
        }
        let index = self.next_index - 2;
        self.restore_into(model, index)?;
        self.next_index -= 1;
        Ok(HistoryStatus::Restored { index })
    }

    /// Step forward one checkpoint.
    pub fn redo<M: Snapshotting + ?Sized>(&mut self, model: &mut M) -> Result<HistoryStatus> {
        if !self.has_vulnerable() {
            warn!("redo: nothing to redo");
            return Ok(HistoryStatus::NothingToRedo);
        }
        let index = self.next_index;
        self.restore_into(model, index)?;
        self.next_index += 1;
        Ok(HistoryStatus::Restored { index })
    }

    /// Jump to the newest checkpoint.
    pub fn redo_all<M: Snapshotting + ?Sized>(&mut self, model: &mut M) -> Result<HistoryStatus> {
        if !self.has_vulnerable() {
            warn!("redo all: nothing to redo");
            return Ok(HistoryStatus::NothingToRedo);
        }
        let index = self.checkpoints.len() - 1;
        self.restore_into(model, index)?;
        self.next_index = self.checkpoints.len();
        Ok(HistoryStatus::Restored { index })
    }

    fn restore_into<M: Snapshotting + ?Sized>(
        &mut self,
        model: &mut M,
        index: usize,
    ) -> Result<()> {
        let checkpoint = self
            .checkpoints
            .get(index)
            .ok_or_else(|| HistoryError::Restore(format!("no checkpoint [{index}]")))?;
        model.restore(checkpoint.snapshot())?;
        self.pending_events.clear();
        debug!("restored checkpoint [{index}]");
        Ok(())
    }
}

fn check_limit(max_checkpoints: usize) -> Result<()> {
    if max_checkpoints < MIN_CHECKPOINTS {
        return Err(HistoryError::InvalidLimit {
            requested: max_checkpoints,
        });
    }
    Ok(())
}
