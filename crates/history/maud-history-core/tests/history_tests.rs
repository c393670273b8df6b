use maud_history_core::{
    CheckpointHistory, HistoryConfig, HistoryError, HistoryStatus, Result, Snapshot, Snapshotting,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Doc {
    text: String,
    revision: u32,
}

impl Doc {
    fn edit(&mut self, text: &str) {
        self.text = text.to_string();
        self.revision += 1;
    }
}

impl Snapshotting for Doc {
    fn capture(&self) -> Result<Snapshot> {
        Snapshot::of(self)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        *self = snapshot.restore_as()?;
        Ok(())
    }
}

/// A model whose capture can be switched off.
struct Flaky {
    doc: Doc,
    broken: bool,
}

impl Snapshotting for Flaky {
    fn capture(&self) -> Result<Snapshot> {
        if self.broken {
            return Err(HistoryError::Restore("capture refused".into()));
        }
        self.doc.capture()
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.doc.restore(snapshot)
    }
}

fn text_at(h: &CheckpointHistory, index: usize) -> String {
    h.checkpoint(index)
        .expect("checkpoint")
        .snapshot()
        .restore_as::<Doc>()
        .expect("restore")
        .text
}

fn history_with(texts: &[&str], doc: &mut Doc) -> CheckpointHistory {
    let mut h = CheckpointHistory::default();
    for t in texts {
        doc.edit(t);
        h.add_checkpoint(doc).expect("add");
    }
    h
}

#[test]
fn add_checkpoint_discards_vulnerable_branch() {
    let mut doc = Doc::default();
    let mut h = history_with(&["a", "b", "c", "d"], &mut doc);
    // undo at the head adds a precautionary checkpoint: 5 checkpoints
    h.undo(&mut doc).expect("undo");
    h.undo(&mut doc).expect("undo");
    assert_eq!(h.count_checkpoints(), 5);
    assert_eq!(h.next_index(), 3);
    assert_eq!(doc.text, "c");

    doc.edit("x");
    let index = h.add_checkpoint(&doc).expect("add");
    assert_eq!(index, 3);
    assert_eq!(h.count_checkpoints(), 4);
    assert_eq!(h.next_index(), 4);
    assert!(!h.has_vulnerable());
    assert_eq!(text_at(&h, 3), "x");
    assert_eq!(text_at(&h, 2), "c");
}

#[test]
fn undo_then_redo_round_trips() {
    let mut doc = Doc::default();
    let mut h = history_with(&["first", "second"], &mut doc);
    let before = doc.clone();

    let status = h.undo(&mut doc).expect("undo");
    assert_eq!(status, HistoryStatus::Restored { index: 1 });
    assert_eq!(doc, before, "undo from a fresh checkpoint lands on the same state");

    h.undo(&mut doc).expect("undo");
    assert_eq!(doc.text, "first");

    assert!(h.redo(&mut doc).expect("redo").is_restored());
    assert!(h.redo(&mut doc).expect("redo").is_restored());
    assert_eq!(doc, before);
    assert_eq!(h.redo(&mut doc).expect("redo"), HistoryStatus::NothingToRedo);
}

#[test]
fn undo_keeps_unsaved_edits_reachable_by_redo() {
    let mut doc = Doc::default();
    let mut h = history_with(&["saved"], &mut doc);
    doc.edit("unsaved");

    h.undo(&mut doc).expect("undo");
    assert_eq!(doc.text, "saved");
    assert_eq!(h.count_checkpoints(), 2);
    assert!(h.has_vulnerable());

    h.redo(&mut doc).expect("redo");
    assert_eq!(doc.text, "unsaved");
}

#[test]
fn retention_limit_evicts_oldest_first() {
    let mut doc = Doc::default();
    let mut h = CheckpointHistory::new(HistoryConfig {
        auto_add: true,
        max_checkpoints: 2,
    })
    .expect("config");
    for t in ["one", "two", "three"] {
        doc.edit(t);
        h.add_checkpoint(&doc).expect("add");
    }
    assert_eq!(h.count_checkpoints(), 2);
    assert_eq!(h.next_index(), 2);
    assert_eq!(text_at(&h, 0), "two");
    assert_eq!(text_at(&h, 1), "three");
}

#[test]
fn precautionary_checkpoint_respects_limit() {
    let mut doc = Doc::default();
    let mut h = CheckpointHistory::new(HistoryConfig {
        auto_add: false,
        max_checkpoints: 2,
    })
    .expect("config");
    for t in ["one", "two"] {
        doc.edit(t);
        h.add_checkpoint(&doc).expect("add");
    }
    doc.edit("three");
    let status = h.undo(&mut doc).expect("undo");
    assert_eq!(status, HistoryStatus::Restored { index: 0 });
    assert_eq!(doc.text, "two");
    assert_eq!(h.count_checkpoints(), 2);
    assert_eq!(h.next_index(), 1);
    assert_eq!(text_at(&h, 1), "three");
}

#[test]
fn undo_on_empty_history_is_a_no_op() {
    let mut doc = Doc::default();
    let mut h = CheckpointHistory::default();
    let status = h.undo(&mut doc).expect("undo never fails when empty");
    assert_eq!(status, HistoryStatus::NothingToUndo);
    assert!(!status.message().is_empty());
    assert_eq!(h.next_index(), 0);
    assert_eq!(h.count_checkpoints(), 0);
    assert_eq!(doc, Doc::default());
}

#[test]
fn undo_stops_at_oldest_checkpoint() {
    let mut doc = Doc::default();
    let mut h = history_with(&["only"], &mut doc);
    h.undo(&mut doc).expect("undo");
    assert_eq!(h.next_index(), 1);
    let status = h.undo(&mut doc).expect("undo");
    assert_eq!(status, HistoryStatus::NothingToUndo);
    assert_eq!(h.next_index(), 1);
    assert_eq!(h.count_checkpoints(), 2);
}

#[test]
fn redo_all_jumps_to_newest() {
    let mut doc = Doc::default();
    let mut h = history_with(&["a", "b", "c"], &mut doc);
    for _ in 0..3 {
        h.undo(&mut doc).expect("undo");
    }
    assert_eq!(doc.text, "a");
    let status = h.redo_all(&mut doc).expect("redo all");
    assert_eq!(status, HistoryStatus::Restored { index: 3 });
    assert_eq!(h.next_index(), h.count_checkpoints());
    assert_eq!(doc.text, "c");
    assert_eq!(h.redo_all(&mut doc).expect("redo all"), HistoryStatus::NothingToRedo);
}

#[test]
fn events_label_the_next_checkpoint() {
    let mut doc = Doc::default();
    let mut h = CheckpointHistory::default();
    h.add_event("load model");
    h.add_event("rename bone");
    h.add_checkpoint(&doc).expect("add");
    assert!(h.pending_events().is_empty());
    assert_eq!(h.checkpoint(0).unwrap().events(), ["load model", "rename bone"]);
    assert!(h.checkpoint(0).unwrap().created_at_ms() > 0);

    doc.edit("x");
    h.add_event("edit");
    h.add_checkpoint(&doc).expect("add");
    h.add_event("discarded by restore");
    h.undo(&mut doc).expect("undo");
    assert!(h.pending_events().is_empty());
}

#[test]
fn auto_add_only_when_enabled() {
    let doc = Doc::default();
    let mut h = CheckpointHistory::default();
    assert!(h.is_auto_add());
    assert_eq!(h.auto_add(&doc).expect("auto"), Some(0));
    h.set_auto_add(false);
    assert_eq!(h.auto_add(&doc).expect("auto"), None);
    assert_eq!(h.count_checkpoints(), 1);
}

#[test]
fn failed_capture_leaves_history_unchanged() {
    let mut model = Flaky {
        doc: Doc::default(),
        broken: false,
    };
    let mut h = CheckpointHistory::default();
    h.add_checkpoint(&model).expect("add");
    h.add_checkpoint(&model).expect("add");
    h.undo(&mut model).expect("undo");
    let (count, next) = (h.count_checkpoints(), h.next_index());

    model.broken = true;
    h.add_event("pending");
    assert!(h.add_checkpoint(&model).is_err());
    assert_eq!((h.count_checkpoints(), h.next_index()), (count, next));
    assert_eq!(h.pending_events(), ["pending"]);
}

#[test]
fn clear_and_invalid_config() {
    let mut doc = Doc::default();
    let mut h = history_with(&["a", "b"], &mut doc);
    h.add_event("x");
    h.clear();
    assert_eq!(h.count_checkpoints(), 0);
    assert_eq!(h.next_index(), 0);
    assert!(h.pending_events().is_empty());

    let err = CheckpointHistory::new(HistoryConfig {
        auto_add: true,
        max_checkpoints: 0,
    })
    .unwrap_err();
    assert!(matches!(err, HistoryError::InvalidLimit { requested: 0 }));
}

#[test]
fn config_reads_partial_json() {
    let cfg: HistoryConfig = serde_json::from_str(r#"{ "max_checkpoints": 5 }"#).expect("json");
    assert_eq!(
        cfg,
        HistoryConfig {
            auto_add: true,
            max_checkpoints: 5
        }
    );
}
