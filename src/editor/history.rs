//! Linear undo/redo over full-buffer snapshots.
//!
//! The editing surface has no native input history, so the application
//! records the whole buffer around each change. History is linear: any new
//! edit discards the redo stack.

/// Maximum retained undo snapshots. Overflow evicts the oldest.
pub const MAX_SNAPSHOTS: usize = 100;

/// Snapshot history for one document buffer.
///
/// `last_committed` mirrors the buffer's last recorded value; it is the top
/// of the logical undo stack. [`record_if_changed`](Self::record_if_changed)
/// compares against it so redundant change notifications cost nothing, and
/// [`undo`](Self::undo)/[`redo`](Self::redo) restore into it so the
/// restoration itself is never recorded as a fresh edit.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    last_committed: String,
}

impl SnapshotHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_committed: initial.to_string(),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Record a user-driven edit. No-op when the buffer matches the last
    /// committed snapshot.
    pub fn record_if_changed(&mut self, current: &str) {
        if current == self.last_committed {
            return;
        }
        let previous = std::mem::replace(&mut self.last_committed, current.to_string());
        self.push_undo(previous);
        self.redo_stack.clear();
    }

    /// Record the buffer immediately before a programmatic mutation
    /// (formatting, duplicate-line, template insert). Skips the equality
    /// check since the caller guarantees a change is imminent; the caller
    /// commits the post-mutation value with [`commit`](Self::commit).
    pub fn record_before_programmatic_change(&mut self, current: &str) {
        self.push_undo(current.to_string());
        self.redo_stack.clear();
    }

    /// Set the committed snapshot without recording, used after a
    /// programmatic mutation has been applied.
    pub fn commit(&mut self, current: &str) {
        self.last_committed = current.to_string();
    }

    /// Pop the previous snapshot. Returns the text to restore into the
    /// buffer, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let restored = self.undo_stack.pop()?;
        self.redo_stack.push(current.to_string());
        self.last_committed = restored.clone();
        Some(restored)
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let restored = self.redo_stack.pop()?;
        self.undo_stack.push(current.to_string());
        self.last_committed = restored.clone();
        Some(restored)
    }

    /// Drop all history and re-anchor on the buffer's current value. Called
    /// on new-document, file load, and draft restore so a loaded file cannot
    /// be undone back into the previous document.
    pub fn reset(&mut self, current: &str) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_committed = current.to_string();
    }

    fn push_undo(&mut self, snapshot: String) {
        self.undo_stack.push(snapshot);
        while self.undo_stack.len() > MAX_SNAPSHOTS {
            self.undo_stack.remove(0);
        }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.undo_stack.len()
    }
}
