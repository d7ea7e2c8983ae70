use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::buffer::RasterBuffer;
use crate::effect::AppliedEffect;

/// One committed edit: the buffer after the effect ran, plus the full
/// effect chain that produced it (for recipe export and replay checks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub snapshot: RasterBuffer,
    pub applied_effects: Vec<AppliedEffect>,
    pub timestamp: SystemTime,
}

/// Linear undo history over committed edits.
///
/// The cursor is `None` before any commit (and after undoing everything),
/// which denotes the pristine original. Committing while the cursor sits
/// before the end truncates the redo future first.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the cursor, discarding any redo future.
    pub fn commit(
        &mut self,
        snapshot: RasterBuffer,
        applied_effects: Vec<AppliedEffect>,
    ) -> &HistoryEntry {
        let keep = match self.cursor {
            Some(i) => i + 1,
            None => 0,
        };
        self.entries.truncate(keep);
        self.entries.push(HistoryEntry {
            id: Uuid::new_v4(),
            snapshot,
            applied_effects,
            timestamp: SystemTime::now(),
        });
        self.cursor = Some(self.entries.len() - 1);
        &self.entries[self.entries.len() - 1]
    }

    /// Step the cursor back one entry. At the first entry (or on an empty
    /// history) this is a no-op returning None; the caller falls back to
    /// the original buffer when `current()` is None afterwards.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        match self.cursor {
            Some(0) | None => {
                self.cursor = None;
                None
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                Some(&self.entries[i - 1])
            }
        }
    }

    /// Step the cursor forward one entry. No-op returning None when there
    /// is no redo future.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let next = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        Some(&self.entries[next])
    }

    /// The entry at the cursor, None when at the pristine original.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.map(|i| &self.entries[i])
    }

    /// Destroy all entries and return to the pristine original.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            None => !self.entries.is_empty(),
            Some(i) => i + 1 < self.entries.len(),
        }
    }

    /// All entries in commit order, regardless of cursor position.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::AppliedEffect;

    fn buf(v: u8) -> RasterBuffer {
        RasterBuffer::filled(1, 1, [v, v, v])
    }

    fn effect(n: u32) -> AppliedEffect {
        AppliedEffect::new(&format!("effect_{n}"), vec![])
    }

    #[test]
    fn test_empty_history_noops() {
        let mut history = EditHistory::new();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(history.current().is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_commit_moves_cursor() {
        let mut history = EditHistory::new();
        history.commit(buf(1), vec![effect(1)]);
        history.commit(buf(2), vec![effect(1), effect(2)]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().snapshot, buf(2));
    }

    #[test]
    fn test_undo_to_pristine_then_noop() {
        let mut history = EditHistory::new();
        history.commit(buf(1), vec![effect(1)]);
        history.commit(buf(2), vec![effect(1), effect(2)]);

        let entry = history.undo().unwrap();
        assert_eq!(entry.snapshot, buf(1));

        // At entry 0: undo steps to pristine and returns None.
        assert!(history.undo().is_none());
        assert!(history.current().is_none());

        // Further undos stay a no-op.
        assert!(history.undo().is_none());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_redo_mirrors_undo() {
        let mut history = EditHistory::new();
        history.commit(buf(1), vec![effect(1)]);
        history.commit(buf(2), vec![effect(1), effect(2)]);

        history.undo();
        history.undo();
        assert!(history.current().is_none());

        assert_eq!(history.redo().unwrap().snapshot, buf(1));
        assert_eq!(history.redo().unwrap().snapshot, buf(2));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_truncates_redo_future() {
        let mut history = EditHistory::new();
        history.commit(buf(1), vec![effect(1)]);
        history.commit(buf(2), vec![effect(1), effect(2)]);
        history.undo();

        history.commit(buf(3), vec![effect(1), effect(3)]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().snapshot, buf(3));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_after_full_undo_truncates_everything() {
        let mut history = EditHistory::new();
        history.commit(buf(1), vec![effect(1)]);
        history.undo();

        history.commit(buf(9), vec![effect(9)]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().snapshot, buf(9));
    }

    #[test]
    fn test_reset_destroys_entries() {
        let mut history = EditHistory::new();
        history.commit(buf(1), vec![effect(1)]);
        history.commit(buf(2), vec![effect(1), effect(2)]);
        history.reset();
        assert!(history.is_empty());
        assert!(history.current().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_entries_keep_commit_order() {
        let mut history = EditHistory::new();
        history.commit(buf(1), vec![effect(1)]);
        history.commit(buf(2), vec![effect(1), effect(2)]);
        history.undo();
        // Cursor moved, entries untouched.
        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.entries()[1].snapshot, buf(2));
    }
}
