//! Linear, branch-on-write undo/redo log over collection snapshots.

use crate::element::ElementCollection;

/// Ordered snapshots plus a cursor into them.
///
/// Invariant: `0 <= cursor < snapshots.len()` — the log always holds at
/// least the initial snapshot, and the cursor always points at a live one.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<ElementCollection>,
    cursor: usize,
}

impl History {
    /// Start the log with an initial snapshot at cursor 0.
    pub fn new(initial: ElementCollection) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// The snapshot at the cursor — the only state renderers and
    /// persistence ever read.
    pub fn current(&self) -> &ElementCollection {
        &self.snapshots[self.cursor]
    }

    /// Append `collection` as a new snapshot, discarding anything past the
    /// cursor first (branch on write: undone futures are gone for good).
    pub fn commit(&mut self, collection: ElementCollection) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(collection);
        self.cursor += 1;
    }

    /// Replace the snapshot at the cursor in place.
    ///
    /// Every intermediate sample of a continuous gesture lands here, so a
    /// gesture produces exactly one history entry no matter how many
    /// pointer-move samples it saw.
    pub fn overwrite(&mut self, collection: ElementCollection) {
        self.snapshots[self.cursor] = collection;
    }

    /// Step the cursor back one snapshot. No-op at the start of the log.
    pub fn undo(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Step the cursor forward one snapshot. No-op at the tip.
    pub fn redo(&mut self) {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of snapshots in the log.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// The log is never empty; this exists for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(ElementCollection::new())
    }
}
