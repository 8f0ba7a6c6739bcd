use std::collections::BTreeSet;

use crate::outline::OutlineChanges;
use crate::parsing::LineId;

/// Result of applying an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    /// Parser version after the edit.
    pub version: u64,
    /// Indices (after the edit) of lines that need re-rendering.
    pub changed_indices: BTreeSet<usize>,
    /// Ids of lines that no longer exist.
    pub removed: Vec<LineId>,
    pub outline_changes: OutlineChanges,
}

impl Patch {
    /// Folds the patch of a later edit into this one.
    pub(crate) fn merge(&mut self, later: Patch) {
        self.version = later.version;
        self.changed_indices.extend(later.changed_indices);
        self.removed.extend(later.removed);
        self.outline_changes.merge(later.outline_changes);
    }
}
