use std::collections::BTreeSet;
use std::ops::Range;

use crate::outline::OutlineChanges;
use crate::parsing::Line;

/// Host callbacks fired by a continuous parser after each edit.
///
/// Every method has a no-op default. Calls arrive in this order:
/// `line_was_removed` for each removed line, `reformat_lines_at_indices`,
/// `apply_format_changes`, then `outline_did_update` if the outline changed.
pub trait ParserDelegate {
    fn line_was_removed(&mut self, _line: &Line) {}

    fn reformat_lines_at_indices(&mut self, _indices: &BTreeSet<usize>) {}

    fn apply_format_changes(&mut self) {}

    fn outline_did_update(&mut self, _changes: &OutlineChanges) {}

    /// Current selection in the host editor, as byte offsets.
    fn selected_range(&self) -> Option<Range<usize>> {
        None
    }
}
