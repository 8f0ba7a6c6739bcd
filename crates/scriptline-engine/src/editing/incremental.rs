//! Incremental re-parse of a single edit.
//!
//! An edit replaces a byte range with new text. The lines it touches are
//! spliced, then re-classified starting one line before the edit and moving
//! forward until a line past the edit classifies exactly as before. The
//! outline is rebuilt only over the elements that cover those lines and
//! diffed against what was there; if the counters carried out of that span
//! changed and more elements follow, the whole outline is rebuilt.

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

use xi_rope::RopeInfo;
use xi_rope::delta::{Delta, DeltaElement};

use super::blocks::left_dialogue_block;
use super::parser::{ParseMode, Parser, classify_at};
use super::patch::Patch;
use super::script::ReadOnlyScript;
use crate::outline::{OutlineBuilder, OutlineChanges, OutlineState, diff_outline};
use crate::parsing::{Line, LineId, LineType, TitlePage, apply_scene_numbers};

/// Edits inserting more lines than this are handled as a full re-parse.
pub const LARGE_EDIT_LINES: usize = 500;

/// Lines replaced by a splice.
struct Splice {
    /// Index of the first new line.
    first: usize,
    /// Number of new lines.
    count: usize,
    /// Number of old lines they replace.
    replaced: usize,
    /// Whether a replaced line was a dual dialogue cue.
    had_dual: bool,
    /// Old lines whose ids did not survive.
    removed: Vec<Line>,
    /// Byte length change of the document.
    delta: isize,
}

impl Parser {
    /// Replaces `range` with `replacement` and brings the model up to date.
    ///
    /// # Panics
    ///
    /// Panics if `range` is reversed, reaches past the end of the document,
    /// or does not fall on character boundaries.
    pub fn parse_change(&mut self, range: Range<usize>, replacement: &str) -> Patch {
        let text_len = self.text_len();
        assert!(
            range.start <= range.end && range.end <= text_len,
            "edit range {range:?} outside document of {text_len} bytes"
        );

        let whole_document = text_len > 0 && range.start == 0 && range.end == text_len;
        let large = replacement.matches('\n').count() > LARGE_EDIT_LINES || whole_document;

        let splice = self.splice_lines(range.clone(), replacement);
        self.version += 1;

        if self.mode == ParseMode::Static || large {
            log::debug!(
                "Edit {range:?} (+{} bytes) falls back to a full re-parse",
                replacement.len()
            );
            self.reclassify_all();
            let changes = self.rebuild_structure();
            self.identity.invalidate_lines();
            let changed = (0..self.lines.len()).collect();
            return self.finish_edit(changed, splice.removed, changes);
        }

        let (changed, reparsed) = self.reclassify_from(&splice);
        let changes = self.repair_outline(reparsed, splice.delta);

        if !splice.removed.is_empty() || splice.count != splice.replaced {
            self.identity.invalidate_lines();
        }
        if splice.first <= self.title_page_len {
            let (title_page, len) = TitlePage::from_lines(&self.lines);
            self.title_page = Arc::new(title_page);
            self.title_page_len = len;
        }

        self.finish_edit(changed, splice.removed, changes)
    }

    /// Applies an xi-rope delta as a sequence of replacements.
    ///
    /// # Panics
    ///
    /// Panics if the delta was not built against the current text.
    pub fn apply_delta(&mut self, delta: &Delta<RopeInfo>) -> Patch {
        let mut patch = Patch {
            version: self.version,
            ..Patch::default()
        };
        let mut shift: isize = 0;
        for (range, text) in delta_to_replacements(delta) {
            let start = range.start.saturating_add_signed(shift);
            let end = range.end.saturating_add_signed(shift);
            patch.merge(self.parse_change(start..end, &text));
            shift += text.len() as isize - range.len() as isize;
        }
        patch.changed_indices.retain(|&i| i < self.lines.len());
        patch
    }

    /// Swaps the lines touched by `range` for the lines of the edited text,
    /// handing ids to the new lines that continue old ones.
    fn splice_lines(&mut self, range: Range<usize>, replacement: &str) -> Splice {
        let first = self.line_index_at_position(range.start).unwrap_or(0);
        let last = self.line_index_at_position(range.end).unwrap_or(first);

        let (prefix, suffix, base) = {
            let first_line = &self.lines[first];
            let last_line = &self.lines[last];
            let start_off = range.start - first_line.position();
            let end_off = range.end - last_line.position();
            assert!(
                first_line.text().is_char_boundary(start_off)
                    && last_line.text().is_char_boundary(end_off),
                "edit range {range:?} does not fall on character boundaries"
            );
            (
                &first_line.text()[..start_off],
                &last_line.text()[end_off..],
                first_line.position(),
            )
        };

        let combined = format!("{prefix}{replacement}{suffix}");
        let texts: Vec<&str> = combined.split('\n').collect();
        let count = texts.len();
        let ids = assign_ids(
            &self.lines[first..=last],
            prefix.is_empty(),
            suffix.is_empty(),
            count,
        );

        let mut position = base;
        let new_lines: Vec<Line> = texts
            .iter()
            .zip(&ids)
            .map(|(text, id)| {
                let line = Line::new(*id, *text, position);
                position += text.len() + 1;
                line
            })
            .collect();

        let delta = replacement.len() as isize - range.len() as isize;
        let lines = Arc::make_mut(&mut self.lines);
        let old: Vec<Line> = lines.splice(first..=last, new_lines).collect();
        for line in &mut lines[first + count..] {
            line.position = line.position.saturating_add_signed(delta);
        }

        let had_dual = old
            .iter()
            .any(|l| l.line_type() == LineType::DualDialogueCharacter);
        let kept: BTreeSet<LineId> = ids.into_iter().collect();
        let removed = old.into_iter().filter(|l| !kept.contains(&l.id())).collect();

        Splice {
            first,
            count,
            replaced: last - first + 1,
            had_dual,
            removed,
            delta,
        }
    }

    /// Re-classifies from one line before the splice until a line past it
    /// is unchanged. Returns the lines to re-render and the index range that
    /// was classified.
    fn reclassify_from(&mut self, splice: &Splice) -> (BTreeSet<usize>, Range<usize>) {
        let start = splice.first.saturating_sub(1);
        let edit_end = splice.first + splice.count;
        let mut changed = BTreeSet::new();
        let mut dual_changes = Vec::new();

        let lines = Arc::make_mut(&mut self.lines);
        let mut i = start;
        while i < lines.len() {
            let before = lines[i].parse_state();
            classify_at(lines, i);
            let after = lines[i].parse_state();

            let edited = (splice.first..edit_end).contains(&i);
            if edited || before != after {
                changed.insert(i);
            }
            let was_dual = before.line_type == LineType::DualDialogueCharacter;
            let is_dual = after.line_type == LineType::DualDialogueCharacter;
            let dual_changed = if edited {
                is_dual || splice.had_dual
            } else {
                was_dual != is_dual
            };
            if dual_changed {
                dual_changes.push(i);
            }

            i += 1;
            if i > edit_end && before == after {
                break;
            }
        }

        for index in dual_changes {
            if let Some(block) = left_dialogue_block(lines, index) {
                changed.extend(block);
            }
        }
        log::trace!("Re-classified lines {start}..{i}");
        (changed, start..i)
    }

    /// Rebuilds the outline elements covering `reparsed` and splices them in.
    fn repair_outline(&mut self, reparsed: Range<usize>, delta: isize) -> OutlineChanges {
        let text_len = self.text_len();
        let old = Arc::clone(&self.outline);

        let start_pos = self.lines[reparsed.start].position();
        let s = old.partition_point(|e| e.start <= start_pos).saturating_sub(1);
        let carry_in = if s == 0 {
            OutlineState::default()
        } else {
            old[s - 1].state_after
        };
        let from_line = match old.get(s) {
            Some(scene) if scene.start <= start_pos => {
                self.line_index_at_position(scene.start).unwrap_or(0)
            }
            _ => 0,
        };

        // First old element past the re-classified lines, in old coordinates.
        let e = match self.lines.get(reparsed.end) {
            Some(line) => {
                let old_pos = line.position().saturating_add_signed(-delta);
                old.partition_point(|el| el.start < old_pos)
            }
            None => old.len(),
        };
        let end_pos = old
            .get(e)
            .map_or(text_len, |el| el.start.saturating_add_signed(delta));

        let mut builder = OutlineBuilder::resume(carry_in, &self.config);
        for (i, line) in self.lines.iter().enumerate().skip(from_line) {
            if line.position() >= end_pos && i >= reparsed.end {
                break;
            }
            builder.push(i, line);
        }
        let built = builder.finish(end_pos);

        let old_span = &old[s..e];
        let mut changes = diff_outline(old_span, &built.scenes);
        let carry_out_old = old_span.last().map_or(carry_in, |el| el.state_after);
        if carry_out_old != built.state && e < old.len() {
            changes.needs_full_update = true;
        }
        log::trace!(
            "Outline span {s}..{e} rebuilt into {} elements",
            built.scenes.len()
        );

        if changes.needs_full_update {
            log::debug!("Outline change cascades past the edited span; rebuilding");
            return self.rebuild_structure();
        }

        let lines = Arc::make_mut(&mut self.lines);
        apply_scene_numbers(lines, &built);

        let removed_ids: Vec<LineId> = old_span.iter().map(|el| el.line).collect();
        drop(old);
        let outline = Arc::make_mut(&mut self.outline);
        let tail = outline.split_off(e);
        outline.truncate(s);
        outline.extend(built.scenes.iter().cloned());
        outline.extend(tail.into_iter().map(|mut el| {
            el.start = el.start.saturating_add_signed(delta);
            el
        }));

        Arc::make_mut(&mut self.storybeats).replace_span(&removed_ids, &built.scenes, outline);

        if !changes.added.is_empty() || !changes.removed.is_empty() {
            self.identity.invalidate_scenes();
        }
        changes
    }
}

/// Ids for the `count` lines replacing `old`.
///
/// The line keeping the start of the edited text keeps its id. When the edit
/// starts at the very beginning of a line and leaves text after it, that
/// line was pushed down and the last new line inherits the id instead.
fn assign_ids(old: &[Line], prefix_empty: bool, suffix_empty: bool, count: usize) -> Vec<LineId> {
    let mut ids: Vec<LineId> = (0..count).map(|_| LineId::new()).collect();
    let first = old[0].id();
    let last = old[old.len() - 1].id();

    if old.len() == 1 {
        if count > 1 && prefix_empty && !suffix_empty {
            ids[count - 1] = first;
        } else {
            ids[0] = first;
        }
        return ids;
    }

    if count == 1 && prefix_empty && !suffix_empty {
        ids[0] = last;
        return ids;
    }
    ids[0] = first;
    if count > 1 && !suffix_empty {
        ids[count - 1] = last;
    }
    ids
}

/// Converts a delta to replacements in old-document coordinates, in order.
///
/// A gap between copied regions is a deletion; an insert directly before or
/// after a gap is merged with it into one replacement.
pub(crate) fn delta_to_replacements(delta: &Delta<RopeInfo>) -> Vec<(Range<usize>, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(Range<usize>, String)> = None;
    let mut old_pos = 0;

    for op in &delta.els {
        match op {
            DeltaElement::Copy(from, to) => {
                if old_pos < *from {
                    let (range, text) = take_pending(&mut pending, old_pos);
                    pending = Some((range.start..*from, text));
                }
                out.extend(pending.take());
                old_pos = *to;
            }
            DeltaElement::Insert(inserted) => {
                let (range, mut text) = take_pending(&mut pending, old_pos);
                text.push_str(&inserted.to_string());
                pending = Some((range, text));
            }
        }
    }

    if old_pos < delta.base_len {
        let (range, text) = take_pending(&mut pending, old_pos);
        pending = Some((range.start..delta.base_len, text));
    }
    out.extend(pending);
    out
}

fn take_pending(pending: &mut Option<(Range<usize>, String)>, at: usize) -> (Range<usize>, String) {
    pending.take().unwrap_or((at..at, String::new()))
}
