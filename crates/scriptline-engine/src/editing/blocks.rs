use std::ops::Range;

use serde::Serialize;

use crate::parsing::{Line, LineType};

/// The two sides of a dialogue exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DualDialogue<'a> {
    pub left: &'a [Line],
    pub right: &'a [Line],
    /// Both sides present and the right cue carries the dual marker.
    pub is_dual: bool,
}

/// Index range of the block containing `index`: the run of non-empty lines
/// around it, or the empty line alone.
pub fn block_bounds(lines: &[Line], index: usize) -> Range<usize> {
    if index >= lines.len() {
        return index..index;
    }
    if lines[index].line_type() == LineType::Empty {
        return index..index + 1;
    }
    let start = lines[..index]
        .iter()
        .rposition(|l| l.line_type() == LineType::Empty)
        .map_or(0, |p| p + 1);
    let end = lines[index..]
        .iter()
        .position(|l| l.line_type() == LineType::Empty)
        .map_or(lines.len(), |p| index + p);
    start..end
}

/// Nearest block before `index` that is not an empty line.
fn previous_block(lines: &[Line], index: usize) -> Option<Range<usize>> {
    let before = lines[..index.min(lines.len())]
        .iter()
        .rposition(|l| l.line_type() != LineType::Empty)?;
    Some(block_bounds(lines, before))
}

fn next_block(lines: &[Line], index: usize) -> Option<Range<usize>> {
    let from = index.checked_add(1)?.min(lines.len());
    let after = lines[from..]
        .iter()
        .position(|l| l.line_type() != LineType::Empty)?;
    Some(block_bounds(lines, from + after))
}

fn starts_with(lines: &[Line], block: &Range<usize>, line_type: LineType) -> bool {
    lines.get(block.start).is_some_and(|l| l.line_type() == line_type)
}

/// The plain dialogue block that would sit left of a dual cue at `index`.
pub(crate) fn left_dialogue_block(lines: &[Line], index: usize) -> Option<Range<usize>> {
    let block = block_bounds(lines, index);
    previous_block(lines, block.start).filter(|b| starts_with(lines, b, LineType::Character))
}

pub fn dual_dialogue_for(lines: &[Line], index: usize) -> Option<DualDialogue<'_>> {
    if index >= lines.len() {
        return None;
    }
    let block = block_bounds(lines, index);

    if starts_with(lines, &block, LineType::DualDialogueCharacter) {
        let left = left_dialogue_block(lines, index).unwrap_or(block.start..block.start);
        return Some(DualDialogue {
            left: &lines[left.clone()],
            right: &lines[block],
            is_dual: !left.is_empty(),
        });
    }

    if starts_with(lines, &block, LineType::Character) {
        if let Some(right) = next_block(lines, block.end.saturating_sub(1))
            .filter(|b| starts_with(lines, b, LineType::DualDialogueCharacter))
        {
            return Some(DualDialogue {
                left: &lines[block],
                right: &lines[right],
                is_dual: true,
            });
        }
    }

    Some(DualDialogue {
        left: &lines[block],
        right: &[],
        is_dual: false,
    })
}
