use std::collections::HashSet;
use std::ops::Range;

use scriptline_config::ParserConfig;

use super::blocks::{self, DualDialogue};
use super::export::{self, Screenplay};
use crate::outline::{OutlineKind, OutlineNode, OutlineScene, outline_tree, section_contents};
use crate::parsing::{Line, LineId, LineType, StorybeatIndex, TitlePage};

/// Read-only view of a parsed screenplay.
///
/// This is the surface handed to scripts and other consumers that must not
/// edit. Implementors only supply the data; every query is derived from it.
/// Positions are byte offsets into the document text.
pub trait ReadOnlyScript {
    fn lines(&self) -> &[Line];
    fn outline(&self) -> &[OutlineScene];
    fn title_page(&self) -> &TitlePage;
    fn storybeats(&self) -> &StorybeatIndex;
    fn config(&self) -> &ParserConfig;

    fn text_len(&self) -> usize {
        self.lines().last().map_or(0, |l| l.position() + l.len())
    }

    /// The document text, verbatim.
    fn raw_text(&self) -> String {
        let mut out = String::with_capacity(self.text_len());
        for (i, line) in self.lines().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.text());
        }
        out
    }

    fn line_identifiers(&self) -> Vec<LineId> {
        self.lines().iter().map(Line::id).collect()
    }

    fn line_at_index(&self, index: usize) -> Option<&Line> {
        self.lines().get(index)
    }

    fn line_type_at(&self, index: usize) -> Option<LineType> {
        self.line_at_index(index).map(Line::line_type)
    }

    /// Index of the line containing `position`. A newline belongs to the line
    /// it ends.
    fn line_index_at_position(&self, position: usize) -> Option<usize> {
        if position > self.text_len() {
            return None;
        }
        let lines = self.lines();
        Some(lines.partition_point(|l| l.position() <= position).saturating_sub(1))
    }

    fn line_at_position(&self, position: usize) -> Option<&Line> {
        self.line_index_at_position(position)
            .and_then(|i| self.line_at_index(i))
    }

    /// Lines intersecting `range`; an empty range gives the line it sits in.
    fn lines_in_range(&self, range: Range<usize>) -> &[Line] {
        let text_len = self.text_len();
        let end = range.end.min(text_len).max(range.start);
        let (Some(first), Some(last)) = (
            self.line_index_at_position(range.start),
            self.line_index_at_position(end),
        ) else {
            return &[];
        };
        // A range ending right after a newline does not reach the next line.
        let last = if end > range.start && end < text_len && self.lines()[last].position() == end {
            last.saturating_sub(1).max(first)
        } else {
            last
        };
        &self.lines()[first..=last]
    }

    fn previous_line(&self, line: &Line) -> Option<&Line> {
        let index = self.line_index_at_position(line.position())?;
        self.line_at_index(index.checked_sub(1)?)
    }

    fn next_line(&self, line: &Line) -> Option<&Line> {
        let index = self.line_index_at_position(line.position())?;
        self.line_at_index(index + 1)
    }

    fn has_title_page(&self) -> bool {
        !self.title_page().is_empty()
    }

    fn title_page_as_string(&self) -> String {
        self.title_page().to_fountain()
    }

    fn scene_at_index(&self, index: usize) -> Option<&OutlineScene> {
        self.outline().get(index)
    }

    /// Index of the outline element containing `position`.
    fn scene_index_at_position(&self, position: usize) -> Option<usize> {
        let outline = self.outline();
        let count = outline.partition_point(|s| s.start <= position);
        let index = count.checked_sub(1)?;
        let scene = &outline[index];
        (scene.contains(position) || position == scene.end()).then_some(index)
    }

    fn scene_at_position(&self, position: usize) -> Option<&OutlineScene> {
        self.scene_index_at_position(position)
            .and_then(|i| self.scene_at_index(i))
    }

    /// Outline elements intersecting `range`.
    fn scenes_in_range(&self, range: Range<usize>) -> &[OutlineScene] {
        let outline = self.outline();
        let first = outline.partition_point(|s| s.end() <= range.start);
        let last = outline.partition_point(|s| s.start < range.end.max(range.start + 1));
        &outline[first..last.max(first)]
    }

    fn scene_with_number(&self, number: &str) -> Option<&OutlineScene> {
        self.outline()
            .iter()
            .find(|s| s.scene_number.as_deref() == Some(number))
    }

    /// Scene headings in the outline; sections do not count.
    fn number_of_scenes(&self) -> usize {
        self.outline().iter().filter(|s| s.is_heading()).count()
    }

    fn lines_for_scene(&self, scene: &OutlineScene) -> &[Line] {
        if scene.length == 0 {
            return self.lines_in_range(scene.start..scene.start);
        }
        self.lines_in_range(scene.range())
    }

    /// Elements nested inside the section at `index`.
    fn scenes_in_section(&self, index: usize) -> &[OutlineScene] {
        &self.outline()[section_contents(self.outline(), index)]
    }

    fn outline_index_at_line_index(&self, index: usize) -> Option<usize> {
        let line = self.line_at_index(index)?;
        self.scene_index_at_position(line.position())
    }

    /// Next element of `kind` after the line at `index`, optionally limited
    /// to sections of `depth`.
    fn next_outline_item_of_type(
        &self,
        index: usize,
        kind: OutlineKind,
        depth: Option<usize>,
    ) -> Option<&OutlineScene> {
        let position = self.line_at_index(index)?.position();
        self.outline()
            .iter()
            .filter(|s| s.start > position)
            .find(|s| s.kind == kind && depth.is_none_or(|d| s.section_depth == d))
    }

    fn previous_outline_item_of_type(
        &self,
        index: usize,
        kind: OutlineKind,
        depth: Option<usize>,
    ) -> Option<&OutlineScene> {
        let position = self.line_at_index(index)?.position();
        self.outline()
            .iter()
            .rev()
            .filter(|s| s.start < position)
            .find(|s| s.kind == kind && depth.is_none_or(|d| s.section_depth == d))
    }

    /// Nearest line at or before `index` that would be printed, else the
    /// nearest one after it.
    fn closest_printable_line_for(&self, index: usize) -> Option<&Line> {
        let lines = self.lines();
        if index >= lines.len() {
            return None;
        }
        let boneyard = self
            .outline()
            .iter()
            .find(|s| s.is_boneyard)
            .map(|s| s.start);
        let disabled = export::disabled_types(self.config());
        let printable =
            |l: &&Line| l.line_type() != LineType::Empty && export::is_printable(l, boneyard, &disabled);
        lines[..=index]
            .iter()
            .rev()
            .find(printable)
            .or_else(|| lines[index..].iter().find(printable))
    }

    fn block_for(&self, index: usize) -> &[Line] {
        &self.lines()[blocks::block_bounds(self.lines(), index)]
    }

    /// Every line of the blocks intersecting `range`.
    fn block_for_range(&self, range: Range<usize>) -> &[Line] {
        let end = range.end.min(self.text_len()).max(range.start);
        let (Some(first), Some(last)) = (
            self.line_index_at_position(range.start),
            self.line_index_at_position(end),
        ) else {
            return &[];
        };
        let lines = self.lines();
        let start = blocks::block_bounds(lines, first).start;
        let end = blocks::block_bounds(lines, last).end;
        &lines[start..end.max(start)]
    }

    fn dual_dialogue_for(&self, index: usize) -> Option<DualDialogue<'_>> {
        blocks::dual_dialogue_for(self.lines(), index)
    }

    fn outline_tree(&self) -> Vec<OutlineNode> {
        outline_tree(self.outline())
    }

    fn storylines(&self) -> Vec<String> {
        self.storybeats().storylines().map(str::to_string).collect()
    }

    /// Heading ids of scenes tagged with `storyline`.
    fn scenes_with_storyline(&self, storyline: &str) -> Vec<&OutlineScene> {
        let ids: HashSet<LineId> = self.storybeats().scenes_for(storyline).into_iter().collect();
        self.outline().iter().filter(|s| ids.contains(&s.line)).collect()
    }

    fn screenplay_for_saving(&self) -> String {
        export::screenplay_for_saving(self.lines())
    }

    fn for_printing(&self) -> Screenplay {
        export::for_printing(self.lines(), self.outline(), self.title_page(), self.config())
    }
}
