use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::parsing::LineId;
use crate::parsing::storybeats::Storybeat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineKind {
    Heading,
    Section,
}

/// Counters carried from one outline element to the next.
///
/// Rebuilding a span of the outline starts from the state after the element
/// before the span; if the state after the span differs from before, every
/// later element may have changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlineState {
    /// Automatic scene numbers handed out so far.
    pub counter: usize,
    /// Depth of the innermost open section.
    pub section_depth: usize,
    pub in_boneyard: bool,
}

/// A scene or section: a contiguous run of lines headed by its heading line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineScene {
    /// Heading line. Resolve through the parser to get the line itself.
    pub line: LineId,
    pub kind: OutlineKind,
    /// Heading as displayed.
    pub string: String,
    pub scene_number: Option<String>,
    pub color: Option<String>,
    /// Storyline labels, in tag order, without duplicates.
    pub storylines: Vec<String>,
    pub beats: Vec<Storybeat>,
    /// Synopsis lines inside the element.
    pub synopsis: Vec<String>,
    /// Byte offset of the heading line.
    pub start: usize,
    /// Bytes up to the next element or the end of the document.
    pub length: usize,
    pub section_depth: usize,
    pub omitted: bool,
    /// The heading does not start inside an omission.
    pub no_omit_in: bool,
    /// No omission is open at the end of the element.
    pub no_omit_out: bool,
    /// The element is the boneyard section or comes after it.
    pub is_boneyard: bool,
    #[serde(skip)]
    pub(crate) state_after: OutlineState,
}

impl OutlineScene {
    pub fn new(line: LineId, kind: OutlineKind) -> Self {
        Self {
            line,
            kind,
            string: String::new(),
            scene_number: None,
            color: None,
            storylines: Vec::new(),
            beats: Vec::new(),
            synopsis: Vec::new(),
            start: 0,
            length: 0,
            section_depth: 0,
            omitted: false,
            no_omit_in: true,
            no_omit_out: true,
            is_boneyard: false,
            state_after: OutlineState::default(),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.range().contains(&position)
    }

    pub fn is_section(&self) -> bool {
        self.kind == OutlineKind::Section
    }

    pub fn is_heading(&self) -> bool {
        self.kind == OutlineKind::Heading
    }

    /// Everything a reader can see about the element, start and length aside.
    pub(crate) fn same_content(&self, other: &OutlineScene) -> bool {
        self.kind == other.kind
            && self.string == other.string
            && self.scene_number == other.scene_number
            && self.color == other.color
            && self.storylines == other.storylines
            && self.beats == other.beats
            && self.synopsis == other.synopsis
            && self.section_depth == other.section_depth
            && self.omitted == other.omitted
            && self.no_omit_in == other.no_omit_in
            && self.no_omit_out == other.no_omit_out
            && self.is_boneyard == other.is_boneyard
    }
}
