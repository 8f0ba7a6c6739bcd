use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParserError;
use crate::parsing::storybeats::Storybeat;

/// Stable identifier of a logical line.
///
/// Survives content-only edits to the line and is never handed to another
/// line once the original is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

impl LineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Type of a screenplay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Empty,
    Section,
    Synopsis,
    TitlePageTitle,
    TitlePageCredit,
    TitlePageAuthor,
    TitlePageSource,
    TitlePageDraftDate,
    TitlePageContact,
    TitlePageUnknown,
    Heading,
    Action,
    Character,
    Parenthetical,
    Dialogue,
    DualDialogueCharacter,
    DualDialogueParenthetical,
    DualDialogue,
    Transition,
    Lyrics,
    Centered,
    Shot,
    PageBreak,
}

impl LineType {
    pub const ALL: [LineType; 23] = [
        LineType::Empty,
        LineType::Section,
        LineType::Synopsis,
        LineType::TitlePageTitle,
        LineType::TitlePageCredit,
        LineType::TitlePageAuthor,
        LineType::TitlePageSource,
        LineType::TitlePageDraftDate,
        LineType::TitlePageContact,
        LineType::TitlePageUnknown,
        LineType::Heading,
        LineType::Action,
        LineType::Character,
        LineType::Parenthetical,
        LineType::Dialogue,
        LineType::DualDialogueCharacter,
        LineType::DualDialogueParenthetical,
        LineType::DualDialogue,
        LineType::Transition,
        LineType::Lyrics,
        LineType::Centered,
        LineType::Shot,
        LineType::PageBreak,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LineType::Empty => "empty",
            LineType::Section => "section",
            LineType::Synopsis => "synopsis",
            LineType::TitlePageTitle => "title_page_title",
            LineType::TitlePageCredit => "title_page_credit",
            LineType::TitlePageAuthor => "title_page_author",
            LineType::TitlePageSource => "title_page_source",
            LineType::TitlePageDraftDate => "title_page_draft_date",
            LineType::TitlePageContact => "title_page_contact",
            LineType::TitlePageUnknown => "title_page_unknown",
            LineType::Heading => "heading",
            LineType::Action => "action",
            LineType::Character => "character",
            LineType::Parenthetical => "parenthetical",
            LineType::Dialogue => "dialogue",
            LineType::DualDialogueCharacter => "dual_dialogue_character",
            LineType::DualDialogueParenthetical => "dual_dialogue_parenthetical",
            LineType::DualDialogue => "dual_dialogue",
            LineType::Transition => "transition",
            LineType::Lyrics => "lyrics",
            LineType::Centered => "centered",
            LineType::Shot => "shot",
            LineType::PageBreak => "page_break",
        }
    }

    pub fn is_title_page(self) -> bool {
        matches!(
            self,
            LineType::TitlePageTitle
                | LineType::TitlePageCredit
                | LineType::TitlePageAuthor
                | LineType::TitlePageSource
                | LineType::TitlePageDraftDate
                | LineType::TitlePageContact
                | LineType::TitlePageUnknown
        )
    }

    pub fn is_character(self) -> bool {
        matches!(self, LineType::Character | LineType::DualDialogueCharacter)
    }

    /// Cue, parenthetical or dialogue, single or dual.
    pub fn is_dialogue_element(self) -> bool {
        matches!(
            self,
            LineType::Character
                | LineType::Parenthetical
                | LineType::Dialogue
                | LineType::DualDialogueCharacter
                | LineType::DualDialogueParenthetical
                | LineType::DualDialogue
        )
    }

    pub fn is_dual_dialogue_element(self) -> bool {
        matches!(
            self,
            LineType::DualDialogueCharacter
                | LineType::DualDialogueParenthetical
                | LineType::DualDialogue
        )
    }

    /// Lines that head an outline element.
    pub fn is_outline_element(self) -> bool {
        matches!(self, LineType::Heading | LineType::Section)
    }

    /// Structural lines that never reach the printed page.
    pub fn is_invisible(self) -> bool {
        matches!(self, LineType::Section | LineType::Synopsis) || self.is_title_page()
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineType {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        LineType::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| ParserError::UnknownLineType(s.to_string()))
    }
}

/// One logical source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: LineId,
    pub(crate) text: String,
    pub(crate) position: usize,
    pub(crate) line_type: LineType,
    pub(crate) section_depth: usize,
    pub(crate) omit_in: bool,
    pub(crate) omit_out: bool,
    pub(crate) omitted: bool,
    pub(crate) forced_scene_number: Option<String>,
    pub(crate) scene_number: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) beats: Vec<Storybeat>,
}

impl Line {
    /// Creates an unclassified line. The parser classifies it before anyone
    /// else gets to see it.
    pub(crate) fn new(id: LineId, text: impl Into<String>, position: usize) -> Self {
        Self {
            id,
            text: text.into(),
            position,
            line_type: LineType::Empty,
            section_depth: 0,
            omit_in: false,
            omit_out: false,
            omitted: false,
            forced_scene_number: None,
            scene_number: None,
            color: None,
            beats: Vec::new(),
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whitespace-only text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Byte range of the line text, newline excluded.
    pub fn text_range(&self) -> Range<usize> {
        self.position..self.position + self.text.len()
    }

    /// Byte range covered by the line including its trailing newline.
    ///
    /// The newline is always counted; callers clamp to the document length
    /// for the final line.
    pub fn range(&self) -> Range<usize> {
        self.position..self.position + self.text.len() + 1
    }

    pub fn line_type(&self) -> LineType {
        self.line_type
    }

    /// Number of leading `#` for sections, 0 for every other type.
    pub fn section_depth(&self) -> usize {
        self.section_depth
    }

    /// The line starts inside an omission (`/* … */`) opened earlier.
    pub fn omit_in(&self) -> bool {
        self.omit_in
    }

    /// An omission is still open at the end of this line.
    pub fn omit_out(&self) -> bool {
        self.omit_out
    }

    /// No visible text remains once omitted regions are taken out.
    pub fn omitted(&self) -> bool {
        self.omitted
    }

    pub fn forced_scene_number(&self) -> Option<&str> {
        self.forced_scene_number.as_deref()
    }

    /// Effective scene number of a heading, forced or automatic.
    pub fn scene_number(&self) -> Option<&str> {
        self.scene_number.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn beats(&self) -> &[Storybeat] {
        &self.beats
    }

    pub fn is_outline_element(&self) -> bool {
        self.line_type.is_outline_element()
    }

    /// Text with notes, omitted regions, forcing markers and the forced
    /// scene number taken out.
    pub fn string_for_display(&self) -> String {
        crate::parsing::kinds::display_text(&self.text, self.line_type, self.omit_in)
    }

    /// Classification state the next line depends on, plus the bits the
    /// outline reads. Two equal states mean nothing downstream can change.
    pub(crate) fn parse_state(&self) -> ParseState {
        ParseState {
            line_type: self.line_type,
            section_depth: self.section_depth,
            omit_in: self.omit_in,
            omit_out: self.omit_out,
            omitted: self.omitted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParseState {
    pub line_type: LineType,
    pub section_depth: usize,
    pub omit_in: bool,
    pub omit_out: bool,
    pub omitted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("synopsis", LineType::Synopsis)]
    #[case("Dual Dialogue", LineType::DualDialogue)]
    #[case("page-break", LineType::PageBreak)]
    #[case(" heading ", LineType::Heading)]
    fn line_type_from_str_accepts_loose_names(#[case] input: &str, #[case] expected: LineType) {
        assert_eq!(input.parse::<LineType>().unwrap(), expected);
    }

    #[test]
    fn line_type_from_str_rejects_unknown_names() {
        let err = "montage".parse::<LineType>().unwrap_err();
        assert!(matches!(err, ParserError::UnknownLineType(name) if name == "montage"));
    }

    #[test]
    fn every_line_type_round_trips_through_its_name() {
        for line_type in LineType::ALL {
            assert_eq!(line_type.to_string().parse::<LineType>().unwrap(), line_type);
        }
    }

    #[test]
    fn line_ranges_include_the_newline() {
        let line = Line::new(LineId::new(), "John enters.", 17);
        assert_eq!(line.text_range(), 17..29);
        assert_eq!(line.range(), 17..30);
    }

    #[test]
    fn line_ids_are_unique() {
        assert_ne!(LineId::new(), LineId::new());
    }
}
