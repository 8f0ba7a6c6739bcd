use crate::parsing::kinds::{
    ACTION_FORCE, CENTERED_END, Character, HeadingMeta, LYRICS_FORCE, Omission, SHOT_FORCE,
    SceneHeading, Section, Synopsis, Transition,
};
use crate::parsing::text::lines_with_spans;
use crate::parsing::title_page::TitlePage;
use crate::parsing::{Line, LineId, LineType};

/// What the classifier needs to know about the previous line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    pub line_type: LineType,
    pub omit_out: bool,
}

impl From<&Line> for Lookback {
    fn from(line: &Line) -> Self {
        Self {
            line_type: line.line_type(),
            omit_out: line.omit_out(),
        }
    }
}

/// Result of classifying one line in context.
#[derive(Debug, Clone, PartialEq)]
pub struct LineClass {
    pub line_type: LineType,
    pub section_depth: usize,
    pub omit_in: bool,
    pub omit_out: bool,
    pub omitted: bool,
    /// Present for scene headings only.
    pub heading: Option<HeadingMeta>,
}

/// Classifies screenplay lines.
///
/// Classification is context sensitive: it looks back at the previous line's
/// type and omission state and ahead at whether the next line is blank.
/// `previous == None` means the line opens the document. The same inputs
/// always give the same result.
pub struct ScreenplayLineClassifier;

impl ScreenplayLineClassifier {
    pub fn classify(&self, text: &str, previous: Option<Lookback>, next: Option<&str>) -> LineClass {
        let omit_in = previous.is_some_and(|p| p.omit_out);
        let scan = Omission::scan(text, omit_in);
        let omitted = scan.omitted(text, omit_in);
        let content = Omission::strip_markers(text);

        let next_is_blank = next.is_none_or(|n| Omission::strip_markers(n).trim().is_empty());
        let line_type = if omitted && content.trim().is_empty() {
            LineType::Empty
        } else {
            Self::line_type(&content, previous.map(|p| p.line_type), next_is_blank)
        };

        let section_depth = match line_type {
            LineType::Section => Section::depth(&content),
            _ => 0,
        };
        let heading = (line_type == LineType::Heading).then(|| SceneHeading::metadata(text));

        LineClass {
            line_type,
            section_depth,
            omit_in,
            omit_out: scan.omit_out,
            omitted,
            heading,
        }
    }

    fn line_type(content: &str, previous: Option<LineType>, next_is_blank: bool) -> LineType {
        let t = content.trim();

        // Title page: only at the very start or directly after another field.
        let after_title_page = previous.filter(|p| p.is_title_page());
        if let Some(field) = after_title_page {
            if content.starts_with([' ', '\t']) && !t.is_empty() {
                return field;
            }
        }
        if previous.is_none() || after_title_page.is_some() {
            if let Some((key, _)) = TitlePage::split_field(content) {
                return TitlePage::field_type(key);
            }
        }

        if t.is_empty() {
            return match previous {
                Some(LineType::Dialogue | LineType::Parenthetical) if content.len() >= 2 => {
                    LineType::Dialogue
                }
                Some(LineType::DualDialogue | LineType::DualDialogueParenthetical)
                    if content.len() >= 2 =>
                {
                    LineType::DualDialogue
                }
                _ => LineType::Empty,
            };
        }

        if let Some(forced) = Self::forced_type(t) {
            return forced;
        }

        if let Some(prev) = previous.filter(|p| p.is_dialogue_element()) {
            let dual = prev.is_dual_dialogue_element();
            return match (t.starts_with(Character::EXTENSION), dual) {
                (true, false) => LineType::Parenthetical,
                (true, true) => LineType::DualDialogueParenthetical,
                (false, false) => LineType::Dialogue,
                (false, true) => LineType::DualDialogue,
            };
        }

        if previous.is_none_or(|p| p == LineType::Empty) {
            if SceneHeading::has_heading_prefix(t) {
                return LineType::Heading;
            }
            if Transition::is_transition(t) {
                return LineType::Transition;
            }
            if !next_is_blank {
                match Character::cue(t) {
                    Some(true) => return LineType::DualDialogueCharacter,
                    Some(false) => return LineType::Character,
                    None => {}
                }
            }
        }

        LineType::Action
    }

    fn forced_type(t: &str) -> Option<LineType> {
        let forced = if t.starts_with(SHOT_FORCE) {
            LineType::Shot
        } else if t.starts_with(ACTION_FORCE) {
            LineType::Action
        } else if t.starts_with(Character::FORCE) {
            if Character::is_dual(t) {
                LineType::DualDialogueCharacter
            } else {
                LineType::Character
            }
        } else if t.starts_with(LYRICS_FORCE) {
            LineType::Lyrics
        } else if Synopsis::is_page_break(t) {
            LineType::PageBreak
        } else if t.starts_with(Synopsis::PREFIX) {
            LineType::Synopsis
        } else if t.starts_with(Section::PREFIX) {
            LineType::Section
        } else if SceneHeading::is_forced(t) {
            LineType::Heading
        } else if t.starts_with(Transition::FORCE) {
            if t.len() >= 2 && t.ends_with(CENTERED_END) {
                LineType::Centered
            } else {
                LineType::Transition
            }
        } else {
            return None;
        };
        Some(forced)
    }

    /// Classifies a whole text front to back into fresh lines.
    pub fn classify_text(&self, text: &str) -> Vec<Line> {
        let refs: Vec<_> = lines_with_spans(text).collect();
        let mut lines: Vec<Line> = Vec::with_capacity(refs.len());
        for (i, lr) in refs.iter().enumerate() {
            let previous = lines.last().map(Lookback::from);
            let next = refs.get(i + 1).map(|n| n.text);
            let mut line = Line::new(LineId::new(), lr.text, lr.span.start);
            line.apply_class(self.classify(lr.text, previous, next));
            lines.push(line);
        }
        lines
    }
}

impl Line {
    /// Stores a classification result. The effective scene number is left
    /// for the outline builder to fill in.
    pub(crate) fn apply_class(&mut self, class: LineClass) {
        self.line_type = class.line_type;
        self.section_depth = class.section_depth;
        self.omit_in = class.omit_in;
        self.omit_out = class.omit_out;
        self.omitted = class.omitted;
        self.scene_number = None;
        let meta = class.heading.unwrap_or_default();
        self.forced_scene_number = meta.forced_number;
        self.color = meta.color;
        self.beats = meta.beats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn types(text: &str) -> Vec<LineType> {
        ScreenplayLineClassifier
            .classify_text(text)
            .iter()
            .map(Line::line_type)
            .collect()
    }

    fn after_empty(text: &str, next: Option<&str>) -> LineType {
        let previous = Some(Lookback {
            line_type: LineType::Empty,
            omit_out: false,
        });
        ScreenplayLineClassifier.classify(text, previous, next).line_type
    }

    #[rstest]
    #[case("INT. HOUSE - DAY", None, LineType::Heading)]
    #[case(".DREAM SEQUENCE", None, LineType::Heading)]
    #[case("CUT TO:", None, LineType::Transition)]
    #[case("> FADE OUT", None, LineType::Transition)]
    #[case("> THE END <", None, LineType::Centered)]
    #[case("BOB", Some("Hello."), LineType::Character)]
    #[case("BOB", None, LineType::Action)]
    #[case("BOB", Some(""), LineType::Action)]
    #[case("ALICE ^", Some("Hi."), LineType::DualDialogueCharacter)]
    #[case("@alice", None, LineType::Character)]
    #[case("!INT. NOT A HEADING", None, LineType::Action)]
    #[case("!!CLOSE ON", None, LineType::Shot)]
    #[case("~ la la la", None, LineType::Lyrics)]
    #[case("===", None, LineType::PageBreak)]
    #[case("= a synopsis", None, LineType::Synopsis)]
    #[case("## Act Two", None, LineType::Section)]
    #[case("John runs.", None, LineType::Action)]
    #[case("   ", None, LineType::Empty)]
    fn classify_after_empty_line(
        #[case] text: &str,
        #[case] next: Option<&str>,
        #[case] expected: LineType,
    ) {
        assert_eq!(after_empty(text, next), expected);
    }

    #[test]
    fn dialogue_block() {
        assert_eq!(
            types("\nBOB\n(quietly)\nHello.\n\nJohn leaves."),
            vec![
                LineType::Empty,
                LineType::Character,
                LineType::Parenthetical,
                LineType::Dialogue,
                LineType::Empty,
                LineType::Action,
            ]
        );
    }

    #[test]
    fn dual_dialogue_block() {
        assert_eq!(
            types("\nALICE ^\n(smiling)\nHi."),
            vec![
                LineType::Empty,
                LineType::DualDialogueCharacter,
                LineType::DualDialogueParenthetical,
                LineType::DualDialogue,
            ]
        );
    }

    #[test]
    fn whitespace_line_continues_dialogue() {
        assert_eq!(
            types("\nBOB\nFirst.\n  \nSecond."),
            vec![
                LineType::Empty,
                LineType::Character,
                LineType::Dialogue,
                LineType::Dialogue,
                LineType::Dialogue,
            ]
        );
    }

    #[test]
    fn heading_needs_empty_line_before() {
        assert_eq!(
            types("John runs.\nINT. HOUSE - DAY"),
            vec![LineType::Action, LineType::Action]
        );
    }

    #[test]
    fn title_page_fields_and_continuations() {
        assert_eq!(
            types("Title: Big Fish\nAuthor:\n    John August\n\nINT. HOUSE - DAY"),
            vec![
                LineType::TitlePageTitle,
                LineType::TitlePageAuthor,
                LineType::TitlePageAuthor,
                LineType::Empty,
                LineType::Heading,
            ]
        );
    }

    #[test]
    fn omission_spans_lines() {
        let lines = ScreenplayLineClassifier.classify_text("/*\nINT. HOUSE - DAY\n*/\n");
        let flags: Vec<_> = lines
            .iter()
            .map(|l| (l.line_type(), l.omit_in(), l.omit_out(), l.omitted()))
            .collect();
        assert_eq!(
            flags,
            vec![
                (LineType::Empty, false, true, true),
                (LineType::Heading, true, true, true),
                (LineType::Empty, true, false, true),
                (LineType::Empty, false, false, false),
            ]
        );
    }

    #[test]
    fn heading_metadata_is_attached() {
        let lines = ScreenplayLineClassifier.classify_text("INT. HOUSE #2# [[red]] [[Beat A]]");
        assert_eq!(lines[0].forced_scene_number(), Some("2"));
        assert_eq!(lines[0].color(), Some("red"));
        assert_eq!(lines[0].beats().len(), 1);
    }

    #[test]
    fn section_depth_is_recorded() {
        let lines = ScreenplayLineClassifier.classify_text("### Sequence");
        assert_eq!(lines[0].line_type(), LineType::Section);
        assert_eq!(lines[0].section_depth(), 3);
    }

    #[test]
    fn classification_is_idempotent() {
        let text = "Title: X\n\nINT. HOUSE - DAY\n\nBOB\nHi.\n\n# Act\n= syn\n";
        assert_eq!(types(text), types(text));
    }
}
