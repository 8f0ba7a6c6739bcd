pub mod character;
pub mod notes;
pub mod omission;
pub mod scene_heading;
pub mod section;

pub use character::{Character, Transition};
pub use notes::{NoteSpan, Notes};
pub use omission::{Omission, OmissionScan};
pub use scene_heading::{HeadingMeta, SceneHeading};
pub use section::{Section, Synopsis};

use crate::parsing::LineType;

pub const SHOT_FORCE: &str = "!!";
pub const ACTION_FORCE: char = '!';
pub const LYRICS_FORCE: char = '~';
pub const CENTERED_END: char = '<';

/// Text of a line as a reader sees it: omitted regions, notes, forcing
/// markers and the forced scene number removed.
///
/// A line that is omitted as a whole keeps its content so outline entries
/// for omitted scenes still have a title.
pub fn display_text(text: &str, line_type: LineType, omit_in: bool) -> String {
    let visible = Omission::visible_text(text, omit_in);
    let base = if visible.trim().is_empty() {
        Omission::strip_markers(text)
    } else {
        visible
    };
    strip_forcing(&Notes::strip(&base), line_type)
}

/// Text of a line for print: omitted regions and forcing markers removed,
/// notes kept only when `keep_notes` is set.
pub fn printable_text(text: &str, line_type: LineType, omit_in: bool, keep_notes: bool) -> String {
    let visible = Omission::visible_text(text, omit_in);
    if keep_notes {
        strip_forcing(&visible, line_type)
    } else {
        strip_forcing(&Notes::strip(&visible), line_type)
    }
}

fn strip_forcing(base: &str, line_type: LineType) -> String {
    let shown = match line_type {
        LineType::Heading => {
            let stripped = SceneHeading::strip_forced_number(base);
            let t = stripped.trim();
            if SceneHeading::is_forced(t) {
                t[1..].trim().to_string()
            } else {
                t.to_string()
            }
        }
        LineType::Section => Section::title(base).to_string(),
        LineType::Synopsis => base.trim().trim_start_matches(Synopsis::PREFIX).to_string(),
        LineType::Character | LineType::DualDialogueCharacter => base
            .trim()
            .trim_start_matches(Character::FORCE)
            .trim_end_matches(Character::DUAL)
            .to_string(),
        LineType::Transition => base.trim().trim_start_matches(Transition::FORCE).to_string(),
        LineType::Centered => base
            .trim()
            .trim_start_matches(Transition::FORCE)
            .trim_end_matches(CENTERED_END)
            .to_string(),
        LineType::Shot => base.trim().trim_start_matches(SHOT_FORCE).to_string(),
        LineType::Action => {
            let t = base.trim();
            t.strip_prefix(ACTION_FORCE).unwrap_or(t).to_string()
        }
        LineType::Lyrics => base.trim().trim_start_matches(LYRICS_FORCE).to_string(),
        _ => base.to_string(),
    };
    shown.trim().to_string()
}
