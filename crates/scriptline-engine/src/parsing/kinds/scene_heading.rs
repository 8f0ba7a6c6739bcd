use std::sync::OnceLock;

use regex::Regex;

use super::notes::Notes;
use crate::parsing::storybeats::Storybeat;

/// Scene headings: `INT. HOUSE - DAY`, `.FORCED HEADING`, with an optional
/// trailing forced scene number `#12A#`.
pub struct SceneHeading;

/// Metadata carried by a scene heading line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingMeta {
    pub forced_number: Option<String>,
    pub color: Option<String>,
    pub beats: Vec<Storybeat>,
}

fn heading_regex() -> &'static Regex {
    static HEADING_RE: OnceLock<Regex> = OnceLock::new();
    HEADING_RE.get_or_init(|| {
        Regex::new(r"(?i)^(INT\.?/EXT|INT|EXT|EST|I/E|E/I)[\.\s]").expect("Invalid heading regex")
    })
}

fn forced_number_regex() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| Regex::new(r"#([^#\n]+)#\s*$").expect("Invalid scene number regex"))
}

impl SceneHeading {
    pub const FORCE: char = '.';

    /// Recognises the conventional heading prefixes.
    pub fn has_heading_prefix(text: &str) -> bool {
        heading_regex().is_match(text.trim_start())
    }

    /// `.HEADING`, but not an ellipsis.
    pub fn is_forced(text: &str) -> bool {
        let t = text.trim_start();
        t.len() > 1 && t.starts_with(Self::FORCE) && !t[1..].starts_with(Self::FORCE)
    }

    /// Forced scene number, looked up after notes are removed.
    pub fn forced_number(text: &str) -> Option<String> {
        let stripped = Notes::strip(text);
        let caps = forced_number_regex().captures(&stripped)?;
        let number = caps.get(1)?.as_str().trim();
        (!number.is_empty()).then(|| number.to_string())
    }

    pub fn strip_forced_number(text: &str) -> String {
        forced_number_regex().replace(text, "").into_owned()
    }

    pub fn metadata(text: &str) -> HeadingMeta {
        HeadingMeta {
            forced_number: Self::forced_number(text),
            color: Notes::color(text),
            beats: Notes::storybeats(text),
        }
    }
}
