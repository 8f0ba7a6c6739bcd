use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::storybeats::Storybeat;
use crate::parsing::text::Span;

/// Inline notes: `[[…]]`.
///
/// Notes on a scene heading carry its color and storyline tags.
pub struct Notes;

/// Color names recognised without the `COLOR` keyword.
pub const KNOWN_COLORS: &[&str] = &[
    "red", "blue", "green", "pink", "magenta", "gray", "grey", "purple", "yellow", "cyan", "teal",
    "orange", "brown",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteSpan {
    /// Whole note including the brackets.
    pub full: Span,
    /// Note content between the brackets.
    pub inner: Span,
}

fn note_regex() -> &'static Regex {
    static NOTE_RE: OnceLock<Regex> = OnceLock::new();
    NOTE_RE.get_or_init(|| Regex::new(r"\[\[(.*?)\]\]").expect("Invalid note regex"))
}

impl Notes {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";

    pub fn spans(text: &str) -> Vec<NoteSpan> {
        note_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let inner = caps.get(1)?;
                Some(NoteSpan {
                    full: Span::new(full.start(), full.end()),
                    inner: Span::new(inner.start(), inner.end()),
                })
            })
            .collect()
    }

    pub fn strip(text: &str) -> String {
        note_regex().replace_all(text, "").into_owned()
    }

    /// First color note in `text`, lowercased.
    pub fn color(text: &str) -> Option<String> {
        Self::spans(text)
            .into_iter()
            .find_map(|n| Self::color_of(n.inner.slice(text)))
    }

    fn color_of(note: &str) -> Option<String> {
        let note = note.trim().to_lowercase();
        if let Some(rest) = note.strip_prefix("color ") {
            let rest = rest.trim();
            return (!rest.is_empty()).then(|| rest.to_string());
        }
        KNOWN_COLORS.contains(&note.as_str()).then_some(note)
    }

    /// Storyline tags in `text`: `[[Beat A, B]]`, `[[Storyline A]]` or
    /// `[[Beat A: what happens]]`.
    pub fn storybeats(text: &str) -> Vec<Storybeat> {
        let mut beats = Vec::new();
        for note in Self::spans(text) {
            let Some((labels, description)) = Self::beat_tag(note.inner.slice(text)) else {
                continue;
            };
            for storyline in labels {
                beats.push(Storybeat {
                    storyline,
                    beat: description.clone(),
                    range: note.full,
                });
            }
        }
        beats
    }

    fn beat_tag(note: &str) -> Option<(Vec<String>, Option<String>)> {
        let trimmed = note.trim();
        let keyword_len = ["storyline", "beat"]
            .into_iter()
            .find(|k| {
                trimmed
                    .get(..k.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(k))
            })?
            .len();

        let rest = &trimmed[keyword_len..];
        if !rest.starts_with(|c: char| c == ':' || c.is_whitespace()) {
            return None;
        }
        let rest = rest.trim_start();
        let rest = rest.strip_prefix(':').unwrap_or(rest);

        let (labels, description) = match rest.split_once(':') {
            Some((labels, description)) => (labels, Some(description.trim())),
            None => (rest, None),
        };
        let labels: Vec<String> = labels
            .split(',')
            .map(|l| l.trim().to_uppercase())
            .filter(|l| !l.is_empty())
            .collect();
        if labels.is_empty() {
            return None;
        }
        let description = description.filter(|d| !d.is_empty()).map(str::to_string);
        Some((labels, description))
    }
}
