/// Character cues: an all-caps name, optionally with an extension in
/// parentheses and a trailing `^` for the right side of dual dialogue.
pub struct Character;

/// Transitions: all-caps text ending in `TO:`, or forced with `>`.
pub struct Transition;

/// True when every letter is uppercase and at least one letter exists.
fn is_all_caps(s: &str) -> bool {
    s.chars().any(char::is_alphabetic) && !s.chars().any(char::is_lowercase)
}

impl Character {
    pub const FORCE: char = '@';
    pub const DUAL: char = '^';
    pub const EXTENSION: char = '(';

    /// Returns `Some(is_dual)` if `text` reads as a cue.
    ///
    /// Only the name part before any extension has to be upper case, so
    /// `BOB (cont'd)` is still a cue.
    pub fn cue(text: &str) -> Option<bool> {
        let t = text.trim();
        if t.is_empty() || t.starts_with(Self::EXTENSION) {
            return None;
        }
        let dual = t.ends_with(Self::DUAL);
        let name = t
            .split(Self::EXTENSION)
            .next()
            .unwrap_or(t)
            .trim_end_matches(Self::DUAL)
            .trim();
        is_all_caps(name).then_some(dual)
    }

    /// Dual marker on a forced cue (`@bob ^`).
    pub fn is_dual(text: &str) -> bool {
        text.trim_end().ends_with(Self::DUAL)
    }
}

impl Transition {
    pub const FORCE: char = '>';
    pub const SUFFIX: &'static str = "TO:";

    pub fn is_transition(text: &str) -> bool {
        let t = text.trim();
        t.ends_with(Self::SUFFIX) && is_all_caps(t)
    }
}
