/// Section headings: `# Act One`, `## Sequence`.
pub struct Section;

impl Section {
    pub const PREFIX: char = '#';
    /// Display title of the section that starts the boneyard.
    pub const BONEYARD: &'static str = "boneyard";

    /// Number of leading `#`, 0 if the line is not a section.
    pub fn depth(text: &str) -> usize {
        text.trim_start()
            .chars()
            .take_while(|c| *c == Self::PREFIX)
            .count()
    }

    pub fn title(text: &str) -> &str {
        text.trim_start().trim_start_matches(Self::PREFIX).trim()
    }

    pub fn is_boneyard(title: &str) -> bool {
        title.trim().eq_ignore_ascii_case(Self::BONEYARD)
    }
}

/// Synopsis lines: `= what happens next`.
pub struct Synopsis;

impl Synopsis {
    pub const PREFIX: char = '=';

    /// Three or more `=` and nothing else.
    pub fn is_page_break(text: &str) -> bool {
        let t = text.trim();
        t.len() >= 3 && t.chars().all(|c| c == Self::PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_counts_hashes() {
        assert_eq!(Section::depth("# Act"), 1);
        assert_eq!(Section::depth("### Beat"), 3);
        assert_eq!(Section::depth("Act"), 0);
    }

    #[test]
    fn boneyard_title_is_case_insensitive() {
        assert!(Section::is_boneyard(Section::title("# BoneYard ")));
        assert!(!Section::is_boneyard(Section::title("# Bones")));
    }

    #[test]
    fn page_break_needs_three_equals() {
        assert!(Synopsis::is_page_break("==="));
        assert!(Synopsis::is_page_break("=====  "));
        assert!(!Synopsis::is_page_break("=="));
        assert!(!Synopsis::is_page_break("=== end"));
    }
}
