use crate::parsing::text::Span;

/// Omitted (boneyard comment) regions: `/* … */`, possibly spanning lines.
///
/// All omission syntax knowledge lives here; the classifier and the display
/// helpers only ask for the scan result.
pub struct Omission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmissionScan {
    /// Byte spans of the line text that are outside any omitted region.
    pub visible: Vec<Span>,
    /// Whether an omission is still open at the end of the line.
    pub omit_out: bool,
    /// Whether the line contains an opening marker.
    pub has_open: bool,
}

impl Omission {
    pub const OPEN: &'static str = "/*";
    pub const CLOSE: &'static str = "*/";

    /// Scans `text`, starting inside an omission when `omit_in` is set.
    pub fn scan(text: &str, omit_in: bool) -> OmissionScan {
        let b = text.as_bytes();
        let mut inside = omit_in;
        let mut visible = Vec::new();
        let mut has_open = false;
        let mut vis_start = 0usize;
        let mut i = 0usize;

        while i < b.len() {
            let rest = &b[i..];
            if !inside && rest.starts_with(Self::OPEN.as_bytes()) {
                if i > vis_start {
                    visible.push(Span::new(vis_start, i));
                }
                inside = true;
                has_open = true;
                i += 2;
            } else if inside && rest.starts_with(Self::CLOSE.as_bytes()) {
                inside = false;
                i += 2;
                vis_start = i;
            } else {
                i += 1;
            }
        }
        if !inside && vis_start < b.len() {
            visible.push(Span::new(vis_start, b.len()));
        }

        OmissionScan {
            visible,
            omit_out: inside,
            has_open,
        }
    }

    /// Text left once omitted regions are removed.
    pub fn visible_text(text: &str, omit_in: bool) -> String {
        Self::scan(text, omit_in)
            .visible
            .iter()
            .map(|sp| sp.slice(text))
            .collect()
    }

    /// Text with the markers removed but the omitted content kept.
    pub fn strip_markers(text: &str) -> String {
        text.replace(Self::OPEN, "").replace(Self::CLOSE, "")
    }
}

impl OmissionScan {
    /// A line is omitted when nothing visible remains and it was touched by
    /// an omission at all.
    pub fn omitted(&self, text: &str, omit_in: bool) -> bool {
        let nothing_visible = self.visible.iter().all(|sp| sp.slice(text).trim().is_empty());
        nothing_visible && (omit_in || self.has_open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_fully_visible() {
        let scan = Omission::scan("John waits.", false);
        assert_eq!(scan.visible, vec![Span::new(0, 11)]);
        assert!(!scan.omit_out);
        assert!(!scan.omitted("John waits.", false));
    }

    #[test]
    fn inline_omission_is_cut_out() {
        assert_eq!(Omission::visible_text("John /* quietly */waits.", false), "John waits.");
    }

    #[test]
    fn open_marker_carries_to_next_line() {
        let scan = Omission::scan("/* cut", false);
        assert!(scan.omit_out);
        assert!(scan.omitted("/* cut", false));
    }

    #[test]
    fn line_inside_omission_is_omitted() {
        let scan = Omission::scan("INT. HOUSE - DAY", true);
        assert!(scan.visible.is_empty());
        assert!(scan.omit_out);
        assert!(scan.omitted("INT. HOUSE - DAY", true));
    }

    #[test]
    fn close_marker_ends_omission() {
        let scan = Omission::scan("end */ back", true);
        assert!(!scan.omit_out);
        assert_eq!(Omission::visible_text("end */ back", true), " back");
        assert!(!scan.omitted("end */ back", true));
    }

    #[test]
    fn blank_line_outside_omission_is_not_omitted() {
        assert!(!Omission::scan("", false).omitted("", false));
    }
}
