use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parsing::{Line, LineType, classify::ScreenplayLineClassifier};

/// Title-page metadata: ordered `key → value lines`.
///
/// Keys keep the spelling used in the document. Lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePage {
    fields: Vec<(String, Vec<String>)>,
}

fn field_regex() -> &'static Regex {
    static FIELD_RE: OnceLock<Regex> = OnceLock::new();
    FIELD_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9 _\-]*):(.*)$").expect("Invalid title page regex")
    })
}

impl TitlePage {
    /// Indentation used for continuation values when rendering.
    pub const INDENT: &'static str = "    ";

    /// Splits a `key: value` line.
    pub fn split_field(text: &str) -> Option<(&str, &str)> {
        let caps = field_regex().captures(text)?;
        Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
    }

    /// Line type of a field by its key.
    pub fn field_type(key: &str) -> LineType {
        match key.trim().to_lowercase().as_str() {
            "title" => LineType::TitlePageTitle,
            "credit" => LineType::TitlePageCredit,
            "author" | "authors" => LineType::TitlePageAuthor,
            "source" => LineType::TitlePageSource,
            "draft date" => LineType::TitlePageDraftDate,
            "contact" => LineType::TitlePageContact,
            _ => LineType::TitlePageUnknown,
        }
    }

    /// Builds the title page from the leading title-page lines.
    ///
    /// Returns the title page and the number of lines it spans.
    pub fn from_lines(lines: &[Line]) -> (Self, usize) {
        let mut page = TitlePage::default();
        let mut consumed = 0;

        for line in lines {
            if !line.line_type().is_title_page() {
                break;
            }
            consumed += 1;
            let text = line.text();
            let is_continuation = text.starts_with([' ', '\t']) && !page.fields.is_empty();
            match (is_continuation, Self::split_field(text)) {
                (false, Some((key, value))) => {
                    let values = if value.is_empty() {
                        Vec::new()
                    } else {
                        vec![value.to_string()]
                    };
                    page.fields.push((key.to_string(), values));
                }
                _ => {
                    if let Some((_, values)) = page.fields.last_mut() {
                        values.push(text.trim().to_string());
                    }
                }
            }
        }
        (page, consumed)
    }

    /// Parses the title page at the start of a free-standing string.
    pub fn parse(text: &str) -> Self {
        let classifier = ScreenplayLineClassifier;
        let lines = classifier.classify_text(text);
        Self::from_lines(&lines).0
    }

    /// Renders the title page back to screenplay markup.
    pub fn to_fountain(&self) -> String {
        let mut out = String::new();
        for (key, values) in &self.fields {
            match values.as_slice() {
                [single] => out.push_str(&format!("{key}: {single}\n")),
                many => {
                    out.push_str(&format!("{key}:\n"));
                    for value in many {
                        out.push_str(Self::INDENT);
                        out.push_str(value);
                        out.push('\n');
                    }
                }
            }
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
            .map(|(_, v)| v.as_slice())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")?.first().map(String::as_str)
    }

    pub fn fields(&self) -> &[(String, Vec<String>)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
