use std::collections::HashSet;

use scriptline_config::{ParserConfig, SETTING_PRINT_NOTES};
use serde::{Deserialize, Serialize};

use crate::outline::OutlineScene;
use crate::parsing::kinds::printable_text;
use crate::parsing::{Line, LineId, LineType, TitlePage};

/// A line prepared for print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintLine {
    pub source: LineId,
    pub line_type: LineType,
    pub text: String,
    pub scene_number: Option<String>,
}

/// The printable projection of a screenplay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenplay {
    pub title_page: TitlePage,
    pub lines: Vec<PrintLine>,
}

/// Normalised text for saving.
///
/// Carriage returns are dropped, trailing whitespace is trimmed except on
/// dialogue continuation lines, and the text ends with exactly one newline.
pub fn screenplay_for_saving(lines: &[Line]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let text = line.text().replace('\r', "");
        let continuation = line.is_blank()
            && matches!(
                line.line_type(),
                LineType::Dialogue | LineType::DualDialogue
            );
        if continuation {
            out.push_str(&text);
        } else {
            out.push_str(text.trim_end());
        }
    }
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

/// Types switched off by the host, unknown names skipped with a warning.
pub(crate) fn disabled_types(config: &ParserConfig) -> HashSet<LineType> {
    config
        .disabled_types
        .iter()
        .filter_map(|name| match name.parse::<LineType>() {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("Ignoring disabled type: {e}");
                None
            }
        })
        .collect()
}

/// Position where the boneyard begins, if there is one.
fn boneyard_start(outline: &[OutlineScene]) -> Option<usize> {
    outline.iter().find(|s| s.is_boneyard).map(|s| s.start)
}

/// Whether a line reaches the printed page at all.
pub(crate) fn is_printable(line: &Line, boneyard: Option<usize>, disabled: &HashSet<LineType>) -> bool {
    let t = line.line_type();
    !(line.omitted()
        || t.is_invisible()
        || disabled.contains(&t)
        || boneyard.is_some_and(|start| line.position() >= start))
}

pub fn for_printing(
    lines: &[Line],
    outline: &[OutlineScene],
    title_page: &TitlePage,
    config: &ParserConfig,
) -> Screenplay {
    let keep_notes = config
        .document_settings
        .get_bool(SETTING_PRINT_NOTES)
        .unwrap_or(false);
    let disabled = disabled_types(config);
    let boneyard = boneyard_start(outline);

    let lines = lines
        .iter()
        .filter(|l| is_printable(l, boneyard, &disabled))
        .map(|l| PrintLine {
            source: l.id(),
            line_type: l.line_type(),
            text: printable_text(l.text(), l.line_type(), l.omit_in(), keep_notes),
            scene_number: if config.print_scene_numbers {
                l.scene_number().map(str::to_string)
            } else {
                None
            },
        })
        .collect();

    Screenplay {
        title_page: title_page.clone(),
        lines,
    }
}
