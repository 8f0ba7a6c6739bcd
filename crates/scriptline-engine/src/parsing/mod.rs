pub mod classify;
pub mod kinds;
pub mod line;
pub mod snapshot;
pub mod storybeats;
pub mod text;
pub mod title_page;

use scriptline_config::ParserConfig;

pub use classify::{LineClass, Lookback, ScreenplayLineClassifier};
pub use line::{Line, LineId, LineType};
pub use storybeats::{BeatRef, Storybeat, StorybeatIndex};
pub use title_page::TitlePage;

use crate::outline::{BuiltOutline, OutlineScene, build_outline};

/// Everything derived from a full pass over a document.
#[derive(Debug)]
pub struct ParsedScript {
    pub lines: Vec<Line>,
    pub outline: Vec<OutlineScene>,
    pub title_page: TitlePage,
    /// Number of leading lines that make up the title page.
    pub title_page_len: usize,
    pub storybeats: StorybeatIndex,
}

/// Parses a complete document with fresh line ids.
pub fn parse_document(text: &str, config: &ParserConfig) -> ParsedScript {
    let lines = ScreenplayLineClassifier.classify_text(text);
    derive_structure(lines, text.len(), config)
}

/// Derives the outline, title page and storylines for classified lines.
pub(crate) fn derive_structure(
    mut lines: Vec<Line>,
    text_len: usize,
    config: &ParserConfig,
) -> ParsedScript {
    let built = build_outline(&lines, text_len, config);
    apply_scene_numbers(&mut lines, &built);
    let (title_page, title_page_len) = TitlePage::from_lines(&lines);
    let storybeats = StorybeatIndex::from_outline(&built.scenes);

    ParsedScript {
        lines,
        outline: built.scenes,
        title_page,
        title_page_len,
        storybeats,
    }
}

/// Copies effective scene numbers from outline elements onto their headings.
pub(crate) fn apply_scene_numbers(lines: &mut [Line], built: &BuiltOutline) {
    for (scene, &index) in built.scenes.iter().zip(&built.heading_indices) {
        if let Some(line) = lines.get_mut(index) {
            line.scene_number = scene.scene_number.clone();
        }
    }
}
