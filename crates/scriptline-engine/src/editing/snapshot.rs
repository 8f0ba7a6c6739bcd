use std::sync::Arc;

use scriptline_config::ParserConfig;

use super::script::ReadOnlyScript;
use crate::outline::OutlineScene;
use crate::parsing::{Line, LineId, StorybeatIndex, TitlePage};

/// Point-in-time view of a parser.
///
/// Shares structure with the parser it came from. Later edits copy on write,
/// so a snapshot never changes and can be handed to other threads.
#[derive(Debug, Clone)]
pub struct ParserSnapshot {
    pub(crate) lines: Arc<Vec<Line>>,
    pub(crate) outline: Arc<Vec<OutlineScene>>,
    pub(crate) title_page: Arc<TitlePage>,
    pub(crate) storybeats: Arc<StorybeatIndex>,
    pub(crate) config: Arc<ParserConfig>,
    pub(crate) version: u64,
}

impl ParserSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn index_of_line(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|l| l.id() == id)
    }

    pub fn line_by_id(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id() == id)
    }

    pub fn index_of_scene(&self, id: LineId) -> Option<usize> {
        self.outline.iter().position(|s| s.line == id)
    }

    pub fn scene_by_id(&self, id: LineId) -> Option<&OutlineScene> {
        self.outline.iter().find(|s| s.line == id)
    }
}

impl ReadOnlyScript for ParserSnapshot {
    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn outline(&self) -> &[OutlineScene] {
        &self.outline
    }

    fn title_page(&self) -> &TitlePage {
        &self.title_page
    }

    fn storybeats(&self) -> &StorybeatIndex {
        &self.storybeats
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn snapshot_is_send_and_sync() {
        assert_send_sync::<ParserSnapshot>();
    }
}
