use std::collections::HashMap;

use crate::outline::OutlineScene;
use crate::parsing::{Line, LineId};

/// Id → index maps for lines and outline elements.
///
/// Each map is built on the first lookup after an invalidation and dropped
/// again when the structure it indexes changes.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    lines: Option<HashMap<LineId, usize>>,
    scenes: Option<HashMap<LineId, usize>>,
}

impl IdentityCache {
    pub fn invalidate(&mut self) {
        self.invalidate_lines();
        self.invalidate_scenes();
    }

    pub fn invalidate_lines(&mut self) {
        self.lines = None;
    }

    pub fn invalidate_scenes(&mut self) {
        self.scenes = None;
    }

    pub fn line_index(&mut self, lines: &[Line], id: LineId) -> Option<usize> {
        self.lines
            .get_or_insert_with(|| lines.iter().enumerate().map(|(i, l)| (l.id(), i)).collect())
            .get(&id)
            .copied()
    }

    pub fn scene_index(&mut self, outline: &[OutlineScene], id: LineId) -> Option<usize> {
        self.scenes
            .get_or_insert_with(|| outline.iter().enumerate().map(|(i, s)| (s.line, i)).collect())
            .get(&id)
            .copied()
    }

    pub fn lines_cached(&self) -> bool {
        self.lines.is_some()
    }

    pub fn scenes_cached(&self) -> bool {
        self.scenes.is_some()
    }
}
