use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::scene::{OutlineKind, OutlineScene};
use crate::parsing::LineId;

/// What happened to the outline during one edit.
///
/// Elements are identified by their heading line id. Moving an element
/// without changing it is not reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineChanges {
    pub added: BTreeSet<LineId>,
    pub removed: BTreeSet<LineId>,
    pub updated: BTreeSet<LineId>,
    /// The change could not be described locally; consumers should reload
    /// the whole outline.
    pub needs_full_update: bool,
}

impl OutlineChanges {
    pub fn full_update() -> Self {
        Self {
            needs_full_update: true,
            ..Self::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.needs_full_update
            || !self.added.is_empty()
            || !self.removed.is_empty()
            || !self.updated.is_empty()
    }

    /// Folds a later change set into this one.
    pub fn merge(&mut self, later: OutlineChanges) {
        for id in later.added {
            self.removed.remove(&id);
            self.added.insert(id);
        }
        for id in later.removed {
            if !self.added.remove(&id) {
                self.removed.insert(id);
            }
            self.updated.remove(&id);
        }
        for id in later.updated {
            if !self.added.contains(&id) {
                self.updated.insert(id);
            }
        }
        self.needs_full_update |= later.needs_full_update;
    }
}

/// Compares an old outline span to its rebuilt version.
///
/// A section appearing, disappearing or changing depth moves the nesting of
/// everything after it, so it asks for a full update.
pub fn diff_outline(old: &[OutlineScene], new: &[OutlineScene]) -> OutlineChanges {
    let mut changes = OutlineChanges::default();
    let old_by_id: HashMap<LineId, &OutlineScene> = old.iter().map(|s| (s.line, s)).collect();
    let new_by_id: HashMap<LineId, &OutlineScene> = new.iter().map(|s| (s.line, s)).collect();

    for scene in new {
        match old_by_id.get(&scene.line) {
            None => {
                changes.added.insert(scene.line);
                if scene.kind == OutlineKind::Section {
                    changes.needs_full_update = true;
                }
            }
            Some(before) => {
                if before.kind != scene.kind
                    || (scene.is_section() && before.section_depth != scene.section_depth)
                {
                    changes.needs_full_update = true;
                }
                if !before.same_content(scene) {
                    changes.updated.insert(scene.line);
                }
            }
        }
    }
    for scene in old {
        if !new_by_id.contains_key(&scene.line) {
            changes.removed.insert(scene.line);
            if scene.kind == OutlineKind::Section {
                changes.needs_full_update = true;
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(name: &str) -> OutlineScene {
        let mut s = OutlineScene::new(LineId::new(), OutlineKind::Heading);
        s.string = name.to_string();
        s
    }

    fn section(name: &str, depth: usize) -> OutlineScene {
        let mut s = OutlineScene::new(LineId::new(), OutlineKind::Section);
        s.string = name.to_string();
        s.section_depth = depth;
        s
    }

    #[test]
    fn identical_spans_have_no_changes() {
        let old = vec![heading("A"), heading("B")];
        let changes = diff_outline(&old, &old.clone());
        assert!(!changes.has_changes());
    }

    #[test]
    fn shifted_scene_is_not_updated() {
        let old = vec![heading("A")];
        let mut new = old.clone();
        new[0].start += 10;
        new[0].length += 3;
        assert!(!diff_outline(&old, &new).has_changes());
    }

    #[test]
    fn renamed_scene_is_updated() {
        let old = vec![heading("A")];
        let mut new = old.clone();
        new[0].string = "A2".into();
        let changes = diff_outline(&old, &new);
        assert_eq!(changes.updated, BTreeSet::from([old[0].line]));
        assert!(!changes.needs_full_update);
    }

    #[test]
    fn added_and_removed_scenes() {
        let old = vec![heading("A"), heading("B")];
        let new = vec![old[0].clone(), heading("C")];
        let changes = diff_outline(&old, &new);
        assert_eq!(changes.added, BTreeSet::from([new[1].line]));
        assert_eq!(changes.removed, BTreeSet::from([old[1].line]));
        assert!(!changes.needs_full_update);
    }

    #[test]
    fn section_changes_need_full_update() {
        let old = vec![heading("A")];
        let new = vec![section("Act", 1), old[0].clone()];
        assert!(diff_outline(&old, &new).needs_full_update);
        assert!(diff_outline(&new, &old).needs_full_update);

        let mut deeper = new.clone();
        deeper[0].section_depth = 2;
        assert!(diff_outline(&new, &deeper).needs_full_update);
    }

    #[test]
    fn merge_cancels_add_then_remove() {
        let id = LineId::new();
        let mut first = OutlineChanges::default();
        first.added.insert(id);
        let mut second = OutlineChanges::default();
        second.removed.insert(id);

        first.merge(second);
        assert!(!first.has_changes());
    }
}
