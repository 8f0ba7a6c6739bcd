use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::outline::OutlineScene;
use crate::parsing::LineId;
use crate::parsing::text::Span;

/// A storyline tag on a scene heading, e.g. `[[Beat A: they meet]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Storybeat {
    /// Upper-cased storyline label.
    pub storyline: String,
    /// Optional description of what happens to the storyline here.
    pub beat: Option<String>,
    /// Byte range of the note inside the heading line.
    pub range: Span,
}

/// One occurrence of a storyline in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatRef {
    /// Heading line of the scene carrying the tag.
    pub scene: LineId,
    pub beat: Storybeat,
}

/// Storyline label to its occurrences, in outline order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorybeatIndex {
    by_storyline: BTreeMap<String, Vec<BeatRef>>,
}

impl StorybeatIndex {
    pub fn from_outline(outline: &[OutlineScene]) -> Self {
        let mut index = Self::default();
        for scene in outline {
            index.push_scene(scene);
        }
        index
    }

    fn push_scene(&mut self, scene: &OutlineScene) {
        for beat in &scene.beats {
            self.by_storyline
                .entry(beat.storyline.clone())
                .or_default()
                .push(BeatRef {
                    scene: scene.line,
                    beat: beat.clone(),
                });
        }
    }

    /// Replaces the entries of a repaired outline span.
    ///
    /// `removed` are the heading ids of the old span, `inserted` the rebuilt
    /// scenes and `outline` the outline after the splice, used to restore
    /// outline order for every label that was touched.
    pub fn replace_span(
        &mut self,
        removed: &[LineId],
        inserted: &[OutlineScene],
        outline: &[OutlineScene],
    ) {
        let removed: HashSet<LineId> = removed.iter().copied().collect();
        let mut touched: HashSet<String> = HashSet::new();

        for (label, refs) in self.by_storyline.iter_mut() {
            let before = refs.len();
            refs.retain(|r| !removed.contains(&r.scene));
            if refs.len() != before {
                touched.insert(label.clone());
            }
        }
        for scene in inserted {
            touched.extend(scene.beats.iter().map(|b| b.storyline.clone()));
            self.push_scene(scene);
        }

        if !touched.is_empty() {
            let order: HashMap<LineId, usize> = outline
                .iter()
                .enumerate()
                .map(|(i, s)| (s.line, i))
                .collect();
            for label in &touched {
                if let Some(refs) = self.by_storyline.get_mut(label) {
                    refs.sort_by_key(|r| order.get(&r.scene).copied().unwrap_or(usize::MAX));
                }
            }
        }
        self.by_storyline.retain(|_, refs| !refs.is_empty());
    }

    /// Every storyline label, sorted.
    pub fn storylines(&self) -> impl Iterator<Item = &str> {
        self.by_storyline.keys().map(String::as_str)
    }

    pub fn beats_for(&self, storyline: &str) -> &[BeatRef] {
        self.by_storyline
            .get(&storyline.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Heading ids of the scenes tagged with `storyline`, in outline order.
    pub fn scenes_for(&self, storyline: &str) -> Vec<LineId> {
        let mut seen = HashSet::new();
        self.beats_for(storyline)
            .iter()
            .filter(|r| seen.insert(r.scene))
            .map(|r| r.scene)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_storyline.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_storyline.len()
    }
}
