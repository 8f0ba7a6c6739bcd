use scriptline_config::ParserConfig;

use super::scene::{OutlineKind, OutlineScene, OutlineState};
use crate::parsing::kinds::Section;
use crate::parsing::{Line, LineType};

/// Outline elements built from a run of lines.
#[derive(Debug, Clone, Default)]
pub struct BuiltOutline {
    pub scenes: Vec<OutlineScene>,
    /// Line index of each element's heading, parallel to `scenes`.
    pub heading_indices: Vec<usize>,
    /// State after the last element.
    pub state: OutlineState,
}

/// Builds outline elements from lines pushed in document order.
///
/// The builder can start anywhere in the document: [`OutlineBuilder::resume`]
/// takes the state after the element before the first pushed line.
pub struct OutlineBuilder<'c> {
    config: &'c ParserConfig,
    state: OutlineState,
    open: Option<OutlineScene>,
    out: BuiltOutline,
}

impl<'c> OutlineBuilder<'c> {
    pub fn new(config: &'c ParserConfig) -> Self {
        Self::resume(OutlineState::default(), config)
    }

    pub fn resume(state: OutlineState, config: &'c ParserConfig) -> Self {
        Self {
            config,
            state,
            open: None,
            out: BuiltOutline::default(),
        }
    }

    pub fn push(&mut self, index: usize, line: &Line) {
        if line.is_outline_element() {
            self.close(line.position());
            self.open_element(index, line);
            return;
        }

        let Some(scene) = self.open.as_mut() else {
            return;
        };
        if line.line_type() == LineType::Synopsis {
            scene.synopsis.push(line.string_for_display());
        }
        scene.no_omit_out = !line.omit_out();
    }

    /// Closes the last element at `end`, the byte offset where the run stops.
    pub fn finish(mut self, end: usize) -> BuiltOutline {
        self.close(end);
        self.out.state = self.state;
        self.out
    }

    fn close(&mut self, end: usize) {
        if let Some(mut scene) = self.open.take() {
            scene.length = end.saturating_sub(scene.start);
            self.out.scenes.push(scene);
        }
    }

    fn open_element(&mut self, index: usize, line: &Line) {
        let kind = match line.line_type() {
            LineType::Section => OutlineKind::Section,
            _ => OutlineKind::Heading,
        };
        let mut scene = OutlineScene::new(line.id(), kind);
        scene.string = line.string_for_display();
        scene.start = line.position();
        scene.omitted = line.omitted();
        scene.no_omit_in = !line.omit_in();
        scene.no_omit_out = !line.omit_out();

        match kind {
            OutlineKind::Section => {
                self.state.section_depth = line.section_depth();
                if Section::is_boneyard(&scene.string) {
                    self.state.in_boneyard = true;
                }
                scene.section_depth = line.section_depth();
            }
            OutlineKind::Heading => {
                scene.section_depth = self.state.section_depth;
                scene.color = line.color().map(str::to_string);
                scene.beats = line.beats().to_vec();
                for beat in &scene.beats {
                    if !scene.storylines.contains(&beat.storyline) {
                        scene.storylines.push(beat.storyline.clone());
                    }
                }
                scene.scene_number = self.number_for(line);
            }
        }
        scene.is_boneyard = self.state.in_boneyard;
        scene.state_after = self.state;

        self.out.heading_indices.push(index);
        self.open = Some(scene);
    }

    fn number_for(&mut self, line: &Line) -> Option<String> {
        if line.omitted() || self.state.in_boneyard {
            return None;
        }
        if let Some(forced) = line.forced_scene_number() {
            return Some(forced.to_string());
        }
        let number = self.config.scene_numbering_starts_from + self.state.counter;
        self.state.counter += 1;
        Some(number.to_string())
    }
}

/// Builds the outline of a whole line sequence.
pub fn build_outline(lines: &[Line], end: usize, config: &ParserConfig) -> BuiltOutline {
    let mut builder = OutlineBuilder::new(config);
    for (i, line) in lines.iter().enumerate() {
        builder.push(i, line);
    }
    builder.finish(end)
}
