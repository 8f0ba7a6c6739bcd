use serde::Serialize;

use crate::outline::OutlineScene;
use crate::parsing::{Line, LineType};

/// Id-free view of a parse, comparable across parser instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snap {
    pub lines: Vec<LineSnap>,
    pub outline: Vec<SceneSnap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSnap {
    pub line_type: LineType,
    pub position: usize,
    pub text: String,
    pub scene_number: Option<String>,
    pub omitted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnap {
    pub kind: String,
    pub string: String,
    pub scene_number: Option<String>,
    pub span: (usize, usize),
    pub section_depth: usize,
    pub storylines: Vec<String>,
    pub color: Option<String>,
    pub synopsis: Vec<String>,
    pub omitted: bool,
    pub is_boneyard: bool,
    /// Index of the heading line.
    pub line: Option<usize>,
}

pub fn normalize(lines: &[Line], outline: &[OutlineScene]) -> Snap {
    let lines_snap = lines
        .iter()
        .map(|l| LineSnap {
            line_type: l.line_type(),
            position: l.position(),
            text: l.text().to_string(),
            scene_number: l.scene_number().map(str::to_string),
            omitted: l.omitted(),
        })
        .collect();

    let outline_snap = outline
        .iter()
        .map(|s| SceneSnap {
            kind: format!("{:?}", s.kind),
            string: s.string.clone(),
            scene_number: s.scene_number.clone(),
            span: (s.start, s.end()),
            section_depth: s.section_depth,
            storylines: s.storylines.clone(),
            color: s.color.clone(),
            synopsis: s.synopsis.clone(),
            omitted: s.omitted,
            is_boneyard: s.is_boneyard,
            line: lines.iter().position(|l| l.id() == s.line),
        })
        .collect();

    Snap {
        lines: lines_snap,
        outline: outline_snap,
    }
}
