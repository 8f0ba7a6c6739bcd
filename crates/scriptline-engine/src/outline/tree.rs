use serde::Serialize;

use super::scene::{OutlineKind, OutlineScene};

/// Node of the nested outline. Holds an index into the flat outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    pub index: usize,
    pub children: Vec<OutlineNode>,
}

/// Parent of every element: the nearest earlier section with a smaller depth
/// for sections, the innermost open section for scenes.
fn parents(outline: &[OutlineScene]) -> Vec<Option<usize>> {
    let mut parents = Vec::with_capacity(outline.len());
    let mut open: Vec<(usize, usize)> = Vec::new();

    for (i, scene) in outline.iter().enumerate() {
        match scene.kind {
            OutlineKind::Section => {
                while open.last().is_some_and(|(depth, _)| *depth >= scene.section_depth) {
                    open.pop();
                }
                parents.push(open.last().map(|(_, p)| *p));
                open.push((scene.section_depth, i));
            }
            OutlineKind::Heading => parents.push(open.last().map(|(_, p)| *p)),
        }
    }
    parents
}

/// Nests the flat outline by section depth.
pub fn outline_tree(outline: &[OutlineScene]) -> Vec<OutlineNode> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); outline.len()];
    let mut roots = Vec::new();
    for (i, parent) in parents(outline).into_iter().enumerate() {
        match parent {
            Some(p) => children[p].push(i),
            None => roots.push(i),
        }
    }

    fn build(index: usize, children: &[Vec<usize>]) -> OutlineNode {
        OutlineNode {
            index,
            children: children[index]
                .iter()
                .map(|&c| build(c, children))
                .collect(),
        }
    }
    roots.into_iter().map(|r| build(r, &children)).collect()
}

/// Indices of everything nested inside the section at `index`.
pub fn section_contents(outline: &[OutlineScene], index: usize) -> std::ops::Range<usize> {
    let Some(section) = outline.get(index).filter(|s| s.is_section()) else {
        return index..index;
    };
    let end = outline[index + 1..]
        .iter()
        .position(|s| s.is_section() && s.section_depth <= section.section_depth)
        .map_or(outline.len(), |offset| index + 1 + offset);
    index + 1..end
}
