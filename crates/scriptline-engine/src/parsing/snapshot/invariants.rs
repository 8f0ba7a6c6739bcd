use std::collections::{HashMap, HashSet};

use crate::outline::{OutlineNode, OutlineScene, outline_tree, section_contents};
use crate::parsing::Line;

/// Panics with a description of the first broken invariant.
pub fn check(text: &str, lines: &[Line], outline: &[OutlineScene]) {
    assert!(!lines.is_empty(), "a document always has at least one line");

    let mut expected_pos = 0;
    let mut ids = HashSet::new();
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(
            line.position(),
            expected_pos,
            "line {i} starts at {} but the previous line ends at {expected_pos}",
            line.position()
        );
        assert_eq!(
            text.get(line.text_range()),
            Some(line.text()),
            "line {i} text does not match the document at {:?}",
            line.text_range()
        );
        assert!(ids.insert(line.id()), "line {i} reuses id {}", line.id());
        expected_pos = line.range().end;
    }
    assert_eq!(
        expected_pos,
        text.len() + 1,
        "lines cover {} bytes of a {} byte document",
        expected_pos.saturating_sub(1),
        text.len()
    );

    let index_of: HashMap<_, _> = lines.iter().enumerate().map(|(i, l)| (l.id(), i)).collect();
    let mut previous_end: Option<usize> = None;
    for (k, scene) in outline.iter().enumerate() {
        let Some(&i) = index_of.get(&scene.line) else {
            panic!("outline element {k} points at unknown line {}", scene.line);
        };
        let heading = &lines[i];
        assert!(
            heading.is_outline_element(),
            "outline element {k} points at a {} line",
            heading.line_type()
        );
        assert_eq!(
            scene.start,
            heading.position(),
            "outline element {k} does not start at its heading"
        );
        assert!(
            scene.end() <= text.len(),
            "outline element {k} ends at {} past the document end {}",
            scene.end(),
            text.len()
        );
        if let Some(end) = previous_end {
            assert_eq!(scene.start, end, "outline element {k} is not contiguous");
        }
        assert_eq!(
            heading.scene_number(),
            scene.scene_number.as_deref(),
            "heading line of element {k} has a stale scene number"
        );
        previous_end = Some(scene.end());
    }
    if let Some(end) = previous_end {
        assert_eq!(end, text.len(), "last outline element stops before the end");
    }

    let headings = lines.iter().filter(|l| l.is_outline_element()).count();
    assert_eq!(
        headings,
        outline.len(),
        "{headings} heading lines but {} outline elements",
        outline.len()
    );

    check_nesting(outline);
}

/// Scenes sit at the depth of the latest section, and every tree child lies
/// inside its parent's contents.
fn check_nesting(outline: &[OutlineScene]) {
    let mut enclosing = 0;
    for (k, scene) in outline.iter().enumerate() {
        if scene.is_section() {
            assert!(scene.section_depth > 0, "section {k} has depth 0");
            enclosing = scene.section_depth;
        } else {
            assert_eq!(
                scene.section_depth, enclosing,
                "scene {k} has depth {} inside a depth {enclosing} section",
                scene.section_depth
            );
        }
    }

    fn walk(outline: &[OutlineScene], node: &OutlineNode) {
        let contents = section_contents(outline, node.index);
        for child in &node.children {
            assert!(
                contents.contains(&child.index),
                "element {} is nested under {} but outside its contents {contents:?}",
                child.index,
                node.index
            );
            walk(outline, child);
        }
    }
    for root in outline_tree(outline) {
        walk(outline, &root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use scriptline_config::ParserConfig;

    const NESTED: &str = "# Act\n\n### Cards\n\nINT. A\n\n## Sequence\n\nINT. B\n\n# Act 2\n\nINT. C";

    #[test]
    fn parsed_sections_nest() {
        let parsed = parse_document(NESTED, &ParserConfig::default());
        check(NESTED, &parsed.lines, &parsed.outline);

        let depths: Vec<_> = parsed.outline.iter().map(|s| s.section_depth).collect();
        assert_eq!(depths, vec![1, 3, 3, 2, 2, 1, 1]);
    }

    #[test]
    #[should_panic(expected = "inside a depth 3 section")]
    fn scene_with_stale_depth_is_rejected() {
        let mut parsed = parse_document(NESTED, &ParserConfig::default());
        parsed.outline[2].section_depth = 1;
        check(NESTED, &parsed.lines, &parsed.outline);
    }
}
