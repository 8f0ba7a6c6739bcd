use pretty_assertions::assert_eq;
use scriptline_engine::editing::{Parser, ReadOnlyScript};
use scriptline_engine::outline::OutlineKind;
use scriptline_engine::parsing::{LineType, snapshot};

const HOUSE: &str = "INT. HOUSE - DAY\nJohn enters.\n";

fn numbers(parser: &Parser) -> Vec<Option<String>> {
    parser
        .outline()
        .iter()
        .map(|s| s.scene_number.clone())
        .collect()
}

fn assert_consistent(parser: &Parser) {
    snapshot::invariants(&parser.raw_text(), parser.lines(), parser.outline());
}

#[test]
fn single_scene_spans_its_lines() {
    let parser = Parser::new(HOUSE);

    assert_eq!(parser.line_type_at(0), Some(LineType::Heading));
    assert_eq!(parser.line_type_at(1), Some(LineType::Action));
    assert_eq!(parser.lines()[0].scene_number(), Some("1"));

    let outline = parser.outline();
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].start, 0);
    assert_eq!(outline[0].end(), HOUSE.len());
    assert_eq!(parser.lines_for_scene(&outline[0]).len(), 3);
    assert_consistent(&parser);
}

#[test]
fn inserting_a_heading_reports_one_added_scene() {
    let mut parser = Parser::new(HOUSE);
    let patch = parser.parse_change(HOUSE.len()..HOUSE.len(), "\nEXT. STREET - NIGHT\n");
    let changes = &patch.outline_changes;

    assert_eq!(changes.added.len(), 1);
    assert!(changes.removed.is_empty());
    assert!(changes.updated.is_empty());
    assert!(!changes.needs_full_update);

    let added = *changes.added.iter().next().unwrap();
    let scene = parser.scene_by_id(added).unwrap();
    assert_eq!(scene.string, "EXT. STREET - NIGHT");
    assert_eq!(numbers(&parser), vec![Some("1".into()), Some("2".into())]);
    assert_consistent(&parser);
}

#[test]
fn renaming_a_heading_updates_the_same_scene() {
    let mut parser = Parser::new(HOUSE);
    let heading = parser.lines()[0].id();
    let patch = parser.parse_change(5..10, "APARTMENT");
    let changes = &patch.outline_changes;

    assert!(changes.added.is_empty());
    assert!(changes.removed.is_empty());
    assert_eq!(changes.updated.iter().collect::<Vec<_>>(), vec![&heading]);
    assert_eq!(parser.outline()[0].string, "INT. APARTMENT - DAY");
    assert_eq!(parser.outline()[0].line, heading);
}

#[test]
fn leading_title_page_is_extracted() {
    let parser = Parser::new(&format!("Title: Sample\n\n{HOUSE}"));

    assert!(parser.has_title_page());
    assert_eq!(
        parser.title_page().fields(),
        &[("Title".to_string(), vec!["Sample".to_string()])]
    );
    assert_eq!(parser.line_type_at(0), Some(LineType::TitlePageTitle));
    assert_eq!(parser.outline().len(), 1);
}

#[test]
fn deleting_a_scene_that_renumbers_others_forces_full_update() {
    let text = "INT. A\n\nJohn.\n\nINT. B\n\nMary.\n\nINT. C\n\nBob.\n\nINT. D\n\nSue.";
    let mut parser = Parser::new(text);
    let b = parser.outline()[1].clone();

    let patch = parser.parse_change(b.range(), "");
    let changes = &patch.outline_changes;

    assert!(changes.needs_full_update);
    assert!(changes.removed.contains(&b.line));
    assert_eq!(
        numbers(&parser),
        vec![Some("1".into()), Some("2".into()), Some("3".into())]
    );
    assert_consistent(&parser);
}

#[test]
fn deleting_the_last_scene_is_a_local_removal() {
    let text = "INT. A\n\nJohn.\n\nINT. B\n\nMary.";
    let mut parser = Parser::new(text);
    let b = parser.outline()[1].clone();

    let patch = parser.parse_change(b.range(), "");
    let changes = &patch.outline_changes;

    assert!(!changes.needs_full_update);
    assert_eq!(changes.removed.iter().collect::<Vec<_>>(), vec![&b.line]);
    assert!(changes.added.is_empty());
    assert_consistent(&parser);
}

#[test]
fn adding_a_section_forces_full_update() {
    let mut parser = Parser::new("INT. A\n\nJohn.\n\nINT. B");
    let patch = parser.parse_change(0..0, "# Act One\n\n");

    assert!(patch.outline_changes.needs_full_update);
    assert_eq!(parser.outline()[0].kind, OutlineKind::Section);
    assert_eq!(parser.outline()[1].section_depth, 1);
    assert_consistent(&parser);
}

#[test]
fn fixture_night_shift() {
    let text = std::fs::read_to_string(format!(
        "{}/tests/fixtures/night_shift.fountain",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let parser = Parser::new(&text);
    assert_consistent(&parser);

    assert_eq!(parser.title_page().title(), Some("Night Shift"));
    assert_eq!(
        parser.title_page().get("draft DATE"),
        Some(&["3 March".to_string()][..])
    );

    let kinds: Vec<_> = parser.outline().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            OutlineKind::Section,
            OutlineKind::Heading,
            OutlineKind::Heading,
            OutlineKind::Heading,
            OutlineKind::Section,
            OutlineKind::Heading,
            OutlineKind::Section,
            OutlineKind::Heading,
        ]
    );
    let heading_numbers: Vec<_> = parser
        .outline()
        .iter()
        .filter(|s| s.is_heading())
        .map(|s| s.scene_number.as_deref())
        .collect();
    assert_eq!(
        heading_numbers,
        vec![Some("1"), Some("2"), Some("7A"), Some("3"), None]
    );
    assert_eq!(parser.number_of_scenes(), 5);

    let parking = &parser.outline()[2];
    assert_eq!(parking.color.as_deref(), Some("blue"));
    assert!(parser.outline()[7].is_boneyard);

    assert_eq!(parser.storylines(), vec!["DANA", "STRANGER"]);
    assert_eq!(parser.storybeats().beats_for("dana").len(), 2);
    assert_eq!(parser.scenes_with_storyline("STRANGER").len(), 1);

    let stranger = parser
        .lines()
        .iter()
        .position(|l| l.text() == "STRANGER ^")
        .unwrap();
    let dual = parser.dual_dialogue_for(stranger).unwrap();
    assert!(dual.is_dual);
    assert_eq!(dual.left[0].text(), "DANA");
    assert_eq!(dual.right.len(), 2);

    let printed = parser.for_printing();
    assert!(printed.lines.iter().all(|l| !l.text.contains("ROOFTOP")));
    assert!(printed.lines.iter().all(|l| !l.text.contains("headlights")));
}
