use std::sync::mpsc;
use std::thread;

use scriptline_engine::editing::{Parser, ParserSnapshot, ReadOnlyScript};
use scriptline_engine::parsing::snapshot;

const SCRIPT: &str = "INT. HOUSE - DAY\n\nJohn enters.\n\nEXT. STREET - NIGHT\n\nRain.";

#[test]
fn snapshot_is_isolated_from_later_edits() {
    let mut parser = Parser::new(SCRIPT);
    let before = parser.snapshot();

    parser.parse_change(0..0, "INT. ROOF - DAWN\n\n");

    assert_eq!(before.raw_text(), SCRIPT);
    assert_eq!(before.outline().len(), 2);
    assert_eq!(parser.outline().len(), 3);
    assert!(before.version() < parser.version());
}

#[test]
fn readers_traverse_snapshots_while_the_writer_edits() {
    let mut parser = Parser::new(SCRIPT);
    let (tx, rx) = mpsc::channel::<ParserSnapshot>();

    let reader = thread::spawn(move || {
        let mut seen = 0;
        for snap in rx {
            let text = snap.raw_text();
            snapshot::invariants(&text, snap.lines(), snap.outline());
            assert_eq!(snap.number_of_scenes(), snap.outline().len());
            seen += 1;
        }
        seen
    });

    for i in 0..50 {
        let end = parser.text_len();
        parser.parse_change(end..end, &format!("\n\nINT. ROOM {i} - DAY"));
        tx.send(parser.snapshot()).unwrap();
    }
    drop(tx);

    assert_eq!(reader.join().unwrap(), 50);
    assert_eq!(parser.number_of_scenes(), 52);
}

#[test]
fn printing_from_another_thread() {
    let parser = Parser::new(SCRIPT);
    let snap = parser.snapshot();
    let printed = thread::spawn(move || snap.for_printing()).join().unwrap();
    assert_eq!(printed.lines[0].scene_number.as_deref(), Some("1"));
}
