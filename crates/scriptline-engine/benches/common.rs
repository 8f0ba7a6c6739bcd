// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_script(scenes: usize) -> String {
    let mut content = String::from("Title: Benchmark\nAuthor: Nobody\n\n");

    for scene in 0..scenes {
        if scene % 10 == 0 {
            content.push_str(&format!("# Act {}\n\n", scene / 10 + 1));
        }
        content.push_str(&format!(
            "INT. LOCATION {scene} - DAY [[Beat Story{}]]\n\n",
            scene % 3
        ));
        content.push_str("= Something happens here.\n\n");
        content.push_str("Rain against the window. Someone waits by the door.\n\n");
        content.push_str("BOB\n(quietly)\nAre you coming or not?\n\n");
        content.push_str("ALICE ^\nGive me a minute.\n\n");
        if scene % 4 == 0 {
            content.push_str("/* An omitted beat\nthat spans lines */\n\n");
        }
        content.push_str("CUT TO:\n\n");
    }

    content
}

/// Byte offset just before the action line of the middle scene.
#[allow(dead_code)]
pub fn middle_action_offset(text: &str) -> usize {
    let middle = text.len() / 2;
    text[middle..]
        .find("Rain against")
        .map_or(middle, |i| middle + i)
}
