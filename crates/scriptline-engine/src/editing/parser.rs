use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use scriptline_config::ParserConfig;

use super::delegate::ParserDelegate;
use super::identity::IdentityCache;
use super::patch::Patch;
use super::script::ReadOnlyScript;
use super::snapshot::ParserSnapshot;
use crate::error::ParserError;
use crate::outline::{OutlineChanges, OutlineScene, build_outline, diff_outline};
use crate::parsing::{
    Line, LineId, Lookback, ScreenplayLineClassifier, StorybeatIndex, TitlePage,
    apply_scene_numbers, parse_document,
};

/// How the parser treats edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Parse once; every edit re-parses the whole text and no delegate
    /// callbacks fire. Used for exports and other throwaway parses.
    Static,
    /// Keep the model in step with the editor, one edit at a time.
    Continuous,
}

/// Incrementally maintained model of a screenplay.
///
/// The line list is the source of truth. The outline, title page and
/// storyline index are derived from it and kept in sync by every edit.
/// All collections sit behind `Arc`, so [`Parser::snapshot`] is cheap and
/// edits copy on write.
pub struct Parser {
    pub(crate) lines: Arc<Vec<Line>>,
    pub(crate) outline: Arc<Vec<OutlineScene>>,
    pub(crate) title_page: Arc<TitlePage>,
    pub(crate) title_page_len: usize,
    pub(crate) storybeats: Arc<StorybeatIndex>,
    pub(crate) config: Arc<ParserConfig>,
    pub(crate) mode: ParseMode,
    /// Lines waiting to be re-rendered by the host.
    pub(crate) changed_indices: BTreeSet<usize>,
    pub(crate) identity: IdentityCache,
    pub(crate) delegate: Option<Box<dyn ParserDelegate + Send>>,
    pub(crate) version: u64,
    pub(crate) last_changes: OutlineChanges,
}

impl Parser {
    /// Creates a continuous parser with the default configuration.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, ParserConfig::default())
    }

    pub fn with_config(text: &str, config: ParserConfig) -> Self {
        let mut parser = Self {
            lines: Arc::new(Vec::new()),
            outline: Arc::new(Vec::new()),
            title_page: Arc::new(TitlePage::default()),
            title_page_len: 0,
            storybeats: Arc::new(StorybeatIndex::default()),
            config: Arc::new(config),
            mode: ParseMode::Continuous,
            changed_indices: BTreeSet::new(),
            identity: IdentityCache::default(),
            delegate: None,
            version: 0,
            last_changes: OutlineChanges::default(),
        };
        parser.parse_text(text);
        parser
    }

    pub fn new_static(text: &str, config: ParserConfig) -> Self {
        let mut parser = Self::with_config(text, config);
        parser.mode = ParseMode::Static;
        parser
    }

    /// Creates a parser from raw bytes, which must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParserError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Outline changes reported by the most recent edit.
    pub fn last_outline_changes(&self) -> &OutlineChanges {
        &self.last_changes
    }

    /// Line indices changed since the host last took them.
    pub fn take_changed_indices(&mut self) -> BTreeSet<usize> {
        std::mem::take(&mut self.changed_indices)
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn ParserDelegate + Send>) {
        self.delegate = Some(delegate);
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn ParserDelegate + Send>> {
        self.delegate.take()
    }

    /// Replaces the configuration and re-derives everything that depends
    /// on it.
    pub fn set_config(&mut self, config: ParserConfig) {
        if *self.config == config {
            return;
        }
        self.config = Arc::new(config);
        let changes = self.rebuild_structure();
        self.version += 1;
        self.finish_full(changes);
    }

    /// Parses `text` from scratch. Every line gets a fresh id.
    pub fn parse_text(&mut self, text: &str) -> Patch {
        let old_outline = Arc::clone(&self.outline);
        let removed: Vec<LineId> = self.lines.iter().map(Line::id).collect();

        let parsed = parse_document(text, &self.config);
        self.lines = Arc::new(parsed.lines);
        self.outline = Arc::new(parsed.outline);
        self.title_page = Arc::new(parsed.title_page);
        self.title_page_len = parsed.title_page_len;
        self.storybeats = Arc::new(parsed.storybeats);
        self.identity.invalidate();
        self.version += 1;

        let mut changes = diff_outline(&old_outline, &self.outline);
        changes.needs_full_update = true;
        log::debug!(
            "Parsed {} lines into {} outline elements",
            self.lines.len(),
            self.outline.len()
        );

        let changed: BTreeSet<usize> = (0..self.lines.len()).collect();
        self.changed_indices.extend(changed.iter().copied());
        self.last_changes = changes.clone();
        Patch {
            version: self.version,
            changed_indices: changed,
            removed,
            outline_changes: changes,
        }
    }

    /// Re-classifies every line in place and rebuilds the outline. Line ids
    /// are kept.
    pub fn reset_parsing(&mut self) -> Patch {
        self.reclassify_all();
        let changes = self.rebuild_structure();
        self.version += 1;
        self.finish_full(changes)
    }

    pub(crate) fn reclassify_all(&mut self) {
        let lines = Arc::make_mut(&mut self.lines);
        for i in 0..lines.len() {
            classify_at(lines, i);
        }
    }

    /// Rebuilds outline, scene numbers, title page and storylines from the
    /// current lines. Always reports a full update.
    pub(crate) fn rebuild_structure(&mut self) -> OutlineChanges {
        let text_len = self.text_len();
        let lines = Arc::make_mut(&mut self.lines);
        let built = build_outline(lines, text_len, &self.config);
        apply_scene_numbers(lines, &built);
        let (title_page, title_page_len) = TitlePage::from_lines(lines);

        let mut changes = diff_outline(&self.outline, &built.scenes);
        changes.needs_full_update = true;
        log::debug!("Rebuilt outline: {} elements", built.scenes.len());

        self.storybeats = Arc::new(StorybeatIndex::from_outline(&built.scenes));
        self.outline = Arc::new(built.scenes);
        self.title_page = Arc::new(title_page);
        self.title_page_len = title_page_len;
        self.identity.invalidate_scenes();
        changes
    }

    fn finish_full(&mut self, changes: OutlineChanges) -> Patch {
        let changed: BTreeSet<usize> = (0..self.lines.len()).collect();
        self.finish_edit(changed, Vec::new(), changes)
    }

    /// Records the result of an edit, notifies the delegate and builds the
    /// patch.
    pub(crate) fn finish_edit(
        &mut self,
        changed: BTreeSet<usize>,
        removed: Vec<Line>,
        changes: OutlineChanges,
    ) -> Patch {
        self.changed_indices.extend(changed.iter().copied());
        self.last_changes = changes.clone();

        if self.mode == ParseMode::Continuous {
            if let Some(delegate) = self.delegate.as_mut() {
                for line in &removed {
                    delegate.line_was_removed(line);
                }
                delegate.reformat_lines_at_indices(&changed);
                delegate.apply_format_changes();
                if changes.has_changes() {
                    delegate.outline_did_update(&changes);
                }
            }
        }

        Patch {
            version: self.version,
            changed_indices: changed,
            removed: removed.iter().map(Line::id).collect(),
            outline_changes: changes,
        }
    }

    pub fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            lines: Arc::clone(&self.lines),
            outline: Arc::clone(&self.outline),
            title_page: Arc::clone(&self.title_page),
            storybeats: Arc::clone(&self.storybeats),
            config: Arc::clone(&self.config),
            version: self.version,
        }
    }

    pub fn index_of_line(&mut self, id: LineId) -> Option<usize> {
        self.identity.line_index(&self.lines, id)
    }

    pub fn line_by_id(&mut self, id: LineId) -> Option<&Line> {
        let index = self.index_of_line(id)?;
        self.lines.get(index)
    }

    pub fn index_of_scene(&mut self, id: LineId) -> Option<usize> {
        self.identity.scene_index(&self.outline, id)
    }

    pub fn scene_by_id(&mut self, id: LineId) -> Option<&OutlineScene> {
        let index = self.index_of_scene(id)?;
        self.outline.get(index)
    }

    pub fn identity_cache(&self) -> &IdentityCache {
        &self.identity
    }

    /// Assigns ids to lines in order, e.g. ids restored from a saved session.
    /// Lines past the end of `ids` keep theirs.
    pub fn set_identifiers(&mut self, ids: &[LineId]) -> Result<(), ParserError> {
        let mut seen = HashSet::new();
        let kept = self.lines.iter().skip(ids.len()).map(Line::id);
        for id in ids.iter().take(self.lines.len()).copied().chain(kept) {
            if !seen.insert(id) {
                return Err(ParserError::DuplicateIdentifier(id));
            }
        }

        let lines = Arc::make_mut(&mut self.lines);
        for (line, id) in lines.iter_mut().zip(ids) {
            line.id = *id;
        }
        let outline = Arc::make_mut(&mut self.outline);
        for scene in outline.iter_mut() {
            let index = lines.partition_point(|l| l.position() <= scene.start).saturating_sub(1);
            if let Some(line) = lines.get(index) {
                scene.line = line.id();
            }
        }
        self.storybeats = Arc::new(StorybeatIndex::from_outline(outline));
        self.identity.invalidate();
        Ok(())
    }

    /// Line under the start of the host's selection.
    pub fn current_line(&self) -> Option<&Line> {
        let selection = self.delegate.as_ref()?.selected_range()?;
        self.line_at_position(selection.start)
    }

    pub fn current_scene(&self) -> Option<&OutlineScene> {
        let selection = self.delegate.as_ref()?.selected_range()?;
        self.scene_at_position(selection.start)
    }
}

/// Classifies `lines[index]` against its already classified predecessor and
/// the raw text of its successor.
pub(crate) fn classify_at(lines: &mut [Line], index: usize) {
    let previous = index
        .checked_sub(1)
        .and_then(|p| lines.get(p))
        .map(Lookback::from);
    let class = {
        let next = lines.get(index + 1).map(Line::text);
        ScreenplayLineClassifier.classify(lines[index].text(), previous, next)
    };
    lines[index].apply_class(class);
}

impl ReadOnlyScript for Parser {
    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn outline(&self) -> &[OutlineScene] {
        &self.outline
    }

    fn title_page(&self) -> &TitlePage {
        &self.title_page
    }

    fn storybeats(&self) -> &StorybeatIndex {
        &self.storybeats
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("lines", &self.lines.len())
            .field("outline", &self.outline.len())
            .field("mode", &self.mode)
            .field("version", &self.version)
            .field("has_delegate", &self.delegate.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Range;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
        selection: Option<Range<usize>>,
    }

    impl ParserDelegate for Recorder {
        fn line_was_removed(&mut self, line: &Line) {
            self.calls.lock().unwrap().push(format!("removed {}", line.text()));
        }
        fn reformat_lines_at_indices(&mut self, indices: &BTreeSet<usize>) {
            self.calls.lock().unwrap().push(format!("reformat {indices:?}"));
        }
        fn apply_format_changes(&mut self) {
            self.calls.lock().unwrap().push("apply".into());
        }
        fn outline_did_update(&mut self, changes: &OutlineChanges) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("outline +{} -{}", changes.added.len(), changes.removed.len()));
        }
        fn selected_range(&self) -> Option<Range<usize>> {
            self.selection.clone()
        }
    }

    #[test]
    fn test_from_bytes_invalid_utf8() {
        let err = Parser::from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ParserError::InvalidUtf8(_)));
    }

    #[test]
    fn test_from_bytes_valid_utf8() {
        let parser = Parser::from_bytes("INT. CAFÉ - DAY".as_bytes()).unwrap();
        assert_eq!(parser.outline().len(), 1);
        assert_eq!(parser.raw_text(), "INT. CAFÉ - DAY");
    }

    #[test]
    fn test_delegate_call_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut parser = Parser::new("INT. A\n\nJohn.\n\nINT. B\n");
        parser.set_delegate(Box::new(Recorder {
            calls: Arc::clone(&calls),
            selection: None,
        }));

        // Remove the second heading line and the blank line before it.
        let start = parser.lines()[3].position();
        let end = parser.lines()[4].text_range().end;
        parser.parse_change(start..end, "");

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls[0], "removed INT. B");
        assert!(calls[1].starts_with("reformat"));
        assert_eq!(calls[2], "apply");
        assert_eq!(calls[3], "outline +0 -1");
    }

    #[test]
    fn test_static_parser_never_calls_delegate() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut parser = Parser::new_static("INT. A\n", ParserConfig::default());
        parser.set_delegate(Box::new(Recorder {
            calls: Arc::clone(&calls),
            selection: None,
        }));
        let patch = parser.parse_change(0..0, "EXT. B\n\n");

        assert!(calls.lock().unwrap().is_empty());
        assert!(patch.outline_changes.needs_full_update);
        assert_eq!(parser.outline().len(), 2);
    }

    #[test]
    fn test_current_line_follows_selection() {
        let mut parser = Parser::new("INT. A\n\nJohn waits.");
        assert!(parser.current_line().is_none());
        parser.set_delegate(Box::new(Recorder {
            calls: Arc::default(),
            selection: Some(10..10),
        }));
        assert_eq!(parser.current_line().map(Line::text), Some("John waits."));
        assert_eq!(parser.current_scene().map(|s| s.string.as_str()), Some("INT. A"));
    }

    #[test]
    fn test_identity_cache_rebuilds_lazily() {
        let mut parser = Parser::new("INT. A\n\nJohn.");
        let id = parser.lines()[2].id();
        assert!(!parser.identity_cache().lines_cached());
        assert_eq!(parser.index_of_line(id), Some(2));
        assert!(parser.identity_cache().lines_cached());

        parser.parse_change(0..0, "\n");
        assert!(!parser.identity_cache().lines_cached());
        assert_eq!(parser.index_of_line(id), Some(3));
    }

    #[test]
    fn test_set_identifiers() {
        let mut parser = Parser::new("INT. A\n\nJohn.");
        let ids = vec![LineId::new(), LineId::new()];
        parser.set_identifiers(&ids).unwrap();

        assert_eq!(parser.lines()[0].id(), ids[0]);
        assert_eq!(parser.outline()[0].line, ids[0]);
        assert_eq!(parser.scene_by_id(ids[0]).map(|s| s.string.as_str()), Some("INT. A"));

        let third = parser.lines()[2].id();
        let err = parser.set_identifiers(&[third]).unwrap_err();
        assert!(matches!(err, ParserError::DuplicateIdentifier(id) if id == third));
    }

    #[test]
    fn test_reset_parsing_keeps_ids() {
        let mut parser = Parser::new("INT. A\n\nJohn.");
        let ids = parser.line_identifiers();
        let patch = parser.reset_parsing();
        assert_eq!(parser.line_identifiers(), ids);
        assert!(patch.outline_changes.needs_full_update);
        assert!(patch.outline_changes.added.is_empty());
    }

    #[test]
    fn test_set_config_renumbers() {
        let mut parser = Parser::new("INT. A\n\nINT. B");
        parser.set_config(ParserConfig {
            scene_numbering_starts_from: 10,
            ..ParserConfig::default()
        });
        let numbers: Vec<_> = parser
            .outline()
            .iter()
            .map(|s| s.scene_number.clone())
            .collect();
        assert_eq!(numbers, vec![Some("10".to_string()), Some("11".to_string())]);
        assert_eq!(parser.lines()[0].scene_number(), Some("10"));
        assert_eq!(parser.last_outline_changes().updated.len(), 2);
    }
}
