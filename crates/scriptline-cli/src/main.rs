use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use scriptline_config::{Config, ParserConfig};
use scriptline_engine::editing::{Parser, ReadOnlyScript};
use scriptline_engine::outline::{OutlineKind, OutlineScene};
use serde::Serialize;
use std::{env, fs, io::stdout, ops::Range, path::PathBuf, process};

struct App {
    script_path: PathBuf,
    parser: Parser,
    outline_state: ListState,
    current_content: Vec<String>,
    status: String,
}

impl App {
    fn new(script_path: PathBuf, config: ParserConfig) -> Result<Self> {
        let text = fs::read_to_string(&script_path)
            .with_context(|| format!("reading {}", script_path.display()))?;
        Ok(Self::with_parser(script_path, Parser::with_config(&text, config)))
    }

    fn with_parser(script_path: PathBuf, parser: Parser) -> Self {
        let mut app = Self {
            script_path,
            parser,
            outline_state: ListState::default(),
            current_content: Vec::new(),
            status: String::new(),
        };

        if !app.parser.outline().is_empty() {
            app.outline_state.select(Some(0));
        }
        app.update_content_for_selection();
        app
    }

    fn next_scene(&mut self) {
        let count = self.parser.outline().len();
        if count == 0 {
            return;
        }
        let i = match self.outline_state.selected() {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.outline_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn previous_scene(&mut self) {
        let count = self.parser.outline().len();
        if count == 0 {
            return;
        }
        let i = match self.outline_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.outline_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn update_content_for_selection(&mut self) {
        let selected = self
            .outline_state
            .selected()
            .and_then(|i| self.parser.scene_at_index(i));

        self.current_content = match selected {
            Some(scene) => render_scene(&self.parser, scene),
            None => self
                .parser
                .lines()
                .iter()
                .map(|l| format!("{:>24}  {}", l.line_type().name(), l.text()))
                .collect(),
        };
    }

    /// Re-reads the script and feeds the difference to the parser as one
    /// edit.
    fn reload(&mut self) -> Result<()> {
        let new_text = fs::read_to_string(&self.script_path)
            .with_context(|| format!("reading {}", self.script_path.display()))?;
        let old_text = self.parser.raw_text();
        let (old_range, new_range) = changed_range(&old_text, &new_text);

        if old_range.is_empty() && new_range.is_empty() {
            self.status = "No changes".to_string();
            return Ok(());
        }

        let patch = self
            .parser
            .parse_change(old_range.clone(), &new_text[new_range]);
        let changes = &patch.outline_changes;
        log::debug!(
            "Reloaded {:?}: {} lines changed, outline +{} -{} ~{}{}",
            old_range,
            patch.changed_indices.len(),
            changes.added.len(),
            changes.removed.len(),
            changes.updated.len(),
            if changes.needs_full_update { " (full)" } else { "" }
        );
        self.status = format!(
            "v{}: +{} -{} ~{} scenes",
            patch.version,
            changes.added.len(),
            changes.removed.len(),
            changes.updated.len()
        );

        let count = self.parser.outline().len();
        match self.outline_state.selected() {
            _ if count == 0 => self.outline_state.select(None),
            Some(i) if i >= count => self.outline_state.select(Some(count - 1)),
            None => self.outline_state.select(Some(0)),
            _ => {}
        }
        self.update_content_for_selection();
        Ok(())
    }
}

/// Smallest byte ranges of `old` and `new` that differ.
fn changed_range(old: &str, new: &str) -> (Range<usize>, Range<usize>) {
    let prefix: usize = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();
    let suffix: usize = old[prefix..]
        .chars()
        .rev()
        .zip(new[prefix..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();
    (prefix..old.len() - suffix, prefix..new.len() - suffix)
}

fn outline_label(scene: &OutlineScene) -> String {
    match scene.kind {
        OutlineKind::Section => {
            format!("{}{}", "  ".repeat(scene.section_depth.saturating_sub(1)), scene.string)
        }
        OutlineKind::Heading => format!(
            "{}{:>4}  {}",
            "  ".repeat(scene.section_depth),
            scene.scene_number.as_deref().unwrap_or("-"),
            scene.string
        ),
    }
}

fn render_scene(parser: &Parser, scene: &OutlineScene) -> Vec<String> {
    let mut lines = Vec::new();
    if !scene.storylines.is_empty() {
        lines.push(format!("Storylines: {}", scene.storylines.join(", ")));
    }
    if let Some(color) = &scene.color {
        lines.push(format!("Color: {color}"));
    }
    for synopsis in &scene.synopsis {
        lines.push(format!("= {synopsis}"));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.extend(
        parser
            .lines_for_scene(scene)
            .iter()
            .map(|l| format!("{:>24}  {}", l.line_type().name(), l.text())),
    );
    lines
}

#[derive(Serialize)]
struct OutlineDump {
    title: Option<String>,
    storylines: Vec<String>,
    scene: Vec<SceneDump>,
}

#[derive(Serialize)]
struct SceneDump {
    kind: String,
    heading: String,
    number: Option<String>,
    start: usize,
    length: usize,
    depth: usize,
    storylines: Vec<String>,
    color: Option<String>,
    omitted: bool,
    boneyard: bool,
}

fn dump_toml(parser: &Parser) -> Result<String> {
    let dump = OutlineDump {
        title: parser.title_page().title().map(str::to_string),
        storylines: parser.storylines(),
        scene: parser
            .outline()
            .iter()
            .map(|s| SceneDump {
                kind: format!("{:?}", s.kind).to_lowercase(),
                heading: s.string.clone(),
                number: s.scene_number.clone(),
                start: s.start,
                length: s.length,
                depth: s.section_depth,
                storylines: s.storylines.clone(),
                color: s.color.clone(),
                omitted: s.omitted,
                boneyard: s.is_boneyard,
            })
            .collect(),
    };
    Ok(toml::to_string_pretty(&dump)?)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <script.fountain> [--outline | --toml]");
    eprintln!("Parser settings are read from {}", Config::config_path().display());
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let (script_path, mode) = match args.as_slice() {
        [_, path] => (PathBuf::from(path), None),
        [_, path, flag] if flag == "--outline" || flag == "--toml" => {
            (PathBuf::from(path), Some(flag.as_str()))
        }
        _ => {
            print_usage(args.first().map_or("scriptline-cli", String::as_str));
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(Some(config)) => config.parser,
        Ok(None) => ParserConfig::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    log::info!("Config path: {}", Config::config_path().display());

    let mut app = App::new(script_path, config)?;

    match mode {
        Some("--outline") => {
            for scene in app.parser.outline() {
                println!("{}", outline_label(scene));
            }
            return Ok(());
        }
        Some(_) => {
            print!("{}", dump_toml(&app.parser)?);
            return Ok(());
        }
        None => {}
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: ratatui::backend::Backend,
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_scene(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_scene(),
                KeyCode::Char('r') => {
                    if let Err(e) = app.reload() {
                        app.status = format!("Reload failed: {e}");
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(rows[0]);

    let title = app
        .parser
        .title_page()
        .title()
        .map_or_else(|| "Outline".to_string(), |t| format!("Outline: {t}"));
    let items: Vec<ListItem> = app
        .parser
        .outline()
        .iter()
        .map(|scene| {
            let style = match scene.kind {
                OutlineKind::Section => Style::default().fg(Color::Cyan),
                OutlineKind::Heading if scene.omitted || scene.is_boneyard => {
                    Style::default().fg(Color::DarkGray)
                }
                OutlineKind::Heading => Style::default(),
            };
            ListItem::new(Line::from(vec![Span::styled(outline_label(scene), style)]))
        })
        .collect();

    let outline = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(outline, chunks[0], &mut app.outline_state);

    let content_text: Vec<Line> = app
        .current_content
        .iter()
        .map(|line| Line::from(vec![Span::raw(line.clone())]))
        .collect();

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Scene"))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | ↑/k: Previous | ↓/j: Next | r: Reload | "),
        Span::raw(app.status.clone()),
    ]));
    f.render_widget(help, rows[1]);
}
