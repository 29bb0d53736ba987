//! Ratatui front end: folder and phrase inputs over a scrollable result pane.
//!
//! Keys: `Tab` switches between the phrase and folder fields, `Enter`
//! searches (or applies the folder), `Up`/`Down` select a hit, `PgUp`/`PgDn`
//! scroll, `Ctrl+Y` copies the selected hit's asset path (or, in the folder
//! field, the folder path) to the clipboard, `Esc` quits.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use crossterm::clipboard::CopyToClipboard;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::asset_path::AssetPathRule;
use crate::export::record_lines;
use crate::model::types::{MatchEntry, MatchResultSet};
use crate::search::{Phrase, Scanner};

const PAGE: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Phrase,
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header { selected: bool },
    Field,
    Error,
    Message,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
enum View {
    Empty,
    Message(String),
    Results(MatchResultSet),
}

/// Terminal-independent state of the search screen.
#[derive(Debug)]
pub struct App {
    scanner: Scanner,
    rule: AssetPathRule,
    root: PathBuf,
    pub focus: Focus,
    pub phrase_input: String,
    pub folder_input: String,
    view: View,
    selected: usize,
    pub scroll: u16,
    pub status: String,
    pub should_quit: bool,
    clipboard: Option<String>,
}

impl App {
    pub fn new(scanner: Scanner, rule: AssetPathRule, root: PathBuf) -> Self {
        let folder_input = root.display().to_string();
        Self {
            scanner,
            rule,
            root,
            focus: Focus::Phrase,
            phrase_input: String::new(),
            folder_input,
            view: View::Empty,
            selected: 0,
            scroll: 0,
            status: String::new(),
            should_quit: false,
            clipboard: None,
        }
    }

    /// Folder name as shown next to the folder field.
    pub fn root_label(&self) -> String {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());
        if self.root.is_dir() {
            name
        } else {
            format!("{name} not found")
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn results(&self) -> Option<&MatchResultSet> {
        match &self.view {
            View::Results(r) => Some(r),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.view {
            View::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('y') if ctrl => self.copy_selection(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Phrase => Focus::Folder,
                    Focus::Folder => Focus::Phrase,
                };
            }
            KeyCode::Enter => match self.focus {
                Focus::Phrase => self.search(),
                Focus::Folder => self.apply_folder(),
            },
            KeyCode::Backspace => {
                self.active_input().pop();
            }
            KeyCode::Char(c) if !ctrl => self.active_input().push(c),
            KeyCode::Down => self.select(self.selected.saturating_add(1)),
            KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            _ => {}
        }
    }

    fn active_input(&mut self) -> &mut String {
        match self.focus {
            Focus::Phrase => &mut self.phrase_input,
            Focus::Folder => &mut self.folder_input,
        }
    }

    fn apply_folder(&mut self) {
        let folder = self.folder_input.trim();
        if folder.is_empty() {
            return;
        }
        self.root = PathBuf::from(folder);
        self.status = format!("Folder: {}", self.root_label());
        self.focus = Focus::Phrase;
    }

    /// Run a scan with the current phrase and folder, replacing the view.
    pub fn search(&mut self) {
        self.selected = 0;
        self.scroll = 0;
        self.status.clear();

        let phrase = match Phrase::parse(&self.phrase_input) {
            Ok(p) => p,
            Err(err) => {
                self.view = View::Message(err.to_string());
                return;
            }
        };
        match self.scanner.scan(&self.root, &phrase) {
            Ok(results) => {
                self.status = format!(
                    "{} match(es), {} error(s)",
                    results.hit_count(),
                    results.error_count()
                );
                self.view = View::Results(results);
            }
            Err(err) => self.view = View::Message(err.to_string()),
        }
    }

    fn select(&mut self, idx: usize) {
        let Some(results) = self.results() else {
            return;
        };
        let count = results.hit_count();
        if count == 0 {
            return;
        }
        self.selected = idx.min(count - 1);
        if let Some(offset) = self.hit_offsets().get(self.selected) {
            self.scroll = u16::try_from(*offset).unwrap_or(u16::MAX);
        }
    }

    /// Text waiting to be written to the clipboard, if any.
    pub fn take_clipboard(&mut self) -> Option<String> {
        self.clipboard.take()
    }

    fn copy_selection(&mut self) {
        let payload = match self.focus {
            Focus::Folder => Ok(self.root.display().to_string()),
            Focus::Phrase => {
                let Some(results) = self.results() else {
                    return;
                };
                let Some((file, record)) = results.hits().nth(self.selected) else {
                    return;
                };
                self.rule
                    .derive(&file.relative_path, record)
                    .ok_or_else(|| format!("Selected record has no '{}' field", self.rule.field))
            }
        };
        match payload {
            Ok(text) => {
                self.status = format!("Copied: {text}");
                self.clipboard = Some(text);
            }
            Err(msg) => self.status = msg,
        }
    }

    /// Line index of each hit header within [`App::lines`].
    fn hit_offsets(&self) -> Vec<usize> {
        self.lines()
            .iter()
            .enumerate()
            .filter(|(_, (kind, _))| matches!(kind, LineKind::Header { .. }))
            .map(|(i, _)| i)
            .collect()
    }

    /// Text of the result pane, one entry per rendered line.
    pub fn lines(&self) -> Vec<(LineKind, String)> {
        let mut out = Vec::new();
        match &self.view {
            View::Empty => {}
            View::Message(m) => out.push((LineKind::Message, m.clone())),
            View::Results(results) => {
                let mut hit = 0;
                for entry in &results.entries {
                    match entry {
                        MatchEntry::Hit { file, record } => {
                            out.push((
                                LineKind::Header {
                                    selected: hit == self.selected,
                                },
                                format!("File: {}", file.relative_path),
                            ));
                            out.extend(
                                record_lines(record)
                                    .into_iter()
                                    .map(|l| (LineKind::Field, format!("  {l}"))),
                            );
                            out.push((LineKind::Blank, String::new()));
                            hit += 1;
                        }
                        MatchEntry::Error { message, .. } => {
                            out.push((LineKind::Error, message.clone()));
                            out.push((LineKind::Blank, String::new()));
                        }
                        MatchEntry::NotFound { message, .. } => {
                            out.push((LineKind::Message, message.clone()));
                        }
                    }
                }
            }
        }
        out
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        let focused = Style::default().fg(Color::Yellow);
        let field_style = |focus: Focus| {
            if self.focus == focus {
                focused
            } else {
                Style::default()
            }
        };

        let folder = Paragraph::new(self.folder_input.as_str()).block(
            Block::default()
                .title(format!("Folder: {}", self.root_label()))
                .borders(Borders::ALL)
                .border_style(field_style(Focus::Folder)),
        );
        f.render_widget(folder, chunks[0]);

        let phrase = Paragraph::new(self.phrase_input.as_str()).block(
            Block::default()
                .title("Phrase")
                .borders(Borders::ALL)
                .border_style(field_style(Focus::Phrase)),
        );
        f.render_widget(phrase, chunks[1]);

        let lines: Vec<Line> = self
            .lines()
            .into_iter()
            .map(|(kind, text)| {
                let style = match kind {
                    LineKind::Header { selected: true } => Style::default()
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                    LineKind::Header { selected: false } => {
                        Style::default().add_modifier(Modifier::BOLD)
                    }
                    LineKind::Error => Style::default().fg(Color::Red),
                    LineKind::Message => Style::default().fg(Color::Yellow),
                    LineKind::Field | LineKind::Blank => Style::default(),
                };
                Line::styled(text, style)
            })
            .collect();
        let results = Paragraph::new(lines)
            .block(Block::default().title("Results").borders(Borders::ALL))
            .scroll((self.scroll, 0));
        f.render_widget(results, chunks[2]);

        let status = if self.status.is_empty() {
            "Tab: switch field  Enter: search  Up/Down: select  Ctrl+Y: copy path  Esc: quit"
                .to_string()
        } else {
            self.status.clone()
        };
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
            chunks[3],
        );
    }
}

pub fn run_tui(mut app: App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let outcome = (|| -> Result<()> {
        while !app.should_quit {
            terminal.draw(|f| app.draw(f))?;
            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
            {
                app.handle_key(key);
                if let Some(text) = app.take_clipboard() {
                    execute!(
                        terminal.backend_mut(),
                        CopyToClipboard::to_clipboard_from(text)
                    )?;
                }
            }
        }
        Ok(())
    })();

    teardown_terminal()?;
    outcome
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}
