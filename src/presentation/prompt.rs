//! Terminal implementation of the selection prompt.

use crate::application::selector::Prompt;
use anyhow::{Context, Result};
use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::{Frame, Terminal, TerminalOptions, Viewport};
use std::io;

const MAX_VISIBLE_ITEMS: usize = 10;

/// Arrow-key menu drawn inline below the cursor.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for TerminalPrompt {
    fn choose(&mut self, label: &str, items: &[String]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }

        let choice = {
            let _raw = RawModeGuard::enable()?;
            run_menu(label, items)?
        };

        match choice {
            Some(index) => println!("{} {}: {}", "✔".green(), label, items[index].bold()),
            None => println!("{}", "Selection cancelled.".white()),
        }
        Ok(choice)
    }
}

fn run_menu(label: &str, items: &[String]) -> Result<Option<usize>> {
    let height = items.len().min(MAX_VISIBLE_ITEMS) as u16 + 2;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )
    .context("failed to start selection menu")?;

    let mut state = ListState::default().with_selected(Some(0));
    let choice = loop {
        terminal.draw(|frame| draw_menu(frame, label, items, &mut state))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let current = state.selected().unwrap_or(0);
        match menu_action(key) {
            MenuAction::Up => state.select(Some(move_up(current))),
            MenuAction::Down => state.select(Some(move_down(current, items.len()))),
            MenuAction::Select => break Some(current),
            MenuAction::Cancel => break None,
            MenuAction::Ignore => {}
        }
    };

    terminal.clear()?;
    Ok(choice)
}

fn draw_menu(frame: &mut Frame, label: &str, items: &[String], state: &mut ListState) {
    let area = frame.area();
    let list = List::new(items.iter().map(|item| ListItem::new(item.as_str())))
        .block(Block::default().borders(Borders::ALL).title(format!(" {label} ")))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, state);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Up,
    Down,
    Select,
    Cancel,
    Ignore,
}

fn menu_action(key: KeyEvent) -> MenuAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => MenuAction::Cancel,
        KeyCode::Up | KeyCode::Char('k') => MenuAction::Up,
        KeyCode::Down | KeyCode::Char('j') => MenuAction::Down,
        KeyCode::Enter => MenuAction::Select,
        KeyCode::Esc | KeyCode::Char('q') => MenuAction::Cancel,
        _ => MenuAction::Ignore,
    }
}

fn move_up(current: usize) -> usize {
    current.saturating_sub(1)
}

fn move_down(current: usize, len: usize) -> usize {
    (current + 1).min(len.saturating_sub(1))
}

/// Leaves raw mode on drop, including on early returns.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
