use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

use super::state::PickerState;
use super::Picker;
use crate::models::{PickKind, SelectOption};

/// Full-screen picker drawn with ratatui.
#[derive(Debug, Default)]
pub struct TerminalPicker;

impl TerminalPicker {
    pub fn new() -> Self {
        TerminalPicker
    }
}

impl Picker for TerminalPicker {
    fn pick(&mut self, kind: PickKind, options: Vec<SelectOption>) -> Result<Option<SelectOption>> {
        let mut state = PickerState::new(kind.title(), options);

        enable_raw_mode()?;
        let restore = guard_setup(restore_terminal, || {
            execute!(io::stdout(), EnterAlternateScreen)
        })?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let res = run_picker(&mut terminal, &mut state);

        terminal.show_cursor()?;
        drop(restore);

        res?;
        Ok(state.into_choice())
    }
}

/// Runs `restore` when dropped.
struct RestoreOnDrop<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.restore)()
    }
}

/// Arm `restore` before running `setup`, so a failing setup still restores.
fn guard_setup<F: FnMut()>(
    restore: F,
    setup: impl FnOnce() -> io::Result<()>,
) -> io::Result<RestoreOnDrop<F>> {
    let guard = RestoreOnDrop { restore };
    setup()?;
    Ok(guard)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn run_picker<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut PickerState,
) -> io::Result<()> {
    let mut list_state = ListState::default();
    while !state.is_resolved() {
        list_state.select(state.selected());
        terminal.draw(|f| render(f, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(state, key);
            }
        }
    }
    Ok(())
}

/// Apply one key press to the picker.
pub fn handle_key(state: &mut PickerState, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            state.cancel();
        }
        KeyCode::Char('c') if ctrl => {
            state.cancel();
        }
        KeyCode::Char('n') if ctrl => state.next(),
        KeyCode::Char('p') if ctrl => state.previous(),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::Enter => {
            state.commit();
        }
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c) if !ctrl => state.push_char(c),
        _ => {}
    }
}

fn render(f: &mut Frame, state: &PickerState, list_state: &mut ListState) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!("{} - Enter: choose | Esc: cancel", state.title))
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)].as_ref())
        .split(inner);

    let filter = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(state.query()),
    ]));
    f.render_widget(filter, chunks[0]);

    let items: Vec<ListItem> = state.visible().map(option_line).map(ListItem::new).collect();
    if items.is_empty() {
        let empty = Paragraph::new("No matches").style(Style::default().fg(Color::Gray));
        f.render_widget(empty, chunks[2]);
        return;
    }

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[2], list_state);
}

fn option_line(option: &SelectOption) -> Line<'static> {
    let mut spans = Vec::new();
    if option.is_pinned {
        spans.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw(option.name.clone()));
    if option.is_default {
        spans.push(Span::styled(" (default)", Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use std::cell::Cell;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> PickerState {
        PickerState::new(
            "Select project",
            vec![SelectOption::new("Inbox", "1"), SelectOption::new("Roadmap", "2")],
        )
    }

    #[test]
    fn failed_setup_still_restores_terminal() {
        let restored = Cell::new(0);
        let result = guard_setup(
            || restored.set(restored.get() + 1),
            || Err(io::Error::new(io::ErrorKind::Other, "no tty")),
        );
        assert!(result.is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn restore_runs_once_when_guard_drops() {
        let restored = Cell::new(0);
        let guard = guard_setup(|| restored.set(restored.get() + 1), || Ok(())).unwrap();
        assert_eq!(restored.get(), 0);
        drop(guard);
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn typing_filters_and_enter_commits() {
        let mut state = state();
        for c in "road".chars() {
            handle_key(&mut state, press(KeyCode::Char(c)));
        }
        handle_key(&mut state, press(KeyCode::Enter));
        // a repeated enter for the same gesture is ignored
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.into_choice().unwrap().id, "2");
    }

    #[test]
    fn ctrl_c_cancels() {
        let mut state = state();
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.is_resolved());
        assert_eq!(state.into_choice(), None);
    }

    #[test]
    fn renders_pinned_marker() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut pinned = SelectOption::new("Inbox", "1");
        pinned.is_pinned = true;
        let state = PickerState::new("Select project", vec![SelectOption::new("Roadmap", "2"), pinned]);
        let mut list_state = ListState::default();
        list_state.select(state.selected());

        terminal
            .draw(|f| render(f, &state, &mut list_state))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("★ Inbox"));
        assert!(text.contains("Roadmap"));
    }
}
