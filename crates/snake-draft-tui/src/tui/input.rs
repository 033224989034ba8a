// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState changes (cursor, filter, quit prompt).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::UserCommand;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Some terminals report releases too; act on presses only.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_cursor_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            move_cursor_down(view_state, PAGE_SIZE);
            None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            view_state.cursor = 0;
            None
        }

        KeyCode::Enter => draft_selected(view_state),

        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }

        // Clear filter and any notice.
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.notice = None;
            view_state.cursor = 0;
            None
        }

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Enter: draft the highlighted entity, but only while the human is on the
/// clock. The engine re-checks the turn regardless.
fn draft_selected(view_state: &mut ViewState) -> Option<UserCommand> {
    if view_state.is_complete() {
        view_state.notice = Some("The draft is complete".into());
        return None;
    }
    if !view_state.is_human_turn {
        view_state.notice = Some(format!(
            "Not your turn: {} is on the clock",
            view_state.party_name(view_state.on_clock)
        ));
        return None;
    }
    let id = view_state.selected()?.id.clone();
    Some(UserCommand::Pick(id))
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Printable characters edit the filter; Enter keeps it, Esc drops it.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
        }
        _ => return None,
    }
    view_state.cursor = 0;
    None
}

fn move_cursor_up(view_state: &mut ViewState, rows: usize) {
    view_state.cursor = view_state.cursor.saturating_sub(rows);
}

fn move_cursor_down(view_state: &mut ViewState, rows: usize) {
    view_state.cursor = view_state.cursor.saturating_add(rows);
    view_state.clamp_cursor();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
