use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{Action, App, Effect, PaletteMove};
use crate::tui::AppEvent;

/// Lines moved per wheel notch
const WHEEL_STEP: u16 = 3;

/// Feed one event through the app. Returns the request to start, if any.
pub fn handle_event(app: &mut App, event: AppEvent) -> Option<Effect> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => None,
        AppEvent::Tick => app.update(Action::Tick),
        AppEvent::Settled(action) => app.update(action),
    }
}

/// Translate a key press into an action for the current popup state
pub fn key_action(app: &App, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work in any mode
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::Char('e') if ctrl => return Some(Action::ToggleEmoji),
        KeyCode::Char('o') if ctrl => return Some(Action::ToggleMenu),
        KeyCode::Esc => return Some(Action::Dismiss),
        _ => {}
    }

    if app.menu_open {
        return match key.code {
            KeyCode::Enter => Some(Action::ClearChat),
            _ => None,
        };
    }

    if app.emoji_open {
        let palette = match key.code {
            KeyCode::Left => Some(Action::MovePalette(PaletteMove::Left)),
            KeyCode::Right => Some(Action::MovePalette(PaletteMove::Right)),
            KeyCode::Up => Some(Action::MovePalette(PaletteMove::Up)),
            KeyCode::Down => Some(Action::MovePalette(PaletteMove::Down)),
            KeyCode::Enter => Some(Action::InsertEmoji(app.palette.selected().to_string())),
            _ => None,
        };
        if palette.is_some() {
            return palette;
        }
    }

    match key.code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete => Some(Action::Delete),
        KeyCode::Left => Some(Action::CursorLeft),
        KeyCode::Right => Some(Action::CursorRight),
        KeyCode::Home => Some(Action::CursorHome),
        KeyCode::End => Some(Action::CursorEnd),
        KeyCode::PageUp => Some(Action::ScrollUp(app.chat_height.max(1) / 2)),
        KeyCode::PageDown => Some(Action::ScrollDown(app.chat_height.max(1) / 2)),
        KeyCode::Up => Some(Action::ScrollUp(1)),
        KeyCode::Down => Some(Action::ScrollDown(1)),
        KeyCode::Char(c) if !ctrl => Some(Action::InsertChar(c)),
        _ => None,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Option<Effect> {
    let action = key_action(app, key)?;
    app.update(action)
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) -> Option<Effect> {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return None;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.update(Action::ScrollDown(WHEEL_STEP)),
        MouseEventKind::ScrollUp => app.update(Action::ScrollUp(WHEEL_STEP)),
        _ => None,
    }
}
