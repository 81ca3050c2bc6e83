use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use resonance_core::Mode;
use crate::app::App;
use crate::tui::AppEvent;

/// What the Enter key means given the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterIntent {
    Submit,
    Newline,
}

/// Plain Enter submits; Shift or Alt turns it into a line break.
pub fn enter_intent(modifiers: KeyModifiers) -> EnterIntent {
    if modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) {
        EnterIntent::Newline
    } else {
        EnterIntent::Submit
    }
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Session(action) => app.dispatch(action),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Quit
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,

        // Mode toggles
        KeyCode::Tab | KeyCode::BackTab => {
            let next = app.session.mode().toggled();
            app.select_mode(next);
        }
        KeyCode::F(1) => app.select_mode(Mode::Chat),
        KeyCode::F(2) => app.select_mode(Mode::Match),

        // Submit or line break
        KeyCode::Enter => match enter_intent(key.modifiers) {
            EnterIntent::Submit => app.submit(),
            EnterIntent::Newline => app.insert_char('\n'),
        },
        // Most terminals send Ctrl+J for a bare line feed
        KeyCode::Char('j') if ctrl => app.insert_char('\n'),
        KeyCode::Char('u') if ctrl => app.clear_draft(),

        // Arrows walk a multi-line draft first, then scroll the response
        KeyCode::Up => {
            if !app.cursor_up() {
                app.scroll_up(1);
            }
        }
        KeyCode::Down => {
            if !app.cursor_down() {
                app.scroll_down(1);
            }
        }
        KeyCode::PageUp => {
            let page = app.page_size();
            app.scroll_up(page);
        }
        KeyCode::PageDown => {
            let page = app.page_size();
            app.scroll_down(page);
        }

        // Draft editing
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !ctrl => app.insert_char(c),

        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_response = app.response_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let on_chat = app.chat_toggle_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let on_match = app.match_toggle_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if in_response => app.scroll_down(3),
        MouseEventKind::ScrollUp if in_response => app.scroll_up(3),
        MouseEventKind::Down(MouseButton::Left) => {
            if on_chat {
                app.select_mode(Mode::Chat);
            } else if on_match {
                app.select_mode(Mode::Match);
            }
        }
        _ => {}
    }
}
