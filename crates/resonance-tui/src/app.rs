use std::sync::Arc;

use ratatui::layout::Rect;
use resonance_core::{run_request, Action, ModelGateway, Mode, Session};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::tui::AppEvent;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub session: Session,

    // Input state
    pub input_cursor: usize, // char index into the draft

    // Response view state
    pub response_scroll: u16,
    pub response_height: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub response_area: Option<Rect>,
    pub chat_toggle_area: Option<Rect>,
    pub match_toggle_area: Option<Rect>,

    // Gateway
    pub gateway: Arc<dyn ModelGateway>,
    pub model: String,
    pub has_api_key: bool,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        events: UnboundedSender<AppEvent>,
        mode: Mode,
        model: &str,
        has_api_key: bool,
    ) -> Self {
        Self {
            should_quit: false,
            session: Session::new(mode),
            input_cursor: 0,
            response_scroll: 0,
            response_height: 0,
            animation_frame: 0,
            response_area: None,
            chat_toggle_area: None,
            match_toggle_area: None,
            gateway,
            model: model.to_string(),
            has_api_key,
            events,
        }
    }

    /// Feed an action through the session and start any request it asks for.
    ///
    /// The request runs on its own task; its completion comes back through
    /// the event channel as `AppEvent::Session`.
    pub fn dispatch(&mut self, action: Action) {
        let previous = self.session.response().map(str::to_owned);

        if let Some(request) = self.session.dispatch(action) {
            self.animation_frame = 0;
            let gateway = Arc::clone(&self.gateway);
            let events = self.events.clone();
            tokio::spawn(async move {
                let completion = run_request(gateway.as_ref(), request).await;
                if events.send(AppEvent::Session(completion)).is_err() {
                    debug!("event loop gone before reply arrived");
                }
            });
        }

        // Jump to the top of a new or replaced response
        let current = self.session.response();
        if current.is_some() && current != previous.as_deref() {
            self.response_scroll = 0;
        }
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.dispatch(Action::SelectMode(mode));
    }

    pub fn submit(&mut self) {
        self.dispatch(Action::Submit);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Draft editing, always routed through the session
    pub fn insert_char(&mut self, c: char) {
        let mut draft = self.session.draft().to_string();
        let byte_pos = char_to_byte_index(&draft, self.input_cursor);
        draft.insert(byte_pos, c);
        self.input_cursor += 1;
        self.dispatch(Action::EditInput(draft));
    }

    pub fn delete_before_cursor(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let mut draft = self.session.draft().to_string();
        self.input_cursor -= 1;
        let byte_pos = char_to_byte_index(&draft, self.input_cursor);
        draft.remove(byte_pos);
        self.dispatch(Action::EditInput(draft));
    }

    pub fn delete_at_cursor(&mut self) {
        let mut draft = self.session.draft().to_string();
        if self.input_cursor < draft.chars().count() {
            let byte_pos = char_to_byte_index(&draft, self.input_cursor);
            draft.remove(byte_pos);
            self.dispatch(Action::EditInput(draft));
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.session.draft().chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_count);
    }

    /// Move to the same column on the previous draft line.
    /// Returns false when the cursor is already on the first line.
    pub fn cursor_up(&mut self) -> bool {
        let (line, col) = cursor_line_col(self.session.draft(), self.input_cursor);
        if line == 0 {
            return false;
        }
        self.input_cursor = line_start_col(self.session.draft(), line - 1, col);
        true
    }

    /// Move to the same column on the next draft line.
    /// Returns false when the cursor is already on the last line.
    pub fn cursor_down(&mut self) -> bool {
        let (line, col) = cursor_line_col(self.session.draft(), self.input_cursor);
        if line + 1 >= self.session.draft().split('\n').count() {
            return false;
        }
        self.input_cursor = line_start_col(self.session.draft(), line + 1, col);
        true
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.session.draft().chars().count();
    }

    pub fn clear_draft(&mut self) {
        self.input_cursor = 0;
        self.dispatch(Action::EditInput(String::new()));
    }

    // Response scrolling
    pub fn scroll_down(&mut self, lines: u16) {
        self.response_scroll = self.response_scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.response_scroll = self.response_scroll.saturating_sub(lines);
    }

    pub fn page_size(&self) -> u16 {
        if self.response_height > 0 {
            (self.response_height / 2).max(1)
        } else {
            10
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Line and column (both in chars) of a cursor inside multi-line text.
pub fn cursor_line_col(text: &str, cursor: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for c in text.chars().take(cursor) {
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Char index of `col` on line `line`, clamped to the end of that line.
fn line_start_col(text: &str, line: usize, col: usize) -> usize {
    let mut index = 0;
    for (n, content) in text.split('\n').enumerate() {
        let len = content.chars().count();
        if n == line {
            return index + col.min(len);
        }
        index += len + 1;
    }
    index.saturating_sub(1)
}
