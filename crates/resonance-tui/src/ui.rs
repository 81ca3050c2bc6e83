use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{cursor_line_col, App};
use resonance_core::Mode;
use unicode_width::UnicodeWidthChar;

const MODE_PANEL_WIDTH: u16 = 34;
const MAX_INPUT_LINES: u16 = 6;

/// Accent color for each mode (indigo for the oracle, emerald for synergy)
fn accent(mode: Mode) -> Color {
    match mode {
        Mode::Chat => Color::Cyan,
        Mode::Match => Color::Green,
    }
}

/// Pick the window of a draft line that keeps the cursor on screen.
///
/// Returns the first visible char and the cursor's column in terminal cells,
/// so wide (CJK) characters take the two cells they render in.
fn visible_window(line: &str, cursor_col: usize, width: usize) -> (usize, usize) {
    let chars: Vec<char> = line.chars().collect();
    let cursor = cursor_col.min(chars.len());
    let cells = |from: usize| -> usize { chars[from..cursor].iter().map(|c| c.width().unwrap_or(0)).sum() };

    let mut offset = 0;
    while offset < cursor && cells(offset) + 1 > width {
        offset += 1;
    }
    (offset, cells(offset))
}

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;

            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
                if found_close {
                    current_text.push_str("**");
                }
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [mode_area, chat_area] = Layout::horizontal([
        Constraint::Length(MODE_PANEL_WIDTH),
        Constraint::Min(0),
    ])
    .areas(body_area);

    render_mode_panel(app, frame, mode_area);
    render_chat(app, frame, chat_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" SILVER SOUL ", Style::default().fg(Color::White).bold()),
        Span::styled("STRATEGIST ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!(" Powered by {} ", app.model),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ];
    if !app.has_api_key {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            " no API key: set GEMINI_API_KEY ",
            Style::default().bg(Color::Red).fg(Color::White),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_mode_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Neural Resonance ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [blurb_area, chat_area, match_area, _rest] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Min(0),
    ])
    .areas(inner);

    let blurb = Paragraph::new(
        "This is my digital twin. Talk to it, or take the synergy check to see if you are the Integrator I'm looking for.",
    )
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: true });
    frame.render_widget(blurb, blurb_area);

    app.chat_toggle_area = Some(chat_area);
    app.match_toggle_area = Some(match_area);

    for (mode, toggle_area, key) in [(Mode::Chat, chat_area, "F1"), (Mode::Match, match_area, "F2")] {
        render_mode_toggle(frame, toggle_area, mode, key, app.session.mode() == mode);
    }
}

fn render_mode_toggle(frame: &mut Frame, area: Rect, mode: Mode, key: &str, active: bool) {
    let color = accent(mode);
    let border_style = if active {
        Style::default().fg(color)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let name_style = if active {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", key));

    let text = Text::from(vec![
        Line::from(Span::styled(mode.display_name(), name_style)),
        Line::from(Span::styled(mode.tagline(), Style::default().fg(Color::Gray))),
    ]);

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let mode = app.session.mode();

    // Input grows with the draft, up to a limit
    let draft_lines = app.session.draft().split('\n').count() as u16;
    let input_height = draft_lines.clamp(1, MAX_INPUT_LINES) + 2;

    let [response_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(input_height),
    ])
    .areas(area);

    render_response(app, frame, response_area, mode);
    render_input(app, frame, input_area, mode);
}

fn render_response(app: &mut App, frame: &mut Frame, area: Rect, mode: Mode) {
    app.response_area = Some(area);
    app.response_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent(mode)))
        .title(format!(" {} ", mode.display_name()));

    if app.session.is_pending() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        let thinking = Paragraph::new(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )))
        .block(block);
        frame.render_widget(thinking, area);
        return;
    }

    let Some(response) = app.session.response() else {
        let hint = Paragraph::new(Line::from(Span::styled(
            app.session.idle_hint(),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            app.session.response_label().to_uppercase(),
            Style::default().fg(accent(mode)).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    if app.session.response_is_fallback() {
        lines.push(Line::from(Span::styled(
            response.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        )));
    } else {
        for line in response.lines() {
            lines.push(parse_markdown_line(line));
        }
    }

    let content = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });

    // Keep scroll inside the content, measured the way it will be drawn
    let total_lines = u16::try_from(content.line_count(inner_width)).unwrap_or(u16::MAX);
    let max_scroll = total_lines.saturating_sub(app.response_height);
    app.response_scroll = app.response_scroll.min(max_scroll);

    let paragraph = content.block(block).scroll((app.response_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, mode: Mode) {
    let border_color = if app.session.can_submit() {
        accent(mode)
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Ask (Enter to send, Shift+Enter for a new line) ");

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let draft = app.session.draft();
    let (cursor_line, cursor_col) = cursor_line_col(draft, app.input_cursor);

    // Scroll so the cursor stays visible in both directions
    let row_offset = (cursor_line + 1).saturating_sub(inner_height.max(1));
    let cursor_text = draft.split('\n').nth(cursor_line).unwrap_or_default();
    let (col_offset, cursor_x) = visible_window(cursor_text, cursor_col, inner_width.max(1));

    let text = if draft.is_empty() {
        Text::from(Span::styled(
            app.session.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible: Vec<Line> = draft
            .split('\n')
            .skip(row_offset)
            .take(inner_height.max(1))
            .map(|line| Line::from(line.chars().skip(col_offset).collect::<String>()))
            .collect();
        Text::from(visible)
    };

    let input = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);
    frame.render_widget(input, area);

    let cursor_y = (cursor_line - row_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x as u16 + 1, area.y + cursor_y + 1));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode = app.session.mode();
    let mode_style = Style::default().bg(accent(mode)).fg(Color::Black);
    let mode_text = match mode {
        Mode::Chat => " ORACLE ",
        Mode::Match => " SYNERGY ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let disabled_style = Style::default().bg(Color::Black).fg(Color::DarkGray);

    let send_style = if app.session.can_submit() { label_style } else { disabled_style };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", send_style),
        Span::styled(" Tab ", key_style),
        Span::styled(" mode ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" ^U ", key_style),
        Span::styled(" clear ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
