use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;
use crate::app::App;
use crate::emoji;

const USER_COLOR: Color = Color::Magenta;
const MENU_ITEMS: &[&str] = &["Clear Chat"];

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    // Popups
    if app.menu_open {
        render_menu(frame, chat_area);
    } else if app.emoji_open {
        render_emoji_palette(app, frame, chat_area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", app.title), Style::default().fg(Color::White).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ])
    .alignment(Alignment::Center);

    let header = Paragraph::new(title).style(Style::default().bg(USER_COLOR));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();

    for turn in &app.transcript {
        let (alignment, text_style) = if turn.is_user() {
            (Alignment::Right, Style::default().fg(USER_COLOR))
        } else {
            (Alignment::Left, Style::default())
        };

        if turn.text.is_empty() {
            lines.push(Line::default());
        }
        for line in turn.text.lines() {
            lines.push(Line::styled(line.to_string(), text_style).alignment(alignment));
        }
        lines.push(
            Line::styled(turn.time_label(), Style::default().fg(Color::DarkGray))
                .alignment(alignment),
        );
        lines.push(Line::default());
    }

    if app.awaiting_reply {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::default());
    }

    // Measure with the same wrapping the paragraph renders with
    let chat = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    app.content_height = chat.line_count(app.chat_width);
    if app.follow {
        app.scroll_to_bottom();
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(chat.block(block).scroll((app.scroll, 0)), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(USER_COLOR))
        .title(" Type your message... ");

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = input_window(&app.input, app.cursor, inner_width);

    let input = Paragraph::new(visible_text).block(input_block);
    frame.render_widget(input, area);

    frame.set_cursor_position((area.x + 1 + cursor_x as u16, area.y + 1));
}

/// Slice of the draft that fits `width` columns with the cursor in view.
/// Returns the text and the cursor's column within it.
fn input_window(input: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }

    let chars: Vec<(char, usize)> = input
        .chars()
        .map(|c| (c, c.width().unwrap_or(0)))
        .collect();
    let cursor = cursor.min(chars.len());

    // Drop chars off the left until the text before the cursor leaves a cell for it
    let mut start = cursor;
    let mut before_cursor = 0;
    while start > 0 && before_cursor + chars[start - 1].1 < width {
        start -= 1;
        before_cursor += chars[start].1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for &(c, w) in &chars[start..] {
        if used + w > width {
            break;
        }
        visible.push(c);
        used += w;
    }

    (visible, before_cursor)
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let disabled_style = Style::default().bg(Color::Black).fg(Color::DarkGray);

    let send = if app.awaiting_reply {
        vec![
            Span::styled(" Enter ", disabled_style),
            Span::styled(" ... ", disabled_style),
        ]
    } else {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" Send ", label_style),
        ]
    };

    let hints = if app.menu_open {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" clear chat ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
        ]
    } else if app.emoji_open {
        vec![
            Span::styled(" Arrows ", key_style),
            Span::styled(" pick ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" insert ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
        ]
    } else {
        let mut hints = send;
        hints.extend(vec![
            Span::styled(" ^E ", key_style),
            Span::styled(" emoji ", label_style),
            Span::styled(" ^O ", key_style),
            Span::styled(" menu ", label_style),
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" quit ", label_style),
        ]);
        hints
    };

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_emoji_palette(app: &App, frame: &mut Frame, area: Rect) {
    // Each glyph takes a 2-wide cell plus a space; anchored bottom-left above the input
    let popup_width = ((emoji::COLUMNS * 3 + 3) as u16).min(area.width);
    let popup_height = (emoji::rows() as u16 + 2).min(area.height);
    let popup_area = Rect::new(
        area.x + 1u16.min(area.width.saturating_sub(popup_width)),
        area.y + area.height.saturating_sub(popup_height),
        popup_width,
        popup_height,
    );

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let highlight = Style::default().bg(USER_COLOR).fg(Color::White);
    let rows: Vec<Line> = emoji::PALETTE
        .chunks(emoji::COLUMNS)
        .enumerate()
        .map(|(row, glyphs)| {
            let spans: Vec<Span> = glyphs
                .iter()
                .enumerate()
                .flat_map(|(col, glyph)| {
                    let index = row * emoji::COLUMNS + col;
                    let style = if index == app.palette.index {
                        highlight
                    } else {
                        Style::default()
                    };
                    [Span::raw(" "), Span::styled(*glyph, style)]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(USER_COLOR))
        .title(" Emoji ");

    frame.render_widget(Paragraph::new(rows).block(block), popup_area);
}

fn render_menu(frame: &mut Frame, area: Rect) {
    let popup_width = 16u16.min(area.width);
    let popup_height = (MENU_ITEMS.len() as u16 + 2).min(area.height);
    let popup_area = Rect::new(
        area.x + area.width.saturating_sub(popup_width),
        area.y,
        popup_width,
        popup_height,
    );

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Menu ");

    let items: Vec<ListItem> = MENU_ITEMS
        .iter()
        .map(|item| {
            ListItem::new(format!(" {} ", item))
                .style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), popup_area);
}
