//! Field rendering utilities for forms

use crate::state::{FieldKind, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows taken by a field, borders included
pub fn field_height(field: &FormField) -> u16 {
    if field.is_multiline() {
        6
    } else {
        3
    }
}

fn placeholder(field: &FormField) -> &'static str {
    match field.descriptor.kind {
        FieldKind::File => "(type a file path, Enter to attach)",
        FieldKind::Checkbox => "",
        _ => "(empty)",
    }
}

/// Draw a form field with its inline validation message.
///
/// Disabled fields belong to a section that is not unlocked yet; they are
/// dimmed and never show a cursor.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    is_enabled: bool,
) {
    let is_active = is_active && is_enabled;
    let error = field.visible_error().filter(|_| is_enabled);

    let accent = if !is_enabled {
        Color::DarkGray
    } else if error.is_some() {
        Color::Red
    } else if is_active {
        Color::Cyan
    } else {
        Color::Gray
    };
    let text_style = if is_enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    };

    let display_value = field.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        placeholder(field).to_string()
    } else {
        display_value
    };

    let cursor = if is_active { "▌" } else { "" };
    let mut lines: Vec<Line> = display_str
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), text_style)))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.spans
            .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
    }

    // Checkboxes carry their label next to the box
    let title = match field.descriptor.kind {
        FieldKind::Checkbox => String::new(),
        _ => format!(" {} ", field.label()),
    };
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
