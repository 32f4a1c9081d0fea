//! Form views

mod account;
mod contact;
mod field_renderer;
mod id_request;
mod ticket;

pub use account::{draw_registration, draw_sign_in};
pub use contact::draw_contact;
pub use id_request::draw_id_request;
pub use ticket::draw_ticket;

use super::components::{render_button, BUTTON_HEIGHT};
use crate::state::FormFields;
use field_renderer::{draw_field, field_height};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Draw the fields at `indices` stacked from the top of `area`.
///
/// Returns the area left below them.
fn draw_field_stack(
    frame: &mut Frame,
    area: Rect,
    fields: &FormFields,
    indices: &[usize],
    is_enabled: &dyn Fn(&str) -> bool,
) -> Rect {
    let stacked: Vec<_> = indices
        .iter()
        .filter_map(|i| fields.iter().nth(*i).map(|f| (*i, f)))
        .collect();
    let mut constraints: Vec<Constraint> = stacked
        .iter()
        .map(|(_, f)| Constraint::Length(field_height(f)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (slot, (index, field)) in stacked.iter().enumerate() {
        draw_field(
            frame,
            chunks[slot],
            field,
            *index == fields.active_field_index,
            is_enabled(field.id()),
        );
    }
    chunks[stacked.len()]
}

/// Bold heading line followed by an optional dim subtitle
fn draw_heading(frame: &mut Frame, area: Rect, title: &str, subtitle: Option<&str>) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);
    let mut spans = vec![Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(subtitle) = subtitle {
        spans.push(Span::styled(
            format!("  {subtitle}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);
    chunks[1]
}

/// One line of colored text, e.g. an inline form error
fn draw_message(frame: &mut Frame, area: Rect, message: &str, color: Color) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(
        Paragraph::new(Span::styled(message.to_string(), Style::default().fg(color))),
        chunks[0],
    );
    chunks[1]
}

/// A row of buttons: `(label, enabled)`, all drawn unselected except `primary`
fn draw_button_row(frame: &mut Frame, area: Rect, buttons: &[(&str, bool)], primary: usize) {
    let row = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(BUTTON_HEIGHT), Constraint::Min(0)])
        .split(area)[0];
    let mut constraints: Vec<Constraint> = buttons
        .iter()
        .map(|(label, _)| Constraint::Length(label.chars().count() as u16 + 4))
        .collect();
    constraints.push(Constraint::Min(0));
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(row);
    for (i, (label, enabled)) in buttons.iter().enumerate() {
        render_button(frame, cells[i], label, i == primary, *enabled);
    }
}
