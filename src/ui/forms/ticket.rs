//! Support ticket view

use super::{draw_button_row, draw_field_stack, draw_heading};
use crate::app::App;
use crate::state::{StepGroup, TicketSection};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

pub fn draw_ticket(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.ticket;
    let mut area = draw_heading(frame, area, "Submit a Support Ticket", None);

    for (index, section) in TicketSection::ALL.iter().enumerate() {
        let unlocked = form.sections.is_interactive(index);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let (marker, style) = if form.sections.is_ready(index) {
            ("✓", Style::default().fg(Color::Green))
        } else if unlocked {
            ("•", Style::default().add_modifier(Modifier::BOLD))
        } else {
            ("🔒", Style::default().fg(Color::DarkGray))
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{marker} {}. {}", index + 1, section.title()),
                style,
            )),
            chunks[0],
        );

        let indices: Vec<usize> = section
            .field_ids()
            .iter()
            .filter_map(|id| form.fields.index_of(id))
            .collect();
        area = draw_field_stack(frame, chunks[1], &form.fields, &indices, &|_: &str| {
            unlocked
        });
    }

    draw_button_row(frame, area, &[("Submit Ticket", form.can_submit())], 0);
}
