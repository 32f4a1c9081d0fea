//! Employee ID request view

use super::{draw_button_row, draw_field_stack, draw_heading};
use crate::app::App;
use crate::state::{IdRequestStep, StepGroup};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

pub fn draw_id_request(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.id_request;
    let steps = &form.steps;
    let area = draw_heading(
        frame,
        area,
        "Employee Information Form",
        Some("All fields are required"),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Step titles
            Constraint::Length(1), // Progress
            Constraint::Length(1),
            Constraint::Min(0), // Fields and buttons
        ])
        .split(area);

    let titles: Vec<Span> = IdRequestStep::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, step)| {
            let style = if i == steps.current_step() {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if i < steps.current_step() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [
                Span::styled(format!("{}. {}", i + 1, step.title()), style),
                Span::raw("   "),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(titles)), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
        .ratio(steps.progress())
        .label(format!(
            "Step {} of {}",
            steps.current_step() + 1,
            steps.step_count()
        ));
    frame.render_widget(gauge, chunks[1]);

    let rest = draw_field_stack(
        frame,
        chunks[3],
        &form.fields,
        &form.step_indices(),
        &|_: &str| true,
    );

    let primary = if steps.is_last() { "Submit" } else { "Next" };
    draw_button_row(
        frame,
        rest,
        &[("Back", !steps.is_first()), (primary, true)],
        1,
    );
}
