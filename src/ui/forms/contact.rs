//! Contact view

use super::{draw_button_row, draw_field_stack, draw_heading};
use crate::app::App;
use ratatui::{layout::Rect, Frame};

pub fn draw_contact(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.contact;
    let area = draw_heading(
        frame,
        area,
        "Contact Us",
        Some("We usually reply within one business day"),
    );
    let indices: Vec<usize> = (0..form.fields.iter().count()).collect();
    let rest = draw_field_stack(frame, area, &form.fields, &indices, &|_: &str| true);
    draw_button_row(frame, rest, &[("Send Message", form.can_submit())], 0);
}
