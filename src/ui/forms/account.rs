//! Sign-in and registration views

use super::{draw_button_row, draw_field_stack, draw_heading, draw_message};
use crate::app::App;
use ratatui::{layout::Rect, style::Color, Frame};

pub fn draw_sign_in(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.sign_in;
    let mut area = draw_heading(frame, area, "Sign in", Some("to submit support tickets"));
    if let Some(notice) = &form.notice {
        area = draw_message(frame, area, notice, Color::Green);
    }

    let rest = draw_field_stack(frame, area, &form.fields, &[0, 1], &|_: &str| true);
    let rest = match &form.error {
        Some(error) => draw_message(frame, rest, error, Color::Red),
        None => rest,
    };
    draw_button_row(
        frame,
        rest,
        &[("Sign in", true), ("Continue with Google (^G)", true)],
        0,
    );
}

pub fn draw_registration(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.registration;
    let area = draw_heading(frame, area, "Create an Account", None);
    let indices: Vec<usize> = (0..form.fields.iter().count()).collect();
    let rest = draw_field_stack(frame, area, &form.fields, &indices, &|_: &str| true);
    let rest = match &form.error {
        Some(error) => draw_message(frame, rest, error, Color::Red),
        None => rest,
    };
    draw_button_row(frame, rest, &[("Create account", true)], 0);
}
