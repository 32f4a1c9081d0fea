//! UI module for rendering the TUI

mod components;
mod forms;
mod home;
mod layout;

use crate::app::App;
use crate::routes::Route;
use crate::state::GateState;
use components::{
    render_error_dialog, render_outcome_dialog, render_pending_dialog, render_priority_dialog,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (sidebar_area, main_area) = layout::create_layout(area);

    layout::draw_sidebar(frame, sidebar_area, app);

    let route = app.state.current_route;
    if matches!(app.gate_state(), Some(GateState::Checking)) {
        draw_placeholder(frame, main_area, "Checking your session...");
    } else {
        match route {
            Route::Home => home::draw(frame, main_area, app),
            Route::SignIn => forms::draw_sign_in(frame, main_area, app),
            Route::SignUp => forms::draw_registration(frame, main_area, app),
            Route::IdRequest => forms::draw_id_request(frame, main_area, app),
            Route::Ticket => forms::draw_ticket(frame, main_area, app),
            Route::Contact => forms::draw_contact(frame, main_area, app),
            Route::InProgress => home::draw_in_progress(frame, main_area),
        }
    }

    layout::draw_status_bar(frame, app);

    // Modals, topmost last
    if let Some(priority) = &app.state.ticket.priority_notice {
        render_priority_dialog(frame, priority);
    }
    if let Some(outcome) = &app.state.outcome {
        let subject = match route {
            Route::Ticket => "ticket",
            Route::Contact => "message",
            _ => "form",
        };
        render_outcome_dialog(frame, outcome, subject);
    }
    // Submissions already show their pending outcome
    if let (Some(pending), None) = (&app.state.pending, &app.state.outcome) {
        render_pending_dialog(frame, pending.label());
    }
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    }
}

fn draw_placeholder(frame: &mut Frame, area: Rect, text: &str) {
    let y = area.y + area.height / 2;
    let line = Rect {
        y,
        height: 1.min(area.height),
        ..area
    };
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        line,
    );
}
