//! Landing page and the placeholder for unfinished pages

use crate::app::App;
use crate::routes::Route;
use crate::state::MenuItem;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn describe(item: MenuItem) -> &'static str {
    match item {
        MenuItem::Open(Route::IdRequest) => {
            "Request a company ID. You will need a photo and an e-signature image."
        }
        MenuItem::Open(Route::Ticket) => {
            "Report an IT issue to the support team. Requires signing in."
        }
        MenuItem::Open(Route::Contact) => "Send us a message.",
        MenuItem::Open(Route::SignIn) => "Sign in with your company account.",
        MenuItem::Open(Route::SignUp) => "Register for an account.",
        MenuItem::SignOut => "End your session on this machine.",
        MenuItem::Open(_) => "",
    }
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let greeting = match app.current_user().and_then(|u| u.email.as_deref()) {
        Some(email) => format!("Welcome back, {email}"),
        None => "Welcome".to_string(),
    };
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Citimax Employee Services",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(greeting, Style::default().fg(Color::DarkGray))),
        ]),
        chunks[0],
    );

    let items = app.state.menu_items();
    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !describe(**item).is_empty())
        .map(|(i, item)| {
            let selected = i == app.state.menu_index;
            let style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<20}", item.label()), style),
                Span::styled(describe(*item), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP).title(" Services ")),
        chunks[1],
    );
}

pub fn draw_in_progress(frame: &mut Frame, area: Rect) {
    let y = area.y + area.height / 3;
    let text_area = Rect {
        y,
        height: area.height.saturating_sub(y - area.y),
        ..area
    };
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Page in Progress",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "This page is still being built. Press Esc to go back.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center),
        text_area,
    );
}
