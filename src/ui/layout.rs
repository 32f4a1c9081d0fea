//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::routes::Route;
use crate::state::MenuItem;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Sidebar
            Constraint::Min(0),                // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(chunks[0]);

    let content = Rect {
        x: main_chunks[0].x + 1,
        width: main_chunks[0].width.saturating_sub(2),
        ..main_chunks[0]
    };
    (sidebar_chunks[0], content)
}

/// Draw the navigation menu as boxed buttons
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let items = app.state.menu_items();
    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(items.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // The menu cursor is only shown where the menu owns the keyboard
    let menu_focused = !app.state.current_route.is_form_view();
    for (idx, item) in items.iter().enumerate() {
        let is_current = matches!(item, MenuItem::Open(route) if *route == app.state.current_route);
        render_sidebar_button(
            frame,
            chunks[idx + 1],
            item.label(),
            menu_focused && idx == app.state.menu_index,
            is_current,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Session indicator
    match app.current_user() {
        Some(user) => {
            let who = user.email.as_deref().unwrap_or(user.uid.as_str());
            spans.push(Span::styled(" ● ", Style::default().fg(Color::Green)));
            spans.push(Span::styled(
                format!("{who}  "),
                Style::default().fg(Color::Gray),
            ));
        }
        None => spans.push(Span::styled(" ○ ", Style::default().fg(Color::DarkGray))),
    }

    let hints = if app.state.is_modal_open() {
        "Enter/Esc:close"
    } else {
        route_hints(app.state.current_route)
    };
    spans.push(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    ));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let path_hint = format!(" {} ", app.state.current_route.path());
    let path_area = Rect {
        x: area.width.saturating_sub(path_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (path_hint.len() as u16).min(area.width),
        height: 1,
    };
    let path_widget =
        Paragraph::new(path_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(path_widget, path_area);
}

/// Keyboard hints for the current route
fn route_hints(route: Route) -> &'static str {
    match route {
        Route::Home => "j/k:nav  Enter:open  q:quit",
        Route::InProgress => "j/k:nav  Enter:open  Esc:back  q:quit",
        Route::IdRequest => "Tab:next field  Enter:next step  ^S:submit  Esc:previous",
        Route::Ticket => "Tab:next field  ←/→:choose  ^S:submit  Esc:back",
        Route::Contact => "Tab:next field  ^S:send  Esc:back",
        Route::SignIn => "Tab:next field  Enter:sign in  ^G:Google  ^R:register  Esc:back",
        Route::SignUp => "Tab:next field  Space:toggle  Enter:register  Esc:back",
    }
}
