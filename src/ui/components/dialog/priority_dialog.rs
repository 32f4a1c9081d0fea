//! Resolution window notice for a chosen ticket priority

use super::base::{dismiss_hint, render_dialog, DialogConfig};
use crate::state::priority_notice;
use ratatui::{style::Color, Frame};

pub fn render_priority_dialog(frame: &mut Frame, priority: &str) {
    let mut chars = priority.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    let title = format!("Priority Level: {capitalized}");

    render_dialog(
        frame,
        DialogConfig {
            title: &title,
            accent: Color::Blue,
            message: priority_notice(priority).unwrap_or_default(),
            hint: Some(dismiss_hint("continue")),
            max_width: 56,
        },
    );
}
