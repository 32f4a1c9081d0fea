//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_button, render_sidebar_button, BUTTON_HEIGHT};
pub use dialog::{
    render_error_dialog, render_outcome_dialog, render_pending_dialog, render_priority_dialog,
};
