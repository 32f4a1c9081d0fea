//! Dialog components for TUI

mod base;
mod error_dialog;
mod outcome_dialog;
mod priority_dialog;

pub use error_dialog::render_error_dialog;
pub use outcome_dialog::{render_outcome_dialog, render_pending_dialog};
pub use priority_dialog::render_priority_dialog;
