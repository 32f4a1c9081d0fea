//! Submission status dialogs

use super::base::{dismiss_hint, render_dialog, DialogConfig};
use crate::state::SubmissionOutcome;
use ratatui::{style::Color, Frame};

/// Shown while a network action is in flight; it has no dismiss hint
pub fn render_pending_dialog(frame: &mut Frame, label: &str) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Please wait",
            accent: Color::Yellow,
            message: label,
            hint: None,
            max_width: 40,
        },
    );
}

/// Result of a submission; `subject` names what was sent ("ticket", "form")
pub fn render_outcome_dialog(frame: &mut Frame, outcome: &SubmissionOutcome, subject: &str) {
    let (title, accent, message) = match outcome {
        SubmissionOutcome::Pending => ("Please wait", Color::Yellow, "Submitting...".to_string()),
        SubmissionOutcome::Success => (
            "Success",
            Color::Green,
            format!(
                "Your {subject} was submitted successfully! We'll get back to you as soon as possible."
            ),
        ),
        SubmissionOutcome::Failure(reason) => (
            "Error",
            Color::Red,
            format!("There was a problem submitting your {subject}. Please try again.\n\n{reason}"),
        ),
    };
    let hint = (!outcome.is_pending()).then(|| dismiss_hint("close"));

    render_dialog(
        frame,
        DialogConfig {
            title,
            accent,
            message: &message,
            hint,
            max_width: 60,
        },
    );
}
