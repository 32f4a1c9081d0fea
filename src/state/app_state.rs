//! Application state definitions

use super::forms::{ContactForm, IdRequestForm, RegistrationForm, SignInForm, TicketForm};
use super::submission::SubmissionOutcome;
use crate::routes::Route;
use std::collections::VecDeque;

/// Work started by a key press that needs the network.
///
/// It is queued so the view can render its pending state before the
/// request blocks the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    SubmitIdRequest,
    SubmitTicket,
    SubmitContact,
    SignIn { email: String, password: String },
    SignInFederated,
    SignOut,
}

impl PendingAction {
    /// Text shown while the action runs
    pub fn label(&self) -> &'static str {
        match self {
            PendingAction::SubmitIdRequest
            | PendingAction::SubmitTicket
            | PendingAction::SubmitContact => "Submitting...",
            PendingAction::SignIn { .. } | PendingAction::SignInFederated => "Signing in...",
            PendingAction::SignOut => "Signing out...",
        }
    }
}

/// One entry of the navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Open(Route),
    SignOut,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Open(Route::Home) => "Home",
            MenuItem::Open(Route::IdRequest) => "ID Request",
            MenuItem::Open(Route::Ticket) => "Support Ticket",
            MenuItem::Open(Route::Contact) => "Contact Us",
            MenuItem::Open(Route::SignIn) => "Sign in",
            MenuItem::Open(Route::SignUp) => "Create an Account",
            MenuItem::Open(route) => route.title(),
            MenuItem::SignOut => "Sign out",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    // Navigation
    pub current_route: Route,
    pub route_history: Vec<Route>,
    pub menu_index: usize,
    pub signed_in: bool,

    // Forms
    pub sign_in: SignInForm,
    pub registration: RegistrationForm,
    pub id_request: IdRequestForm,
    pub ticket: TicketForm,
    pub contact: ContactForm,

    // Modals
    pub pending: Option<PendingAction>,
    pub outcome: Option<SubmissionOutcome>,
    errors: VecDeque<String>,

    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(start: Route) -> Self {
        Self {
            current_route: start,
            ..Default::default()
        }
    }

    /// Menu entries for the current session
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let mut items = vec![
            MenuItem::Open(Route::Home),
            MenuItem::Open(Route::IdRequest),
            MenuItem::Open(Route::Ticket),
            MenuItem::Open(Route::Contact),
        ];
        if self.signed_in {
            items.push(MenuItem::SignOut);
        } else {
            items.push(MenuItem::Open(Route::SignIn));
            items.push(MenuItem::Open(Route::SignUp));
        }
        items
    }

    pub fn selected_menu_item(&self) -> Option<MenuItem> {
        self.menu_items().get(self.menu_index).copied()
    }

    pub fn move_menu_down(&mut self) {
        let count = self.menu_items().len();
        if count > 0 && self.menu_index < count - 1 {
            self.menu_index += 1;
        }
    }

    pub fn move_menu_up(&mut self) {
        self.menu_index = self.menu_index.saturating_sub(1);
    }

    /// Keep the menu cursor valid after the item list changed
    pub fn clamp_menu(&mut self) {
        let count = self.menu_items().len();
        self.menu_index = self.menu_index.min(count.saturating_sub(1));
    }

    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Whether a modal currently owns the keyboard
    pub fn is_modal_open(&self) -> bool {
        self.pending.is_some()
            || self.outcome.is_some()
            || self.has_errors()
            || self.ticket.priority_notice.is_some()
    }
}
