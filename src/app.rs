//! Application state and core logic

use crate::backend::{AuthError, AuthProvider, FirebaseAuth, FirestoreStore, HttpFormEndpoint};
use crate::config::AppConfig;
use crate::routes::{Route, ENTRY_ROUTE};
use crate::state::{
    AppState, AuthGate, BodyEncoding, Destination, FieldKind, Form, FormFields, GateState,
    MenuItem, Navigator, PendingAction, RegistrationForm, SessionCell, SessionSubscription,
    SignInForm, StepGroup, SubmissionOutcome, SubmissionPipeline, SubmissionRequest, User,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const SIGN_IN_SETTLE: Duration = Duration::from_secs(5);

/// Collects the redirects a gate asks for while it is polled
#[derive(Debug, Default)]
struct RedirectQueue(Vec<Route>);

impl Navigator for RedirectQueue {
    fn redirect(&mut self, route: Route) {
        self.0.push(route);
    }
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    config: AppConfig,
    auth: Arc<dyn AuthProvider>,
    pipeline: SubmissionPipeline,
    /// Long-lived view of the session for the menu and status bar
    session: SessionSubscription,
    user: Option<User>,
    /// Mounted while a gated route is shown
    gate: Option<AuthGate>,
    quit: bool,
}

impl App {
    /// Create the app with the HTTP-backed services described by `config`
    pub fn new(config: AppConfig) -> Self {
        let auth = Arc::new(FirebaseAuth::new(&config, SessionCell::new()));
        auth.start();

        let timeout = config.request_timeout();
        let store = FirestoreStore::new(
            config.firebase_project_id.clone().unwrap_or_default(),
            Arc::clone(&auth) as Arc<dyn AuthProvider>,
            timeout,
        );
        let pipeline = SubmissionPipeline::new(
            Arc::new(HttpFormEndpoint::new(timeout)),
            Arc::new(store),
        );
        Self::with_services(config, auth, pipeline)
    }

    pub fn with_services(
        config: AppConfig,
        auth: Arc<dyn AuthProvider>,
        pipeline: SubmissionPipeline,
    ) -> Self {
        let session = auth.subscribe();
        let start = Route::resolve(config.start_route());
        let mut app = Self {
            state: AppState::new(Route::Home),
            config,
            auth,
            pipeline,
            session,
            user: None,
            gate: None,
            quit: false,
        };
        app.enter(start);
        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// State of the auth gate, if the current route is gated
    pub fn gate_state(&self) -> Option<&GateState> {
        self.gate.as_ref().map(AuthGate::state)
    }

    /// The signed-in user as last reported by the provider
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.state.pending.is_some()
    }

    /// Pick up session changes and let a mounted gate resolve
    pub fn tick(&mut self) {
        if let Some(session) = self.session.try_resolved() {
            self.user = session.user().cloned();
            self.state.signed_in = self.user.is_some();
            self.state.clamp_menu();
        }

        let mut redirects = RedirectQueue::default();
        let mut authenticated_email = None;
        if let Some(gate) = self.gate.as_mut() {
            let was_checking = *gate.state() == GateState::Checking;
            if let GateState::Authenticated(user) = gate.poll(&mut redirects) {
                if was_checking {
                    authenticated_email = user.email.clone();
                }
            }
        }
        if let Some(email) = authenticated_email {
            self.state.ticket.prefill_email(&email);
        }
        for route in redirects.0 {
            self.state.status_message = Some("Please sign in to continue".to_string());
            self.navigate(route);
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Nothing else is accepted while a request is in flight
        if self.state.pending.is_some() {
            return Ok(());
        }

        if self.state.outcome.is_some() || self.state.ticket.priority_notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.outcome = None;
                self.state.ticket.priority_notice = None;
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        // A gate that is still checking shows a placeholder only
        if matches!(self.gate_state(), Some(GateState::Checking)) {
            if key.code == KeyCode::Esc {
                self.go_back();
            }
            return Ok(());
        }

        match self.state.current_route {
            Route::Home | Route::InProgress => self.handle_menu_key(key),
            Route::SignIn => self.handle_sign_in_key(key),
            Route::SignUp => self.handle_registration_key(key),
            Route::IdRequest => self.handle_id_request_key(key),
            Route::Ticket => self.handle_ticket_key(key),
            Route::Contact => self.handle_contact_key(key),
        }
        Ok(())
    }

    /// Navigate to a new route
    pub fn navigate(&mut self, route: Route) {
        if route == self.state.current_route {
            return;
        }
        self.state.route_history.push(self.state.current_route);
        self.enter(route);
    }

    /// Go back to the previous non-form route, or home
    pub fn go_back(&mut self) {
        while let Some(route) = self.state.route_history.pop() {
            if route.is_form_view() || route == self.state.current_route {
                continue;
            }
            self.enter(route);
            return;
        }
        if self.state.current_route != Route::Home {
            self.enter(Route::Home);
        }
    }

    fn enter(&mut self, route: Route) {
        // Dropping the gate releases its session subscription
        self.gate = None;
        self.state.current_route = route;
        if let Some(index) = self
            .state
            .menu_items()
            .iter()
            .position(|item| *item == MenuItem::Open(route))
        {
            self.state.menu_index = index;
        }
        if route == Route::IdRequest {
            self.state.id_request.focus_step_start();
        }
        tracing::debug!("Entered {}", route.path());

        if route.is_gated() {
            self.gate = Some(AuthGate::mount(self.auth.as_ref(), ENTRY_ROUTE));
            self.tick();
        }
    }

    /// Menu navigation on the home and placeholder pages
    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.state.move_menu_down(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.state.move_menu_up(),
            KeyCode::Enter => match self.state.selected_menu_item() {
                Some(MenuItem::Open(route)) => self.navigate(route),
                Some(MenuItem::SignOut) => self.state.pending = Some(PendingAction::SignOut),
                None => {}
            },
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_sign_in_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.sign_in;
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('g') if is_ctrl(&key) => {
                form.error = None;
                self.state.pending = Some(PendingAction::SignInFederated);
            }
            KeyCode::Char('r') if is_ctrl(&key) => self.navigate(Route::SignUp),
            _ if is_submit(&key) => {
                form.error = None;
                if let Some((email, password)) = form.credentials() {
                    self.state.pending = Some(PendingAction::SignIn { email, password });
                }
            }
            _ => {
                if move_focus(&mut form.fields, &key) || edit_active(&mut form.fields, &key) {
                    form.error = None;
                }
            }
        }
    }

    fn handle_registration_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.registration;
        match key.code {
            KeyCode::Esc => self.go_back(),
            _ if is_submit(&key) => {
                if form.check() {
                    tracing::info!("Registration details accepted");
                    self.state.registration = RegistrationForm::new();
                    self.state.sign_in.notice =
                        Some("Registration received. Please sign in to continue.".to_string());
                    self.navigate(Route::SignIn);
                }
            }
            _ => {
                if move_focus(&mut form.fields, &key) || edit_active(&mut form.fields, &key) {
                    form.error = None;
                }
            }
        }
    }

    fn handle_id_request_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.id_request;
        match key.code {
            KeyCode::Esc if form.steps.is_first() => self.go_back(),
            KeyCode::Esc => form.previous_step(),
            KeyCode::Tab | KeyCode::Down => {
                blur_active(&mut form.fields);
                form.focus_next(true);
            }
            KeyCode::BackTab | KeyCode::Up => {
                blur_active(&mut form.fields);
                form.focus_next(false);
            }
            KeyCode::Char('s') if is_ctrl(&key) => self.advance_id_request(),
            _ => {
                if !edit_active(&mut form.fields, &key) && key.code == KeyCode::Enter {
                    self.advance_id_request();
                }
            }
        }
    }

    /// Next step, or queue the submission from the last step
    fn advance_id_request(&mut self) {
        let form = &mut self.state.id_request;
        if !form.steps.is_last() {
            form.next_step();
            return;
        }
        let group = form.steps.current_group();
        if form.fields.all_valid(group.field_ids()) {
            self.queue_submission(PendingAction::SubmitIdRequest);
        } else {
            form.fields.reveal(group.field_ids());
        }
    }

    fn handle_ticket_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.ticket;
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('s') if is_ctrl(&key) => self.submit_ticket(),
            KeyCode::Tab | KeyCode::Down => {
                blur_active(&mut form.fields);
                form.focus_next(true);
            }
            KeyCode::BackTab | KeyCode::Up => {
                blur_active(&mut form.fields);
                form.focus_next(false);
            }
            KeyCode::Left | KeyCode::Right if active_is_choice(&form.fields) => {
                let step = if key.code == KeyCode::Right { 1 } else { -1 };
                form.cycle_active_choice(step);
            }
            _ if !form.active_is_interactive() => {}
            _ => {
                if edit_active(&mut form.fields, &key) {
                    form.refresh();
                } else if key.code == KeyCode::Enter {
                    blur_active(&mut form.fields);
                    form.focus_next(true);
                }
            }
        }
    }

    fn submit_ticket(&mut self) {
        let form = &mut self.state.ticket;
        if form.can_submit() {
            self.queue_submission(PendingAction::SubmitTicket);
            return;
        }
        // Sections unlock in order, so only the first blocking one is revealed
        if let Some(section) = form.sections.first_blocking() {
            form.fields.reveal(section.field_ids());
            self.state.status_message =
                Some(format!("Complete the {} section first", section.title()));
        }
    }

    fn handle_contact_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.contact;
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('s') if is_ctrl(&key) => {
                if form.can_submit() {
                    self.queue_submission(PendingAction::SubmitContact);
                } else {
                    form.fields.reveal_all();
                }
            }
            _ => {
                if !move_focus(&mut form.fields, &key)
                    && !edit_active(&mut form.fields, &key)
                    && key.code == KeyCode::Enter
                {
                    blur_active(&mut form.fields);
                    form.fields.next_field();
                }
            }
        }
    }

    fn queue_submission(&mut self, action: PendingAction) {
        self.state.outcome = Some(SubmissionOutcome::Pending);
        self.state.pending = Some(action);
    }

    /// Run the queued network action, if any.
    ///
    /// Called by the event loop after the pending state has been drawn.
    pub async fn run_pending(&mut self) {
        let Some(action) = self.state.pending.clone() else {
            return;
        };

        match action {
            PendingAction::SubmitIdRequest => {
                let request = SubmissionRequest::new(Destination::Endpoint {
                    url: self.config.id_request_url().to_string(),
                    encoding: BodyEncoding::UrlEncoded,
                });
                let form = &mut self.state.id_request;
                match form
                    .steps
                    .submit(&mut form.fields, &self.pipeline, &request)
                    .await
                {
                    Ok(outcome) => {
                        form.focus_step_start();
                        self.state.outcome = Some(outcome);
                    }
                    Err(e) => {
                        self.state.outcome = None;
                        tracing::debug!("ID request not submitted: {e}");
                    }
                }
            }
            PendingAction::SubmitTicket => {
                let user_id = self
                    .gate
                    .as_ref()
                    .and_then(AuthGate::user)
                    .map(|u| Value::from(u.uid.clone()))
                    .unwrap_or(Value::Null);
                let request = SubmissionRequest::new(Destination::Collection {
                    name: self.config.tickets_collection().to_string(),
                })
                .with_extra("status", "new")
                .with_extra("userId", user_id);

                let outcome = self
                    .pipeline
                    .submit(&mut self.state.ticket.fields, &request)
                    .await;
                if outcome.is_success() {
                    let email = self.user.as_ref().and_then(|u| u.email.clone());
                    self.state.ticket.reset_after_submit(email.as_deref());
                }
                self.state.outcome = Some(outcome);
            }
            PendingAction::SubmitContact => {
                let request = SubmissionRequest::new(Destination::Endpoint {
                    url: self.config.contact_url().to_string(),
                    encoding: BodyEncoding::Json,
                });
                let outcome = self
                    .pipeline
                    .submit(&mut self.state.contact.fields, &request)
                    .await;
                self.state.outcome = Some(outcome);
            }
            PendingAction::SignIn { email, password } => {
                match self.auth.sign_in_with_credentials(&email, &password).await {
                    Ok(_) => self.finish_sign_in().await,
                    Err(AuthError::InvalidCredentials) => {
                        self.state.sign_in.error = Some("Invalid email or password.".to_string());
                    }
                    Err(e) => {
                        tracing::warn!("Sign-in failed: {e}");
                        self.state.sign_in.error = Some(e.to_string());
                    }
                }
            }
            PendingAction::SignInFederated => match self.auth.sign_in_with_federated().await {
                Ok(_) => self.finish_sign_in().await,
                Err(e) => {
                    tracing::warn!("Google sign-in error: {e}");
                    self.state.sign_in.error = Some("Failed to sign in with Google.".to_string());
                }
            },
            PendingAction::SignOut => match self.auth.sign_out().await {
                Ok(()) => {
                    self.navigate(Route::Home);
                    self.state.status_message = Some("Signed out".to_string());
                }
                Err(e) => self.push_error(format!("Failed to sign out: {e}")),
            },
        }

        self.state.pending = None;
        self.tick();
    }

    async fn finish_sign_in(&mut self) {
        self.state.sign_in = SignInForm::new();
        self.tick();
        self.navigate(Route::Ticket);

        // A restore still in flight leaves the gate checking; wait for it briefly
        let mut redirects = RedirectQueue::default();
        let mut email = None;
        if let Some(gate) = self.gate.as_mut() {
            if *gate.state() == GateState::Checking {
                let settle = gate.settle(&mut redirects);
                if let Ok(GateState::Authenticated(user)) =
                    tokio::time::timeout(SIGN_IN_SETTLE, settle).await
                {
                    email = user.email.clone();
                }
            }
        }
        if let Some(email) = email {
            self.state.ticket.prefill_email(&email);
        }
        for route in redirects.0 {
            self.navigate(route);
        }
    }
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Enter, or Ctrl+S from anywhere in the form
fn is_submit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter || (key.code == KeyCode::Char('s') && is_ctrl(key))
}

/// Mark the focused field as visited so its message can show
fn blur_active(fields: &mut FormFields) {
    if let Some(field) = fields.get_active_field_mut() {
        field.touched = true;
    }
}

fn active_is_choice(fields: &FormFields) -> bool {
    fields
        .get_field(fields.active_field())
        .is_some_and(|f| matches!(f.descriptor.kind, FieldKind::Choice { .. }))
}

/// Tab/arrow focus movement; returns whether the key was used
fn move_focus(fields: &mut FormFields, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            blur_active(fields);
            fields.next_field();
            true
        }
        KeyCode::BackTab | KeyCode::Up => {
            blur_active(fields);
            fields.prev_field();
            true
        }
        _ => false,
    }
}

/// Apply an editing key to the focused field; returns whether it changed
fn edit_active(fields: &mut FormFields, key: &KeyEvent) -> bool {
    if is_ctrl(key) {
        return false;
    }
    let Some(field) = fields.get_active_field_mut() else {
        return false;
    };
    match (key.code, field.descriptor.kind) {
        (KeyCode::Left, FieldKind::Choice { .. }) => field.cycle_choice(-1),
        (KeyCode::Right, FieldKind::Choice { .. }) => field.cycle_choice(1),
        (KeyCode::Enter, FieldKind::Multiline) => field.push_char('\n'),
        (KeyCode::Enter, FieldKind::File) => {
            field.touched = true;
            if !field.attach_typed_path() {
                tracing::debug!("No file at {:?}", field.path_input);
            }
        }
        (KeyCode::Char(c), _) => field.push_char(c),
        (KeyCode::Backspace, _) => field.pop_char(),
        _ => return false,
    }
    true
}
