//! Top-level application state and key routing.
//!
//! Everything the renderer draws lives here. Key handling mutates state
//! synchronously; network work is queued as an [`AsyncCommand`] and its
//! [`CommandResult`] is folded back in by `apply_command_result`.

pub mod async_ops;

use crossterm::event::KeyCode;

pub use async_ops::{AsyncCommand, CommandResult};

use crate::directory::EventDirectory;
use crate::models::{EventDraft, Society, User};
use crate::session::{can_access_dashboard, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Directory,
    Dashboard,
}

/// Which side of the entry card is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
}

#[derive(Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub field: AuthField,
    pub loading: bool,
    pub status: Option<String>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::SignIn,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            field: AuthField::Username,
            loading: false,
            status: None,
        }
    }
}

impl AuthForm {
    fn next_field(&mut self) {
        self.field = match (self.field, self.mode) {
            (AuthField::Username, AuthMode::SignUp) => AuthField::Email,
            (AuthField::Username, AuthMode::SignIn) => AuthField::Password,
            (AuthField::Email, _) => AuthField::Password,
            (AuthField::Password, _) => AuthField::Username,
        };
    }

    fn prev_field(&mut self) {
        self.field = match (self.field, self.mode) {
            (AuthField::Username, _) => AuthField::Password,
            (AuthField::Email, _) => AuthField::Username,
            (AuthField::Password, AuthMode::SignUp) => AuthField::Email,
            (AuthField::Password, AuthMode::SignIn) => AuthField::Username,
        };
    }

    fn field_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    fn can_submit(&self) -> bool {
        let base = !self.username.is_empty() && !self.password.is_empty();
        match self.mode {
            AuthMode::SignIn => base,
            AuthMode::SignUp => base && !self.email.is_empty(),
        }
    }

    fn set_mode(&mut self, mode: AuthMode) {
        if self.mode != mode {
            self.mode = mode;
            self.field = AuthField::Username;
            self.status = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSection {
    Societies,
    CreateEvent,
    Events,
}

impl DashboardSection {
    pub fn title(self) -> (&'static str, &'static str) {
        match self {
            DashboardSection::Societies => (
                "Society Management",
                "Review pending registration requests.",
            ),
            DashboardSection::CreateEvent => (
                "Create New Event",
                "Input details strictly following the database schema.",
            ),
            DashboardSection::Events => (
                "Active Campus Events",
                "Currently published events for students.",
            ),
        }
    }
}

pub const EVENT_FORM_FIELDS: [&str; 6] = [
    "Title",
    "Category",
    "Date (YYYY-MM-DD HH:MM:SS)",
    "Venue",
    "Short description",
    "Registration form link",
];

#[derive(Debug, Default)]
pub struct EventForm {
    pub title: String,
    pub category: String,
    pub event_date: String,
    pub venue: String,
    pub short_description: String,
    pub google_form_link: String,
    pub field: usize,
    pub submitting: bool,
    pub status: Option<String>,
}

impl EventForm {
    pub fn field_value(&self, index: usize) -> &str {
        match index {
            0 => &self.title,
            1 => &self.category,
            2 => &self.event_date,
            3 => &self.venue,
            4 => &self.short_description,
            _ => &self.google_form_link,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.title,
            1 => &mut self.category,
            2 => &mut self.event_date,
            3 => &mut self.venue,
            4 => &mut self.short_description,
            _ => &mut self.google_form_link,
        }
    }

    fn draft(&self, society_id: i64) -> EventDraft {
        EventDraft {
            society_id,
            title: self.title.clone(),
            category: self.category.clone(),
            event_date: self.event_date.clone(),
            venue: self.venue.clone(),
            // The listing card shows the short text; the API requires the
            // long field as well, so the short text doubles for both.
            description: self.short_description.clone(),
            short_description: self.short_description.clone(),
            google_form_link: self.google_form_link.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Info,
    Success,
    Error,
}

pub struct App {
    pub view: View,
    pub auth: AuthForm,
    pub directory: EventDirectory,
    /// Index into the directory's visible cards.
    pub selected: usize,
    pub searching: bool,
    pub societies: Vec<Society>,
    pub societies_loading: bool,
    pub society_selected: usize,
    pub section: DashboardSection,
    pub event_form: EventForm,
    pub current_user: Option<User>,
    pub flash: Option<(FlashLevel, String)>,
    pub pending_command: Option<AsyncCommand>,
    session: SessionStore,
}

impl App {
    pub fn new(session: SessionStore) -> Self {
        let mut app = Self {
            view: View::Login,
            auth: AuthForm::default(),
            directory: EventDirectory::new(),
            selected: 0,
            searching: false,
            societies: Vec::new(),
            societies_loading: false,
            society_selected: 0,
            section: DashboardSection::Events,
            event_form: EventForm::default(),
            current_user: session.load(),
            flash: None,
            pending_command: None,
            session,
        };
        if let Some(user) = app.current_user.clone() {
            app.route_for(&user);
        }
        app
    }

    /// Picks the landing view for a logged-in user: management roles go to
    /// their dashboard section, everyone else to the public directory.
    fn route_for(&mut self, user: &User) {
        if can_access_dashboard(user) {
            self.view = View::Dashboard;
            if user.role == "admin" {
                self.enter_section(DashboardSection::Societies);
            } else {
                self.enter_section(DashboardSection::CreateEvent);
            }
        } else {
            self.view = View::Directory;
            self.request_events();
        }
    }

    fn enter_section(&mut self, section: DashboardSection) {
        self.section = section;
        match section {
            DashboardSection::Societies => {
                self.societies_loading = true;
                self.pending_command = Some(AsyncCommand::FetchSocieties);
            }
            DashboardSection::Events => self.request_events(),
            DashboardSection::CreateEvent => {}
        }
    }

    fn request_events(&mut self) {
        let seq = self.directory.begin_load();
        self.pending_command = Some(AsyncCommand::FetchEvents { seq });
    }

    fn is_admin(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|u| u.role == "admin")
    }

    pub fn flash_success(&mut self, msg: impl Into<String>) {
        self.flash = Some((FlashLevel::Success, msg.into()));
    }

    pub fn flash_error(&mut self, msg: impl Into<String>) {
        self.flash = Some((FlashLevel::Error, msg.into()));
    }

    pub fn flash_info(&mut self, msg: impl Into<String>) {
        self.flash = Some((FlashLevel::Info, msg.into()));
    }

    fn clamp_selection(&mut self) {
        let visible = self.directory.visible_count();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    /// Routes one key press. Returns true when the application should exit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        self.flash = None;
        match self.view {
            View::Login => self.handle_login_key(key),
            View::Directory => self.handle_directory_key(key),
            View::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyCode) -> bool {
        if self.auth.loading {
            // The form stays inert while a request is in flight; it is
            // re-enabled by the result.
            return matches!(key, KeyCode::Esc);
        }
        match key {
            KeyCode::Esc => return true,
            KeyCode::Left => self.auth.set_mode(AuthMode::SignIn),
            KeyCode::Right => self.auth.set_mode(AuthMode::SignUp),
            KeyCode::Tab | KeyCode::Down => self.auth.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.auth.prev_field(),
            KeyCode::Backspace => {
                self.auth.field_mut().pop();
            }
            KeyCode::Char(c) => self.auth.field_mut().push(c),
            KeyCode::Enter => {
                if !self.auth.can_submit() {
                    self.auth.status = Some("All fields are required".to_string());
                    return false;
                }
                self.auth.loading = true;
                self.auth.status = None;
                self.pending_command = Some(match self.auth.mode {
                    AuthMode::SignIn => AsyncCommand::Login {
                        username: self.auth.username.clone(),
                        password: self.auth.password.clone(),
                    },
                    AuthMode::SignUp => AsyncCommand::Register {
                        username: self.auth.username.clone(),
                        email: self.auth.email.clone(),
                        password: self.auth.password.clone(),
                    },
                });
            }
            _ => {}
        }
        false
    }

    fn handle_directory_key(&mut self, key: KeyCode) -> bool {
        if self.searching {
            self.handle_search_key(key);
            return false;
        }
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('c') => {
                self.directory.cycle_category();
                self.clamp_selection();
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => {
                self.selected = self.directory.visible_count().saturating_sub(1);
            }
            KeyCode::Char('r') => self.request_events(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected_interest(),
            KeyCode::Char('d') => {
                if let Some(user) = self.current_user.clone() {
                    if can_access_dashboard(&user) {
                        self.view = View::Dashboard;
                        self.enter_section(self.section);
                    }
                }
            }
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.searching = false;
                self.directory.clear_search();
            }
            KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => self.directory.pop_search(),
            KeyCode::Char(c) => self.directory.push_search(c),
            _ => {}
        }
        self.clamp_selection();
    }

    fn select_next(&mut self) {
        let visible = self.directory.visible_count();
        if visible > 0 && self.selected + 1 < visible {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Optimistic toggle: the card flips immediately, the backend is told
    /// on a best-effort side channel that never reverts the UI.
    fn toggle_selected_interest(&mut self) {
        let Some(&event_id) = self.directory.visible_ids().get(self.selected) else {
            return;
        };
        if let Some(interested) = self.directory.toggle_interest(event_id) {
            self.pending_command = Some(AsyncCommand::ReportInterest {
                event_id,
                interested,
            });
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) -> bool {
        match self.section {
            DashboardSection::CreateEvent => self.handle_event_form_key(key),
            DashboardSection::Societies => self.handle_societies_key(key),
            DashboardSection::Events => self.handle_dashboard_events_key(key),
        }
    }

    fn switch_section_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('1') if self.is_admin() => {
                self.enter_section(DashboardSection::Societies);
                true
            }
            KeyCode::Char('2') => {
                self.enter_section(DashboardSection::CreateEvent);
                true
            }
            KeyCode::Char('3') => {
                self.enter_section(DashboardSection::Events);
                true
            }
            _ => false,
        }
    }

    fn handle_societies_key(&mut self, key: KeyCode) -> bool {
        if self.switch_section_key(key) {
            return false;
        }
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                self.view = View::Directory;
                self.request_events();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.society_selected + 1 < self.societies.len() {
                    self.society_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.society_selected = self.society_selected.saturating_sub(1);
            }
            KeyCode::Char('a') | KeyCode::Enter => {
                if let Some(society) = self.societies.get(self.society_selected) {
                    if society.is_verified {
                        self.flash_info("Society is already verified");
                    } else {
                        self.pending_command = Some(AsyncCommand::VerifySociety {
                            society_id: society.id,
                        });
                    }
                }
            }
            KeyCode::Char('r') => {
                self.societies_loading = true;
                self.pending_command = Some(AsyncCommand::FetchSocieties);
            }
            _ => {}
        }
        false
    }

    fn handle_event_form_key(&mut self, key: KeyCode) -> bool {
        if self.event_form.submitting {
            return false;
        }
        match key {
            KeyCode::Esc => self.enter_section(DashboardSection::Events),
            KeyCode::Tab | KeyCode::Down => {
                self.event_form.field = (self.event_form.field + 1) % EVENT_FORM_FIELDS.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.event_form.field = self
                    .event_form
                    .field
                    .checked_sub(1)
                    .unwrap_or(EVENT_FORM_FIELDS.len() - 1);
            }
            KeyCode::Backspace => {
                self.event_form.field_mut().pop();
            }
            KeyCode::Char(c) => self.event_form.field_mut().push(c),
            KeyCode::Enter => self.submit_event_form(),
            _ => {}
        }
        false
    }

    fn submit_event_form(&mut self) {
        let Some(society_id) = self
            .current_user
            .as_ref()
            .and_then(|user| user.society_id())
        else {
            self.event_form.status = Some("Error: Society profile not found.".to_string());
            return;
        };
        if self.event_form.title.is_empty() || self.event_form.event_date.is_empty() {
            self.event_form.status = Some("Title and date are required".to_string());
            return;
        }
        self.event_form.submitting = true;
        self.event_form.status = None;
        self.pending_command = Some(AsyncCommand::PublishEvent {
            draft: self.event_form.draft(society_id),
        });
    }

    fn handle_dashboard_events_key(&mut self, key: KeyCode) -> bool {
        if !self.searching && self.switch_section_key(key) {
            return false;
        }
        if let KeyCode::Esc = key {
            if !self.searching {
                self.view = View::Directory;
                return false;
            }
        }
        self.handle_directory_key(key)
    }

    /// Folds a completed network call back into the state. Every failure
    /// path re-enables whatever it disabled.
    pub fn apply_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Events { seq, result } => {
                self.directory.finish_load(seq, result);
                self.clamp_selection();
            }

            CommandResult::Societies(Ok(societies)) => {
                self.societies_loading = false;
                self.societies = societies;
                self.society_selected = self
                    .society_selected
                    .min(self.societies.len().saturating_sub(1));
            }
            CommandResult::Societies(Err(e)) => {
                self.societies_loading = false;
                self.flash_error(e.user_message());
            }

            CommandResult::Verified(Ok(())) => {
                self.flash_success("Society verified");
                self.societies_loading = true;
                self.pending_command = Some(AsyncCommand::FetchSocieties);
            }
            CommandResult::Verified(Err(e)) => self.flash_error(e.user_message()),

            CommandResult::Published(Ok(())) => {
                self.event_form = EventForm::default();
                self.flash_success("Event created successfully");
                self.enter_section(DashboardSection::Events);
            }
            CommandResult::Published(Err(e)) => {
                self.event_form.submitting = false;
                self.event_form.status = Some(e.user_message());
            }

            CommandResult::Auth(Ok(user)) => {
                self.auth.loading = false;
                if let Err(e) = self.session.save(&user) {
                    // Login still works for this run; only persistence is lost.
                    e.log();
                }
                self.current_user = Some(user.clone());
                self.route_for(&user);
            }
            CommandResult::Auth(Err(e)) => {
                self.auth.loading = false;
                self.auth.status = Some(e.user_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::utils::error::AppError;
    use tempfile::TempDir;

    fn new_app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        (App::new(store), dir)
    }

    fn user(role: &str) -> User {
        let society = if role == "society" {
            serde_json::json!({"id": 7, "name": "Chess Club", "member_count": 3,
                               "is_verified": true})
        } else {
            serde_json::Value::Null
        };
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "sam",
            "role": role,
            "society": society
        }))
        .unwrap()
    }

    fn events() -> Vec<Event> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "title": "AI Summit", "category": "Tech",
             "organizer": {"id": 1, "name": "Tech Society"}},
            {"id": 2, "title": "Debate Night", "category": "Debating",
             "organizer": {"id": 2, "name": "Oratory Union"}},
        ]))
        .unwrap()
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn starts_logged_out_on_the_entry_screen() {
        let (app, _dir) = new_app();
        assert_eq!(app.view, View::Login);
        assert!(app.pending_command.is_none());
    }

    #[test]
    fn student_login_lands_on_the_directory_and_fetches_events() {
        let (mut app, _dir) = new_app();
        app.auth.loading = true;
        app.apply_command_result(CommandResult::Auth(Ok(user("student"))));

        assert_eq!(app.view, View::Directory);
        assert!(matches!(
            app.pending_command,
            Some(AsyncCommand::FetchEvents { .. })
        ));
        assert!(!app.auth.loading);
    }

    #[test]
    fn society_login_lands_on_the_event_form() {
        let (mut app, _dir) = new_app();
        app.apply_command_result(CommandResult::Auth(Ok(user("society"))));
        assert_eq!(app.view, View::Dashboard);
        assert_eq!(app.section, DashboardSection::CreateEvent);
    }

    #[test]
    fn admin_login_lands_on_society_management() {
        let (mut app, _dir) = new_app();
        app.apply_command_result(CommandResult::Auth(Ok(user("admin"))));
        assert_eq!(app.view, View::Dashboard);
        assert_eq!(app.section, DashboardSection::Societies);
        assert!(matches!(
            app.pending_command,
            Some(AsyncCommand::FetchSocieties)
        ));
    }

    #[test]
    fn login_persists_the_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut app = App::new(SessionStore::new(path.clone()));
        app.apply_command_result(CommandResult::Auth(Ok(user("student"))));

        let reloaded = SessionStore::new(path).load().expect("session persisted");
        assert_eq!(reloaded.username, "sam");
    }

    #[test]
    fn failed_login_re_enables_the_form_with_the_server_message() {
        let (mut app, _dir) = new_app();
        app.auth.loading = true;
        app.apply_command_result(CommandResult::Auth(Err(AppError::Api {
            status: 401,
            message: "Invalid username or password".into(),
        })));
        assert!(!app.auth.loading);
        assert_eq!(
            app.auth.status.as_deref(),
            Some("Invalid username or password")
        );
        assert_eq!(app.view, View::Login);
    }

    #[test]
    fn typing_a_search_narrows_the_visible_cards() {
        let (mut app, _dir) = new_app();
        app.current_user = Some(user("student"));
        app.view = View::Directory;
        app.directory = EventDirectory::from_events(events());

        app.handle_key(KeyCode::Char('/'));
        assert!(app.searching);
        type_str(&mut app, "debate");

        assert_eq!(app.directory.visible_ids(), vec![2]);
        app.handle_key(KeyCode::Enter);
        assert!(!app.searching);
        // The narrowed set survives leaving search entry.
        assert_eq!(app.directory.visible_ids(), vec![2]);
    }

    #[test]
    fn toggling_interest_queues_the_best_effort_report() {
        let (mut app, _dir) = new_app();
        app.current_user = Some(user("student"));
        app.view = View::Directory;
        app.directory = EventDirectory::from_events(events());

        app.handle_key(KeyCode::Char(' '));
        assert!(app.directory.card(1).unwrap().interested);
        assert!(matches!(
            app.pending_command,
            Some(AsyncCommand::ReportInterest {
                event_id: 1,
                interested: true
            })
        ));
        // The other card is untouched.
        assert_eq!(app.directory.card(2).unwrap().interest_label(), "Interested");
    }

    #[test]
    fn selection_follows_the_filtered_list() {
        let (mut app, _dir) = new_app();
        app.view = View::Directory;
        app.directory = EventDirectory::from_events(events());
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.selected, 1);

        app.handle_key(KeyCode::Char('/'));
        type_str(&mut app, "summit");
        // Only one card is visible now; the selection clamps onto it.
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn successful_verification_refetches_societies() {
        let (mut app, _dir) = new_app();
        app.apply_command_result(CommandResult::Verified(Ok(())));
        assert!(matches!(
            app.pending_command,
            Some(AsyncCommand::FetchSocieties)
        ));
        assert!(app.societies_loading);
        assert!(matches!(app.flash, Some((FlashLevel::Success, _))));
    }

    #[test]
    fn publish_success_clears_the_form_and_shows_the_listing() {
        let (mut app, _dir) = new_app();
        app.current_user = Some(user("society"));
        app.view = View::Dashboard;
        app.section = DashboardSection::CreateEvent;
        app.event_form.title = "AI Summit".into();
        app.event_form.submitting = true;

        app.apply_command_result(CommandResult::Published(Ok(())));
        assert_eq!(app.section, DashboardSection::Events);
        assert!(app.event_form.title.is_empty());
        assert!(!app.event_form.submitting);
        assert!(matches!(
            app.pending_command,
            Some(AsyncCommand::FetchEvents { .. })
        ));
    }

    #[test]
    fn publish_failure_keeps_the_form_and_shows_the_message() {
        let (mut app, _dir) = new_app();
        app.current_user = Some(user("society"));
        app.event_form.title = "AI Summit".into();
        app.event_form.submitting = true;

        app.apply_command_result(CommandResult::Published(Err(AppError::Api {
            status: 400,
            message: "Invalid date format. Use ISO format (YYYY-MM-DD HH:MM:SS)".into(),
        })));
        assert!(!app.event_form.submitting);
        assert_eq!(app.event_form.title, "AI Summit");
        assert!(app
            .event_form
            .status
            .as_deref()
            .unwrap()
            .starts_with("Invalid date format"));
    }

    #[test]
    fn submitting_without_a_society_profile_is_rejected_locally() {
        let (mut app, _dir) = new_app();
        app.current_user = Some(user("admin"));
        app.view = View::Dashboard;
        app.section = DashboardSection::CreateEvent;
        app.event_form.title = "X".into();
        app.event_form.event_date = "2026-05-01 18:00:00".into();

        app.handle_key(KeyCode::Enter);
        assert_eq!(
            app.event_form.status.as_deref(),
            Some("Error: Society profile not found.")
        );
        assert!(app.pending_command.is_none());
    }

    #[test]
    fn stored_session_routes_straight_past_the_login_screen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::new(path.clone());
        store.save(&user("student")).unwrap();

        let app = App::new(SessionStore::new(path));
        assert_eq!(app.view, View::Directory);
    }
}
