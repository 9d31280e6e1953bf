//! Root application state.
//!
//! A `Session` owns everything a logged-in user works with: the board, the
//! shift records, the submission form and the chat, plus the queue of
//! simulated delays. It is the one place where role capabilities are checked
//! before state changes; the components below it are policy-free.

use std::time::Instant;

use tracing::{info, warn};

use crate::board::TaskBoard;
use crate::chat::{Sender, TeamChat};
use crate::error::{AuthError, SessionError, ShiftFormError};
use crate::fields::*;
use crate::policy::{can_perform, Action};
use crate::review::RecordReview;
use crate::seed::SeedData;
use crate::shift_form::{ShiftForm, ShiftReport};
use crate::task::{TaskInput, TaskPatch};
use crate::timer::{Scheduler, LOGIN_DELAY, SUBMIT_DELAY};

/// Password accepted by the demonstration login.
pub const DEMO_PASSWORD: &str = "123456";

/// The person logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn sender(&self) -> Sender {
        Sender { name: self.name.clone(), role: self.role }
    }
}

/// What the login form submits.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Check credentials against the demo password. Any name, email and role
/// are accepted.
pub fn authenticate(credentials: Credentials) -> Result<User, AuthError> {
    if credentials.password != DEMO_PASSWORD {
        warn!(name = %credentials.name, "login rejected");
        return Err(AuthError::InvalidCredentials);
    }
    info!(name = %credentials.name, role = ?credentials.role, "login accepted");
    Ok(User { name: credentials.name, email: credentials.email, role: credentials.role })
}

/// Transient message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Error(s) => s,
        }
    }
}

#[derive(Debug)]
enum SessionEvent {
    Login(Credentials),
    Submission(Box<ShiftReport>),
}

/// All state of one run of the desk.
#[derive(Debug)]
pub struct Session {
    user: Option<User>,
    pub board: TaskBoard,
    pub review: RecordReview,
    pub shift_form: ShiftForm,
    pub chat: TeamChat,
    pub submitted: Vec<ShiftReport>,
    events: Scheduler<SessionEvent>,
    seed: SeedData,
}

impl Session {
    /// Fresh session over `seed`, nobody logged in.
    pub fn from_seed(seed: SeedData) -> Self {
        Session {
            user: None,
            board: TaskBoard::new(seed.tasks.clone()),
            review: RecordReview::new(seed.records.clone()),
            shift_form: ShiftForm::default(),
            chat: TeamChat::new(seed.contacts.clone(), seed.conversation.clone()),
            submitted: Vec::new(),
            events: Scheduler::new(),
            seed,
        }
    }

    /// Session with `user` already logged in.
    pub fn with_user(seed: SeedData, user: User) -> Self {
        let mut session = Self::from_seed(seed);
        session.user = Some(user);
        session
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Whether the logged-in user may perform `action`.
    pub fn can(&self, action: Action) -> bool {
        self.role().is_some_and(|role| can_perform(role, action))
    }

    fn authorize(&self, action: Action) -> Result<Role, SessionError> {
        let role = self.role().ok_or(SessionError::NotAuthenticated)?;
        if can_perform(role, action) {
            Ok(role)
        } else {
            Err(SessionError::Forbidden { role, action })
        }
    }

    /// Start a login; it resolves `LOGIN_DELAY` after `now`.
    pub fn begin_login(&mut self, credentials: Credentials, now: Instant) {
        self.events.schedule(now, LOGIN_DELAY, SessionEvent::Login(credentials));
    }

    pub fn login_pending(&self) -> bool {
        self.events.any(|e| matches!(e, SessionEvent::Login(_)))
    }

    /// End the session. Pending work is dropped and the board, records,
    /// form and chat go back to the seed.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(name = %user.name, "logout");
        }
        let seed = std::mem::take(&mut self.seed);
        *self = Session::from_seed(seed);
    }

    pub fn create_task(&mut self, input: TaskInput) -> Result<u64, SessionError> {
        let role = self.authorize(Action::CreateTask)?;
        Ok(self.board.create_task(input, role)?)
    }

    pub fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<bool, SessionError> {
        self.authorize(Action::EditTask)?;
        Ok(self.board.update_task(id, patch)?)
    }

    pub fn delete_task(&mut self, id: u64) -> Result<bool, SessionError> {
        self.authorize(Action::DeleteTask)?;
        Ok(self.board.delete_task(id))
    }

    pub fn move_task(&mut self, id: u64, status: TaskStatus) -> Result<bool, SessionError> {
        self.authorize(Action::MoveTask)?;
        Ok(self.board.move_task(id, status))
    }

    /// Comment on the selected record as the logged-in user.
    pub fn add_comment(&mut self, text: &str) -> Result<Option<u64>, SessionError> {
        let role = self.authorize(Action::CommentOnRecord)?;
        Ok(self.review.add_comment(role, text))
    }

    /// Change the selected record's status. Engineers and managers only.
    pub fn update_record_status(&mut self, status: RecordStatus) -> Result<bool, SessionError> {
        self.authorize(Action::ChangeRecordStatus)?;
        Ok(self.review.update_status(status))
    }

    /// Validate the shift form and queue its submission.
    pub fn submit_shift(&mut self, now: Instant) -> Result<(), SessionError> {
        self.authorize(Action::SubmitShiftRecord)?;
        if self.shift_form.submitting {
            return Err(ShiftFormError::AlreadySubmitting.into());
        }
        let user = self.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
        let report = self.shift_form.validate(&user.name, &user.email)?;
        self.shift_form.submitting = true;
        self.events.schedule(now, SUBMIT_DELAY, SessionEvent::Submission(Box::new(report)));
        Ok(())
    }

    pub fn select_contact(&mut self, id: u64) -> Result<bool, SessionError> {
        self.authorize(Action::UseChat)?;
        let user = self.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
        Ok(self.chat.select_contact(id, user))
    }

    pub fn send_chat(&mut self, text: &str, now: Instant) -> Result<Option<u64>, SessionError> {
        self.authorize(Action::UseChat)?;
        let user = self.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
        Ok(self.chat.send_message(user, text, now))
    }

    /// Resolve whatever simulated work has come due.
    pub fn poll(&mut self, now: Instant) -> Vec<Notice> {
        let mut notices = Vec::new();
        for event in self.events.poll(now) {
            match event {
                SessionEvent::Login(credentials) => match authenticate(credentials) {
                    Ok(user) => {
                        notices.push(Notice::Success(format!("Welcome, {}", user.name)));
                        self.user = Some(user);
                    }
                    Err(e) => notices.push(Notice::Error(e.to_string())),
                },
                SessionEvent::Submission(report) => {
                    match serde_json::to_string(&report) {
                        Ok(json) => info!(report = %json, "shift record submitted"),
                        Err(e) => warn!(error = %e, "shift report not serialisable"),
                    }
                    self.submitted.push(*report);
                    self.shift_form.reset_after_submit();
                    notices.push(Notice::Success("Shift record submitted".to_string()));
                }
            }
        }
        self.chat.poll(now);
        notices
    }
}
