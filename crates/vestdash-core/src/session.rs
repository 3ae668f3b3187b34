//! Session context and the reporting seam.
//!
//! A [`Session`] is created by the presentation layer and passed into every
//! dashboard operation. It carries who is logged in, which vest is selected
//! and where user-visible notices go.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use vestdash_types::VestId;

use crate::auth::{CredentialTable, User};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-visible message produced by a dashboard operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Operation that produced the notice (e.g. `"list_vests"`).
    pub operation: String,
    pub message: String,
}

impl Notice {
    pub fn success(operation: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, operation, message)
    }

    pub fn warning(operation: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, operation, message)
    }

    pub fn error(operation: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, operation, message)
    }

    fn new(level: NoticeLevel, operation: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

/// The caller's display surface.
///
/// Dashboard operations never return errors; they report them here and hand
/// back an empty or default value instead.
pub trait Reporter: Send + Sync {
    fn report(&self, notice: Notice);
}

/// Reporter that writes notices to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(operation = %notice.operation, "{}", notice.message),
            NoticeLevel::Warning => warn!(operation = %notice.operation, "{}", notice.message),
            NoticeLevel::Error => error!(operation = %notice.operation, "{}", notice.message),
        }
    }
}

/// Reporter that keeps notices until the caller drains them.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the notices collected so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Remove and return the collected notices.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.notices()
            .iter()
            .any(|n| n.level == NoticeLevel::Error)
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

/// Per-user interaction state.
pub struct Session {
    user: Option<User>,
    selected_vest: Option<VestId>,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.as_ref().map(|u| &u.username))
            .field("selected_vest", &self.selected_vest)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create an anonymous session reporting to `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            user: None,
            selected_vest: None,
            reporter,
        }
    }

    /// Create an anonymous session that logs its notices.
    #[must_use]
    pub fn with_tracing() -> Self {
        Self::new(Arc::new(TracingReporter))
    }

    /// Check credentials against `table` and, on success, make that user the
    /// session's user. Failures are reported and leave the session unchanged.
    pub fn login(&mut self, table: &CredentialTable, username: &str, password: &str) -> bool {
        match table.authenticate(username, password) {
            Some(user) => {
                self.report(Notice::success(
                    "login",
                    format!("Logged in as {}", user.display_name()),
                ));
                self.user = Some(user);
                self.selected_vest = None;
                true
            }
            None => {
                self.report(Notice::error("login", "Invalid username or password"));
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.selected_vest = None;
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Select the vest shown in detail views.
    pub fn select_vest(&mut self, vest_id: VestId) {
        self.selected_vest = Some(vest_id);
    }

    #[must_use]
    pub fn selected_vest(&self) -> Option<VestId> {
        self.selected_vest
    }

    /// Send a notice to the session's display surface.
    pub fn report(&self, notice: Notice) {
        self.reporter.report(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserEntry;

    fn table() -> CredentialTable {
        CredentialTable::new(vec![UserEntry {
            username: "coach".into(),
            password: "ring".into(),
            display_name: Some("Coach Carter".into()),
            vests: vec![1, 2],
        }])
    }

    fn session() -> (Session, Arc<CollectingReporter>) {
        let reporter = Arc::new(CollectingReporter::new());
        (Session::new(reporter.clone()), reporter)
    }

    #[test]
    fn test_login_success_sets_user() {
        let (mut session, reporter) = session();
        assert!(session.login(&table(), "coach", "ring"));
        assert!(session.is_logged_in());
        assert_eq!(session.user().unwrap().username, "coach");

        let notices = reporter.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert!(notices[0].message.contains("Coach Carter"));
    }

    #[test]
    fn test_login_failure_reports_error() {
        let (mut session, reporter) = session();
        assert!(!session.login(&table(), "coach", "wrong"));
        assert!(!session.is_logged_in());
        assert!(reporter.has_errors());
    }

    #[test]
    fn test_selection_cleared_on_logout() {
        let (mut session, _) = session();
        session.login(&table(), "coach", "ring");
        session.select_vest(2);
        assert_eq!(session.selected_vest(), Some(2));

        session.logout();
        assert_eq!(session.selected_vest(), None);
        assert!(session.user().is_none());
    }

    #[test]
    fn test_collecting_reporter_drain_empties() {
        let reporter = CollectingReporter::new();
        reporter.report(Notice::warning("op", "careful"));
        assert_eq!(reporter.drain().len(), 1);
        assert!(reporter.notices().is_empty());
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::error("get_vest", "not found");
        assert_eq!(notice.to_string(), "get_vest: not found");
    }
}
