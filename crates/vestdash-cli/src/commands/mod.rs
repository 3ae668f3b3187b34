//! Command implementations for the CLI.

mod config;
mod exercise;
mod login;
mod measurements;
mod vests;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use vestdash_core::{Dashboard, Session, VestId};

use crate::cli::CredentialArgs;
use crate::config::Config;
use crate::format::FormatOptions;
use crate::report::ConsoleReporter;
use crate::util::{login, resolve_credentials};

pub use config::cmd_config;
pub use exercise::cmd_exercise;
pub use login::cmd_login;
pub use measurements::{MeasurementsArgs, cmd_add, cmd_measurements};
pub use vests::{cmd_sensors, cmd_vest, cmd_vests};

/// Everything a command needs, built once in `main`.
pub struct Context {
    pub dashboard: Dashboard,
    pub config: Config,
    pub reporter: Arc<ConsoleReporter>,
    pub credentials: CredentialArgs,
    pub output: Option<PathBuf>,
    pub opts: FormatOptions,
}

impl Context {
    /// An anonymous session reporting to the console.
    pub fn session(&self) -> Session {
        Session::new(self.reporter.clone())
    }

    /// A session logged in with the resolved credentials.
    pub fn logged_in_session(&self) -> Result<Session> {
        let credentials = resolve_credentials(&self.credentials)?;
        let mut session = self.session();
        login(&mut session, &self.config.credential_table(), &credentials)?;
        Ok(session)
    }

    /// Fail unless the session's user may see `vest_id`, then select it.
    pub fn select_vest(&self, session: &mut Session, vest_id: VestId) -> Result<()> {
        let assigned = session.user().is_some_and(|u| u.is_assigned(vest_id));
        if !assigned {
            bail!("Vest {} is not assigned to this login", vest_id);
        }
        session.select_vest(vest_id);
        Ok(())
    }

    /// Fail when any operation reported an error.
    pub fn check_errors(&self) -> Result<()> {
        match self.reporter.error_count() {
            0 => Ok(()),
            1 => bail!("1 request failed"),
            n => bail!("{} requests failed", n),
        }
    }
}
