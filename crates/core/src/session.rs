//! Session manager
//!
//! Authenticates against the directory and keeps the redacted [`Session`]
//! under [`SESSION_KEY`] in the same store.

use tracing::{info, instrument, warn};

use crate::config::SessionConfig;
use crate::directory::UserDirectory;
use crate::error::{Error, Result};
use crate::invariants::assert_session_invariants;
use crate::models::Session;
use crate::storage::{decode_session, encode_session, KeyValueStore, SESSION_KEY};

#[derive(Debug, Default)]
pub struct SessionManager {
    config: SessionConfig,
    current: Option<Session>,
}

impl SessionManager {
    /// Pick up a session persisted by a previous run.
    /// An unreadable blob is treated as signed out.
    #[instrument(skip_all)]
    pub fn restore<S: KeyValueStore>(store: &S, config: SessionConfig) -> Result<Self> {
        let current = match store.get(SESSION_KEY)? {
            Some(raw) => match decode_session(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable session");
                    None
                }
            },
            None => None,
        };

        if let Some(session) = &current {
            info!(user_id = session.id, "Restored session");
        }

        Ok(Self { config, current })
    }

    /// Look up `email` (trimmed, case-insensitive) with an exact password
    /// match and make the redacted record the active session.
    #[instrument(skip(self, directory, password))]
    pub fn authenticate<S: KeyValueStore>(
        &mut self,
        directory: &UserDirectory<S>,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        if email.trim().is_empty() {
            return Err(Error::Validation("Please enter your email.".into()));
        }
        if password.chars().count() < self.config.min_password_len {
            return Err(Error::Validation(format!(
                "Password must be at least {} characters long.",
                self.config.min_password_len
            )));
        }

        let Some(user) = directory
            .list()
            .iter()
            .find(|u| u.has_email(email) && u.password == password)
        else {
            info!("Sign-in rejected");
            return Err(Error::InvalidCredentials);
        };

        let session = Session::from(user);
        assert_session_invariants(&session);
        directory
            .store()
            .set(SESSION_KEY, &encode_session(&session)?)?;

        info!(user_id = session.id, "Signed in");
        self.current = Some(session.clone());
        Ok(session)
    }

    /// Sign out and reset the directory to the seed
    #[instrument(skip_all)]
    pub fn end_session<S: KeyValueStore>(&mut self, directory: &mut UserDirectory<S>) -> Result<()> {
        directory.store().delete(SESSION_KEY)?;
        if let Some(session) = self.current.take() {
            info!(user_id = session.id, "Signed out");
        }
        directory.reset_to_seed()
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
