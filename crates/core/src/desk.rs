//! Desk facade
//!
//! Owns one directory and one session manager and exposes the calls a UI
//! layer makes: sign in and out, guarded entry to the users view, and the
//! directory operations. Directory operations require an active session.

use tracing::{info, instrument};

use crate::config::SessionConfig;
use crate::directory::UserDirectory;
use crate::error::{Error, Result};
use crate::models::{Session, User, UserDraft};
use crate::seed::Seed;
use crate::session::SessionManager;
use crate::storage::KeyValueStore;

#[derive(Debug)]
pub struct Desk<S> {
    directory: UserDirectory<S>,
    sessions: SessionManager,
}

impl<S: KeyValueStore> Desk<S> {
    /// Load the directory and restore any persisted session
    #[instrument(skip_all)]
    pub fn open(store: S, seed: Seed, config: SessionConfig) -> Result<Self> {
        let directory = UserDirectory::open(store, seed)?;
        let sessions = SessionManager::restore(directory.store(), config)?;
        Ok(Self {
            directory,
            sessions,
        })
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<Session> {
        self.sessions.authenticate(&self.directory, email, password)
    }

    /// Sign out; the directory goes back to the seed
    pub fn logout(&mut self) -> Result<()> {
        self.sessions.end_session(&mut self.directory)
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.sessions.current_session()
    }

    /// Guard for the users view.
    ///
    /// Without a session the directory is reset to the seed (unless
    /// `reset_on_cold_start` is off) and `NotAuthenticated` is returned.
    #[instrument(skip(self))]
    pub fn enter_users_view(&mut self) -> Result<Session> {
        if let Some(session) = self.sessions.current_session() {
            return Ok(session.clone());
        }

        if self.sessions.config().reset_on_cold_start {
            info!("No active session, resetting directory");
            self.directory.reset_to_seed()?;
        }
        Err(Error::NotAuthenticated)
    }

    pub fn list(&self) -> Result<&[User]> {
        self.require_session()?;
        Ok(self.directory.list())
    }

    pub fn search(&self, query: &str) -> Result<Vec<&User>> {
        self.require_session()?;
        Ok(self.directory.search(query))
    }

    pub fn get(&self, id: u64) -> Result<&User> {
        self.require_session()?;
        self.directory.get(id).ok_or(Error::RecordNotFound(id))
    }

    pub fn create(&mut self, draft: UserDraft) -> Result<User> {
        self.require_session()?;
        self.directory.create(draft)
    }

    pub fn update(&mut self, id: u64, patch: UserDraft) -> Result<User> {
        self.require_session()?;
        self.directory.update(id, patch)
    }

    pub fn remove(&mut self, id: u64) -> Result<User> {
        self.require_session()?;
        self.directory.remove(id)
    }

    pub fn directory(&self) -> &UserDirectory<S> {
        &self.directory
    }

    fn require_session(&self) -> Result<&Session> {
        self.sessions
            .current_session()
            .ok_or(Error::NotAuthenticated)
    }
}
