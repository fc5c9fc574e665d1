//! Seed record set
//!
//! The directory is initialised from the seed on first use and overwritten
//! with it on sign-out. The built-in seed is the single administrator account.

use std::path::Path;

use tracing::instrument;

use crate::error::{Error, Result};
use crate::models::{next_id_after, User};

pub const ADMIN_NAME: &str = "Admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "pass123";

/// Fixed initial record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    users: Vec<User>,
}

impl Seed {
    /// Administrator-only seed
    pub fn builtin() -> Self {
        Self {
            users: vec![User {
                id: crate::models::ADMIN_ID,
                name: ADMIN_NAME.to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            }],
        }
    }

    /// Build a seed from explicit records.
    ///
    /// Rejects an empty set and ids that are zero, duplicated or too large
    /// to follow, since a reset must always leave a usable directory behind.
    pub fn from_users(users: Vec<User>) -> Result<Self> {
        if users.is_empty() {
            return Err(Error::Validation("Seed must contain at least one user".into()));
        }

        next_id_after(&users)?;

        Ok(Self { users })
    }

    /// Load a JSON array of users from disk
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let users: Vec<User> = serde_json::from_str(&raw)?;
        Self::from_users(users)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::builtin()
    }
}
