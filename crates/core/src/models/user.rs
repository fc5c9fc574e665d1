//! User model

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Id reserved for the seeded administrator account
pub const ADMIN_ID: u64 = 1;

/// A stored user record
///
/// Serialized as `{id, name, email, password}`; the password is kept in plain
/// text because this desk performs no real authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl User {
    pub fn new(id: u64, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            password: draft.password,
        }
    }

    /// Display role; only the seeded account is an admin
    pub fn role(&self) -> Role {
        if self.id == ADMIN_ID {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Avatar glyph: first letter of the name, else of the email, else `U`
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .or_else(|| self.email.chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }

    /// True when `email` names this record (trimmed, case-insensitive)
    pub fn has_email(&self, email: &str) -> bool {
        email_key(&self.email) == email_key(email)
    }

    /// Case-insensitive substring match on name or email.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }
}

/// Display role of a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::User => write!(f, "User"),
        }
    }
}

/// Fields submitted by the create and edit forms
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Trim name and email and reject empty fields.
    /// The password is kept verbatim.
    pub fn normalized(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();

        if name.is_empty() {
            return Err(Error::Validation("Name is required".into()));
        }
        if email.is_empty() {
            return Err(Error::Validation("Email is required".into()));
        }
        if self.password.is_empty() {
            return Err(Error::Validation("Password is required".into()));
        }

        Ok(Self {
            name,
            email,
            password: self.password,
        })
    }
}

/// Redacted copy of a user, present only while signed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Check that ids are positive and pairwise distinct and that another id
/// still fits after the largest one. Returns that next id (1 for no users).
pub fn next_id_after(users: &[User]) -> Result<u64> {
    let mut seen = HashSet::with_capacity(users.len());
    for user in users {
        if user.id == 0 {
            return Err(Error::Validation(format!("User {:?} has id 0", user.email)));
        }
        if !seen.insert(user.id) {
            return Err(Error::Validation(format!("Duplicate user id {}", user.id)));
        }
    }

    match users.iter().map(|u| u.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::Validation(format!("User id {max} leaves no room for another"))),
    }
}

/// Comparison key for emails
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_role_from_id() {
        assert_eq!(user(1, "Admin", "admin@example.com").role(), Role::Admin);
        assert_eq!(user(7, "Bob", "bob@x.com").role(), Role::User);
        assert_eq!(Role::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_initial_fallbacks() {
        assert_eq!(user(2, "bob", "bob@x.com").initial(), 'B');
        assert_eq!(user(2, "", "zed@x.com").initial(), 'Z');
        assert_eq!(user(2, "", "").initial(), 'U');
    }

    #[test]
    fn test_has_email_ignores_case_and_whitespace() {
        let u = user(2, "Bob", "Bob@X.com");
        assert!(u.has_email("  bob@x.COM "));
        assert!(!u.has_email("bobby@x.com"));
    }

    #[test]
    fn test_draft_normalization() {
        let draft = UserDraft::new("  Carol ", " carol@x.com ", " pw ")
            .normalized()
            .unwrap();
        assert_eq!(draft.name, "Carol");
        assert_eq!(draft.email, "carol@x.com");
        assert_eq!(draft.password, " pw ");

        let err = UserDraft::new("   ", "a@b.c", "pw").normalized().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = UserDraft::new("A", "a@b.c", "").normalized().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_next_id_after() {
        assert_eq!(next_id_after(&[]).unwrap(), 1);
        assert_eq!(next_id_after(&[user(1, "A", "a@x"), user(7, "B", "b@x")]).unwrap(), 8);

        for bad in [
            vec![user(0, "A", "a@x")],
            vec![user(3, "A", "a@x"), user(3, "B", "b@x")],
            vec![user(u64::MAX, "A", "a@x")],
        ] {
            assert!(matches!(next_id_after(&bad), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_session_is_redacted() {
        let session = Session::from(&user(3, "Dana", "dana@x.com"));
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "name": "Dana", "email": "dana@x.com"})
        );
    }

    #[test]
    fn test_user_tolerates_missing_fields() {
        let u: User = serde_json::from_str(r#"{"id": 4, "email": "e@x.com"}"#).unwrap();
        assert_eq!(u.name, "");
        assert_eq!(u.password, "");
    }
}
