//! Persisted blob layout
//!
//! The directory is a JSON array of users and the signed-in session a JSON
//! object (absent when signed out). A third key remembers the id counter.

use crate::error::{Error, Result};
use crate::models::{Session, User};

/// Key holding the user directory
pub const USERS_KEY: &str = "users_data_v1";

/// Key holding the active session
pub const SESSION_KEY: &str = "authUser";

/// Key holding the next id to hand out, so ids freed by a delete stay retired
pub const NEXT_ID_KEY: &str = "users_next_id_v1";

pub fn encode_users(users: &[User]) -> Result<String> {
    Ok(serde_json::to_string(users)?)
}

/// Decode a stored directory blob
pub fn decode_users(raw: &str) -> Result<Vec<User>> {
    serde_json::from_str(raw).map_err(|source| Error::MalformedStoredData {
        key: USERS_KEY.to_string(),
        source,
    })
}

pub fn encode_session(session: &Session) -> Result<String> {
    Ok(serde_json::to_string(session)?)
}

/// Decode a stored session blob
pub fn decode_session(raw: &str) -> Result<Session> {
    serde_json::from_str(raw).map_err(|source| Error::MalformedStoredData {
        key: SESSION_KEY.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_layout() {
        let users = vec![User {
            id: 1,
            name: "Admin".into(),
            email: "admin@example.com".into(),
            password: "pass123".into(),
        }];
        let raw = encode_users(&users).unwrap();
        assert_eq!(
            raw,
            r#"[{"id":1,"name":"Admin","email":"admin@example.com","password":"pass123"}]"#
        );
        assert_eq!(decode_users(&raw).unwrap(), users);
    }

    #[test]
    fn test_malformed_blobs_name_their_key() {
        match decode_users("{not json").unwrap_err() {
            Error::MalformedStoredData { key, .. } => assert_eq!(key, USERS_KEY),
            other => panic!("unexpected error: {other}"),
        }
        match decode_session(r#"{"id":"one"}"#).unwrap_err() {
            Error::MalformedStoredData { key, .. } => assert_eq!(key, SESSION_KEY),
            other => panic!("unexpected error: {other}"),
        }
    }
}
