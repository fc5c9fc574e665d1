//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Session, User};

/// Ids in a directory snapshot are positive and pairwise distinct
pub fn assert_directory_invariants(users: &[User]) {
    let mut seen = HashSet::with_capacity(users.len());
    for user in users {
        debug_assert!(user.id != 0, "User {:?} has id 0", user.email);
        debug_assert!(seen.insert(user.id), "Duplicate user id {}", user.id);
    }
}

/// The next id is above every id in the snapshot
pub fn assert_next_id_fresh(users: &[User], next_id: u64) {
    debug_assert!(
        users.iter().all(|u| u.id < next_id),
        "Next id {} collides with an existing record",
        next_id
    );
}

/// A session never carries a zero id
pub fn assert_session_invariants(session: &Session) {
    debug_assert!(session.id != 0, "Session for {:?} has id 0", session.email);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64) -> User {
        User {
            id,
            name: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_valid_directory() {
        let users = vec![user(1), user(3), user(2)];
        assert_directory_invariants(&users);
        assert_next_id_fresh(&users, 4);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Duplicate user id")]
    fn test_duplicate_ids_detected() {
        assert_directory_invariants(&[user(1), user(1)]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "collides")]
    fn test_stale_next_id_detected() {
        assert_next_id_fresh(&[user(1), user(4)], 4);
    }
}
