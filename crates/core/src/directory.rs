//! User directory
//!
//! Ordered collection of user records backed by a [`KeyValueStore`]. Every
//! mutation builds the resulting snapshot, writes it to the store in full and
//! only then replaces the in-memory copy, so the two never disagree.

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::invariants::{assert_directory_invariants, assert_next_id_fresh};
use crate::models::{email_key, next_id_after, User, UserDraft};
use crate::seed::Seed;
use crate::storage::{decode_users, encode_users, KeyValueStore, NEXT_ID_KEY, USERS_KEY};

pub struct UserDirectory<S> {
    store: S,
    seed: Seed,
    users: Vec<User>,
    next_id: u64,
}

impl<S: KeyValueStore> UserDirectory<S> {
    /// Load the directory from `store`, seeding it when nothing usable is stored
    #[instrument(skip_all)]
    pub fn open(store: S, seed: Seed) -> Result<Self> {
        let mut directory = Self {
            store,
            seed,
            users: Vec::new(),
            next_id: 1,
        };
        directory.reload()?;
        Ok(directory)
    }

    /// Re-read the snapshot from storage.
    ///
    /// A missing blob or an empty array counts as first use and writes the
    /// seed. A blob that does not parse, or whose ids are zero, duplicated or
    /// leave no room for another id, is logged and replaced by the seed too.
    pub fn reload(&mut self) -> Result<()> {
        let stored = match self.store.get(USERS_KEY)? {
            Some(raw) => match decode_users(&raw) {
                Ok(users) => users,
                Err(e @ Error::MalformedStoredData { .. }) => {
                    warn!(error = %e, "Discarding unreadable directory");
                    Vec::new()
                }
                Err(e) => return Err(e),
            },
            None => Vec::new(),
        };

        if stored.is_empty() {
            debug!("Directory empty, writing seed");
            return self.reset_to_seed();
        }

        let after_max = match next_id_after(&stored) {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "Discarding inconsistent directory");
                return self.reset_to_seed();
            }
        };

        let next_id = self.stored_next_id()?.max(after_max);
        self.users = stored;
        self.next_id = next_id;
        Ok(())
    }

    /// Full snapshot in insertion order
    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Records whose name or email contains `query`, ignoring case.
    /// A blank query returns everything; order is preserved.
    pub fn search(&self, query: &str) -> Vec<&User> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.users.iter().collect();
        }

        let hits: Vec<&User> = self.users.iter().filter(|u| u.matches(&needle)).collect();
        debug!(query = %needle, hits = hits.len(), "Directory search");
        hits
    }

    /// Id the next created record will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Append a new record
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub fn create(&mut self, draft: UserDraft) -> Result<User> {
        let draft = draft.normalized()?;
        let key = email_key(&draft.email);
        if self.users.iter().any(|u| email_key(&u.email) == key) {
            return Err(Error::DuplicateEmail(draft.email));
        }

        let following = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| Error::Validation("No user ids left to assign".into()))?;

        let user = User::new(self.next_id, draft);
        let mut users = self.users.clone();
        users.push(user.clone());

        self.commit(users, following)?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Replace the record with `id` wholesale. The email is not re-checked
    /// for uniqueness.
    #[instrument(skip(self, patch))]
    pub fn update(&mut self, id: u64, patch: UserDraft) -> Result<User> {
        let patch = patch.normalized()?;
        let index = self.position(id)?;

        let user = User::new(id, patch);
        let mut users = self.users.clone();
        users[index] = user.clone();

        self.commit(users, self.next_id)?;
        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Delete the record with `id`, returning it
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: u64) -> Result<User> {
        let index = self.position(id)?;

        let mut users = self.users.clone();
        let removed = users.remove(index);

        self.commit(users, self.next_id)?;
        info!(user_id = id, "User removed");
        Ok(removed)
    }

    /// Overwrite the directory with the seed record set
    #[instrument(skip(self))]
    pub fn reset_to_seed(&mut self) -> Result<()> {
        let users = self.seed.users().to_vec();
        let next_id = next_id_after(&users)?;
        self.store.set(USERS_KEY, &encode_users(&users)?)?;
        self.store.delete(NEXT_ID_KEY)?;

        self.next_id = next_id;
        self.users = users;
        info!(users = self.users.len(), "Directory reset to seed");
        Ok(())
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Backing store, shared with the session manager
    pub fn store(&self) -> &S {
        &self.store
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.users
            .iter()
            .position(|u| u.id == id)
            .ok_or(Error::RecordNotFound(id))
    }

    fn stored_next_id(&self) -> Result<u64> {
        let Some(raw) = self.store.get(NEXT_ID_KEY)? else {
            return Ok(1);
        };
        // Zero and u64::MAX cannot be handed out and then advanced
        match raw.trim().parse::<u64>() {
            Ok(n) if n != 0 && n != u64::MAX => Ok(n),
            Ok(n) => {
                warn!(counter = n, "Ignoring out-of-range id counter");
                Ok(1)
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable id counter");
                Ok(1)
            }
        }
    }

    // The counter is written first: if the second write fails the worst case
    // is a skipped id, never a reused one.
    fn commit(&mut self, users: Vec<User>, next_id: u64) -> Result<()> {
        assert_directory_invariants(&users);
        assert_next_id_fresh(&users, next_id);

        self.store.set(NEXT_ID_KEY, &next_id.to_string())?;
        self.store.set(USERS_KEY, &encode_users(&users)?)?;

        self.users = users;
        self.next_id = next_id;
        Ok(())
    }
}

impl<S> std::fmt::Debug for UserDirectory<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("users", &self.users.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
