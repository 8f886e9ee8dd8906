//! In-memory store of the active session of each user.
//!
//! The registry does no locking. Callers must make sure that events of the
//! same user are handled one at a time.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, info};

use crate::domain::{Session, Status, UserId};

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<UserId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: UserId) -> Option<&Session> {
        self.sessions.get(&user)
    }

    pub fn get_mut(&mut self, user: UserId) -> Option<&mut Session> {
        self.sessions.get_mut(&user)
    }

    /// Starts a fresh session for `user`, dropping any unfinished one.
    pub fn create(&mut self, user: UserId, status: Status) -> &mut Session {
        let session = Session::new(status);
        match self.sessions.entry(user) {
            Entry::Occupied(mut entry) => {
                let previous = entry.insert(session);
                info!(user = %user, previous_state = ?previous.state, "replaced unfinished session");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                debug!(user = %user, status = %status, "session created");
                entry.insert(session)
            }
        }
    }

    pub fn remove(&mut self, user: UserId) -> Option<Session> {
        self.sessions.remove(&user)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FormState;

    #[test]
    fn test_create_get_remove() {
        let mut registry = SessionRegistry::new();
        assert!(registry.get(UserId(1)).is_none());

        registry.create(UserId(1), Status::CheckIn);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(UserId(1)).map(|s| s.state), Some(FormState::Name));

        let removed = registry.remove(UserId(1)).unwrap();
        assert_eq!(removed.status, Status::CheckIn);
        assert!(registry.is_empty());
        assert!(registry.remove(UserId(1)).is_none());
    }

    #[test]
    fn test_create_discards_previous_session() {
        let mut registry = SessionRegistry::new();
        let session = registry.create(UserId(7), Status::CheckIn);
        session.name = Some("Budi Santoso".to_string());
        session.state = FormState::IdNumber;

        let fresh = registry.create(UserId(7), Status::CheckOut);
        assert_eq!(fresh.status, Status::CheckOut);
        assert_eq!(fresh.state, FormState::Name);
        assert!(fresh.name.is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_users_are_independent() {
        let mut registry = SessionRegistry::new();
        registry.create(UserId(1), Status::CheckIn);
        registry.create(UserId(2), Status::CheckOut);
        registry.get_mut(UserId(1)).unwrap().state = FormState::Agenda;

        assert_eq!(registry.get(UserId(2)).unwrap().state, FormState::Name);
        registry.remove(UserId(1));
        assert!(registry.get(UserId(2)).is_some());
    }
}
