use chrono::{DateTime, Utc};
use indexmap::{map::Entry, IndexMap};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub last_updated: DateTime<Utc>,
    pub force_logout: bool,
    pub logout_time: Option<DateTime<Utc>>,
}

impl SessionRecord {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            last_updated: now,
            force_logout: false,
            logout_time: None,
        }
    }
}

/// Observability snapshot of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub identity: String,
    pub last_updated: DateTime<Utc>,
    pub force_logout: bool,
}

/// Outcome of checking a presented credential against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    Active,
    ForcedLogout,
    /// The credential predates the last forced logout of its identity.
    Revoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedSession {
    /// A forced logout was pending and has now been cleared.
    pub acknowledged_force_logout: bool,
    pub generation: u64,
}

#[derive(Default)]
struct Inner {
    sessions: IndexMap<String, SessionRecord>,
    // survives `remove` so logout cleanup cannot revive revoked credentials
    generations: HashMap<String, u64>,
}

/// In-memory map from admin identity to session metadata.
///
/// Every operation runs under one lock, so a `track` can never lose a
/// concurrently set forced-logout flag. Nothing is persisted: a restart
/// starts from an empty registry.
#[derive(Default)]
pub struct SessionRegistry {
    inner: Mutex<Inner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful login. Returns whether a forced logout was pending.
    pub fn track(&self, identity: &str) -> bool {
        let now = Utc::now();
        let mut inner = self.inner.lock();
        let record = inner
            .sessions
            .entry(identity.to_string())
            .or_insert_with(|| SessionRecord::fresh(now));
        record.last_updated = now;

        tracing::debug!(admin_id = %identity, force_logout = record.force_logout, "Admin session tracked");
        record.force_logout
    }

    /// Login bookkeeping under a single lock: track the session, acknowledge
    /// any pending forced logout and return the generation to stamp on the
    /// new credential.
    pub fn open_session(&self, identity: &str) -> OpenedSession {
        let now = Utc::now();
        let mut inner = self.inner.lock();
        let generation = inner.generations.get(identity).copied().unwrap_or(0);
        let record = inner
            .sessions
            .entry(identity.to_string())
            .or_insert_with(|| SessionRecord::fresh(now));
        record.last_updated = now;
        let acknowledged_force_logout = record.force_logout;
        record.force_logout = false;

        tracing::debug!(admin_id = %identity, acknowledged_force_logout, generation, "Admin session opened");
        OpenedSession {
            acknowledged_force_logout,
            generation,
        }
    }

    pub fn remove(&self, identity: &str) -> bool {
        let removed = self.inner.lock().sessions.shift_remove(identity).is_some();
        if removed {
            tracing::debug!(admin_id = %identity, "Admin session removed");
        }
        removed
    }

    /// Flag `identity` for logout, creating a record when none exists so the
    /// flag also catches a login that has not happened yet. Returns whether a
    /// session was already present.
    pub fn force_logout(&self, identity: &str) -> bool {
        let now = Utc::now();
        let mut inner = self.inner.lock();
        *inner.generations.entry(identity.to_string()).or_insert(0) += 1;

        let had_session = match inner.sessions.entry(identity.to_string()) {
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                record.force_logout = true;
                record.logout_time = Some(now);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(SessionRecord {
                    last_updated: now,
                    force_logout: true,
                    logout_time: Some(now),
                });
                false
            }
        };

        if had_session {
            tracing::info!(admin_id = %identity, "Forcing logout for active admin session");
        } else {
            tracing::info!(admin_id = %identity, "Creating force logout entry for admin");
        }
        had_session
    }

    pub fn should_force_logout(&self, identity: &str) -> bool {
        let inner = self.inner.lock();
        match inner.sessions.get(identity) {
            Some(record) => record.force_logout,
            None => {
                tracing::debug!(admin_id = %identity, "No session found when checking force logout");
                false
            }
        }
    }

    pub fn clear_force_logout(&self, identity: &str) {
        let mut inner = self.inner.lock();
        if let Some(record) = inner.sessions.get_mut(identity) {
            if record.force_logout {
                record.force_logout = false;
                tracing::debug!(admin_id = %identity, "Cleared force logout");
            }
        }
    }

    pub fn generation(&self, identity: &str) -> u64 {
        self.inner
            .lock()
            .generations
            .get(identity)
            .copied()
            .unwrap_or(0)
    }

    /// Flag and generation lookup under a single lock acquisition.
    pub fn check(&self, identity: &str, version: u64) -> SessionCheck {
        let inner = self.inner.lock();
        let forced = inner
            .sessions
            .get(identity)
            .map(|record| record.force_logout)
            .unwrap_or(false);
        if forced {
            return SessionCheck::ForcedLogout;
        }

        let current = inner.generations.get(identity).copied().unwrap_or(0);
        if version < current {
            return SessionCheck::Revoked;
        }

        SessionCheck::Active
    }

    pub fn get(&self, identity: &str) -> Option<SessionRecord> {
        self.inner.lock().sessions.get(identity).cloned()
    }

    pub fn list_active(&self) -> Vec<ActiveSession> {
        self.inner
            .lock()
            .sessions
            .iter()
            .map(|(identity, record)| ActiveSession {
                identity: identity.clone(),
                last_updated: record.last_updated,
                force_logout: record.force_logout,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_force_logout_without_prior_track() {
        let registry = SessionRegistry::new();

        assert!(!registry.force_logout("ghost"));
        assert!(registry.should_force_logout("ghost"));
        assert!(registry.get("ghost").unwrap().logout_time.is_some());
    }

    #[test]
    fn test_track_preserves_pending_flag() {
        let registry = SessionRegistry::new();
        assert!(!registry.track("a"));
        assert!(registry.force_logout("a"));

        assert!(registry.track("a"));
        assert!(registry.should_force_logout("a"));
    }

    #[test]
    fn test_clear_force_logout() {
        let registry = SessionRegistry::new();
        registry.force_logout("a");
        registry.clear_force_logout("a");

        assert!(!registry.should_force_logout("a"));
        assert!(!registry.track("a"));
    }

    #[test]
    fn test_clear_without_record_is_noop() {
        let registry = SessionRegistry::new();
        registry.clear_force_logout("nobody");
        assert!(registry.list_active().is_empty());
    }

    #[test]
    fn test_unknown_identity_is_not_forced_out() {
        let registry = SessionRegistry::new();
        assert!(!registry.should_force_logout("nobody"));
        assert_eq!(registry.check("nobody", 0), SessionCheck::Active);
    }

    #[test]
    fn test_list_active_empty_then_one() {
        let registry = SessionRegistry::new();
        assert!(registry.list_active().is_empty());

        registry.track("a");
        let sessions = registry.list_active();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].identity, "a");
        assert!(!sessions[0].force_logout);
    }

    #[test]
    fn test_list_active_keeps_insertion_order() {
        let registry = SessionRegistry::new();
        registry.track("c");
        registry.track("a");
        registry.force_logout("b");
        registry.track("c");

        let ids: Vec<_> = registry
            .list_active()
            .into_iter()
            .map(|session| session.identity)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_remove_deletes_record() {
        let registry = SessionRegistry::new();
        registry.track("a");

        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn test_generation_survives_remove() {
        let registry = SessionRegistry::new();
        registry.track("a");
        registry.force_logout("a");
        registry.clear_force_logout("a");
        registry.remove("a");

        assert_eq!(registry.generation("a"), 1);
        assert_eq!(registry.check("a", 0), SessionCheck::Revoked);
        assert_eq!(registry.check("a", 1), SessionCheck::Active);
    }

    #[test]
    fn test_check_reports_flag_before_generation() {
        let registry = SessionRegistry::new();
        registry.force_logout("a");

        assert_eq!(registry.check("a", 0), SessionCheck::ForcedLogout);
        assert_eq!(registry.check("a", 1), SessionCheck::ForcedLogout);
    }

    #[test]
    fn test_open_session_acknowledges_forced_logout() {
        let registry = SessionRegistry::new();
        registry.force_logout("a");

        let opened = registry.open_session("a");
        assert!(opened.acknowledged_force_logout);
        assert_eq!(opened.generation, 1);
        assert!(!registry.should_force_logout("a"));

        let again = registry.open_session("a");
        assert!(!again.acknowledged_force_logout);
        assert_eq!(again.generation, 1);
    }

    #[test]
    fn test_open_session_for_new_identity() {
        let registry = SessionRegistry::new();
        let opened = registry.open_session("fresh");

        assert_eq!(
            opened,
            OpenedSession {
                acknowledged_force_logout: false,
                generation: 0
            }
        );
        assert_eq!(registry.list_active().len(), 1);
    }

    #[test]
    fn test_concurrent_track_never_drops_flag() {
        let registry = Arc::new(SessionRegistry::new());
        registry.track("a");

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        registry.track("a");
                        if worker == 0 {
                            registry.force_logout("a");
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(registry.should_force_logout("a"));
        assert_eq!(registry.list_active().len(), 1);
    }
}
