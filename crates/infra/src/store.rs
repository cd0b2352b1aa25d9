//! Keyed in-memory storage for per-user state.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use stockdesk_core::{LocationId, UserId};
use stockdesk_inventory::{PreferenceStore, RowCollector};

/// Key/value store abstraction for small, disposable state.
pub trait KeyedStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn upsert(&self, key: K, value: V);
    fn remove(&self, key: &K) -> Option<V>;
    fn list(&self) -> Vec<V>;
}

impl<K, V, S> KeyedStore<K, V> for Arc<S>
where
    S: KeyedStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) {
        (**self).upsert(key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        (**self).remove(key)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryKeyedStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryKeyedStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryKeyedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryKeyedStore<K, V>
where
    K: Eq + Hash,
{
    /// Read-modify-write of an existing entry under the write lock.
    /// `None` if the key is absent or the lock is poisoned.
    pub fn modify<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        let mut map = self.inner.write().ok()?;
        map.get_mut(key).map(f)
    }
}

impl<K, V> KeyedStore<K, V> for InMemoryKeyedStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    fn remove(&self, key: &K) -> Option<V> {
        let mut map = self.inner.write().ok()?;
        map.remove(key)
    }

    fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}

type Session = Arc<Mutex<RowCollector>>;

/// Each user's in-progress stock form rows.
///
/// Every user has their own lock; the map lock is only held to find or
/// create a session, never while one is being worked on.
#[derive(Debug, Default)]
pub struct FormSessions {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl FormSessions {
    pub fn new() -> Self {
        Self::default()
    }

    fn session(&self, user: UserId) -> Option<Session> {
        let existing = self.sessions.read().ok()?.get(&user).cloned();
        if let Some(session) = existing {
            return Some(session);
        }
        let mut map = self.sessions.write().ok()?;
        Some(map.entry(user).or_default().clone())
    }

    fn lock(session: &Session) -> MutexGuard<'_, RowCollector> {
        match session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Copy of the user's rows; empty when they have none yet.
    pub fn snapshot(&self, user: UserId) -> RowCollector {
        let existing = match self.sessions.read() {
            Ok(map) => map.get(&user).cloned(),
            Err(_) => None,
        };
        existing
            .map(|session| Self::lock(&session).clone())
            .unwrap_or_default()
    }

    /// Run `f` on the user's rows while holding only that user's lock.
    /// `None` if the session map is poisoned.
    pub fn with_session<R>(&self, user: UserId, f: impl FnOnce(&mut RowCollector) -> R) -> Option<R> {
        let session = self.session(user)?;
        let mut rows = Self::lock(&session);
        Some(f(&mut rows))
    }
}

/// Default source location per user.
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    defaults: InMemoryKeyedStore<UserId, LocationId>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferences {
    fn default_location(&self, user: UserId) -> Option<LocationId> {
        self.defaults.get(&user)
    }

    fn set_default_location(&self, user: UserId, location: LocationId) {
        self.defaults.upsert(user, location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_store_roundtrip() {
        let store: InMemoryKeyedStore<u32, String> = InMemoryKeyedStore::new();
        store.upsert(1, "a".into());
        store.upsert(2, "b".into());

        assert_eq!(store.get(&1).as_deref(), Some("a"));
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.remove(&1).as_deref(), Some("a"));
        assert_eq!(store.get(&1), None);
    }

    #[test]
    fn modify_touches_existing_entries_only() {
        let store: InMemoryKeyedStore<u32, u32> = InMemoryKeyedStore::new();
        store.upsert(1, 10);

        assert_eq!(store.modify(&1, |v| { *v += 1; *v }), Some(11));
        assert_eq!(store.modify(&2, |v| *v), None);
        assert_eq!(store.get(&2), None);
    }

    #[test]
    fn session_is_created_on_first_use() {
        let sessions = FormSessions::new();
        let user = UserId::new();
        assert!(sessions.snapshot(user).is_empty());

        let position = sessions.with_session(user, |rows| rows.add_row("A100", 2)).unwrap();
        assert_eq!(position, 0);
        assert_eq!(sessions.snapshot(user).len(), 1);
    }

    #[test]
    fn busy_session_does_not_block_other_users() {
        let sessions = FormSessions::new();
        let (busy, other) = (UserId::new(), UserId::new());

        sessions.with_session(busy, |rows| {
            // `busy`'s session stays locked for the whole closure.
            let position = sessions.with_session(other, |rows| rows.add_row("B200", 1));
            assert_eq!(position, Some(0));
            assert_eq!(sessions.snapshot(other).len(), 1);
            rows.add_row("A100", 5);
        });

        assert_eq!(sessions.snapshot(busy).len(), 1);
    }

    #[test]
    fn preferences_are_per_user() {
        let prefs = InMemoryPreferences::new();
        let (a, b) = (UserId::new(), UserId::new());

        prefs.set_default_location(a, LocationId::new(3));
        assert_eq!(prefs.default_location(a), Some(LocationId::new(3)));
        assert_eq!(prefs.default_location(b), None);
    }
}
