use super::{SessionId, SessionStore};
use crate::error::StoreError;
use crate::state::FlowState;
use dashmap::DashMap;

/// In-process session store
///
/// `set` is immediately visible, so `save` has nothing to do.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, FlowState>,
}

impl MemorySessionStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &SessionId) -> Result<Option<FlowState>, StoreError> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    fn set(&self, id: &SessionId, state: &FlowState) -> Result<(), StoreError> {
        self.sessions.insert(*id, state.clone());
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        self.sessions.remove(id);
        Ok(())
    }

    fn save(&self, _id: &SessionId) -> Result<(), StoreError> {
        Ok(())
    }

    fn purge_idle(&self, now: i64, idle_timeout: i64) -> Result<usize, StoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, state| !state.is_idle(now, idle_timeout));
        Ok(before - self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        assert!(store.get(&id).unwrap().is_none());

        store.set(&id, &FlowState::new(5)).unwrap();
        store.save(&id).unwrap();
        assert_eq!(store.get(&id).unwrap().unwrap().start_time(), 5);

        store.delete(&id).unwrap();
        assert!(store.get(&id).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn purge_drops_only_idle_sessions() {
        let store = MemorySessionStore::new();
        let old = SessionId::new();
        let fresh = SessionId::new();
        store.set(&old, &FlowState::new(0)).unwrap();
        store.set(&fresh, &FlowState::new(200)).unwrap();

        assert_eq!(store.purge_idle(400, 300).unwrap(), 1);
        assert!(store.get(&old).unwrap().is_none());
        assert!(store.get(&fresh).unwrap().is_some());
    }
}
