//! Server-side view of a connected client.
//!
//! The entity owns one [`SharedClientState`] per connection and mutates it
//! in place as the client validates, attaches or releases stores. Client
//! bindings hold a clone of the same handle, so a refresh always describes
//! the client as it is now.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use serde::Serialize;

/// What the entity knows about one connected client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientState {
    /// Whether the client has passed validation.
    pub attached: bool,
    /// Stores currently attached by this client.
    pub attached_stores: BTreeSet<String>,
    /// Identifier the client supplied during validation, if any.
    pub identifier: Option<uuid::Uuid>,
}

impl ClientState {
    /// Creates the state of a freshly connected, not yet validated client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the client as validated under the given identifier.
    pub fn attach(&mut self, identifier: uuid::Uuid) {
        self.attached = true;
        self.identifier = Some(identifier);
    }

    /// Records that the client attached `store_name`.
    ///
    /// Returns `false` if the store was already attached.
    pub fn add_store(&mut self, store_name: &str) -> bool {
        self.attached_stores.insert(store_name.to_string())
    }

    /// Records that the client released `store_name`.
    ///
    /// Returns `false` if the store was not attached.
    pub fn remove_store(&mut self, store_name: &str) -> bool {
        self.attached_stores.remove(store_name)
    }
}

/// Live handle on a [`ClientState`], shared between the entity and the
/// client's management binding.
///
/// Clones point at the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedClientState {
    inner: Arc<RwLock<ClientState>>,
}

impl SharedClientState {
    /// Creates the handle of a freshly connected client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current state out of the handle.
    #[must_use]
    pub fn snapshot(&self) -> ClientState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Marks the client as validated under the given identifier.
    pub fn attach(&self, identifier: uuid::Uuid) {
        self.write().attach(identifier);
    }

    /// Records that the client attached `store_name`.
    ///
    /// Returns `false` if the store was already attached.
    pub fn add_store(&self, store_name: &str) -> bool {
        self.write().add_store(store_name)
    }

    /// Records that the client released `store_name`.
    ///
    /// Returns `false` if the store was not attached.
    pub fn remove_store(&self, store_name: &str) -> bool {
        self.write().remove_store(store_name)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ClientState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_is_detached() {
        let state = ClientState::new();
        assert!(!state.attached);
        assert!(state.attached_stores.is_empty());
        assert!(state.identifier.is_none());
    }

    #[test]
    fn attach_and_track_stores() {
        let mut state = ClientState::new();
        let id = uuid::Uuid::new_v4();
        state.attach(id);
        assert!(state.attached);
        assert_eq!(state.identifier, Some(id));

        assert!(state.add_store("cache1"));
        assert!(!state.add_store("cache1"));
        assert!(state.remove_store("cache1"));
        assert!(!state.remove_store("cache1"));
    }

    #[test]
    fn clones_observe_changes_made_through_the_handle() {
        let owner = SharedClientState::new();
        let observer = owner.clone();

        owner.attach(uuid::Uuid::new_v4());
        assert!(owner.add_store("cache1"));

        let seen = observer.snapshot();
        assert!(seen.attached);
        assert!(seen.attached_stores.contains("cache1"));

        assert!(observer.remove_store("cache1"));
        assert!(owner.snapshot().attached_stores.is_empty());
    }
}
