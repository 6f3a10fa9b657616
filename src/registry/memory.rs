//! In-process management substrate.
//!
//! [`InMemoryRegistry`] keeps registered bindings in a map keyed by
//! [`BindingKey`], publishes a descriptor tree on every refresh, and
//! broadcasts accepted notifications to subscribers.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;

use super::substrate::ManagementRegistry;
use crate::domain::{
    Binding, BindingKey, ManagementNotification, NotificationAttributes, NotificationKind,
};
use crate::error::ManagementError;
use crate::provider::{Descriptor, ManagementProvider};

/// Reference [`ManagementRegistry`] implementation.
///
/// Accepted notifications are kept in a bounded history, oldest dropped
/// first, and broadcast on a channel of the same capacity.
///
/// # Concurrency
///
/// State sits behind `std::sync::RwLock`s that are never held across an
/// await point. Registration of distinct bindings may proceed from
/// several tasks at once.
#[derive(Debug)]
pub struct InMemoryRegistry {
    providers: RwLock<Vec<Arc<dyn ManagementProvider>>>,
    bindings: RwLock<HashMap<BindingKey, Binding>>,
    published: RwLock<BTreeMap<BindingKey, Vec<Descriptor>>>,
    history: RwLock<VecDeque<ManagementNotification>>,
    capacity: usize,
    refreshes: AtomicU64,
    sender: broadcast::Sender<ManagementNotification>,
}

impl InMemoryRegistry {
    /// Creates an empty registry keeping the last `capacity` notifications,
    /// which is also how far a subscriber may lag behind. A zero capacity
    /// is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            providers: RwLock::new(Vec::new()),
            bindings: RwLock::new(HashMap::new()),
            published: RwLock::new(BTreeMap::new()),
            history: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            refreshes: AtomicU64::new(0),
            sender,
        }
    }

    /// Subscribes to notifications accepted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ManagementNotification> {
        self.sender.subscribe()
    }

    /// Names of the declared providers, in declaration order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|p| p.name())
            .collect()
    }

    /// Identities of the currently registered bindings, sorted.
    #[must_use]
    pub fn registered_keys(&self) -> Vec<BindingKey> {
        let map = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<BindingKey> = map.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns `true` if a binding with this identity is registered.
    #[must_use]
    pub fn is_registered(&self, key: &BindingKey) -> bool {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Descriptors published for `key` by the last refresh.
    #[must_use]
    pub fn descriptors(&self, key: &BindingKey) -> Vec<Descriptor> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// The most recent accepted notifications, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<ManagementNotification> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Number of refreshes performed.
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    fn describe(&self, binding: &Binding) -> Vec<Descriptor> {
        if binding.is_marker() {
            return Vec::new();
        }
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        providers
            .iter()
            .filter(|p| p.supports(binding))
            .flat_map(|p| p.descriptors(binding))
            .collect()
    }
}

#[async_trait]
impl ManagementRegistry for InMemoryRegistry {
    fn add_provider(&self, provider: Arc<dyn ManagementProvider>) {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(provider);
    }

    async fn register(&self, binding: Binding) -> Result<(), ManagementError> {
        let key = binding.key();
        let mut map = self
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&key) {
            return Err(ManagementError::DuplicateBinding(key.to_string()));
        }
        tracing::debug!(binding = %key, "binding registered");
        map.insert(key, binding);
        Ok(())
    }

    async fn unregister(&self, binding: &Binding) -> Result<(), ManagementError> {
        let key = binding.key();
        let removed = self
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        if removed.is_some() {
            tracing::debug!(binding = %key, "binding unregistered");
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<(), ManagementError> {
        let snapshot: Vec<Binding> = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let tree: BTreeMap<BindingKey, Vec<Descriptor>> = snapshot
            .iter()
            .filter(|binding| !binding.is_marker())
            .map(|binding| (binding.key(), self.describe(binding)))
            .collect();
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = tree;
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn push_notification(
        &self,
        binding: &Binding,
        kind: NotificationKind,
        attributes: NotificationAttributes,
    ) -> Result<(), ManagementError> {
        let key = binding.key();
        if !self.is_registered(&key) {
            return Err(ManagementError::UnknownBinding(key.to_string()));
        }
        let notification = ManagementNotification {
            binding: key,
            kind,
            attributes,
            timestamp: Utc::now(),
        };
        {
            let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
            if history.len() == self.capacity {
                history.pop_front();
            }
            history.push_back(notification.clone());
        }
        // no subscribers is fine
        let _ = self.sender.send(notification);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{
        AllocationType, ClientId, EntityRole, InMemoryTierState, ResourcePool,
        SharedClientState, TierState,
    };
    use crate::provider::default_providers;

    fn make_registry() -> InMemoryRegistry {
        let registry = InMemoryRegistry::new(16);
        let state: Arc<dyn TierState> = Arc::new(InMemoryTierState::new("mgr", None));
        for provider in default_providers(EntityRole::Active, &state) {
            registry.add_provider(provider);
        }
        registry
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let registry = make_registry();
        let binding = Binding::client(ClientId::new(), &SharedClientState::new());

        assert!(registry.register(binding.clone()).await.is_ok());
        let second = registry.register(binding).await;
        assert!(matches!(second, Err(ManagementError::DuplicateBinding(_))));
    }

    #[tokio::test]
    async fn unregister_unknown_is_ok() {
        let registry = make_registry();
        let result = registry.unregister(&Binding::AllSharedPools).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn descriptors_visible_only_after_refresh() {
        let registry = make_registry();
        let binding = Binding::client(ClientId::new(), &SharedClientState::new());
        let key = binding.key();

        let _ = registry.register(binding).await;
        assert!(registry.descriptors(&key).is_empty());

        let _ = registry.refresh().await;
        let descriptors = registry.descriptors(&key);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(registry.refresh_count(), 1);
    }

    #[tokio::test]
    async fn marker_has_no_descriptors() {
        let registry = make_registry();
        let _ = registry.register(Binding::AllSharedPools).await;
        let _ = registry.refresh().await;
        assert!(registry.is_registered(&BindingKey::AllSharedPools));
        assert!(registry.descriptors(&BindingKey::AllSharedPools).is_empty());
    }

    #[tokio::test]
    async fn unregistered_binding_leaves_tree_on_refresh() {
        let registry = make_registry();
        let binding = Binding::pool("a", ResourcePool::new(1, None), AllocationType::Shared);
        let key = binding.key();
        let _ = registry.register(binding.clone()).await;
        let _ = registry.refresh().await;
        assert!(!registry.descriptors(&key).is_empty());

        let _ = registry.unregister(&binding).await;
        let _ = registry.refresh().await;
        assert!(registry.descriptors(&key).is_empty());
    }

    #[tokio::test]
    async fn notification_requires_registered_binding() {
        let registry = make_registry();
        let result = registry
            .push_notification(
                &Binding::AllSharedPools,
                NotificationKind::EhcacheResourcePoolsConfigured,
                NotificationAttributes::new(),
            )
            .await;
        assert!(matches!(result, Err(ManagementError::UnknownBinding(_))));
        assert!(registry.notifications().is_empty());
    }

    #[tokio::test]
    async fn accepted_notification_is_broadcast() {
        let registry = make_registry();
        let mut rx = registry.subscribe();
        let _ = registry.register(Binding::AllSharedPools).await;

        let result = registry
            .push_notification(
                &Binding::AllSharedPools,
                NotificationKind::EhcacheResourcePoolsConfigured,
                NotificationAttributes::new(),
            )
            .await;
        assert!(result.is_ok());

        let Ok(notification) = rx.recv().await else {
            panic!("expected notification");
        };
        assert_eq!(notification.binding, BindingKey::AllSharedPools);
        assert_eq!(registry.notifications().len(), 1);
    }

    #[tokio::test]
    async fn history_keeps_only_the_latest_notifications() {
        let registry = InMemoryRegistry::new(2);
        let _ = registry.register(Binding::AllSharedPools).await;
        for kind in [
            NotificationKind::EhcacheResourcePoolsConfigured,
            NotificationKind::EhcacheServerStoreCreated,
            NotificationKind::EhcacheServerStoreDestroyed,
        ] {
            let result = registry
                .push_notification(&Binding::AllSharedPools, kind, NotificationAttributes::new())
                .await;
            assert!(result.is_ok());
        }

        let kinds: Vec<NotificationKind> =
            registry.notifications().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::EhcacheServerStoreCreated,
                NotificationKind::EhcacheServerStoreDestroyed,
            ]
        );
    }

    #[tokio::test]
    async fn zero_capacity_still_delivers() {
        let registry = InMemoryRegistry::new(0);
        let mut rx = registry.subscribe();
        let _ = registry.register(Binding::AllSharedPools).await;
        let _ = registry
            .push_notification(
                &Binding::AllSharedPools,
                NotificationKind::EhcacheResourcePoolsConfigured,
                NotificationAttributes::new(),
            )
            .await;

        assert!(rx.recv().await.is_ok());
        assert_eq!(registry.notifications().len(), 1);
    }

    #[tokio::test]
    async fn refresh_describes_current_client_state() {
        let registry = make_registry();
        let state = SharedClientState::new();
        let binding = Binding::client(ClientId::new(), &state);
        let key = binding.key();
        let _ = registry.register(binding).await;
        let _ = registry.refresh().await;

        state.add_store("cache1");
        let _ = registry.refresh().await;

        let Some(descriptor) = registry.descriptors(&key).into_iter().next() else {
            panic!("expected a client descriptor");
        };
        assert_eq!(
            descriptor.get("attachedStores"),
            Some(&serde_json::json!(["cache1"]))
        );
    }

    #[test]
    fn providers_keep_declaration_order() {
        let registry = make_registry();
        assert_eq!(registry.provider_names().first(), Some(&"ClientStateSettings"));
        assert_eq!(registry.provider_names().len(), 6);
    }
}
