//! Management bridge: mirrors entity lifecycle events into the registry.

use std::sync::Arc;

use futures_util::future::join_all;

use crate::domain::notification::store_name_attributes;
use crate::domain::{
    AllocationType, Binding, ClientId, EntityRole, NotificationAttributes, NotificationKind,
    SharedClientState, TierState,
};
use crate::provider::default_providers;
use crate::registry::RegistryGateway;

/// Lifecycle coordinator between the cluster tier entity and the
/// management registry.
///
/// Stateless apart from its two references: every call rebuilds the
/// bindings it needs from the current [`TierState`]. The owning entity
/// serializes lifecycle events; the bridge adds no locking of its own.
///
/// Two ordering rules hold for every method:
///
/// - bindings registered by a call are all registered, then refreshed,
///   before a notification about them is pushed;
/// - a store's destroy notification is pushed while its binding is still
///   registered, and only then is the binding removed.
#[derive(Debug, Clone)]
pub struct ManagementBridge {
    gateway: RegistryGateway,
    state: Arc<dyn TierState>,
}

impl ManagementBridge {
    /// Creates the bridge and declares the entity's provider set.
    #[must_use]
    pub fn new(gateway: RegistryGateway, state: Arc<dyn TierState>, role: EntityRole) -> Self {
        for provider in default_providers(role, &state) {
            gateway.add_provider(provider);
        }
        Self { gateway, state }
    }

    /// Publishes the entity itself, once it has been created.
    ///
    /// Registers the manager binding and the all-shared-pools marker
    /// together, then refreshes.
    pub async fn init(&self) {
        tracing::trace!("init()");
        let bindings = vec![
            Binding::cluster_tier_manager(&self.state),
            Binding::AllSharedPools,
        ];
        if self.register_all(bindings).await {
            self.gateway.refresh().await;
        }
    }

    /// A client opened a connection.
    ///
    /// The binding keeps a clone of `state`; later refreshes describe the
    /// client as the entity has updated it since.
    pub async fn client_connected(&self, client: ClientId, state: &SharedClientState) {
        tracing::trace!(%client, "client_connected()");
        if self.register_all(vec![Binding::client(client, state)]).await {
            self.gateway.refresh().await;
        }
    }

    /// A client connection closed.
    pub async fn client_disconnected(&self, client: ClientId, state: &SharedClientState) {
        tracing::trace!(%client, "client_disconnected()");
        self.gateway.unregister(&Binding::client(client, state)).await;
        self.gateway.refresh().await;
    }

    /// A client reconnected after failover; its state was rebuilt in place.
    pub async fn client_reconnected(&self, client: ClientId, state: &SharedClientState) {
        tracing::trace!(%client, "client_reconnected()");
        self.refresh_and_notify(
            &Binding::client(client, state),
            NotificationKind::EhcacheClientReconnected,
            None,
        )
        .await;
    }

    /// A client passed validation.
    pub async fn client_validated(&self, client: ClientId, state: &SharedClientState) {
        tracing::trace!(%client, "client_validated()");
        self.refresh_and_notify(
            &Binding::client(client, state),
            NotificationKind::EhcacheClientValidated,
            None,
        )
        .await;
    }

    /// Shared pools were configured on the entity.
    ///
    /// Registers every shared pool, then notifies on the
    /// all-shared-pools marker.
    pub async fn shared_pools_configured(&self) {
        tracing::trace!("shared_pools_configured()");
        let bindings: Vec<Binding> = self
            .state
            .shared_resource_pools()
            .into_iter()
            .map(|(name, pool)| Binding::pool(&name, pool, AllocationType::Shared))
            .collect();
        if self.register_all(bindings).await {
            self.refresh_and_notify(
                &Binding::AllSharedPools,
                NotificationKind::EhcacheResourcePoolsConfigured,
                None,
            )
            .await;
        }
    }

    /// A store was created.
    ///
    /// The store and its dedicated pool, if any, are registered together so
    /// the refresh never shows one without the other.
    pub async fn server_store_created(&self, name: &str) {
        tracing::trace!(store = name, "server_store_created()");
        let Some(store) = self.state.store(name) else {
            tracing::debug!(store = name, "store not found in entity state, skipping");
            return;
        };
        let store_binding = Binding::server_store(name, store);
        let mut bindings = vec![store_binding.clone()];
        if let Some(pool) = self.state.dedicated_resource_pool(name) {
            bindings.push(Binding::pool(name, pool, AllocationType::Dedicated));
        }
        if self.register_all(bindings).await {
            self.refresh_and_notify(
                &store_binding,
                NotificationKind::EhcacheServerStoreCreated,
                None,
            )
            .await;
        }
    }

    /// A client attached a store.
    pub async fn store_attached(
        &self,
        client: ClientId,
        state: &SharedClientState,
        store_name: &str,
    ) {
        tracing::trace!(%client, store = store_name, "store_attached()");
        self.refresh_and_notify(
            &Binding::client(client, state),
            NotificationKind::EhcacheServerStoreAttached,
            Some(store_name_attributes(store_name)),
        )
        .await;
    }

    /// A client released a store.
    pub async fn store_released(
        &self,
        client: ClientId,
        state: &SharedClientState,
        store_name: &str,
    ) {
        tracing::trace!(%client, store = store_name, "store_released()");
        self.refresh_and_notify(
            &Binding::client(client, state),
            NotificationKind::EhcacheServerStoreReleased,
            Some(store_name_attributes(store_name)),
        )
        .await;
    }

    /// A store is being destroyed.
    ///
    /// Must be called while the store is still present in the entity
    /// state. A store that is already gone is skipped entirely.
    pub async fn server_store_destroyed(&self, name: &str) {
        let Some(store) = self.state.store(name) else {
            tracing::debug!(store = name, "store already gone, skipping");
            return;
        };
        let dedicated_pool = self.state.dedicated_resource_pool(name);
        tracing::trace!(store = name, "server_store_destroyed()");

        let store_binding = Binding::server_store(name, store);
        // observers must still be able to resolve the store
        self.gateway
            .push_notification(
                &store_binding,
                NotificationKind::EhcacheServerStoreDestroyed,
                None,
            )
            .await;
        self.gateway.unregister(&store_binding).await;
        if let Some(pool) = dedicated_pool {
            self.gateway
                .unregister(&Binding::pool(name, pool, AllocationType::Dedicated))
                .await;
        }
        self.gateway.refresh().await;
    }

    /// Registers all `bindings` concurrently and waits for every one.
    ///
    /// Returns `false` if any registration failed, in which case the
    /// caller's continuation is skipped.
    async fn register_all(&self, bindings: Vec<Binding>) -> bool {
        let results = join_all(bindings.into_iter().map(|b| self.gateway.register(b))).await;
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::debug!(failed, "registration incomplete, skipping refresh");
            return false;
        }
        true
    }

    async fn refresh_and_notify(
        &self,
        binding: &Binding,
        kind: NotificationKind,
        attributes: Option<NotificationAttributes>,
    ) {
        self.gateway.refresh().await;
        self.gateway.push_notification(binding, kind, attributes).await;
    }
}
