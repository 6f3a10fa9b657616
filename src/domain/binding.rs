//! Management bindings: the unit of registration with the substrate.
//!
//! A [`Binding`] pairs a domain object with a stable [`BindingKey`].
//! Bindings are value objects: the bridge builds them on demand from the
//! current entity state, and two bindings for the same logical object
//! compare equal whatever payload they carry.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use super::client_id::ClientId;
use super::client_state::SharedClientState;
use super::resource_pool::{AllocationType, ResourcePool};
use super::server_store::ServerSideStore;
use super::tier_state::TierState;

/// Coarse classification of bindings, used by providers to select what
/// they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// The cluster tier manager entity itself.
    ClusterTierManager,
    /// A connected client.
    ClientState,
    /// A server-side store.
    ServerStore,
    /// A resource pool, or the all-shared-pools marker.
    Pool,
}

/// Stable identity of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingKey {
    /// Keyed by manager identifier.
    ClusterTierManager {
        /// Manager identifier.
        identifier: String,
    },
    /// Keyed by connection handle.
    Client {
        /// Client connection handle.
        client: ClientId,
    },
    /// Keyed by store name.
    Store {
        /// Store name.
        name: String,
    },
    /// Keyed by pool name and allocation type.
    Pool {
        /// Pool name (store name for dedicated pools).
        name: String,
        /// Allocation type.
        allocation: AllocationType,
    },
    /// The singleton all-shared-pools marker.
    AllSharedPools,
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClusterTierManager { identifier } => write!(f, "manager:{identifier}"),
            Self::Client { client } => write!(f, "client:{client}"),
            Self::Store { name } => write!(f, "store:{name}"),
            Self::Pool { name, allocation } => write!(f, "pool:{allocation}:{name}"),
            Self::AllSharedPools => f.write_str("pool:shared:*"),
        }
    }
}

/// A domain object exposed to the management substrate.
#[derive(Debug, Clone)]
pub enum Binding {
    /// The cluster tier manager, described through the entity state.
    ClusterTierManager {
        /// Manager identifier.
        identifier: String,
        /// Entity state the manager settings are read from.
        state: Arc<dyn TierState>,
    },
    /// A connected client and its live server-side state.
    ClientState {
        /// Connection handle.
        client: ClientId,
        /// State shared with the entity; read at describe time.
        state: SharedClientState,
    },
    /// A server-side store.
    ServerStore {
        /// Store name.
        name: String,
        /// The store itself.
        store: Arc<dyn ServerSideStore>,
    },
    /// A shared or dedicated resource pool.
    Pool {
        /// Pool name; a dedicated pool is named after its store.
        name: String,
        /// Pool configuration.
        pool: ResourcePool,
        /// Allocation type.
        allocation: AllocationType,
    },
    /// Marker standing for all shared pools collectively.
    ///
    /// Carries no statistics and is excluded from per-object descriptors;
    /// it only exists so pool-wide notifications have a source.
    AllSharedPools,
}

impl Binding {
    /// Builds the binding of the cluster tier manager.
    #[must_use]
    pub fn cluster_tier_manager(state: &Arc<dyn TierState>) -> Self {
        Self::ClusterTierManager {
            identifier: state.cluster_tier_manager_identifier(),
            state: Arc::clone(state),
        }
    }

    /// Builds a client binding over the entity's live client state.
    #[must_use]
    pub fn client(client: ClientId, state: &SharedClientState) -> Self {
        Self::ClientState {
            client,
            state: state.clone(),
        }
    }

    /// Builds a store binding.
    #[must_use]
    pub fn server_store(name: &str, store: Arc<dyn ServerSideStore>) -> Self {
        Self::ServerStore {
            name: name.to_string(),
            store,
        }
    }

    /// Builds a pool binding.
    #[must_use]
    pub fn pool(name: &str, pool: ResourcePool, allocation: AllocationType) -> Self {
        Self::Pool {
            name: name.to_string(),
            pool,
            allocation,
        }
    }

    /// Returns the stable identity of this binding.
    #[must_use]
    pub fn key(&self) -> BindingKey {
        match self {
            Self::ClusterTierManager { identifier, .. } => BindingKey::ClusterTierManager {
                identifier: identifier.clone(),
            },
            Self::ClientState { client, .. } => BindingKey::Client { client: *client },
            Self::ServerStore { name, .. } => BindingKey::Store { name: name.clone() },
            Self::Pool {
                name, allocation, ..
            } => BindingKey::Pool {
                name: name.clone(),
                allocation: *allocation,
            },
            Self::AllSharedPools => BindingKey::AllSharedPools,
        }
    }

    /// Returns the kind of object bound.
    #[must_use]
    pub const fn kind(&self) -> BindingKind {
        match self {
            Self::ClusterTierManager { .. } => BindingKind::ClusterTierManager,
            Self::ClientState { .. } => BindingKind::ClientState,
            Self::ServerStore { .. } => BindingKind::ServerStore,
            Self::Pool { .. } | Self::AllSharedPools => BindingKind::Pool,
        }
    }

    /// Returns `true` for the all-shared-pools marker.
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::AllSharedPools)
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Binding {}

impl Hash for Binding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
