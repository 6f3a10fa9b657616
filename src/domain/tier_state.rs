//! Entity state accessor.
//!
//! [`TierState`] is how the management bridge reads the current stores and
//! pools of the cluster tier entity. The bridge never caches what it reads:
//! every lifecycle call looks the state up again.
//!
//! [`InMemoryTierState`] is a self-contained implementation backed by
//! `RwLock`ed maps, used by the demo binary and tests.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::resource_pool::{AllocationType, ResourcePool};
use super::server_store::{
    PoolAllocation, ServerSideStore, ServerStoreConfiguration, StoreSnapshot,
};

/// Read access to the cluster tier entity's topology.
pub trait TierState: Send + Sync + fmt::Debug {
    /// Identifier of the cluster tier manager entity.
    fn cluster_tier_manager_identifier(&self) -> String;

    /// Default server resource, if the entity configured one.
    fn default_server_resource(&self) -> Option<String>;

    /// Looks up a store by name.
    fn store(&self, name: &str) -> Option<Arc<dyn ServerSideStore>>;

    /// The pool dedicated to store `name`, if the store has one.
    fn dedicated_resource_pool(&self, name: &str) -> Option<ResourcePool>;

    /// All configured shared pools, keyed by pool name.
    fn shared_resource_pools(&self) -> BTreeMap<String, ResourcePool>;

    /// Bytes currently allocated from a pool, `None` if the pool is unknown.
    fn pool_allocated_size(&self, name: &str, allocation: AllocationType) -> Option<u64>;
}

#[derive(Debug)]
struct StoreEntry {
    store: Arc<dyn ServerSideStore>,
    dedicated_pool: Option<ResourcePool>,
}

/// In-process [`TierState`] implementation.
///
/// # Concurrency
///
/// Each map sits behind its own `std::sync::RwLock`. Lock poisoning is
/// recovered from, since every write leaves the maps consistent.
#[derive(Debug)]
pub struct InMemoryTierState {
    manager_identifier: String,
    default_server_resource: Option<String>,
    shared_pools: RwLock<BTreeMap<String, ResourcePool>>,
    stores: RwLock<HashMap<String, StoreEntry>>,
    allocated: RwLock<HashMap<(String, AllocationType), u64>>,
}

impl InMemoryTierState {
    /// Creates an entity state with no pools and no stores.
    #[must_use]
    pub fn new(manager_identifier: &str, default_server_resource: Option<&str>) -> Self {
        Self {
            manager_identifier: manager_identifier.to_string(),
            default_server_resource: default_server_resource.map(str::to_string),
            shared_pools: RwLock::new(BTreeMap::new()),
            stores: RwLock::new(HashMap::new()),
            allocated: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the set of shared pools.
    pub fn configure_shared_pools(&self, pools: BTreeMap<String, ResourcePool>) {
        let mut map = self
            .shared_pools
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *map = pools;
    }

    /// Creates a store from its configuration.
    ///
    /// A dedicated pool is derived from a [`PoolAllocation::Dedicated`]
    /// configuration. Returns `false` if a store with that name exists.
    pub fn create_store(&self, name: &str, configuration: ServerStoreConfiguration) -> bool {
        self.insert_store(name, Arc::new(StoreSnapshot::new(configuration)))
    }

    /// Inserts an existing store implementation.
    ///
    /// Returns `false` if a store with that name exists.
    pub fn insert_store(&self, name: &str, store: Arc<dyn ServerSideStore>) -> bool {
        let dedicated_pool = match &store.configuration().pool_allocation {
            PoolAllocation::Dedicated {
                server_resource,
                size,
            } => Some(ResourcePool::new(*size, server_resource.as_deref())),
            PoolAllocation::Shared { .. } | PoolAllocation::Unknown => None,
        };
        let mut map = self.stores.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(name) {
            return false;
        }
        map.insert(
            name.to_string(),
            StoreEntry {
                store,
                dedicated_pool,
            },
        );
        true
    }

    /// Removes a store and its dedicated pool.
    ///
    /// Returns `false` if no such store exists.
    pub fn destroy_store(&self, name: &str) -> bool {
        let removed = self
            .stores
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some();
        if removed {
            self.allocated
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&(name.to_string(), AllocationType::Dedicated));
        }
        removed
    }

    /// Records the bytes currently allocated from a pool.
    pub fn set_pool_allocated_size(&self, name: &str, allocation: AllocationType, bytes: u64) {
        self.allocated
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((name.to_string(), allocation), bytes);
    }

    fn pool_exists(&self, name: &str, allocation: AllocationType) -> bool {
        match allocation {
            AllocationType::Shared => self
                .shared_pools
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(name),
            AllocationType::Dedicated => self.dedicated_resource_pool(name).is_some(),
        }
    }
}

impl TierState for InMemoryTierState {
    fn cluster_tier_manager_identifier(&self) -> String {
        self.manager_identifier.clone()
    }

    fn default_server_resource(&self) -> Option<String> {
        self.default_server_resource.clone()
    }

    fn store(&self, name: &str) -> Option<Arc<dyn ServerSideStore>> {
        let map = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).map(|entry| Arc::clone(&entry.store))
    }

    fn dedicated_resource_pool(&self, name: &str) -> Option<ResourcePool> {
        let map = self.stores.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).and_then(|entry| entry.dedicated_pool.clone())
    }

    fn shared_resource_pools(&self) -> BTreeMap<String, ResourcePool> {
        self.shared_pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn pool_allocated_size(&self, name: &str, allocation: AllocationType) -> Option<u64> {
        if !self.pool_exists(name, allocation) {
            return None;
        }
        let allocated = self
            .allocated
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Some(
            allocated
                .get(&(name.to_string(), allocation))
                .copied()
                .unwrap_or(0),
        )
    }
}
