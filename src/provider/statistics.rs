//! Statistics providers.

use std::sync::Arc;

use super::{Capability, Descriptor, ManagementProvider};
use crate::domain::{Binding, TierState};

/// Samples store statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerStoreStatistics;

impl ManagementProvider for ServerStoreStatistics {
    fn name(&self) -> &'static str {
        "ServerStoreStatistics"
    }

    fn capability(&self) -> Capability {
        Capability::Statistics
    }

    fn supports(&self, binding: &Binding) -> bool {
        matches!(binding, Binding::ServerStore { .. })
    }

    fn descriptors(&self, binding: &Binding) -> Vec<Descriptor> {
        let Binding::ServerStore { store, .. } = binding else {
            return Vec::new();
        };
        let stats = store.statistics();
        vec![
            Descriptor::new(self.name(), self.capability())
                .with("Store:AllocatedMemory", stats.allocated_memory)
                .with("Store:OccupiedMemory", stats.occupied_memory)
                .with("Store:Entries", stats.entries),
        ]
    }
}

/// Samples pool usage.
///
/// Pool bindings only carry configuration, so usage is read from the
/// entity state at sampling time.
#[derive(Debug)]
pub struct PoolStatistics {
    state: Arc<dyn TierState>,
}

impl PoolStatistics {
    /// Creates the provider over the entity state.
    #[must_use]
    pub fn new(state: Arc<dyn TierState>) -> Self {
        Self { state }
    }
}

impl ManagementProvider for PoolStatistics {
    fn name(&self) -> &'static str {
        "PoolStatistics"
    }

    fn capability(&self) -> Capability {
        Capability::Statistics
    }

    fn supports(&self, binding: &Binding) -> bool {
        matches!(binding, Binding::Pool { .. })
    }

    fn descriptors(&self, binding: &Binding) -> Vec<Descriptor> {
        let Binding::Pool {
            name, allocation, ..
        } = binding
        else {
            return Vec::new();
        };
        // a pool gone from the entity state has nothing left to sample
        let Some(allocated) = self.state.pool_allocated_size(name, *allocation) else {
            return Vec::new();
        };
        vec![Descriptor::new(self.name(), self.capability()).with("Pool:AllocatedSize", allocated)]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::Value;

    use super::*;
    use crate::domain::{
        AllocationType, Consistency, InMemoryTierState, PoolAllocation, ResourcePool,
        ServerStoreConfiguration, StoreSnapshot, StoreStatistics,
    };

    #[test]
    fn store_statistics_sample_the_store() {
        let store = Arc::new(
            StoreSnapshot::new(ServerStoreConfiguration {
                pool_allocation: PoolAllocation::Unknown,
                stored_key_type: "K".to_string(),
                stored_value_type: "V".to_string(),
                consistency: Consistency::Eventual,
            })
            .with_statistics(StoreStatistics {
                allocated_memory: 8192,
                occupied_memory: 1024,
                entries: 12,
            }),
        );
        let descriptors = ServerStoreStatistics.descriptors(&Binding::server_store("c", store));
        assert_eq!(descriptors.len(), 1);
        assert_eq!(
            descriptors.first().and_then(|d| d.get("Store:Entries")),
            Some(&Value::from(12_u64))
        );
    }

    #[test]
    fn pool_statistics_read_allocated_size() {
        let state = Arc::new(InMemoryTierState::new("mgr", None));
        let mut pools = BTreeMap::new();
        pools.insert("pool-a".to_string(), ResourcePool::new(4096, None));
        state.configure_shared_pools(pools);
        state.set_pool_allocated_size("pool-a", AllocationType::Shared, 2048);

        let provider = PoolStatistics::new(Arc::clone(&state) as Arc<dyn TierState>);
        let binding = Binding::pool(
            "pool-a",
            ResourcePool::new(4096, None),
            AllocationType::Shared,
        );
        let descriptors = provider.descriptors(&binding);
        assert_eq!(
            descriptors.first().and_then(|d| d.get("Pool:AllocatedSize")),
            Some(&Value::from(2048_u64))
        );
    }

    #[test]
    fn pool_statistics_skip_marker_and_unknown_pools() {
        let state: Arc<dyn TierState> = Arc::new(InMemoryTierState::new("mgr", None));
        let provider = PoolStatistics::new(state);
        assert!(provider.descriptors(&Binding::AllSharedPools).is_empty());

        let unknown = Binding::pool("gone", ResourcePool::new(1, None), AllocationType::Dedicated);
        assert!(provider.descriptors(&unknown).is_empty());
    }
}
