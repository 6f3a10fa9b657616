//! Settings providers.

use serde_json::Value;

use super::{Capability, Descriptor, ManagementProvider};
use crate::domain::{Binding, PoolAllocation};

/// Exposes the state of connected clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientStateSettings;

impl ManagementProvider for ClientStateSettings {
    fn name(&self) -> &'static str {
        "ClientStateSettings"
    }

    fn capability(&self) -> Capability {
        Capability::Settings
    }

    fn supports(&self, binding: &Binding) -> bool {
        matches!(binding, Binding::ClientState { .. })
    }

    fn descriptors(&self, binding: &Binding) -> Vec<Descriptor> {
        let Binding::ClientState { client, state } = binding else {
            return Vec::new();
        };
        let state = state.snapshot();
        let stores: Vec<Value> = state
            .attached_stores
            .iter()
            .map(|s| Value::from(s.as_str()))
            .collect();
        let identifier = state
            .identifier
            .map_or(Value::Null, |id| Value::from(id.to_string()));
        vec![
            Descriptor::new(self.name(), self.capability())
                .with("clientId", client.to_string())
                .with("attached", state.attached)
                .with("attachedStores", stores)
                .with("clientIdentifier", identifier),
        ]
    }
}

/// Exposes the cluster tier manager configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterTierManagerSettings;

impl ManagementProvider for ClusterTierManagerSettings {
    fn name(&self) -> &'static str {
        "ClusterTierManagerSettings"
    }

    fn capability(&self) -> Capability {
        Capability::Settings
    }

    fn supports(&self, binding: &Binding) -> bool {
        matches!(binding, Binding::ClusterTierManager { .. })
    }

    fn descriptors(&self, binding: &Binding) -> Vec<Descriptor> {
        let Binding::ClusterTierManager { identifier, state } = binding else {
            return Vec::new();
        };
        let pools: Vec<Value> = state
            .shared_resource_pools()
            .into_keys()
            .map(Value::from)
            .collect();
        vec![
            Descriptor::new(self.name(), self.capability())
                .with("alias", identifier.as_str())
                .with(
                    "defaultServerResource",
                    state.default_server_resource().map_or(Value::Null, Value::from),
                )
                .with("sharedPools", pools),
        ]
    }
}

/// Exposes the configuration of server stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerStoreSettings;

impl ManagementProvider for ServerStoreSettings {
    fn name(&self) -> &'static str {
        "ServerStoreSettings"
    }

    fn capability(&self) -> Capability {
        Capability::Settings
    }

    fn supports(&self, binding: &Binding) -> bool {
        matches!(binding, Binding::ServerStore { .. })
    }

    fn descriptors(&self, binding: &Binding) -> Vec<Descriptor> {
        let Binding::ServerStore { name, store } = binding else {
            return Vec::new();
        };
        let config = store.configuration();
        let mut descriptor = Descriptor::new(self.name(), self.capability())
            .with("alias", name.as_str())
            .with("resourcePoolType", config.pool_allocation.pool_type())
            .with("storedKeyType", config.stored_key_type.as_str())
            .with("storedValueType", config.stored_value_type.as_str())
            .with("consistency", config.consistency.to_string());
        match &config.pool_allocation {
            PoolAllocation::Dedicated {
                server_resource,
                size,
            } => {
                descriptor = descriptor
                    .with(
                        "resourcePoolDedicatedResourceName",
                        server_resource.clone().map_or(Value::Null, Value::from),
                    )
                    .with("resourcePoolDedicatedSize", *size);
            }
            PoolAllocation::Shared { pool_name } => {
                descriptor = descriptor.with("resourcePoolSharedPoolName", pool_name.as_str());
            }
            PoolAllocation::Unknown => {}
        }
        vec![descriptor]
    }
}

/// Exposes the configuration of individual resource pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolSettings;

impl ManagementProvider for PoolSettings {
    fn name(&self) -> &'static str {
        "PoolSettings"
    }

    fn capability(&self) -> Capability {
        Capability::Settings
    }

    fn supports(&self, binding: &Binding) -> bool {
        matches!(binding, Binding::Pool { .. })
    }

    fn descriptors(&self, binding: &Binding) -> Vec<Descriptor> {
        let Binding::Pool {
            name,
            pool,
            allocation,
        } = binding
        else {
            return Vec::new();
        };
        vec![
            Descriptor::new(self.name(), self.capability())
                .with("alias", name.as_str())
                .with("allocationType", allocation.as_str())
                .with(
                    "serverResource",
                    pool.server_resource.clone().map_or(Value::Null, Value::from),
                )
                .with("size", pool.size),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::domain::{
        AllocationType, ClientId, Consistency, InMemoryTierState, ResourcePool,
        ServerStoreConfiguration, SharedClientState, StoreSnapshot, TierState,
    };

    fn single(descriptors: Vec<Descriptor>) -> Descriptor {
        let mut iter = descriptors.into_iter();
        let (Some(first), None) = (iter.next(), iter.next()) else {
            panic!("expected exactly one descriptor");
        };
        first
    }

    #[test]
    fn client_settings_list_attached_stores() {
        let state = SharedClientState::new();
        let binding = Binding::client(ClientId::new(), &state);
        state.attach(uuid::Uuid::new_v4());
        state.add_store("cache1");

        let descriptor = single(ClientStateSettings.descriptors(&binding));
        assert_eq!(descriptor.get("attached"), Some(&Value::Bool(true)));
        assert_eq!(
            descriptor.get("attachedStores"),
            Some(&serde_json::json!(["cache1"]))
        );
    }

    #[test]
    fn manager_settings_read_entity_state() {
        let state = InMemoryTierState::new("mgr", Some("primary-server-resource"));
        let mut pools = BTreeMap::new();
        pools.insert("pool-a".to_string(), ResourcePool::new(1024, None));
        state.configure_shared_pools(pools);
        let state: Arc<dyn TierState> = Arc::new(state);

        let descriptor = single(
            ClusterTierManagerSettings.descriptors(&Binding::cluster_tier_manager(&state)),
        );
        assert_eq!(descriptor.get("alias"), Some(&Value::from("mgr")));
        assert_eq!(
            descriptor.get("sharedPools"),
            Some(&serde_json::json!(["pool-a"]))
        );
    }

    #[test]
    fn store_settings_for_dedicated_store() {
        let store = Arc::new(StoreSnapshot::new(ServerStoreConfiguration {
            pool_allocation: PoolAllocation::Dedicated {
                server_resource: Some("primary-server-resource".to_string()),
                size: 4096,
            },
            stored_key_type: "java.lang.Long".to_string(),
            stored_value_type: "java.lang.String".to_string(),
            consistency: Consistency::Strong,
        }));
        let binding = Binding::server_store("cache1", store);

        let descriptor = single(ServerStoreSettings.descriptors(&binding));
        assert_eq!(
            descriptor.get("resourcePoolType"),
            Some(&Value::from("dedicated"))
        );
        assert_eq!(
            descriptor.get("resourcePoolDedicatedSize"),
            Some(&Value::from(4096_u64))
        );
        assert_eq!(descriptor.get("consistency"), Some(&Value::from("STRONG")));
        assert!(descriptor.get("resourcePoolSharedPoolName").is_none());
    }

    #[test]
    fn pool_settings_skip_marker() {
        assert!(!PoolSettings.supports(&Binding::AllSharedPools));
        assert!(PoolSettings.descriptors(&Binding::AllSharedPools).is_empty());

        let binding = Binding::pool(
            "pool-a",
            ResourcePool::new(2048, Some("secondary")),
            AllocationType::Shared,
        );
        let descriptor = single(PoolSettings.descriptors(&binding));
        assert_eq!(descriptor.get("allocationType"), Some(&Value::from("shared")));
        assert_eq!(descriptor.get("size"), Some(&Value::from(2048_u64)));
    }

    #[test]
    fn providers_ignore_foreign_bindings() {
        let binding = Binding::client(ClientId::new(), &SharedClientState::new());
        assert!(ServerStoreSettings.descriptors(&binding).is_empty());
        assert!(!ClusterTierManagerSettings.supports(&binding));
    }
}
