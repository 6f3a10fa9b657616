//! tier-management demo entry point.
//!
//! Plays a scripted cluster tier lifecycle against the in-memory
//! management registry and logs every notification it publishes.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use tier_management::config::{LogFormat, ManagementConfig};
use tier_management::domain::{
    AllocationType, ClientId, Consistency, InMemoryTierState, ManagementNotification,
    PoolAllocation, ResourcePool, ServerStoreConfiguration, SharedClientState, TierState,
};
use tier_management::registry::{InMemoryRegistry, ManagementRegistry, RegistryGateway};
use tier_management::service::ManagementBridge;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ManagementConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        role = %config.role,
        management = config.management_enabled,
        "starting tier-management"
    );

    // Build entity state
    let state = Arc::new(InMemoryTierState::new(
        &config.cluster_tier_manager_id,
        config.default_server_resource.as_deref(),
    ));

    // Build management substrate
    let registry = config
        .management_enabled
        .then(|| Arc::new(InMemoryRegistry::new(config.notification_bus_capacity)));
    let gateway = RegistryGateway::resolve(
        config.role,
        registry
            .as_ref()
            .map(|r| Arc::clone(r) as Arc<dyn ManagementRegistry>),
        config.monitoring_producer_available,
    );
    if !gateway.is_present() {
        tracing::info!("no management substrate, lifecycle events will not be published");
    }

    let listener = registry
        .as_ref()
        .map(|r| tokio::spawn(log_notifications(r.subscribe())));

    let bridge = ManagementBridge::new(
        gateway,
        Arc::clone(&state) as Arc<dyn TierState>,
        config.role,
    );

    run_lifecycle(&bridge, &state).await;

    if let Some(registry) = &registry {
        for key in registry.registered_keys() {
            let descriptors = registry.descriptors(&key);
            tracing::info!(binding = %key, descriptors = descriptors.len(), "still registered");
        }
        tracing::info!(
            notifications = registry.notifications().len(),
            refreshes = registry.refresh_count(),
            "lifecycle complete"
        );
    }

    // Closing the bus ends the listener
    drop(registry);
    drop(bridge);
    if let Some(listener) = listener {
        listener.await?;
    }

    Ok(())
}

/// Drives the bridge through a full entity lifecycle, mutating the entity
/// state the way the cache entity would.
async fn run_lifecycle(bridge: &ManagementBridge, state: &InMemoryTierState) {
    bridge.init().await;

    let mut pools = BTreeMap::new();
    pools.insert("resource-pool-a".to_string(), ResourcePool::new(16 << 20, None));
    pools.insert(
        "resource-pool-b".to_string(),
        ResourcePool::new(8 << 20, Some("secondary-server-resource")),
    );
    state.configure_shared_pools(pools);
    bridge.shared_pools_configured().await;

    let client = ClientId::new();
    let client_state = SharedClientState::new();
    bridge.client_connected(client, &client_state).await;
    client_state.attach(uuid::Uuid::new_v4());
    bridge.client_validated(client, &client_state).await;

    state.create_store(
        "dedicated-cache",
        store_configuration(PoolAllocation::Dedicated {
            server_resource: Some("primary-server-resource".to_string()),
            size: 4 << 20,
        }),
    );
    state.set_pool_allocated_size("dedicated-cache", AllocationType::Dedicated, 1 << 20);
    bridge.server_store_created("dedicated-cache").await;

    state.create_store(
        "shared-cache",
        store_configuration(PoolAllocation::Shared {
            pool_name: "resource-pool-a".to_string(),
        }),
    );
    bridge.server_store_created("shared-cache").await;

    client_state.add_store("dedicated-cache");
    bridge
        .store_attached(client, &client_state, "dedicated-cache")
        .await;
    client_state.remove_store("dedicated-cache");
    bridge
        .store_released(client, &client_state, "dedicated-cache")
        .await;

    bridge.client_reconnected(client, &client_state).await;

    bridge.server_store_destroyed("dedicated-cache").await;
    state.destroy_store("dedicated-cache");
    // already gone: no registry calls
    bridge.server_store_destroyed("dedicated-cache").await;

    bridge.client_disconnected(client, &client_state).await;
}

fn store_configuration(pool_allocation: PoolAllocation) -> ServerStoreConfiguration {
    ServerStoreConfiguration {
        pool_allocation,
        stored_key_type: "java.lang.Long".to_string(),
        stored_value_type: "java.lang.String".to_string(),
        consistency: Consistency::Strong,
    }
}

async fn log_notifications(mut rx: broadcast::Receiver<ManagementNotification>) {
    loop {
        match rx.recv().await {
            Ok(notification) => {
                tracing::info!(
                    binding = %notification.binding,
                    notification = %notification.kind,
                    attributes = ?notification.attributes,
                    "management notification"
                );
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, "notification listener lagged behind bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
