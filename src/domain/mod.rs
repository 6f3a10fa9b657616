//! Domain layer: bindings, notifications and the entity state they mirror.
//!
//! This module contains the management bindings and their identities,
//! the closed notification catalog, and the view of the cluster tier
//! entity they describe (clients, stores, pools).

pub mod binding;
pub mod client_id;
pub mod client_state;
pub mod notification;
pub mod resource_pool;
pub mod role;
pub mod server_store;
pub mod tier_state;

pub use binding::{Binding, BindingKey, BindingKind};
pub use client_id::ClientId;
pub use client_state::{ClientState, SharedClientState};
pub use notification::{
    ManagementNotification, NotificationAttributes, NotificationKind, STORE_NAME_ATTRIBUTE,
};
pub use resource_pool::{AllocationType, ResourcePool};
pub use role::EntityRole;
pub use server_store::{
    Consistency, PoolAllocation, ServerSideStore, ServerStoreConfiguration, StoreSnapshot,
    StoreStatistics,
};
pub use tier_state::{InMemoryTierState, TierState};
