//! Service layer: lifecycle orchestration.
//!
//! [`ManagementBridge`] turns entity lifecycle events into ordered
//! register / refresh / notify / unregister sequences against the
//! [`super::registry::RegistryGateway`].

pub mod management;

pub use management::ManagementBridge;
