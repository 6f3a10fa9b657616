//! # tier-management
//!
//! Management-event bridge for a clustered cache tier entity.
//!
//! The bridge mirrors the entity's topology (stores, resource pools,
//! connected clients) into a monitoring substrate and pushes a
//! notification whenever that topology changes. The substrate itself is
//! optional: without one, every call degrades to a no-op.
//!
//! ## Architecture
//!
//! ```text
//! Cluster tier entity (lifecycle events)
//!     │
//!     ├── ManagementBridge (service/)
//!     │       │
//!     │       ├── TierState (domain/)      read current stores / pools
//!     │       └── Binding, NotificationKind (domain/)
//!     │
//!     ├── RegistryGateway (registry/)      Absent | Present
//!     │
//!     ├── ManagementProvider set (provider/)
//!     │
//!     └── ManagementRegistry substrate (registry/)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod provider;
pub mod registry;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
