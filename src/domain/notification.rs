//! Catalog of lifecycle notifications.
//!
//! The set is closed: every notification the bridge pushes is one of
//! [`NotificationKind::ALL`], identified on the wire by its
//! [`NotificationKind::as_str`] name.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::binding::BindingKey;
use crate::error::ManagementError;

/// Optional key-value attributes attached to a notification.
pub type NotificationAttributes = BTreeMap<String, String>;

/// Attribute carrying the store name on attach/release notifications.
pub const STORE_NAME_ATTRIBUTE: &str = "storeName";

/// Kind of lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Shared pools were configured on the entity.
    EhcacheResourcePoolsConfigured,
    /// A server store was created.
    EhcacheServerStoreCreated,
    /// A client attached a store.
    EhcacheServerStoreAttached,
    /// A client released a store.
    EhcacheServerStoreReleased,
    /// A server store is about to be destroyed.
    EhcacheServerStoreDestroyed,
    /// A client passed validation.
    EhcacheClientValidated,
    /// A client reconnected after failover.
    EhcacheClientReconnected,
}

impl NotificationKind {
    /// Every notification kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::EhcacheResourcePoolsConfigured,
        Self::EhcacheServerStoreCreated,
        Self::EhcacheServerStoreAttached,
        Self::EhcacheServerStoreReleased,
        Self::EhcacheServerStoreDestroyed,
        Self::EhcacheClientValidated,
        Self::EhcacheClientReconnected,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EhcacheResourcePoolsConfigured => "EHCACHE_RESOURCE_POOLS_CONFIGURED",
            Self::EhcacheServerStoreCreated => "EHCACHE_SERVER_STORE_CREATED",
            Self::EhcacheServerStoreAttached => "EHCACHE_SERVER_STORE_ATTACHED",
            Self::EhcacheServerStoreReleased => "EHCACHE_SERVER_STORE_RELEASED",
            Self::EhcacheServerStoreDestroyed => "EHCACHE_SERVER_STORE_DESTROYED",
            Self::EhcacheClientValidated => "EHCACHE_CLIENT_VALIDATED",
            Self::EhcacheClientReconnected => "EHCACHE_CLIENT_RECONNECTED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ManagementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ManagementError::UnknownNotification(s.to_string()))
    }
}

/// A notification as accepted by a substrate.
#[derive(Debug, Clone, Serialize)]
pub struct ManagementNotification {
    /// Identity of the binding the notification is about.
    pub binding: BindingKey,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Attributes, possibly empty.
    pub attributes: NotificationAttributes,
    /// When the substrate accepted the notification.
    pub timestamp: DateTime<Utc>,
}

/// Builds the `storeName` attribute map.
#[must_use]
pub fn store_name_attributes(store_name: &str) -> NotificationAttributes {
    let mut attributes = NotificationAttributes::new();
    attributes.insert(STORE_NAME_ATTRIBUTE.to_string(), store_name.to_string());
    attributes
}
