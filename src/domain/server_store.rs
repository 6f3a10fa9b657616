//! Read-only view of a server-side store.
//!
//! The store implementation itself lives in the cache entity. The bridge
//! only needs its configuration and a statistics snapshot, which is what
//! [`ServerSideStore`] exposes.

use std::fmt;

use serde::Serialize;

/// Where a store takes its memory from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolAllocation {
    /// The store draws from a named shared pool.
    Shared {
        /// Shared pool name.
        pool_name: String,
    },
    /// The store owns a pool carved from a server resource.
    Dedicated {
        /// Server resource the dedicated pool comes from.
        server_resource: Option<String>,
        /// Dedicated pool size in bytes.
        size: u64,
    },
    /// Allocation not known on this server (e.g. a passive before sync).
    Unknown,
}

impl PoolAllocation {
    /// Returns the pool type label exposed in store settings.
    #[must_use]
    pub const fn pool_type(&self) -> &'static str {
        match self {
            Self::Shared { .. } => "shared",
            Self::Dedicated { .. } => "dedicated",
            Self::Unknown => "unknown",
        }
    }
}

/// Store consistency mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Consistency {
    /// Eventually consistent.
    Eventual,
    /// Strongly consistent.
    Strong,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eventual => f.write_str("EVENTUAL"),
            Self::Strong => f.write_str("STRONG"),
        }
    }
}

/// Immutable configuration a store was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStoreConfiguration {
    /// Memory allocation of the store.
    pub pool_allocation: PoolAllocation,
    /// Fully qualified key type name.
    pub stored_key_type: String,
    /// Fully qualified value type name.
    pub stored_value_type: String,
    /// Consistency mode.
    pub consistency: Consistency,
}

/// Point-in-time statistics of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    /// Bytes allocated to the store.
    pub allocated_memory: u64,
    /// Bytes currently occupied by entries.
    pub occupied_memory: u64,
    /// Number of mappings held.
    pub entries: u64,
}

/// Read access to a store owned by the cache entity.
pub trait ServerSideStore: Send + Sync + fmt::Debug {
    /// Configuration the store was created with.
    fn configuration(&self) -> &ServerStoreConfiguration;

    /// Current statistics snapshot.
    fn statistics(&self) -> StoreStatistics;
}

/// Plain snapshot store, used by [`super::InMemoryTierState`].
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    configuration: ServerStoreConfiguration,
    statistics: StoreStatistics,
}

impl StoreSnapshot {
    /// Creates a snapshot with empty statistics.
    #[must_use]
    pub fn new(configuration: ServerStoreConfiguration) -> Self {
        Self {
            configuration,
            statistics: StoreStatistics::default(),
        }
    }

    /// Replaces the statistics reported by this snapshot.
    #[must_use]
    pub fn with_statistics(mut self, statistics: StoreStatistics) -> Self {
        self.statistics = statistics;
        self
    }
}

impl ServerSideStore for StoreSnapshot {
    fn configuration(&self) -> &ServerStoreConfiguration {
        &self.configuration
    }

    fn statistics(&self) -> StoreStatistics {
        self.statistics
    }
}
