//! Resource pool configuration snapshots.

use std::fmt;

use serde::Serialize;

/// How a pool is allocated to stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationType {
    /// Pool usable by several stores.
    Shared,
    /// Pool exclusively backing one store, named after it.
    Dedicated,
}

impl AllocationType {
    /// Returns the wire name of the allocation type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Dedicated => "dedicated",
        }
    }
}

impl fmt::Display for AllocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a server-side resource pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcePool {
    /// Pool size in bytes.
    pub size: u64,
    /// Server resource (offheap resource name) the pool draws from.
    /// `None` means the entity's default server resource.
    pub server_resource: Option<String>,
}

impl ResourcePool {
    /// Creates a pool of `size` bytes carved from `server_resource`.
    #[must_use]
    pub fn new(size: u64, server_resource: Option<&str>) -> Self {
        Self {
            size,
            server_resource: server_resource.map(str::to_string),
        }
    }
}
