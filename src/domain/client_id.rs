//! Client connection handle.
//!
//! The entity assigns a [`ClientId`] when a connection opens and keeps it
//! until the connection closes. It is the identity of a client binding,
//! so every binding built for one connection refers to the same
//! management object.

use std::fmt;

use serde::Serialize;

/// Handle identifying one connected client (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    /// Allocates a handle for a new connection.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
