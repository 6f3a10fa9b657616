//! Management providers: descriptor-producing adapters.
//!
//! A [`ManagementProvider`] declares one class of manageable object to the
//! substrate and knows how to describe the bindings of that class. The set
//! of providers is fixed when the bridge is built; see
//! [`default_providers`].

pub mod settings;
pub mod statistics;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Binding, EntityRole, TierState};

pub use settings::{
    ClientStateSettings, ClusterTierManagerSettings, PoolSettings, ServerStoreSettings,
};
pub use statistics::{PoolStatistics, ServerStoreStatistics};

/// What a provider exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Configuration values.
    Settings,
    /// Sampled statistics.
    Statistics,
}

/// One description of a bound object produced by a provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    /// Name of the provider that produced it.
    pub provider: &'static str,
    /// Capability of that provider.
    pub capability: Capability,
    /// Named values, in a stable order.
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Descriptor {
    pub(crate) fn new(provider: &'static str, capability: Capability) -> Self {
        Self {
            provider,
            capability,
            attributes: BTreeMap::new(),
        }
    }

    pub(crate) fn with(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Returns the value of attribute `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }
}

/// Declares a class of manageable object.
pub trait ManagementProvider: Send + Sync + fmt::Debug {
    /// Provider name, unique within the set.
    fn name(&self) -> &'static str;

    /// Whether this provider exposes settings or statistics.
    fn capability(&self) -> Capability;

    /// Returns `true` if this provider describes `binding`.
    fn supports(&self, binding: &Binding) -> bool;

    /// Describes `binding`. Empty when the binding is not supported.
    fn descriptors(&self, binding: &Binding) -> Vec<Descriptor>;
}

/// Builds the provider set of an entity, in registration order.
///
/// Client settings only make sense where clients connect, so they are
/// left out on a passive entity.
#[must_use]
pub fn default_providers(
    role: EntityRole,
    state: &Arc<dyn TierState>,
) -> Vec<Arc<dyn ManagementProvider>> {
    let mut providers: Vec<Arc<dyn ManagementProvider>> = Vec::with_capacity(6);
    if role.is_active() {
        providers.push(Arc::new(ClientStateSettings));
    }
    providers.push(Arc::new(ClusterTierManagerSettings));
    providers.push(Arc::new(ServerStoreSettings));
    providers.push(Arc::new(PoolSettings));
    providers.push(Arc::new(ServerStoreStatistics));
    providers.push(Arc::new(PoolStatistics::new(Arc::clone(state))));
    providers
}
