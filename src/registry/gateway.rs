//! Facade over the optional monitoring substrate.
//!
//! [`RegistryGateway`] is decided once, at construction: either a
//! substrate is attached and every call is forwarded to it, or nothing is
//! and every call is a no-op. Callers never check presence themselves.
//!
//! Substrate failures stop here: they are logged and never reach the
//! entity, except for [`RegistryGateway::register`] whose result lets the
//! bridge hold back the refresh that depends on it.

use std::sync::Arc;

use super::substrate::ManagementRegistry;
use crate::domain::{Binding, EntityRole, NotificationAttributes, NotificationKind};
use crate::error::ManagementError;
use crate::provider::ManagementProvider;

/// Optional management substrate.
#[derive(Debug, Clone, Default)]
pub enum RegistryGateway {
    /// No substrate attached; every operation is a no-op.
    #[default]
    Absent,
    /// Calls are forwarded to the wrapped registry.
    Present(Arc<dyn ManagementRegistry>),
}

impl RegistryGateway {
    /// Creates a gateway from an already resolved registry.
    #[must_use]
    pub fn new(registry: Option<Arc<dyn ManagementRegistry>>) -> Self {
        registry.map_or(Self::Absent, Self::Present)
    }

    /// Resolves the gateway for an entity role.
    ///
    /// An active entity uses `registry` as given. A passive entity can only
    /// publish through a monitoring producer, so it gets an absent gateway
    /// when none is available.
    #[must_use]
    pub fn resolve(
        role: EntityRole,
        registry: Option<Arc<dyn ManagementRegistry>>,
        monitoring_producer_available: bool,
    ) -> Self {
        match role {
            EntityRole::Active => Self::new(registry),
            EntityRole::Passive if monitoring_producer_available => Self::new(registry),
            EntityRole::Passive => Self::Absent,
        }
    }

    /// Returns `true` if a substrate is attached.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Declares a provider to the substrate.
    pub fn add_provider(&self, provider: Arc<dyn ManagementProvider>) {
        if let Self::Present(registry) = self {
            registry.add_provider(provider);
        }
    }

    /// Registers `binding`.
    ///
    /// # Errors
    ///
    /// Returns the substrate's error after logging it. Never fails when
    /// absent.
    pub async fn register(&self, binding: Binding) -> Result<(), ManagementError> {
        let Self::Present(registry) = self else {
            return Ok(());
        };
        let key = binding.key();
        registry.register(binding).await.map_err(|err| {
            tracing::warn!(binding = %key, error = %err, "management registration failed");
            err
        })
    }

    /// Unregisters `binding`. Idempotent; failures are logged.
    pub async fn unregister(&self, binding: &Binding) {
        if let Self::Present(registry) = self
            && let Err(err) = registry.unregister(binding).await
        {
            tracing::warn!(binding = %binding.key(), error = %err, "management unregistration failed");
        }
    }

    /// Refreshes the published descriptors. Failures are logged.
    pub async fn refresh(&self) {
        if let Self::Present(registry) = self
            && let Err(err) = registry.refresh().await
        {
            tracing::warn!(error = %err, "management refresh failed");
        }
    }

    /// Pushes a notification about `binding`. Failures are logged.
    pub async fn push_notification(
        &self,
        binding: &Binding,
        kind: NotificationKind,
        attributes: Option<NotificationAttributes>,
    ) {
        if let Self::Present(registry) = self
            && let Err(err) = registry
                .push_notification(binding, kind, attributes.unwrap_or_default())
                .await
        {
            tracing::warn!(
                binding = %binding.key(),
                notification = %kind,
                error = %err,
                "management notification failed"
            );
        }
    }
}
