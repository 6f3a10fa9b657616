//! Interface of the external monitoring substrate.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Binding, NotificationAttributes, NotificationKind};
use crate::error::ManagementError;
use crate::provider::ManagementProvider;

/// The calls the bridge needs from a management registry.
///
/// Implementations decide how descriptors are computed and published;
/// the bridge only drives the lifecycle. Every call may complete
/// asynchronously.
#[async_trait]
pub trait ManagementRegistry: Send + Sync + fmt::Debug {
    /// Declares a provider. Called before any binding is registered.
    fn add_provider(&self, provider: Arc<dyn ManagementProvider>);

    /// Registers a binding. Resolves once its descriptors can be published.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate rejects the binding, e.g. because
    /// its identity is already registered.
    async fn register(&self, binding: Binding) -> Result<(), ManagementError>;

    /// Removes a binding. Unknown bindings are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate fails to process the removal.
    async fn unregister(&self, binding: &Binding) -> Result<(), ManagementError>;

    /// Recomputes and publishes the descriptors of all registered bindings.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate fails to publish.
    async fn refresh(&self) -> Result<(), ManagementError>;

    /// Emits a notification about `binding`.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification cannot be delivered, e.g.
    /// because the binding is not registered.
    async fn push_notification(
        &self,
        binding: &Binding,
        kind: NotificationKind,
        attributes: NotificationAttributes,
    ) -> Result<(), ManagementError>;
}
