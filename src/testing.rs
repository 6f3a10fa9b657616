//! Test doubles shared by unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::{Binding, BindingKey, NotificationAttributes, NotificationKind};
use crate::error::ManagementError;
use crate::provider::ManagementProvider;
use crate::registry::ManagementRegistry;

/// One observed substrate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddProvider(&'static str),
    RegisterStarted(BindingKey),
    Registered(BindingKey),
    RegisterFailed(BindingKey),
    Unregistered(BindingKey),
    Refreshed,
    Notified {
        binding: BindingKey,
        kind: NotificationKind,
        attributes: NotificationAttributes,
    },
}

/// Substrate that records every call in order.
///
/// Registration yields once between start and completion so that
/// concurrently issued registrations interleave observably.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<BindingKey>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_registration_of(&self, key: BindingKey) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls other than provider declarations.
    pub fn lifecycle_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::AddProvider(_)))
            .collect()
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(predicate)
    }

    pub fn last_position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().rposition(predicate)
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn is_failing(&self, key: &BindingKey) -> bool {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

#[async_trait]
impl ManagementRegistry for RecordingRegistry {
    fn add_provider(&self, provider: Arc<dyn ManagementProvider>) {
        self.record(Call::AddProvider(provider.name()));
    }

    async fn register(&self, binding: Binding) -> Result<(), ManagementError> {
        let key = binding.key();
        self.record(Call::RegisterStarted(key.clone()));
        tokio::task::yield_now().await;
        if self.is_failing(&key) {
            self.record(Call::RegisterFailed(key.clone()));
            return Err(ManagementError::Substrate(format!("rejected {key}")));
        }
        self.record(Call::Registered(key));
        Ok(())
    }

    async fn unregister(&self, binding: &Binding) -> Result<(), ManagementError> {
        self.record(Call::Unregistered(binding.key()));
        Ok(())
    }

    async fn refresh(&self) -> Result<(), ManagementError> {
        self.record(Call::Refreshed);
        Ok(())
    }

    async fn push_notification(
        &self,
        binding: &Binding,
        kind: NotificationKind,
        attributes: NotificationAttributes,
    ) -> Result<(), ManagementError> {
        self.record(Call::Notified {
            binding: binding.key(),
            kind,
            attributes,
        });
        Ok(())
    }
}
