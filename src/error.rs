//! Management-plane error types.
//!
//! [`ManagementError`] is the central error type for the crate. Apart from
//! configuration errors, none of them ever reach the owning entity: the
//! [`crate::registry::RegistryGateway`] and the
//! [`crate::service::ManagementBridge`] log them and carry on.

/// Management-plane error enum.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    /// A binding with the same identity is already registered.
    #[error("binding already registered: {0}")]
    DuplicateBinding(String),

    /// The binding is not registered with the substrate.
    #[error("binding not registered: {0}")]
    UnknownBinding(String),

    /// Notification name outside the closed catalog.
    #[error("unknown notification kind: {0}")]
    UnknownNotification(String),

    /// Entity role string could not be parsed.
    #[error("invalid entity role: {0}")]
    InvalidRole(String),

    /// The monitoring substrate failed to process a call.
    #[error("substrate error: {0}")]
    Substrate(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = ManagementError::UnknownBinding("store:cache1".to_string());
        assert_eq!(err.to_string(), "binding not registered: store:cache1");
    }

    #[test]
    fn config_error_names_the_variable() {
        let err = ManagementError::Config("LOG_FORMAT=xml".to_string());
        assert_eq!(err.to_string(), "configuration error: LOG_FORMAT=xml");
    }
}
