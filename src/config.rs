//! Management configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use crate::domain::EntityRole;
use crate::error::ManagementError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ManagementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ManagementError::Config(format!("LOG_FORMAT={other}"))),
        }
    }
}

/// Top-level management configuration.
///
/// Loaded once at startup via [`ManagementConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ManagementConfig {
    /// Whether a management substrate is attached at all.
    pub management_enabled: bool,

    /// Role of this entity instance.
    pub role: EntityRole,

    /// Whether a monitoring producer is available (passive role only).
    pub monitoring_producer_available: bool,

    /// Identifier of the cluster tier manager.
    pub cluster_tier_manager_id: String,

    /// Default server resource of the entity, if any.
    pub default_server_resource: Option<String>,

    /// Capacity of the notification broadcast channel.
    pub notification_bus_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            management_enabled: true,
            role: EntityRole::Active,
            monitoring_producer_available: true,
            cluster_tier_manager_id: "clustered-tier-manager".to_string(),
            default_server_resource: None,
            notification_bus_capacity: 1024,
            log_format: LogFormat::Text,
        }
    }
}

impl ManagementConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set or malformed.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InvalidRole`] if `ENTITY_ROLE` is set to
    /// something other than `active` or `passive`, and
    /// [`ManagementError::Config`] if `LOG_FORMAT` is neither `text` nor
    /// `json`.
    pub fn from_env() -> Result<Self, ManagementError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ManagementConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ManagementError> {
        let defaults = Self::default();

        let role = match lookup("ENTITY_ROLE") {
            Some(value) => value.parse()?,
            None => defaults.role,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            management_enabled: parse_bool(
                lookup("MANAGEMENT_ENABLED"),
                defaults.management_enabled,
            ),
            role,
            monitoring_producer_available: parse_bool(
                lookup("MONITORING_PRODUCER_AVAILABLE"),
                defaults.monitoring_producer_available,
            ),
            cluster_tier_manager_id: lookup("CLUSTER_TIER_MANAGER_ID")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cluster_tier_manager_id),
            default_server_resource: lookup("DEFAULT_SERVER_RESOURCE")
                .filter(|v| !v.trim().is_empty()),
            notification_bus_capacity: parse_or(
                lookup("NOTIFICATION_BUS_CAPACITY"),
                defaults.notification_bus_capacity,
            ),
            log_format,
        })
    }
}

/// Parses `value` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
