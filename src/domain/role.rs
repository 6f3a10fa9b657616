//! Entity role within the stripe.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ManagementError;

/// Role an entity instance holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRole {
    /// Primary instance serving clients.
    Active,
    /// Replica kept in sync by the active.
    Passive,
}

impl EntityRole {
    /// Returns `true` for the active role.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Passive => f.write_str("passive"),
        }
    }
}

impl FromStr for EntityRole {
    type Err = ManagementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "passive" => Ok(Self::Passive),
            other => Err(ManagementError::InvalidRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Active".parse::<EntityRole>().ok(), Some(EntityRole::Active));
        assert_eq!(
            " passive ".parse::<EntityRole>().ok(),
            Some(EntityRole::Passive)
        );
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(matches!(
            "observer".parse::<EntityRole>(),
            Err(ManagementError::InvalidRole(_))
        ));
    }
}
