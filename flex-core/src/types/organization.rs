//! Organization Context
//!
//! The caller's organization is supplied per request by the surrounding
//! platform and trusted as authenticated context. It is never persisted.

use serde::{Deserialize, Serialize};

/// Organization role governing permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrganizationRole {
    /// Transmission System Operator
    Tso,
    /// Distribution System Operator
    Dso,
    /// Balancing Service Provider
    Bsp,
    /// Energy producer
    Producer,
}

impl OrganizationRole {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tso => "TSO",
            Self::Dso => "DSO",
            Self::Bsp => "BSP",
            Self::Producer => "PRODUCER",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TSO" => Some(Self::Tso),
            "DSO" => Some(Self::Dso),
            "BSP" => Some(Self::Bsp),
            "PRODUCER" => Some(Self::Producer),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authenticated caller context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Organization identifier (registry MRID)
    pub organization_id: String,
    /// Role of the organization
    pub role: OrganizationRole,
}

impl Organization {
    /// Create a new organization context
    pub fn new(organization_id: impl Into<String>, role: OrganizationRole) -> Self {
        Self {
            organization_id: organization_id.into(),
            role,
        }
    }

    /// Whether the caller holds one of the given roles
    pub fn is_one_of(&self, roles: &[OrganizationRole]) -> bool {
        roles.contains(&self.role)
    }
}
