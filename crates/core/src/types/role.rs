//! Backend roles that the load test impersonates.

use serde::{Deserialize, Serialize};

/// Role sent in the login body and carried by each simulated session.
///
/// The backend knows more roles (customer, warehouse, regional manager);
/// only the two exercised by the scenario are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Store salesperson bound to a single store.
    #[serde(rename = "sales")]
    Sales,
    /// Central manager with access to every store.
    #[serde(rename = "centralManager")]
    CentralManager,
}

impl Role {
    /// Name used on the wire (`role` field of the login body).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::CentralManager => "centralManager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Self::Sales),
            "centralManager" | "central_manager" | "central-manager" => Ok(Self::CentralManager),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
