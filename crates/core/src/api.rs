//! Backend endpoints and request bodies.

use serde::Serialize;

use crate::types::{Role, StoreId};

/// Default backend address.
pub const DEFAULT_HOST: &str = "http://localhost:4000";

/// `POST` login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// `POST` order-creation endpoint.
pub const ORDERS_PATH: &str = "/api/orders";

/// Prefix of the `GET /api/inventory/{locationId}` endpoint.
pub const INVENTORY_PATH_PREFIX: &str = "/api/inventory";

/// Path for a store's inventory.
#[must_use]
pub fn inventory_path(location: &StoreId) -> String {
    format!("{INVENTORY_PATH_PREFIX}/{location}")
}

/// Body of a login request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LoginRequest<'a> {
    pub account: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_path() {
        assert_eq!(
            inventory_path(&StoreId::new("STORE-WEST-02")),
            "/api/inventory/STORE-WEST-02"
        );
    }

    #[test]
    fn test_login_body_with_role() {
        let body = LoginRequest {
            account: "central001",
            password: "123456",
            role: Some(Role::CentralManager),
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "account": "central001",
                "password": "123456",
                "role": "centralManager"
            })
        );
    }

    #[test]
    fn test_login_body_omits_missing_role() {
        let body = LoginRequest {
            account: "a",
            password: "b",
            role: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("role"));
    }
}
