//! Request shaping shared by the goose scenario and the preflight client.
//!
//! Both paths start from a `reqwest::RequestBuilder` (goose hands one out per
//! request) and finish it here, so headers, bodies and timeouts cannot drift
//! between the load test and the preflight check.

use std::time::Duration;

use reqwest::RequestBuilder;
use secrecy::ExposeSecret;
use storeload_core::api::LoginRequest;
use storeload_core::{Credential, OrderPayload, UserSession};

/// Finish a login request for `credential`.
///
/// The account's role is always sent as the role hint.
pub fn login(
    builder: RequestBuilder,
    credential: &Credential,
    timeout: Duration,
) -> RequestBuilder {
    let body = LoginRequest {
        account: credential.account(),
        password: credential.password().expose_secret(),
        role: Some(credential.role()),
    };
    builder.json(&body).timeout(timeout)
}

/// Attach the session's bearer token and a timeout.
pub fn authorized(
    builder: RequestBuilder,
    session: &UserSession,
    timeout: Duration,
) -> RequestBuilder {
    builder
        .bearer_auth(session.token().expose_secret())
        .timeout(timeout)
}

/// Finish an order-creation request.
pub fn create_order(
    builder: RequestBuilder,
    session: &UserSession,
    order: &OrderPayload,
    timeout: Duration,
) -> RequestBuilder {
    authorized(builder, session, timeout).json(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use secrecy::SecretString;
    use storeload_core::{CredentialTable, Role, SessionPlan};

    use super::*;

    fn sales_session() -> UserSession {
        let table = CredentialTable::builtin();
        let credential = table.for_role(Role::Sales).first().unwrap();
        SessionPlan::for_credential(credential).authenticated(SecretString::from("abc.def"))
    }

    #[test]
    fn test_login_body_and_timeout() {
        let table = CredentialTable::builtin();
        let credential = table.for_role(Role::CentralManager).first().unwrap();
        let request = login(
            reqwest::Client::new().post("http://localhost:4000/api/auth/login"),
            credential,
            Duration::from_secs(10),
        )
        .build()
        .unwrap();

        assert_eq!(request.timeout(), Some(&Duration::from_secs(10)));
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value =
            serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["account"], "central001");
        assert_eq!(body["password"], "123456");
        assert_eq!(body["role"], "centralManager");
    }

    #[test]
    fn test_authorized_sets_bearer() {
        let request = authorized(
            reqwest::Client::new().get("http://localhost:4000/api/inventory/STORE-EAST-01"),
            &sales_session(),
            Duration::from_secs(5),
        )
        .build()
        .unwrap();

        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc.def"
        );
        assert_eq!(request.timeout(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn test_create_order_sends_payload() {
        let mut rng = rand::rng();
        let order = OrderPayload::random(&mut rng);
        let request = create_order(
            reqwest::Client::new().post("http://localhost:4000/api/orders"),
            &sales_session(),
            &order,
            Duration::from_secs(10),
        )
        .build()
        .unwrap();

        let body: serde_json::Value =
            serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body, serde_json::to_value(&order).unwrap());
        assert!(request.headers().contains_key(AUTHORIZATION));
    }
}
