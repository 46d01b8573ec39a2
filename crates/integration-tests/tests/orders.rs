//! Order creation against the mock backend.

#![allow(clippy::unwrap_used)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use storeload_core::api::ORDERS_PATH;
use storeload_core::{CredentialTable, FailureCategory, OrderPayload, Role};
use storeload_integration_tests::{MockBackend, Reply, session_for};

fn order() -> OrderPayload {
    let mut rng = StdRng::seed_from_u64(7);
    OrderPayload::random(&mut rng)
}

#[tokio::test]
async fn test_created_order_returns_id() {
    let mock = MockBackend::builder().start().await.unwrap();
    let table = CredentialTable::builtin();
    let session = session_for(table.for_role(Role::Sales).first().unwrap(), "s");

    let id = mock
        .client()
        .unwrap()
        .create_order(&session, &order())
        .await
        .unwrap();
    assert_eq!(id.as_str(), "ORD-0001");
}

#[tokio::test]
async fn test_numeric_id_under_data() {
    let mock = MockBackend::builder()
        .orders(|_| Reply::json(200, &json!({ "data": { "orderId": 4711 } })))
        .start()
        .await
        .unwrap();
    let table = CredentialTable::builtin();
    let session = session_for(table.for_role(Role::Sales).first().unwrap(), "s");

    let id = mock
        .client()
        .unwrap()
        .create_order(&session, &order())
        .await
        .unwrap();
    assert_eq!(id.as_str(), "4711");
}

#[tokio::test]
async fn test_order_payload_on_the_wire() {
    let mock = MockBackend::builder().start().await.unwrap();
    let table = CredentialTable::builtin();
    let session = session_for(table.for_role(Role::Sales).first().unwrap(), "s");
    let order = order();

    mock.client()
        .unwrap()
        .create_order(&session, &order)
        .await
        .unwrap();

    let requests = mock.requests_to(ORDERS_PATH);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer s"));
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body, &serde_json::to_value(&order).unwrap());
    let expected_total = f64::from(99 * order.quantity());
    assert!((body["totalAmount"].as_f64().unwrap() - expected_total).abs() < f64::EPSILON);
    assert!((body["items"][0]["price"].as_f64().unwrap() - 99.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_duplicate_order_is_benign() {
    let mock = MockBackend::builder()
        .orders(|_| Reply::json(400, &json!({ "message": "Duplicate order detected" })))
        .start()
        .await
        .unwrap();
    let table = CredentialTable::builtin();
    let session = session_for(table.for_role(Role::Sales).first().unwrap(), "s");

    let err = mock
        .client()
        .unwrap()
        .create_order(&session, &order())
        .await
        .unwrap_err();
    let failure = err.as_probe().unwrap();
    assert!(failure.is_benign());
    assert_eq!(failure.category(), FailureCategory::BenignConflict);
}

#[tokio::test]
async fn test_other_bad_request_is_generic() {
    let mock = MockBackend::builder()
        .orders(|_| Reply::json(400, &json!({ "message": "insufficient stock" })))
        .start()
        .await
        .unwrap();
    let table = CredentialTable::builtin();
    let session = session_for(table.for_role(Role::Sales).first().unwrap(), "s");

    let err = mock
        .client()
        .unwrap()
        .create_order(&session, &order())
        .await
        .unwrap_err();
    let failure = err.as_probe().unwrap();
    assert!(!failure.is_benign());
    assert_eq!(failure.category(), FailureCategory::Generic);
}

#[tokio::test]
async fn test_created_without_id_is_validation_failure() {
    let mock = MockBackend::builder()
        .orders(|_| Reply::json(201, &json!({ "status": "ok" })))
        .start()
        .await
        .unwrap();
    let table = CredentialTable::builtin();
    let session = session_for(table.for_role(Role::Sales).first().unwrap(), "s");

    let err = mock
        .client()
        .unwrap()
        .create_order(&session, &order())
        .await
        .unwrap_err();
    assert_eq!(
        err.as_probe().unwrap().category(),
        FailureCategory::Validation
    );
}
