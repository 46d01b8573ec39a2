//! Integration tests for storeload.
//!
//! Tests run the real backend client, preflight check and goose scenario
//! against [`MockBackend`], an in-process axum server on `127.0.0.1:0` that
//! serves the three endpoints with configurable replies and records every
//! request.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storeload-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - login token extraction
//! - `inventory` - salesperson and manager inventory probes
//! - `orders` - order creation and duplicate handling
//! - `preflight` - account checks
//! - `scenario` - the goose scenario end to end

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;
use serde_json::{Value, json};
use storeload::{BackendClient, Timeouts};
use storeload_core::api::{INVENTORY_PATH_PREFIX, LOGIN_PATH, ORDERS_PATH};
use storeload_core::{Credential, SessionPlan, UserSession};
use url::Url;

/// A canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    /// JSON reply.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// Raw text reply.
    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Last segment of the path (the location id for inventory queries).
    #[must_use]
    pub fn last_segment(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

/// Decides the reply for one endpoint.
pub type Responder = Arc<dyn Fn(&RecordedRequest) -> Reply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    login: Responder,
    inventory: Responder,
    orders: Responder,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for [`MockBackend`].
///
/// Defaults: login answers `{"data":{"token":"token-<account>"}}` for
/// password `123456` and 401 otherwise, inventory answers one record for the
/// requested store, orders answer 201 with an `orderId`.
pub struct MockBackendBuilder {
    login: Responder,
    inventory: Responder,
    orders: Responder,
}

impl Default for MockBackendBuilder {
    fn default() -> Self {
        Self {
            login: Arc::new(default_login),
            inventory: Arc::new(default_inventory),
            orders: Arc::new(|_| Reply::json(201, &json!({ "orderId": "ORD-0001" }))),
        }
    }
}

impl MockBackendBuilder {
    /// Replace the login responder.
    #[must_use]
    pub fn login(mut self, f: impl Fn(&RecordedRequest) -> Reply + Send + Sync + 'static) -> Self {
        self.login = Arc::new(f);
        self
    }

    /// Replace the inventory responder.
    #[must_use]
    pub fn inventory(
        mut self,
        f: impl Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    ) -> Self {
        self.inventory = Arc::new(f);
        self
    }

    /// Replace the orders responder.
    #[must_use]
    pub fn orders(mut self, f: impl Fn(&RecordedRequest) -> Reply + Send + Sync + 'static) -> Self {
        self.orders = Arc::new(f);
        self
    }

    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind.
    pub async fn start(self) -> Result<MockBackend, Box<dyn std::error::Error>> {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            login: self.login,
            inventory: self.inventory,
            orders: self.orders,
            recorded: Arc::clone(&recorded),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(MockBackend {
            base: Url::parse(&format!("http://{addr}"))?,
            recorded,
        })
    }
}

/// A running mock backend.
pub struct MockBackend {
    base: Url,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    /// Builder with default responders.
    #[must_use]
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    /// Base URL of the running server.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Backend client pointed at this server with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn client(&self) -> Result<BackendClient, storeload::BackendError> {
        BackendClient::new(self.base.clone(), Timeouts::default())
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `path_prefix`.
    #[must_use]
    pub fn requests_to(&self, path_prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(path_prefix))
            .collect()
    }
}

/// Session for `credential` holding `token`, without a login round trip.
#[must_use]
pub fn session_for(credential: &Credential, token: &str) -> UserSession {
    SessionPlan::for_credential(credential).authenticated(SecretString::from(token.to_owned()))
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method,
        path: uri.path().to_owned(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).ok(),
    };
    state
        .recorded
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request.clone());

    let reply = if request.path == LOGIN_PATH {
        (state.login)(&request)
    } else if request.path == ORDERS_PATH {
        (state.orders)(&request)
    } else if request.path.starts_with(INVENTORY_PATH_PREFIX) {
        (state.inventory)(&request)
    } else {
        Reply::text(404, "not found")
    };

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
}

fn default_login(request: &RecordedRequest) -> Reply {
    let body = request.body.as_ref();
    let account = body.and_then(|b| b.get("account")).and_then(Value::as_str).unwrap_or_default();
    let password = body.and_then(|b| b.get("password")).and_then(Value::as_str).unwrap_or_default();
    if password == "123456" {
        Reply::json(200, &json!({ "data": { "token": format!("token-{account}") } }))
    } else {
        Reply::json(401, &json!({ "message": "invalid credentials" }))
    }
}

fn default_inventory(request: &RecordedRequest) -> Reply {
    Reply::json(
        200,
        &json!([{
            "locationId": request.last_segment(),
            "productId": "PROD-001",
            "quantity": 12
        }]),
    )
}
