//! The `MixedUser` goose scenario.
//!
//! Each goose user draws a role when it starts, logs in with one of that
//! role's accounts and keeps the resulting [`UserSession`] as goose session
//! data. Three weighted transactions then run for the rest of the test; each
//! one checks the session role first and does nothing for the other role.
//!
//! | transaction | weight | role |
//! |---|---|---|
//! | `sales_query_inventory` | 7 | sales |
//! | `sales_create_order` | 4 | sales |
//! | `manager_query_inventory` | 3 | central manager |
//!
//! If login fails no session data is stored, and the next transaction that
//! runs for that user starts a fresh session instead.
//!
//! # Failures in goose metrics
//!
//! goose marks every non-2xx response failed as `"<status>: <name>"` before
//! the response is classified, so a 403 on `[Mixed-Sales]` inventory or a 400
//! on orders shows up under that status. A 2xx response that fails its check
//! is tagged with its category (`validation`) or `login: <account>`. The
//! category of every failure is the `category` field of its log event.

use std::sync::Arc;

use goose::metrics::GooseRequestMetric;
use goose::prelude::*;
use reqwest::header::HeaderMap;
use secrecy::SecretString;
use storeload_core::api::{LOGIN_PATH, ORDERS_PATH, inventory_path};
use storeload_core::probe;
use storeload_core::{OrderPayload, ProbeFailure, Role, SessionPlan, StoreId, UserSession};
use tracing::{debug, error, info, warn};

use crate::config::LoadConfig;
use crate::requests;

/// Scenario name shown in goose metrics.
pub const SCENARIO_NAME: &str = "MixedUser";

/// Metric name for the login request.
pub const LOGIN_NAME: &str = "/api/auth/login";
/// Metric name for salesperson inventory queries.
pub const SALES_INVENTORY_NAME: &str = "/api/inventory/:locationId [Mixed-Sales]";
/// Metric name for manager inventory queries.
pub const MANAGER_INVENTORY_NAME: &str = "/api/inventory/:locationId [Mixed-Manager]";
/// Metric name for order creation.
pub const ORDER_NAME: &str = "/api/orders [Mixed-Sales]";

const SALES_INVENTORY_WEIGHT: usize = 7;
const ORDER_WEIGHT: usize = 4;
const MANAGER_INVENTORY_WEIGHT: usize = 3;

/// Wrap an `async fn(&mut GooseUser, &LoadConfig)` as a goose transaction.
macro_rules! with_config {
    ($config:expr, $func:ident) => {{
        let config = Arc::clone($config);
        let closure: TransactionFunction = Arc::new(move |user| {
            let config = Arc::clone(&config);
            Box::pin(async move { $func(user, &config).await })
        });
        Transaction::new(closure).set_name(stringify!($func))
    }};
}

/// Build the `MixedUser` scenario.
///
/// # Errors
///
/// Returns `GooseError` if the think time or a weight is rejected by goose.
pub fn mixed_user(config: &Arc<LoadConfig>) -> Result<Scenario, GooseError> {
    Ok(scenario!(SCENARIO_NAME)
        .set_wait_time(config.think_time.min, config.think_time.max)?
        .register_transaction(with_config!(config, start_session).set_on_start())
        .register_transaction(
            with_config!(config, sales_query_inventory).set_weight(SALES_INVENTORY_WEIGHT)?,
        )
        .register_transaction(with_config!(config, sales_create_order).set_weight(ORDER_WEIGHT)?)
        .register_transaction(
            with_config!(config, manager_query_inventory).set_weight(MANAGER_INVENTORY_WEIGHT)?,
        ))
}

// =============================================================================
// Transactions
// =============================================================================

/// Draw a role and account, log in and store the session.
async fn start_session(user: &mut GooseUser, config: &LoadConfig) -> TransactionResult {
    let plan = {
        let mut rng = rand::rng();
        SessionPlan::draw(&config.credentials, config.role_weights, &mut rng)
    };
    let plan = match plan {
        Ok(plan) => plan,
        Err(e) => {
            error!(error = %e, "Cannot plan session");
            return Ok(());
        }
    };
    let credential = plan.credential();
    info!(
        account = credential.account(),
        role = %plan.role(),
        stores = ?credential.stores(),
        "Starting session"
    );

    let builder = requests::login(
        user.get_request_builder(&GooseMethod::Post, LOGIN_PATH)?,
        credential,
        config.timeouts.login,
    );
    let request = GooseRequest::builder()
        .method(GooseMethod::Post)
        .path(LOGIN_PATH)
        .name(LOGIN_NAME)
        .set_request_builder(builder)
        .build();
    let mut exchange = send(user, request).await?;

    match probe::extract_token(exchange.status, &exchange.body) {
        Ok(token) => {
            let session = plan.authenticated(SecretString::from(token));
            info!(
                account = session.account(),
                role = %session.role(),
                token = session.token_preview(),
                "Login succeeded"
            );
            user.set_session_data(session);
            user.set_success(&mut exchange.metric)
        }
        Err(e) => {
            error!(
                account = credential.account(),
                role = %plan.role(),
                status = exchange.status,
                error = %e,
                "Login failed, session aborted"
            );
            user.set_failure(
                &format!("login: {}", credential.account()),
                &mut exchange.metric,
                Some(&exchange.headers),
                Some(&exchange.body),
            )
        }
    }
}

/// Query the salesperson's own store.
async fn sales_query_inventory(user: &mut GooseUser, config: &LoadConfig) -> TransactionResult {
    let Some(session) = active_session(user, config).await? else {
        return Ok(());
    };
    if session.role() != Role::Sales {
        return Ok(());
    }

    let location = {
        let mut rng = rand::rng();
        session.pick_store(&mut rng).cloned()
    };
    let Some(location) = location else {
        warn!(
            account = session.account(),
            "Salesperson has no accessible store, skipping inventory query"
        );
        return Ok(());
    };

    let mut exchange =
        inventory_request(user, config, &session, &location, SALES_INVENTORY_NAME).await?;
    match probe::check_sales_inventory(exchange.status, &exchange.body, &location) {
        Ok(snapshot) => {
            debug!(
                account = session.account(),
                location_id = %location,
                records = snapshot.records,
                "Sales inventory query succeeded"
            );
            user.set_success(&mut exchange.metric)
        }
        Err(failure) => report_failure(user, &mut exchange, &session, Some(&location), &failure),
    }
}

/// Submit a random order as a salesperson.
async fn sales_create_order(user: &mut GooseUser, config: &LoadConfig) -> TransactionResult {
    let Some(session) = active_session(user, config).await? else {
        return Ok(());
    };
    if session.role() != Role::Sales {
        return Ok(());
    }

    let order = {
        let mut rng = rand::rng();
        OrderPayload::random(&mut rng)
    };
    debug!(
        account = session.account(),
        quantity = order.quantity(),
        "Creating order"
    );

    let builder = requests::create_order(
        user.get_request_builder(&GooseMethod::Post, ORDERS_PATH)?,
        &session,
        &order,
        config.timeouts.order,
    );
    let request = GooseRequest::builder()
        .method(GooseMethod::Post)
        .path(ORDERS_PATH)
        .name(ORDER_NAME)
        .set_request_builder(builder)
        .build();
    let mut exchange = send(user, request).await?;

    match probe::check_order_created(exchange.status, &exchange.body) {
        Ok(order_id) => {
            debug!(
                account = session.account(),
                order_id = %order_id,
                "Order created"
            );
            user.set_success(&mut exchange.metric)
        }
        Err(failure) => report_failure(user, &mut exchange, &session, None, &failure),
    }
}

/// Query a random catalog store as a central manager.
async fn manager_query_inventory(user: &mut GooseUser, config: &LoadConfig) -> TransactionResult {
    let Some(session) = active_session(user, config).await? else {
        return Ok(());
    };
    if session.role() != Role::CentralManager {
        return Ok(());
    }

    let location = {
        let mut rng = rand::rng();
        session.pick_store(&mut rng).cloned()
    };
    let Some(location) = location else {
        warn!(
            account = session.account(),
            "Manager has no accessible store, skipping inventory query"
        );
        return Ok(());
    };

    let mut exchange =
        inventory_request(user, config, &session, &location, MANAGER_INVENTORY_NAME).await?;
    match probe::check_manager_inventory(exchange.status, &exchange.body) {
        Ok(snapshot) => {
            debug!(
                account = session.account(),
                location_id = %location,
                records = snapshot.records,
                "Manager inventory query succeeded"
            );
            user.set_success(&mut exchange.metric)
        }
        Err(failure) => report_failure(user, &mut exchange, &session, Some(&location), &failure),
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// A completed request with its body read.
struct Exchange {
    metric: GooseRequestMetric,
    status: u16,
    headers: HeaderMap,
    body: String,
}

/// Send through goose and read the whole response.
///
/// Transport errors are already counted by goose as failed requests and are
/// returned as transaction errors.
async fn send(
    user: &mut GooseUser,
    request: GooseRequest<'_>,
) -> Result<Exchange, Box<TransactionError>> {
    let goose = user.request(request).await?;
    let response = goose.response?;
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.text().await?;
    Ok(Exchange {
        metric: goose.request,
        status,
        headers,
        body,
    })
}

/// The current session, starting a new one if the user has none.
///
/// Returns `None` when the new login did not produce a session.
async fn active_session(
    user: &mut GooseUser,
    config: &LoadConfig,
) -> Result<Option<UserSession>, Box<TransactionError>> {
    if let Some(session) = user.get_session_data::<UserSession>() {
        return Ok(Some(session.clone()));
    }
    debug!("No active session, starting a new one");
    start_session(user, config).await?;
    Ok(user.get_session_data::<UserSession>().cloned())
}

async fn inventory_request(
    user: &mut GooseUser,
    config: &LoadConfig,
    session: &UserSession,
    location: &StoreId,
    name: &str,
) -> Result<Exchange, Box<TransactionError>> {
    let path = inventory_path(location);
    let builder = requests::authorized(
        user.get_request_builder(&GooseMethod::Get, &path)?,
        session,
        config.timeouts.inventory,
    );
    let request = GooseRequest::builder()
        .method(GooseMethod::Get)
        .path(path.as_str())
        .name(name)
        .set_request_builder(builder)
        .build();
    send(user, request).await
}

/// Log a probe failure and mark the request failed in goose metrics.
///
/// Benign failures (duplicate orders) are still counted as failures but are
/// logged at warn level. The failure category is always in the log event.
/// It only becomes the goose error tag for 2xx responses: goose has already
/// recorded any other status as `"<status>: <name>"` and keeps that entry.
fn report_failure(
    user: &GooseUser,
    exchange: &mut Exchange,
    session: &UserSession,
    location: Option<&StoreId>,
    failure: &ProbeFailure,
) -> TransactionResult {
    let category = failure.category();
    let location_id = location.map(StoreId::as_str);
    if failure.is_benign() {
        warn!(
            account = session.account(),
            role = %session.role(),
            status = exchange.status,
            category = %category,
            "{failure}"
        );
    } else {
        error!(
            account = session.account(),
            role = %session.role(),
            location_id,
            status = exchange.status,
            category = %category,
            "{failure}"
        );
    }
    user.set_failure(
        category.as_str(),
        &mut exchange.metric,
        Some(&exchange.headers),
        Some(&exchange.body),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storeload_core::CredentialTable;

    use super::*;
    use crate::config::{ThinkTime, Timeouts};

    fn config() -> Arc<LoadConfig> {
        Arc::new(LoadConfig {
            host: url::Url::parse("http://localhost:4000").unwrap(),
            role_weights: storeload_core::RoleWeights::default(),
            think_time: ThinkTime::default(),
            timeouts: Timeouts::default(),
            credentials: CredentialTable::builtin(),
        })
    }

    #[test]
    fn test_mixed_user_registers_transactions() {
        let scenario = mixed_user(&config()).unwrap();
        assert_eq!(scenario.name, SCENARIO_NAME);
        assert_eq!(scenario.transactions.len(), 4);

        let names: Vec<&str> = scenario
            .transactions
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "start_session",
                "sales_query_inventory",
                "sales_create_order",
                "manager_query_inventory"
            ]
        );
        assert!(scenario.transactions[0].on_start);
        assert_eq!(scenario.transactions[1].weight, SALES_INVENTORY_WEIGHT);
        assert_eq!(scenario.transactions[2].weight, ORDER_WEIGHT);
        assert_eq!(scenario.transactions[3].weight, MANAGER_INVENTORY_WEIGHT);
    }

    #[test]
    fn test_metric_names() {
        assert!(SALES_INVENTORY_NAME.ends_with("[Mixed-Sales]"));
        assert!(MANAGER_INVENTORY_NAME.ends_with("[Mixed-Manager]"));
        assert_eq!(ORDER_NAME, "/api/orders [Mixed-Sales]");
    }
}
