//! Plain HTTP client for the inventory/order backend.
//!
//! Used by the preflight check and the integration tests. The load test
//! itself goes through goose, but both share [`crate::requests`] for request
//! shaping and `storeload_core::probe` for response rules.

use reqwest::{Client, Method};
use secrecy::SecretString;
use storeload_core::api::{LOGIN_PATH, ORDERS_PATH, inventory_path};
use storeload_core::probe::{self, InventorySnapshot};
use storeload_core::{
    Credential, LoginError, OrderId, OrderPayload, ProbeFailure, StoreId, UserSession,
};
use thiserror::Error;
use url::Url;

use crate::config::Timeouts;
use crate::requests;

/// Errors from a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, timeout or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Login response carried no usable token.
    #[error(transparent)]
    Login(#[from] LoginError),

    /// Probe response failed its check.
    #[error(transparent)]
    Probe(#[from] ProbeFailure),
}

impl BackendError {
    /// The probe failure, if this error is one.
    #[must_use]
    pub const fn as_probe(&self) -> Option<&ProbeFailure> {
        match self {
            Self::Probe(failure) => Some(failure),
            _ => None,
        }
    }
}

/// HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base: Url,
    timeouts: Timeouts,
}

impl BackendClient {
    /// Create a client for the backend at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base: Url, timeouts: Timeouts) -> Result<Self, BackendError> {
        let http = Client::builder()
            .user_agent(concat!("storeload/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base,
            timeouts,
        })
    }

    /// Backend base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, BackendError> {
        Ok(self.http.request(method, self.base.join(path)?))
    }

    /// Log in and return the bearer token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Login` if the response carries no token.
    pub async fn login(&self, credential: &Credential) -> Result<SecretString, BackendError> {
        let builder = requests::login(
            self.request(Method::POST, LOGIN_PATH)?,
            credential,
            self.timeouts.login,
        );
        let (status, body) = send(builder).await?;
        let token = probe::extract_token(status, &body)?;
        Ok(SecretString::from(token))
    }

    /// Query a store's inventory as a salesperson.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Probe` if the response fails the sales check.
    pub async fn sales_inventory(
        &self,
        session: &UserSession,
        location: &StoreId,
    ) -> Result<InventorySnapshot, BackendError> {
        let (status, body) = self.get_inventory(session, location).await?;
        Ok(probe::check_sales_inventory(status, &body, location)?)
    }

    /// Query a store's inventory as a central manager.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Probe` if the response fails the manager check.
    pub async fn manager_inventory(
        &self,
        session: &UserSession,
        location: &StoreId,
    ) -> Result<InventorySnapshot, BackendError> {
        let (status, body) = self.get_inventory(session, location).await?;
        Ok(probe::check_manager_inventory(status, &body)?)
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Probe` if the backend did not create the order,
    /// including the benign duplicate case.
    pub async fn create_order(
        &self,
        session: &UserSession,
        order: &OrderPayload,
    ) -> Result<OrderId, BackendError> {
        let builder = requests::create_order(
            self.request(Method::POST, ORDERS_PATH)?,
            session,
            order,
            self.timeouts.order,
        );
        let (status, body) = send(builder).await?;
        Ok(probe::check_order_created(status, &body)?)
    }

    async fn get_inventory(
        &self,
        session: &UserSession,
        location: &StoreId,
    ) -> Result<(u16, String), BackendError> {
        let builder = requests::authorized(
            self.request(Method::GET, &inventory_path(location))?,
            session,
            self.timeouts.inventory,
        );
        send(builder).await
    }
}

async fn send(builder: reqwest::RequestBuilder) -> Result<(u16, String), BackendError> {
    let response = builder.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}
