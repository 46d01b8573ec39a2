//! Per-user session state.
//!
//! A simulated user goes through two steps: a [`SessionPlan`] is drawn
//! (role and account) before logging in, and a [`UserSession`] is built from
//! the plan once the backend hands back a token. The session is never
//! mutated afterwards; every task reads it.

use rand::Rng;
use rand::seq::IndexedRandom;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::catalog::{CredentialTable, CredentialTableError};
use crate::types::{Credential, Role, StoreId};

/// Characters of the token shown in logs.
const TOKEN_PREVIEW_CHARS: usize = 20;

/// Invalid role weights.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("role weights must not both be zero")]
pub struct ZeroWeightsError;

/// Relative odds of a new user being a salesperson or a central manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleWeights {
    sales: u32,
    central_manager: u32,
}

impl RoleWeights {
    /// Create weights.
    ///
    /// # Errors
    ///
    /// Returns [`ZeroWeightsError`] if both weights are zero.
    pub const fn new(sales: u32, central_manager: u32) -> Result<Self, ZeroWeightsError> {
        if sales == 0 && central_manager == 0 {
            return Err(ZeroWeightsError);
        }
        Ok(Self {
            sales,
            central_manager,
        })
    }

    /// Weight of the sales role.
    #[must_use]
    pub const fn sales(&self) -> u32 {
        self.sales
    }

    /// Weight of the central-manager role.
    #[must_use]
    pub const fn central_manager(&self) -> u32 {
        self.central_manager
    }

    /// Draw a role.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Role {
        let total = u64::from(self.sales) + u64::from(self.central_manager);
        if rng.random_range(0..total) < u64::from(self.sales) {
            Role::Sales
        } else {
            Role::CentralManager
        }
    }
}

impl Default for RoleWeights {
    /// 70 % salespeople, 30 % central managers.
    fn default() -> Self {
        Self {
            sales: 7,
            central_manager: 3,
        }
    }
}

/// Role and account chosen for a user that has not logged in yet.
#[derive(Debug, Clone, Copy)]
pub struct SessionPlan<'a> {
    credential: &'a Credential,
}

impl<'a> SessionPlan<'a> {
    /// Draw a role by `weights`, then an account of that role uniformly.
    ///
    /// # Errors
    ///
    /// Returns an error if the table has no account for the drawn role.
    pub fn draw<R: Rng + ?Sized>(
        table: &'a CredentialTable,
        weights: RoleWeights,
        rng: &mut R,
    ) -> Result<Self, CredentialTableError> {
        let role = weights.draw(rng);
        let credential = table.pick(role, rng)?;
        Ok(Self { credential })
    }

    /// Plan a session for a specific account.
    #[must_use]
    pub const fn for_credential(credential: &'a Credential) -> Self {
        Self { credential }
    }

    /// Role of the planned session.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.credential.role()
    }

    /// Account to log in with.
    #[must_use]
    pub const fn credential(&self) -> &'a Credential {
        self.credential
    }

    /// Turn the plan into a session once login returned `token`.
    #[must_use]
    pub fn authenticated(self, token: SecretString) -> UserSession {
        UserSession {
            role: self.credential.role(),
            account: self.credential.account().to_owned(),
            token,
            stores: self.credential.stores().to_vec(),
        }
    }
}

/// An authenticated simulated user.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct UserSession {
    role: Role,
    account: String,
    token: SecretString,
    stores: Vec<StoreId>,
}

impl UserSession {
    /// Role the user logged in as.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Account the user logged in as.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Bearer token returned by login.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Leading characters of the token, safe to log.
    #[must_use]
    pub fn token_preview(&self) -> &str {
        token_preview(self.token.expose_secret())
    }

    /// Stores this user may query.
    #[must_use]
    pub fn stores(&self) -> &[StoreId] {
        &self.stores
    }

    /// Pick one of the accessible stores uniformly, or `None` if the list is
    /// empty.
    pub fn pick_store<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&StoreId> {
        self.stores.choose(rng)
    }
}

impl std::fmt::Debug for UserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSession")
            .field("role", &self.role)
            .field("account", &self.account)
            .field("token", &"[REDACTED]")
            .field("stores", &self.stores)
            .finish()
    }
}

/// First 20 characters of `token`, cut on a character boundary.
#[must_use]
pub fn token_preview(token: &str) -> &str {
    token
        .char_indices()
        .nth(TOKEN_PREVIEW_CHARS)
        .map_or(token, |(idx, _)| token.get(..idx).unwrap_or(token))
}
