//! storeload core - domain types and response rules.
//!
//! This crate holds everything the load test knows about the inventory/order
//! backend that does not involve I/O:
//! - [`types`] - newtype IDs, roles, credentials, prices, phone numbers
//! - [`catalog`] - store and product catalogs and the credential table
//! - [`session`] - role draw, session planning and the authenticated session
//! - [`order`] - synthetic order payloads
//! - [`api`] - endpoint paths and request bodies
//! - [`probe`] - login and probe response classification
//!
//! # Architecture
//!
//! No HTTP client and no load generator live here. The `storeload` crate
//! drives requests and feeds status codes and bodies back into [`probe`], so
//! the rules can be unit tested without a server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod order;
pub mod probe;
pub mod session;
pub mod types;

pub use catalog::{CredentialTable, CredentialTableError};
pub use order::OrderPayload;
pub use probe::{FailureCategory, LoginError, ProbeFailure};
pub use session::{RoleWeights, SessionPlan, UserSession};
pub use types::*;
