//! storeload - role-based load test for the inventory/order API.
//!
//! - [`scenario`] - the goose `MixedUser` scenario
//! - [`backend`] - plain reqwest client used by the preflight check
//! - [`preflight`] - account and store binding check
//! - [`requests`] - request shaping shared by goose and the plain client
//! - [`config`] - environment configuration
//! - [`telemetry`] - tracing setup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod preflight;
pub mod requests;
pub mod scenario;
pub mod telemetry;

pub use backend::{BackendClient, BackendError};
pub use config::{ConfigError, LoadConfig, ThinkTime, Timeouts};
