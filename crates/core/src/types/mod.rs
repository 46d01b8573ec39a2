//! Core types for storeload.
//!
//! This module provides type-safe wrappers for the backend's domain concepts.

pub mod credential;
pub mod id;
pub mod phone;
pub mod price;
pub mod role;

pub use credential::Credential;
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::Price;
pub use role::Role;
