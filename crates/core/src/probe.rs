//! Response rules for login and the three probes.
//!
//! Everything here works on a status code and the raw body text, so the same
//! rules apply whether the response came through the load generator or a
//! plain HTTP client.

use serde_json::Value;
use thiserror::Error;

use crate::types::{OrderId, StoreId};

/// Characters of a response body kept in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Field every inventory record carries.
const LOCATION_FIELD: &str = "locationId";

/// Why a login did not produce a token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    /// The backend answered with something other than 200.
    #[error("login returned status {status}: {}", preview(.body))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The body was not JSON.
    #[error("login response is not JSON ({error}): {}", preview(.body))]
    Parse {
        /// Parser message.
        error: String,
        /// Response body.
        body: String,
    },

    /// The JSON had no token at `data.token` or `token`.
    #[error("no token in login response: {}", preview(.body))]
    MissingToken {
        /// Response body.
        body: String,
    },
}

/// Failure classes reported for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// 403 on a salesperson inventory lookup.
    Permission,
    /// 2xx whose body is missing the expected fields.
    Validation,
    /// 400 duplicate order, an expected outcome under load.
    BenignConflict,
    /// Any other unexpected status.
    Generic,
}

impl FailureCategory {
    /// Short label used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Permission => "permission",
            Self::Validation => "validation",
            Self::BenignConflict => "benign_conflict",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a probe was marked failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The salesperson was refused access to the store.
    #[error("permission denied for store {location}")]
    PermissionDenied {
        /// Store that was queried.
        location: StoreId,
    },

    /// The body parsed but lacks the expected shape.
    #[error("{reason}: {}", preview(.body))]
    Validation {
        /// What was missing.
        reason: &'static str,
        /// Response body.
        body: String,
    },

    /// The body was not JSON.
    #[error("response is not JSON ({error}): {}", preview(.body))]
    Parse {
        /// Parser message.
        error: String,
        /// Response body.
        body: String,
    },

    /// The backend rejected the order as a duplicate.
    #[error("duplicate order rejected (expected under load)")]
    DuplicateOrder,

    /// Any other status.
    #[error("unexpected status {status}: {}", preview(.body))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

impl ProbeFailure {
    /// Category for reporting.
    #[must_use]
    pub const fn category(&self) -> FailureCategory {
        match self {
            Self::PermissionDenied { .. } => FailureCategory::Permission,
            Self::Validation { .. } | Self::Parse { .. } => FailureCategory::Validation,
            Self::DuplicateOrder => FailureCategory::BenignConflict,
            Self::Status { .. } => FailureCategory::Generic,
        }
    }

    /// Whether the failure is an expected business outcome rather than a
    /// defect.
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::DuplicateOrder)
    }
}

/// Result of a successful inventory probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySnapshot {
    /// Number of inventory records returned.
    pub records: usize,
}

/// Extract the bearer token from a login response.
///
/// # Errors
///
/// Returns [`LoginError::Status`] for a non-200 status,
/// [`LoginError::Parse`] for a non-JSON body, and
/// [`LoginError::MissingToken`] when neither `data.token` nor `token` is a
/// non-empty string.
pub fn extract_token(status: u16, body: &str) -> Result<String, LoginError> {
    if status != 200 {
        return Err(LoginError::Status {
            status,
            body: body.to_owned(),
        });
    }

    let json: Value = serde_json::from_str(body).map_err(|e| LoginError::Parse {
        error: e.to_string(),
        body: body.to_owned(),
    })?;

    json.get("data")
        .and_then(|data| non_empty_str(data.get("token")))
        .or_else(|| non_empty_str(json.get("token")))
        .map(str::to_owned)
        .ok_or_else(|| LoginError::MissingToken {
            body: body.to_owned(),
        })
}

/// Check a salesperson's inventory response for `location`.
///
/// Success is a 200 carrying either a list whose first record has
/// `locationId` or a single record with `locationId`. A 403 is reported as
/// [`ProbeFailure::PermissionDenied`].
///
/// # Errors
///
/// Returns the [`ProbeFailure`] describing why the probe failed.
pub fn check_sales_inventory(
    status: u16,
    body: &str,
    location: &StoreId,
) -> Result<InventorySnapshot, ProbeFailure> {
    match status {
        200 => match parse_body(body)? {
            Value::Array(records) => {
                if records.first().is_some_and(has_location) {
                    Ok(InventorySnapshot {
                        records: records.len(),
                    })
                } else {
                    Err(ProbeFailure::Validation {
                        reason: "inventory list is empty or lacks locationId",
                        body: body.to_owned(),
                    })
                }
            }
            record if has_location(&record) => Ok(InventorySnapshot { records: 1 }),
            _ => Err(ProbeFailure::Validation {
                reason: "inventory record has no locationId",
                body: body.to_owned(),
            }),
        },
        403 => Err(ProbeFailure::PermissionDenied {
            location: location.clone(),
        }),
        _ => Err(ProbeFailure::Status {
            status,
            body: body.to_owned(),
        }),
    }
}

/// Check a central manager's inventory response.
///
/// Laxer than the salesperson rule: any non-empty list passes, as does a
/// single record with `locationId`. There is no separate 403 branch.
///
/// # Errors
///
/// Returns the [`ProbeFailure`] describing why the probe failed.
pub fn check_manager_inventory(status: u16, body: &str) -> Result<InventorySnapshot, ProbeFailure> {
    if status != 200 {
        return Err(ProbeFailure::Status {
            status,
            body: body.to_owned(),
        });
    }

    match parse_body(body)? {
        Value::Array(records) if !records.is_empty() => Ok(InventorySnapshot {
            records: records.len(),
        }),
        record if has_location(&record) => Ok(InventorySnapshot { records: 1 }),
        _ => Err(ProbeFailure::Validation {
            reason: "manager inventory response has an unexpected shape",
            body: body.to_owned(),
        }),
    }
}

/// Check an order-creation response and return the new order's id.
///
/// The id is read from `orderId`, then `id`, then `data.orderId`. A 400 whose
/// body mentions "duplicate" (any case) is [`ProbeFailure::DuplicateOrder`].
///
/// # Errors
///
/// Returns the [`ProbeFailure`] describing why the probe failed.
pub fn check_order_created(status: u16, body: &str) -> Result<OrderId, ProbeFailure> {
    match status {
        200 | 201 => {
            let json = parse_body(body)?;
            json_id(json.get("orderId"))
                .or_else(|| json_id(json.get("id")))
                .or_else(|| json.get("data").and_then(|data| json_id(data.get("orderId"))))
                .map(OrderId::from)
                .ok_or_else(|| ProbeFailure::Validation {
                    reason: "order response has no orderId/id field",
                    body: body.to_owned(),
                })
        }
        400 if body.to_lowercase().contains("duplicate") => Err(ProbeFailure::DuplicateOrder),
        _ => Err(ProbeFailure::Status {
            status,
            body: body.to_owned(),
        }),
    }
}

fn parse_body(body: &str) -> Result<Value, ProbeFailure> {
    serde_json::from_str(body).map_err(|e| ProbeFailure::Parse {
        error: e.to_string(),
        body: body.to_owned(),
    })
}

fn has_location(value: &Value) -> bool {
    value.get(LOCATION_FIELD).is_some()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Order ids come back as strings or numbers depending on the backend build.
fn json_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_i64() != Some(0) => Some(n.to_string()),
        _ => None,
    }
}

/// Leading characters of a body, for messages.
fn preview(body: &str) -> &str {
    body.char_indices()
        .nth(BODY_PREVIEW_CHARS)
        .map_or(body, |(idx, _)| body.get(..idx).unwrap_or(body))
}
