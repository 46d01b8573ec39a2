//! Tracing setup shared by both binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "storeload=info,goose=info";

/// Initialize tracing with `EnvFilter` and a fmt layer.
///
/// Defaults to [`DEFAULT_FILTER`] if `RUST_LOG` is not set. Set
/// `STORELOAD_LOG_FORMAT=json` for one JSON object per event. Records from
/// the `log` facade (used by goose) are forwarded into tracing.
pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let is_json =
        std::env::var("STORELOAD_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    // A global subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init();
}
