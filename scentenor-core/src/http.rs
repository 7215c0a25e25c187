//! Shared HTTP client utilities
//!
//! This module provides a shared, lazily-initialized HTTP client for all API calls.
//! Using a single client allows connection pooling and avoids resource duplication.

use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;

/// Timeout for weather lookups in seconds (a quick JSON GET)
const WEATHER_TIMEOUT_SECS: u64 = 10;

/// Timeout for completion requests in seconds (the model can take a while)
const COMPLETION_TIMEOUT_SECS: u64 = 60;

/// Global HTTP client for weather lookups (10s timeout)
static WEATHER_CLIENT: OnceLock<Client> = OnceLock::new();

/// Global HTTP client for completion requests (60s timeout)
static COMPLETION_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client for weather lookups
///
/// The short timeout keeps a slow weather service from hanging the
/// interaction; on timeout the caller substitutes the fallback reading.
pub fn weather_client() -> &'static Client {
    WEATHER_CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent("scentenor/1.0")
            .timeout(Duration::from_secs(WEATHER_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client - this should never fail")
    })
}

/// Get or create the shared HTTP client for completion requests
///
/// Chat completions routinely take tens of seconds for long inventories,
/// so this client gets a much longer timeout than the weather one.
pub fn completion_client() -> &'static Client {
    COMPLETION_CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent("scentenor/1.0")
            .timeout(Duration::from_secs(COMPLETION_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client - this should never fail")
    })
}
