//! Store configuration.
//!
//! Read from the environment by `StoreConfig::from_env`:
//! - `TASKS_API_URL`: base URL of the task API (default `http://localhost:8080`)
//! - `TASKS_LISTING_ORDER`: `last-completed` (default) or `last-issued`
//! - `TASKS_REQUEST_TIMEOUT_SECS`: per-request timeout, unset means none

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// How the store treats listing responses that arrive out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    /// Whichever listing response lands last replaces the collection, even
    /// when it was issued before a newer listing.
    #[default]
    LastCompleted,
    /// Every listing carries a generation number; a response whose
    /// generation has been superseded is dropped.
    LastIssued,
}

impl FromStr for ListingOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-completed" => Ok(ListingOrder::LastCompleted),
            "last-issued" => Ok(ListingOrder::LastIssued),
            _ => Err(ConfigError::Invalid {
                key: "TASKS_LISTING_ORDER",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub listing_order: ListingOrder,
    pub request_timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_order: ListingOrder::default(),
            request_timeout: None,
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_listing_order(mut self, listing_order: ListingOrder) -> Self {
        self.listing_order = listing_order;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("TASKS_API_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(order) = lookup("TASKS_LISTING_ORDER") {
            config.listing_order = order.parse()?;
        }
        if let Some(secs) = lookup("TASKS_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "TASKS_REQUEST_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
