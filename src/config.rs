//! Connection wide settings for gas estimation and receipt polling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gas added on top of estimates for contract deployments and contract
/// function transactions.
pub const DEFAULT_GAS_BUFFER: u64 = 100_000;

/// Gas limit used for a contract function transaction when gas estimation
/// fails.
pub const DEFAULT_FALLBACK_GAS_LIMIT: u64 = 3_000_000;

/// Default delay between `eth_getTransactionReceipt` polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Default time to wait for a transaction receipt.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

/// Settings shared by all accounts and contracts created from a
/// [`Connection`](crate::Connection).
///
/// Every field is optional when deserializing and falls back to its default.
///
/// ```
/// # use cheb3::ConnectionConfig;
/// let config = ConnectionConfig::from_json_str(r#"{ "gas_buffer": 50000 }"#).unwrap();
/// assert_eq!(config.gas_buffer, 50_000);
/// assert_eq!(config.fallback_gas_limit, 3_000_000);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Gas added to estimates for deployments and contract transactions.
    pub gas_buffer: u64,

    /// Gas limit for contract transactions whose gas estimation failed.
    pub fallback_gas_limit: u64,

    /// Delay between receipt polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum time to wait for a receipt in seconds.
    pub receipt_timeout_secs: u64,
}

impl ConnectionConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The delay between receipt polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The maximum time to wait for a receipt.
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    /// Set the gas buffer.
    #[inline]
    pub fn gas_buffer(mut self, gas_buffer: u64) -> Self {
        self.gas_buffer = gas_buffer;
        self
    }

    /// Set the fallback gas limit.
    #[inline]
    pub fn fallback_gas_limit(mut self, fallback_gas_limit: u64) -> Self {
        self.fallback_gas_limit = fallback_gas_limit;
        self
    }

    /// Set the receipt poll interval, truncated to whole milliseconds and
    /// saturating at `u64::MAX` milliseconds.
    #[inline]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(poll_interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the receipt timeout, truncated to whole seconds.
    #[inline]
    pub fn with_receipt_timeout(mut self, receipt_timeout: Duration) -> Self {
        self.receipt_timeout_secs = receipt_timeout.as_secs();
        self
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            gas_buffer: DEFAULT_GAS_BUFFER,
            fallback_gas_limit: DEFAULT_FALLBACK_GAS_LIMIT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.gas_buffer, 100_000);
        assert_eq!(config.fallback_gas_limit, 3_000_000);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.receipt_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(
            ConnectionConfig::from_json_str("{}").unwrap(),
            ConnectionConfig::default()
        );
    }

    #[test]
    fn partial_json() {
        let config =
            ConnectionConfig::from_json_str(r#"{ "poll_interval_ms": 250, "receipt_timeout_secs": 5 }"#)
                .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.receipt_timeout(), Duration::from_secs(5));
        assert_eq!(config.gas_buffer, DEFAULT_GAS_BUFFER);
    }

    #[test]
    fn invalid_json() {
        assert!(ConnectionConfig::from_json_str(r#"{ "gas_buffer": "lots" }"#).is_err());
    }

    #[test]
    fn builder() {
        let config = ConnectionConfig::default()
            .gas_buffer(1)
            .fallback_gas_limit(2)
            .with_poll_interval(Duration::from_millis(3))
            .with_receipt_timeout(Duration::from_secs(4));
        assert_eq!(
            config,
            ConnectionConfig {
                gas_buffer: 1,
                fallback_gas_limit: 2,
                poll_interval_ms: 3,
                receipt_timeout_secs: 4,
            }
        );
    }

    #[test]
    fn huge_poll_interval_saturates() {
        let config = ConnectionConfig::default().with_poll_interval(Duration::MAX);
        assert_eq!(config.poll_interval_ms, u64::MAX);
        assert_eq!(config.poll_interval(), Duration::from_millis(u64::MAX));

        let config = ConnectionConfig::default()
            .with_poll_interval(Duration::from_millis(u64::MAX) + Duration::from_millis(1));
        assert_eq!(config.poll_interval_ms, u64::MAX);
    }
}
