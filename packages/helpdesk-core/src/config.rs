//! Service configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Helpdesk service configuration.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Data directory holding the site snapshot
    pub data_dir: PathBuf,
    /// Lifetime of cached field catalogs in seconds
    pub cache_ttl_secs: u64,
    /// Page length used when a list request does not provide one
    pub default_page_length: usize,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Response timeout in milliseconds
    pub response_timeout_ms: u64,
    /// Maximum retry attempts for transient I/O errors
    pub persistence_max_retries: u32,
    /// Delay between retry attempts in milliseconds
    pub persistence_retry_delay_ms: u64,
}

impl DeskConfig {
    /// Cache TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            cache_ttl_secs: 3600,
            default_page_length: 20,
            request_timeout_ms: 5000,
            response_timeout_ms: 10000,
            persistence_max_retries: 3,
            persistence_retry_delay_ms: 100,
        }
    }
}
