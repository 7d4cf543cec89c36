//! Fetch configuration with sensible defaults.
//!
//! [`FetchConfig`] controls timeouts, the extracted-text budget and the
//! minimum block length used to drop boilerplate. The defaults bound the
//! prompt size handed to downstream summarisation.

use crate::error::FetchError;
use serde::{Deserialize, Serialize};

/// Configuration for page fetching and text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum wait in seconds for any single read from the connection.
    pub read_timeout_secs: u64,
    /// Maximum number of characters of extracted body text.
    pub max_body_chars: usize,
    /// Extracted blocks shorter than this many characters are discarded.
    pub min_block_chars: usize,
    /// `Accept-Language` header sent with every identity.
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            read_timeout_secs: 8,
            max_body_chars: 5000,
            min_block_chars: 40,
            accept_language: "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".to_owned(),
        }
    }
}

impl FetchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - both timeouts must be greater than 0
    /// - `max_body_chars` must be greater than 0
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.connect_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err(FetchError::Client(
                "fetch timeouts must be greater than 0".into(),
            ));
        }
        if self.max_body_chars == 0 {
            return Err(FetchError::Client(
                "max_body_chars must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
