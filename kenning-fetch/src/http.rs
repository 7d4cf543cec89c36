//! Shared HTTP client and the browser identities used for page requests.
//!
//! Provides a configured [`reqwest::Client`] plus two fixed header sets.
//! Some origins reject the primary identity but accept the alternate one,
//! so the fetcher rotates between them instead of picking at random.

use crate::config::FetchConfig;
use crate::error::FetchError;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, REFERER, USER_AGENT,
};
use std::time::Duration;

/// User-Agent of the primary identity (desktop Chrome on macOS).
pub const PRIMARY_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0 Safari/537.36";

/// User-Agent of the alternate identity (desktop Firefox on Windows).
pub const ALTERNATE_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Referer hint sent only by the alternate identity.
pub const ALTERNATE_REFERER: &str = "https://www.google.com/";

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// A network identity: the header set presented to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Default browser headers.
    Primary,
    /// Different browser with a search-engine referer.
    Alternate,
}

impl Identity {
    /// Returns the short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Alternate => "alternate",
        }
    }

    /// Returns the User-Agent string for this identity.
    pub fn user_agent(&self) -> &'static str {
        match self {
            Self::Primary => PRIMARY_USER_AGENT,
            Self::Alternate => ALTERNATE_USER_AGENT,
        }
    }

    /// Returns the referer hint, if this identity sends one.
    pub fn referer(&self) -> Option<&'static str> {
        match self {
            Self::Primary => None,
            Self::Alternate => Some(ALTERNATE_REFERER),
        }
    }

    /// Build the full header set for a request made under this identity.
    pub fn headers(&self, accept_language: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent()));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        if let Ok(value) = HeaderValue::from_str(accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        if let Some(referer) = self.referer() {
            headers.insert(REFERER, HeaderValue::from_static(referer));
        }
        headers
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a [`reqwest::Client`] configured for page downloads.
///
/// The client has:
/// - Cookie store enabled (consent redirects set cookies)
/// - Connect timeout and socket read timeout from config
/// - At most 10 redirects
/// - Brotli and gzip decompression
///
/// Identity headers are attached per request, not here.
///
/// # Errors
///
/// Returns [`FetchError::Client`] if the client cannot be constructed.
pub fn build_client(config: &FetchConfig) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .read_timeout(Duration::from_secs(config.read_timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| FetchError::Client(format!("failed to build HTTP client: {e}")))
}
