//! Error types for the kenning-fetch crate.
//!
//! Messages are stable and safe to show to users. Response bodies never
//! appear in error text; only status lines and transport descriptions do.

/// Errors that can occur while fetching a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The caller supplied nothing usable (empty or whitespace-only URL).
    #[error("empty input: a URL is required")]
    EmptyInput,

    /// The normalised URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Every attempt in the attempt plan failed. Carries the last failure seen.
    #[error("page unreachable: {0}")]
    Unreachable(String),

    /// The HTTP client itself could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Whether the failure is the caller's fault rather than the origin's.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::InvalidUrl(_))
    }
}

/// Convenience type alias for kenning-fetch results.
pub type Result<T> = std::result::Result<T, FetchError>;
