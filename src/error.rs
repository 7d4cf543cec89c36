//! Error types for the resolution pipeline.
//!
//! Only failures that leave a request with nothing to return surface here.
//! Summarisation and encyclopedia failures are absorbed into lower fallback
//! tiers and reported through `FallbackMeta` instead.

use kenning_fetch::FetchError;

/// How the presentation layer should report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller supplied unusable input.
    BadRequest,
    /// A required upstream (the page origin) could not be reached.
    UpstreamUnavailable,
    /// Anything else.
    Internal,
}

impl ErrorClass {
    /// Stable lowercase name used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::Internal => "internal",
        }
    }
}

/// Top-level error type for kenning.
#[derive(Debug, thiserror::Error)]
pub enum KenningError {
    /// The caller gave nothing usable (blank URL, no keywords left after sanitising).
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The page could not be loaded.
    #[error("could not load page: {0}")]
    Fetch(#[from] FetchError),

    /// The page loaded but contained no extractable text.
    #[error("no extractable content: {0}")]
    EmptyContent(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KenningError {
    /// Map this error onto the boundary classification.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyInput(_) => ErrorClass::BadRequest,
            Self::Fetch(e) if e.is_input_error() => ErrorClass::BadRequest,
            Self::Fetch(FetchError::Unreachable(_)) => ErrorClass::UpstreamUnavailable,
            _ => ErrorClass::Internal,
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, KenningError>;
