//! Summarisation gateway: the completion-style remote service.
//!
//! The gateway summarises fetched text and produces structured resource
//! lists. It has no retry or fallback policy of its own; every failure is
//! returned to the caller, which decides which lower tier to use.

pub mod chat;
pub mod resource_parse;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::GatewayConfig;

pub use chat::ChatCompletionsGateway;
pub use resource_parse::{ResourceParse, malformed_sentinel, parse_resource_array};

/// Errors returned by a summarisation gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The service answered with a non-2xx status.
    #[error("remote error {status}: {detail}")]
    Remote { status: u16, detail: String },

    /// The request never completed (connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response without a usable completion.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Human-readable reason recorded when this error triggers a fallback.
    pub fn fallback_reason(&self) -> String {
        match self {
            Self::Remote { status, detail } => {
                let reason = reqwest::StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|s| s.canonical_reason());
                match reason {
                    Some(reason) => format!("{status} {reason}: {detail}"),
                    None => format!("{status}: {detail}"),
                }
            }
            Self::Network(detail) => format!("summarization service network error: {detail}"),
            Self::Malformed(detail) => {
                format!("summarization service returned a malformed response: {detail}")
            }
        }
    }
}

/// A page summary with the sources the service cited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub citations: Vec<String>,
}

/// A completion-style summarisation service.
#[async_trait]
pub trait SummarizationGateway: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Summarise extracted page text.
    async fn summarize(&self, title: &str, body_text: &str) -> Result<Summary, GatewayError>;

    /// Ask for a ranked list of resources about `topic`.
    ///
    /// A response that cannot be parsed is not an error: it comes back as
    /// [`ResourceParse::Malformed`].
    async fn research_resources(&self, topic: &str) -> Result<ResourceParse, GatewayError>;
}

/// Whether the primary service can be called at all.
///
/// `Unavailable` is known before any request is made (for example, no API
/// key). Callers treat it exactly like a failed call.
#[derive(Clone)]
pub enum GatewayState {
    Available(Arc<dyn SummarizationGateway>),
    Unavailable { reason: String },
}

impl GatewayState {
    /// Build the configured chat-completions gateway, or record why not.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let Some(api_key) = config.resolve_api_key() else {
            return Self::Unavailable {
                reason: format!("API key not configured (set {})", config.api_key_env),
            };
        };
        match ChatCompletionsGateway::new(config, api_key) {
            Ok(gateway) => Self::Available(Arc::new(gateway)),
            Err(e) => Self::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    /// Wrap an already-built gateway.
    pub fn available(gateway: impl SummarizationGateway + 'static) -> Self {
        Self::Available(Arc::new(gateway))
    }

    /// Mark the service as unavailable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// The gateway, or the fallback reason to record when there is none.
    pub fn get(&self) -> Result<&dyn SummarizationGateway, String> {
        match self {
            Self::Available(gateway) => Ok(gateway.as_ref()),
            Self::Unavailable { reason } => {
                Err(format!("summarization service unavailable: {reason}"))
            }
        }
    }

    /// Fallback reason to record when the service is unavailable.
    pub fn unavailable_reason(&self) -> Option<String> {
        self.get().err()
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(gateway) => f
                .debug_tuple("Available")
                .field(&gateway.name())
                .finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}
