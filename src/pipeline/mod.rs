//! The resolution pipeline: the top-level orchestrator.
//!
//! Each request drives one sequential chain of outbound calls through the
//! injected capabilities. The pipeline holds no per-request state, so one
//! instance can serve any number of requests.
//!
//! # Tiers
//!
//! | Flow      | Primary             | Fallback                          |
//! |-----------|---------------------|-----------------------------------|
//! | URL       | gateway summary     | local excerpt of the page         |
//! | Resources | gateway resource list | encyclopedia search, then curated list |
//!
//! Every fallback is reported through [`FallbackMeta`](crate::types::FallbackMeta).

mod resources;
mod url;

#[cfg(test)]
pub(crate) mod fakes;

use std::sync::Arc;

use kenning_fetch::PageFetcher;

use crate::config::{KenningConfig, MAX_RESOURCE_LIMIT};
use crate::encyclopedia::{EncyclopediaLookup, WikipediaClient};
use crate::error::{KenningError, Result};
use crate::fetch::PageSource;
use crate::gateway::GatewayState;
use crate::types::{GatewayStatus, ResolutionOutcome};

pub use resources::{CURATED_RESOURCES, curated_resources};
pub use url::{LOCAL_SUMMARY_NOTICE, local_summary};

/// Orchestrates page loading, summarisation and encyclopedia lookups.
pub struct ResolutionPipeline {
    pages: Arc<dyn PageSource>,
    gateway: GatewayState,
    encyclopedia: EncyclopediaLookup,
    default_lang: String,
    default_limit: usize,
}

impl ResolutionPipeline {
    /// Assemble a pipeline from its capabilities.
    ///
    /// Lookups default to Korean and resource lists to five entries.
    pub fn new(
        pages: Arc<dyn PageSource>,
        gateway: GatewayState,
        encyclopedia: EncyclopediaLookup,
    ) -> Self {
        Self {
            pages,
            gateway,
            encyclopedia,
            default_lang: "ko".to_owned(),
            default_limit: 5,
        }
    }

    /// Language used when a lookup does not name one.
    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = lang.into();
        self
    }

    /// Resource count used when a request does not give a limit.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.clamp(1, MAX_RESOURCE_LIMIT);
        self
    }

    /// Build the production pipeline: HTTP page fetcher, chat-completions
    /// gateway (if an API key is configured) and Wikipedia.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &KenningConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(config.fetch.clone())?;
        let wikipedia = WikipediaClient::new(&config.encyclopedia)
            .map_err(|e| KenningError::Config(e.to_string()))?;

        let gateway = GatewayState::from_config(&config.gateway);
        match &gateway {
            GatewayState::Available(g) => {
                tracing::info!(gateway = g.name(), model = %config.gateway.model, "summarization enabled");
            }
            GatewayState::Unavailable { reason } => {
                tracing::warn!(%reason, "summarization disabled, fallback tiers only");
            }
        }

        let encyclopedia = EncyclopediaLookup::new(
            Arc::new(wikipedia),
            &config.encyclopedia,
            &config.disambiguation,
        );
        Ok(Self::new(Arc::new(fetcher), gateway, encyclopedia)
            .with_default_lang(config.encyclopedia.default_lang.clone())
            .with_default_limit(config.resources.default_limit))
    }

    /// Report whether the primary summarisation service is configured.
    pub fn gateway_status(&self) -> GatewayStatus {
        match &self.gateway {
            GatewayState::Available(gateway) => GatewayStatus {
                available: true,
                gateway: Some(gateway.name().to_owned()),
                reason: None,
            },
            GatewayState::Unavailable { reason } => GatewayStatus {
                available: false,
                gateway: None,
                reason: Some(reason.clone()),
            },
        }
    }

    /// Summarise `term` from the encyclopedia, resolving ambiguity.
    ///
    /// # Errors
    ///
    /// Returns [`KenningError::EmptyInput`] for a blank term. Lookup
    /// failures are reported inside the outcome.
    pub async fn lookup_keyword(&self, term: &str, lang: Option<&str>) -> Result<ResolutionOutcome> {
        let term = require_term(term)?;
        Ok(self.encyclopedia.lookup(term, self.lang(lang)).await)
    }

    /// Search `term` and drill through the ranked hits.
    ///
    /// # Errors
    ///
    /// Returns [`KenningError::EmptyInput`] for a blank term.
    pub async fn force_lookup(&self, term: &str, lang: Option<&str>) -> Result<ResolutionOutcome> {
        let term = require_term(term)?;
        Ok(self.encyclopedia.force_lookup(term, self.lang(lang)).await)
    }

    fn lang<'a>(&'a self, lang: Option<&'a str>) -> &'a str {
        lang.map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.default_lang.as_str())
    }
}

impl std::fmt::Debug for ResolutionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionPipeline")
            .field("gateway", &self.gateway)
            .field("encyclopedia", &self.encyclopedia)
            .field("default_lang", &self.default_lang)
            .field("default_limit", &self.default_limit)
            .finish_non_exhaustive()
    }
}

fn require_term(term: &str) -> Result<&str> {
    let term = term.trim();
    if term.is_empty() {
        return Err(KenningError::EmptyInput("a search term is required".into()));
    }
    Ok(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisambiguationConfig, EncyclopediaConfig};
    use crate::encyclopedia::fake::FakeEncyclopedia;
    use crate::error::ErrorClass;
    use crate::gateway::GatewayError;
    use fakes::{FakeGateway, FakePages};

    pub(super) fn pipeline(
        pages: FakePages,
        gateway: GatewayState,
        encyclopedia: FakeEncyclopedia,
    ) -> ResolutionPipeline {
        let lookup = EncyclopediaLookup::new(
            Arc::new(encyclopedia),
            &EncyclopediaConfig::default(),
            &DisambiguationConfig::default(),
        );
        ResolutionPipeline::new(Arc::new(pages), gateway, lookup)
    }

    #[tokio::test]
    async fn lookup_keyword_uses_default_language() {
        let p = pipeline(
            FakePages::default(),
            GatewayState::unavailable("no key"),
            FakeEncyclopedia::new().article("배", "열매."),
        );
        let outcome = p.lookup_keyword("배", None).await.expect("lookup");
        assert_eq!(outcome.url(), Some("https://ko.wikipedia.org/wiki/%EB%B0%B0"));
    }

    #[tokio::test]
    async fn lookup_keyword_honours_explicit_language() {
        let p = pipeline(
            FakePages::default(),
            GatewayState::unavailable("no key"),
            FakeEncyclopedia::new().article("Pear", "A fruit."),
        )
        .with_default_lang("ko");
        let outcome = p.lookup_keyword("Pear", Some("en")).await.expect("lookup");
        assert_eq!(outcome.url(), Some("https://en.wikipedia.org/wiki/Pear"));
    }

    #[tokio::test]
    async fn blank_terms_are_bad_requests() {
        let p = pipeline(
            FakePages::default(),
            GatewayState::unavailable("no key"),
            FakeEncyclopedia::new(),
        );
        let err = p.lookup_keyword("   ", None).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::BadRequest);
        let err = p.force_lookup("", Some("en")).await.unwrap_err();
        assert!(matches!(err, KenningError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn force_lookup_goes_through_search() {
        let p = pipeline(
            FakePages::default(),
            GatewayState::unavailable("no key"),
            FakeEncyclopedia::new()
                .search("Rust", &["Rust (programming language)"])
                .article("Rust (programming language)", "A systems language."),
        );
        let outcome = p.force_lookup("Rust", Some("en")).await.expect("lookup");
        assert_eq!(outcome.summary(), Some("A systems language."));
    }

    #[test]
    fn status_reports_availability() {
        let p = pipeline(
            FakePages::default(),
            GatewayState::unavailable("API key not configured"),
            FakeEncyclopedia::new(),
        );
        let status = p.gateway_status();
        assert!(!status.available);
        assert_eq!(status.reason.as_deref(), Some("API key not configured"));

        let p = pipeline(
            FakePages::default(),
            GatewayState::available(FakeGateway::failing(GatewayError::Network("x".into()))),
            FakeEncyclopedia::new(),
        );
        let status = p.gateway_status();
        assert!(status.available);
        assert_eq!(status.gateway.as_deref(), Some("fake"));
    }

    #[test]
    fn default_limit_is_clamped() {
        let p = pipeline(
            FakePages::default(),
            GatewayState::unavailable("no key"),
            FakeEncyclopedia::new(),
        )
        .with_default_limit(50);
        assert_eq!(p.default_limit, MAX_RESOURCE_LIMIT);
    }
}
