//! Core data structures handed to the presentation layer.

use serde::{Deserialize, Serialize};

/// Which fallback tier produced a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// The generative completion service.
    Primary,
    /// The encyclopedia.
    Secondary,
    /// The fixed built-in list.
    Curated,
}

impl SourceTag {
    /// Returns the lowercase tier name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Curated => "curated",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single resource recommendation. Lists are ordered most relevant first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceItem {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub source_tag: SourceTag,
}

impl ResourceItem {
    /// Construct an item from its parts.
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        url: impl Into<String>,
        source_tag: SourceTag,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            url: url.into(),
            source_tag,
        }
    }
}

/// Records whether a result crossed a tier boundary.
///
/// A reason is present exactly when a fallback was used; the constructors
/// are the only way to build one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackMeta {
    used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<String>,
}

impl FallbackMeta {
    /// No fallback was needed.
    pub fn none() -> Self {
        Self::default()
    }

    /// A lower tier answered, for the given reason.
    pub fn used(reason: impl Into<String>) -> Self {
        Self {
            used_fallback: true,
            fallback_reason: Some(reason.into()),
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }
}

/// The result of resolving a keyword against the encyclopedia.
///
/// Exactly one of `summary` and `message` is present. Candidate options are
/// only ever attached to a message, never to a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    candidate_options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ResolutionOutcome {
    /// An article was found.
    pub fn resolved(summary: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            url: Some(url.into()),
            candidate_options: Vec::new(),
            message: None,
        }
    }

    /// Nothing usable was found; `message` tells the user why.
    pub fn unresolved(message: impl Into<String>) -> Self {
        Self {
            summary: None,
            url: None,
            candidate_options: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// The keyword is ambiguous and no candidate could be resolved.
    pub fn ambiguous(message: impl Into<String>, candidate_options: Vec<String>) -> Self {
        Self {
            summary: None,
            url: None,
            candidate_options,
            message: Some(message.into()),
        }
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn candidate_options(&self) -> &[String] {
        &self.candidate_options
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether an article summary is present.
    pub fn is_resolved(&self) -> bool {
        self.summary.is_some()
    }
}

/// Result of summarising one URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSummary {
    pub summary: String,
    pub citations: Vec<String>,
    pub source_title: String,
    /// URL after redirects.
    pub source_url: String,
    #[serde(flatten)]
    pub fallback: FallbackMeta,
    /// Untouched page markup for downstream inspection; never serialised.
    #[serde(skip)]
    pub raw_markup: String,
}

/// Result of a keyword-resources request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReport {
    /// Sanitised keywords joined with `", "`.
    pub query: String,
    pub results: Vec<ResourceItem>,
    #[serde(flatten)]
    pub fallback: FallbackMeta,
}

/// Whether the primary summarisation service is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Raw keyword input: one comma-separated string or a list of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeywordInput {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for KeywordInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<String>> for KeywordInput {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}
