//! Kenning: resolve a keyword or URL into a readable summary.
//!
//! The crate orchestrates unreliable external knowledge sources with
//! deterministic fallback:
//! URL → fetch → summarise (or local excerpt)
//! keywords → AI resource list → encyclopedia search → curated list
//!
//! # Architecture
//!
//! - **Page fetching**: `kenning-fetch` loads a URL under up to three network
//!   identities and extracts readable text
//! - **Gateway**: a chat-completions client that summarises text and
//!   proposes resource lists
//! - **Encyclopedia**: MediaWiki summaries and search, with ranked,
//!   depth-bounded disambiguation
//! - **Pipeline**: the orchestrator that picks tiers and records every
//!   fallback in the result
//!
//! Capabilities are injected as traits ([`fetch::PageSource`],
//! [`gateway::SummarizationGateway`], [`encyclopedia::EncyclopediaSource`]),
//! so the pipeline is a pure function of its inputs and collaborators.

pub mod config;
pub mod encyclopedia;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod keywords;
pub mod pipeline;
pub mod types;

pub use config::KenningConfig;
pub use error::{ErrorClass, KenningError, Result};
pub use gateway::GatewayState;
pub use pipeline::ResolutionPipeline;
pub use types::{
    FallbackMeta, GatewayStatus, KeywordInput, ResolutionOutcome, ResourceItem, ResourceReport,
    SourceTag, UrlSummary,
};
