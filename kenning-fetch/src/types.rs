//! Core types produced by a page fetch.

use serde::{Deserialize, Serialize};

/// The outcome of one successful fetch.
///
/// `body_text` is already truncated to the configured character budget.
/// `raw_markup` is the untouched response body, kept for downstream
/// heuristic inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    /// Declared document title, or the URL as given by the caller if the
    /// document has no `<title>` element.
    pub title: String,
    /// Readable text: heading and paragraph blocks joined by newlines.
    pub body_text: String,
    /// URL after redirects.
    pub final_url: String,
    /// Raw response body.
    pub raw_markup: String,
}
