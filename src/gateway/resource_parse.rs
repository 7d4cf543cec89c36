//! Best-effort parsing of resource lists from free-text completions.
//!
//! Models asked for a JSON array often wrap it in prose or code fences.
//! This module finds the first JSON array in the text and coerces each
//! object in it into a [`ResourceItem`]. It never fails: text without an
//! array becomes [`ResourceParse::Malformed`] carrying a sentinel item.

use serde_json::Value;

use crate::types::{ResourceItem, SourceTag};

/// Title used when an element has no `title`.
pub const DEFAULT_TITLE: &str = "Untitled";
/// Summary used when an element has no `summary`.
pub const DEFAULT_SUMMARY: &str = "No summary was provided.";

/// Outcome of parsing a resource-list completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceParse {
    /// An array was found. May be empty.
    Parsed(Vec<ResourceItem>),
    /// No array could be parsed.
    Malformed { sentinel: ResourceItem, detail: String },
}

/// The single item that stands in for an unparseable response.
pub fn malformed_sentinel() -> ResourceItem {
    ResourceItem::new(
        "Could not load results",
        "The research service returned a response in an unexpected format. Please try again.",
        "",
        SourceTag::Primary,
    )
}

/// Parse the first JSON array in `text` into primary-tier resources.
///
/// Non-object elements are skipped. Missing or null `title`, `summary` and
/// `url` fields get default strings; non-string values are rendered as JSON.
pub fn parse_resource_array(text: &str) -> ResourceParse {
    match first_json_array(text) {
        Some(elements) => ResourceParse::Parsed(
            elements
                .iter()
                .filter_map(Value::as_object)
                .map(|object| {
                    ResourceItem::new(
                        coerce_field(object.get("title"), DEFAULT_TITLE),
                        coerce_field(object.get("summary"), DEFAULT_SUMMARY),
                        coerce_field(object.get("url"), ""),
                        SourceTag::Primary,
                    )
                })
                .collect(),
        ),
        None => {
            tracing::warn!(chars = text.chars().count(), "no JSON array in completion");
            ResourceParse::Malformed {
                sentinel: malformed_sentinel(),
                detail: "no JSON array found in response".to_owned(),
            }
        }
    }
}

/// Find the first `[` at which a complete JSON array parses.
fn first_json_array(text: &str) -> Option<Vec<Value>> {
    text.match_indices('[').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Array(elements))) => Some(elements),
            _ => None,
        }
    })
}

fn coerce_field(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
