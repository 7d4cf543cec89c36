//! Keyword sanitisation and language detection.

use crate::types::KeywordInput;

/// Split and clean raw keyword input.
///
/// A single string is split on commas; a list is taken token by token.
/// Each token keeps only letters, digits, whitespace, `#`, `+` and `-`, has
/// whitespace runs collapsed to one space, and is dropped if nothing remains.
/// Sanitising an already-sanitised list returns it unchanged.
pub fn sanitize_keywords(input: &KeywordInput) -> Vec<String> {
    split_tokens(input).filter_map(sanitize_token).collect()
}

/// Split keyword input the same way as [`sanitize_keywords`], but only trim
/// each token. Used where the caller's own wording must be echoed back.
pub fn raw_keywords(input: &KeywordInput) -> Vec<String> {
    split_tokens(input)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

fn split_tokens(input: &KeywordInput) -> Box<dyn Iterator<Item = &str> + '_> {
    match input {
        KeywordInput::Text(text) => Box::new(text.split(',')),
        KeywordInput::List(list) => Box::new(list.iter().map(String::as_str)),
    }
}

/// Clean a single token, returning `None` if it becomes empty.
pub fn sanitize_token(token: &str) -> Option<String> {
    let kept: String = token
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '#' | '+' | '-'))
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Pick the encyclopedia language for a free-text query.
///
/// Any Hangul (compatibility jamo or syllables) selects Korean; everything
/// else is looked up in English.
pub fn detect_language(query: &str) -> &'static str {
    let has_hangul = query
        .chars()
        .any(|c| matches!(c, '\u{3130}'..='\u{318F}' | '\u{AC00}'..='\u{D7A3}'));
    if has_hangul { "ko" } else { "en" }
}
