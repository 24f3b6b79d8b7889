//! Headline normalization and tokenization.

use super::config::{DedupConfig, SynonymRule};

const OUTLET_SEPARATORS: [char; 3] = ['\u{2013}', '\u{2014}', '|'];

const STEM_SUFFIXES: [&str; 4] = ["ing", "ed", "es", "s"];

/// Drops an outlet attribution such as " — The Verge" or " | CNN".
fn strip_outlet_suffix(text: &str) -> &str {
    text.split(OUTLET_SEPARATORS).next().unwrap_or("")
}

/// Replaces anything that is not an ASCII word character or whitespace with a
/// space, then collapses whitespace runs.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalization used for content hashing: `"{title} {description}"`,
/// lowercased, outlet suffix dropped, punctuation stripped.
///
/// A missing or empty title yields an empty string.
pub fn normalize_title(title: Option<&str>, description: Option<&str>) -> String {
    let title = match title {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };
    let text = format!("{} {}", title, description.unwrap_or("")).to_lowercase();
    strip_punctuation(strip_outlet_suffix(&text))
}

/// Title-only normalization for clustering, with synonym folding.
pub fn normalize_headline(title: Option<&str>, synonyms: &[SynonymRule]) -> String {
    let title = match title {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };
    let lowered = title.to_lowercase();
    let mut text = strip_outlet_suffix(&lowered).to_string();
    for rule in synonyms {
        text = rule.apply(&text);
    }
    strip_punctuation(&text)
}

/// Strips one common suffix from tokens longer than three characters.
///
/// The first matching suffix wins; there is no dictionary, so irregular forms
/// are left alone.
pub fn stem(token: &str) -> &str {
    if token.chars().count() <= 3 {
        return token;
    }
    STEM_SUFFIXES
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .unwrap_or(token)
}

/// Splits a normalized headline into clustering tokens.
///
/// Tokens of two characters or fewer and stop words are dropped before
/// stemming. Order is kept but carries no meaning downstream.
pub fn tokenize(normalized: &str, config: &DedupConfig) -> Vec<String> {
    normalized
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.chars().count() > 2 && !config.is_stop_word(t))
        .map(|t| stem(t).to_string())
        .collect()
}

/// Normalizes and tokenizes a headline in one step.
pub fn headline_tokens(title: Option<&str>, config: &DedupConfig) -> Vec<String> {
    tokenize(&normalize_headline(title, config.synonyms()), config)
}
