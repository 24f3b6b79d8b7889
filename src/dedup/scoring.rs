use chrono::{DateTime, Utc};

use super::config::DedupConfig;
use super::url::extract_domain;
use crate::article::Article;
use crate::util::parse_date;

const DOMAIN_WEIGHT: f64 = 10.0;
const LENGTH_WEIGHT: f64 = 2.0;

/// Description length at which the length term saturates.
const FULL_LENGTH_CHARS: f64 = 500.0;

/// Age at which the recency term reaches zero (one week).
const RECENCY_WINDOW_HOURS: f64 = 168.0;

/// Age assigned to articles without a usable publication date.
const UNKNOWN_AGE_HOURS: f64 = 9999.0;

/// Domain authority: `len - rank` for listed domains, `0` otherwise.
pub fn domain_term(url: Option<&str>, config: &DedupConfig) -> f64 {
    extract_domain(url)
        .and_then(|domain| config.domain_rank(&domain))
        .map(|rank| (config.domain_preference().len() - rank) as f64)
        .unwrap_or(0.0)
}

/// Description length in `[0, 1]`, counted in UTF-16 code units so that
/// scores match those stored by the dashboard.
pub fn length_term(description: Option<&str>) -> f64 {
    let len = description.map(|d| d.encode_utf16().count()).unwrap_or(0) as f64;
    (len / FULL_LENGTH_CHARS).min(1.0)
}

/// Freshness in `[0, 1]`: `1` when just published, `0` after a week.
///
/// Dates in the future count as fresh.
pub fn recency_term(published_at: Option<&str>, now: DateTime<Utc>) -> f64 {
    let age_hours = published_at
        .and_then(parse_date)
        .filter(|published| published.timestamp_millis() != 0)
        .map(|published| {
            let millis = (now - published).num_milliseconds() as f64;
            (millis / (1000.0 * 60.0 * 60.0)).max(0.0)
        })
        .unwrap_or(UNKNOWN_AGE_HOURS);

    (1.0 - age_hours / RECENCY_WINDOW_HOURS).max(0.0)
}

/// Relevance of an article for picking a cluster representative.
///
/// `10 * domain + 2 * length + recency`. Scores only rank members of one
/// cluster against each other.
pub fn relevance_score(article: &Article, now: DateTime<Utc>, config: &DedupConfig) -> f64 {
    DOMAIN_WEIGHT * domain_term(article.url.as_deref(), config)
        + LENGTH_WEIGHT * length_term(article.description.as_deref())
        + recency_term(article.published_at.as_deref(), now)
}
