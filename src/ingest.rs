//! Pure helpers the news ingestion workflow runs around the dedup engine.
//!
//! Fetching, sentiment and persistence stay with the caller; these functions
//! only shape a batch that has already been downloaded.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::article::{AnnotatedArticle, Article};
use crate::dedup::{is_trusted_url, DedupConfig, DedupEngine, HISTORICAL_JACCARD_THRESHOLD};
use crate::TARGET_INGEST;

/// A batch as delivered by the news provider: either its response envelope or
/// a bare array of articles.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NewsBatch {
    Response {
        #[serde(default)]
        status: Option<String>,
        #[serde(default, rename = "totalResults")]
        total_results: Option<u64>,
        articles: Vec<Article>,
    },
    Articles(Vec<Article>),
}

impl NewsBatch {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse news batch JSON")
    }

    pub fn into_articles(self) -> Vec<Article> {
        match self {
            NewsBatch::Response {
                status,
                total_results,
                articles,
            } => {
                if let Some(status) = status.filter(|s| s != "ok") {
                    warn!(target: TARGET_INGEST, "News batch reported status '{}'", status);
                }
                if let Some(total) = total_results {
                    info!(
                        target: TARGET_INGEST,
                        "News batch carries {} of {} reported results",
                        articles.len(),
                        total
                    );
                }
                articles
            }
            NewsBatch::Articles(articles) => articles,
        }
    }
}

/// Keeps articles whose title mentions the organization, ignoring case.
pub fn filter_by_org_name(articles: Vec<Article>, org_name: &str) -> Vec<Article> {
    let org = org_name.trim().to_lowercase();
    if org.is_empty() {
        warn!(
            target: TARGET_INGEST,
            "No organization name provided, dropping {} articles",
            articles.len()
        );
        return Vec::new();
    }

    let before = articles.len();
    let kept: Vec<Article> = articles
        .into_iter()
        .filter(|article| article.title_str().to_lowercase().contains(&org))
        .collect();
    info!(
        target: TARGET_INGEST,
        "{} of {} articles mention '{}' in the title",
        kept.len(),
        before,
        org_name
    );
    kept
}

/// Keeps articles served from one of the configured trusted domains.
pub fn filter_trusted(articles: Vec<Article>, config: &DedupConfig) -> Vec<Article> {
    let before = articles.len();
    let kept: Vec<Article> = articles
        .into_iter()
        .filter(|article| is_trusted_url(article.url.as_deref(), config))
        .collect();
    info!(
        target: TARGET_INGEST,
        "{} of {} articles come from trusted domains",
        kept.len(),
        before
    );
    kept
}

/// Shapes a backfill batch for one organization: title filter, then
/// clustering at the historical threshold.
pub fn prepare_historical_batch(
    engine: &DedupEngine,
    articles: Vec<Article>,
    org_name: &str,
    now: DateTime<Utc>,
) -> Vec<AnnotatedArticle> {
    let articles = filter_by_org_name(articles, org_name);
    if articles.is_empty() {
        return Vec::new();
    }
    engine.cluster(articles, HISTORICAL_JACCARD_THRESHOLD, now)
}
