use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use super::config::DedupConfig;
use super::hash::content_hash;
use super::scoring::relevance_score;
use super::similarity::jaccard;
use super::text::headline_tokens;
use super::url::canonicalize_url;
use crate::article::{AnnotatedArticle, Article};
use crate::TARGET_DEDUP;

/// Counters describing one clustering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClusterStats {
    pub input: usize,
    pub url_duplicates: usize,
    pub empty_titles: usize,
    pub clusters: usize,
    pub output: usize,
}

/// A cluster still accepting members. Newcomers are compared against the
/// tokens of the first member only.
struct OpenCluster {
    tokens: Vec<String>,
    members: Vec<Article>,
}

/// A closed cluster with its representative chosen.
struct RankedCluster {
    id: String,
    representative: usize,
    scores: Vec<f64>,
    members: Vec<Article>,
}

/// Groups near-duplicate headlines and picks a representative per group.
///
/// The engine holds no per-call state, so one instance can serve any number of
/// batches, including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct DedupEngine {
    config: DedupConfig,
}

impl DedupEngine {
    pub fn new(config: DedupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Clusters a batch and annotates every surviving article.
    ///
    /// Output is ordered by cluster creation, then by arrival within a cluster.
    pub fn cluster(
        &self,
        articles: Vec<Article>,
        jaccard_threshold: f64,
        now: DateTime<Utc>,
    ) -> Vec<AnnotatedArticle> {
        self.cluster_with_stats(articles, jaccard_threshold, now).0
    }

    /// [`cluster`](Self::cluster) with the wall clock read once up front.
    pub fn cluster_now(
        &self,
        articles: Vec<Article>,
        jaccard_threshold: f64,
    ) -> Vec<AnnotatedArticle> {
        self.cluster(articles, jaccard_threshold, Utc::now())
    }

    pub fn cluster_with_stats(
        &self,
        articles: Vec<Article>,
        jaccard_threshold: f64,
        now: DateTime<Utc>,
    ) -> (Vec<AnnotatedArticle>, ClusterStats) {
        let mut stats = ClusterStats {
            input: articles.len(),
            ..ClusterStats::default()
        };

        let ranked = self.rank(self.group(articles, jaccard_threshold, &mut stats), now);

        let mut annotated = Vec::new();
        for cluster in ranked {
            for (idx, (article, score)) in cluster
                .members
                .into_iter()
                .zip(cluster.scores)
                .enumerate()
            {
                annotated.push(AnnotatedArticle {
                    article,
                    cluster_id: cluster.id.clone(),
                    is_representative: idx == cluster.representative,
                    relevance_score: score,
                });
            }
        }
        stats.output = annotated.len();

        info!(
            target: TARGET_DEDUP,
            "Clustered {} articles into {} clusters ({} URL duplicates, {} without usable titles)",
            stats.input, stats.clusters, stats.url_duplicates, stats.empty_titles
        );

        (annotated, stats)
    }

    /// Keeps only each cluster's representative.
    pub fn dedupe(
        &self,
        articles: Vec<Article>,
        jaccard_threshold: f64,
        now: DateTime<Utc>,
    ) -> Vec<Article> {
        let mut stats = ClusterStats::default();
        let ranked = self.rank(self.group(articles, jaccard_threshold, &mut stats), now);

        ranked
            .into_iter()
            .filter_map(|cluster| {
                let representative = cluster.representative;
                cluster.members.into_iter().nth(representative)
            })
            .collect()
    }

    /// Single greedy pass: exact URL duplicates are dropped, then each article
    /// joins the first cluster whose first member is similar enough.
    fn group(
        &self,
        articles: Vec<Article>,
        jaccard_threshold: f64,
        stats: &mut ClusterStats,
    ) -> Vec<OpenCluster> {
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut clusters: Vec<OpenCluster> = Vec::new();

        for article in articles {
            let canonical = canonicalize_url(article.url.as_deref(), self.config.tracking_params());
            if let Some(canonical) = canonical {
                if !seen_urls.insert(canonical) {
                    stats.url_duplicates += 1;
                    debug!(
                        target: TARGET_DEDUP,
                        "Skipping duplicate URL: {}",
                        article.url.as_deref().unwrap_or_default()
                    );
                    continue;
                }
            }

            let tokens = headline_tokens(article.title.as_deref(), &self.config);
            if tokens.is_empty() {
                stats.empty_titles += 1;
                debug!(
                    target: TARGET_DEDUP,
                    "Skipping article without clusterable title: {:?}", article.title
                );
                continue;
            }

            let matched = clusters
                .iter_mut()
                .find(|cluster| jaccard(&tokens, &cluster.tokens) >= jaccard_threshold);

            match matched {
                Some(cluster) => cluster.members.push(article),
                None => {
                    debug!(
                        target: TARGET_DEDUP,
                        "Opening cluster {} for '{}'",
                        clusters.len(),
                        article.title_str()
                    );
                    clusters.push(OpenCluster {
                        tokens,
                        members: vec![article],
                    });
                }
            }
        }

        stats.clusters = clusters.len();
        clusters
    }

    /// Scores every member against the same `now` and picks the first highest
    /// scoring member as representative.
    fn rank(&self, clusters: Vec<OpenCluster>, now: DateTime<Utc>) -> Vec<RankedCluster> {
        clusters
            .into_iter()
            .map(|cluster| {
                let scores: Vec<f64> = cluster
                    .members
                    .iter()
                    .map(|article| relevance_score(article, now, &self.config))
                    .collect();

                let mut representative = 0;
                for (idx, score) in scores.iter().enumerate() {
                    if *score > scores[representative] {
                        representative = idx;
                    }
                }

                let rep = &cluster.members[representative];
                let id = content_hash(rep.title.as_deref(), rep.description.as_deref());

                RankedCluster {
                    id,
                    representative,
                    scores,
                    members: cluster.members,
                }
            })
            .collect()
    }
}
