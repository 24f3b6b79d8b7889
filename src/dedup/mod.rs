//! News deduplication and headline clustering.
//!
//! A batch goes through exact URL suppression, greedy Jaccard clustering of
//! headline tokens and per-cluster representative selection. Nothing here does
//! I/O; every list the algorithm consults lives in [`DedupConfig`].

// Module declarations
pub mod cluster;
pub mod config;
pub mod hash;
pub mod scoring;
pub mod similarity;
pub mod text;
pub mod url;

pub use cluster::{ClusterStats, DedupEngine};
pub use config::{
    DedupConfig, SynonymRule, TrackingParams, DEFAULT_JACCARD_THRESHOLD,
    HISTORICAL_JACCARD_THRESHOLD,
};
pub use hash::{content_hash, persistence_hash};
pub use scoring::relevance_score;
pub use similarity::jaccard;
pub use text::{headline_tokens, normalize_headline, normalize_title, stem, tokenize};
pub use url::{canonicalize_url, extract_domain, is_trusted_url};
