pub mod article;
pub mod classify;
pub mod dedup;
pub mod environment;
pub mod ingest;
pub mod logging;
pub mod util;

pub use article::{AnnotatedArticle, Article, Source};
pub use dedup::{DedupConfig, DedupEngine};

pub const TARGET_DEDUP: &str = "dedup";
pub const TARGET_INGEST: &str = "ingest";
pub const TARGET_CONFIG: &str = "config";
