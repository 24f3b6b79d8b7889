use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

use sift::classify::KeywordSet;
use sift::dedup::{
    canonicalize_url, content_hash, headline_tokens, normalize_headline, persistence_hash,
    DedupConfig, DedupEngine, DEFAULT_JACCARD_THRESHOLD,
};
use sift::ingest::{filter_by_org_name, filter_trusted, NewsBatch};
use sift::Article;

/// Deduplicate and cluster news article batches.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory for a daily rolling log file
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// JSON configuration file (defaults plus SIFT_* environment variables otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BatchArgs {
    /// Article batch as JSON, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Minimum Jaccard similarity for two headlines to share a cluster
    #[arg(short, long, default_value_t = DEFAULT_JACCARD_THRESHOLD)]
    threshold: f64,

    /// Reference time for recency scoring (RFC 3339), defaults to now
    #[arg(long)]
    now: Option<String>,

    /// Keep only articles whose title mentions this organization
    #[arg(long)]
    org: Option<String>,

    /// Keep only articles from trusted domains
    #[arg(long)]
    trusted_only: bool,

    /// Keep only articles matching a news category keyword
    #[arg(long)]
    relevant_only: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster a batch and annotate every surviving article
    Cluster(BatchArgs),

    /// Keep only one representative article per cluster
    Dedupe(BatchArgs),

    /// Print the canonical form of one or more URLs
    Canonicalize {
        urls: Vec<String>,
    },

    /// Show how a headline is normalized and tokenized for clustering
    Tokenize {
        title: String,
    },

    /// Print the content hash (and persistence hash when a URL is given)
    Hash {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        url: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    sift::logging::configure_logging(cli.log_dir.as_deref());

    let config = match &cli.config {
        Some(path) => DedupConfig::from_json_file(path)?,
        None => DedupConfig::from_env()?,
    };
    let engine = DedupEngine::new(config);

    match cli.command {
        Commands::Cluster(args) => {
            let now = reference_time(args.now.as_deref())?;
            let articles = load_batch(&args, &engine)?;
            let (annotated, stats) = engine.cluster_with_stats(articles, args.threshold, now);
            info!(
                "Emitting {} articles from {} clusters",
                stats.output, stats.clusters
            );
            write_json(&annotated, args.pretty)?;
        }
        Commands::Dedupe(args) => {
            let now = reference_time(args.now.as_deref())?;
            let articles = load_batch(&args, &engine)?;
            let representatives = engine.dedupe(articles, args.threshold, now);
            info!("Kept {} representative articles", representatives.len());
            write_json(&representatives, args.pretty)?;
        }
        Commands::Canonicalize { urls } => {
            for url in urls {
                let canonical =
                    canonicalize_url(Some(url.as_str()), engine.config().tracking_params());
                println!("{}\t{}", url, canonical.unwrap_or_default());
            }
        }
        Commands::Tokenize { title } => {
            let normalized =
                normalize_headline(Some(title.as_str()), engine.config().synonyms());
            let tokens = headline_tokens(Some(title.as_str()), engine.config());
            println!("normalized: {}", normalized);
            println!("tokens: {}", tokens.join(" "));
        }
        Commands::Hash {
            title,
            description,
            url,
        } => {
            println!(
                "content_hash: {}",
                content_hash(Some(title.as_str()), description.as_deref())
            );
            if url.is_some() {
                println!(
                    "persistence_hash: {}",
                    persistence_hash(Some(title.as_str()), url.as_deref(), description.as_deref())
                );
            }
        }
    }

    Ok(())
}

fn reference_time(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(value) => Ok(DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Invalid --now timestamp '{}'", value))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read batch from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read batch file {}", input))
    }
}

fn load_batch(args: &BatchArgs, engine: &DedupEngine) -> Result<Vec<Article>> {
    let json = read_input(&args.input)?;
    let mut articles = NewsBatch::from_json(&json)?.into_articles();
    info!("Loaded {} articles from {}", articles.len(), args.input);

    if args.trusted_only {
        articles = filter_trusted(articles, engine.config());
    }
    if let Some(org) = &args.org {
        articles = filter_by_org_name(articles, org);
    }
    if args.relevant_only {
        articles = KeywordSet::default().filter_relevant(articles);
    }

    Ok(articles)
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
