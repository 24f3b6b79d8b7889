use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::environment::get_env_var_as_opt_vec;
use crate::TARGET_CONFIG;

/// Jaccard threshold for plain batch deduplication.
pub const DEFAULT_JACCARD_THRESHOLD: f64 = 0.75;

/// Jaccard threshold used when backfilling an organization's news history.
pub const HISTORICAL_JACCARD_THRESHOLD: f64 = 0.40;

// Earlier entries weigh more in relevance scoring.
const DOMAIN_PREFERENCE: &[&str] = &[
    "businessinsider.com",
    "engadget.com",
    "venturebeat.com",
    "axios.com",
    "wired.com",
    "arstechnica.com",
    "theverge.com",
    "techcrunch.com",
    "cnbc.com",
    "fortune.com",
    "forbes.com",
    "wsj.com",
    "bloomberg.com",
    "reuters.com",
];

const TRUSTED_DOMAINS: &[&str] = &[
    "techcrunch.com",
    "theverge.com",
    "arstechnica.com",
    "reuters.com",
    "bloomberg.com",
    "wsj.com",
    "ft.com",
    "cnbc.com",
    "fortune.com",
    "businessinsider.com",
    "forbes.com",
    "wired.com",
    "venturebeat.com",
    "engadget.com",
    "zdnet.com",
    "cnet.com",
    "axios.com",
    "theinformation.com",
    "protocol.com",
    "siliconangle.com",
];

const TRACKING_PARAM_PREFIXES: &[&str] = &["utm_", "fbclid", "ref", "source", "campaign"];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "to", "of", "for", "and", "or", "on", "in", "at", "is", "are", "was", "were",
    "be", "been", "being", "with", "by", "from", "it", "its", "this", "that", "these", "those",
    "here", "how", "today", "finally", "s",
];

const SYNONYMS: &[(&str, &str)] = &[(r"hi[-\s]?fi", "hifi"), ("music", "audio")];

/// A single headline rewrite applied before tokenizing for clustering.
#[derive(Debug, Clone)]
pub struct SynonymRule {
    pub pattern: Regex,
    pub replacement: String,
}

impl SynonymRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid synonym pattern '{}'", pattern))?;
        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }

    /// Parses a `pattern=>replacement` entry.
    pub fn parse(entry: &str) -> Result<Self> {
        let (pattern, replacement) = entry
            .split_once("=>")
            .with_context(|| format!("Synonym entry '{}' is missing '=>'", entry))?;
        Self::new(pattern.trim(), replacement.trim())
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

/// Query parameter keys stripped during URL canonicalization.
///
/// Entries are matched as case-insensitive prefixes of the key, so `utm_`
/// covers every `utm_*` parameter and `ref` also covers `referrer`.
#[derive(Debug, Clone)]
pub struct TrackingParams {
    prefixes: Vec<String>,
    matcher: Option<Regex>,
}

impl TrackingParams {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Result<Self> {
        let prefixes: Vec<String> = prefixes
            .iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let matcher = if prefixes.is_empty() {
            None
        } else {
            let alternation = prefixes
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!("(?i)^(?:{})", alternation);
            Some(
                Regex::new(&pattern)
                    .with_context(|| format!("Invalid tracking parameter list {:?}", prefixes))?,
            )
        };

        Ok(Self { prefixes, matcher })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_tracking(&self, key: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(key))
    }
}

/// Everything the dedup engine would otherwise read from module-level lists.
#[derive(Debug, Clone)]
pub struct DedupConfig {
    domain_preference: Vec<String>,
    trusted_domains: HashSet<String>,
    tracking_params: TrackingParams,
    stop_words: HashSet<String>,
    synonyms: Vec<SynonymRule>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        // Built-in patterns are constants covered by tests.
        let synonyms = SYNONYMS
            .iter()
            .map(|(pattern, replacement)| {
                SynonymRule::new(pattern, replacement).expect("built-in synonym pattern is valid")
            })
            .collect();

        Self {
            domain_preference: to_strings(DOMAIN_PREFERENCE),
            trusted_domains: to_strings(TRUSTED_DOMAINS).into_iter().collect(),
            tracking_params: TrackingParams::new(TRACKING_PARAM_PREFIXES)
                .expect("built-in tracking prefixes are escaped literals"),
            stop_words: to_strings(STOP_WORDS).into_iter().collect(),
            synonyms,
        }
    }
}

impl DedupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain_preference<S: AsRef<str>>(mut self, domains: &[S]) -> Self {
        self.domain_preference = normalize_domains(domains);
        self
    }

    pub fn with_trusted_domains<S: AsRef<str>>(mut self, domains: &[S]) -> Self {
        self.trusted_domains = normalize_domains(domains).into_iter().collect();
        self
    }

    pub fn with_tracking_params<S: AsRef<str>>(mut self, prefixes: &[S]) -> Result<Self> {
        self.tracking_params = TrackingParams::new(prefixes)?;
        Ok(self)
    }

    pub fn with_stop_words<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.stop_words = words
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self
    }

    pub fn with_synonyms(mut self, synonyms: Vec<SynonymRule>) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Overlays `SIFT_*` environment variables on the defaults.
    ///
    /// Lists are `;`-separated; synonyms use `pattern=>replacement` entries.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(domains) = get_env_var_as_opt_vec("SIFT_DOMAIN_PREFERENCE", ';') {
            debug!(target: TARGET_CONFIG, "Domain preference from environment: {:?}", domains);
            config = config.with_domain_preference(&domains);
        }
        if let Some(domains) = get_env_var_as_opt_vec("SIFT_TRUSTED_DOMAINS", ';') {
            debug!(target: TARGET_CONFIG, "Trusted domains from environment: {:?}", domains);
            config = config.with_trusted_domains(&domains);
        }
        if let Some(prefixes) = get_env_var_as_opt_vec("SIFT_TRACKING_PARAMS", ';') {
            debug!(target: TARGET_CONFIG, "Tracking parameters from environment: {:?}", prefixes);
            config = config.with_tracking_params(&prefixes)?;
        }
        if let Some(words) = get_env_var_as_opt_vec("SIFT_STOP_WORDS", ';') {
            debug!(target: TARGET_CONFIG, "{} stop words from environment", words.len());
            config = config.with_stop_words(&words);
        }
        if let Some(entries) = get_env_var_as_opt_vec("SIFT_SYNONYMS", ';') {
            let synonyms = entries
                .iter()
                .map(|entry| SynonymRule::parse(entry))
                .collect::<Result<Vec<_>>>()
                .context("Failed to parse SIFT_SYNONYMS")?;
            debug!(target: TARGET_CONFIG, "{} synonym rules from environment", synonyms.len());
            config = config.with_synonyms(synonyms);
        }

        Ok(config)
    }

    /// Loads a JSON configuration file; omitted fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to load config file {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json).context("Invalid config JSON")?;
        file.into_config()
    }

    pub fn domain_preference(&self) -> &[String] {
        &self.domain_preference
    }

    /// Position of `domain` in the preference list.
    pub fn domain_rank(&self, domain: &str) -> Option<usize> {
        self.domain_preference.iter().position(|d| d == domain)
    }

    pub fn is_trusted_domain(&self, domain: &str) -> bool {
        self.trusted_domains.contains(domain)
    }

    pub fn tracking_params(&self) -> &TrackingParams {
        &self.tracking_params
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn synonyms(&self) -> &[SynonymRule] {
        &self.synonyms
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    domain_preference: Option<Vec<String>>,
    trusted_domains: Option<Vec<String>>,
    tracking_params: Option<Vec<String>>,
    stop_words: Option<Vec<String>>,
    synonyms: Option<Vec<SynonymEntry>>,
}

#[derive(Debug, Deserialize)]
struct SynonymEntry {
    pattern: String,
    replacement: String,
}

impl ConfigFile {
    fn into_config(self) -> Result<DedupConfig> {
        let mut config = DedupConfig::default();
        if let Some(domains) = self.domain_preference {
            config = config.with_domain_preference(&domains);
        }
        if let Some(domains) = self.trusted_domains {
            config = config.with_trusted_domains(&domains);
        }
        if let Some(prefixes) = self.tracking_params {
            config = config.with_tracking_params(&prefixes)?;
        }
        if let Some(words) = self.stop_words {
            config = config.with_stop_words(&words);
        }
        if let Some(entries) = self.synonyms {
            let synonyms = entries
                .iter()
                .map(|e| SynonymRule::new(&e.pattern, &e.replacement))
                .collect::<Result<Vec<_>>>()?;
            config = config.with_synonyms(synonyms);
        }
        Ok(config)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn normalize_domains<S: AsRef<str>>(domains: &[S]) -> Vec<String> {
    domains
        .iter()
        .map(|d| {
            let d = d.as_ref().trim().to_lowercase();
            d.strip_prefix("www.").map(str::to_string).unwrap_or(d)
        })
        .filter(|d| !d.is_empty())
        .collect()
}
