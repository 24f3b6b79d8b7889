//! Keyword tagging of competitor news.

use serde::Serialize;
use std::fmt;

use crate::article::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Leadership,
    Acquisition,
    Legal,
    Product,
    Regulation,
    Hiring,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Leadership,
        Category::Acquisition,
        Category::Legal,
        Category::Product,
        Category::Regulation,
        Category::Hiring,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Leadership => write!(f, "leadership"),
            Category::Acquisition => write!(f, "acquisition"),
            Category::Legal => write!(f, "legal"),
            Category::Product => write!(f, "product"),
            Category::Regulation => write!(f, "regulation"),
            Category::Hiring => write!(f, "hiring"),
        }
    }
}

fn default_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Leadership => &[
            "ceo",
            "cfo",
            "coo",
            "chief executive",
            "steps down",
            "resigns",
            "appointed",
            "named",
            "executive change",
            "leadership change",
        ],
        Category::Acquisition => &[
            "acquires",
            "acquisition",
            "merges",
            "merger",
            "buyout",
            "takeover",
            "joins forces with",
        ],
        Category::Legal => &["lawsuit", "sued", "investigation", "sec", "charges", "settlement"],
        Category::Product => &[
            "launches",
            "rolls out",
            "introduces",
            "announces",
            "expands",
            "covers",
            "support for",
            "new feature",
            "diy repair",
            "now available",
            "adds",
            "available in",
        ],
        Category::Regulation => &[
            "regulation",
            "banned",
            "blocked",
            "fine",
            "privacy law",
            "compliance",
            "EU",
            "FTC",
            "antitrust",
        ],
        Category::Hiring => &[
            "hiring",
            "layoffs",
            "cuts jobs",
            "reducing staff",
            "workforce reduction",
            "job openings",
        ],
    }
}

/// Substring keywords per category, matched against lowercased
/// `"{title} {description}"`.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<(Category, Vec<String>)>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        let mut set = Self {
            keywords: Vec::new(),
        };
        for category in Category::ALL {
            set = set.with_keywords(category, default_keywords(category));
        }
        set
    }
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the keywords of one category. Keywords are lowercased so they
    /// can match the lowercased article text.
    pub fn with_keywords<S: AsRef<str>>(mut self, category: Category, keywords: &[S]) -> Self {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        match self.keywords.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = keywords,
            None => {
                self.keywords.push((category, keywords));
                self.keywords
                    .sort_by_key(|(c, _)| Category::ALL.iter().position(|a| a == c));
            }
        }
        self
    }

    /// Categories whose keywords occur in the article, in declaration order.
    pub fn classify(&self, article: &Article) -> Vec<Category> {
        let text = format!("{} {}", article.title_str(), article.description_str()).to_lowercase();
        self.keywords
            .iter()
            .filter(|(_, words)| words.iter().any(|w| text.contains(w.as_str())))
            .map(|(category, _)| *category)
            .collect()
    }

    pub fn is_relevant(&self, article: &Article) -> bool {
        !self.classify(article).is_empty()
    }

    /// Keeps articles with at least one category.
    pub fn filter_relevant(&self, articles: Vec<Article>) -> Vec<Article> {
        articles
            .into_iter()
            .filter(|article| self.is_relevant(article))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_categories_in_order() {
        let keywords = KeywordSet::default();
        let article = Article::new("Acme CEO resigns after lawsuit")
            .with_description("The company also announces layoffs.");

        assert_eq!(
            keywords.classify(&article),
            vec![
                Category::Leadership,
                Category::Legal,
                Category::Product,
                Category::Hiring
            ]
        );
    }

    #[test]
    fn test_mixed_case_keywords_match() {
        let keywords = KeywordSet::default();
        let article = Article::new("FTC opens probe into ad market");
        assert_eq!(keywords.classify(&article), vec![Category::Regulation]);
    }

    #[test]
    fn test_irrelevant_article() {
        let keywords = KeywordSet::default();
        assert!(!keywords.is_relevant(&Article::new("Quarterly outlook unchanged")));
        assert!(!keywords.is_relevant(&Article::default()));
    }

    #[test]
    fn test_filter_relevant() {
        let keywords = KeywordSet::default();
        let articles = vec![
            Article::new("Acme acquires Widgets Inc"),
            Article::new("Weather is nice"),
            Article::new("Widgets Inc is hiring engineers"),
        ];

        let kept = keywords.filter_relevant(articles);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_custom_keywords_replace_category() {
        let keywords = KeywordSet::default().with_keywords(Category::Legal, &["Subpoena"]);
        assert_eq!(
            keywords.classify(&Article::new("Acme receives subpoena")),
            vec![Category::Legal]
        );
        assert!(keywords.classify(&Article::new("Acme loses a big lawsuit")).is_empty());
    }

    #[test]
    fn test_category_display_matches_serde() {
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.to_string());
        }
    }
}
