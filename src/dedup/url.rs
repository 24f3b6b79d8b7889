//! URL canonicalization for exact duplicate suppression within a batch.

use url::{form_urlencoded, Url};

use super::config::{DedupConfig, TrackingParams};

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Canonical form of an article URL: `host + path + ?query`.
///
/// The host is lowercased without a leading `www.`, tracking parameters are
/// dropped, the remaining parameters keep their relative order and the
/// fragment is discarded. A repeated key keeps its first position and its
/// last value. Unparsable input falls back to the lowercased original so it
/// can still take part in exact-match deduplication.
pub fn canonicalize_url(url: Option<&str>, tracking: &TrackingParams) -> Option<String> {
    let url = url.filter(|u| !u.is_empty())?;

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return Some(url.to_lowercase()),
    };

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    let host = strip_www(&host);

    let mut kept: Vec<(String, String)> = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if tracking.is_tracking(&key) {
            continue;
        }
        match kept.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value.into_owned(),
            None => kept.push((key.into_owned(), value.into_owned())),
        }
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(kept)
        .finish();

    let mut canonical = format!("{}{}", host, parsed.path());
    if !query.is_empty() {
        canonical.push('?');
        canonical.push_str(&query);
    }
    Some(canonical)
}

/// Lowercased host of `url` without a leading `www.`.
pub fn extract_domain(url: Option<&str>) -> Option<String> {
    let parsed = Url::parse(url?).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let domain = strip_www(&host);
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Whether the article URL points at one of the configured trusted outlets.
pub fn is_trusted_url(url: Option<&str>, config: &DedupConfig) -> bool {
    extract_domain(url).is_some_and(|domain| config.is_trusted_domain(&domain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn canon(url: &str) -> Option<String> {
        let config = DedupConfig::default();
        canonicalize_url(Some(url), config.tracking_params())
    }

    #[test]
    fn test_strips_www_and_tracking() {
        assert_eq!(
            canon("https://www.site.com/a?utm_source=x"),
            Some("site.com/a".to_string())
        );
        assert_eq!(canon("https://site.com/a"), Some("site.com/a".to_string()));
        assert_eq!(
            canon("https://WWW.Site.COM/Path/To?id=7&fbclid=abc&UTM_MEDIUM=email#section"),
            Some("site.com/Path/To?id=7".to_string())
        );
    }

    #[test]
    fn test_keeps_parameter_order() {
        assert_eq!(
            canon("https://site.com/a?z=1&ref=home&a=2&campaign=x&m=3"),
            Some("site.com/a?z=1&a=2&m=3".to_string())
        );
    }

    #[test]
    fn test_repeated_key_keeps_first_position_last_value() {
        assert_eq!(
            canon("https://site.com/a?x=1&y=2&x=3"),
            Some("site.com/a?x=3&y=2".to_string())
        );
    }

    #[test]
    fn test_prefix_matching_covers_related_keys() {
        // `ref` and `source` are prefixes, so these go too
        assert_eq!(
            canon("https://site.com/a?referrer=t&sourceid=9&page=2"),
            Some("site.com/a?page=2".to_string())
        );
    }

    #[test]
    fn test_root_path() {
        assert_eq!(canon("https://www.site.com"), Some("site.com/".to_string()));
    }

    #[test]
    fn test_unparsable_falls_back_to_lowercase() {
        assert_eq!(
            canon("Not A URL/Path?UTM_source=x"),
            Some("not a url/path?utm_source=x".to_string())
        );
        assert_eq!(canon("site.com/A"), Some("site.com/a".to_string()));
    }

    #[test]
    fn test_missing_or_empty() {
        let config = DedupConfig::default();
        assert_eq!(canonicalize_url(None, config.tracking_params()), None);
        assert_eq!(canonicalize_url(Some(""), config.tracking_params()), None);
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain(Some("https://www.Reuters.com/tech/1")),
            Some("reuters.com".to_string())
        );
        assert_eq!(extract_domain(Some("reuters.com/tech")), None);
        assert_eq!(extract_domain(Some("mailto:someone@example.com")), None);
        assert_eq!(extract_domain(None), None);
    }

    #[test]
    fn test_is_trusted_url() {
        let config = DedupConfig::default();
        assert!(is_trusted_url(Some("https://www.wired.com/story/x"), &config));
        assert!(!is_trusted_url(Some("https://blog.example.com/x"), &config));
        assert!(!is_trusted_url(None, &config));
    }

    proptest! {
        #[test]
        fn canonicalization_is_idempotent(
            host in "[a-v]{1,10}\\.(com|org|net)",
            www in any::<bool>(),
            path in "(/[a-z0-9]{1,8}){0,3}",
            params in proptest::collection::vec(
                ("(utm_[a-z]{1,5}|fbclid|id|page|q|sort)", "[a-z0-9]{0,6}"),
                0..5,
            ),
        ) {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            let prefix = if www { "www." } else { "" };
            let mut url = format!("https://{}{}{}", prefix, host, path);
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }

            let once = canon(&url).unwrap();
            let twice = canon(&format!("https://{}", once)).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert!(!once.contains("utm_"));
        }
    }
}
