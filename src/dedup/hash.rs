use sha2::{Digest, Sha256};

use super::text::normalize_title;

/// SHA-256 hex digest of the hashing normalization of `"{title} {description}"`.
///
/// Used as the cluster identifier and, through [`persistence_hash`], as the
/// cross-run uniqueness key.
pub fn content_hash(title: Option<&str>, description: Option<&str>) -> String {
    let normalized = normalize_title(title, description);

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Key under which an article is stored, so the same story from different
/// outlets can coexist while a re-fetched article is recognised.
pub fn persistence_hash(
    title: Option<&str>,
    url: Option<&str>,
    description: Option<&str>,
) -> String {
    let keyed_title = format!("{} {}", title.unwrap_or(""), url.unwrap_or(""));
    content_hash(Some(&keyed_title), description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_known_digest() {
        // sha256("") and sha256("abc")
        assert_eq!(
            content_hash(None, None),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            content_hash(Some("ABC!"), None),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_content_hash_ignores_formatting() {
        let a = content_hash(Some("Apple Launches Device \u{2014} The Verge"), Some("ignored"));
        let b = content_hash(Some("apple launches device"), None);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_content_hash_uses_description() {
        assert_ne!(
            content_hash(Some("Apple launches device"), Some("first")),
            content_hash(Some("Apple launches device"), Some("second"))
        );
    }

    #[test]
    fn test_persistence_hash_distinguishes_outlets() {
        let title = Some("Apple launches device");
        let description = Some("Details");
        let verge = persistence_hash(title, Some("https://theverge.com/a"), description);
        let wired = persistence_hash(title, Some("https://wired.com/b"), description);
        assert_ne!(verge, wired);
        assert_eq!(
            verge,
            persistence_hash(title, Some("https://theverge.com/a"), description)
        );
        assert_ne!(verge, content_hash(title, description));
    }
}
