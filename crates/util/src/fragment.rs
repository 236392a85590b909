//! Fragment identifier extraction for in-page links.

use percent_encoding::percent_decode_str;

/// Returns the fragment identifier of `href`, percent-decoded.
///
/// `"#about"` and `"/index.html#about"` both yield `"about"`. A link without a
/// `#`, or with nothing after it, has no fragment.
pub fn fragment_id(href: &str) -> Option<String> {
    let (_, raw) = href.trim().split_once('#')?;
    if raw.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    Some(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fragment() {
        assert_eq!(fragment_id("#about").as_deref(), Some("about"));
    }

    #[test]
    fn test_fragment_after_path() {
        assert_eq!(fragment_id("/index.html#contact").as_deref(), Some("contact"));
        assert_eq!(fragment_id("https://example.com/#top").as_deref(), Some("top"));
    }

    #[test]
    fn test_missing_or_empty_fragment() {
        assert_eq!(fragment_id("/about"), None);
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id(""), None);
    }

    #[test]
    fn test_percent_encoded_fragment() {
        assert_eq!(fragment_id("#our%20team").as_deref(), Some("our team"));
    }

    #[test]
    fn test_only_first_hash_splits() {
        assert_eq!(fragment_id("#a#b").as_deref(), Some("a#b"));
    }
}
