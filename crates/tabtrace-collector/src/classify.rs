/// Keyword-substring rules mapping a URL/domain onto the fixed category
/// taxonomy. Best-effort and deliberately coarse: the category is the only
/// page-content signal stored when titles and keywords are disabled.
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["news", "article", "rss"], "news"),
    (&["shop", "cart", "checkout", "product", "store"], "shopping"),
    (
        &["facebook", "twitter", "instagram", "tiktok", "linkedin"],
        "social",
    ),
    (&["youtube", "vimeo", "stream", "player"], "video"),
    (
        &["search", "google.com", "bing.com", "duckduckgo.com"],
        "search",
    ),
    (
        &["docs", "wikipedia", "wiki", "readthedocs", "mozilla"],
        "reference",
    ),
    (&["mail", "inbox", "outlook", "gmail"], "communication"),
    (&["forum", "reddit", "stack"], "forum"),
];

pub const FALLBACK_CATEGORY: &str = "other";

/// Classify a page by keyword match against its URL and domain.
/// Falls back to "other" when nothing matches.
pub fn classify_url(url: &str, domain: Option<&str>) -> &'static str {
    let url = url.to_lowercase();
    let domain = domain.map(str::to_lowercase).unwrap_or_default();

    for (needles, category) in CATEGORY_RULES {
        for needle in *needles {
            if url.contains(needle) || domain.contains(needle) {
                return category;
            }
        }
    }
    FALLBACK_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_match() {
        assert_eq!(
            classify_url("https://en.wikipedia.org/wiki/Rust", Some("en.wikipedia.org")),
            "reference"
        );
        assert_eq!(
            classify_url("https://www.reddit.com/r/rust", Some("www.reddit.com")),
            "forum"
        );
    }

    #[test]
    fn test_path_match() {
        assert_eq!(
            classify_url("https://example.com/cart/items", Some("example.com")),
            "shopping"
        );
    }

    #[test]
    fn test_rule_order_wins() {
        // "news" rules are checked before "video" ones
        assert_eq!(
            classify_url("https://news.youtube.com/", Some("news.youtube.com")),
            "news"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(classify_url("https://example.com/", Some("example.com")), "other");
        assert_eq!(classify_url("", None), "other");
    }
}
