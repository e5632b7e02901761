// src/checker/normalize.rs
// =============================================================================
// This module canonicalizes raw link strings into fetchable absolute URLs.
//
// Rules:
// - Non-web targets (mailto:, tel:, javascript:, etc.) are excluded entirely
// - Links without an explicit scheme are assumed HTTPS
// - The set is de-duplicated by normalized string equality, keeping the
//   order of first appearance
//
// Pure string transformation, no network and no side effects.
// =============================================================================

use std::collections::HashSet;

// Schemes that identify something other than a fetchable web resource.
// Anything here is dropped before the checker ever sees it.
const EXCLUDED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:", "ftp:", "file:"];

// Canonicalizes one raw link string.
//
// Returns None when the link does not point at a web resource (an email
// address, a phone number, a bare fragment, an empty string); otherwise the
// absolute URL to fetch.
//
// Example:
//   "example.com/page"       -> Some("https://example.com/page")
//   "https://example.com"    -> Some("https://example.com")
//   "mailto:me@example.com"  -> None
pub fn normalize_link(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let lower = raw.to_ascii_lowercase();

    if EXCLUDED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return None;
    }

    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(raw.to_string())
    } else {
        // No scheme given: assume HTTPS, the sane default for a blog link.
        Some(format!("https://{raw}"))
    }
}

// Normalizes a whole candidate set: exclusion, scheme inference, and
// de-duplication so no URL is verified twice in one run.
pub fn normalize_links(raws: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for raw in raws {
        if let Some(link) = normalize_link(raw) {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_inferred_for_bare_domains() {
        assert_eq!(
            normalize_link("example.com/page"),
            Some("https://example.com/page".to_string())
        );
    }

    #[test]
    fn explicit_schemes_kept_as_is() {
        assert_eq!(
            normalize_link("http://example.com"),
            Some("http://example.com".to_string())
        );
        assert_eq!(
            normalize_link("https://example.com"),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn non_web_targets_excluded() {
        assert_eq!(normalize_link("mailto:me@example.com"), None);
        assert_eq!(normalize_link("tel:+15551234567"), None);
        assert_eq!(normalize_link("javascript:void(0)"), None);
        assert_eq!(normalize_link("#section"), None);
        assert_eq!(normalize_link(""), None);
        assert_eq!(normalize_link("   "), None);
    }

    #[test]
    fn duplicates_collapse_keeping_first_appearance_order() {
        let raws = vec![
            "https://b.test".to_string(),
            "https://a.test".to_string(),
            "https://b.test".to_string(),
        ];
        assert_eq!(
            normalize_links(&raws),
            vec!["https://b.test".to_string(), "https://a.test".to_string()]
        );
    }

    #[test]
    fn bare_and_explicit_https_forms_are_the_same_link() {
        let raws = vec![
            "example.com/page".to_string(),
            "https://example.com/page".to_string(),
        ];
        assert_eq!(
            normalize_links(&raws),
            vec!["https://example.com/page".to_string()]
        );
    }

    #[test]
    fn mixed_set_keeps_only_web_links() {
        let raws = vec![
            "mailto:me@example.com".to_string(),
            "https://example.com".to_string(),
        ];
        assert_eq!(
            normalize_links(&raws),
            vec!["https://example.com".to_string()]
        );
    }
}
