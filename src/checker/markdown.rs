// src/checker/markdown.rs
// =============================================================================
// This module extracts candidate links from a post's Markdown source.
//
// Used by the offline `check` subcommand, where no planner is involved and
// the post file itself is the source of truth for which URLs to verify.
//
// pulldown-cmark parses Markdown into a stream of events; we pick out link
// destinations and keep only absolute http(s) ones. Relative links point
// inside the site being built and are not this tool's business.
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};

// Extracts all absolute HTTP/HTTPS link destinations from Markdown text.
//
// Covers inline links [text](url) and autolinks <https://...>. Skips
// mailto:, tel:, anchors and site-relative paths.
//
// Example:
//   "See [the docs](https://example.com/docs)." -> ["https://example.com/docs"]
pub fn extract_post_links(markdown: &str) -> Vec<String> {
    let mut links = Vec::new();

    for event in Parser::new(markdown) {
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            let url = dest_url.to_string();
            if is_web_link(&url) {
                links.push(url);
            }
        }
    }

    links
}

fn is_web_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
