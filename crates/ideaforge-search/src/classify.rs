//! Link classification and description shaping.

use ideaforge_core::{defaults, LinkType};
use url::Url;

/// Derive a link's type from its URL, falling back to `default`.
///
/// - host contains `github.com` → github
/// - host contains `youtube.com` or `youtu.be` → youtube
/// - host contains `docs.`, or the path ends in `/docs` or has a `/docs/`
///   segment → docs
pub fn classify_url(raw: &str, default: LinkType) -> LinkType {
    let Ok(url) = Url::parse(raw) else {
        return default;
    };
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let path = url.path();

    if host.contains("github.com") {
        LinkType::Github
    } else if host.contains("youtube.com") || host.contains("youtu.be") {
        LinkType::Youtube
    } else if host.contains("docs.") || path.ends_with("/docs") || path.contains("/docs/") {
        LinkType::Docs
    } else {
        default
    }
}

/// Truncate a description to the maximum length, marking the cut with `...`.
///
/// Counts characters, not bytes, so multi-byte text never splits mid-char.
pub fn truncate_description(text: &str) -> String {
    let max = defaults::LINK_DESCRIPTION_MAX;
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
