//! Link deduplication.
//!
//! The three discovery queries overlap heavily (a project's GitHub page often
//! ranks for its docs query too), so links are merged by URL before capping.

use std::collections::HashSet;

use ideaforge_core::ResourceLink;

/// Keep the first occurrence of each URL, preserving order, up to `max` links.
pub fn dedupe_links(links: Vec<ResourceLink>, max: usize) -> Vec<ResourceLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.url.clone()))
        .take(max)
        .collect()
}
