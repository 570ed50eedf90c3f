//! HTML page parsers for listing, pagination and detail pages
//!
//! These functions take raw HTML and return owned values so no parsed
//! document is held across an await point by the async crawler stages.

use std::collections::HashSet;

use scraper::Html;

use crate::crawler::url::PageUrlBuilder;
use crate::models::ListingFields;
use crate::parser::selectors::{DetailPolicy, ListingLinkPolicy, PaginationPolicy};

/// Highest integer page label among the pagination controls
///
/// Labels that are not integers ("Weiter", "…") are skipped. Returns `None`
/// when the page carries no integer-labelled control.
pub fn parse_max_page(html: &str, policy: &PaginationPolicy) -> Option<u32> {
    let document = Html::parse_document(html);

    document
        .select(&policy.page_label)
        .filter_map(|link| {
            link.text()
                .collect::<String>()
                .trim()
                .parse::<u32>()
                .ok()
        })
        .max()
}

/// Absolute detail-page URLs linked from a listing page
///
/// Keeps anchors that resolve to the site's own host and whose path starts
/// with the listing prefix. Duplicates are dropped, keeping the first
/// occurrence, so the result follows document order.
pub fn extract_listing_links(
    html: &str,
    policy: &ListingLinkPolicy,
    urls: &PageUrlBuilder,
) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&policy.anchor) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let Some(resolved) = urls.absolutize(href.trim()) else {
            tracing::trace!(href, "Skipping unresolvable href");
            continue;
        };

        if !urls.is_same_site(&resolved) || !resolved.path().starts_with(&policy.path_prefix) {
            continue;
        }

        let url = resolved.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

/// Price and mileage of a detail page
pub fn extract_fields(html: &str, policy: &DetailPolicy) -> ListingFields {
    let document = Html::parse_document(html);

    let price = policy.price.extract(&document);
    let mileage = policy.mileage.extract(&document);

    if price.is_none() {
        tracing::debug!(field = policy.price.name(), "Field not found on detail page");
    }
    if mileage.is_none() {
        tracing::debug!(field = policy.mileage.name(), "Field not found on detail page");
    }

    ListingFields { price, mileage }
}
