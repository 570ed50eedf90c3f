//! HTML parsing and data extraction
//!
//! This module handles parsing Kleinanzeigen listing and detail pages and
//! projecting the extracted text onto comparable numbers.

pub mod html;
pub mod normalize;
pub mod selectors;

// Re-export main parsers and public types
pub use html::{extract_fields, extract_listing_links, parse_max_page};
pub use normalize::{normalize, NumericKey};
pub use selectors::{
    DetailPolicy, FieldPolicy, LabeledDetail, ListingLinkPolicy, PaginationPolicy, PriceById,
};
