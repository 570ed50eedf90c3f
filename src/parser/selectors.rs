//! Extraction policies for the Kleinanzeigen markup
//!
//! Every structural assumption about the target site lives here: CSS
//! selectors, label keywords and the listing path prefix. Each extracted
//! field has exactly one [`FieldPolicy`], so a markup change means editing
//! one policy object.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::utils::error::ParseError;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

/// Path prefix that marks a detail page (as opposed to category, ad or nav links)
pub const LISTING_PATH_PREFIX: &str = "/s-anzeige/";

/// Label text identifying the mileage entry in the detail attribute list
pub const MILEAGE_LABEL: &str = "Kilometerstand";

lazy_static! {
    static ref PAGINATION_PAGE: Selector = parse_selector!("a.pagination-page");

    static ref ANCHOR: Selector = parse_selector!("a[href]");

    static ref PRICE: Selector = parse_selector!("h2#viewad-price");

    static ref DETAIL_ITEM: Selector = parse_selector!("li.addetailslist--detail");

    static ref DETAIL_VALUE: Selector = parse_selector!("span.addetailslist--detail--value");
}

/// Compile a selector, reporting the offending text on failure
pub fn compile_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Text of an element, `None` when blank
///
/// Each text node is trimmed and the pieces are concatenated without a
/// separator. Whitespace inside a node is kept as the page has it.
pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text: String = element.text().map(str::trim).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extraction rule for one listing field
pub trait FieldPolicy: Send + Sync {
    /// Field name used in logs
    fn name(&self) -> &'static str;

    /// Raw field text, or `None` when the page does not carry it
    fn extract(&self, document: &Html) -> Option<String>;
}

/// Field read from a single element located by selector (e.g. an id)
pub struct PriceById {
    selector: Selector,
}

impl PriceById {
    pub fn new(selector: &str) -> Result<Self, ParseError> {
        Ok(Self {
            selector: compile_selector(selector)?,
        })
    }
}

impl Default for PriceById {
    fn default() -> Self {
        Self {
            selector: PRICE.clone(),
        }
    }
}

impl FieldPolicy for PriceById {
    fn name(&self) -> &'static str {
        "price"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        document.select(&self.selector).next().and_then(element_text)
    }
}

/// Field read from a label/value attribute list
///
/// Scans `item` elements for the first one whose text contains `label`
/// and returns the text of its `value` child.
pub struct LabeledDetail {
    item: Selector,
    value: Selector,
    label: String,
}

impl LabeledDetail {
    pub fn new(item: &str, value: &str, label: impl Into<String>) -> Result<Self, ParseError> {
        Ok(Self {
            item: compile_selector(item)?,
            value: compile_selector(value)?,
            label: label.into(),
        })
    }

    /// Mileage entry of the Kleinanzeigen detail list
    pub fn mileage() -> Self {
        Self {
            item: DETAIL_ITEM.clone(),
            value: DETAIL_VALUE.clone(),
            label: MILEAGE_LABEL.to_string(),
        }
    }
}

impl FieldPolicy for LabeledDetail {
    fn name(&self) -> &'static str {
        "mileage"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let item = document
            .select(&self.item)
            .find(|li| li.text().collect::<String>().contains(&self.label))?;

        item.select(&self.value).next().and_then(element_text)
    }
}

/// Where the pagination controls are
pub struct PaginationPolicy {
    pub page_label: Selector,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            page_label: PAGINATION_PAGE.clone(),
        }
    }
}

/// Which anchors on a listing page point at detail pages
pub struct ListingLinkPolicy {
    pub anchor: Selector,
    pub path_prefix: String,
}

impl Default for ListingLinkPolicy {
    fn default() -> Self {
        Self {
            anchor: ANCHOR.clone(),
            path_prefix: LISTING_PATH_PREFIX.to_string(),
        }
    }
}

/// Field policies applied to a detail page
pub struct DetailPolicy {
    pub price: Box<dyn FieldPolicy>,
    pub mileage: Box<dyn FieldPolicy>,
}

impl Default for DetailPolicy {
    fn default() -> Self {
        Self {
            price: Box::new(PriceById::default()),
            mileage: Box::new(LabeledDetail::mileage()),
        }
    }
}
