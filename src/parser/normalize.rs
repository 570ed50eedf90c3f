//! Numeric projection of raw price and mileage text
//!
//! Raw field text is stored verbatim; this projection exists only to compare
//! listings. Absent or unparsable text maps to [`NumericKey::Infinite`], which
//! orders after every real value so such listings never win a minimum.

use serde::{Serialize, Serializer};

/// Comparison key for a price or mileage field
///
/// Variant order defines the ordering: every `Finite` value is less than
/// `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKey {
    Finite(u64),
    Infinite,
}

impl NumericKey {
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Infinite => None,
        }
    }
}

impl std::fmt::Display for NumericKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v}"),
            Self::Infinite => write!(f, "inf"),
        }
    }
}

impl Serialize for NumericKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(v) => serializer.serialize_u64(*v),
            Self::Infinite => serializer.serialize_none(),
        }
    }
}

/// Tokens removed before parsing, matched case-insensitively
///
/// `kilometer` must be stripped before `km`.
const STRIP_TOKENS: &[&str] = &["kilometer", "km", "€", "."];

/// Project raw field text onto a comparable integer
///
/// Strips thousands separators, the currency symbol, the units `km` and
/// `Kilometer` (any case) and all whitespace, then parses the remainder.
///
/// # Examples
///
/// ```
/// use firechair::parser::normalize::{normalize, NumericKey};
///
/// assert_eq!(normalize(Some("3.200 €")), NumericKey::Finite(3200));
/// assert_eq!(normalize(Some("45.000 KM")), NumericKey::Finite(45000));
/// assert_eq!(normalize(Some("VB")), NumericKey::Infinite);
/// assert_eq!(normalize(None), NumericKey::Infinite);
/// ```
pub fn normalize(raw: Option<&str>) -> NumericKey {
    let Some(raw) = raw else {
        return NumericKey::Infinite;
    };

    let mut cleaned = raw.to_lowercase();
    for token in STRIP_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    cleaned.retain(|c| !c.is_whitespace());

    match cleaned.parse::<u64>() {
        Ok(value) => NumericKey::Finite(value),
        Err(_) => NumericKey::Infinite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_price_formats() {
        assert_eq!(normalize(Some("3.200 €")), NumericKey::Finite(3200));
        assert_eq!(normalize(Some("2.900 €")), NumericKey::Finite(2900));
        assert_eq!(normalize(Some("€ 750")), NumericKey::Finite(750));
        assert_eq!(normalize(Some("1.234.567 €")), NumericKey::Finite(1_234_567));
    }

    #[test]
    fn test_mileage_formats() {
        assert_eq!(normalize(Some("45.000 km")), NumericKey::Finite(45000));
        assert_eq!(normalize(Some("12.000 KM")), NumericKey::Finite(12000));
        assert_eq!(normalize(Some("8.500 Kilometer")), NumericKey::Finite(8500));
        assert_eq!(normalize(Some("8 500 kilometer")), NumericKey::Finite(8500));
        assert_eq!(normalize(Some("  0 km ")), NumericKey::Finite(0));
    }

    #[test]
    fn test_sentinel_for_missing_or_garbled() {
        assert_eq!(normalize(None), NumericKey::Infinite);
        assert_eq!(normalize(Some("")), NumericKey::Infinite);
        assert_eq!(normalize(Some("not-a-number")), NumericKey::Infinite);
        assert_eq!(normalize(Some("2.900 € VB")), NumericKey::Infinite);
        assert_eq!(normalize(Some("Zu verschenken")), NumericKey::Infinite);
        assert_eq!(normalize(Some("-5 €")), NumericKey::Infinite);
        assert_eq!(normalize(None), normalize(Some("not-a-number")));
    }

    #[test]
    fn test_infinite_orders_last() {
        assert!(NumericKey::Finite(u64::MAX) < NumericKey::Infinite);
        assert!(NumericKey::Finite(0) < NumericKey::Finite(1));
        assert!(!NumericKey::Infinite.is_finite());
        assert_eq!(NumericKey::Finite(7).value(), Some(7));
        assert_eq!(NumericKey::Infinite.value(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(NumericKey::Finite(2900).to_string(), "2900");
        assert_eq!(NumericKey::Infinite.to_string(), "inf");
    }

    proptest! {
        #[test]
        fn normalize_never_panics(s in ".*") {
            let _ = normalize(Some(&s));
        }

        #[test]
        fn normalize_recovers_formatted_integers(n in 0u64..10_000_000) {
            let formatted = format!("{n} €");
            prop_assert_eq!(normalize(Some(&formatted)), NumericKey::Finite(n));

            let km = format!("{n} km");
            prop_assert_eq!(normalize(Some(&km)), NumericKey::Finite(n));
        }
    }
}
