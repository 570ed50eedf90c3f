//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use regex::Regex;
use std::sync::OnceLock;

use error::ValidationError;

/// Separator used in place of whitespace inside a normalized query
pub const QUERY_SEPARATOR: char = '-';

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Turn a free-text model string into the query used in listing URLs
///
/// Trims the input and replaces each whitespace run with
/// [`QUERY_SEPARATOR`]. An input that is empty after trimming is rejected.
///
/// # Examples
///
/// ```
/// use firechair::utils::normalize_query;
///
/// assert_eq!(normalize_query(" honda  cbr 600f ").unwrap(), "honda-cbr-600f");
/// assert!(normalize_query("   ").is_err());
/// ```
pub fn normalize_query(model: &str) -> Result<String, ValidationError> {
    let collapsed = normalize_whitespace(model);
    if collapsed.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    Ok(collapsed.replace(' ', &QUERY_SEPARATOR.to_string()))
}

/// Sanitize filename by removing invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();

    let re =
        INVALID_CHARS.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Invalid regex pattern"));

    re.replace_all(filename, "_").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello   world  "), "hello world");
        assert_eq!(normalize_whitespace("hello\n\nworld"), "hello world");
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("honda cbr 600f").unwrap(), "honda-cbr-600f");
        assert_eq!(normalize_query("\tyamaha\n r6 ").unwrap(), "yamaha-r6");
        assert_eq!(normalize_query("mt-07").unwrap(), "mt-07");
    }

    #[test]
    fn test_normalize_query_empty() {
        assert_eq!(normalize_query(""), Err(ValidationError::EmptyQuery));
        assert_eq!(normalize_query(" \t\n"), Err(ValidationError::EmptyQuery));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("file<name>.csv"), "file_name_.csv");
        assert_eq!(sanitize_filename("honda-cbr-600f"), "honda-cbr-600f");
        assert_eq!(sanitize_filename("a/b"), "a_b");
    }
}
