//! Internationalization (i18n) support
//!
//! User-facing messages (CLI output, error descriptions, progress events) are
//! looked up by stable keys in `locales/*.yml`. Supported languages: English
//! (en) and German (de).
//!
//! # Environment Variables
//!
//! - `FIRECHAIR_LANG`: preferred language (en, de). Defaults to English.

use std::sync::OnceLock;

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

static CURRENT_LOCALE: OnceLock<String> = OnceLock::new();

/// Set the current locale for translations
///
/// # Examples
///
/// ```rust,ignore
/// use firechair::i18n::set_locale;
///
/// set_locale("de");
/// ```
pub fn set_locale(locale: &str) {
    let normalized = normalize_locale(locale);
    rust_i18n::set_locale(&normalized);
    CURRENT_LOCALE.get_or_init(|| normalized.clone());
}

/// Get the locale set first in this process, or the fallback
pub fn current_locale() -> &'static str {
    CURRENT_LOCALE.get().map(|s| s.as_str()).unwrap_or("en")
}

/// Initialize i18n from the `FIRECHAIR_LANG` environment variable
pub fn init_from_env() {
    let locale = std::env::var("FIRECHAIR_LANG").unwrap_or_else(|_| "en".to_string());
    set_locale(&locale);
}

/// Normalize locale code to a supported one
///
/// - de-DE, de_AT, german, deutsch -> de
/// - anything else -> en
pub fn normalize_locale(locale: &str) -> String {
    let lower = locale.to_lowercase();

    if lower.starts_with("de") || lower == "german" {
        "de".to_string()
    } else {
        "en".to_string()
    }
}

/// Translate a key with optional parameters
///
/// Re-export of `rust_i18n::t!`.
///
/// ```rust,ignore
/// use firechair::i18n::t;
///
/// let msg = t!("crawl.no_data");
/// let msg_with_args = t!("cli.crawl.progress", completed = 1, total = 10, url = "...");
/// ```
#[doc(inline)]
pub use rust_i18n::t;
