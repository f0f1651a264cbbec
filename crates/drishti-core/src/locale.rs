//! Supported locales and boundary normalization.
//!
//! The engine applies locale defaulting exactly once, at the `resolve`
//! boundary. Everything downstream (resolver, request builder, validator,
//! cache fingerprint) receives an already-normalized code and never
//! re-applies the default.

/// Base locale: catalog base fields and repair fallbacks default to English.
pub const DEFAULT_LOCALE: &str = "en";

/// Locales the shipped catalog carries translations for. Ordering is stable
/// for presentation.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "hi", "bho", "pa"];

/// Normalizes a raw locale code: trim, lowercase, and fall back to
/// [`DEFAULT_LOCALE`] when unset, empty, or unknown.
pub fn normalize_locale(raw: &str) -> String {
    let code = raw.trim().to_lowercase();
    if SUPPORTED_LOCALES.contains(&code.as_str()) {
        code
    } else {
        DEFAULT_LOCALE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_locales_pass_through() {
        assert_eq!(normalize_locale("hi"), "hi");
        assert_eq!(normalize_locale(" PA "), "pa");
        assert_eq!(normalize_locale("bho"), "bho");
    }

    #[test]
    fn unknown_and_empty_fall_back_to_english() {
        assert_eq!(normalize_locale(""), "en");
        assert_eq!(normalize_locale("fr"), "en");
        assert_eq!(normalize_locale("   "), "en");
    }
}
