//! Locale parsing and negotiation

use crate::{I18nError, Result};
use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use unic_langid::LanguageIdentifier;

/// Locale used when nothing requested is available
pub const DEFAULT_LOCALE: &str = "en-US";

const SUPPORTED: [&str; 2] = ["en-US", "zh-TW"];

/// Parse a BCP 47 language tag
pub fn parse(tag: &str) -> Result<LanguageIdentifier> {
    tag.parse()
        .map_err(|_| I18nError::InvalidLocale(tag.to_string()))
}

/// Locales with bundled translations
pub fn supported_locales() -> Vec<LanguageIdentifier> {
    SUPPORTED.iter().filter_map(|tag| tag.parse().ok()).collect()
}

fn default_locale() -> LanguageIdentifier {
    DEFAULT_LOCALE.parse().unwrap_or_default()
}

/// Pick the best bundled locale for the user's preferred tags
///
/// Tags that fail to parse are skipped.
pub fn negotiate<S: AsRef<str>>(requested: &[S]) -> LanguageIdentifier {
    let requested: Vec<LanguageIdentifier> = requested
        .iter()
        .filter_map(|tag| tag.as_ref().parse().ok())
        .collect();
    let available = supported_locales();
    let default = default_locale();

    let chosen = negotiate_languages(
        &requested,
        &available,
        Some(&default),
        NegotiationStrategy::Lookup,
    );
    let locale = chosen
        .first()
        .map(|locale| (*locale).clone())
        .unwrap_or_else(default_locale);
    locale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(parse("zh-TW").unwrap().to_string(), "zh-TW");
        assert!(matches!(parse("not a tag!"), Err(I18nError::InvalidLocale(_))));
    }

    #[test]
    fn test_supported_locales() {
        let locales: Vec<String> = supported_locales().iter().map(|l| l.to_string()).collect();
        assert_eq!(locales, vec!["en-US", "zh-TW"]);
    }

    #[test]
    fn test_negotiate_exact_match() {
        assert_eq!(negotiate(&["zh-TW", "en-US"]).to_string(), "zh-TW");
        assert_eq!(negotiate(&["en-US"]).to_string(), "en-US");
    }

    #[test]
    fn test_negotiate_falls_back_to_default() {
        assert_eq!(negotiate(&["fr-FR"]).to_string(), "en-US");
        assert_eq!(negotiate::<&str>(&[]).to_string(), "en-US");
        assert_eq!(negotiate(&["???"]).to_string(), "en-US");
    }
}
