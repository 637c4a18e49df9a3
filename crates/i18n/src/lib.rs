//! Internationalization for Wayfinder
//!
//! This crate provides the Fluent-backed translator used for user-facing
//! labels, with language negotiation against the bundled locales.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lang;
pub mod translator;

pub use fluent::{FluentArgs, FluentValue};
pub use lang::{negotiate, supported_locales, DEFAULT_LOCALE};
pub use translator::Translator;
pub use unic_langid::LanguageIdentifier;

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Error types for i18n operations
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    /// A language tag could not be parsed
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// No bundled resource for the locale
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// A bundled resource failed to parse or load
    #[error("Resource error: {0}")]
    Resource(String),
}
