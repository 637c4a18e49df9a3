//! Message lookup and formatting

use crate::{lang, I18nError, Result};
use fluent::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use tracing::warn;
use unic_langid::LanguageIdentifier;

const EN_US: &str = include_str!("../locales/en-US/wayfinder.ftl");
const ZH_TW: &str = include_str!("../locales/zh-TW/wayfinder.ftl");

fn source_for(locale: &LanguageIdentifier) -> Option<&'static str> {
    match locale.to_string().as_str() {
        "en-US" => Some(EN_US),
        "zh-TW" => Some(ZH_TW),
        _ => None,
    }
}

/// Translator over one bundled locale
///
/// Missing messages format as their id so a gap in a locale shows up on
/// screen instead of an empty label.
pub struct Translator {
    locale: LanguageIdentifier,
    bundle: FluentBundle<FluentResource>,
}

impl Translator {
    /// Load the bundled messages for a locale
    pub fn new(locale: &LanguageIdentifier) -> Result<Self> {
        let source =
            source_for(locale).ok_or_else(|| I18nError::UnsupportedLocale(locale.to_string()))?;

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| I18nError::Resource(format!("{:?}", errors)))?;

        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| I18nError::Resource(format!("{:?}", errors)))?;

        Ok(Self {
            locale: locale.clone(),
            bundle,
        })
    }

    /// Load the best bundled locale for the user's preferred tags
    pub fn negotiated<S: AsRef<str>>(requested: &[S]) -> Result<Self> {
        Self::new(&lang::negotiate(requested))
    }

    /// The locale messages come from
    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    /// Whether a message exists
    pub fn has(&self, id: &str) -> bool {
        self.bundle.has_message(id)
    }

    /// Format a message without arguments
    pub fn tr(&self, id: &str) -> String {
        self.format(id, None)
    }

    /// Format a message with a `count` argument
    pub fn tr_count(&self, id: &str, count: u64) -> String {
        let mut args = FluentArgs::new();
        args.set("count", FluentValue::from(count));
        self.format(id, Some(&args))
    }

    /// Format a message
    pub fn format(&self, id: &str, args: Option<&FluentArgs>) -> String {
        let Some(pattern) = self.bundle.get_message(id).and_then(|m| m.value()) else {
            warn!("Missing message {} for {}", id, self.locale);
            return id.to_string();
        };

        let mut errors = Vec::new();
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!("Errors formatting {}: {:?}", id, errors);
        }
        value.into_owned()
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
