//! Fluent-based message catalog with per-language bundles.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

const SUPPORTED_LOCALES: &[&str] = &["en"];
const FALLBACK_LOCALE: &str = "en";

/// Localization manager for the FitTrack bot.
pub struct LocalizationManager {
    bundles: HashMap<String, Arc<FluentBundle<FluentResource>>>,
}

impl LocalizationManager {
    /// Create a new localization manager with all supported locales.
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for locale in SUPPORTED_LOCALES {
            let langid: LanguageIdentifier = locale.parse()?;
            let bundle = Self::create_bundle(&langid);
            bundles.insert(locale.to_string(), Arc::new(bundle));
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale.
    fn create_bundle(locale: &LanguageIdentifier) -> FluentBundle<FluentResource> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Keep placeables plain; the bidi isolation marks confuse Telegram clients.
        bundle.set_use_isolating(false);

        let resource_path = format!("./locales/{locale}/main.ftl");
        if let Ok(content) = fs::read_to_string(&resource_path) {
            if let Ok(resource) = FluentResource::try_new(content) {
                let _ = bundle.add_resource(resource);
            }
        }

        bundle
    }

    /// Pick the bundle for a Telegram language code, falling back to English.
    fn bundle_for(&self, language_code: Option<&str>) -> Option<&Arc<FluentBundle<FluentResource>>> {
        if let Some(code) = language_code {
            let primary = code.split('-').next().unwrap_or(code).to_lowercase();
            if let Some(bundle) = self.bundles.get(&primary) {
                return Some(bundle);
            }
        }
        self.bundles.get(FALLBACK_LOCALE)
    }

    /// Get a localized message.
    pub fn get_message(
        &self,
        key: &str,
        args: Option<&FluentArgs>,
        language_code: Option<&str>,
    ) -> String {
        let bundle = match self.bundle_for(language_code) {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {key}"),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let mut errors = vec![];
        bundle.format_pattern(pattern, args, &mut errors).to_string()
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager. A repeated call is a no-op.
pub fn init_localization() -> Result<()> {
    let manager = LocalizationManager::new()?;
    let _ = LOCALIZATION_MANAGER.set(manager);
    Ok(())
}

/// Get a localized message for a Telegram language code.
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    match LOCALIZATION_MANAGER.get() {
        Some(manager) => manager.get_message(key, None, language_code),
        None => key.to_string(),
    }
}

/// Get a localized message with arguments for a Telegram language code.
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    match LOCALIZATION_MANAGER.get() {
        Some(manager) => {
            let fluent_args = FluentArgs::from_iter(
                args.iter().map(|(name, value)| (*name, FluentValue::from(*value))),
            );
            manager.get_message(key, Some(&fluent_args), language_code)
        }
        None => key.to_string(),
    }
}
