use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use amora_types::theme::{ChatTheme, ChatThemeSettings, FontSize, ResolvedTheme};

use super::presets::{ThemeCatalog, default_settings};
use super::store::{SettingsStore, StoreError, storage_key};

/// Text color used on both bubble kinds when custom colors are on.
pub const CUSTOM_TEXT_COLOR: &str = "#1a1a1a";

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode theme settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Decode one field of a stored record. A missing or malformed field is
/// `None` and leaves its neighbours alone.
fn field<T: DeserializeOwned>(record: &Map<String, Value>, name: &str) -> Option<T> {
    let value = record.get(name)?;
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("Ignoring stored theme field '{}': {}", name, e);
            None
        }
    }
}

/// Resolve the stored theme. The id alone is enough to pick the live catalog
/// entry, so preset changes reach returning users; the stored copy is only
/// used for presets that no longer exist and must then be complete.
fn hydrate_theme(stored: &Value, catalog: &ThemeCatalog) -> Option<ChatTheme> {
    if let Some(live) = stored.get("id").and_then(Value::as_str).and_then(|id| catalog.find(id)) {
        return Some(live.clone());
    }
    match ChatTheme::deserialize(stored) {
        Ok(theme) => {
            debug!("Theme '{}' not in catalog, using stored copy", theme.id);
            Some(theme)
        }
        Err(e) => {
            debug!("Stored theme unusable, using default: {}", e);
            None
        }
    }
}

/// Parse a stored record field by field over the defaults. Returns `None`
/// when it is not valid JSON or not an object.
fn parse_settings(raw: &str, catalog: &ThemeCatalog) -> Option<ChatThemeSettings> {
    let Value::Object(record) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };
    let defaults = default_settings();

    Some(ChatThemeSettings {
        theme: record
            .get("theme")
            .and_then(|stored| hydrate_theme(stored, catalog))
            .unwrap_or(defaults.theme),
        font_size: field(&record, "fontSize").unwrap_or(defaults.font_size),
        use_custom_colors: field(&record, "useCustomColors").unwrap_or(defaults.use_custom_colors),
        custom_sent_color: field(&record, "customSentColor").unwrap_or(defaults.custom_sent_color),
        custom_received_color: field(&record, "customReceivedColor")
            .unwrap_or(defaults.custom_received_color),
        custom_background: field(&record, "customBackground").unwrap_or(defaults.custom_background),
    })
}

/// Load the settings for `principal`, falling back to defaults when nothing
/// usable is stored. Never fails.
pub fn load_settings<S: SettingsStore + ?Sized>(
    store: &S,
    catalog: &ThemeCatalog,
    principal: Option<&str>,
) -> ChatThemeSettings {
    let key = storage_key(principal);
    match store.get(&key) {
        Ok(Some(raw)) => parse_settings(&raw, catalog).unwrap_or_else(|| {
            warn!("Discarding unreadable theme settings under '{}'", key);
            default_settings()
        }),
        Ok(None) => default_settings(),
        Err(e) => {
            warn!("Failed to read theme settings under '{}': {}", key, e);
            default_settings()
        }
    }
}

pub fn font_size_class(size: FontSize) -> &'static str {
    match size {
        FontSize::Small => "text-sm",
        FontSize::Medium => "text-base",
        FontSize::Large => "text-lg",
    }
}

/// Compute render values. Custom colors override the preset and always
/// suppress the background image.
pub fn resolve(settings: &ChatThemeSettings) -> ResolvedTheme {
    let theme = &settings.theme;
    let custom = settings.use_custom_colors;
    let pick = |custom_value: &str, theme_value: &str| {
        (if custom { custom_value } else { theme_value }).to_string()
    };

    ResolvedTheme {
        sent_color: pick(&settings.custom_sent_color, &theme.sent_bubble_color),
        received_color: pick(&settings.custom_received_color, &theme.received_bubble_color),
        background: pick(&settings.custom_background, &theme.chat_background),
        background_image: if custom {
            None
        } else {
            theme.chat_background_image.clone()
        },
        header_background: pick(&settings.custom_background, &theme.header_background),
        input_background: pick(&settings.custom_background, &theme.input_background),
        sent_text_color: pick(CUSTOM_TEXT_COLOR, &theme.sent_text_color),
        received_text_color: pick(CUSTOM_TEXT_COLOR, &theme.received_text_color),
        font_size_class: font_size_class(settings.font_size).to_string(),
        emoji: theme.emoji.clone(),
    }
}

/// Owns one identity's chat theme settings.
///
/// Every update writes the complete record to the store first and only then
/// replaces the in-memory copy, so a failed write leaves the settings as
/// they were.
pub struct ThemeResolver<S> {
    store: S,
    catalog: ThemeCatalog,
    key: String,
    settings: ChatThemeSettings,
}

impl<S: SettingsStore> ThemeResolver<S> {
    pub fn load(store: S, principal: Option<&str>) -> Self {
        Self::load_with_catalog(store, ThemeCatalog::builtin(), principal)
    }

    pub fn load_with_catalog(store: S, catalog: ThemeCatalog, principal: Option<&str>) -> Self {
        let settings = load_settings(&store, &catalog, principal);
        Self {
            store,
            catalog,
            key: storage_key(principal),
            settings,
        }
    }

    pub fn settings(&self) -> &ChatThemeSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn resolved(&self) -> ResolvedTheme {
        resolve(&self.settings)
    }

    /// Whether `theme_id` is the preset currently in effect.
    pub fn is_active_preset(&self, theme_id: &str) -> bool {
        !self.settings.use_custom_colors && self.settings.theme.id == theme_id
    }

    /// Switch to a preset and turn custom colors off. Unknown ids are
    /// ignored; returns whether anything changed.
    pub fn select_preset(&mut self, theme_id: &str) -> Result<bool, ThemeError> {
        let Some(preset) = self.catalog.find(theme_id).cloned() else {
            debug!("Ignoring unknown theme preset '{}'", theme_id);
            return Ok(false);
        };
        let updated = ChatThemeSettings {
            theme: preset,
            use_custom_colors: false,
            ..self.settings.clone()
        };
        self.save(updated)?;
        Ok(true)
    }

    pub fn set_custom_colors(
        &mut self,
        sent: &str,
        received: &str,
        background: &str,
    ) -> Result<(), ThemeError> {
        let updated = ChatThemeSettings {
            use_custom_colors: true,
            custom_sent_color: sent.to_string(),
            custom_received_color: received.to_string(),
            custom_background: background.to_string(),
            ..self.settings.clone()
        };
        self.save(updated)
    }

    pub fn set_font_size(&mut self, font_size: FontSize) -> Result<(), ThemeError> {
        let updated = ChatThemeSettings {
            font_size,
            ..self.settings.clone()
        };
        self.save(updated)
    }

    /// Flip custom mode without touching the stored custom colors.
    pub fn toggle_custom_colors(&mut self, enabled: bool) -> Result<(), ThemeError> {
        let updated = ChatThemeSettings {
            use_custom_colors: enabled,
            ..self.settings.clone()
        };
        self.save(updated)
    }

    fn save(&mut self, updated: ChatThemeSettings) -> Result<(), ThemeError> {
        let encoded = serde_json::to_string(&updated)?;
        self.store.set(&self.key, &encoded)?;
        self.settings = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::presets::default_theme;
    use crate::theme::store::MemoryStore;

    struct ReadOnlyStore;

    impl SettingsStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }
    }

    fn theme(id: &str, sent: &str) -> ChatTheme {
        ChatTheme {
            id: id.to_string(),
            sent_bubble_color: sent.to_string(),
            ..default_theme()
        }
    }

    #[test]
    fn preset_colors_when_custom_is_off() {
        let catalog = ThemeCatalog::new(vec![theme("a", "#111")]);
        let settings = ChatThemeSettings {
            theme: catalog.find("a").unwrap().clone(),
            use_custom_colors: false,
            ..default_settings()
        };

        let resolved = resolve(&settings);
        assert_eq!(resolved.sent_color, "#111");
        assert_eq!(resolved.received_color, settings.theme.received_bubble_color);
        assert_eq!(resolved.background, settings.theme.chat_background);
        assert_eq!(resolved.background_image, settings.theme.chat_background_image);
        assert_eq!(resolved.header_background, settings.theme.header_background);
        assert_eq!(resolved.sent_text_color, settings.theme.sent_text_color);
    }

    #[test]
    fn toggling_custom_switches_to_custom_values() {
        let store = MemoryStore::new();
        let mut resolver = ThemeResolver::load(&store, Some("me"));
        let before = resolver.settings().clone();

        resolver.toggle_custom_colors(true).unwrap();
        let resolved = resolver.resolved();
        assert_eq!(resolved.sent_color, before.custom_sent_color);
        assert_eq!(resolved.received_color, before.custom_received_color);
        assert_eq!(resolved.background, before.custom_background);
        assert_eq!(resolved.background_image, None);
        assert_eq!(resolved.sent_text_color, CUSTOM_TEXT_COLOR);
        assert_eq!(resolved.input_background, before.custom_background);

        // Custom values survive toggling back and forth.
        resolver.set_custom_colors("#000001", "#000002", "#000003").unwrap();
        resolver.toggle_custom_colors(false).unwrap();
        assert_eq!(resolver.resolved().sent_color, before.theme.sent_bubble_color);
        resolver.toggle_custom_colors(true).unwrap();
        assert_eq!(resolver.resolved().sent_color, "#000001");
    }

    #[test]
    fn select_preset_disables_custom() {
        let store = MemoryStore::new();
        let mut resolver = ThemeResolver::load(&store, Some("me"));
        resolver.set_custom_colors("#1", "#2", "#3").unwrap();
        assert!(resolver.settings().use_custom_colors);

        assert!(resolver.select_preset("night-sky").unwrap());
        assert_eq!(resolver.settings().theme.id, "night-sky");
        assert!(!resolver.settings().use_custom_colors);
        assert_eq!(resolver.settings().custom_sent_color, "#1");
        assert!(resolver.is_active_preset("night-sky"));
        assert!(!resolver.is_active_preset("mint-fresh"));
    }

    #[test]
    fn unknown_preset_is_ignored() {
        let store = MemoryStore::new();
        let mut resolver = ThemeResolver::load(&store, Some("me"));
        resolver.select_preset("sunset-glow").unwrap();

        assert!(!resolver.select_preset("does-not-exist").unwrap());
        assert_eq!(resolver.settings().theme.id, "sunset-glow");
    }

    #[test]
    fn font_size_maps_to_classes() {
        assert_eq!(font_size_class(FontSize::Small), "text-sm");
        assert_eq!(font_size_class(FontSize::Medium), "text-base");
        assert_eq!(font_size_class(FontSize::Large), "text-lg");

        let store = MemoryStore::new();
        let mut resolver = ThemeResolver::load(&store, None);
        resolver.set_font_size(FontSize::Large).unwrap();
        assert_eq!(resolver.resolved().font_size_class, "text-lg");
    }

    #[test]
    fn corrupt_record_loads_defaults() {
        let store = MemoryStore::new();
        store.set(&storage_key(Some("me")), "{not valid").unwrap();
        let settings = load_settings(&store, &ThemeCatalog::builtin(), Some("me"));
        assert_eq!(settings, default_settings());

        for raw in ["null", "42", "[]", r#"{"fontSize":"huge"}"#] {
            store.set(&storage_key(Some("me")), raw).unwrap();
            assert_eq!(
                load_settings(&store, &ThemeCatalog::builtin(), Some("me")),
                default_settings()
            );
        }
    }

    #[test]
    fn partial_record_merges_over_defaults() {
        let store = MemoryStore::new();
        store
            .set(&storage_key(Some("me")), r##"{"fontSize":"small","customSentColor":"#ABCDEF"}"##)
            .unwrap();

        let settings = load_settings(&store, &ThemeCatalog::builtin(), Some("me"));
        assert_eq!(settings.font_size, FontSize::Small);
        assert_eq!(settings.custom_sent_color, "#ABCDEF");
        assert_eq!(settings.theme, default_theme());
        assert_eq!(settings.custom_background, default_settings().custom_background);
    }

    #[test]
    fn bad_field_keeps_the_rest_of_the_record() {
        let store = MemoryStore::new();
        store
            .set(
                &storage_key(Some("me")),
                r##"{"fontSize":"huge","useCustomColors":true,"customSentColor":"#ABCDEF"}"##,
            )
            .unwrap();

        let settings = load_settings(&store, &ThemeCatalog::builtin(), Some("me"));
        assert_eq!(settings.font_size, FontSize::Medium);
        assert!(settings.use_custom_colors);
        assert_eq!(settings.custom_sent_color, "#ABCDEF");
    }

    #[test]
    fn incomplete_stored_theme_is_found_by_id() {
        let store = MemoryStore::new();
        store
            .set(
                &storage_key(Some("me")),
                r##"{"theme":{"id":"night-sky","name":"Night Sky","sentBubbleColor":"#4F46E5"},"fontSize":"large","customSentColor":"#ABCDEF"}"##,
            )
            .unwrap();

        let catalog = ThemeCatalog::builtin();
        let settings = load_settings(&store, &catalog, Some("me"));
        assert_eq!(&settings.theme, catalog.find("night-sky").unwrap());
        assert_eq!(settings.font_size, FontSize::Large);
        assert_eq!(settings.custom_sent_color, "#ABCDEF");

        // Unknown id and not a full theme: only the theme falls back.
        store
            .set(&storage_key(Some("me")), r#"{"theme":{"id":"gone"},"fontSize":"small"}"#)
            .unwrap();
        let settings = load_settings(&store, &catalog, Some("me"));
        assert_eq!(settings.theme, default_theme());
        assert_eq!(settings.font_size, FontSize::Small);
    }

    #[test]
    fn persisted_preset_is_rehydrated_from_catalog() {
        let store = MemoryStore::new();
        {
            let mut resolver = ThemeResolver::load(&store, Some("me"));
            resolver.select_preset("mint-fresh").unwrap();
        }

        // The catalog changed its colors since the record was written.
        let updated = ThemeCatalog::new(vec![theme("mint-fresh", "#00FF00")]);
        let resolver = ThemeResolver::load_with_catalog(&store, updated, Some("me"));
        assert_eq!(resolver.resolved().sent_color, "#00FF00");
    }

    #[test]
    fn removed_preset_falls_back_to_stored_copy() {
        let store = MemoryStore::new();
        let retired = theme("retired", "#ABC123");
        let record = ChatThemeSettings {
            theme: retired.clone(),
            ..default_settings()
        };
        store
            .set(&storage_key(Some("me")), &serde_json::to_string(&record).unwrap())
            .unwrap();

        let resolver = ThemeResolver::load(&store, Some("me"));
        assert_eq!(resolver.settings().theme, retired);
        assert_eq!(resolver.resolved().sent_color, "#ABC123");
    }

    #[test]
    fn settings_are_scoped_per_identity() {
        let store = MemoryStore::new();
        ThemeResolver::load(&store, Some("alice"))
            .select_preset("night-sky")
            .unwrap();

        assert_eq!(ThemeResolver::load(&store, Some("alice")).settings().theme.id, "night-sky");
        assert_eq!(ThemeResolver::load(&store, Some("bob")).settings(), &default_settings());
        assert_eq!(ThemeResolver::load(&store, None).settings(), &default_settings());
    }

    #[test]
    fn failed_write_keeps_previous_settings() {
        let mut resolver = ThemeResolver::load(ReadOnlyStore, Some("me"));
        assert!(resolver.set_font_size(FontSize::Small).is_err());
        assert_eq!(resolver.settings(), &default_settings());
    }
}
