use serde::{Deserialize, Serialize};

/// A named bundle of chat colors, background art and an emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTheme {
    pub id: String,
    pub name: String,
    pub sent_bubble_color: String,
    pub received_bubble_color: String,
    pub sent_text_color: String,
    pub received_text_color: String,
    pub chat_background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_background_image: Option<String>,
    pub input_background: String,
    pub header_background: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

/// Per-identity chat display preferences, stored as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThemeSettings {
    pub theme: ChatTheme,
    pub font_size: FontSize,
    pub use_custom_colors: bool,
    pub custom_sent_color: String,
    pub custom_received_color: String,
    pub custom_background: String,
}

/// Concrete render values computed from a [`ChatThemeSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTheme {
    pub sent_color: String,
    pub received_color: String,
    pub background: String,
    pub background_image: Option<String>,
    pub header_background: String,
    pub input_background: String,
    pub sent_text_color: String,
    pub received_text_color: String,
    pub font_size_class: String,
    pub emoji: String,
}
