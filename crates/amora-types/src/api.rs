use serde::{Deserialize, Serialize};

use crate::models::{Decision, Direction, UserId};
use crate::theme::{ChatTheme, ChatThemeSettings, FontSize, ResolvedTheme};

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub sent: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMessageResponse {
    pub direction: Direction,
    pub sender: UserId,
    pub content: String,
    pub image: Option<String>,
    pub timestamp: i64,
    pub sent_at: chrono::DateTime<chrono::Utc>,
    pub read: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub partner: UserId,
    pub messages: Vec<TimelineMessageResponse>,
    pub unread_count: u64,
    pub marked_read: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryResponse {
    pub partner: UserId,
    pub display_name: Option<String>,
    pub last_message: Option<TimelineMessageResponse>,
    pub unread_count: u64,
}

// -- Matches --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchDecisionRequest {
    pub id: UserId,
    pub decision: Decision,
}

// -- Profiles --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub display_name: String,
    pub age: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub photo: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub id: i64,
}

// -- Theme --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SelectPresetRequest {
    pub theme_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomColorsRequest {
    pub sent: String,
    pub received: String,
    pub background: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FontSizeRequest {
    pub font_size: FontSize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleCustomColorsRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub settings: ChatThemeSettings,
    pub resolved: ResolvedTheme,
}

#[derive(Debug, Serialize)]
pub struct PresetListResponse {
    pub presets: Vec<ChatTheme>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
