use amora_types::theme::{ChatTheme, ChatThemeSettings, FontSize};

pub const DEFAULT_THEME_ID: &str = "pastel-dream";

pub const DEFAULT_CUSTOM_SENT: &str = "#F9A8D4";
pub const DEFAULT_CUSTOM_RECEIVED: &str = "#E9D5FF";
pub const DEFAULT_CUSTOM_BACKGROUND: &str = "#FFF0F6";

struct Preset {
    id: &'static str,
    name: &'static str,
    sent_bubble: &'static str,
    received_bubble: &'static str,
    sent_text: &'static str,
    received_text: &'static str,
    background: &'static str,
    background_image: &'static str,
    input: &'static str,
    header: &'static str,
    emoji: &'static str,
}

const PRESETS: &[Preset] = &[
    Preset {
        id: DEFAULT_THEME_ID,
        name: "Pastel Dream",
        sent_bubble: "#F9A8D4",
        received_bubble: "#E9D5FF",
        sent_text: "#831843",
        received_text: "#4C1D95",
        background: "#FFF0F6",
        background_image: "/assets/generated/chat-bg-pastel-dream.dim_400x400.png",
        input: "#FFF0F6",
        header: "#FCE7F3",
        emoji: "🌸",
    },
    Preset {
        id: "night-sky",
        name: "Night Sky",
        sent_bubble: "#4F46E5",
        received_bubble: "#1E293B",
        sent_text: "#EEF2FF",
        received_text: "#CBD5E1",
        background: "#0F172A",
        background_image: "/assets/generated/chat-bg-night-sky.dim_400x400.png",
        input: "#1E293B",
        header: "#1E293B",
        emoji: "✨",
    },
    Preset {
        id: "sunset-glow",
        name: "Sunset Glow",
        sent_bubble: "#FB923C",
        received_bubble: "#FDE68A",
        sent_text: "#431407",
        received_text: "#78350F",
        background: "#FFF7ED",
        background_image: "/assets/generated/chat-bg-sunset-glow.dim_400x400.png",
        input: "#FFF7ED",
        header: "#FFEDD5",
        emoji: "🌅",
    },
    Preset {
        id: "mint-fresh",
        name: "Mint Fresh",
        sent_bubble: "#6EE7B7",
        received_bubble: "#A7F3D0",
        sent_text: "#064E3B",
        received_text: "#065F46",
        background: "#ECFDF5",
        background_image: "/assets/generated/chat-bg-mint-fresh.dim_400x400.png",
        input: "#ECFDF5",
        header: "#D1FAE5",
        emoji: "🌿",
    },
];

impl Preset {
    fn to_theme(&self) -> ChatTheme {
        ChatTheme {
            id: self.id.to_string(),
            name: self.name.to_string(),
            sent_bubble_color: self.sent_bubble.to_string(),
            received_bubble_color: self.received_bubble.to_string(),
            sent_text_color: self.sent_text.to_string(),
            received_text_color: self.received_text.to_string(),
            chat_background: self.background.to_string(),
            chat_background_image: Some(self.background_image.to_string()),
            input_background: self.input.to_string(),
            header_background: self.header.to_string(),
            emoji: self.emoji.to_string(),
        }
    }
}

/// The set of preset themes a user can pick from.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<ChatTheme>,
}

impl ThemeCatalog {
    pub fn new(themes: Vec<ChatTheme>) -> Self {
        Self { themes }
    }

    /// The catalog shipped with the app.
    pub fn builtin() -> Self {
        Self::new(PRESETS.iter().map(Preset::to_theme).collect())
    }

    pub fn find(&self, id: &str) -> Option<&ChatTheme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn themes(&self) -> &[ChatTheme] {
        &self.themes
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn default_theme() -> ChatTheme {
    PRESETS[0].to_theme()
}

/// The record used for a new identity or when stored data is unusable.
pub fn default_settings() -> ChatThemeSettings {
    ChatThemeSettings {
        theme: default_theme(),
        font_size: FontSize::Medium,
        use_custom_colors: false,
        custom_sent_color: DEFAULT_CUSTOM_SENT.to_string(),
        custom_received_color: DEFAULT_CUSTOM_RECEIVED.to_string(),
        custom_background: DEFAULT_CUSTOM_BACKGROUND.to_string(),
    }
}
