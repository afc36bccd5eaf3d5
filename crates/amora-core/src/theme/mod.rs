//! Chat theme preferences: the preset catalog, resolution of settings into
//! render values, and per-identity persistence.

pub mod presets;
pub mod resolver;
pub mod store;

pub use presets::{ThemeCatalog, default_settings};
pub use resolver::{ThemeError, ThemeResolver, font_size_class, load_settings, resolve};
pub use store::{JsonFileStore, MemoryStore, SettingsStore, StoreError, storage_key};
