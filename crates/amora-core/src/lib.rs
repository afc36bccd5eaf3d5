//! Client-side product logic for Amora: conversation timelines, match
//! derivation, chat theming and the polling chat session that ties them to a
//! [`Backend`](backend::Backend).

pub mod backend;
pub mod conversation;
pub mod discovery;
pub mod media;
pub mod memory;
pub mod session;
pub mod theme;

pub use backend::{Backend, BackendError};
pub use conversation::{Conversation, ConversationSummary, TimelineEntry};
