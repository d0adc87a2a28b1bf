//! Data models for the dossier engine.
//!
//! - [`Message`] / [`ConversationItem`] - normalized conversation records
//! - [`BuildMode`] / [`BuildOptions`] - per-invocation build options
//! - [`RenderContext`] - explicit wall-clock/source context for rendering

pub mod conversation;
pub mod options;

pub use conversation::{ConversationItem, Message, base_title};
pub use options::{BuildMode, BuildOptions, MAX_CONTEXT, MIN_CONTEXT, RenderContext};
