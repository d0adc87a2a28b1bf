//! Chat Dossier - Assemble chat-export conversations into dossier documents
//!
//! This library turns normalized chat-export conversation records (roots plus
//! forked branches) into a deduplicated, source-annotated dossier. It
//! supports:
//!
//! - Grouping conversations into root-plus-branch threads by base title
//! - Trimming each branch down to its genuinely new suffix
//! - Rendering a navigable raw narrative with a sources registry
//! - An idempotent cleaning pipeline producing the working variant
//!   (tool-noise removal, citation stripping, dedup, deliverable extraction,
//!   source categorization, artifact quarantine)
//! - Config-driven control-layer front matter and a tagged working index
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use chat_dossier::grouping::build_groups;
//! use chat_dossier::input::load_conversations;
//! use chat_dossier::models::{BuildOptions, RenderContext};
//! use chat_dossier::render::render_raw;
//!
//! let conversations = load_conversations(Path::new("export.json"))?;
//! let groups = build_groups(conversations);
//! let ctx = RenderContext::new(1_700_000_000.0, PathBuf::from("export.json"));
//! let dossier = render_raw(&groups, &[], &BuildOptions::default(), &ctx)?;
//! println!("{} chars across {} sections", dossier.len(), groups.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod assemble;
pub mod cleaning;
pub mod cli;
pub mod config;
pub mod grouping;
pub mod index;
pub mod input;
pub mod models;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use assemble::build_working_document;
pub use grouping::{Group, build_groups, trim_branch_new_part};
pub use models::{BuildMode, BuildOptions, ConversationItem, Message, RenderContext};
pub use render::render_raw;
