//! # docmark engine
//!
//! Converts between Markdown and an offset-addressed rich document model.
//!
//! - Forward: [`tokenize`] Markdown, then [`compile`] the tokens into
//!   [`EditOperation`]s that build the formatted document when applied in
//!   order.
//! - Reverse: [`render`] a fetched [`DocumentModel`] back to Markdown.
//!
//! ## Modules
//!
//! - [`tokens`]: token contract and the `pulldown-cmark` adapter
//! - [`compiler`]: forward compiler
//! - [`ops`]: edit operations and their wire shape
//! - [`model`]: document model consumed by the renderer
//! - [`render`]: reverse renderer
//! - [`batch`]: phase-ordered batch planning for applying operations
//! - [`span`]: offset ranges

pub mod batch;
pub mod compiler;
pub mod error;
pub mod model;
pub mod ops;
pub mod render;
pub mod span;
pub mod tokens;

// Re-export key types for easier usage
pub use batch::{Batch, BatchSummary, Phase, plan_batches};
pub use compiler::{CompileOptions, compile, compile_markdown, compile_replacement};
pub use error::CompileError;
pub use model::{Block, DocumentModel, InlineRun, ListRegistry, Paragraph};
pub use ops::{BulletPreset, EditOperation, NamedStyle, ParagraphStyle, TextStyle};
pub use render::render;
pub use span::Span;
pub use tokens::{Token, tokenize};
