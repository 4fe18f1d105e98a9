//! Parsing and rewriting of mod changelogs.
//!
//! The file is a flat list of entries, newest first, each opened by a long
//! separator line:
//!
//! ```text
//! ---------------------------------------------------------------------------------------------------
//! Version: 1.2.3
//! Date: 05. 03. 2024
//!   Features:
//!     - Added X
//! ```
//!
//! Only the topmost entry is ever rewritten; everything below it is emitted
//! exactly as it was read.

pub mod config;
pub mod core;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod rewriter;
pub mod types;
mod utils;

pub use crate::config::ChangelogConfig;
pub use crate::core::Changelog;
pub use crate::error::ChangelogError;
pub use crate::formatter::DocumentFormatter;
pub use crate::parser::Parser;
pub use crate::rewriter::{ChangelogRewriter, DefaultChangelogRewriter};
pub use crate::types::{Category, ChangelogDocument, ChangelogEntry, Result};
