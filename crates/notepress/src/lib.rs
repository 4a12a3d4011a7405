//! # notepress
//!
//! Publish markdown notes as Jekyll posts.
//!
//! The `notepress` binary is the main entry point; this crate also
//! re-exports the library API of the workspace.

pub use notepress_core::prelude::*;
pub use notepress_migrate::{
    BatchReport, FileRecord, Migrator, migrate_batch, migrate_path, render_post,
};
pub use notepress_parser::{KeywordExtractor, NoteAnalysis, analyze};
pub use notepress_vault::collect_inputs;
