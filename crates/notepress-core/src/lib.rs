//! # notepress core
//!
//! Core data models, error types, and configuration for turning markdown
//! notes into Jekyll posts. This crate defines the canonical types that all
//! other crates depend on.
//!
//! ## Core Modules
//!
//! - [`models`] - Notes, image references, generated posts and outcomes
//! - [`error`] - Error type and Result alias
//! - [`config`] - Migrator configuration and its builder
//! - [`utils`] - Serialization and text helpers
//!
//! ## Usage Examples
//!
//! ```
//! use notepress_core::prelude::*;
//!
//! let config = MigratorConfig::builder("/path/to/site")
//!     .max_tags(3)
//!     .build()
//!     .unwrap();
//! assert!(config.posts_path().ends_with("_posts"));
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use config::*;
pub use error::{Error, ErrorKind, Result};
pub use models::*;
pub use utils::{title_case, to_json_string};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{MAX_TAGS, MigratorConfig, MigratorConfigBuilder};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::models::{
        GeneratedPost, ImageReference, ImageRelocation, ImageSyntax, LineIndex, MigrationOutcome,
        Note, PostFrontMatter, SourcePosition,
    };
}
