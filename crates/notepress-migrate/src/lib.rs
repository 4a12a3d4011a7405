//! # notepress migrate
//!
//! Turns markdown notes into Jekyll posts.
//!
//! For each note the [`Migrator`]:
//! 1. reads it (UTF-8, last-modified date)
//! 2. extracts title, tags and image references
//! 3. resolves images and picks collision-free names for images and the post
//! 4. rewrites image paths in the body and renders the front matter
//! 5. writes everything in one transaction: images first, post last
//!
//! [`migrate_path`] runs it over a single file or a whole directory and
//! returns a [`BatchReport`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use notepress_core::MigratorConfig;
//! use notepress_migrate::{Migrator, migrate_path};
//! use std::path::Path;
//!
//! # fn main() -> notepress_core::Result<()> {
//! let config = MigratorConfig::builder("/path/to/site").max_tags(3).build()?;
//! let mut migrator = Migrator::new(config)?;
//!
//! let report = migrate_path(&mut migrator, Path::new("/path/to/notes"))?;
//! println!("{} migrated, {} failed", report.succeeded, report.failed);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod migrator;
pub mod report;

pub use batch::{migrate_batch, migrate_path};
pub use migrator::{Migrator, render_post};
pub use report::{BatchReport, FileRecord};

pub mod prelude {
    pub use crate::batch::{migrate_batch, migrate_path};
    pub use crate::migrator::Migrator;
    pub use crate::report::{BatchReport, FileRecord};
    pub use notepress_core::prelude::*;
}
