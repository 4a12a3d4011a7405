//! # notepress vault
//!
//! The filesystem side of a migration run.
//!
//! - [`scanner`] - which notes a run processes, in lexicographic order
//! - [`names`] - collision-free image and post names; nothing is ever overwritten
//! - [`atomic`] - transactional writes: temp file + rename, rollback on failure
//!
//! ## Quick Start
//!
//! ```no_run
//! use notepress_core::MigratorConfig;
//! use notepress_vault::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> notepress_core::Result<()> {
//! let config = MigratorConfig::builder("/path/to/site").build()?;
//! let notes = collect_inputs(Path::new("/path/to/notes"), &config)?;
//!
//! let mut images = ImageNamer::new(config.images_path());
//! let placement = images.place(Path::new("/path/to/notes/img/diagram.png"))?;
//!
//! AtomicFileOps::new().execute_transaction(vec![
//!     FileOp::Copy("/path/to/notes/img/diagram.png".into(), placement.path().to_path_buf()),
//! ])?;
//! # let _ = notes;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod names;
pub mod scanner;

pub use atomic::{AtomicFileOps, FileOp, TransactionResult};
pub use names::{IMAGE_HASH_LEN, ImageNamer, Placement, PostNamer, content_hash, disambiguate};
pub use scanner::collect_inputs;

pub mod prelude {
    pub use crate::atomic::{AtomicFileOps, FileOp, TransactionResult};
    pub use crate::names::{ImageNamer, Placement, PostNamer};
    pub use crate::scanner::collect_inputs;
}
