//! Atomic file operations with rollback support.
//!
//! All writes of one note go through a single transaction: images are
//! copied first, the post is written last, and every file lands through a
//! temp file + rename. Destinations must not exist; nothing is ever
//! overwritten. On the first failure every file the transaction created is
//! removed again, in reverse order, and the error is returned.

use notepress_core::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single file operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOp {
    /// Copy a file (from, to)
    Copy(PathBuf, PathBuf),
    /// Write content to a file (path, content)
    Write(PathBuf, String),
}

impl FileOp {
    /// Destination created by this operation
    pub fn path(&self) -> &Path {
        match self {
            Self::Copy(_, to) => to,
            Self::Write(p, _) => p,
        }
    }
}

/// Result of a committed transaction
#[derive(Debug, Default)]
pub struct TransactionResult {
    /// Number of operations executed
    pub operations: usize,
    /// Files created by the transaction
    pub affected_paths: Vec<PathBuf>,
}

/// Transactional file writer
#[derive(Debug, Default)]
pub struct AtomicFileOps;

impl AtomicFileOps {
    pub fn new() -> Self {
        Self
    }

    /// Execute a single file operation atomically
    pub fn execute_single(&self, op: FileOp) -> Result<()> {
        self.execute_transaction(vec![op])?;
        Ok(())
    }

    /// Execute operations in order; all succeed or every created file is removed.
    pub fn execute_transaction(&self, ops: Vec<FileOp>) -> Result<TransactionResult> {
        let mut created: Vec<PathBuf> = Vec::new();

        for op in &ops {
            if let Err(e) = self.execute_op(op) {
                log::warn!(
                    "Rolling back {} file(s) after failure on {}: {}",
                    created.len(),
                    op.path().display(),
                    e
                );
                self.rollback(&created);
                return Err(e);
            }
            created.push(op.path().to_path_buf());
        }

        Ok(TransactionResult {
            operations: ops.len(),
            affected_paths: created,
        })
    }

    fn execute_op(&self, op: &FileOp) -> Result<()> {
        let target = op.path();

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::write_error(parent, e))?;
        }

        if target.exists() {
            return Err(Error::write_error(target, "destination already exists"));
        }

        let temp_path = temp_path_for(target);
        let staged = match op {
            FileOp::Write(_, content) => {
                fs::write(&temp_path, content).map_err(|e| Error::write_error(target, e))
            }
            FileOp::Copy(from, _) => copy_to(from, &temp_path, target),
        };

        if let Err(e) = staged {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        // single-threaded: nothing can claim the target between the check and here
        if let Err(e) = fs::rename(&temp_path, target) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::write_error(target, e));
        }

        Ok(())
    }

    fn rollback(&self, created: &[PathBuf]) {
        for path in created.iter().rev() {
            if let Err(e) = fs::remove_file(path) {
                log::error!("Rollback could not remove {}: {}", path.display(), e);
            }
        }
    }
}

fn copy_to(from: &Path, temp_path: &Path, target: &Path) -> Result<()> {
    let mut source = fs::File::open(from).map_err(|e| Error::from_read(from, e))?;
    let mut staged = fs::File::create(temp_path).map_err(|e| Error::write_error(target, e))?;
    io::copy(&mut source, &mut staged).map_err(|e| Error::write_error(target, e))?;
    staged.sync_all().map_err(|e| Error::write_error(target, e))?;
    Ok(())
}

/// Hidden sibling used while a file is being written: `dir/.name.partial`
fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.partial", name))
}
