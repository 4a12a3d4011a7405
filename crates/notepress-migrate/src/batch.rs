//! Running a migrator over a file or a directory of notes.

use crate::migrator::Migrator;
use crate::report::{BatchReport, FileRecord};
use notepress_core::Result;
use notepress_vault::collect_inputs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Migrate `input`.
///
/// A file is migrated on its own and any failure is returned as the error.
/// A directory is migrated note by note: a failing note is logged and
/// recorded, and the rest of the batch still runs.
pub fn migrate_path(migrator: &mut Migrator, input: &Path) -> Result<BatchReport> {
    let files = collect_inputs(input, migrator.config())?;

    if !input.is_dir() {
        let start = Instant::now();
        let outcome = migrator.migrate_file(input)?;
        return Ok(BatchReport::new(
            vec![FileRecord::succeeded(outcome)],
            migrator.is_dry_run(),
            start.elapsed().as_millis() as u64,
        ));
    }

    log::info!("Migrating {} note(s) from {}", files.len(), input.display());
    Ok(migrate_batch(migrator, &files))
}

/// Migrate each file in order; per-file failures never stop the batch.
pub fn migrate_batch(migrator: &mut Migrator, files: &[PathBuf]) -> BatchReport {
    let start = Instant::now();
    let mut records = Vec::with_capacity(files.len());

    for path in files {
        match migrator.migrate_file(path) {
            Ok(outcome) => records.push(FileRecord::succeeded(outcome)),
            Err(e) => {
                log::error!("Failed to migrate {}: {}", path.display(), e);
                records.push(FileRecord::failed(path, &e));
            }
        }
    }

    let report = BatchReport::new(
        records,
        migrator.is_dry_run(),
        start.elapsed().as_millis() as u64,
    );
    log::info!(
        "Batch finished: {} succeeded, {} failed",
        report.succeeded,
        report.failed
    );
    report
}
