//! Input discovery: which notes does a run process, and in what order.

use notepress_core::{Error, MigratorConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Resolve the run's input into the list of notes to process.
///
/// - A file is processed as-is, whatever its extension.
/// - A directory is walked recursively; files with a markdown extension are
///   collected in lexicographic path order. Hidden entries and the
///   destination directories (posts, images) are skipped.
/// - A missing path is `NotFound`.
pub fn collect_inputs(input: &Path, config: &MigratorConfig) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input).map_err(|e| Error::from_read(input, e))?;

    if !metadata.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let excluded: Vec<PathBuf> = [config.posts_path(), config.images_path()]
        .iter()
        .filter_map(|p| p.canonicalize().ok())
        .collect();

    let mut files = Vec::new();
    let walker = WalkDir::new(input)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && !is_excluded(e, &excluded)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", input.display(), e);
                continue;
            }
        };

        if entry.file_type().is_file() && config.is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    log::debug!("Found {} note(s) under {}", files.len(), input.display());
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_excluded(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .path()
        .canonicalize()
        .is_ok_and(|p| excluded.contains(&p))
}
