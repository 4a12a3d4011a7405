//! Collision-free naming for everything a run creates.
//!
//! A run never overwrites. Every destination name is checked against the
//! filesystem and against names already claimed earlier in the same run;
//! taken names get a numeric suffix (`-2`, `-3`, ...).

use notepress_core::{Error, Result};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Hex characters of the content hash used in image filenames.
pub const IMAGE_HASH_LEN: usize = 8;

/// `stem`, `stem-2`, `stem-3`, ... : the first candidate `is_free` accepts.
pub fn disambiguate<F>(stem: &str, mut is_free: F) -> String
where
    F: FnMut(&str) -> bool,
{
    if is_free(stem) {
        return stem.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", stem, n))
        .find(|candidate| is_free(candidate))
        .unwrap_or_else(|| stem.to_string())
}

/// Lowercase hex SHA-256 of a file's bytes.
pub fn content_hash(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::from_read(path, e))?;
    Ok(hex(&Sha256::digest(&bytes)))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Where an image ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Destination is free; the image must be copied there
    Copy(PathBuf),
    /// Destination already holds identical bytes
    Reuse(PathBuf),
}

impl Placement {
    pub fn path(&self) -> &Path {
        match self {
            Self::Copy(p) | Self::Reuse(p) => p,
        }
    }

    pub fn is_reuse(&self) -> bool {
        matches!(self, Self::Reuse(_))
    }
}

/// Content-addressed image names in one images directory.
///
/// Names are the first [`IMAGE_HASH_LEN`] hex characters of the content
/// hash plus the lower-cased extension. Identical content maps to the same
/// file; a different file that happens to share the short hash gets a suffix.
#[derive(Debug)]
pub struct ImageNamer {
    dir: PathBuf,
    /// destination -> full content hash, for names handed out this run
    claimed: HashMap<PathBuf, String>,
}

impl ImageNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            claimed: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pick the destination for `source`.
    ///
    /// A `Copy` placement is claimed immediately; call [`release`](Self::release)
    /// if the copy is later rolled back.
    pub fn place(&mut self, source: &Path) -> Result<Placement> {
        let hash = content_hash(source)?;
        let short = &hash[..IMAGE_HASH_LEN];
        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        let mut n = 1;
        loop {
            let name = if n == 1 {
                format!("{}{}", short, ext)
            } else {
                format!("{}-{}{}", short, n, ext)
            };
            let dest = self.dir.join(name);
            n += 1;

            if let Some(claimed_hash) = self.claimed.get(&dest) {
                if *claimed_hash == hash {
                    return Ok(Placement::Reuse(dest));
                }
                continue;
            }

            if dest.exists() {
                if content_hash(&dest)? == hash {
                    log::debug!("{} already present as {}", source.display(), dest.display());
                    return Ok(Placement::Reuse(dest));
                }
                continue;
            }

            self.claimed.insert(dest.clone(), hash);
            return Ok(Placement::Copy(dest));
        }
    }

    /// Forget a claim whose copy never happened.
    pub fn release(&mut self, dest: &Path) {
        self.claimed.remove(dest);
    }
}

/// Post filenames and permalinks for one posts directory.
///
/// A slug is free when neither `<date>-<slug>.<ext>` exists nor its
/// permalink is already used, by an existing post or earlier in the run.
#[derive(Debug, Default)]
pub struct PostNamer {
    dir: PathBuf,
    extension: String,
    permalinks: HashSet<String>,
    claimed_paths: HashSet<PathBuf>,
}

impl PostNamer {
    /// `existing_permalinks` are those already published in `dir`.
    pub fn new<I>(
        dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        existing_permalinks: I,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            permalinks: existing_permalinks.into_iter().collect(),
            claimed_paths: HashSet::new(),
        }
    }

    pub fn file_path(&self, file_prefix: &str, slug: &str) -> PathBuf {
        self.dir.join(format!("{}-{}.{}", file_prefix, slug, self.extension))
    }

    /// Find and claim a free slug.
    ///
    /// `file_prefix` is the date part of the filename; `permalink_for` turns a
    /// candidate slug into its permalink. Returns `(slug, path, permalink)`.
    pub fn allocate<F>(
        &mut self,
        file_prefix: &str,
        slug: &str,
        permalink_for: F,
    ) -> (String, PathBuf, String)
    where
        F: Fn(&str) -> String,
    {
        let chosen = disambiguate(slug, |candidate| {
            let path = self.file_path(file_prefix, candidate);
            !self.claimed_paths.contains(&path)
                && !path.exists()
                && !self.permalinks.contains(&permalink_for(candidate))
        });

        let path = self.file_path(file_prefix, &chosen);
        let permalink = permalink_for(&chosen);
        self.claimed_paths.insert(path.clone());
        self.permalinks.insert(permalink.clone());
        (chosen, path, permalink)
    }

    /// Forget a claim whose post was never written.
    pub fn release(&mut self, path: &Path, permalink: &str) {
        self.claimed_paths.remove(path);
        self.permalinks.remove(permalink);
    }
}
