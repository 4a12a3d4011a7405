//! The per-note pipeline: read, analyze, plan names, rewrite, commit.

use chrono::{DateTime, Local, NaiveDate};
use notepress_core::prelude::*;
use notepress_parser::{
    KeywordExtractor, Replacement, analyze, render_front_matter, rewrite_body, slugify,
    split_front_matter,
};
use notepress_vault::{AtomicFileOps, FileOp, ImageNamer, Placement, PostNamer};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Migrates notes into one site.
///
/// Holds the run's name claims, so the same `Migrator` must be used for every
/// note of a batch to keep post names, permalinks and image names unique.
pub struct Migrator {
    config: MigratorConfig,
    extractor: KeywordExtractor,
    images: ImageNamer,
    posts: PostNamer,
    fs: AtomicFileOps,
    dry_run: bool,
}

impl Migrator {
    /// Validate the configuration and index the posts already published.
    pub fn new(config: MigratorConfig) -> Result<Self> {
        config.validate()?;

        let posts_dir = config.posts_path();
        let existing = existing_permalinks(&posts_dir);
        log::debug!(
            "Indexed {} existing permalink(s) in {}",
            existing.len(),
            posts_dir.display()
        );

        Ok(Self {
            extractor: KeywordExtractor::with_stopwords(&config.extra_stopwords),
            images: ImageNamer::new(config.images_path()),
            posts: PostNamer::new(posts_dir, config.post_extension.clone(), existing),
            fs: AtomicFileOps::new(),
            dry_run: false,
            config,
        })
    }

    /// Plan everything but write nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn config(&self) -> &MigratorConfig {
        &self.config
    }

    /// Read a note: UTF-8 text plus its last-modified date in local time.
    pub fn read_note(path: &Path) -> Result<Note> {
        let bytes = fs::read(path).map_err(|e| Error::from_read(path, e))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::read_error(path, format!("not valid UTF-8: {}", e)))?;

        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| Error::read_error(path, e))?;
        let modified: NaiveDate = DateTime::<Local>::from(modified).date_naive();

        Ok(Note {
            path: path.to_path_buf(),
            content,
            modified,
        })
    }

    /// Migrate one note file end to end.
    pub fn migrate_file(&mut self, path: &Path) -> Result<MigrationOutcome> {
        let note = Self::read_note(path)?;
        log::info!("Migrating {}", path.display());

        let post = self.plan(&note)?;
        if !self.dry_run {
            self.commit(&post)?;
        }

        let outcome = outcome_of(&note, &post, self.dry_run);
        log::info!(
            "{} -> {} ({} image(s) copied, {} reused)",
            path.display(),
            outcome.post_path.display(),
            outcome.images_copied,
            outcome.images_reused
        );
        Ok(outcome)
    }

    /// Work out the post for a note and claim its names, without touching disk.
    pub fn plan(&mut self, note: &Note) -> Result<GeneratedPost> {
        let analysis = analyze(&note.content);

        let title = analysis.title(&note.path);
        let date = self.config.date_override.unwrap_or(note.modified);
        let tags = analysis.tags(&self.extractor, self.config.max_tags);
        log::debug!("{}: title {:?}, tags {:?}", note.path.display(), title, tags);

        let note_dir = note.path.parent().unwrap_or(Path::new("")).to_path_buf();
        let mut images: Vec<ImageRelocation> = Vec::new();
        let mut unresolved = Vec::new();
        let mut replacements = Vec::new();
        // resolved source -> index into `images`
        let mut by_source: HashMap<PathBuf, usize> = HashMap::new();

        for reference in &analysis.images {
            if reference.is_remote() {
                log::debug!("Skipping remote image {}", reference.original);
                continue;
            }

            let Some(source) = self.resolve_image(&note_dir, &reference.decoded) else {
                log::warn!(
                    "{}:{}: image '{}' not found, left unchanged",
                    note.path.display(),
                    reference.position.line,
                    reference.original
                );
                unresolved.push(reference.clone());
                continue;
            };

            let index = match by_source.get(&source) {
                Some(&index) => index,
                None => match self.relocate(reference.original.clone(), source.clone()) {
                    Ok(relocation) => {
                        images.push(relocation);
                        by_source.insert(source, images.len() - 1);
                        images.len() - 1
                    }
                    Err(e) => {
                        self.release_images(&images);
                        return Err(e);
                    }
                },
            };
            replacements.push(Replacement::new(reference.position, images[index].url.clone()));
        }

        let body = rewrite_body(analysis.body, &replacements);

        let file_prefix = date.format("%Y-%m-%d").to_string();
        let month = date.format("%Y/%m").to_string();
        let (_, path, permalink) = self.posts.allocate(&file_prefix, &slugify(&title), |slug| {
            format!("/posts/{}/{}/", month, slug)
        });

        Ok(GeneratedPost {
            front_matter: PostFrontMatter {
                title,
                date,
                permalink,
                tags,
            },
            body,
            path,
            images,
            unresolved,
        })
    }

    /// Write a planned post: images first, post last, all or nothing.
    pub fn commit(&mut self, post: &GeneratedPost) -> Result<()> {
        let mut ops: Vec<FileOp> = post
            .images
            .iter()
            .filter(|image| !image.reused)
            .map(|image| FileOp::Copy(image.source.clone(), image.destination.clone()))
            .collect();
        ops.push(FileOp::Write(post.path.clone(), render_post(post)));

        if let Err(e) = self.fs.execute_transaction(ops) {
            self.release_images(&post.images);
            self.posts.release(&post.path, &post.front_matter.permalink);
            return Err(e);
        }
        Ok(())
    }

    /// Resolve an image path: absolute as-is, then relative to the note,
    /// then `images/<filename>` next to the note. The working directory is
    /// never consulted, so results don't depend on where the command runs.
    fn resolve_image(&self, note_dir: &Path, target: &str) -> Option<PathBuf> {
        let target = Path::new(target.trim());
        let mut candidates = Vec::with_capacity(3);

        if target.is_absolute() {
            candidates.push(target.to_path_buf());
        } else {
            candidates.push(note_dir.join(target));
        }
        if let Some(name) = target.file_name() {
            candidates.push(note_dir.join("images").join(name));
        }

        candidates
            .into_iter()
            .find(|c| c.is_file() && self.config.is_image(c))
    }

    fn relocate(&mut self, original: String, source: PathBuf) -> Result<ImageRelocation> {
        let placement = self.images.place(&source)?;
        let destination = placement.path().to_path_buf();

        let Some(name) = destination.file_name().and_then(|n| n.to_str()) else {
            self.images.release(&destination);
            return Err(Error::processing_error(
                &source,
                "relocated image name is not valid UTF-8",
            ));
        };
        let url = format!(
            "{}/{}",
            self.config.image_url_prefix.trim_end_matches('/'),
            name
        );

        Ok(ImageRelocation {
            original,
            source,
            url,
            reused: matches!(placement, Placement::Reuse(_)),
            destination,
        })
    }

    fn release_images(&mut self, images: &[ImageRelocation]) {
        for image in images.iter().filter(|i| !i.reused) {
            self.images.release(&image.destination);
        }
    }
}

/// Full text of a generated post file.
pub fn render_post(post: &GeneratedPost) -> String {
    let mut out = render_front_matter(&post.front_matter);
    out.push_str(&post.body);
    out
}

fn outcome_of(note: &Note, post: &GeneratedPost, dry_run: bool) -> MigrationOutcome {
    let images_reused = post.images.iter().filter(|i| i.reused).count();
    MigrationOutcome {
        source: note.path.clone(),
        post_path: post.path.clone(),
        title: post.front_matter.title.clone(),
        date: post.front_matter.date,
        permalink: post.front_matter.permalink.clone(),
        tags: post.front_matter.tags.clone(),
        images_copied: post.images.len() - images_reused,
        images_reused,
        warnings: post
            .unresolved
            .iter()
            .map(|r| format!("image not found: {}", r.original))
            .collect(),
        dry_run,
    }
}

/// Permalinks declared by posts already in the posts directory.
fn existing_permalinks(posts_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(posts_dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| match fs::read_to_string(&path) {
            Ok(content) => split_front_matter(&content).0.and_then(|fm| fm.permalink),
            Err(e) => {
                log::debug!("Skipping unreadable post {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn migrator(site: &Path) -> Migrator {
        let config = MigratorConfig::builder(site)
            .date_override(NaiveDate::from_ymd_opt(2025, 8, 3).unwrap())
            .build()
            .unwrap();
        Migrator::new(config).unwrap()
    }

    fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_plan_does_not_touch_disk() {
        let site = TempDir::new().unwrap();
        write(site.path(), "notes/img/a.png", b"png");
        let note_path = write(site.path(), "notes/a.md", b"# A\n\n![x](img/a.png)\n");

        let mut m = migrator(site.path());
        let note = Migrator::read_note(&note_path).unwrap();
        let post = m.plan(&note).unwrap();

        assert_eq!(post.images.len(), 1);
        assert!(post.body.starts_with("# A\n\n![x](/images/"));
        assert!(!site.path().join("_posts").exists());
        assert!(!site.path().join("images").exists());
    }

    #[test]
    fn test_same_image_twice_copied_once() {
        let site = TempDir::new().unwrap();
        write(site.path(), "notes/img/a.png", b"png");
        let note_path = write(
            site.path(),
            "notes/a.md",
            b"![one](img/a.png) and <img src=\"./img/a.png\">\n",
        );

        let mut m = migrator(site.path());
        let outcome = m.migrate_file(&note_path).unwrap();
        assert_eq!(outcome.images_copied, 1);

        let copied: Vec<_> = fs::read_dir(site.path().join("images"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(copied.len(), 1);

        let text = fs::read_to_string(&outcome.post_path).unwrap();
        assert_eq!(text.matches(&format!("/images/{}", copied[0])).count(), 2);
    }

    #[test]
    fn test_images_folder_fallback() {
        let site = TempDir::new().unwrap();
        write(site.path(), "notes/images/pic.jpg", b"jpg");
        let note_path = write(site.path(), "notes/a.md", b"![p](somewhere/else/pic.jpg)\n");

        let mut m = migrator(site.path());
        let note = Migrator::read_note(&note_path).unwrap();
        let post = m.plan(&note).unwrap();

        assert_eq!(post.images.len(), 1);
        assert!(post.unresolved.is_empty());
        assert_eq!(post.images[0].source, site.path().join("notes/images/pic.jpg"));
    }

    #[test]
    fn test_paths_resolve_against_note_directory() {
        let site = TempDir::new().unwrap();
        write(site.path(), "shots/pic.png", b"png");
        let note_path = write(site.path(), "notes/a.md", b"![p](shots/pic.png)\n");

        let mut m = migrator(site.path());
        let post = m.plan(&Migrator::read_note(&note_path).unwrap()).unwrap();
        assert!(post.images.is_empty());
        assert_eq!(post.unresolved.len(), 1);
        assert_eq!(post.unresolved[0].original, "shots/pic.png");
    }

    #[test]
    fn test_lazy_src_attribute_left_alone() {
        let site = TempDir::new().unwrap();
        write(site.path(), "notes/real.png", b"png");
        let note_path = write(
            site.path(),
            "notes/a.md",
            b"<img data-src=\"lazy.png\" src=\"real.png\">\n",
        );

        let mut m = migrator(site.path());
        let post = m.plan(&Migrator::read_note(&note_path).unwrap()).unwrap();
        assert_eq!(post.images.len(), 1);
        assert!(post.unresolved.is_empty());
        assert!(post.body.starts_with("<img data-src=\"lazy.png\" src=\"/images/"));
    }

    #[test]
    fn test_percent_encoded_path() {
        let site = TempDir::new().unwrap();
        write(site.path(), "notes/my pic.png", b"png");
        let note_path = write(site.path(), "notes/a.md", b"![p](my%20pic.png)\n");

        let mut m = migrator(site.path());
        let post = m.plan(&Migrator::read_note(&note_path).unwrap()).unwrap();
        assert_eq!(post.images.len(), 1);
        assert!(!post.body.contains("my%20pic.png"));
    }

    #[test]
    fn test_non_image_extension_unresolved() {
        let site = TempDir::new().unwrap();
        write(site.path(), "notes/doc.pdf", b"pdf");
        let note_path = write(site.path(), "notes/a.md", b"![doc](doc.pdf)\n");

        let mut m = migrator(site.path());
        let post = m.plan(&Migrator::read_note(&note_path).unwrap()).unwrap();
        assert!(post.images.is_empty());
        assert_eq!(post.unresolved.len(), 1);
        assert_eq!(post.body, "![doc](doc.pdf)\n");
    }

    #[test]
    fn test_remote_images_skipped_silently() {
        let site = TempDir::new().unwrap();
        let note_path = write(
            site.path(),
            "notes/a.md",
            b"![r](https://example.com/r.png) ![d](data:image/png;base64,AAAA)\n",
        );

        let mut m = migrator(site.path());
        let outcome = m.migrate_file(&note_path).unwrap();
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.images_copied, 0);
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let site = TempDir::new().unwrap();
        let note_path = write(site.path(), "notes/bad.md", &[0xff, 0xfe, 0x00, 0x41]);

        let err = Migrator::read_note(&note_path).unwrap_err();
        assert!(matches!(err, Error::ReadError { .. }));
    }

    #[test]
    fn test_missing_note_is_not_found() {
        let site = TempDir::new().unwrap();
        let mut m = migrator(site.path());
        let err = m.migrate_file(&site.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_existing_permalinks_indexed() {
        let site = TempDir::new().unwrap();
        write(
            site.path(),
            "_posts/2025-07-01-intro.md",
            b"---\ntitle: 'Intro'\npermalink: /posts/2025/08/intro/\n---\n",
        );
        let note_path = write(site.path(), "notes/intro.md", b"# Intro\n");

        let mut m = migrator(site.path());
        let outcome = m.migrate_file(&note_path).unwrap();
        assert_eq!(outcome.permalink, "/posts/2025/08/intro-2/");
        assert!(outcome.post_path.ends_with("2025-08-03-intro-2.md"));
    }

    #[test]
    fn test_failed_commit_releases_claims() {
        let site = TempDir::new().unwrap();
        write(site.path(), "notes/img/a.png", b"png");
        let note_path = write(site.path(), "notes/a.md", b"# A\n\n![x](img/a.png)\n");

        let mut m = migrator(site.path());
        let note = Migrator::read_note(&note_path).unwrap();
        let post = m.plan(&note).unwrap();

        // the source image disappears between planning and commit
        fs::remove_file(site.path().join("notes/img/a.png")).unwrap();
        assert!(m.commit(&post).is_err());
        assert!(!post.path.exists());
        assert!(!post.images[0].destination.exists());

        // the names are free again
        write(site.path(), "notes/img/a.png", b"png");
        let again = m.plan(&note).unwrap();
        assert_eq!(again.path, post.path);
        assert_eq!(again.images[0].destination, post.images[0].destination);
    }
}
