//! Configuration for the note migrator.
//!
//! Follows a builder pattern with validation. A YAML file can supply any
//! subset of the fields; the rest fall back to the defaults below.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Hard upper bound on the number of tags in a generated post.
pub const MAX_TAGS: usize = 5;

/// Migrator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigratorConfig {
    /// Project root holding the posts and images directories
    pub root: PathBuf,
    /// Posts directory, relative to `root`
    pub posts_dir: PathBuf,
    /// Images directory, relative to `root`
    pub images_dir: PathBuf,
    /// URL prefix of relocated images as written into post bodies
    pub image_url_prefix: String,
    /// Extension of generated post files
    pub post_extension: String,
    /// Number of tags to keep (1..=MAX_TAGS)
    pub max_tags: usize,
    /// Extensions (lowercase, no dot) enumerated when scanning a directory
    pub markdown_extensions: BTreeSet<String>,
    /// Extensions (lowercase, no dot) accepted as relocatable images
    pub image_extensions: BTreeSet<String>,
    /// Additional stopwords, on top of the built-in lists
    pub extra_stopwords: Vec<String>,
    /// Publish date used instead of the file's modification time
    pub date_override: Option<NaiveDate>,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            posts_dir: PathBuf::from("_posts"),
            images_dir: PathBuf::from("images"),
            image_url_prefix: "/images".to_string(),
            post_extension: "md".to_string(),
            max_tags: MAX_TAGS,
            markdown_extensions: ["md", "markdown"].iter().map(|s| s.to_string()).collect(),
            image_extensions: ["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extra_stopwords: Vec::new(),
            date_override: None,
        }
    }
}

impl MigratorConfig {
    /// Create a new config with builder
    pub fn builder(root: impl Into<PathBuf>) -> MigratorConfigBuilder {
        MigratorConfigBuilder::new(root)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_error(format!(
                "Failed to load configuration from {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: MigratorConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_tags == 0 || self.max_tags > MAX_TAGS {
            return Err(Error::config_error(format!(
                "max_tags must be between 1 and {}, got {}",
                MAX_TAGS, self.max_tags
            )));
        }

        check_relative_dir("posts_dir", &self.posts_dir)?;
        check_relative_dir("images_dir", &self.images_dir)?;

        if self.posts_dir == self.images_dir {
            return Err(Error::config_error(
                "posts_dir and images_dir must be different directories",
            ));
        }

        if !self.image_url_prefix.starts_with('/') {
            return Err(Error::config_error(format!(
                "image_url_prefix must start with '/': {}",
                self.image_url_prefix
            )));
        }

        if self.post_extension.is_empty() || self.post_extension.contains(['.', '/']) {
            return Err(Error::config_error(format!(
                "Invalid post_extension: {:?}",
                self.post_extension
            )));
        }

        if self.markdown_extensions.is_empty() {
            return Err(Error::config_error("markdown_extensions cannot be empty"));
        }

        if self.image_extensions.is_empty() {
            return Err(Error::config_error("image_extensions cannot be empty"));
        }

        Ok(())
    }

    /// Absolute-or-relative location of the posts directory
    pub fn posts_path(&self) -> PathBuf {
        self.root.join(&self.posts_dir)
    }

    /// Absolute-or-relative location of the images directory
    pub fn images_path(&self) -> PathBuf {
        self.root.join(&self.images_dir)
    }

    /// Whether a path carries one of the markdown extensions
    pub fn is_markdown(&self, path: &Path) -> bool {
        has_extension_in(path, &self.markdown_extensions)
    }

    /// Whether a path carries one of the image extensions
    pub fn is_image(&self, path: &Path) -> bool {
        has_extension_in(path, &self.image_extensions)
    }
}

fn has_extension_in(path: &Path, extensions: &BTreeSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_lowercase()))
}

fn check_relative_dir(field: &str, dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(Error::config_error(format!("{} cannot be empty", field)));
    }

    let escapes = dir
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(Error::config_error(format!(
            "{} must be a relative path inside the project root: {}",
            field,
            dir.display()
        )));
    }

    Ok(())
}

/// Builder for MigratorConfig
pub struct MigratorConfigBuilder {
    config: MigratorConfig,
}

impl MigratorConfigBuilder {
    /// Create a new builder
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: MigratorConfig {
                root: root.into(),
                ..MigratorConfig::default()
            },
        }
    }

    /// Start from an existing configuration (e.g. one loaded from a file)
    pub fn from_config(config: MigratorConfig) -> Self {
        Self { config }
    }

    /// Set the project root
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the posts directory
    pub fn posts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.posts_dir = dir.into();
        self
    }

    /// Set the images directory
    pub fn images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.images_dir = dir.into();
        self
    }

    /// Set the URL prefix of relocated images
    pub fn image_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.image_url_prefix = prefix.into();
        self
    }

    /// Set max_tags
    pub fn max_tags(mut self, max_tags: usize) -> Self {
        self.config.max_tags = max_tags;
        self
    }

    /// Add stopwords
    pub fn extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .extra_stopwords
            .extend(words.into_iter().map(Into::into));
        self
    }

    /// Override the publish date
    pub fn date_override(mut self, date: NaiveDate) -> Self {
        self.config.date_override = Some(date);
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<MigratorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
