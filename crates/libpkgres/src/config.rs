//! Search configuration.
//!
//! A [`Config`] carries every setting the search index reads: the ordered
//! search-directory lists, the install prefix used to derive default
//! locations, and the uninstalled-variant policy. It is built once by the
//! caller (from environment variables, command-line flags, or values seeded
//! from a reference implementation) and is read-only to the engine.

use std::path::{Path, PathBuf};

/// Read-only search configuration, built with [`Config::builder()`].
///
/// Defaults: no explicit directories, no prefix override, 32-bit layout,
/// uninstalled variants preferred, uninstalled-only off.
#[derive(Debug, Clone)]
pub struct Config {
    path_dirs: Vec<PathBuf>,
    libdir_dirs: Vec<PathBuf>,
    default_path_override: Option<Vec<PathBuf>>,
    prefix: Option<PathBuf>,
    is_64bit: bool,
    prefer_uninstalled: bool,
    uninstalled_only: bool,
    extra_search_dirs: Vec<PathBuf>,
}

impl Config {
    /// Create a builder with default settings.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Explicit search directories (highest precedence).
    pub fn path_dirs(&self) -> &[PathBuf] {
        &self.path_dirs
    }

    /// Library-only search directories.
    pub fn libdir_dirs(&self) -> &[PathBuf] {
        &self.libdir_dirs
    }

    /// The compiled-in default path list, when configured. When set, the
    /// prefix-derived default directories are not used at all.
    pub fn default_path_override(&self) -> Option<&[PathBuf]> {
        self.default_path_override.as_deref()
    }

    /// The install prefix used to derive default search directories.
    pub fn prefix(&self) -> &Path {
        self.prefix
            .as_deref()
            .unwrap_or(Path::new(crate::DEFAULT_PREFIX))
    }

    /// Whether default directories include the `lib64` variant.
    pub fn is_64bit(&self) -> bool {
        self.is_64bit
    }

    /// Whether `-uninstalled` variants are preferred over installed ones.
    pub fn prefer_uninstalled(&self) -> bool {
        self.prefer_uninstalled
    }

    /// Whether only `-uninstalled` variants may be returned.
    pub fn uninstalled_only(&self) -> bool {
        self.uninstalled_only
    }

    /// Caller-supplied extra search directories (lowest precedence).
    pub fn extra_search_dirs(&self) -> &[PathBuf] {
        &self.extra_search_dirs
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            config: Config {
                path_dirs: Vec::new(),
                libdir_dirs: Vec::new(),
                default_path_override: None,
                prefix: None,
                is_64bit: false,
                prefer_uninstalled: true,
                uninstalled_only: false,
                extra_search_dirs: Vec::new(),
            },
        }
    }

    /// Append an explicit search directory.
    pub fn path_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.path_dirs.push(dir.into());
        self
    }

    /// Append several explicit search directories.
    pub fn path_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.config.path_dirs.extend(dirs);
        self
    }

    /// Append a library-only search directory.
    pub fn libdir_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.libdir_dirs.push(dir.into());
        self
    }

    /// Append several library-only search directories.
    pub fn libdir_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.config.libdir_dirs.extend(dirs);
        self
    }

    /// Replace the prefix-derived defaults with a fixed path list.
    pub fn default_path_override(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.config.default_path_override = Some(dirs.into_iter().collect());
        self
    }

    /// Set the install prefix used to derive default directories.
    pub fn prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.config.prefix = Some(prefix.into());
        self
    }

    /// Enable or disable the `lib64` default directory variant.
    pub fn is_64bit(mut self, enabled: bool) -> Self {
        self.config.is_64bit = enabled;
        self
    }

    /// Enable or disable preferring `-uninstalled` variants.
    pub fn prefer_uninstalled(mut self, enabled: bool) -> Self {
        self.config.prefer_uninstalled = enabled;
        self
    }

    /// Restrict results to `-uninstalled` variants.
    pub fn uninstalled_only(mut self, enabled: bool) -> Self {
        self.config.uninstalled_only = enabled;
        self
    }

    /// Append a caller-supplied extra search directory.
    pub fn extra_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.extra_search_dirs.push(dir.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> Config {
        self.config
    }
}
