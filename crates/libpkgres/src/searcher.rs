//! The package search index and resolver.
//!
//! A [`PkgSearcher`] is built once per run: it walks the configured search
//! directories in precedence order and records every `.pc` file it finds,
//! keyed by file stem. The index is immutable afterwards and models a
//! single point-in-time view of the filesystem; callers performing many
//! resolutions must reuse one searcher rather than rebuilding it.
//!
//! Directory precedence, most preferred first:
//!
//! 1. explicit search directories ([`Config::path_dirs`])
//! 2. library-only directories ([`Config::libdir_dirs`])
//! 3. platform-provided directories (the Windows registry; empty elsewhere)
//! 4. default locations — the configured override list, or
//!    `{prefix}/lib{64}/pkgconfig`, `{prefix}/share/pkgconfig`,
//!    `{prefix}/lib/pkgconfig` derived from the install prefix
//! 5. caller-supplied extra directories ([`Config::extra_search_dirs`])
//!
//! A name found in several directories accumulates all its paths in that
//! order; the same path is never recorded twice and the same directory is
//! never scanned twice.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::dependency::Dependency;
use crate::error::{Error, Result};
use crate::package::Package;
use crate::platform::platform_search_dirs;

/// The one-shot package search index.
#[derive(Debug)]
pub struct PkgSearcher {
    /// Package name -> candidate file paths, most preferred first.
    known_pkgs: HashMap<String, Vec<PathBuf>>,
    prefer_uninstalled: bool,
    uninstalled_only: bool,
}

impl PkgSearcher {
    /// Build the index from `config` and this platform's default extra
    /// directory source.
    pub fn new(config: &Config) -> Self {
        Self::with_platform_dirs(config, &platform_search_dirs())
    }

    /// Build the index from `config` and an explicit set of
    /// platform-provided directories.
    pub fn with_platform_dirs(config: &Config, platform_dirs: &[PathBuf]) -> Self {
        let mut searcher = Self {
            known_pkgs: HashMap::new(),
            prefer_uninstalled: config.prefer_uninstalled(),
            uninstalled_only: config.uninstalled_only(),
        };
        let mut scanned = HashSet::new();

        for dir in config.path_dirs() {
            searcher.append_packages(dir, &mut scanned);
        }
        for dir in config.libdir_dirs() {
            searcher.append_packages(dir, &mut scanned);
        }
        for dir in platform_dirs {
            searcher.append_packages(dir, &mut scanned);
        }
        match config.default_path_override() {
            Some(dirs) => {
                for dir in dirs {
                    searcher.append_packages(dir, &mut scanned);
                }
            }
            None => {
                let prefix = config.prefix();
                let libdir = if config.is_64bit() { "lib64" } else { "lib" };
                for dir in [
                    prefix.join(libdir).join("pkgconfig"),
                    prefix.join("share").join("pkgconfig"),
                    prefix.join("lib").join("pkgconfig"),
                ] {
                    searcher.append_packages(&dir, &mut scanned);
                }
            }
        }
        for dir in config.extra_search_dirs() {
            searcher.append_packages(dir, &mut scanned);
        }

        searcher
    }

    /// Record every `.pc` file in `dir`, in directory-listing order.
    fn append_packages(&mut self, dir: &Path, scanned: &mut HashSet<PathBuf>) {
        if !dir.is_dir() || !scanned.insert(dir.to_path_buf()) {
            return;
        }
        debug!(dir = %dir.display(), "adding .pc files to known packages");

        let entries = match dir.read_dir() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to list directory");
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("pc") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let paths = self.known_pkgs.entry(name.to_string()).or_default();
            if !paths.contains(&path) {
                if !paths.is_empty() {
                    debug!(name, ?paths, "package has a duplicate file");
                }
                paths.push(path);
            }
        }
    }

    /// Candidate `.pc` files for a package name, most preferred first.
    ///
    /// When uninstalled variants are preferred and `{name}-uninstalled` is
    /// indexed, only its paths are returned; with `uninstalled_only` set and
    /// no such entry, nothing is returned. Unknown names yield an empty
    /// list.
    pub fn search_for_pcfile(&self, pkgname: &str) -> Vec<PathBuf> {
        debug!(pkgname, "looking for matching files");
        if self.prefer_uninstalled {
            if let Some(paths) = self.known_pkgs.get(&format!("{pkgname}-uninstalled")) {
                debug!(?paths, "using uninstalled package");
                return paths.clone();
            }
            if self.uninstalled_only {
                debug!("uninstalled only, no suitable package");
                return Vec::new();
            }
        }
        match self.known_pkgs.get(pkgname) {
            Some(paths) => {
                debug!(?paths, "using any package");
                paths.clone()
            }
            None => {
                debug!("no suitable package found");
                Vec::new()
            }
        }
    }

    /// Resolve a dependency to the first matching package.
    ///
    /// A dependency name that is an existing file ending in `.pc` bypasses
    /// the index entirely. Candidates that cannot be opened are skipped
    /// with a diagnostic; every other parse failure is fatal for the
    /// request. See the error catalogue for the not-found distinctions.
    pub fn search_for_package(
        &self,
        dep: &Dependency,
        globals: &HashMap<String, String>,
    ) -> Result<Package> {
        let direct = Path::new(&dep.name);
        let pcfiles = if direct.is_file()
            && direct.extension().and_then(|e| e.to_str()) == Some("pc")
        {
            debug!(file = %direct.display(), "using provided pc file");
            vec![direct.to_path_buf()]
        } else {
            debug!(%dep, "searching for package");
            self.search_for_pcfile(&dep.name)
        };
        debug!(?pcfiles, "found .pc files");

        if pcfiles.is_empty() {
            return Err(Error::PackageNotFound {
                spec: dep.to_string(),
            });
        }

        let mut pkgs = Vec::new();
        for pcfile in &pcfiles {
            match Package::from_path(pcfile, globals) {
                Ok(pkg) => pkgs.push(pkg),
                Err(e) if e.is_unreadable() => {
                    warn!(file = %pcfile.display(), error = %e, "failed to open candidate");
                    continue;
                }
                // Undefined variables and structural parse failures are
                // authoring errors in that file, not availability problems.
                Err(e) => return Err(e),
            }
        }
        if pkgs.is_empty() {
            // Matches the reference tool's quirk: a package whose files all
            // exist but cannot be read is reported distinctly from one that
            // is absent.
            return Err(Error::AllCandidatesUnreadable {
                spec: dep.to_string(),
            });
        }

        let matching: Vec<Package> = pkgs
            .into_iter()
            .filter(|pkg| dep.meets_requirement(&pkg.version))
            .collect();
        debug!(
            matching = ?matching.iter().map(Package::name).collect::<Vec<_>>(),
            "filtered candidates"
        );
        matching
            .into_iter()
            .next()
            .ok_or_else(|| Error::PackageNotFound {
                spec: dep.to_string(),
            })
    }

    /// Every indexed package with the `Name` and `Description` properties
    /// of its highest-priority file, plus messages for files that failed.
    ///
    /// Unreadable files are skipped with a diagnostic; files with undefined
    /// variables are reported in the error list.
    pub fn known_packages_list(
        &self,
        globals: &HashMap<String, String>,
    ) -> (Vec<(String, String, String)>, Vec<String>) {
        let mut result = Vec::new();
        let mut errors = Vec::new();

        for (pkgname, paths) in &self.known_pkgs {
            let path = &paths[0];
            match Package::from_path(path, globals) {
                Ok(pkg) => result.push((
                    pkgname.clone(),
                    pkg.name().to_string(),
                    pkg.description().to_string(),
                )),
                Err(e) if e.is_unreadable() => {
                    warn!(file = %path.display(), error = %e, "failed to open candidate");
                }
                Err(e) => errors.push(e.to_string()),
            }
        }

        (result, errors)
    }

    /// The number of distinct package names in the index.
    pub fn len(&self) -> usize {
        self.known_pkgs.len()
    }

    /// Whether the index holds no packages at all.
    pub fn is_empty(&self) -> bool {
        self.known_pkgs.is_empty()
    }
}
