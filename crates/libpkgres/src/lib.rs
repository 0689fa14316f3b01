//! `libpkgres` — a metadata resolution engine for pkg-config `.pc` files.
//!
//! Given a package name and an optional version constraint, this crate
//! locates the correct `.pc` file among the configured search directories,
//! parses it (resolving `${variable}` references), and yields a structured
//! [`package::Package`] usable by a build process.
//!
//! # Architecture
//!
//! - [`error`] — Error types and result alias
//! - [`version`] — Ordered version values
//! - [`dependency`] — Version constraints and the spec-list scanner
//! - [`substitute`] — Variable substitution
//! - [`pcfile`] — `.pc` file parsing
//! - [`package`] — The resolved package artifact
//! - [`config`] — Caller-owned search configuration
//! - [`paths`] — Delimited path-list helpers
//! - [`platform`] — Platform-specific extra search directory sources
//! - [`searcher`] — The search index and resolver
//! - [`invoker`] — Shelling out to an installed reference implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use libpkgres::config::Config;
//! use libpkgres::dependency::parse_spec_list;
//! use libpkgres::searcher::PkgSearcher;
//!
//! let config = Config::builder()
//!     .path_dir("/opt/lib/pkgconfig")
//!     .build();
//! let searcher = PkgSearcher::new(&config);
//!
//! let globals = HashMap::new();
//! for dep in parse_spec_list("zlib >= 1.2") {
//!     let pkg = searcher.search_for_package(&dep, &globals).unwrap();
//!     println!("{} {}", pkg.name(), pkg.version);
//! }
//! ```

pub mod config;
pub mod dependency;
pub mod error;
pub mod invoker;
pub mod package;
pub mod paths;
pub mod pcfile;
pub mod platform;
pub mod searcher;
pub mod substitute;
pub mod version;

pub use config::Config;
pub use dependency::{Dependency, RelOp, parse_spec_list};
pub use error::{Error, Result};
pub use package::Package;
pub use searcher::PkgSearcher;
pub use version::VersionValue;

/// The version of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The install prefix used to derive default search directories when the
/// configuration does not name one.
#[cfg(unix)]
pub const DEFAULT_PREFIX: &str = "/usr";

#[cfg(windows)]
pub const DEFAULT_PREFIX: &str = "C:\\";

/// The `PKG_CONFIG_PATH` environment variable name.
pub const ENV_PKG_CONFIG_PATH: &str = "PKG_CONFIG_PATH";

/// The `PKG_CONFIG_LIBDIR` environment variable name.
pub const ENV_PKG_CONFIG_LIBDIR: &str = "PKG_CONFIG_LIBDIR";

/// The `PKG_CONFIG_DISABLE_UNINSTALLED` environment variable name.
///
/// When set, `-uninstalled` variants are no longer preferred.
pub const ENV_PKG_CONFIG_DISABLE_UNINSTALLED: &str = "PKG_CONFIG_DISABLE_UNINSTALLED";
