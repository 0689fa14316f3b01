//! Invoking an installed reference pkg-config implementation.
//!
//! The engine can shell out to a real `pkgconf`/`pkg-config` binary to seed
//! configuration values it cannot know itself (most usefully the
//! compiled-in `pc_path`). The invoker is a fallback information source
//! only; it is never consulted during resolution.
//!
//! The discovered command is owned by the caller — there is no process-wide
//! cache — and environment overlays are applied to the child process only,
//! so the parent environment is never mutated and nothing needs restoring
//! on any exit path.

use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};
use crate::paths::split_env_path_list;

/// Implementation names probed by default, in preference order.
pub const DEFAULT_IMPLS: &[&str] = &["pkgconf", "pkg-config"];

/// The captured outcome of one invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Captured standard output, trailing whitespace stripped.
    pub stdout: String,
    /// Captured standard error, trailing whitespace stripped.
    pub stderr: String,
    /// The child's exit code (`-1` when terminated by a signal).
    pub exit_code: i32,
}

impl Invocation {
    /// Whether the child exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output split into lines.
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Locate the first of `impls` on the search path.
///
/// `path_override` replaces the `PATH` environment variable when given.
pub fn discover_reference_impl(path_override: Option<&str>, impls: &[&str]) -> Result<PathBuf> {
    let search_path = match path_override {
        Some(p) => OsString::from(p),
        None => env::var_os("PATH").unwrap_or_default(),
    };
    for name in impls {
        for dir in env::split_paths(&search_path) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                debug!(command = %candidate.display(), "discovered reference implementation");
                return Ok(candidate);
            }
            #[cfg(windows)]
            {
                let candidate = candidate.with_extension("exe");
                if is_executable(&candidate) {
                    debug!(command = %candidate.display(), "discovered reference implementation");
                    return Ok(candidate);
                }
            }
        }
    }
    Err(Error::ReferenceImplNotFound)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// A discovered reference implementation.
#[derive(Debug, Clone)]
pub struct ReferenceImpl {
    command: PathBuf,
}

impl ReferenceImpl {
    /// Discover the default implementation on `PATH`.
    pub fn discover() -> Result<Self> {
        Ok(Self {
            command: discover_reference_impl(None, DEFAULT_IMPLS)?,
        })
    }

    /// Use a specific command without discovery.
    pub fn from_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The command that will be invoked.
    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Run the implementation with `args`, applying `env_overlay` to the
    /// child only, and capture its output.
    pub fn call(&self, args: &[&str], env_overlay: &HashMap<String, String>) -> Result<Invocation> {
        debug!(command = %self.command.display(), ?args, "invoking reference implementation");
        let output = Command::new(&self.command)
            .args(args)
            .envs(env_overlay)
            .output()?;
        Ok(Invocation {
            stdout: String::from_utf8_lossy(&output.stdout)
                .trim_end()
                .to_string(),
            stderr: String::from_utf8_lossy(&output.stderr)
                .trim_end()
                .to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Query a variable of a package known to the reference implementation.
    ///
    /// Returns `None` when the query fails or the variable is unset.
    pub fn query_variable(&self, variable: &str, package: &str) -> Result<Option<String>> {
        let inv = self.call(&["--variable", variable, package], &HashMap::new())?;
        if inv.success() && !inv.stdout.is_empty() {
            Ok(Some(inv.stdout))
        } else {
            Ok(None)
        }
    }

    /// The reference implementation's compiled-in default search path, for
    /// seeding [`crate::config::ConfigBuilder::default_path_override`].
    pub fn default_pc_path(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .query_variable("pc_path", "pkg-config")?
            .map(|value| split_env_path_list(&value))
            .unwrap_or_default())
    }
}
