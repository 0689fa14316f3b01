//! Error types for libpkgres.

use std::io;
use std::path::PathBuf;

/// Result type alias for libpkgres operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving package metadata.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `.pc` file contained no lines at all.
    #[error("'{path}' is empty")]
    EmptyFile { path: PathBuf },

    /// The final line of a `.pc` file ends with the continuation marker,
    /// leaving nothing to merge it with.
    #[error("trailing continuation character on final line: '{line}'")]
    TrailingContinuation { line: String },

    /// A variable or known property was defined twice in the same file.
    #[error("'{key}' is defined more than once")]
    DuplicateDefinition { key: String },

    /// A `${...}` reference named a variable that is not defined.
    ///
    /// The path is attached by the caller that knows which file was being
    /// parsed; inside the substitution engine it is `None`.
    #[error("{}", undefined_variable_message(.variable, .path))]
    UndefinedVariable {
        variable: String,
        path: Option<PathBuf>,
    },

    /// No `.pc` file matching the requested dependency could be found.
    #[error("No package '{spec}' found")]
    PackageNotFound { spec: String },

    /// Candidate `.pc` files existed for the requested dependency, but none
    /// of them could be opened.
    #[error("No package '{spec}' found (matching files exist but could not be read)")]
    AllCandidatesUnreadable { spec: String },

    /// An explicitly supplied file path does not exist.
    #[error("Bad path: {path}")]
    BadPath { path: PathBuf },

    /// An explicitly supplied path exists but is not a regular file.
    #[error("Not a file: {path}")]
    NotAFile { path: PathBuf },

    /// An explicitly supplied file does not have the `.pc` extension.
    #[error("Not a .pc file: {path}")]
    NotAPcFile { path: PathBuf },

    /// No installed reference pkg-config implementation could be located.
    #[error("no pkg-config implementation found on the search path")]
    ReferenceImplNotFound,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn undefined_variable_message(variable: &str, path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!("Variable '{variable}' not defined in '{}'", p.display()),
        None => format!("Variable '{variable}' not defined"),
    }
}

impl Error {
    /// Attach a file path to an `UndefinedVariable` error; other errors are
    /// returned unchanged.
    pub fn with_path(self, new_path: impl Into<PathBuf>) -> Self {
        match self {
            Self::UndefinedVariable { variable, .. } => Self::UndefinedVariable {
                variable,
                path: Some(new_path.into()),
            },
            other => other,
        }
    }

    /// Whether this error means a file could not be opened or read, as
    /// opposed to a structural problem with its contents.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_variable_display_without_path() {
        let err = Error::UndefinedVariable {
            variable: "prefix".to_string(),
            path: None,
        };
        assert_eq!(err.to_string(), "Variable 'prefix' not defined");
    }

    #[test]
    fn undefined_variable_display_with_path() {
        let err = Error::UndefinedVariable {
            variable: "prefix".to_string(),
            path: None,
        }
        .with_path("/tmp/foo.pc");
        assert_eq!(
            err.to_string(),
            "Variable 'prefix' not defined in '/tmp/foo.pc'"
        );
    }

    #[test]
    fn with_path_leaves_other_errors_alone() {
        let err = Error::PackageNotFound {
            spec: "zlib".to_string(),
        }
        .with_path("/tmp/zlib.pc");
        assert!(matches!(err, Error::PackageNotFound { .. }));
    }

    #[test]
    fn not_found_display_carries_spec() {
        let err = Error::PackageNotFound {
            spec: "glib-2.0 >= 2.50".to_string(),
        };
        assert_eq!(err.to_string(), "No package 'glib-2.0 >= 2.50' found");
    }

    #[test]
    fn io_errors_are_unreadable() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(err.is_unreadable());
        assert!(
            !Error::EmptyFile {
                path: PathBuf::from("x.pc")
            }
            .is_unreadable()
        );
    }
}
