//! The resolved package artifact.
//!
//! A [`Package`] is what the resolver hands back to callers: the parse
//! result of one `.pc` file with every property value substituted against
//! the file's variables and the caller's globals, and the version parsed
//! into an ordered [`VersionValue`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::dependency::{Dependency, parse_spec_list};
use crate::error::{Error, Result};
use crate::pcfile::{PcFileRecord, Properties, read_pc_file};
use crate::version::VersionValue;

/// A fully-resolved package, owned by the caller once returned.
#[derive(Debug, Clone)]
pub struct Package {
    /// The lookup identifier: the `.pc` file's stem (e.g. `"zlib"`).
    pub id: String,
    /// The file this package was loaded from.
    pub path: PathBuf,
    /// The parsed `Version:` property.
    pub version: VersionValue,
    /// All declared properties, substituted.
    pub properties: Properties,
    /// Substituted variable values.
    pub variables: HashMap<String, String>,
    /// Variable texts as written.
    pub raw_variables: HashMap<String, String>,
}

impl Package {
    /// Read, parse, and resolve a package from a `.pc` file.
    pub fn from_path(path: &Path, globals: &HashMap<String, String>) -> Result<Self> {
        let record = read_pc_file(path, globals)?;
        Self::from_record(path, record, globals)
    }

    /// Resolve a package from an already-parsed record.
    pub fn from_record(
        path: &Path,
        record: PcFileRecord,
        globals: &HashMap<String, String>,
    ) -> Result<Self> {
        let properties = record
            .properties
            .substituted(&record.variables, globals)
            .map_err(|e| e.with_path(path))?;
        let version = VersionValue::parse(&properties.version);
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            id,
            path: path.to_path_buf(),
            version,
            properties,
            variables: record.variables,
            raw_variables: record.raw_variables,
        })
    }

    /// The `Name:` property (display name).
    pub fn name(&self) -> &str {
        &self.properties.name
    }

    /// The `Description:` property.
    pub fn description(&self) -> &str {
        &self.properties.description
    }

    /// Look up a substituted variable value.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// The `Requires:` property as parsed dependencies.
    pub fn requires(&self) -> Vec<Dependency> {
        parse_spec_list(&self.properties.requires)
    }

    /// The `Requires.private:` property as parsed dependencies.
    pub fn requires_private(&self) -> Vec<Dependency> {
        parse_spec_list(&self.properties.requires_private)
    }

    /// The `Conflicts:` property as parsed dependencies.
    pub fn conflicts(&self) -> Vec<Dependency> {
        parse_spec_list(&self.properties.conflicts)
    }

    /// Whether this package was loaded from an `-uninstalled` variant file.
    pub fn is_uninstalled(&self) -> bool {
        self.id.ends_with("-uninstalled")
    }
}

/// Validate an explicitly supplied `.pc` file path.
///
/// Used for file arguments the caller passed directly (as opposed to
/// package names resolved through the search index).
pub fn validate_pc_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::BadPath {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(Error::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if path.extension().and_then(|e| e.to_str()) != Some("pc") {
        return Err(Error::NotAPcFile {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
