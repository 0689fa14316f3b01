//! Platform-specific sources of additional search directories.
//!
//! Some platforms publish extra `.pc` search locations outside the
//! environment (the Windows registry). Those sources sit behind the
//! [`SearchDirSource`] capability so the search index itself stays free of
//! conditional compilation: platforms without such a source contribute an
//! empty list.

use std::path::PathBuf;

/// A source of additional search directories.
pub trait SearchDirSource {
    /// Directories to scan, in priority order. Never fails; sources that
    /// cannot be read contribute nothing.
    fn search_dirs(&self) -> Vec<PathBuf>;
}

/// A source that contributes no directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtraDirs;

impl SearchDirSource for NoExtraDirs {
    fn search_dirs(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// The search directories published by this platform's default source.
///
/// On Windows this reads the registry; everywhere else it is empty.
pub fn platform_search_dirs() -> Vec<PathBuf> {
    #[cfg(windows)]
    {
        registry::RegistrySearchDirs.search_dirs()
    }
    #[cfg(not(windows))]
    {
        NoExtraDirs.search_dirs()
    }
}

#[cfg(windows)]
mod registry {
    use std::path::PathBuf;

    use tracing::debug;
    use winreg::RegKey;
    use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, REG_SZ};
    use winreg::types::FromRegValue;

    use super::SearchDirSource;

    const KEY_PATH: &str = "Software\\pkg-config\\PKG_CONFIG_PATH";

    /// Search directories published under
    /// `Software\pkg-config\PKG_CONFIG_PATH` in HKCU, then HKLM. Each
    /// string value under the key names one directory.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RegistrySearchDirs;

    impl SearchDirSource for RegistrySearchDirs {
        fn search_dirs(&self) -> Vec<PathBuf> {
            let mut dirs = Vec::new();
            let roots = [
                (HKEY_CURRENT_USER, "HKEY_CURRENT_USER"),
                (HKEY_LOCAL_MACHINE, "HKEY_LOCAL_MACHINE"),
            ];
            for (root, root_name) in roots {
                let key = match RegKey::predef(root).open_subkey(KEY_PATH) {
                    Ok(key) => key,
                    Err(e) => {
                        debug!(root = root_name, key = KEY_PATH, error = %e, "skipping registry root");
                        continue;
                    }
                };
                for (name, value) in key.enum_values().flatten() {
                    if value.vtype == REG_SZ {
                        match String::from_reg_value(&value) {
                            Ok(path) => dirs.push(PathBuf::from(path)),
                            Err(e) => debug!(name, error = %e, "skipping unreadable registry value"),
                        }
                    }
                }
            }
            dirs
        }
    }
}
