//! Parser for `.pc` (pkg-config) metadata files.
//!
//! The file format consists of:
//!
//! - **Variable definitions**: `name=value`
//! - **Property declarations**: `Name: value` (known keys only; the key is
//!   matched case-insensitively)
//! - **Comments**: `#` to end of line
//! - **Continuations**: a trailing `\` joins a line to the next one
//! - **Variable references**: `${name}` within values
//!
//! Parsing yields a [`PcFileRecord`]: the raw variable texts as written,
//! the substituted variable values, and the declared properties. Individual
//! lines that match neither grammar are skipped with a diagnostic; the
//! format is long-lived and forward-compatible, so unknown syntax must not
//! abort an otherwise valid file. Structural problems (duplicate
//! definitions, undefined variables, an empty file, a trailing
//! continuation) abort the file.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::substitute::substitute;

/// The line continuation marker.
const CONTINUATION_CHAR: char = '\\';

/// The closed set of recognized property keys, lower-cased.
pub const KNOWN_PROPERTIES: &[&str] = &[
    "name",
    "description",
    "version",
    "requires",
    "requires.private",
    "conflicts",
    "libs",
    "libs.private",
    "cflags",
    "url",
];

/// The declared properties of one `.pc` file.
///
/// Known keys are a fixed shape with empty-string defaults; keys outside
/// the known set are tolerated, logged, and preserved in [`Properties::other`].
#[derive(Debug, Clone, Default)]
pub struct Properties {
    pub name: String,
    pub description: String,
    pub version: String,
    pub requires: String,
    pub requires_private: String,
    pub conflicts: String,
    pub libs: String,
    pub libs_private: String,
    pub cflags: String,
    pub url: String,
    /// Unrecognized property keys, as written.
    pub other: BTreeMap<String, String>,
}

impl Properties {
    /// Whether `key` (any case) is in the known set.
    pub fn is_known_key(key: &str) -> bool {
        KNOWN_PROPERTIES.contains(&key.to_ascii_lowercase().as_str())
    }

    /// Look up a property value. Known keys match case-insensitively and
    /// always yield a value (defaulting to `""`); unknown keys are looked
    /// up verbatim in the side table.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key.to_ascii_lowercase().as_str() {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "version" => Some(&self.version),
            "requires" => Some(&self.requires),
            "requires.private" => Some(&self.requires_private),
            "conflicts" => Some(&self.conflicts),
            "libs" => Some(&self.libs),
            "libs.private" => Some(&self.libs_private),
            "cflags" => Some(&self.cflags),
            "url" => Some(&self.url),
            _ => self.other.get(key).map(String::as_str),
        }
    }

    fn set_known(&mut self, key_lower: &str, value: String) {
        match key_lower {
            "name" => self.name = value,
            "description" => self.description = value,
            "version" => self.version = value,
            "requires" => self.requires = value,
            "requires.private" => self.requires_private = value,
            "conflicts" => self.conflicts = value,
            "libs" => self.libs = value,
            "libs.private" => self.libs_private = value,
            "cflags" => self.cflags = value,
            "url" => self.url = value,
            _ => unreachable!("caller checked the known set"),
        }
    }

    /// Substitute variable references in every property value.
    pub fn substituted(
        &self,
        vars: &HashMap<String, String>,
        globals: &HashMap<String, String>,
    ) -> Result<Properties> {
        Ok(Properties {
            name: substitute(&self.name, vars, globals)?,
            description: substitute(&self.description, vars, globals)?,
            version: substitute(&self.version, vars, globals)?,
            requires: substitute(&self.requires, vars, globals)?,
            requires_private: substitute(&self.requires_private, vars, globals)?,
            conflicts: substitute(&self.conflicts, vars, globals)?,
            libs: substitute(&self.libs, vars, globals)?,
            libs_private: substitute(&self.libs_private, vars, globals)?,
            cflags: substitute(&self.cflags, vars, globals)?,
            url: substitute(&self.url, vars, globals)?,
            other: self
                .other
                .iter()
                .map(|(k, v)| Ok((k.clone(), substitute(v, vars, globals)?)))
                .collect::<Result<_>>()?,
        })
    }
}

/// The parse result of one metadata file.
#[derive(Debug, Clone, Default)]
pub struct PcFileRecord {
    /// Variable name -> unsubstituted text as written.
    pub raw_variables: HashMap<String, String>,
    /// Variable name -> text after substitution.
    pub variables: HashMap<String, String>,
    /// Declared properties (known keys defaulted, unknown keys preserved).
    pub properties: Properties,
}

/// Read and parse a metadata file.
///
/// Fails with [`Error::EmptyFile`] when the file has no lines. An
/// undefined-variable failure is attributed to `path`.
pub fn read_pc_file(path: &Path, globals: &HashMap<String, String>) -> Result<PcFileRecord> {
    debug!(path = %path.display(), "parsing pc file");
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return Err(Error::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    parse_pc_file_lines(&lines, globals).map_err(|e| e.with_path(path))
}

/// Parse the lines of a metadata file.
pub fn parse_pc_file_lines(
    lines: &[&str],
    globals: &HashMap<String, String>,
) -> Result<PcFileRecord> {
    let mut record = PcFileRecord::default();
    let mut seen_props = HashSet::new();

    for line in merge_lines(lines)? {
        let line = strip_comments(&line);
        apply_line(line.trim(), &mut record, &mut seen_props, globals)?;
    }

    Ok(record)
}

/// Merge continuation lines into logical lines.
///
/// Trailing whitespace is stripped from every physical line, blank lines
/// are dropped, and a line ending with `\` has the marker removed and is
/// joined to the following line with a single space. A marker on the final
/// line has nothing to merge with and fails immediately.
fn merge_lines(lines: &[&str]) -> Result<Vec<String>> {
    if let Some(last) = lines.last()
        && last.trim_end().ends_with(CONTINUATION_CHAR)
    {
        return Err(Error::TrailingContinuation {
            line: last.trim_end().to_string(),
        });
    }

    let mut result = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let mut merged = lines[i].trim_end().to_string();
        if merged.is_empty() {
            i += 1;
            continue;
        }

        while merged.ends_with(CONTINUATION_CHAR) {
            merged.pop();
            merged.truncate(merged.trim_end().len());
            merged.push(' ');
            // In bounds: the final line was checked for a trailing marker.
            i += 1;
            merged.push_str(lines[i].trim_end());
            merged.truncate(merged.trim_end().len());
        }

        result.push(merged);
        i += 1;
    }

    Ok(result)
}

/// Remove the first `#` and everything after it.
fn strip_comments(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// A classified logical line.
enum LineKind<'a> {
    Property { key: &'a str, value: Option<&'a str> },
    Variable { key: &'a str, value: Option<&'a str> },
}

/// Classify a trimmed, comment-stripped line.
///
/// The key is a run of word characters and dots; the character after it
/// decides the grammar: `:` declares a property, `=` defines a variable.
/// Anything else is malformed and yields `None`.
fn classify_line<'a>(line: &'a str) -> Option<LineKind<'a>> {
    let key_end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(line.len());
    if key_end == 0 {
        return None;
    }
    let key = &line[..key_end];
    let rest = &line[key_end..];

    let trimmed_value = |remainder: &'a str| match remainder.trim() {
        "" => None,
        v => Some(v),
    };
    if let Some(remainder) = rest.strip_prefix(':') {
        Some(LineKind::Property {
            key,
            value: trimmed_value(remainder),
        })
    } else if let Some(remainder) = rest.strip_prefix('=') {
        Some(LineKind::Variable {
            key,
            value: trimmed_value(remainder),
        })
    } else {
        None
    }
}

fn apply_line(
    line: &str,
    record: &mut PcFileRecord,
    seen_props: &mut HashSet<String>,
    globals: &HashMap<String, String>,
) -> Result<()> {
    if line.is_empty() {
        return Ok(());
    }

    match classify_line(line) {
        None => {
            warn!(line, "skipping malformed line");
            Ok(())
        }
        Some(LineKind::Variable { key, value }) => {
            if record.variables.contains_key(key) {
                return Err(Error::DuplicateDefinition {
                    key: key.to_string(),
                });
            }
            let value = value.unwrap_or("");
            // A global with the same name overrides the file's own value;
            // the raw text is still recorded for introspection.
            let source = match globals.get(key) {
                Some(global_value) => {
                    debug!(key, value, "variable overridden by global");
                    global_value.as_str()
                }
                None => {
                    debug!(key, value, "adding variable");
                    value
                }
            };
            let resolved = substitute(source, &record.variables, globals)?;
            record.raw_variables.insert(key.to_string(), value.to_string());
            record.variables.insert(key.to_string(), resolved);
            Ok(())
        }
        Some(LineKind::Property { key, value }) => {
            let folded = key.to_ascii_lowercase();
            if KNOWN_PROPERTIES.contains(&folded.as_str()) {
                if !seen_props.insert(folded.clone()) {
                    return Err(Error::DuplicateDefinition {
                        key: key.to_string(),
                    });
                }
                debug!(key, ?value, "adding property");
                record
                    .properties
                    .set_known(&folded, value.unwrap_or("").to_string());
            } else {
                // Unknown keys may come from future revisions of the file
                // format; tolerate and preserve them.
                warn!(key, ?value, "unknown property key");
                record
                    .properties
                    .other
                    .insert(key.to_string(), value.unwrap_or("").to_string());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn parse(lines: &[&str]) -> Result<PcFileRecord> {
        parse_pc_file_lines(lines, &globals(&[]))
    }

    #[test]
    fn parse_simple_file() {
        let record = parse(&[
            "prefix=/usr",
            "libdir=${prefix}/lib",
            "",
            "Name: Foo",
            "Description: A test library",
            "Version: 1.2.3",
            "Libs: -L${libdir} -lfoo",
        ])
        .unwrap();

        assert_eq!(record.raw_variables["prefix"], "/usr");
        assert_eq!(record.raw_variables["libdir"], "${prefix}/lib");
        assert_eq!(record.variables["libdir"], "/usr/lib");
        assert_eq!(record.properties.name, "Foo");
        assert_eq!(record.properties.description, "A test library");
        assert_eq!(record.properties.version, "1.2.3");
        assert_eq!(record.properties.libs, "-L${libdir} -lfoo");
    }

    #[test]
    fn merge_continuation_lines() {
        let merged = merge_lines(&["a\\", "b"]).unwrap();
        assert_eq!(merged, vec!["a b"]);

        let merged = merge_lines(&["Libs: -lfoo \\", "  -lbar \\", "  -lbaz"]).unwrap();
        assert_eq!(merged, vec!["Libs: -lfoo   -lbar   -lbaz"]);
    }

    #[test]
    fn merge_drops_blank_lines() {
        let merged = merge_lines(&["a", "", "  ", "b"]).unwrap();
        assert_eq!(merged, vec!["a", "b"]);
    }

    #[test]
    fn trailing_continuation_fails() {
        let err = parse(&["Name: x", "Libs: -lfoo \\"]).unwrap_err();
        assert!(matches!(err, Error::TrailingContinuation { .. }));
    }

    #[test]
    fn comment_stripping() {
        assert_eq!(strip_comments("Name: foo # comment"), "Name: foo ");
        assert_eq!(strip_comments("# only comment"), "");

        let record = parse(&["# header", "Name: foo # trailing", "#", "Version: 1.0"]).unwrap();
        assert_eq!(record.properties.name, "foo");
        assert_eq!(record.properties.version, "1.0");
    }

    #[test]
    fn duplicate_property_fails() {
        let err = parse(&["Version: 1.0", "Version: 2.0"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition { .. }));
    }

    #[test]
    fn duplicate_property_detection_is_case_insensitive() {
        let err = parse(&["Version: 1.0", "VERSION: 2.0"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition { .. }));
    }

    #[test]
    fn duplicate_variable_fails() {
        let err = parse(&["prefix=/usr", "prefix=/opt"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition { .. }));
    }

    #[test]
    fn variable_substitution() {
        let record = parse(&["prefix=/usr", "libdir=${prefix}/lib"]).unwrap();
        assert_eq!(record.variables["libdir"], "/usr/lib");
    }

    #[test]
    fn forward_reference_is_undefined() {
        let err = parse(&["libdir=${prefix}/lib", "prefix=/usr"]).unwrap_err();
        match err {
            Error::UndefinedVariable { variable, .. } => assert_eq!(variable, "prefix"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn global_overrides_substituted_value_keeps_raw_text() {
        let g = globals(&[("prefix", "/opt")]);
        let record = parse_pc_file_lines(&["prefix=/usr", "libdir=${prefix}/lib"], &g).unwrap();
        assert_eq!(record.raw_variables["prefix"], "/usr");
        assert_eq!(record.variables["prefix"], "/opt");
        assert_eq!(record.variables["libdir"], "/opt/lib");
    }

    #[test]
    fn global_value_is_itself_substituted() {
        let g = globals(&[("libdir", "${prefix}/lib64")]);
        let record = parse_pc_file_lines(&["prefix=/usr", "libdir=/ignored"], &g).unwrap();
        assert_eq!(record.variables["libdir"], "/usr/lib64");
        assert_eq!(record.raw_variables["libdir"], "/ignored");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let record = parse(&["!!! not a line", "Name: foo", "key value", "Version: 1.0"]).unwrap();
        assert_eq!(record.properties.name, "foo");
        assert_eq!(record.properties.version, "1.0");
    }

    #[test]
    fn unknown_property_is_preserved_not_fatal() {
        let record = parse(&["Name: foo", "Frobnicate: yes"]).unwrap();
        assert_eq!(record.properties.other["Frobnicate"], "yes");
        assert_eq!(record.properties.get("Frobnicate"), Some("yes"));
    }

    #[test]
    fn property_keys_match_case_insensitively() {
        let record = parse(&["NAME: foo", "version: 1.0"]).unwrap();
        assert_eq!(record.properties.name, "foo");
        assert_eq!(record.properties.version, "1.0");
        assert_eq!(record.properties.get("Version"), Some("1.0"));
    }

    #[test]
    fn bare_property_takes_default() {
        let record = parse(&["Name: foo", "Libs:", "Description:"]).unwrap();
        assert_eq!(record.properties.libs, "");
        assert_eq!(record.properties.description, "");
    }

    #[test]
    fn bare_variable_is_empty() {
        let record = parse(&["prefix="]).unwrap();
        assert_eq!(record.raw_variables["prefix"], "");
        assert_eq!(record.variables["prefix"], "");
    }

    #[test]
    fn value_may_contain_equals_and_colons() {
        let record = parse(&[
            "CFLAGS=-DFOO=BAR -DBAZ=1",
            "URL: https://example.com/project",
        ])
        .unwrap();
        assert_eq!(record.raw_variables["CFLAGS"], "-DFOO=BAR -DBAZ=1");
        assert_eq!(record.properties.url, "https://example.com/project");
    }

    #[test]
    fn property_grammar_wins_over_variable_grammar() {
        // The delimiter directly after the key decides; a later '=' in the
        // value does not make this a variable.
        let record = parse(&["Name: foo=bar"]).unwrap();
        assert_eq!(record.properties.name, "foo=bar");
        assert!(record.raw_variables.is_empty());
    }

    #[test]
    fn dotted_keys_are_recognized() {
        let record = parse(&["Requires.private: zlib", "Libs.private: -lm"]).unwrap();
        assert_eq!(record.properties.requires_private, "zlib");
        assert_eq!(record.properties.libs_private, "-lm");
    }

    #[test]
    fn read_pc_file_reports_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pc");
        fs::write(&path, "").unwrap();
        let err = read_pc_file(&path, &globals(&[])).unwrap_err();
        assert!(matches!(err, Error::EmptyFile { .. }));
    }

    #[test]
    fn read_pc_file_attributes_undefined_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pc");
        fs::write(&path, "libdir=${nope}/lib\n").unwrap();
        let err = read_pc_file(&path, &globals(&[])).unwrap_err();
        match err {
            Error::UndefinedVariable { variable, path: p } => {
                assert_eq!(variable, "nope");
                assert_eq!(p.as_deref(), Some(path.as_path()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_pc_file_missing_is_io() {
        let err = read_pc_file(Path::new("/nonexistent/zzz.pc"), &globals(&[])).unwrap_err();
        assert!(err.is_unreadable());
    }
}
