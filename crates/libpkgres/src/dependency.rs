//! Dependency constraints and the package spec list scanner.
//!
//! A [`Dependency`] names a package together with an optional version
//! restriction (`zlib`, `glib-2.0 >= 2.50`). [`parse_spec_list`] turns the
//! free-text form found in `Requires:`-style property values and on command
//! lines into a sequence of dependencies.

use std::fmt;

use tracing::debug;

use crate::version::VersionValue;

/// Relational operators usable in a version restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelOp {
    /// Any version matches (no restriction was written).
    #[default]
    Any,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEqual,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterThanEqual,
    /// `>`
    GreaterThan,
}

impl RelOp {
    /// Parse an operator token. `=` and `==` both mean [`RelOp::Equal`];
    /// an empty token means [`RelOp::Any`]. Unknown tokens yield `None`.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "" => Some(Self::Any),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanEqual),
            "=" | "==" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            ">=" => Some(Self::GreaterThanEqual),
            ">" => Some(Self::GreaterThan),
            _ => None,
        }
    }

    /// The textual form of this operator. [`RelOp::Any`] has no textual
    /// form and renders as the empty string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThanEqual => ">=",
            Self::GreaterThan => ">",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Characters that can form an operator token.
pub fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '!' | '=')
}

/// Characters that separate entries in a spec list.
pub fn is_separator_char(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// A package name with an optional version restriction.
///
/// Invariant: when `op` is [`RelOp::Any`] the version is empty, and an
/// empty version implies `op` is `Any`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub op: RelOp,
    pub version: VersionValue,
}

impl Dependency {
    /// Create a dependency with a version restriction.
    pub fn new(name: impl Into<String>, op: RelOp, version: VersionValue) -> Self {
        debug_assert!(
            (op == RelOp::Any) == version.is_empty(),
            "Any must pair with the empty version"
        );
        Self {
            name: name.into(),
            op,
            version,
        }
    }

    /// Create a dependency with no version restriction.
    pub fn unversioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: RelOp::Any,
            version: VersionValue::empty(),
        }
    }

    /// Whether `candidate` satisfies this restriction
    /// (`candidate <op> self.version`). [`RelOp::Any`] matches everything,
    /// including the empty version.
    pub fn meets_requirement(&self, candidate: &VersionValue) -> bool {
        match self.op {
            RelOp::Any => true,
            RelOp::LessThan => candidate < &self.version,
            RelOp::LessThanEqual => candidate <= &self.version,
            RelOp::Equal => candidate == &self.version,
            RelOp::NotEqual => candidate != &self.version,
            RelOp::GreaterThanEqual => candidate >= &self.version,
            RelOp::GreaterThan => candidate > &self.version,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}{}{}", self.name, self.op, self.version)
        }
    }
}

/// Scan a free-text package spec list into dependencies.
///
/// Entries are separated by commas and/or whitespace. Each entry is a bare
/// name or `name <op> version` with the whitespace around the operator
/// optional. Name characters are anything except separators and operator
/// characters. The scanner is deliberately permissive: malformed or empty
/// input yields an empty or shortened sequence, never an error. A trailing
/// operator with no version degrades the entry to a bare name; an
/// unrecognizable operator token drops the restriction.
pub fn parse_spec_list(text: &str) -> Vec<Dependency> {
    let mut deps = Vec::new();
    let mut rest = text;

    loop {
        rest = rest.trim_start_matches(is_separator_char);
        if rest.is_empty() {
            break;
        }

        // Stray operator characters with no preceding name are skipped.
        if rest.starts_with(is_operator_char) {
            rest = rest.trim_start_matches(is_operator_char);
            continue;
        }

        let name_end = rest
            .find(|c| is_separator_char(c) || is_operator_char(c))
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = &rest[name_end..];

        // An operator may follow, separated by optional whitespace (a comma
        // always terminates the entry).
        let after_name = rest.trim_start_matches(char::is_whitespace);
        if !after_name.starts_with(is_operator_char) {
            deps.push(Dependency::unversioned(name));
            continue;
        }

        let op_end = after_name
            .find(|c: char| !is_operator_char(c))
            .unwrap_or(after_name.len());
        let op_token = &after_name[..op_end];
        let after_op = after_name[op_end..].trim_start_matches(char::is_whitespace);

        let ver_end = after_op
            .find(|c: char| c.is_whitespace() || c == ',')
            .unwrap_or(after_op.len());
        let ver_token = &after_op[..ver_end];
        rest = &after_op[ver_end..];

        let version = VersionValue::parse(ver_token);
        match RelOp::from_token(op_token) {
            Some(op) if op != RelOp::Any && !version.is_empty() => {
                deps.push(Dependency::new(name, op, version));
            }
            _ => {
                debug!(name, op_token, ver_token, "dropping unusable version restriction");
                deps.push(Dependency::unversioned(name));
            }
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(name: &str, op: RelOp, ver: &str) -> Dependency {
        Dependency::new(name, op, VersionValue::parse(ver))
    }

    #[test]
    fn relop_from_token() {
        assert_eq!(RelOp::from_token(""), Some(RelOp::Any));
        assert_eq!(RelOp::from_token("="), Some(RelOp::Equal));
        assert_eq!(RelOp::from_token("=="), Some(RelOp::Equal));
        assert_eq!(RelOp::from_token("!="), Some(RelOp::NotEqual));
        assert_eq!(RelOp::from_token("<"), Some(RelOp::LessThan));
        assert_eq!(RelOp::from_token("<="), Some(RelOp::LessThanEqual));
        assert_eq!(RelOp::from_token(">"), Some(RelOp::GreaterThan));
        assert_eq!(RelOp::from_token(">="), Some(RelOp::GreaterThanEqual));
        assert_eq!(RelOp::from_token("<>"), None);
        assert_eq!(RelOp::from_token("~="), None);
    }

    #[test]
    fn any_matches_everything() {
        let d = Dependency::unversioned("foo");
        assert!(d.meets_requirement(&VersionValue::parse("0.0.1")));
        assert!(d.meets_requirement(&VersionValue::parse("999")));
        assert!(d.meets_requirement(&VersionValue::empty()));
    }

    #[test]
    fn meets_requirement_relational() {
        let d = dep("foo", RelOp::GreaterThanEqual, "1.2");
        assert!(d.meets_requirement(&VersionValue::parse("1.2")));
        assert!(d.meets_requirement(&VersionValue::parse("1.3")));
        assert!(!d.meets_requirement(&VersionValue::parse("1.1")));

        let d = dep("foo", RelOp::LessThan, "2.0");
        assert!(d.meets_requirement(&VersionValue::parse("1.9")));
        assert!(!d.meets_requirement(&VersionValue::parse("2.0")));

        let d = dep("foo", RelOp::NotEqual, "1.0");
        assert!(d.meets_requirement(&VersionValue::parse("1.1")));
        assert!(!d.meets_requirement(&VersionValue::parse("1.0")));
    }

    #[test]
    fn display_omits_empty_version() {
        assert_eq!(Dependency::unversioned("zlib").to_string(), "zlib");
        assert_eq!(
            dep("glib-2.0", RelOp::GreaterThanEqual, "2.50").to_string(),
            "glib-2.0>=2.50"
        );
    }

    #[test]
    fn parse_single_name() {
        assert_eq!(parse_spec_list("zlib"), vec![Dependency::unversioned("zlib")]);
    }

    #[test]
    fn parse_names_with_separators() {
        let expected = vec![
            Dependency::unversioned("a"),
            Dependency::unversioned("b"),
            Dependency::unversioned("c"),
        ];
        assert_eq!(parse_spec_list("a b c"), expected);
        assert_eq!(parse_spec_list("a, b, c"), expected);
        assert_eq!(parse_spec_list("a,b,c"), expected);
        assert_eq!(parse_spec_list("  a\tb ,, c  "), expected);
    }

    #[test]
    fn parse_versioned_entries() {
        assert_eq!(
            parse_spec_list("glib-2.0 >= 2.50"),
            vec![dep("glib-2.0", RelOp::GreaterThanEqual, "2.50")]
        );
        assert_eq!(
            parse_spec_list("glib-2.0>=2.50"),
            vec![dep("glib-2.0", RelOp::GreaterThanEqual, "2.50")]
        );
        assert_eq!(
            parse_spec_list("foo = 1.0, bar != 2, baz"),
            vec![
                dep("foo", RelOp::Equal, "1.0"),
                dep("bar", RelOp::NotEqual, "2"),
                Dependency::unversioned("baz"),
            ]
        );
    }

    #[test]
    fn parse_preserves_order() {
        let deps = parse_spec_list("z a m");
        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn parse_empty_and_blank_input() {
        assert!(parse_spec_list("").is_empty());
        assert!(parse_spec_list("   \t ").is_empty());
        assert!(parse_spec_list(", ,,").is_empty());
    }

    #[test]
    fn parse_trailing_operator_degrades_to_bare_name() {
        assert_eq!(parse_spec_list("foo >="), vec![Dependency::unversioned("foo")]);
    }

    #[test]
    fn parse_unknown_operator_drops_restriction() {
        assert_eq!(
            parse_spec_list("foo <> 1.0"),
            vec![Dependency::unversioned("foo")]
        );
    }

    #[test]
    fn parse_stray_operator_chars_skipped() {
        assert_eq!(parse_spec_list(">= 1.0"), vec![Dependency::unversioned("1.0")]);
    }

    #[test]
    fn render_reparse_round_trip() {
        let original = dep("gtk+-3.0", RelOp::LessThanEqual, "3.24");
        let reparsed = parse_spec_list(&original.to_string());
        assert_eq!(reparsed, vec![original]);
    }
}
