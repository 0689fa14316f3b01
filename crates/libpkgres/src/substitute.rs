//! Variable substitution for `.pc` file values.
//!
//! References use the `${name}` syntax. Resolution prefers the file's own
//! in-progress variable map and falls back to the caller's globals, so a
//! value may use any variable defined earlier in the same file or any
//! global. Substitution is a single left-to-right pass: replacement text is
//! never re-scanned, which is why forward references surface as undefined
//! rather than being resolved late.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};

/// Replace every `${name}` reference in `text`.
///
/// Fails with [`Error::UndefinedVariable`] (path unattributed) when a
/// referenced name is in neither `vars` nor `globals`. An unterminated
/// `${` is copied through literally.
pub fn substitute(
    text: &str,
    vars: &HashMap<String, String>,
    globals: &HashMap<String, String>,
) -> Result<String> {
    let bytes = text.as_bytes();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            let start = i + 2;
            match text[start..].find('}') {
                Some(off) => {
                    let name = &text[start..start + off];
                    let value = vars
                        .get(name)
                        .or_else(|| globals.get(name))
                        .ok_or_else(|| Error::UndefinedVariable {
                            variable: name.to_string(),
                            path: None,
                        })?;
                    debug!(name, value, "substituted variable reference");
                    result.push_str(value);
                    i = start + off + 1;
                }
                None => {
                    // Unterminated reference, emit the rest literally.
                    result.push_str(&text[i..]);
                    break;
                }
            }
        } else {
            let c = text[i..].chars().next().expect("in-bounds char boundary");
            result.push(c);
            i += c.len_utf8();
        }
    }

    Ok(result)
}
