//! Frontmatter parsing for content files.
//!
//! Content files start with an optional YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Heat Transfer Basics"
//! description: "Conduction, convection, radiation"
//! ---
//!
//! # Heat Transfer Basics
//! ```
//!
//! Fences and the YAML lines may be uniformly indented (the chapter converter
//! emits its header that way); the common indentation is removed before
//! parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parsed frontmatter fields.
///
/// `title` and `description` are what pages display; anything else is kept
/// in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Error returned for a fenced header that is not valid YAML.
#[derive(Debug, thiserror::Error)]
#[error("Invalid frontmatter: {0}")]
pub struct FrontmatterError(#[from] serde_yaml::Error);

/// Split a content file into frontmatter and body.
///
/// Returns `(None, source)` when the file has no header or the opening fence
/// is never closed. An empty header parses as [`Frontmatter::default`].
///
/// # Errors
///
/// Returns [`FrontmatterError`] if the fenced block is not valid YAML.
pub fn split_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = source.split_inclusive('\n');
    let mut offset = 0;

    // Opening fence: first non-blank line.
    loop {
        let Some(line) = lines.next() else {
            return Ok((None, source));
        };
        offset += line.len();
        if line.trim().is_empty() {
            continue;
        }
        if line.trim() != "---" {
            return Ok((None, source));
        }
        break;
    }

    let mut header = Vec::new();
    let mut closed = false;
    for line in lines {
        offset += line.len();
        if line.trim() == "---" {
            closed = true;
            break;
        }
        header.push(line.trim_end_matches(['\n', '\r']));
    }
    if !closed {
        return Ok((None, source));
    }

    let yaml = dedent(&header);
    let frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(&yaml)?
    };

    Ok((Some(frontmatter), &source[offset..]))
}

/// Remove the indentation shared by all non-blank lines.
fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for line in lines {
        // Blank lines may be shorter than the indent.
        out.push_str(line.get(indent..).unwrap_or(""));
        out.push('\n');
    }
    out
}
