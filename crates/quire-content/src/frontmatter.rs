//! Front-matter extraction.
//!
//! A front-matter block is YAML at the very top of a content file, opened
//! by a line containing exactly `---` and closed by the next such line:
//!
//! ```text
//! ---
//! title: Button
//! category: components
//! ---
//! # Body starts here
//! ```
//!
//! Values are kept dynamically typed as [`serde_json::Value`]; consumers read
//! them through [`string_field`], which checks the value kind.

use std::collections::BTreeMap;

/// Front-matter mapping with deterministic key order.
pub type Frontmatter = BTreeMap<String, serde_json::Value>;

const DELIMITER: &str = "---";

/// Error for a front-matter block that exists but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// Opening delimiter without a closing one.
    #[error("front-matter block is not terminated")]
    Unterminated,
    /// Block is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Block is valid YAML but not a key/value mapping.
    #[error("front-matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
    /// A value cannot be represented as JSON.
    #[error("unsupported value: {0}")]
    Value(#[from] serde_json::Error),
}

/// Content text split into front-matter and body.
#[derive(Debug, PartialEq)]
pub struct FrontmatterSplit<'a> {
    /// Parsed front-matter (empty when the file has none).
    pub frontmatter: Frontmatter,
    /// Remaining text after the closing delimiter.
    pub body: &'a str,
}

/// Split content text into front-matter and body.
///
/// Text without a leading `---` line has empty front-matter and is all body.
///
/// # Errors
///
/// Returns [`FrontmatterError`] if a block is opened but not closed, or if
/// its content is not a YAML mapping.
pub fn split_frontmatter(text: &str) -> Result<FrontmatterSplit<'_>, FrontmatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(FrontmatterSplit {
            frontmatter: Frontmatter::new(),
            body: text,
        });
    };
    if trim_line_ending(first) != DELIMITER {
        return Ok(FrontmatterSplit {
            frontmatter: Frontmatter::new(),
            body: text,
        });
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if trim_line_ending(line) == DELIMITER {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Ok(FrontmatterSplit {
                frontmatter: parse_frontmatter(block)?,
                body,
            });
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// Parse a front-matter block (without delimiters).
///
/// Empty blocks and YAML `null` produce an empty mapping. Keys that are
/// numbers or booleans are converted to strings; other non-string keys are
/// skipped.
///
/// # Errors
///
/// Returns [`FrontmatterError`] if the YAML is malformed or is not a mapping.
pub fn parse_frontmatter(block: &str) -> Result<Frontmatter, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(block)?;
    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => return Ok(Frontmatter::new()),
        serde_yaml::Value::Bool(_) => return Err(FrontmatterError::NotAMapping("a boolean")),
        serde_yaml::Value::Number(_) => return Err(FrontmatterError::NotAMapping("a number")),
        serde_yaml::Value::String(_) => return Err(FrontmatterError::NotAMapping("a string")),
        serde_yaml::Value::Sequence(_) => return Err(FrontmatterError::NotAMapping("a list")),
        serde_yaml::Value::Tagged(_) => return Err(FrontmatterError::NotAMapping("a tagged value")),
    };

    let mut frontmatter = Frontmatter::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        frontmatter.insert(key, serde_json::to_value(value)?);
    }
    Ok(frontmatter)
}

/// Read a string field, ignoring blank strings and values of other kinds.
#[must_use]
pub fn string_field<'a>(frontmatter: &'a Frontmatter, key: &str) -> Option<&'a str> {
    frontmatter
        .get(key)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
