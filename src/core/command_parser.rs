// src/core/command_parser.rs

//! Parser for Markdown command files.
//!
//! A command file is Markdown with an optional `---` frontmatter block:
//!
//! ```text
//! ---
//! description: Write a conventional commit message
//! allowed-tools: Bash(git diff:*), Read
//! argument-hint: [scope]
//! ---
//! Body of the prompt...
//! ```
//!
//! `allowed-tools` may also be written as an inline `[A, B]` list or as a
//! block list of `- item` lines. Without frontmatter the first non-empty body
//! line (minus any leading `#`) is the description.

use crate::models::{Command, ToolSet};
use std::collections::HashMap;
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Command file is empty")]
    Empty,
    #[error("Frontmatter block is opened with '---' but never closed")]
    UnterminatedFrontmatter,
    #[error("Command file has no description")]
    MissingDescription,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Everything a command file declares about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommandFile {
    pub description: String,
    pub allowed_tools: ToolSet,
    pub argument_hint: Option<String>,
    /// Explicit `name`, overriding the one derived from the file location.
    pub name: Option<String>,
    /// Explicit `namespace`, overriding the one derived from directories.
    pub namespace: Option<String>,
    pub body: String,
}

impl ParsedCommandFile {
    /// Builds a [`Command`], using the derived name and namespace unless the
    /// file declared its own.
    pub fn into_command(
        self,
        derived_name: String,
        derived_namespace: Option<String>,
        file: String,
    ) -> Command {
        Command {
            name: self.name.unwrap_or(derived_name),
            description: self.description,
            file,
            allowed_tools: self.allowed_tools,
            argument_hint: self.argument_hint,
            namespace: self.namespace.or(derived_namespace),
        }
    }
}

/// Splits `content` into its frontmatter (without fences) and body.
///
/// # Errors
/// Returns `ParseError::UnterminatedFrontmatter` when the opening fence has no
/// matching closing fence.
pub fn split_frontmatter(content: &str) -> Result<(Option<&str>, &str), ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let front_start = match lines.next() {
        Some(first) if first.trim_end() == FENCE => first.len(),
        _ => return Ok((None, content)),
    };

    let mut offset = front_start;
    for line in lines {
        if line.trim_end() == FENCE {
            let front = content.get(front_start..offset).unwrap_or_default();
            let body = content.get(offset + line.len()..).unwrap_or_default();
            return Ok((Some(front), body));
        }
        offset += line.len();
    }
    Err(ParseError::UnterminatedFrontmatter)
}

fn unquote(value: &str) -> String {
    value
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}

fn inline_list(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(unquote)
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn parse_fields(front: &str) -> HashMap<String, FieldValue> {
    let mut fields = HashMap::new();
    let mut open_list: Option<String> = None;

    for line in front.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let (Some(item), Some(key)) = (trimmed.strip_prefix("- "), &open_list) {
            if let Some(FieldValue::List(items)) = fields.get_mut(key) {
                items.push(unquote(item));
            }
            continue;
        }
        open_list = None;

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = value.trim();

        let parsed = if value.is_empty() {
            open_list = Some(key.clone());
            FieldValue::List(Vec::new())
        } else {
            FieldValue::Scalar(unquote(value))
        };
        fields.insert(key, parsed);
    }
    fields
}

fn heading_description(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .filter(|line| !line.is_empty())
}

/// Parses a command file.
///
/// # Errors
/// Fails on empty content, an unterminated frontmatter block, or when no
/// description can be found.
pub fn parse(content: &str) -> Result<ParsedCommandFile, ParseError> {
    if content.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let (front, body) = split_frontmatter(content)?;
    let fields = front.map(parse_fields).unwrap_or_default();
    let scalar = |key: &str| {
        fields
            .get(key)
            .and_then(FieldValue::as_scalar)
            .map(str::to_string)
    };

    let description = scalar("description")
        .or_else(|| heading_description(body))
        .ok_or(ParseError::MissingDescription)?;

    let allowed_tools = match fields.get("allowed-tools") {
        Some(FieldValue::Scalar(s)) => match inline_list(s) {
            Some(items) => items.into_iter().collect(),
            None => ToolSet::from(s.as_str()),
        },
        Some(FieldValue::List(items)) => items.iter().cloned().collect(),
        None => ToolSet::default(),
    };

    Ok(ParsedCommandFile {
        description,
        allowed_tools,
        argument_hint: scalar("argument-hint"),
        name: scalar("name"),
        namespace: scalar("namespace"),
        body: body.to_string(),
    })
}

/// Minimal structural check run before a downloaded file is installed.
///
/// # Errors
/// Returns the reason the content is not a well-formed command file.
pub fn validate(content: &str) -> Result<(), ParseError> {
    parse(content).map(|_| ())
}
