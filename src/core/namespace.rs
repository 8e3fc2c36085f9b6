//! # Namespace Parser
//!
//! Parses hierarchical command identifiers such as `frontend:component` or
//! `frontend/component` into segments, validates them against depth and
//! segment-shape bounds, and derives related namespaces (parent, ancestors).
//!
//! Everything here is pure: no I/O, no shared state.

use crate::models::ParsedNamespace;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static! {
    // Alphanumeric runs joined by single hyphens; no leading/trailing hyphen.
    static ref DEFAULT_SEGMENT_RE: Regex =
        Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$").expect("segment pattern is valid");
}

/// Separator used by the colon-separated form (`a:b:c`).
pub const COLON_SEPARATOR: char = ':';

/// Separator used by the path form (`a/b/c`).
pub const PATH_SEPARATOR: char = '/';

/// Which depth bound a namespace violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthBound {
    Min,
    Max,
}

impl fmt::Display for DepthBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => f.write_str("minimum"),
            Self::Max => f.write_str("maximum"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The input is empty, has no usable segments, or a segment has the wrong shape.
    #[error("Invalid namespace syntax in '{raw}': {reason}")]
    InvalidSyntax {
        /// The rejected input.
        raw: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The namespace is shallower or deeper than allowed.
    #[error(
        "Namespace '{raw}' violates the {violated_bound} depth of {limit} (actual depth: {actual_depth})"
    )]
    Validation {
        /// The rejected input.
        raw: String,
        /// The bound that was crossed.
        violated_bound: DepthBound,
        /// The configured value of that bound.
        limit: usize,
        /// The depth the input actually has.
        actual_depth: usize,
    },
}

type NamespaceResult<T> = Result<T, NamespaceError>;

/// Bounds applied by [`validate`] and [`validate_strict`].
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub min_depth: usize,
    pub max_depth: usize,
    /// Overrides the default segment shape when set.
    pub segment_pattern: Option<Regex>,
    pub allow_empty_segments: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            min_depth: 1,
            max_depth: 5,
            segment_pattern: None,
            allow_empty_segments: false,
        }
    }
}

/// Picks the separator for a raw identifier: `:` wins over `/`.
fn separator_for(raw: &str) -> Option<char> {
    if raw.contains(COLON_SEPARATOR) {
        Some(COLON_SEPARATOR)
    } else if raw.contains(PATH_SEPARATOR) {
        Some(PATH_SEPARATOR)
    } else {
        None
    }
}

/// Splits a raw identifier without dropping empty pieces.
fn raw_segments(raw: &str) -> Vec<&str> {
    match separator_for(raw) {
        Some(sep) => raw.split(sep).collect(),
        None => vec![raw],
    }
}

/// Parses a raw identifier into its segments.
///
/// Splits on `:` if present, otherwise on `/`, otherwise treats the whole
/// input as one segment. Empty segments are dropped.
///
/// # Errors
/// Returns `NamespaceError::InvalidSyntax` if the input is blank or yields no
/// segments after filtering.
pub fn parse(raw: &str) -> NamespaceResult<ParsedNamespace> {
    if raw.trim().is_empty() {
        return Err(NamespaceError::InvalidSyntax {
            raw: raw.to_string(),
            reason: "namespace is empty".to_string(),
        });
    }

    let segments: Vec<String> = raw_segments(raw)
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if segments.is_empty() {
        return Err(NamespaceError::InvalidSyntax {
            raw: raw.to_string(),
            reason: "namespace has no segments".to_string(),
        });
    }

    Ok(ParsedNamespace::from_segments(raw.to_string(), segments))
}

/// Returns whether `raw` satisfies `options`. Never fails.
pub fn validate(raw: &str, options: &ValidationOptions) -> bool {
    validate_strict(raw, options).is_ok()
}

/// Validates `raw` against `options`, returning the parsed namespace on success.
///
/// # Errors
/// `NamespaceError::Validation` when the depth is out of bounds, and
/// `NamespaceError::InvalidSyntax` when a segment is empty (and empties are not
/// allowed) or does not match the segment pattern.
pub fn validate_strict(raw: &str, options: &ValidationOptions) -> NamespaceResult<ParsedNamespace> {
    let parsed = parse(raw)?;

    if !options.allow_empty_segments && raw_segments(raw).iter().any(|s| s.is_empty()) {
        return Err(NamespaceError::InvalidSyntax {
            raw: raw.to_string(),
            reason: "namespace contains an empty segment".to_string(),
        });
    }

    if parsed.depth < options.min_depth {
        return Err(NamespaceError::Validation {
            raw: raw.to_string(),
            violated_bound: DepthBound::Min,
            limit: options.min_depth,
            actual_depth: parsed.depth,
        });
    }
    if parsed.depth > options.max_depth {
        return Err(NamespaceError::Validation {
            raw: raw.to_string(),
            violated_bound: DepthBound::Max,
            limit: options.max_depth,
            actual_depth: parsed.depth,
        });
    }

    let pattern = options
        .segment_pattern
        .as_ref()
        .unwrap_or(&*DEFAULT_SEGMENT_RE);
    if let Some(bad) = parsed.segments.iter().find(|s| !pattern.is_match(s)) {
        return Err(NamespaceError::InvalidSyntax {
            raw: raw.to_string(),
            reason: format!("segment '{}' does not match pattern '{}'", bad, pattern.as_str()),
        });
    }

    Ok(parsed)
}

/// Normalizes an identifier to its colon-separated form, falling back to the
/// input unchanged when it cannot be parsed.
pub fn normalize(raw: &str) -> String {
    parse(raw)
        .map(|p| p.to_colon_separated())
        .unwrap_or_else(|_| raw.to_string())
}

impl ParsedNamespace {
    fn from_segments(original: String, segments: Vec<String>) -> Self {
        let canonical_path = segments.join("/");
        let depth = segments.len();
        Self {
            original,
            segments,
            canonical_path,
            depth,
        }
    }

    /// `a/b/c`
    pub fn to_path(&self) -> String {
        self.segments.join("/")
    }

    /// `a:b:c`
    pub fn to_colon_separated(&self) -> String {
        self.segments.join(":")
    }

    /// The last segment.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Drops the last segment. A single-segment namespace has no parent.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        if init.is_empty() {
            return None;
        }
        let segments = init.to_vec();
        Some(Self::from_segments(segments.join(":"), segments))
    }

    /// True if `self` is a proper prefix of `other`.
    pub fn is_parent_of(&self, other: &Self) -> bool {
        self.depth < other.depth && other.segments.starts_with(&self.segments)
    }

    /// Every proper prefix, from the root down to the immediate parent.
    pub fn ancestors(&self) -> Vec<Self> {
        (1..self.depth)
            .filter_map(|len| self.segments.get(..len))
            .map(|prefix| {
                let segments = prefix.to_vec();
                Self::from_segments(segments.join(":"), segments)
            })
            .collect()
    }
}
