// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

// --- WIRE MODELS (What is read from a manifest or a command file) ---

/// The `allowed-tools` field as it appears on the wire: either one
/// comma-separated string or a list of tool names.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum AllowedTools {
    List(Vec<String>),
    Single(String),
}

/// The canonical shape of `allowed-tools`: an ordered set of grants.
///
/// Both wire forms collapse into this on deserialization, so `"Bash, Read"`
/// and `["Read", "Bash"]` produce equal values. Serialization always writes
/// the list form.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(from = "AllowedTools", into = "Vec<String>")]
pub struct ToolSet(BTreeSet<String>);

impl ToolSet {
    /// Returns the tools in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tool: &str) -> bool {
        self.0.contains(tool)
    }
}

impl From<AllowedTools> for ToolSet {
    fn from(value: AllowedTools) -> Self {
        let tools = match value {
            AllowedTools::Single(s) => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            AllowedTools::List(list) => list
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };
        Self(tools)
    }
}

impl From<&str> for ToolSet {
    fn from(value: &str) -> Self {
        AllowedTools::Single(value.to_string()).into()
    }
}

impl<S: Into<String>> FromIterator<S> for ToolSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AllowedTools::List(iter.into_iter().map(Into::into).collect()).into()
    }
}

impl From<ToolSet> for Vec<String> {
    fn from(value: ToolSet) -> Self {
        value.0.into_iter().collect()
    }
}

impl fmt::Display for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// One named, described, installable command.
///
/// Derived equality covers exactly the fields the comparator diffs, with
/// `allowed_tools` compared as a set.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub file: String,
    #[serde(rename = "allowed-tools")]
    pub allowed_tools: ToolSet,
    #[serde(
        rename = "argument-hint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub argument_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// The versioned catalog of commands for one language.
///
/// Never mutated after construction; a new fetch or scan yields a new value.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub updated: String,
    pub commands: Vec<Command>,
}

impl Manifest {
    /// Looks a command up by its exact name.
    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }
}

// --- CACHE MODELS ---

/// A persisted cache value, superseded (never mutated) by the next write.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Write time, in milliseconds since the Unix epoch.
    pub timestamp: u64,
    #[serde(rename = "version", default)]
    pub format_version: String,
}

// --- NAMESPACE MODELS ---

/// A hierarchical identifier split into its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNamespace {
    pub original: String,
    pub segments: Vec<String>,
    /// Segments joined with `/`.
    pub canonical_path: String,
    pub depth: usize,
}

// --- LOCATION MODELS ---

/// The two filesystem roots commands can be installed into.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum InstallLocation {
    Personal,
    Project,
}

impl InstallLocation {
    /// Search order used whenever both roots are consulted.
    pub const SEARCH_ORDER: [Self; 2] = [Self::Personal, Self::Project];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for InstallLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freshly probed view of one install root. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryDescriptor {
    pub path: PathBuf,
    pub kind: InstallLocation,
    pub exists: bool,
    pub writable: bool,
}

// --- INSTALLATION MODELS ---

/// Where an installed file's content came from.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Repository,
    Local,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InstallationRecord {
    pub name: String,
    pub file_path: PathBuf,
    pub location: InstallLocation,
    pub installed_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub source: RecordSource,
    /// Manifest version the content was installed from, when known.
    pub provenance_version: Option<String>,
    /// Truncated blake3 digest of the file content.
    pub content_hash: Option<String>,
}

/// Per-location totals of installed commands.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationSummary {
    pub personal: Vec<String>,
    pub project: Vec<String>,
    pub total: usize,
}

// --- COMPARISON MODELS ---

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

/// One field that differs between two versions of a command.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub field: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub change_type: ChangeType,
    pub name: String,
    pub old_command: Option<Command>,
    pub new_command: Option<Command>,
    /// Only populated for `Modified` records.
    pub field_diffs: Vec<FieldDiff>,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub total: usize,
    pub has_changes: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct ManifestComparison {
    pub summary: ComparisonSummary,
    pub changes: Vec<ChangeRecord>,
    pub compared_at: DateTime<Utc>,
}

// --- ENRICHMENT MODELS ---

/// A place a command was seen in.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CommandSource {
    Repository,
    Personal,
    Project,
}

impl From<InstallLocation> for CommandSource {
    fn from(value: InstallLocation) -> Self {
        match value {
            InstallLocation::Personal => Self::Personal,
            InstallLocation::Project => Self::Project,
        }
    }
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Repository => "repository",
            Self::Personal => "personal",
            Self::Project => "project",
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InstallationStatus {
    pub is_installed: bool,
    pub install_location: Option<InstallLocation>,
    pub install_path: Option<PathBuf>,
    /// The local copy differs from upstream in description, tools or hint.
    pub has_local_changes: bool,
}

/// The merged, provenance-aware view of one command.
#[derive(Serialize, Debug, Clone)]
pub struct EnrichedCommand {
    #[serde(flatten)]
    pub command: Command,
    pub source: CommandSource,
    pub available_in_sources: BTreeSet<CommandSource>,
    pub installation_status: Option<InstallationStatus>,
}
