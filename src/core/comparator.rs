// src/core/comparator.rs

//! Structural diffs between two snapshots of a manifest.
//!
//! Commands are matched by name. `allowed-tools` is compared as a set, so a
//! change of representation alone never counts as a modification.

use crate::models::{
    ChangeRecord, ChangeType, Command, ComparisonSummary, FieldDiff, Manifest, ManifestComparison,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};

fn index_by_name(manifest: &Manifest) -> HashMap<&str, &Command> {
    let mut index = HashMap::with_capacity(manifest.commands.len());
    for command in &manifest.commands {
        index.entry(command.name.as_str()).or_insert(command);
    }
    index
}

fn diff_field(
    diffs: &mut Vec<FieldDiff>,
    field: &'static str,
    old: Option<String>,
    new: Option<String>,
) {
    if old != new {
        diffs.push(FieldDiff {
            field,
            old_value: old,
            new_value: new,
        });
    }
}

/// Lists every field that differs between two versions of one command.
pub fn field_diffs(old: &Command, new: &Command) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();
    diff_field(&mut diffs, "name", Some(old.name.clone()), Some(new.name.clone()));
    diff_field(
        &mut diffs,
        "description",
        Some(old.description.clone()),
        Some(new.description.clone()),
    );
    diff_field(&mut diffs, "file", Some(old.file.clone()), Some(new.file.clone()));
    diff_field(
        &mut diffs,
        "argument-hint",
        old.argument_hint.clone(),
        new.argument_hint.clone(),
    );
    diff_field(
        &mut diffs,
        "namespace",
        old.namespace.clone(),
        new.namespace.clone(),
    );
    if old.allowed_tools != new.allowed_tools {
        diffs.push(FieldDiff {
            field: "allowed-tools",
            old_value: Some(old.allowed_tools.to_string()),
            new_value: Some(new.allowed_tools.to_string()),
        });
    }
    diffs
}

/// Field-level equality with `allowed-tools` compared as a set.
pub fn commands_equal(a: &Command, b: &Command) -> bool {
    a == b
}

/// Computes what was added, removed and modified going from `old` to `new`.
///
/// Added and modified records follow the order of `new`; removed records
/// follow the order of `old` and come last.
pub fn compare_manifests(old: &Manifest, new: &Manifest) -> ManifestComparison {
    let old_index = index_by_name(old);
    let new_index = index_by_name(new);
    let mut changes = Vec::new();
    let mut seen = HashSet::new();

    for command in &new.commands {
        if !seen.insert(command.name.as_str()) {
            continue;
        }
        match old_index.get(command.name.as_str()) {
            None => changes.push(ChangeRecord {
                change_type: ChangeType::Added,
                name: command.name.clone(),
                old_command: None,
                new_command: Some(command.clone()),
                field_diffs: Vec::new(),
            }),
            Some(previous) if !commands_equal(previous, command) => {
                changes.push(ChangeRecord {
                    change_type: ChangeType::Modified,
                    name: command.name.clone(),
                    old_command: Some((*previous).clone()),
                    new_command: Some(command.clone()),
                    field_diffs: field_diffs(previous, command),
                });
            }
            Some(_) => {}
        }
    }

    let mut removed_seen = HashSet::new();
    for command in &old.commands {
        if new_index.contains_key(command.name.as_str())
            || !removed_seen.insert(command.name.as_str())
        {
            continue;
        }
        changes.push(ChangeRecord {
            change_type: ChangeType::Removed,
            name: command.name.clone(),
            old_command: Some(command.clone()),
            new_command: None,
            field_diffs: Vec::new(),
        });
    }

    let count = |kind: ChangeType| changes.iter().filter(|c| c.change_type == kind).count();
    let added = count(ChangeType::Added);
    let removed = count(ChangeType::Removed);
    let modified = count(ChangeType::Modified);
    let total = added + removed + modified;

    ManifestComparison {
        summary: ComparisonSummary {
            added,
            removed,
            modified,
            total,
            has_changes: total > 0,
        },
        changes,
        compared_at: Utc::now(),
    }
}

/// Fast equality check. Differing command counts, `version` or `updated`
/// prove inequality without looking at any command.
pub fn are_manifests_identical(old: &Manifest, new: &Manifest) -> bool {
    if old.commands.len() != new.commands.len()
        || old.version != new.version
        || old.updated != new.updated
    {
        return false;
    }
    !compare_manifests(old, new).summary.has_changes
}
