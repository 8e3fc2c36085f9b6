// src/system/scanner.rs

//! Breadth-first directory scanning with an explicit work queue.

use log::{trace, warn};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Collects every file under `root` whose extension is `extension`, walking
/// directories level by level. Hidden directories and directory symlinks are
/// not entered, and subdirectories that cannot be read are logged and skipped.
///
/// Results are sorted so repeated scans of the same tree agree.
///
/// # Errors
/// Fails only if `root` itself cannot be read.
pub fn scan_files(root: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut queue = VecDeque::new();

    // The root is read eagerly so a missing or unreadable root is an error.
    let root_entries = fs::read_dir(root)?;
    queue.push_back((root.to_path_buf(), Some(root_entries)));

    while let Some((dir, entries)) = queue.pop_front() {
        let entries = match entries.map_or_else(|| fs::read_dir(&dir), Ok) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping unreadable directory '{}': {}", dir.display(), e);
                continue;
            }
        };
        trace!("Scanning '{}'", dir.display());

        let mut children: Vec<(PathBuf, fs::FileType)> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_type().ok().map(|ft| (entry.path(), ft)))
            .collect();
        children.sort_by(|a, b| a.0.cmp(&b.0));

        for (path, file_type) in children {
            // `DirEntry::file_type` does not follow links: linked directories
            // are never entered, linked files are kept.
            let is_file = if file_type.is_symlink() {
                path.is_file()
            } else {
                file_type.is_file()
            };
            if file_type.is_dir() {
                if !is_hidden(&path) {
                    queue.push_back((path, None));
                }
            } else if is_file && path.extension().and_then(|e| e.to_str()) == Some(extension) {
                files.push(path);
            } else if file_type.is_symlink() && path.is_dir() {
                trace!("Not following directory link '{}'", path.display());
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_collects_nested_files_and_skips_hidden() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("frontend/react")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("commit.md"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        fs::write(root.join("frontend/component.md"), "x").unwrap();
        fs::write(root.join("frontend/react/hook.md"), "x").unwrap();
        fs::write(root.join(".git/ignored.md"), "x").unwrap();

        let files = scan_files(root, "md").unwrap();
        let relative: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(
            relative,
            vec!["commit.md", "frontend/component.md", "frontend/react/hook.md"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("commands");
        let outside = dir.path().join("shared");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(root.join("commit.md"), "x").unwrap();
        fs::write(outside.join("review.md"), "x").unwrap();
        std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("shared")).unwrap();
        std::os::unix::fs::symlink(outside.join("review.md"), root.join("review.md")).unwrap();

        let files = scan_files(&root, "md").unwrap();

        assert_eq!(files, vec![root.join("commit.md"), root.join("review.md")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = scan_files(&dir.path().join("absent"), "md");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_empty_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(scan_files(dir.path(), "md").unwrap().is_empty());
    }
}
