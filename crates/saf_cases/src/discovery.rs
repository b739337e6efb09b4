//! Discovery of `cases.json` files under the configured root

use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Name of the files produced per analysed device.
pub const CASES_FILE_NAME: &str = "cases.json";

/// Recursively find every `cases.json` below `root`, sorted by path.
///
/// Unreadable entries are logged and skipped. A missing root yields nothing.
pub fn discover_case_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        warn!(root = %root.display(), "Cases folder does not exist");
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(root = %root.display(), error = %err, "Skipping unreadable entry");
                continue;
            }
        };
        // `path().is_file()` follows symlinks; `file_type()` does not.
        if entry.file_name() == CASES_FILE_NAME && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    files
}

/// Dedup namespace for a cases file: the name of its parent directory.
pub fn folder_label(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Absolute, forward-slash form of `path` for the `source` field.
pub fn posix_source(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    normalize_path_to_forward_slashes(&lexically_normalize(&absolute))
}

/// Drop `.` segments and fold `..` into its parent without touching the filesystem.
fn lexically_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

fn normalize_path_to_forward_slashes(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    if cfg!(windows) {
        path_str.replace('\\', "/")
    } else {
        path_str.into_owned()
    }
}
