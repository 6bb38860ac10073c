//! Workspace root and repository root resolution.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::host::Host;

const GIT_MARKER: &str = ".git";
const GITDIR_PREFIX: &str = "gitdir:";

/// Pick the directory the file and git collectors work from.
///
/// Prefers the workspace folder holding the active document, then the first
/// declared folder, then the active document's parent. `None` when the host
/// has neither an active document nor a workspace folder.
pub fn resolve_root<H: Host + ?Sized>(host: &H) -> Option<PathBuf> {
    if let Some(document) = host.active_document()
        && let Some(folder) = host.workspace_folder_for(document)
    {
        return Some(folder.to_path_buf());
    }

    if let Some(first) = host.workspace_folders().first() {
        return Some(first.clone());
    }

    host.active_document()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Nearest directory at or above `start` holding git metadata.
///
/// The filesystem root and the empty path end the walk without being checked.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    for dir in start.ancestors() {
        if dir.as_os_str().is_empty() || dir.parent().is_none() {
            return None;
        }
        if has_git_marker(dir) {
            return Some(dir.to_path_buf());
        }
    }
    None
}

/// A `.git` directory, or a `.git` file pointing elsewhere (worktrees, submodules).
fn has_git_marker(dir: &Path) -> bool {
    let marker = dir.join(GIT_MARKER);
    let Ok(metadata) = fs::metadata(&marker) else {
        return false;
    };
    if metadata.is_dir() {
        return true;
    }
    metadata.is_file()
        && fs::read_to_string(&marker)
            .map(|contents| contents.trim_start().starts_with(GITDIR_PREFIX))
            .unwrap_or(false)
}
