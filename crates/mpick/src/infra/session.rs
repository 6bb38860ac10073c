//! Host snapshots: editor state handed over by the calling editor.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::model::{TabGroup, TabInput};

const SESSION_DIR: &str = ".mpick";
const SESSION_FILE: &str = "session.json";

/// Editor state the terminal host serves to the collectors.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HostSnapshot {
    /// Document in the focused editor.
    #[serde(default)]
    pub active_document: Option<PathBuf>,
    /// Declared workspace folders, first one is primary.
    #[serde(default)]
    pub workspace_folders: Vec<PathBuf>,
    /// Open tab groups in display order.
    #[serde(default)]
    pub tab_groups: Vec<TabGroup>,
}

impl HostSnapshot {
    /// Resolve relative paths against `base`.
    pub fn rebase(mut self, base: &Path) -> Self {
        let absolutize = |path: PathBuf| {
            if path.is_relative() {
                join_clean(base, &path)
            } else {
                path
            }
        };
        self.active_document = self.active_document.map(absolutize);
        self.workspace_folders = self
            .workspace_folders
            .into_iter()
            .map(absolutize)
            .collect();
        for group in &mut self.tab_groups {
            for tab in &mut group.tabs {
                if let TabInput::Resource { path } = &mut tab.input
                    && path.is_relative()
                {
                    *path = join_clean(base, path);
                }
            }
        }
        self
    }
}

/// `base.join(path)` without `.` components.
fn join_clean(base: &Path, path: &Path) -> PathBuf {
    base.join(path)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// Reads snapshots from an explicit file or `.mpick/session.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    base: PathBuf,
}

impl SessionStore {
    /// Store for the default snapshot location under `root`. Relative paths
    /// resolve against `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            path: root.join(SESSION_DIR).join(SESSION_FILE),
            base: root.to_path_buf(),
        }
    }

    /// Store reading a specific file. Relative paths resolve against its directory.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self { path, base }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, `None` when the file does not exist.
    ///
    /// Relative paths inside the snapshot are resolved against the store's base.
    pub fn load(&self) -> Result<Option<HostSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read host snapshot at {}", self.path.display()))?;
        let snapshot: HostSnapshot = serde_json::from_str(&data)
            .with_context(|| format!("invalid host snapshot in {}", self.path.display()))?;

        let base = std::path::absolute(&self.base).unwrap_or_else(|_| self.base.clone());
        Ok(Some(snapshot.rebase(&base)))
    }

    /// Persist `snapshot`, creating parent directories as needed.
    pub fn save(&self, snapshot: &HostSnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create snapshot directory {}", dir.display()))?;
        }

        let data = serde_json::to_string_pretty(snapshot)
            .context("failed to serialize host snapshot")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write host snapshot to {}", self.path.display()))?;
        Ok(())
    }
}
