//! The seam between the picker and the editor it serves.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::domain::model::{DirEntry, ExtensionManifest, ProcessOutput, TabGroup};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the host should surface to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// External command to run, with the directory it runs in.
#[derive(Debug, Clone)]
pub struct ProcessRequest<'a> {
    pub program: &'a str,
    pub args: &'a [String],
    pub cwd: &'a Path,
    pub timeout: Option<Duration>,
}

/// Everything the collectors read from, and the actions items perform.
pub trait Host {
    /// Document shown in the focused editor, if any.
    fn active_document(&self) -> Option<&Path>;

    /// Declared workspace folders, in declaration order.
    fn workspace_folders(&self) -> &[PathBuf];

    /// Workspace folder containing `document`. The longest matching folder wins.
    fn workspace_folder_for(&self, document: &Path) -> Option<&Path> {
        self.workspace_folders()
            .iter()
            .filter(|folder| document.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .map(PathBuf::as_path)
    }

    fn tab_groups(&self) -> &[TabGroup];

    /// Manifests of every loaded extension.
    fn extensions(&self) -> &[ExtensionManifest];

    /// Direct children of `dir`, in the order the host lists them.
    fn read_directory(&self, dir: &Path) -> Result<Vec<DirEntry>>;

    /// Run an external command to completion.
    fn exec(&self, request: &ProcessRequest<'_>) -> Result<ProcessOutput>;

    fn open_document(&mut self, path: &Path) -> Result<()>;

    fn execute_command(&mut self, command: &str) -> Result<()>;

    fn notify(&mut self, level: NoticeLevel, text: String);
}
