//! Host data as seen by the collectors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One group of editor tabs, in the order the host reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub label: String,
    #[serde(default)]
    pub input: TabInput,
}

/// What a tab is showing. Only resource-backed tabs can be reopened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TabInput {
    Resource { path: PathBuf },
    #[default]
    #[serde(other)]
    Other,
}

/// Directory listing entry returned by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Unknown,
}

/// Typed view of an extension manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionManifest {
    pub id: String,
    pub contributes: Option<Contributes>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contributes {
    pub commands: Option<Vec<CommandContribution>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandContribution {
    pub command: String,
    #[serde(default)]
    pub title: Option<CommandTitle>,
}

/// A declared title: either plain text or a localized `{value, original}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandTitle {
    Plain(String),
    Localized {
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        original: Option<String>,
    },
}

/// Captured result of an external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}
