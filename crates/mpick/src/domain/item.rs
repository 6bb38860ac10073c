//! Picker entries and the actions they carry.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::app::host::Host;

/// Provenance of an entry. Only affects the label marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Editor,
    File,
    Git,
    Command,
}

/// What happens when an entry is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open and reveal a document.
    Open(PathBuf),
    /// Dispatch a command identifier with no arguments.
    Execute(String),
}

/// Marker tokens prepended to labels, one per [`ItemKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default = "Markers::default_editor")]
    pub editor: String,
    #[serde(default = "Markers::default_file")]
    pub file: String,
    #[serde(default = "Markers::default_git")]
    pub git: String,
    #[serde(default = "Markers::default_command")]
    pub command: String,
}

impl Markers {
    pub(crate) fn default_editor() -> String {
        "✎".into()
    }

    pub(crate) fn default_file() -> String {
        "▫".into()
    }

    pub(crate) fn default_git() -> String {
        "±".into()
    }

    pub(crate) fn default_command() -> String {
        "❯".into()
    }

    /// Marker token for `kind`; may be empty.
    pub fn marker(&self, kind: ItemKind) -> &str {
        match kind {
            ItemKind::Editor => &self.editor,
            ItemKind::File => &self.file,
            ItemKind::Git => &self.git,
            ItemKind::Command => &self.command,
        }
    }

    /// Prefix `raw` with the marker for `kind`. An empty marker leaves `raw` untouched.
    pub fn decorate(&self, kind: ItemKind, raw: &str) -> String {
        let marker = self.marker(kind);
        if marker.is_empty() {
            raw.to_owned()
        } else {
            format!("{marker} {raw}")
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            editor: Self::default_editor(),
            file: Self::default_file(),
            git: Self::default_git(),
            command: Self::default_command(),
        }
    }
}

/// One selectable entry in the aggregated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    kind: ItemKind,
    label: String,
    action: Action,
}

impl Item {
    /// Build an entry, decorating `raw_label` with the marker for `kind`.
    pub fn new(kind: ItemKind, raw_label: &str, action: Action, markers: &Markers) -> Self {
        Self {
            kind,
            label: markers.decorate(kind, raw_label),
            action,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Decorated label as displayed.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Run the action against `host`. Consumes the item so it can only fire once.
    pub fn activate<H: Host + ?Sized>(self, host: &mut H) -> Result<()> {
        match self.action {
            Action::Open(path) => host.open_document(&path),
            Action::Execute(command) => host.execute_command(&command),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
