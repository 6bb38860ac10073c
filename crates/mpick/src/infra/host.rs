//! Terminal host: serves a host snapshot and defers effects until the UI closes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::host::{Host, Notice, NoticeLevel, ProcessRequest};
use crate::domain::model::{DirEntry, EntryKind, ExtensionManifest, ProcessOutput, TabGroup};
use crate::infra::dispatch::{Dispatcher, Effect};
use crate::infra::git;
use crate::infra::session::HostSnapshot;

/// [`Host`] backed by a snapshot file, manifests on disk, and the local shell.
pub struct TerminalHost {
    snapshot: HostSnapshot,
    extensions: Vec<ExtensionManifest>,
    dispatcher: Dispatcher,
    effects: Vec<Effect>,
    notices: Vec<Notice>,
}

impl TerminalHost {
    pub fn new(
        snapshot: HostSnapshot,
        extensions: Vec<ExtensionManifest>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            snapshot,
            extensions,
            dispatcher,
            effects: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Drain notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Effects recorded so far, in acceptance order.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Carry out recorded effects. Call once the terminal is restored.
    pub fn finish<W: Write>(self, out: &mut W) -> Result<()> {
        self.dispatcher.run(&self.effects, out)
    }

    fn record(&mut self, effect: Effect) -> Result<()> {
        self.dispatcher.check(&effect)?;
        tracing::debug!(effect = %effect.to_line(), "recorded effect");
        self.effects.push(effect);
        Ok(())
    }
}

impl Host for TerminalHost {
    fn active_document(&self) -> Option<&Path> {
        self.snapshot.active_document.as_deref()
    }

    fn workspace_folders(&self) -> &[PathBuf] {
        &self.snapshot.workspace_folders
    }

    fn tab_groups(&self) -> &[TabGroup] {
        &self.snapshot.tab_groups
    }

    fn extensions(&self) -> &[ExtensionManifest] {
        &self.extensions
    }

    /// Entries sorted by name so repeated runs list identically.
    fn read_directory(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in
            fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
            let kind = match entry.file_type() {
                Ok(kind) if kind.is_symlink() => EntryKind::Symlink,
                Ok(kind) if kind.is_file() => EntryKind::File,
                Ok(kind) if kind.is_dir() => EntryKind::Directory,
                _ => EntryKind::Unknown,
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exec(&self, request: &ProcessRequest<'_>) -> Result<ProcessOutput> {
        git::run_process(request)
    }

    fn open_document(&mut self, path: &Path) -> Result<()> {
        self.record(Effect::Open(path.to_path_buf()))
    }

    fn execute_command(&mut self, command: &str) -> Result<()> {
        self.record(Effect::Command(command.to_owned()))
    }

    fn notify(&mut self, level: NoticeLevel, text: String) {
        match level {
            NoticeLevel::Info => tracing::info!(notice = %text, "host notice"),
            NoticeLevel::Error => tracing::error!(notice = %text, "host notice"),
        }
        self.notices.push(Notice { level, text });
    }
}
