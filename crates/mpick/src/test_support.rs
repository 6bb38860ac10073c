//! In-memory host used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::app::host::{Host, Notice, NoticeLevel, ProcessRequest};
use crate::domain::model::{
    CommandContribution, CommandTitle, Contributes, DirEntry, EntryKind, ExtensionManifest,
    ProcessOutput, Tab, TabGroup, TabInput,
};

#[derive(Debug, Default)]
pub struct FakeHost {
    pub active: Option<PathBuf>,
    pub folders: Vec<PathBuf>,
    pub groups: Vec<TabGroup>,
    pub manifests: Vec<ExtensionManifest>,
    pub dirs: HashMap<PathBuf, Vec<DirEntry>>,
    pub process: Option<std::result::Result<ProcessOutput, String>>,
    pub exec_calls: RefCell<Vec<(String, PathBuf)>>,
    pub opened: Vec<PathBuf>,
    pub executed: Vec<String>,
    pub notices: Vec<Notice>,
    pub fail_actions: bool,
}

impl FakeHost {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>, entries: &[(&str, EntryKind)]) -> Self {
        let entries = entries
            .iter()
            .map(|(name, kind)| DirEntry {
                name: (*name).to_owned(),
                kind: *kind,
            })
            .collect();
        self.dirs.insert(dir.into(), entries);
        self
    }

    pub fn info_count(&self) -> usize {
        self.notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Info)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
            .count()
    }
}

impl Host for FakeHost {
    fn active_document(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    fn workspace_folders(&self) -> &[PathBuf] {
        &self.folders
    }

    fn tab_groups(&self) -> &[TabGroup] {
        &self.groups
    }

    fn extensions(&self) -> &[ExtensionManifest] {
        &self.manifests
    }

    fn read_directory(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        self.dirs
            .get(dir)
            .cloned()
            .ok_or_else(|| anyhow!("no such directory: {}", dir.display()))
    }

    fn exec(&self, request: &ProcessRequest<'_>) -> Result<ProcessOutput> {
        self.exec_calls
            .borrow_mut()
            .push((request.program.to_owned(), request.cwd.to_path_buf()));
        match &self.process {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Ok(ProcessOutput {
                success: true,
                ..ProcessOutput::default()
            }),
        }
    }

    fn open_document(&mut self, path: &Path) -> Result<()> {
        if self.fail_actions {
            return Err(anyhow!("cannot open {}", path.display()));
        }
        self.opened.push(path.to_path_buf());
        Ok(())
    }

    fn execute_command(&mut self, command: &str) -> Result<()> {
        if self.fail_actions {
            return Err(anyhow!("cannot run {command}"));
        }
        self.executed.push(command.to_owned());
        Ok(())
    }

    fn notify(&mut self, level: NoticeLevel, text: String) {
        self.notices.push(Notice { level, text });
    }
}

pub fn resource_tab(label: &str, path: &str) -> Tab {
    Tab {
        label: label.to_owned(),
        input: TabInput::Resource { path: path.into() },
    }
}

pub fn other_tab(label: &str) -> Tab {
    Tab {
        label: label.to_owned(),
        input: TabInput::Other,
    }
}

pub fn manifest(id: &str, commands: Vec<(&str, Option<CommandTitle>)>) -> ExtensionManifest {
    ExtensionManifest {
        id: id.to_owned(),
        contributes: Some(Contributes {
            commands: Some(
                commands
                    .into_iter()
                    .map(|(command, title)| CommandContribution {
                        command: command.to_owned(),
                        title,
                    })
                    .collect(),
            ),
        }),
    }
}

pub fn localized(value: &str, original: &str) -> Option<CommandTitle> {
    Some(CommandTitle::Localized {
        value: Some(value.to_owned()),
        original: Some(original.to_owned()),
    })
}
