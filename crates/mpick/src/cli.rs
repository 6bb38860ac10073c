//! Command-line entry point.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::app::host::Notice;
use crate::app::picker::Picker;
use crate::domain::errors::PickerError;
use crate::infra::config::{Config, global_extensions_dir};
use crate::infra::dispatch::Dispatcher;
use crate::infra::extensions::load_manifests;
use crate::infra::host::TerminalHost;
use crate::infra::session::{HostSnapshot, SessionStore};
use crate::ui::app::{Outcome, UiApp};

/// Pick an open tab, workspace file, tracked file, or editor command.
#[derive(Debug, Parser)]
#[command(name = "mpick", author, version, about, long_about = None)]
pub struct Cli {
    /// Host snapshot describing open tabs, workspace folders, and the active document.
    #[arg(long, value_name = "FILE", env = "MPICK_STATE")]
    pub state: Option<PathBuf>,

    /// Override the active document.
    #[arg(long, value_name = "FILE")]
    pub active: Option<PathBuf>,

    /// Override the workspace folders (repeatable).
    #[arg(long = "workspace", value_name = "DIR")]
    pub workspaces: Vec<PathBuf>,

    /// Additional directory of extension manifests (repeatable).
    #[arg(long = "extensions", value_name = "DIR")]
    pub extension_dirs: Vec<PathBuf>,

    /// Extra configuration file layered over global and workspace config.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the aggregated list and exit.
    #[arg(long, conflicts_with = "accept")]
    pub list: bool,

    /// Accept the first entry whose label contains QUERY, without the UI.
    #[arg(long, value_name = "QUERY")]
    pub accept: Option<String>,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Whether the terminal UI will be shown.
    pub fn is_interactive(&self) -> bool {
        !self.list && self.accept.is_none() && self.completions.is_none()
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "mpick", &mut io::stdout());
        return Ok(());
    }

    let cwd = env::current_dir().context("unable to determine working directory")?;
    let config = Config::load(cli.config.as_deref())?;
    let snapshot = load_snapshot(&cli, &cwd)?;
    let manifests = load_manifests(&extension_dirs(&cli, &config, &cwd));

    let host = TerminalHost::new(
        snapshot,
        manifests,
        Dispatcher::new(config.dispatch.clone()),
    );
    let mut picker = Picker::new(host, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        picker.show()?;
        report_notices(picker.host_mut().take_notices());
        for item in picker.items() {
            writeln!(out, "{item}").context("failed to write list")?;
        }
        return Ok(());
    }

    if let Some(query) = cli.accept.as_deref() {
        picker.show()?;
        report_notices(picker.host_mut().take_notices());
        let first = picker.filter(query).first().copied();
        if first.is_none() {
            return Err(PickerError::NoMatch(query.to_owned()).into());
        }
        picker.accept(first)?;
        return picker.into_host().finish(&mut out);
    }

    let mut app = UiApp::new(picker);
    let outcome = app.run()?;
    let mut host = app.into_picker().into_host();
    report_notices(host.take_notices());
    if outcome == Outcome::Cancelled {
        tracing::debug!("picker cancelled");
    }
    host.finish(&mut out)
}

fn load_snapshot(cli: &Cli, cwd: &Path) -> Result<HostSnapshot> {
    let store = match &cli.state {
        Some(path) => SessionStore::at(cwd.join(path)),
        None => SessionStore::new(cwd),
    };
    let mut snapshot = store.load()?.unwrap_or_default();
    tracing::debug!(path = %store.path().display(), "host snapshot resolved");

    if let Some(active) = &cli.active {
        snapshot.active_document = Some(cwd.join(active));
    }
    if !cli.workspaces.is_empty() {
        snapshot.workspace_folders = cli.workspaces.iter().map(|dir| cwd.join(dir)).collect();
    }
    if snapshot.workspace_folders.is_empty() && snapshot.active_document.is_none() {
        snapshot.workspace_folders.push(cwd.to_path_buf());
    }
    Ok(snapshot)
}

fn extension_dirs(cli: &Cli, config: &Config, cwd: &Path) -> Vec<PathBuf> {
    global_extensions_dir()
        .into_iter()
        .chain(config.extensions.paths.iter().map(|dir| cwd.join(dir)))
        .chain(cli.extension_dirs.iter().map(|dir| cwd.join(dir)))
        .collect()
}

fn report_notices(notices: Vec<Notice>) {
    for notice in notices {
        eprintln!("mpick: {}", notice.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_and_accept_conflict() {
        let parsed = Cli::try_parse_from(["mpick", "--list", "--accept", "x"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn defaults_to_cwd_workspace_without_context() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let cli = Cli::try_parse_from(["mpick", "--list"])?;
        let snapshot = load_snapshot(&cli, temp.path())?;
        assert_eq!(snapshot.workspace_folders, vec![temp.path().to_path_buf()]);
        Ok(())
    }

    #[test]
    fn flags_override_snapshot() -> Result<()> {
        let temp = tempfile::tempdir()?;
        std::fs::write(
            temp.path().join("state.json"),
            r#"{ "active_document": "/elsewhere/a.rs", "workspace_folders": ["/old"] }"#,
        )?;
        let cli = Cli::try_parse_from([
            "mpick",
            "--state",
            "state.json",
            "--workspace",
            "proj",
            "--active",
            "proj/main.rs",
        ])?;

        let snapshot = load_snapshot(&cli, temp.path())?;
        assert_eq!(
            snapshot.active_document,
            Some(temp.path().join("proj/main.rs"))
        );
        assert_eq!(snapshot.workspace_folders, vec![temp.path().join("proj")]);
        Ok(())
    }
}
