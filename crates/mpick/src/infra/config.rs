//! Configuration management utilities.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::root::find_repo_root;
use crate::domain::item::Markers;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".mpick/config.toml";

/// Layered configuration loaded from defaults, user, workspace, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: Sources,
    #[serde(default)]
    pub markers: Markers,
    #[serde(default)]
    pub git: GitSettings,
    #[serde(default)]
    pub extensions: Extensions,
    #[serde(default)]
    pub dispatch: Dispatch,
}

/// Which collectors contribute to the list. Unset means enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sources {
    #[serde(default)]
    pub editors: Option<bool>,
    #[serde(default)]
    pub files: Option<bool>,
    #[serde(default)]
    pub git: Option<bool>,
    #[serde(default)]
    pub commands: Option<bool>,
}

impl Sources {
    pub fn editors(&self) -> bool {
        self.editors.unwrap_or(true)
    }

    pub fn files(&self) -> bool {
        self.files.unwrap_or(true)
    }

    pub fn git(&self) -> bool {
        self.git.unwrap_or(true)
    }

    pub fn commands(&self) -> bool {
        self.commands.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSettings {
    #[serde(default = "GitSettings::default_program")]
    pub program: String,
    #[serde(default = "GitSettings::default_args")]
    pub args: Vec<String>,
    /// Milliseconds before the listing is killed; `0` waits forever.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub fail_fast: Option<bool>,
}

impl GitSettings {
    fn default_program() -> String {
        "git".into()
    }

    fn default_args() -> Vec<String> {
        vec!["-c".into(), "core.quotePath=false".into(), "ls-files".into()]
    }

    fn default_timeout_ms() -> u64 {
        10_000
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms.unwrap_or_else(Self::default_timeout_ms) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Whether a failed listing aborts the whole list instead of contributing nothing.
    pub fn fail_fast(&self) -> bool {
        self.fail_fast.unwrap_or(false)
    }
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
            args: Self::default_args(),
            timeout_ms: None,
            fail_fast: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions {
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// How accepted entries are carried out once the picker closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Write `open\t<path>` / `command\t<id>` lines to stdout.
    #[default]
    Print,
    /// Launch the editor or the bound command directly.
    Spawn,
}

impl std::str::FromStr for DispatchMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "print" => Ok(Self::Print),
            "spawn" => Ok(Self::Spawn),
            other => anyhow::bail!("unknown dispatch mode '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    #[serde(default)]
    mode: Option<DispatchMode>,
    /// Editor argv; the path is appended. Empty falls back to `$VISUAL` / `$EDITOR`.
    #[serde(default)]
    pub editor: Vec<String>,
    /// Command identifier to argv.
    #[serde(default)]
    pub bindings: BTreeMap<String, Vec<String>>,
}

impl Dispatch {
    pub fn mode(&self) -> DispatchMode {
        self.mode.unwrap_or_default()
    }

    pub fn set_mode(&mut self, mode: DispatchMode) {
        self.mode = Some(mode);
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    dispatch: Option<String>,
    git_program: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            dispatch: env::var("MPICK_DISPATCH").ok(),
            git_program: env::var("MPICK_GIT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(dispatch: &str, git_program: &str) -> Self {
        Self {
            dispatch: Some(dispatch.to_owned()),
            git_program: Some(git_program.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config,
    /// an optional explicit file, and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(
            global,
            workspace,
            explicit.map(Path::to_path_buf),
            env,
        )
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        if let Some(explicit_path) = explicit {
            layers.push(Self::from_file(&explicit_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sources: merge_sources(self.sources, other.sources),
            markers: merge_markers(self.markers, other.markers),
            git: merge_git(self.git, other.git),
            extensions: merge_extensions(self.extensions, other.extensions),
            dispatch: merge_dispatch(self.dispatch, other.dispatch),
        }
    }
}

fn merge_sources(base: Sources, overlay: Sources) -> Sources {
    Sources {
        editors: overlay.editors.or(base.editors),
        files: overlay.files.or(base.files),
        git: overlay.git.or(base.git),
        commands: overlay.commands.or(base.commands),
    }
}

fn merge_markers(base: Markers, overlay: Markers) -> Markers {
    Markers {
        editor: choose(base.editor, overlay.editor, Markers::default_editor),
        file: choose(base.file, overlay.file, Markers::default_file),
        git: choose(base.git, overlay.git, Markers::default_git),
        command: choose(base.command, overlay.command, Markers::default_command),
    }
}

fn merge_git(base: GitSettings, overlay: GitSettings) -> GitSettings {
    GitSettings {
        program: choose(base.program, overlay.program, GitSettings::default_program),
        args: if overlay.args != GitSettings::default_args() {
            overlay.args
        } else {
            base.args
        },
        timeout_ms: overlay.timeout_ms.or(base.timeout_ms),
        fail_fast: overlay.fail_fast.or(base.fail_fast),
    }
}

fn merge_extensions(base: Extensions, overlay: Extensions) -> Extensions {
    let mut paths = base.paths;
    for path in overlay.paths {
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    Extensions { paths }
}

fn merge_dispatch(mut base: Dispatch, overlay: Dispatch) -> Dispatch {
    if let Some(mode) = overlay.mode {
        base.mode = Some(mode);
    }
    if !overlay.editor.is_empty() {
        base.editor = overlay.editor;
    }
    base.bindings.extend(overlay.bindings);
    base
}

/// An overlay equal to the built-in default counts as unset, so it never
/// restores the default over a lower layer's value.
fn choose(base: String, overlay: String, default_fn: fn() -> String) -> String {
    if overlay != default_fn() {
        overlay
    } else {
        base
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("mpick/config.toml"))
}

/// Directory holding globally installed extension manifests.
pub fn global_extensions_dir() -> Option<PathBuf> {
    config_dir().map(|base| base.join("mpick/extensions"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(mode) = env.dispatch {
        config.dispatch.mode = Some(mode.parse().context("invalid MPICK_DISPATCH")?);
    }
    if let Some(program) = env.git_program {
        config.git.program = program;
    }
    Ok(config)
}
