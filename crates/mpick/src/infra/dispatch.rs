//! Carrying out accepted entries once the terminal is released.

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, anyhow};

use crate::domain::errors::PickerError;
use crate::infra::config::{Dispatch, DispatchMode};

/// A deferred request recorded by the terminal host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Open(PathBuf),
    Command(String),
}

impl Effect {
    /// Line written in print mode.
    pub fn to_line(&self) -> String {
        match self {
            Effect::Open(path) => format!("open\t{}", path.display()),
            Effect::Command(id) => format!("command\t{id}"),
        }
    }
}

/// Performs effects according to the configured [`DispatchMode`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    settings: Dispatch,
}

impl Dispatcher {
    pub fn new(settings: Dispatch) -> Self {
        Self { settings }
    }

    pub fn mode(&self) -> DispatchMode {
        self.settings.mode()
    }

    /// Fail early for effects that spawn mode cannot carry out.
    pub fn check(&self, effect: &Effect) -> Result<()> {
        if self.mode() == DispatchMode::Spawn
            && let Effect::Command(id) = effect
            && !self.settings.bindings.contains_key(id)
        {
            return Err(PickerError::UnboundCommand(id.clone()).into());
        }
        Ok(())
    }

    /// Carry out `effects` in order, writing print-mode lines to `out`.
    pub fn run<W: Write>(&self, effects: &[Effect], out: &mut W) -> Result<()> {
        for effect in effects {
            tracing::info!(effect = %effect.to_line(), mode = ?self.mode(), "dispatching effect");
            match self.mode() {
                DispatchMode::Print => {
                    writeln!(out, "{}", effect.to_line()).context("failed to write effect")?;
                }
                DispatchMode::Spawn => self.spawn(effect)?,
            }
        }
        out.flush().ok();
        Ok(())
    }

    fn spawn(&self, effect: &Effect) -> Result<()> {
        let argv = self.argv(effect)?;
        let (program, args) = argv
            .split_first()
            .context("dispatch command missing program")?;

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| PickerError::Spawn {
                program: program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("`{program}` exited with status {status}"))
        }
    }

    fn argv(&self, effect: &Effect) -> Result<Vec<String>> {
        match effect {
            Effect::Open(path) => {
                let mut argv = self.editor_argv()?;
                argv.push(path.display().to_string());
                Ok(argv)
            }
            Effect::Command(id) => self
                .settings
                .bindings
                .get(id)
                .filter(|argv| !argv.is_empty())
                .cloned()
                .ok_or_else(|| PickerError::UnboundCommand(id.clone()).into()),
        }
    }

    fn editor_argv(&self) -> Result<Vec<String>> {
        if !self.settings.editor.is_empty() {
            return Ok(self.settings.editor.clone());
        }
        let editor = env::var("VISUAL")
            .or_else(|_| env::var("EDITOR"))
            .context("no editor configured; set dispatch.editor, $VISUAL or $EDITOR")?;
        Ok(editor.split_whitespace().map(str::to_owned).collect())
    }
}
