pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MPICK_LOG";

/// Install the global tracing subscriber.
///
/// Logs go to `log_file` when given, otherwise to stderr. `MPICK_LOG` sets the
/// filter; without it stderr logging is limited to warnings, or silenced when
/// `quiet` is set because the terminal UI owns stderr.
pub fn init(log_file: Option<&Path>, quiet: bool) -> Result<()> {
    let default_directive = match (log_file, quiet) {
        (Some(_), _) => "info",
        (None, true) => "off",
        (None, false) => "warn",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
