//! Git integration utilities.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};

use crate::app::host::ProcessRequest;
use crate::domain::errors::PickerError;
use crate::domain::model::ProcessOutput;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lightweight wrapper around [`gix::Repository`] discovery for metadata extraction.
#[derive(Default)]
pub struct GitClient {
    repo: Option<gix::Repository>,
}

impl GitClient {
    /// Attempt to locate a git repository starting from `path`.
    pub fn discover(path: impl AsRef<Path>) -> Self {
        let repo = gix::discover(path).ok();
        Self { repo }
    }

    /// Retrieve repository metadata if discovery succeeded.
    pub fn metadata(&self) -> Option<GitMetadata> {
        let repo = self.repo.as_ref()?;
        let branch = repo
            .head_name()
            .ok()
            .flatten()
            .map(|name| name.shorten().to_string());

        let root = repo
            .work_dir()
            .map(Path::to_path_buf)
            .or_else(|| repo.path().parent().map(Path::to_path_buf))?;

        Some(GitMetadata { branch, root })
    }
}

/// Repository facts shown in the picker title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitMetadata {
    pub branch: Option<String>,
    pub root: PathBuf,
}

/// Convenience helper to retrieve metadata directly from a path.
pub fn metadata_for_path(path: &Path) -> Option<GitMetadata> {
    GitClient::discover(path).metadata()
}

/// Run `request` to completion, killing it once the timeout elapses.
pub fn run_process(request: &ProcessRequest<'_>) -> Result<ProcessOutput> {
    let mut child = Command::new(request.program)
        .args(request.args)
        .current_dir(request.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| PickerError::Spawn {
            program: request.program.to_owned(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait_with_deadline(&mut child, request.timeout)? {
        Some(status) => status,
        None => {
            child.kill().ok();
            child.wait().ok();
            return Err(PickerError::GitTimeout {
                root: request.cwd.to_path_buf(),
                timeout: request.timeout.unwrap_or_default(),
            }
            .into());
        }
    };

    Ok(ProcessOutput {
        success: status.success(),
        stdout: join_output(stdout)?,
        stderr: join_output(stderr)?,
    })
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<Option<std::process::ExitStatus>> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

type Drain = Option<thread::JoinHandle<std::io::Result<String>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        })
    })
}

fn join_output(handle: Drain) -> Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| anyhow!("output reader panicked"))?
            .map_err(Into::into),
        None => Ok(String::new()),
    }
}
