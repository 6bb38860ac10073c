//! Files tracked by git in the repository enclosing the workspace root.

use std::path::Path;

use anyhow::Result;

use crate::app::host::{Host, NoticeLevel, ProcessRequest};
use crate::app::root::find_repo_root;
use crate::domain::errors::PickerError;
use crate::domain::item::{Action, Item, ItemKind, Markers};
use crate::infra::config::GitSettings;

/// One entry per tracked path reported by the listing command.
///
/// A failed listing is surfaced as an error notice. It then yields nothing,
/// or returns the error when `settings.fail_fast` is set.
pub fn collect<H: Host + ?Sized>(
    host: &mut H,
    root: Option<&Path>,
    settings: &GitSettings,
    markers: &Markers,
) -> Result<Vec<Item>> {
    let Some(repo_root) = root.and_then(find_repo_root) else {
        return Ok(Vec::new());
    };

    match list_tracked(host, &repo_root, settings) {
        Ok(paths) => {
            tracing::debug!(root = %repo_root.display(), count = paths.len(), "collected tracked files");
            Ok(paths
                .iter()
                .map(|rel| {
                    Item::new(
                        ItemKind::Git,
                        rel,
                        Action::Open(repo_root.join(rel)),
                        markers,
                    )
                })
                .collect())
        }
        Err(err) => {
            tracing::warn!(root = %repo_root.display(), error = %err, "git listing failed");
            host.notify(NoticeLevel::Error, err.to_string());
            if settings.fail_fast() {
                Err(err.into())
            } else {
                Ok(Vec::new())
            }
        }
    }
}

fn list_tracked<H: Host + ?Sized>(
    host: &H,
    repo_root: &Path,
    settings: &GitSettings,
) -> std::result::Result<Vec<String>, PickerError> {
    let request = ProcessRequest {
        program: &settings.program,
        args: &settings.args,
        cwd: repo_root,
        timeout: settings.timeout(),
    };
    let output = host.exec(&request).map_err(|err| match err.downcast::<PickerError>() {
        Ok(picker) => picker,
        Err(other) => PickerError::GitListing {
            root: repo_root.to_path_buf(),
            detail: format!("{other:#}"),
        },
    })?;

    if !output.stderr.trim().is_empty() {
        return Err(PickerError::GitListing {
            root: repo_root.to_path_buf(),
            detail: output.stderr.trim().to_owned(),
        });
    }
    if !output.success {
        return Err(PickerError::GitListing {
            root: repo_root.to_path_buf(),
            detail: "listing command exited unsuccessfully".into(),
        });
    }

    Ok(parse_listing(&output.stdout))
}

/// Split on `\n`, dropping empty lines such as the trailing one. Paths are kept
/// byte for byte, including a trailing `\r`.
pub fn parse_listing(stdout: &str) -> Vec<String> {
    stdout
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
