//! Extension manifest discovery and parsing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::model::{CommandContribution, Contributes, ExtensionManifest};

const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    contributes: Option<RawContributes>,
}

#[derive(Debug, Deserialize)]
struct RawContributes {
    #[serde(default)]
    commands: Option<Value>,
}

/// Parse one manifest. Command entries that do not fit the expected shape are dropped.
pub fn parse_manifest(contents: &str, fallback_id: &str) -> Result<ExtensionManifest> {
    let raw: RawManifest =
        serde_json::from_str(contents).context("failed to parse extension manifest")?;

    let id = match (raw.publisher, raw.name) {
        (Some(publisher), Some(name)) => format!("{publisher}.{name}"),
        (None, Some(name)) => name,
        _ => fallback_id.to_owned(),
    };

    let contributes = raw.contributes.map(|contributes| Contributes {
        commands: contributes
            .commands
            .and_then(|value| parse_commands(&id, value)),
    });

    Ok(ExtensionManifest { id, contributes })
}

fn parse_commands(id: &str, value: Value) -> Option<Vec<CommandContribution>> {
    let Value::Array(entries) = value else {
        tracing::warn!(extension = id, "contributes.commands is not an array");
        return None;
    };

    let commands = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<CommandContribution>(entry)
                .map_err(|err| {
                    tracing::warn!(extension = id, index, error = %err, "skipping malformed command");
                })
                .ok()
        })
        .collect();
    Some(commands)
}

/// Load every manifest found directly inside `dirs`.
///
/// A directory entry is either `<name>/package.json` or `<name>.json`.
/// Unreadable or invalid manifests are skipped with a warning.
pub fn load_manifests(dirs: &[PathBuf]) -> Vec<ExtensionManifest> {
    let mut manifests = Vec::new();
    for dir in dirs {
        let candidates = match manifest_candidates(dir) {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "skipping extension directory");
                continue;
            }
        };
        for (path, fallback_id) in candidates {
            match load_manifest(&path, &fallback_id) {
                Ok(manifest) => manifests.push(manifest),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %format!("{err:#}"), "skipping extension manifest");
                }
            }
        }
    }
    tracing::debug!(count = manifests.len(), "loaded extension manifests");
    manifests
}

fn load_manifest(path: &Path, fallback_id: &str) -> Result<ExtensionManifest> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_manifest(&data, fallback_id)
}

fn manifest_candidates(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect();
    entries.sort();

    let candidates = entries
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_string_lossy().into_owned();
            if path.is_dir() {
                let manifest = path.join(MANIFEST_FILE);
                manifest.is_file().then_some((manifest, stem))
            } else if path.extension().is_some_and(|ext| ext == "json") {
                Some((path, stem))
            } else {
                None
            }
        })
        .collect();
    Ok(candidates)
}
