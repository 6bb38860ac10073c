use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mpick::domain::model::{Tab, TabGroup, TabInput};
use mpick::infra::session::{HostSnapshot, SessionStore};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Generate a demo workspace with a host snapshot and an extension manifest
    Fixture {
        #[arg(default_value = "target/mpick-demo")]
        dir: PathBuf,
        /// Also run `git init` and add the generated files
        #[arg(long)]
        git: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Fixture { dir, git } => write_fixture(&dir, git)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

fn write_fixture(dir: &Path, git: bool) -> Result<()> {
    fs::create_dir_all(dir.join("src"))
        .with_context(|| format!("failed to create {}", dir.display()))?;
    fs::write(dir.join("README.md"), "# demo\n")?;
    fs::write(dir.join("notes.txt"), "scratch\n")?;
    fs::write(dir.join("src/main.rs"), "fn main() {}\n")?;

    let manifest = json!({
        "publisher": "demo",
        "name": "tools",
        "contributes": {
            "commands": [
                { "command": "demo.format", "title": { "value": "Formatieren", "original": "Format" } },
                { "command": "demo.build", "title": "Build" },
                { "command": "demo.hidden" }
            ]
        }
    });
    let extensions = dir.join(".mpick/extensions");
    fs::create_dir_all(&extensions)?;
    fs::write(
        extensions.join("demo.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    fs::write(
        dir.join(".mpick/config.toml"),
        "[extensions]\npaths = [\".mpick/extensions\"]\n\n[dispatch.bindings]\n\"demo.build\" = [\"cargo\", \"build\"]\n",
    )?;

    let snapshot = HostSnapshot {
        active_document: Some(PathBuf::from("src/main.rs")),
        workspace_folders: vec![PathBuf::from(".")],
        tab_groups: vec![
            TabGroup {
                tabs: vec![
                    Tab {
                        label: "main.rs".into(),
                        input: TabInput::Resource {
                            path: PathBuf::from("src/main.rs"),
                        },
                    },
                    Tab {
                        label: "Settings".into(),
                        input: TabInput::Other,
                    },
                ],
            },
            TabGroup {
                tabs: vec![Tab {
                    label: "README.md".into(),
                    input: TabInput::Resource {
                        path: PathBuf::from("README.md"),
                    },
                }],
            },
        ],
    };
    SessionStore::new(dir).save(&snapshot)?;

    if git {
        for args in [&["init", "--quiet"][..], &["add", "README.md", "src"][..]] {
            let status = Command::new("git").args(args).current_dir(dir).status()?;
            if !status.success() {
                anyhow::bail!("git {} failed", args.join(" "));
            }
        }
    }

    println!("demo workspace written to {}", dir.display());
    println!("run `mpick` from that directory to try it");
    Ok(())
}
