use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();

        let ws = root.join("ws");
        fs::create_dir_all(ws.join(".git")).unwrap();
        fs::create_dir_all(ws.join("sub")).unwrap();
        fs::write(ws.join("b.md"), "# b").unwrap();
        fs::write(ws.join("a.txt"), "a").unwrap();
        fs::write(ws.join("sub/nested.rs"), "").unwrap();

        fs::create_dir_all(root.join("ext/runner")).unwrap();
        fs::write(
            root.join("ext/runner/package.json"),
            r#"{
  "name": "runner",
  "contributes": {
    "commands": [
      { "command": "ext.run", "title": { "value": "Run", "original": "run" } },
      { "title": "broken entry without id" }
    ]
  }
}"#,
        )
        .unwrap();

        fs::write(
            root.join("state.json"),
            r#"{
  "active_document": "ws/a.txt",
  "workspace_folders": ["ws"],
  "tab_groups": [
    { "tabs": [
      { "label": "main.rs", "input": { "type": "resource", "path": "ws/main.rs" } },
      { "label": "Welcome", "input": { "type": "other" } }
    ] }
  ]
}"#,
        )
        .unwrap();

        fs::create_dir_all(root.join("home")).unwrap();
        Self::write_config(root, r#"[git]
program = "printf"
args = ["tracked.rs\n"]
"#);

        Self { temp }
    }

    fn write_config(root: &Path, contents: &str) {
        fs::write(root.join("mpick.toml"), contents).unwrap();
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn ws(&self) -> PathBuf {
        self.root().join("ws")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("mpick").expect("binary exists");
        let home = self.root().join("home");
        cmd.current_dir(self.ws())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", &home)
            .env_remove("MPICK_STATE")
            .env_remove("MPICK_DISPATCH")
            .env_remove("MPICK_GIT")
            .env_remove("MPICK_LOG")
            .arg("--state")
            .arg(self.root().join("state.json"))
            .arg("--extensions")
            .arg(self.root().join("ext"))
            .arg("--config")
            .arg(self.root().join("mpick.toml"));
        cmd
    }
}

#[test]
fn lists_sources_in_fixed_order() {
    let fixture = Fixture::new();
    fixture
        .command()
        .arg("--list")
        .assert()
        .success()
        .stdout("✎ main.rs (Tab 0)\n▫ a.txt\n▫ b.md\n± tracked.rs\n❯ Run (run)\n");
}

#[test]
fn accepting_a_command_prints_dispatch_line() {
    let fixture = Fixture::new();
    fixture
        .command()
        .args(["--accept", "run"])
        .assert()
        .success()
        .stdout("command\text.run\n");
}

#[test]
fn accepting_a_file_prints_absolute_path() {
    let fixture = Fixture::new();
    let expected = format!("open\t{}\n", fixture.ws().join("b.md").display());
    fixture
        .command()
        .args(["--accept", "B.MD"])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn unmatched_query_fails() {
    let fixture = Fixture::new();
    fixture
        .command()
        .args(["--accept", "does-not-exist"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("no item matches"));
}

#[test]
fn git_failure_degrades_to_other_sources() {
    let fixture = Fixture::new();
    Fixture::write_config(
        fixture.root(),
        r#"[git]
program = "sh"
args = ["-c", "echo fatal: not tracked >&2"]
"#,
    );
    fixture
        .command()
        .arg("--list")
        .assert()
        .success()
        .stdout("✎ main.rs (Tab 0)\n▫ a.txt\n▫ b.md\n❯ Run (run)\n")
        .stderr(predicate::str::contains("fatal: not tracked"));
}

#[test]
fn strict_git_failure_aborts_listing() {
    let fixture = Fixture::new();
    Fixture::write_config(
        fixture.root(),
        r#"[git]
program = "sh"
args = ["-c", "echo fatal: not tracked >&2"]
fail_fast = true
"#,
    );
    fixture
        .command()
        .arg("--list")
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn spawn_mode_rejects_unbound_command() {
    let fixture = Fixture::new();
    fixture
        .command()
        .env("MPICK_DISPATCH", "spawn")
        .args(["--accept", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no binding configured"));
}
