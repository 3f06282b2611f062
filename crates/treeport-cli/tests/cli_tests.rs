//! Integration tests for treeport-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn treeport_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("treeport");
    for var in [
        "GITHUB_TOKEN",
        "REPO_OWNER",
        "REPO_NAME",
        "REPO_BRANCH",
        "GITHUB_API_URL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Creates a small web project with files that the built-in exclusions drop.
fn create_project() -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");
    let files = [
        ("index.html", "<div id=\"app\"></div>"),
        ("src/main.ts", "console.log('hi');"),
        ("node_modules/vite/index.js", "export {};"),
        (".git/HEAD", "ref: refs/heads/main"),
        ("dist/index.js", "bundled"),
        (".env", "SECRET=1"),
        ("package-lock.json", "{}"),
    ];
    for (rel, content) in files {
        let path = temp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    temp
}

fn zip_names(path: &Path) -> Vec<String> {
    let bytes = fs::read(path).expect("archive not written");
    let zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("invalid zip");
    let mut names: Vec<_> = zip.file_names().map(ToString::to_string).collect();
    names.sort();
    names
}

#[test]
fn test_version_flag() {
    treeport_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("treeport"));
}

#[test]
fn test_help_flag() {
    treeport_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("publish"));
}

#[test]
fn test_download_help() {
    treeport_cmd()
        .arg("download")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Export the project tree as a zip archive"));
}

#[test]
fn test_download_creates_archive() {
    let project = create_project();
    let out = TempDir::new().unwrap();

    treeport_cmd()
        .arg("download")
        .arg(project.path())
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive saved"));

    assert_eq!(
        zip_names(&out.path().join("project.zip")),
        ["index.html", "src/main.ts"]
    );
}

#[test]
fn test_download_json_output() {
    let project = create_project();
    let out = TempDir::new().unwrap();

    let output = treeport_cmd()
        .arg("download")
        .arg("--json")
        .arg(project.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "download");
    assert_eq!(json["data"]["files_added"], 2);
    assert!(json["data"]["archive_bytes"].as_u64().unwrap() > 0);
}

#[test]
fn test_download_output_exists_without_force() {
    let project = create_project();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("project.zip"), "old").unwrap();

    treeport_cmd()
        .arg("download")
        .arg(project.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(out.path().join("project.zip")).unwrap(), "old");
}

#[test]
fn test_download_force_overwrite() {
    let project = create_project();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("project.zip"), "old").unwrap();

    treeport_cmd()
        .arg("download")
        .arg(project.path())
        .arg("-o")
        .arg(out.path())
        .arg("--force")
        .assert()
        .success();

    assert_eq!(
        zip_names(&out.path().join("project.zip")),
        ["index.html", "src/main.ts"]
    );
}

#[test]
fn test_download_exclude_and_name() {
    let project = create_project();
    let out = TempDir::new().unwrap();

    treeport_cmd()
        .arg("download")
        .arg(project.path())
        .arg("-o")
        .arg(out.path())
        .arg("--name")
        .arg("site.zip")
        .arg("-x")
        .arg("/src")
        .arg("-l")
        .arg("0")
        .assert()
        .success();

    assert_eq!(zip_names(&out.path().join("site.zip")), ["index.html"]);
}

#[test]
fn test_download_missing_source() {
    let out = TempDir::new().unwrap();

    treeport_cmd()
        .arg("download")
        .arg(out.path().join("missing"))
        .arg("-o")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_download_quiet_mode() {
    let project = create_project();
    let out = TempDir::new().unwrap();

    treeport_cmd()
        .arg("download")
        .arg("--quiet")
        .arg(project.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_list_applies_exclusions() {
    let project = create_project();

    treeport_cmd()
        .arg("list")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/index.html"))
        .stdout(predicate::str::contains("/src/main.ts"))
        .stdout(predicate::str::contains("node_modules").not())
        .stdout(predicate::str::contains(".env").not());
}

#[test]
fn test_list_without_default_excludes() {
    let project = create_project();

    treeport_cmd()
        .arg("list")
        .arg("--no-default-excludes")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/node_modules/vite/index.js"))
        .stdout(predicate::str::contains("/.env"));
}

#[test]
fn test_list_json_output() {
    let project = create_project();

    let output = treeport_cmd()
        .arg("list")
        .arg("--json")
        .arg(project.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["operation"], "list");
    assert_eq!(json["data"]["total"], 2);
}

#[test]
fn test_publish_requires_token() {
    let project = create_project();

    treeport_cmd()
        .arg("publish")
        .arg(project.path())
        .arg("--owner")
        .arg("octocat")
        .arg("--repo")
        .arg("site")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_publish_reads_environment() {
    let project = create_project();

    // Credentials come from the environment; the API host refuses connections.
    treeport_cmd()
        .arg("publish")
        .arg(project.path())
        .env("GITHUB_TOKEN", "tok")
        .env("REPO_OWNER", "octocat")
        .env("REPO_NAME", "site")
        .env("GITHUB_API_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("refs/heads/main"))
        .stderr(predicate::str::contains("HINT: Check network connectivity"));
}

#[test]
fn test_completion_bash() {
    treeport_cmd()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("treeport"));
}
