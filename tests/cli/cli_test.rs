//! End-to-end runs of the `sitesmith` binary against a throwaway home
//! directory. No credential is provided, so generation takes the fallback
//! path and never touches the network.

use std::path::Path;

use assert_cmd::Command;

fn sitesmith(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sitesmith").expect("binary should build");
    cmd.env("HOME", home)
        .env_remove("GITHUB_TOKEN")
        .env_remove("SITESMITH_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn help_lists_subcommands() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let output = sitesmith(tmp.path())
        .arg("--help")
        .output()
        .expect("should run");
    assert!(output.status.success());

    let help = String::from_utf8_lossy(&output.stdout);
    for sub in ["generate", "list", "show", "export", "delete"] {
        assert!(help.contains(sub), "missing {sub} in help:\n{help}");
    }
}

#[test]
fn generate_list_export_delete_round_trip() {
    let tmp = tempfile::tempdir().expect("should create temp dir");

    let output = sitesmith(tmp.path())
        .args(["generate", "Modern bakery with sourdough bread", "--json"])
        .output()
        .expect("should run");
    assert!(output.status.success(), "{output:?}");
    let record = stdout_json(&output);
    assert_eq!(record["status"], "completed");
    assert_eq!(record["user_id"], "anonymous");
    assert_eq!(record["sections"][0]["name"], "AI Generated Page");
    let id = record["id"].as_str().expect("id should be a string").to_owned();
    assert!(tmp.path().join(".sitesmith").join("sitesmith.db").exists());

    let output = sitesmith(tmp.path())
        .args(["list", "--json"])
        .output()
        .expect("should run");
    assert!(output.status.success());
    let listed = stdout_json(&output);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["id"], id.as_str());

    let page = tmp.path().join("page.html");
    let page_arg = page.to_str().expect("temp path should be UTF-8");
    sitesmith(tmp.path())
        .args(["export", &id, "--out", page_arg])
        .assert()
        .success();
    let html = std::fs::read_to_string(&page).expect("export should write the page");
    assert!(html.contains("<title>Modern Bakery With Sourdough Bread</title>"));

    sitesmith(tmp.path()).args(["delete", &id]).assert().success();
    sitesmith(tmp.path()).args(["show", &id]).assert().failure();
}

#[test]
fn generate_rejects_short_idea() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let output = sitesmith(tmp.path())
        .args(["generate", "tiny"])
        .output()
        .expect("should run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 10 characters"));
}

#[test]
fn log_to_file_writes_json_log() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    sitesmith(tmp.path())
        .args(["--log-to-file", "generate", "Lakeside yoga retreat weekend"])
        .assert()
        .success();

    let logs = tmp.path().join(".sitesmith").join("logs");
    let entries: Vec<_> = std::fs::read_dir(&logs)
        .expect("logs directory should exist")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("sitesmith.log"))
        .collect();
    assert_eq!(entries.len(), 1);

    let body = std::fs::read_to_string(entries[0].path()).expect("log should be readable");
    assert!(body.contains("\"level\":\"WARN\""));
    assert!(body.contains("website idea created"));
}
