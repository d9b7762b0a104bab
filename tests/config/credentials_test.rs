//! Tests for `src/credentials.rs`.

use std::collections::BTreeMap;

use sitesmith::credentials::{load_credentials, Credentials};

fn write_env(dir: &std::path::Path, body: &str, mode: u32) -> std::path::PathBuf {
    let path = dir.join(".env");
    std::fs::write(&path, body).expect("should write .env");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
            .expect("should set permissions");
    }
    #[cfg(not(unix))]
    let _ = mode;
    path
}

#[test]
fn missing_file_yields_empty_credentials() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let creds = load_credentials(&tmp.path().join(".env")).expect("missing file is fine");
    assert!(creds.get("GITHUB_TOKEN").is_none());
}

#[test]
fn private_file_is_parsed() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_env(
        tmp.path(),
        "# inference\nGITHUB_TOKEN=ghp_abc123\nOTHER=\"quoted value\"\n",
        0o600,
    );

    let creds = load_credentials(&path).expect("should load");
    assert_eq!(creds.get("GITHUB_TOKEN"), Some("ghp_abc123"));
    assert_eq!(creds.get("OTHER"), Some("quoted value"));
}

#[cfg(unix)]
#[test]
fn world_readable_file_is_rejected() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_env(tmp.path(), "GITHUB_TOKEN=ghp_abc123\n", 0o644);

    let err = load_credentials(&path).expect_err("0644 must be rejected");
    assert!(err.to_string().contains("must be 0600"));
}

#[test]
fn resolve_prefers_env_file_then_process_env() {
    let mut vars = BTreeMap::new();
    vars.insert("GITHUB_TOKEN".to_owned(), "from-file".to_owned());
    vars.insert("BLANK".to_owned(), "   ".to_owned());
    let creds = Credentials::from_map(vars);

    let env = |key: &str| match key {
        "GITHUB_TOKEN" => Some("from-env".to_owned()),
        "BLANK" => Some("blank-from-env".to_owned()),
        "EMPTY_ENV" => Some(String::new()),
        _ => None,
    };

    assert_eq!(creds.resolve_with("GITHUB_TOKEN", env), Some("from-file".to_owned()));
    assert_eq!(creds.resolve_with("BLANK", env), Some("blank-from-env".to_owned()));
    assert_eq!(creds.resolve_with("EMPTY_ENV", env), None);
    assert_eq!(creds.resolve_with("UNSET", env), None);
}

#[test]
fn debug_output_redacts_values() {
    let mut vars = BTreeMap::new();
    vars.insert("GITHUB_TOKEN".to_owned(), "ghp_secret".to_owned());
    let rendered = format!("{:?}", Credentials::from_map(vars));
    assert!(rendered.contains("GITHUB_TOKEN"));
    assert!(!rendered.contains("ghp_secret"));
}
