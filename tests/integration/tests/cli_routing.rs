//! CLI binary integration tests.
//!
//! These tests exercise the compiled `securestore` binary to verify that
//! top-level command routing, help text, and error handling work as expected.
//! None of them touch a real credential store.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Locate the compiled `securestore` binary in the workspace target directory.
fn securestore_bin() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir
        .parent()
        .expect("tests/ parent")
        .parent()
        .expect("workspace root");
    let bin = workspace_root.join("target").join("debug").join("securestore");
    assert!(
        bin.exists(),
        "securestore binary not found at {}; run `cargo build -p securestore-cli` first",
        bin.display()
    );
    bin
}

/// A command isolated from the user's config and environment.
fn securestore_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(securestore_bin());
    cmd.env("SECURESTORE_HOME", home.path())
        .env_remove("SECURESTORE_CONFIG")
        .env_remove("SECURESTORE_SERVICE")
        .env_remove("SECURESTORE_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    let output = securestore_cmd(&home)
        .arg("version")
        .output()
        .expect("failed to run securestore");
    assert!(output.status.success(), "version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("securestore"),
        "version output should contain 'securestore', got: {}",
        stdout
    );
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let output = securestore_cmd(&home)
        .arg("--help")
        .output()
        .expect("failed to run securestore");
    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for verb in ["set", "get", "remove", "clear", "config"] {
        assert!(
            stdout.contains(verb),
            "help output should mention '{}', got: {}",
            verb,
            stdout
        );
    }
}

#[test]
fn test_cli_unknown_command() {
    let home = TempDir::new().unwrap();
    let output = securestore_cmd(&home)
        .arg("nonexistent-command")
        .output()
        .expect("failed to run securestore");
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_cli_get_without_namespace_fails() {
    let home = TempDir::new().unwrap();
    let output = securestore_cmd(&home)
        .args(["get", "someKey"])
        .output()
        .expect("failed to run securestore get");
    assert!(!output.status.success(), "get without a namespace should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No namespace configured"),
        "stderr should explain the missing namespace, got: {}",
        stderr
    );
}

#[test]
fn test_cli_explicit_missing_config_fails() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope.json5");
    let output = securestore_cmd(&home)
        .arg("--config")
        .arg(&missing)
        .args(["config", "show"])
        .output()
        .expect("failed to run securestore config show");
    assert!(!output.status.success(), "a missing --config file should fail");
}

#[test]
fn test_cli_config_init_then_validate() {
    let home = TempDir::new().unwrap();
    let output = securestore_cmd(&home)
        .env("SECURESTORE_SERVICE", "someService")
        .args(["config", "init"])
        .output()
        .expect("failed to run securestore config init");
    assert!(
        output.status.success(),
        "config init should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(home.path().join("securestore.json5").exists());

    let output = securestore_cmd(&home)
        .args(["config", "validate"])
        .output()
        .expect("failed to run securestore config validate");
    assert!(output.status.success(), "written config should validate");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("someService"),
        "validate should name the namespace, got: {}",
        stdout
    );
}

#[test]
fn test_cli_config_init_at_new_explicit_path() {
    let home = TempDir::new().unwrap();
    let custom = home.path().join("custom.json5");

    let output = securestore_cmd(&home)
        .env("SECURESTORE_SERVICE", "someService")
        .arg("--config")
        .arg(&custom)
        .args(["config", "init"])
        .output()
        .expect("failed to run securestore config init");
    assert!(
        output.status.success(),
        "config init should create a new --config file: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(custom.exists());
    assert!(!home.path().join("securestore.json5").exists());

    let output = securestore_cmd(&home)
        .env("SECURESTORE_CONFIG", &custom)
        .args(["config", "validate"])
        .output()
        .expect("failed to run securestore config validate");
    assert!(output.status.success(), "written config should load via SECURESTORE_CONFIG");
    assert!(String::from_utf8_lossy(&output.stdout).contains("someService"));
}

#[test]
fn test_cli_config_path_for_missing_explicit_file() {
    let home = TempDir::new().unwrap();
    let custom = home.path().join("not-yet.json5");

    let output = securestore_cmd(&home)
        .arg("--config")
        .arg(&custom)
        .args(["config", "path"])
        .output()
        .expect("failed to run securestore config path");
    assert!(output.status.success(), "config path should not need the file");
    assert!(String::from_utf8_lossy(&output.stdout).contains("not-yet.json5"));
}
