// tests/integration_test.rs
use std::process::Command;

fn release_vr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_release-vr"))
}

#[test]
fn test_release_vr_help() {
    let output = release_vr()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-vr"));
    assert!(stdout.contains("Cherry-pick the commits referencing issue tags"));
    assert!(stdout.contains("--tags"));
    assert!(stdout.contains("--merge-parent"));
}

#[test]
fn test_release_vr_version() {
    let output = release_vr()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_service_is_rejected() {
    let output = release_vr()
        .args(["--service", "svn"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_config_file_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = release_vr()
        .current_dir(dir.path())
        .args(["--config", "/nonexistent/releasevr.toml"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error loading config"));
}
