//! CLI smoke tests (help output only; no network)

use std::process::Command;

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_weatherpro"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("weatherpro"));
    assert!(stdout.contains("Weather lookup"));
    assert!(stdout.contains("favorites"));
}

#[test]
fn test_cli_favorites_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_weatherpro"))
        .args(["favorites", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("toggle"));
    assert!(stdout.contains("list"));
}
