//! CLI Integration Tests
//!
//! These tests run the vestdash binary and check its output and exit codes.
//! None of them need a running vest API.
//!
//! ```
//! cargo test --package vestdash-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::Command;

/// Get path to the vestdash binary
fn get_binary_path() -> String {
    // Try release first, then debug
    let release_path = env!("CARGO_MANIFEST_DIR").to_string() + "/../../target/release/vestdash";
    let debug_path = env!("CARGO_MANIFEST_DIR").to_string() + "/../../target/debug/vestdash";

    if Path::new(&release_path).exists() {
        release_path
    } else if Path::new(&debug_path).exists() {
        debug_path
    } else {
        // Fall back to cargo run
        "cargo".to_string()
    }
}

/// Build a vestdash command with credentials and API overrides cleared.
fn vestdash_command(args: &[&str]) -> Command {
    let binary = get_binary_path();

    let mut cmd = if binary == "cargo" {
        let mut cmd = Command::new("cargo");
        cmd.args(["run", "--quiet", "--package", "vestdash-cli", "--"]);
        cmd
    } else {
        Command::new(&binary)
    };
    cmd.args(args)
        .env_remove("VESTDASH_USER")
        .env_remove("VESTDASH_PASSWORD")
        .env_remove("VESTDASH_API_URL")
        .env("NO_COLOR", "1");
    cmd
}

/// Run vestdash command and return output
fn run_vestdash(args: &[&str]) -> std::process::Output {
    vestdash_command(args)
        .output()
        .expect("Failed to run vestdash")
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_vestdash(&["--help"]);

    assert!(output.status.success(), "Help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vestdash"), "Help should mention vestdash");
    assert!(stdout.contains("vests"), "Help should list vests command");
    assert!(
        stdout.contains("measurements"),
        "Help should list measurements command"
    );
    assert!(stdout.contains("exercise"), "Help should list exercise command");
}

#[test]
fn test_version_command() {
    let output = run_vestdash(&["--version"]);

    assert!(output.status.success(), "Version should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vestdash"), "Version should name the binary");
    assert!(stdout.contains('.'), "Version should contain a version number");
}

#[test]
fn test_subcommand_help() {
    let subcommands = [
        "login",
        "vests",
        "vest",
        "sensors",
        "measurements",
        "add",
        "exercise",
        "config",
        "completions",
    ];

    for cmd in subcommands {
        let output = run_vestdash(&[cmd, "--help"]);

        assert!(output.status.success(), "{} --help should succeed", cmd);

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.is_empty(), "{} --help should produce output", cmd);
    }
}

#[test]
fn test_completions_bash() {
    let output = run_vestdash(&["completions", "bash"]);

    assert!(output.status.success(), "Completions should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vestdash"), "Completions should reference vestdash");
}

#[test]
fn test_add_rejects_non_numeric_value() {
    let output = run_vestdash(&["add", "3", "warm"]);

    assert!(!output.status.success(), "Non-numeric value should be rejected");
}

// =============================================================================
// Config Commands
// =============================================================================

#[test]
fn test_config_path() {
    let output = run_vestdash(&["config", "path"]);

    assert!(output.status.success(), "Config path should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("config.toml"), "Should show config path");
}

#[test]
fn test_config_show() {
    let output = run_vestdash(&["config", "show"]);

    assert!(output.status.success(), "Config show should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("api_url"), "Should show the API URL");
}

// =============================================================================
// Login handling
// =============================================================================

#[test]
fn test_missing_credentials_fail_without_terminal() {
    let output = run_vestdash(&["vests"]);

    assert!(!output.status.success(), "vests without credentials should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No credentials given"),
        "Should explain how to pass credentials: {}",
        stderr
    );
}

/// Config dir holding one login whose API points at a closed port.
#[cfg(target_os = "linux")]
fn config_with_dead_api() -> tempfile::TempDir {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("vestdash");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            r#"
            api_url = "http://127.0.0.1:{port}"
            timeout = 2

            [[users]]
            username = "coach"
            password = "ring"
            vests = [1]
            "#
        ),
    )
    .unwrap();
    dir
}

#[cfg(target_os = "linux")]
#[test]
fn test_wrong_password_is_rejected() {
    let dir = config_with_dead_api();
    let output = vestdash_command(&["vests", "--user", "coach", "--password", "nope"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to run vestdash");

    assert!(!output.status.success(), "Wrong password should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid username or password"), "{}", stderr);
}

#[cfg(target_os = "linux")]
#[test]
fn test_unassigned_vest_is_refused() {
    let dir = config_with_dead_api();
    let output = vestdash_command(&["sensors", "2", "--user", "coach", "--password", "ring"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to run vestdash");

    assert!(!output.status.success(), "Unassigned vest should be refused");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not assigned"), "{}", stderr);
}

#[cfg(target_os = "linux")]
#[test]
fn test_unreachable_api_reports_error() {
    let dir = config_with_dead_api();
    let output = vestdash_command(&["vests", "--user", "coach", "--password", "ring"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to run vestdash");

    assert!(!output.status.success(), "Unreachable API should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not reach the API"), "{}", stderr);
}
