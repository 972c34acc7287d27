use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color and a private log
fn waypoint_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("waypoint").expect("Failed to find waypoint binary");
    cmd.arg("--no-color")
        .arg("--log-file")
        .arg(temp_dir.path().join("flows.txt"));
    cmd
}

/// Joins scripted answers into stdin content
fn answers(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

#[test]
fn test_cli_steps_lists_every_kind() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. **Title Step**"))
        .stdout(predicate::str::contains("10. **End Step**"));
}

#[test]
fn test_cli_log_before_any_flow() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("No flows recorded yet."));
}

#[test]
fn test_cli_session_exits_on_zero() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .write_stdin(answers(&["0"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Create flow"))
        .stdout(predicate::str::contains("Exiting the program."));
}

#[test]
fn test_cli_invalid_menu_option_reprompts() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .write_stdin(answers(&["9", "0"]))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Invalid option. Please enter an option between 0 and 6.",
        ));
}

#[test]
fn test_cli_create_flow_then_read_log() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .arg("session")
        .write_stdin(answers(&[
            "1", "Onboarding", "1", "Welcome", "Intro", "10", "Welcome", "Intro", "2", "0",
        ]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Flow Onboarding created"))
        .stdout(predicate::str::contains("- Onboarding (ID: "))
        .stdout(predicate::str::contains("Nume proces: Onboarding"));

    waypoint_cmd(&temp_dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Onboarding - Welcome - Intro | End of flow | ",
        ))
        .stdout(predicate::str::contains("Numele procesului: Onboarding"))
        .stdout(predicate::str::contains("-------------------------"));
}

#[test]
fn test_cli_calculus_flow_and_json_analysis() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .arg("--json")
        .write_stdin(answers(&[
            "1", "Budget", // create
            "4", "Income", "100", // number input
            "5", "divide", "1", "1", "0", // calculus dividing by zero
            "10", "100", "4", "n", // finalize and run once
            "6", "Budget", // analyze
            "0",
        ]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Division by zero"))
        .stdout(predicate::str::contains("Result: 25"))
        .stdout(predicate::str::contains("\"completion_count\": 1"))
        .stdout(predicate::str::contains("\"error_screens\": 1"));
}

#[test]
fn test_cli_details_and_delete() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .write_stdin(answers(&[
            "1", "Short", "10", "5", "Short", "4", "Short", "5", "Short", "0",
        ]))
        .assert()
        .success()
        .stdout(predicate::str::contains("1. **End Step**: End of flow"))
        .stdout(predicate::str::contains("Success: Flow deleted successfully."))
        .stdout(predicate::str::contains("Error: Flow not found."));
}

#[test]
fn test_cli_fatal_error_exits_non_zero() {
    let temp_dir = create_cli_test_environment();

    waypoint_cmd(&temp_dir)
        .write_stdin(answers(&["1", "Broken", "3", "Name", ""]))
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Error: Invalid input. Text input cannot be empty",
        ));

    let log = std::fs::read_to_string(temp_dir.path().join("flows.txt")).unwrap();
    assert!(log.contains("Numele procesului: Broken"));
}
