use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_winddown"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute winddown");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("countdown"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_winddown"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute winddown");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("winddown"));
}

#[test]
fn arm_help_lists_both_timers() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_winddown"));
    cmd.args(["arm", "--help"]);

    // Act
    let output = cmd.output().expect("failed to execute winddown");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app"));
    assert!(stdout.contains("system"));
}

#[test]
fn arm_system_requires_an_action() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_winddown"));
    cmd.args(["arm", "system"]);

    // Act
    let output = cmd.output().expect("failed to execute winddown");

    // Assert — clap rejects the missing <ACTION> argument.
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ACTION"));
}
