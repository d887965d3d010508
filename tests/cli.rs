//! Command-line surface

use std::process::Command;

fn tm_halting() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tm-halting"))
}

#[test]
fn unknown_experiment_exits_non_zero() {
    let data_dir = std::env::temp_dir().join(format!("tm-halting-cli-{}", std::process::id()));
    let output = tm_halting()
        .args(["run", "--experiment", "nope", "--log", "--data-path"])
        .arg(&data_dir)
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown experiment 'nope'"), "stderr: {stderr}");
    assert!(output.stdout.is_empty(), "no sweep output expected");
    assert!(!data_dir.exists(), "no result data expected");
}

#[test]
fn list_names_builtin_experiments() {
    let output = tm_halting().arg("list").output().expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("halt_frequency"));
    assert!(stdout.contains("run_length"));
}
