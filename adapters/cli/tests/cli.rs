use std::{fs, process::Command};

fn podfield() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_podfield"));
    let _ = command.env("RUST_LOG", "off");
    command
}

#[test]
fn plays_first_preset_level() {
    let output = podfield()
        .args(["--level", "1", "--columns", "12", "--rows", "10", "--max-moves", "300"])
        .output()
        .expect("failed to run podfield");

    assert!(output.status.success(), "podfield exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to Podfield."));
    assert!(stdout.contains("Level 1 - Collect One Pod: Won"), "unexpected output: {stdout}");
    assert!(stdout.contains("won 1 of 1 levels"));
}

#[test]
fn plays_levels_from_file() {
    let path = std::env::temp_dir().join(format!("podfield-levels-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"[{"name": "Warm-up", "ai_drives": 1, "pods": 1}, {"name": "Pair", "ai_drives": 0, "pods": 2, "sensor_range": 40}]"#,
    )
    .expect("write level file");

    let output = podfield()
        .arg("--level-file")
        .arg(&path)
        .args(["--all-levels", "--ai-strategy", "planner", "--max-moves", "50"])
        .output()
        .expect("failed to run podfield");
    let _ = fs::remove_file(&path);

    assert!(output.status.success(), "podfield exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Warm-up: "));
    assert!(stdout.contains("Pair: "));
    assert!(stdout.contains("of 2 levels"));
}

#[test]
fn rejects_unknown_level() {
    let output = podfield()
        .args(["--level", "9"])
        .output()
        .expect("failed to run podfield");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("level 9 does not exist"), "unexpected stderr: {stderr}");
}
