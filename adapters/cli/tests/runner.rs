use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use undead_survival_core::WELCOME_BANNER;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_undead-survival"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the undead-survival binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are valid UTF-8")
}

#[test]
fn named_run_is_saved_and_shown_on_the_next_start() {
    let dir = tempfile::tempdir().expect("temp dir");
    let saves = dir.path().join("saves");
    let common = [
        "--duration",
        "2",
        "--frame-ms",
        "50",
        "--seed",
        "17",
        "--save-dir",
        path_arg(&saves),
    ];

    let mut named = common.to_vec();
    named.extend(["--name", "ann"]);
    let first = run(&named);
    assert!(first.status.success(), "first run failed: {first:?}");
    let text = stdout(&first);
    assert!(text.contains(WELCOME_BANNER));
    assert!(text.contains("Survived 00:00:0"));
    assert!(text.contains("LEADERBOARD\n----------------\n1. ann - "));

    let saved = fs::read_to_string(saves.join("playerData.txt")).expect("last session saved");
    assert!(saved.starts_with("ann,"));

    let second = run(&common);
    assert!(second.status.success(), "second run failed: {second:?}");
    let text = stdout(&second);
    assert!(text.contains("Last run: ann survived 00:00:0"));
    assert!(text.contains("1. ann - "));
}

#[test]
fn unsupported_config_version_fails_startup() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("game.toml");
    fs::write(&config, "version = 9\n").expect("write config");

    let output = run(&[
        "--config",
        path_arg(&config),
        "--duration",
        "1",
        "--save-dir",
        path_arg(&dir.path().join("saves")),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid game config at"), "stderr: {stderr}");
    assert!(stderr.contains("unsupported game config version 9"), "stderr: {stderr}");
}

#[test]
fn invalid_names_are_reported_without_failing_the_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let saves = dir.path().join("saves");

    let output = run(&[
        "--duration",
        "1",
        "--name",
        "a,b",
        "--save-dir",
        path_arg(&saves),
    ]);

    assert!(output.status.success(), "run failed: {output:?}");
    assert!(stdout(&output).contains("cannot record this run"));
    assert!(!saves.join("leaderboard.txt").exists());
}
