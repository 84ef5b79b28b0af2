//! End-to-end runs of the `earthworm` binary against a stand-in analyzer.
#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};

use crate::common::{GAME_OUTPUT, GAME_PY, write_analyzer, write_config, write_file};

fn earthworm(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_earthworm"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn prints_one_line_per_marker() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "game.py", GAME_PY);
    let analyzer = write_analyzer(dir.path(), "analyzer", &format!("cat <<'OUT'\n{GAME_OUTPUT}OUT\n"));
    let config = write_config(dir.path(), &analyzer, "");

    let output = earthworm(&config, &[source.to_str().unwrap()]);
    assert!(output.status.success());

    let file = source.display();
    assert_eq!(
        stdout(&output),
        format!(
            "{file}:2: unused variable 'speed'\n\
             {file}:3: Refactor lines 3-5 into new function:\n\
             \x20       pos = state.pos\n\
             \x20       return pos + speed\n"
        )
    );
}

#[test]
fn python_version_selects_interpreter() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "game.py", GAME_PY);
    // Only the versioned executable exists.
    write_analyzer(dir.path(), "analyzer3", "printf '\\tline 1: from python3\\n'\n");
    let config = write_config(dir.path(), &dir.path().join("analyzer"), "");

    let output = earthworm(&config, &["--python-version", "3", source.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with(":1: from python3\n"));
}

#[test]
fn analyzer_receives_file_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "game.py", GAME_PY);
    let analyzer = write_analyzer(
        dir.path(),
        "analyzer",
        "printf '\\tline 1: %s\\n' \"$(basename \"$1\") $2\"\n",
    );
    let config = write_config(dir.path(), &analyzer, "flags = [\"--noprogress\"]\n");

    let output = earthworm(&config, &[source.to_str().unwrap()]);
    assert!(stdout(&output).ends_with(":1: game.py --noprogress\n"));
}

#[test]
fn json_output_carries_marker_fields() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "game.py", GAME_PY);
    let analyzer = write_analyzer(dir.path(), "analyzer", &format!("cat <<'OUT'\n{GAME_OUTPUT}OUT\n"));
    let config = write_config(
        dir.path(),
        &analyzer,
        "\n[markers]\nicon = \"warning\"\nrefresh = \"line_markers\"\n",
    );

    let output = earthworm(&config, &["--format", "json", source.to_str().unwrap()]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["line"], 2);
    assert_eq!(records[0]["anchor"], "speed");
    assert_eq!(records[0]["icon"], "warning");
    assert_eq!(records[0]["refresh"], "line_markers");
    assert_eq!(records[1]["anchor"], "pos");
}

#[test]
fn missing_analyzer_prints_nothing_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "game.py", GAME_PY);
    let config = write_config(dir.path(), &dir.path().join("no-analyzer"), "");

    let output = earthworm(&config, &[source.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Earthworm unable to run"));
}

#[test]
fn missing_source_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = write_analyzer(dir.path(), "analyzer", "exit 0\n");
    let config = write_config(dir.path(), &analyzer, "");

    let output = earthworm(&config, &[dir.path().join("absent.py").to_str().unwrap()]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn unreadable_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "game.py", GAME_PY);
    let config = write_file(dir.path(), "config.toml", "[analyzer\n");

    let output = earthworm(&config, &[source.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse config"));
}
