//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A small Python module with an indented body, a blank line, and a
/// trailing newline.
pub const GAME_PY: &str = "\
def update(state):
    speed = state.speed
    pos = state.pos

    return pos + speed
";

/// Analyzer output for [`GAME_PY`]: one single-line finding and one range
/// finding, separated by unrelated progress output.
pub const GAME_OUTPUT: &str = "\
Analyzing game.py
\tline 2: unused variable 'speed'

line 3-5 (duplicated logic):
    pos = state.pos
    return pos + speed

done
";

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Write an executable shell script standing in for the analyzer.
#[cfg(unix)]
pub fn write_analyzer(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = write_file(dir, name, &format!("#!/bin/sh\n{body}"));
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Config file pointing the analyzer at `interpreter`, run without `-m`.
pub fn write_config(dir: &Path, interpreter: &Path, extra: &str) -> PathBuf {
    let content = format!(
        "[analyzer]\ninterpreter = {:?}\nmodule = \"\"\n{extra}",
        interpreter.display().to_string()
    );
    write_file(dir, "config.toml", &content)
}
