#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::path::PathBuf;
use tempfile::TempDir;

pub fn rti() -> Command {
    cargo_bin_cmd!("rgamenight")
}

/// Scratch home + data directory, removed when dropped.
pub fn sandbox() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

pub fn data_dir(home: &TempDir) -> String {
    home.path().join("data").to_string_lossy().to_string()
}

/// Command isolated from the real config: HOME points into the sandbox and
/// `--data` at its data directory.
pub fn rgn(home: &TempDir) -> Command {
    let mut cmd = rti();
    cmd.env("HOME", home.path())
        .env("APPDATA", home.path())
        .env_remove("RUST_LOG")
        .env_remove("EDITOR")
        .env_remove("VISUAL")
        .args(["--data", &data_dir(home), "--test"]);
    cmd
}

/// Absolute output path inside the sandbox.
pub fn temp_out(home: &TempDir, name: &str) -> String {
    let path: PathBuf = home.path().join(name);
    path.to_string_lossy().to_string()
}

/// Init + setup with the default schedule in channel 1.
pub fn init_with_signup(home: &TempDir) {
    rgn(home).arg("init").assert().success();
    rgn(home).arg("setup").assert().success();
}

pub fn react(home: &TempDir, user: u64, token: &str) -> assert_cmd::assert::Assert {
    rgn(home)
        .args(["react", "--user", &user.to_string(), "--token", token])
        .assert()
}
