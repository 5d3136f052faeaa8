#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;

pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

pub fn key_path(name: &str) -> String {
    project_root()
        .join("testdata/keys")
        .join(name)
        .to_string_lossy()
        .to_string()
}

pub fn read_key(name: &str) -> String {
    std::fs::read_to_string(key_path(name)).unwrap()
}

pub fn pemrsa() -> Command {
    let mut cmd = Command::cargo_bin("pemrsa").unwrap();
    cmd.current_dir(project_root());
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
