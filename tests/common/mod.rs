#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("staffdb.sqlite")
}

pub fn base_cmd(db: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_staffdb"));
    cmd.env("DOTENV_PATH", db.with_extension("env"))
        .env_remove("STAFFDB_DB")
        .env_remove("STAFFDB_LOG_FILE")
        .env("RUST_LOG", "info")
        .arg("--db")
        .arg(db);
    cmd
}

pub fn run(db: &Path, args: &[&str]) -> Output {
    base_cmd(db).args(args).output().expect("run staffdb")
}

pub fn run_ok(db: &Path, args: &[&str]) -> serde_json::Value {
    let out = run(db, args);
    assert!(
        out.status.success(),
        "staffdb {:?} failed\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}
