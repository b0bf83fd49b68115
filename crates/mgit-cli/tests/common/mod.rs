//! Shared test harness for mgit-cli integration tests.
//!
//! Runs the compiled `mgit` binary with a pinned environment so that
//! variables from the caller's shell cannot redirect the repository.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stdout_bytes: Vec<u8>,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Stdout with the trailing newline removed.
    pub fn line(&self) -> &str {
        self.stdout.trim_end_matches('\n')
    }

    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Path to the compiled `mgit` binary.
pub fn mgit_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mgit"))
}

fn command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(mgit_bin());
    cmd.args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .env_remove("GIT_OBJECT_DIRECTORY")
        .env_remove("MGIT_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn collect(output: std::process::Output) -> CommandResult {
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stdout_bytes: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run mgit in `dir` with the given arguments.
pub fn mgit(dir: &Path, args: &[&str]) -> CommandResult {
    collect(command(dir, args).output().expect("failed to run mgit"))
}

/// Run mgit in `dir` with extra environment variables.
pub fn mgit_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> CommandResult {
    let mut cmd = command(dir, args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    collect(cmd.output().expect("failed to run mgit"))
}

/// Run mgit with piped stdin in `dir`.
pub fn mgit_stdin(dir: &Path, args: &[&str], stdin_bytes: &[u8]) -> CommandResult {
    let mut cmd = command(dir, args);
    cmd.stdin(Stdio::piped());
    let mut child = cmd.spawn().expect("failed to spawn mgit");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin_bytes)
        .unwrap();
    collect(child.wait_with_output().expect("failed to wait on mgit"))
}

/// Fresh scratch directory with an initialized repository.
pub fn setup_repo() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = std::fs::canonicalize(dir.path()).unwrap();
    let result = mgit(&root, &["init", "-q"]);
    assert_eq!(result.exit_code, 0, "init failed: {}", result.stderr);
    (dir, root)
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Every object file under `.git/objects`, sorted.
pub fn object_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let objects = root.join(".git").join("objects");
    for fanout in std::fs::read_dir(objects).unwrap() {
        let fanout = fanout.unwrap().path();
        if fanout.is_dir() {
            for entry in std::fs::read_dir(fanout).unwrap() {
                files.push(entry.unwrap().path());
            }
        }
    }
    files.sort();
    files
}
