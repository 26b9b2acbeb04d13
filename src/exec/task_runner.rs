// src/exec/task_runner.rs

//! Runs one batch of spec files as a child process.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Environment variable carrying the worker's cid.
pub const CID_ENV: &str = "SPECWATCH_CID";

/// Environment variable carrying the session to run on.
pub const SESSION_ENV: &str = "SPECWATCH_SESSION_ID";

/// How a worker turns spec files into a process.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    /// Shell command; spec files are appended as arguments.
    pub cmd: String,
    /// Working directory of the child.
    pub cwd: PathBuf,
}

/// Run `command` for `files` and wait for it to exit.
///
/// Child stdout is echoed to our stdout and stderr to our stderr, each line
/// prefixed with the cid so interleaved workers stay readable.
pub async fn run_specs(
    command: &WorkerCommand,
    cid: &str,
    session_id: &str,
    files: &[PathBuf],
) -> Result<ExitStatus> {
    info!(cid, session_id, files = files.len(), cmd = %command.cmd, "starting worker process");

    let mut cmd = shell_command(&command.cmd, files);
    cmd.current_dir(&command.cwd)
        .env(CID_ENV, cid)
        .env(SESSION_ENV, session_id)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for worker '{cid}'"))?;

    if let Some(stdout) = child.stdout.take() {
        let prefix = cid.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("[{prefix}] {line}");
            }
        });
    }

    // Always consume stderr so buffers don't fill.
    if let Some(stderr) = child.stderr.take() {
        let prefix = cid.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                eprintln!("[{prefix}] {line}");
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of worker '{cid}'"))?;

    debug!(cid, exit_code = ?status.code(), success = status.success(), "worker process exited");
    Ok(status)
}

/// Build a shell command appropriate for the platform.
///
/// On Unix the files are passed as positional parameters (`"$@"`), so no
/// quoting of paths is needed.
fn shell_command(cmd: &str, files: &[PathBuf]) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd).args(files.iter().map(PathBuf::as_path));
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c")
            .arg(format!("{cmd} \"$@\""))
            .arg("specwatch")
            .args(files.iter().map(PathBuf::as_path));
        c
    }
}

/// Files to hand to the child for a run touching `changed`.
///
/// A file that belongs to a spec group pulls in the whole group, in order.
pub fn files_for_change(specs: &[crate::types::Spec], changed: &Path) -> Vec<PathBuf> {
    match specs.iter().find(|s| s.is_group() && s.contains(changed)) {
        Some(group) => group.files().map(Path::to_path_buf).collect(),
        None => vec![changed.to_path_buf()],
    }
}
