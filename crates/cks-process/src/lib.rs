//! Subprocess plumbing: spawning, output capture, and wall-clock timeouts.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::warn;

/// Maximum length of the one-line summary derived from command output.
const SUMMARY_MAX_CHARS: usize = 200;

/// Result of running an external command to completion.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Captured stdout.
    pub output: String,
    /// Captured stderr.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr_output: String,
    /// Last non-empty stdout line, truncated for display.
    pub summary: String,
    /// Exit code (1 if signal-killed).
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Outcome of a timeout-bounded run.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(ExecutionResult),
    /// The wall-clock limit expired; the child has been torn down.
    TimedOut { secs: u64 },
}

/// Spawn a command with both output streams piped.
///
/// The child is isolated in its own process group (via `setsid`) so that a
/// later teardown takes the whole subprocess tree with it, and
/// `kill_on_drop` guarantees teardown when the capture future is dropped.
pub async fn spawn(mut cmd: Command) -> Result<Child> {
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());
    cmd.kill_on_drop(true);

    // SAFETY: setsid() is async-signal-safe and runs before exec, so no
    // Rust runtime state exists in the child yet.
    #[cfg(unix)]
    unsafe {
        cmd.pre_exec(|| {
            libc::setsid();
            Ok(())
        });
    }

    cmd.spawn().context("Failed to spawn command")
}

/// Wait for a spawned child and capture both streams until EOF.
pub async fn wait_and_capture(mut child: Child) -> Result<ExecutionResult> {
    let stdout = child.stdout.take().context("Failed to capture stdout")?;
    let stderr = child.stderr.take().context("Failed to capture stderr")?;

    let mut stdout_reader = BufReader::new(stdout);
    let mut stderr_reader = BufReader::new(stderr);

    let mut output = String::new();
    let mut stderr_output = String::new();
    let mut stdout_line = String::new();
    let mut stderr_line = String::new();

    let mut stdout_done = false;
    let mut stderr_done = false;

    // Drain both pipes concurrently so a chatty stream cannot deadlock the
    // other side against a full pipe buffer.
    while !stdout_done || !stderr_done {
        tokio::select! {
            result = stdout_reader.read_line(&mut stdout_line), if !stdout_done => {
                match result {
                    Ok(0) | Err(_) => stdout_done = true,
                    Ok(_) => {
                        output.push_str(&stdout_line);
                        stdout_line.clear();
                    }
                }
            }
            result = stderr_reader.read_line(&mut stderr_line), if !stderr_done => {
                match result {
                    Ok(0) | Err(_) => stderr_done = true,
                    Ok(_) => {
                        stderr_output.push_str(&stderr_line);
                        stderr_line.clear();
                    }
                }
            }
        }
    }

    let status = child.wait().await.context("Failed to wait for command")?;
    let exit_code = status.code().unwrap_or_else(|| {
        warn!("Process terminated by signal, using exit code 1");
        1
    });

    let summary = extract_summary(&output);

    Ok(ExecutionResult {
        output,
        stderr_output,
        summary,
        exit_code,
    })
}

/// Spawn, wait, and capture in one call.
pub async fn run(cmd: Command) -> Result<ExecutionResult> {
    let child = spawn(cmd).await?;
    wait_and_capture(child).await
}

/// Run a command under a hard wall-clock bound.
///
/// On expiry the capture future is dropped, which kills the child via
/// `kill_on_drop`, and the caller gets [`RunOutcome::TimedOut`] instead of
/// an error: a timeout is an expected, reportable outcome.
pub async fn run_with_timeout(cmd: Command, limit: Duration) -> Result<RunOutcome> {
    let child = spawn(cmd).await?;
    match tokio::time::timeout(limit, wait_and_capture(child)).await {
        Ok(result) => Ok(RunOutcome::Completed(result?)),
        Err(_) => {
            warn!(secs = limit.as_secs(), "subprocess exceeded wall-clock limit");
            Ok(RunOutcome::TimedOut {
                secs: limit.as_secs(),
            })
        }
    }
}

/// Last non-empty line of `output`, truncated to [`SUMMARY_MAX_CHARS`].
fn extract_summary(output: &str) -> String {
    let last_line = output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    if last_line.chars().count() <= SUMMARY_MAX_CHARS {
        return last_line.to_string();
    }
    let truncated: String = last_line.chars().take(SUMMARY_MAX_CHARS - 3).collect();
    format!("{truncated}...")
}
