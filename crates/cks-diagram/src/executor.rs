//! Diagram subprocess orchestration.
//!
//! The external tool is an interactive AI CLI: the launch script pre-feeds
//! affirmative answers to its confirmation prompts and extends `PATH` with
//! the user-local bin directory where such tools usually install.

use cks_config::DiagramSettings;
use cks_core::AppError;
use cks_process::{ExecutionResult, RunOutcome};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Host family the orchestrator is running on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKind {
    Windows,
    Unix,
}

impl HostKind {
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// Shell strategy used to launch the diagram tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// POSIX subsystem on a Windows host (`wsl -e bash -c <script>`).
    WslBash,
    /// Native Windows shell (`cmd /c <tool> chat <prompt>`).
    CmdShell,
    /// Native shell on Unix-family hosts (`bash -c <script>`).
    Bash,
}

/// Decision table: host kind plus subsystem availability determine which
/// strategies are attempted, in order. A `NotFound` spawn moves on to the
/// next entry; an exhausted plan reports the tool as missing.
pub fn launch_plan(host: HostKind, subsystem_available: bool) -> &'static [LaunchStrategy] {
    match (host, subsystem_available) {
        (HostKind::Windows, true) => &[LaunchStrategy::WslBash, LaunchStrategy::CmdShell],
        (HostKind::Windows, false) => &[LaunchStrategy::CmdShell],
        (HostKind::Unix, _) => &[LaunchStrategy::Bash],
    }
}

/// Outcome of one diagram-generation request. Both variants are reported
/// results, not errors: the caller renders them.
#[derive(Debug)]
pub enum DiagramOutcome {
    /// Tool exited zero; stdout is the display text.
    Completed(ExecutionResult),
    /// Tool exited non-zero; stderr and stdout are kept as diagnostics.
    Failed(ExecutionResult),
}

/// Run the external diagram tool for the current tree.
///
/// Refuses an empty tree before anything is spawned. A timeout, a missing
/// executable, or an unexpected launch error each map to their own
/// [`AppError`] variant; a non-zero exit is an ordinary
/// [`DiagramOutcome::Failed`]. No retries.
pub async fn generate_diagram(
    tree: &str,
    security_labels: &[&str],
    settings: &DiagramSettings,
) -> Result<DiagramOutcome, AppError> {
    if tree.trim().is_empty() {
        return Err(AppError::EmptyTree);
    }

    let prompt = cks_prompt::build_diagram_prompt(
        tree,
        security_labels,
        &settings.output_dir.display().to_string(),
    );

    let host = HostKind::detect();
    let subsystem = match host {
        HostKind::Windows => subsystem_available().await,
        HostKind::Unix => false,
    };
    let plan = launch_plan(host, subsystem);
    let limit = Duration::from_secs(settings.timeout_secs);

    for strategy in plan {
        debug!(?strategy, tool = %settings.tool, "launching diagram tool");
        let cmd = build_command(*strategy, &settings.tool, &prompt);
        match cks_process::run_with_timeout(cmd, limit).await {
            Ok(RunOutcome::Completed(result)) if result.success() => {
                info!(tool = %settings.tool, "diagram tool finished");
                return Ok(DiagramOutcome::Completed(result));
            }
            Ok(RunOutcome::Completed(result)) => {
                warn!(exit_code = result.exit_code, "diagram tool reported failure");
                return Ok(DiagramOutcome::Failed(result));
            }
            Ok(RunOutcome::TimedOut { secs }) => {
                return Err(AppError::DiagramTimeout { secs });
            }
            Err(e) if spawn_not_found(&e) => {
                warn!(?strategy, "launcher not found, falling back");
                continue;
            }
            Err(e) => {
                return Err(AppError::ToolExecError(format!("{e:#}")));
            }
        }
    }

    Err(AppError::ToolNotInstalled(settings.tool.clone()))
}

/// Probe for the POSIX subsystem the way the tool itself would be reached.
/// Only a clean exit counts; a missing `wsl` binary means unavailable.
async fn subsystem_available() -> bool {
    let mut cmd = Command::new("wsl");
    cmd.arg("--version");
    match cks_process::run(cmd).await {
        Ok(result) => result.success(),
        Err(_) => false,
    }
}

fn build_command(strategy: LaunchStrategy, tool: &str, prompt: &str) -> Command {
    match strategy {
        LaunchStrategy::WslBash => {
            let mut cmd = Command::new("wsl");
            cmd.args(["-e", "bash", "-c"]).arg(shell_script(tool, prompt));
            cmd
        }
        LaunchStrategy::CmdShell => {
            // No POSIX pipeline available: invoke the tool directly.
            let mut cmd = Command::new("cmd");
            cmd.arg("/c")
                .arg(format!("{tool} chat \"{}\"", escape_double_quotes(prompt)));
            cmd
        }
        LaunchStrategy::Bash => {
            let mut cmd = Command::new("bash");
            cmd.arg("-c").arg(shell_script(tool, prompt));
            cmd
        }
    }
}

/// POSIX launch script: user-local bin on PATH, confirmations pre-approved.
fn shell_script(tool: &str, prompt: &str) -> String {
    format!(
        "export PATH=\"$PATH:$HOME/.local/bin\" && printf 'y\\ny\\ny\\n' | {tool} chat \"{}\"",
        escape_double_quotes(prompt)
    )
}

fn escape_double_quotes(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn spawn_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
