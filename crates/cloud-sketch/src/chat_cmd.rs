//! `cks chat`: the interactive design session.
//!
//! One [`SessionState`] lives for the duration of the process; utterances
//! go straight to the assistant, and the remaining triggers (checklist
//! toggles, diagram build, tree reset, report export) are slash commands.

use anyhow::Result;
use cks_config::Config;
use cks_core::types::ChecklistItem;
use cks_core::AppError;
use cks_diagram::{generate_diagram, latest_artifact, DiagramOutcome};
use cks_llm::GeminiClient;
use cks_session::{analyze, exchange, SessionState};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

const DEFAULT_REPORT_PATH: &str = "aws-security-report.md";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub async fn run_chat() -> Result<()> {
    let config = Config::load()?;
    config.ensure_output_dir()?;

    // A missing credential is surfaced immediately; the session still
    // opens so checklist, report, and diagram triggers keep working.
    let client = match config.require_api_key() {
        Ok(key) => Some(GeminiClient::new(
            config.api.endpoint.clone(),
            config.api.model.clone(),
            key,
        )),
        Err(e) => {
            println!("{e}");
            None
        }
    };

    let mut session = SessionState::new();
    info!(session = %session.session_id, "chat session started");

    println!("assistant> {}", session.turns()[0].content);
    println!("(type /help for commands, /quit to leave)");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input == "/quit" || input == "/exit" {
            break;
        } else if input == "/help" {
            print_help();
        } else if input == "/tree" {
            show_tree(&session);
        } else if input == "/reset" {
            session.reset_tree();
            println!("Tree cleared.");
        } else if input == "/checklist" {
            show_toggles(&session);
        } else if let Some(key) = input.strip_prefix("/check ") {
            set_toggle(&mut session, key.trim(), true);
        } else if let Some(key) = input.strip_prefix("/uncheck ") {
            set_toggle(&mut session, key.trim(), false);
        } else if input == "/diagram" {
            run_diagram_pipeline(&config, client.as_ref(), &mut session).await;
        } else if input == "/analyze" {
            run_analysis(client.as_ref(), &mut session).await;
        } else if let Some(rest) = input.strip_prefix("/report") {
            write_report(&session, rest.trim());
        } else if input.starts_with('/') {
            println!("Unknown command '{input}'; try /help.");
        } else {
            match &client {
                Some(client) => {
                    let reply = exchange(&mut session, client, input).await;
                    println!("assistant> {reply}");
                }
                None => println!("{}", AppError::MissingApiKey),
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  /tree              show the current architecture tree");
    println!("  /reset             clear the current tree");
    println!("  /checklist         show checklist toggles");
    println!("  /check <key>       enable a checklist item");
    println!("  /uncheck <key>     disable a checklist item");
    println!("  /diagram           render the tree with the external diagram tool");
    println!("  /analyze           run the security analysis");
    println!("  /report [path]     write the markdown report (default {DEFAULT_REPORT_PATH})");
    println!("  /quit              leave the session");
    println!("Anything else is sent to the assistant.");
}

fn show_tree(session: &SessionState) {
    if session.current_tree().is_empty() {
        println!("No architecture tree yet; describe what you want to build.");
    } else {
        println!("{}", session.current_tree());
    }
}

fn show_toggles(session: &SessionState) {
    for item in ChecklistItem::ALL {
        let mark = if session.is_toggled(item) { "x" } else { " " };
        println!("  [{mark}] {:16} {}", item.key(), item.label());
    }
}

fn set_toggle(session: &mut SessionState, key: &str, on: bool) {
    match ChecklistItem::from_key(key) {
        Some(item) => {
            session.set_toggle(item, on);
            let state = if on { "checked" } else { "unchecked" };
            println!("{} {state}.", item.label());
        }
        None => println!("Unknown checklist key '{key}'; see `cks checklist`."),
    }
}

/// The diagram trigger: subprocess, artifact scan, then security analysis.
/// The analysis runs even when the diagram itself failed; only an empty
/// tree short-circuits the whole pipeline.
async fn run_diagram_pipeline(
    config: &Config,
    client: Option<&GeminiClient>,
    session: &mut SessionState,
) {
    let checked = session.checked_items();
    if checked.is_empty() {
        println!("No security items checked; generating with the default setup.");
    } else {
        println!("Applying security elements:");
        for (i, item) in checked.iter().enumerate() {
            println!("  {}. {}", i + 1, cks_prompt::strip_example_suffix(item.label()));
        }
    }
    let labels: Vec<&str> = checked.iter().map(|item| item.label()).collect();

    println!("Generating the diagram with '{}'...", config.diagram.tool);
    match generate_diagram(session.current_tree(), &labels, &config.diagram).await {
        Ok(DiagramOutcome::Completed(result)) => {
            println!("Diagram tool finished.");
            if !result.output.trim().is_empty() {
                println!("{}", result.output.trim_end());
            }
            match latest_artifact(&config.diagram.output_dir) {
                Ok(Some(artifact)) => {
                    println!("Diagram file: {}", artifact.path.display());
                    session.record_diagram(artifact.path);
                }
                Ok(None) => {
                    println!("No diagram file found yet; the tool may still be writing.");
                }
                Err(e) => println!("Could not scan the output directory: {e:#}"),
            }
        }
        Ok(DiagramOutcome::Failed(result)) => {
            println!("Diagram tool failed (exit code {}).", result.exit_code);
            if !result.stderr_output.trim().is_empty() {
                println!("stderr: {}", result.stderr_output.trim_end());
            }
            if !result.output.trim().is_empty() {
                println!("output: {}", result.output.trim_end());
            }
        }
        Err(AppError::EmptyTree) => {
            println!("There is no architecture tree to render yet; design one first.");
            return;
        }
        Err(e @ AppError::ToolNotInstalled(_)) => {
            println!("{e} (install it or set CKS_DIAGRAM_TOOL)");
        }
        Err(e) => println!("{e}"),
    }

    run_analysis(client, session).await;
}

async fn run_analysis(client: Option<&GeminiClient>, session: &mut SessionState) {
    match client {
        Some(client) => {
            println!("Running the security analysis...");
            let analysis = analyze(session, client).await;
            println!("{analysis}");
            println!("(stored; /report writes the full report)");
        }
        None => println!("{}", AppError::MissingApiKey),
    }
}

fn write_report(session: &SessionState, path_arg: &str) {
    let path = if path_arg.is_empty() {
        Path::new(DEFAULT_REPORT_PATH)
    } else {
        Path::new(path_arg)
    };
    let timestamp = session
        .analysis_timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string());
    let report = cks_prompt::render_report(
        session.current_tree(),
        &session.security_analysis,
        timestamp.as_deref(),
    );
    match std::fs::write(path, report) {
        Ok(()) => println!("Report written to {}", path.display()),
        Err(e) => println!("Could not write the report: {e}"),
    }
}
