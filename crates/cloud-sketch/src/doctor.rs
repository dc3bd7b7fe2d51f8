//! Environment diagnostics for Cloud Sketch.

use anyhow::Result;
use cks_config::{Config, API_KEY_ENV, DIAGRAM_TOOL_ENV};
use cks_core::types::OutputFormat;
use std::env;

/// Run environment diagnostics: credential, diagram tool, output directory.
pub fn run_doctor(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let credential_ready = config.require_api_key().is_ok();
    let tool_path = which::which(&config.diagram.tool).ok();
    let output_dir_exists = config.diagram.output_dir.is_dir();

    match format {
        OutputFormat::Text => {
            println!("=== Cloud Sketch Environment Check ===");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Platform: {} ({})", env::consts::OS, env::consts::ARCH);
            println!();

            println!("=== Text-generation service ===");
            if credential_ready {
                println!("Credential: configured");
            } else {
                println!("Credential: MISSING (set {API_KEY_ENV})");
            }
            println!("Model: {}", config.api.model);
            println!("Endpoint: {}", config.api.endpoint);
            println!();

            println!("=== Diagram tool ===");
            match &tool_path {
                Some(path) => {
                    println!("'{}' found at {}", config.diagram.tool, path.display());
                }
                None => println!(
                    "'{}' NOT FOUND on PATH (install it or set {DIAGRAM_TOOL_ENV})",
                    config.diagram.tool
                ),
            }
            println!("Timeout: {}s", config.diagram.timeout_secs);
            println!(
                "Output directory: {} ({})",
                config.diagram.output_dir.display(),
                if output_dir_exists {
                    "exists"
                } else {
                    "created at session start"
                }
            );
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "platform": {
                    "os": env::consts::OS,
                    "arch": env::consts::ARCH,
                },
                "text_generation": {
                    "credential_ready": credential_ready,
                    "model": config.api.model,
                    "endpoint": config.api.endpoint,
                },
                "diagram_tool": {
                    "name": config.diagram.tool,
                    "path": tool_path.as_ref().map(|p| p.display().to_string()),
                    "timeout_secs": config.diagram.timeout_secs,
                },
                "output_dir": {
                    "path": config.diagram.output_dir.display().to_string(),
                    "exists": output_dir_exists,
                },
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
