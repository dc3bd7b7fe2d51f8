use clap::{Parser, Subcommand};
use cks_core::types::OutputFormat;

#[derive(Parser)]
#[command(name = "cks")]
#[command(about = "Cloud Sketch: conversational AWS architecture designer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive design session
    Chat,

    /// Print the fixed security checklist and its CLI keys
    Checklist,

    /// Check the environment (credential, diagram tool, output directory)
    Doctor {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}
