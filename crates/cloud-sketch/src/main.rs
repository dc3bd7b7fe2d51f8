use anyhow::Result;
use clap::Parser;

mod chat_cmd;
mod checklist_cmd;
mod cli;
mod doctor;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat => {
            chat_cmd::run_chat().await?;
        }
        Commands::Checklist => {
            checklist_cmd::print_checklist();
        }
        Commands::Doctor { format } => {
            doctor::run_doctor(format)?;
        }
    }

    Ok(())
}
