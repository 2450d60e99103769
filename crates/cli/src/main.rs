// FleetLens CLI - headless fleet-compliance runs

mod exit_codes;
mod recon;
mod report;
mod score;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "flens")]
#[command(about = "Fleet fuel-compliance reconciliation and scoring")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Config-driven compliance reconciliation
    Recon {
        #[command(subcommand)]
        command: recon::ReconCommands,
    },

    /// Score a single vehicle against a registry, no fueling data required
    Score(score::ScoreArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: flens <command> [options]");
            eprintln!("       flens --help for more information");
            Ok(())
        }
        Some(Commands::Recon { command }) => recon::cmd_recon(command),
        Some(Commands::Score(args)) => score::cmd_score(args),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
