//! `flens recon`: config-driven fleet-compliance reconciliation.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::exit_codes::{EXIT_RECON_FLAGGED, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Run a compliance reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  flens recon run fleet.toml
  flens recon run fleet.toml --json
  flens recon run fleet.toml --output result.json --csv report.csv")]
    Run {
        /// Path to the .toml run config
        config: PathBuf,

        /// Output JSON to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write a flat per-record CSV report to file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Validate a run config without running
    #[command(after_help = "\
Examples:
  flens recon validate fleet.toml")]
    Validate {
        /// Path to the .toml run config
        config: PathBuf,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { config, json, output, csv } => cmd_recon_run(config, json, output, csv),
        ReconCommands::Validate { config } => cmd_recon_validate(config),
    }
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn read_input(base_dir: &Path, file: &str) -> Result<String, CliError> {
    let path = base_dir.join(file);
    std::fs::read_to_string(&path)
        .map_err(|e| {
            recon_err(EXIT_RECON_RUNTIME, format!("cannot read {}: {e}", path.display()))
                .with_hint("input paths resolve relative to the config file")
        })
}

fn cmd_recon_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    csv_file: Option<PathBuf>,
) -> Result<(), CliError> {
    use fleetlens_recon::ingest::{load_detections, load_registry, load_transactions};

    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot read config: {e}")))?;

    let config = fleetlens_recon::ReconConfig::from_toml(&config_str)
        .map_err(|e| recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()))?;

    // Input files resolve relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let inputs = &config.inputs;

    let transactions = load_transactions(
        &read_input(base_dir, &inputs.transactions.file)?,
        &inputs.transactions.columns,
    )
    .map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?;

    let detections = load_detections(
        &read_input(base_dir, &inputs.detections.file)?,
        &inputs.detections.columns,
    )
    .map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?;

    let registry = load_registry(
        &read_input(base_dir, &inputs.registry.file)?,
        &inputs.registry.columns,
    )
    .map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?;

    let input = fleetlens_recon::model::ReconInput { transactions, detections, registry };
    let result = fleetlens_recon::run(&config, &input);

    // Output
    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}")))?;

    let json_target = output_file.or_else(|| config.output.json.as_ref().map(PathBuf::from));
    if let Some(ref path) = json_target {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = csv_file {
        crate::report::write_csv_report(&result.records, path)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "compliance run '{}': {} records, {} clean fuelings, {} suspicious, {} station faults, avg score {:.1}",
        result.meta.config_name,
        s.total_records,
        s.fueling_ok,
        s.suspicious,
        s.station_faults,
        s.average_score,
    );

    if s.suspicious > 0 || s.station_faults > 0 {
        return Err(recon_err(EXIT_RECON_FLAGGED, "flagged transactions found"));
    }

    Ok(())
}

fn cmd_recon_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot read config: {e}")))?;

    match fleetlens_recon::ReconConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' as of {}, station fault threshold {} session(s){}",
                config.name,
                config.as_of,
                config.thresholds.station_fault_sessions,
                if config.emissions.is_some() { ", emissions enabled" } else { "" },
            );
            Ok(())
        }
        Err(e) => Err(recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string())),
    }
}
