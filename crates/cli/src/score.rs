//! `flens score`: one-off compliance assessment of a single vehicle.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use fleetlens_recon::config::{PenaltyConfig, RegistryColumns};
use fleetlens_recon::model::{DiscrepancyFlag, HelmetStatus, VehicleClass};

use crate::exit_codes::EXIT_RECON_RUNTIME;
use crate::CliError;

#[derive(Args)]
#[command(after_help = "\
Examples:
  flens score --registry fleet.csv --vehicle KA03AB1234
  flens score --registry fleet.csv --vehicle KA03AB1234 --helmet not-worn
  flens score --registry fleet.csv --vehicle KA03AB1234 --as-of 2026-04-01 --flag suspicious")]
pub struct ScoreArgs {
    /// Path to the registry CSV (canonical column names)
    #[arg(long)]
    registry: PathBuf,

    /// Vehicle id to assess
    #[arg(long)]
    vehicle: String,

    /// Override the vehicle class from the registry record
    #[arg(long, value_enum)]
    class: Option<ClassArg>,

    /// Helmet observation, if any
    #[arg(long, value_enum, default_value_t = HelmetArg::Unknown)]
    helmet: HelmetArg,

    /// Fueling discrepancy flag to score against
    #[arg(long, value_enum, default_value_t = FlagArg::Ok)]
    flag: FlagArg,

    /// Assessment date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    TwoWheeler,
    FourWheeler,
    Truck,
    Other,
}

impl From<ClassArg> for VehicleClass {
    fn from(value: ClassArg) -> Self {
        match value {
            ClassArg::TwoWheeler => Self::TwoWheeler,
            ClassArg::FourWheeler => Self::FourWheeler,
            ClassArg::Truck => Self::Truck,
            ClassArg::Other => Self::Other,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum HelmetArg {
    Worn,
    NotWorn,
    Unknown,
}

impl From<HelmetArg> for HelmetStatus {
    fn from(value: HelmetArg) -> Self {
        match value {
            HelmetArg::Worn => Self::Worn,
            HelmetArg::NotWorn => Self::NotWorn,
            HelmetArg::Unknown => Self::Unknown,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FlagArg {
    Ok,
    Suspicious,
    StationFault,
}

impl From<FlagArg> for DiscrepancyFlag {
    fn from(value: FlagArg) -> Self {
        match value {
            FlagArg::Ok => Self::Ok,
            FlagArg::Suspicious => Self::Suspicious,
            FlagArg::StationFault => Self::PotentialStationFault,
        }
    }
}

pub fn cmd_score(args: ScoreArgs) -> Result<(), CliError> {
    let err = |msg: String| CliError { code: EXIT_RECON_RUNTIME, message: msg, hint: None };

    let csv_data = std::fs::read_to_string(&args.registry)
        .map_err(|e| err(format!("cannot read {}: {e}", args.registry.display())))?;

    let registry = fleetlens_recon::ingest::load_registry(&csv_data, &RegistryColumns::default())
        .map_err(|e| err(e.to_string()))?;

    let record = registry.lookup(&args.vehicle);
    let vehicle_class = args.class.map(VehicleClass::from).unwrap_or(record.vehicle_class);
    let as_of = args.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let assessment = fleetlens_recon::score::score(
        record,
        args.flag.into(),
        vehicle_class,
        args.helmet.into(),
        &PenaltyConfig::default(),
        as_of,
    );

    let json = serde_json::to_string_pretty(&assessment)
        .map_err(|e| err(format!("JSON serialization error: {e}")))?;
    println!("{json}");

    if !registry.contains(&args.vehicle) {
        eprintln!("note: '{}' not in registry, scored against defaults", args.vehicle);
    }

    Ok(())
}
