use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Pinned defaults
// ---------------------------------------------------------------------------
// The penalty table is an explicit, named constant set: the source history
// carries diverging values for the fuel-discrepancy penalty (20 vs 10) and
// the helmet rule (15 vs informational-only). The constants below pin the
// canonical variant; a config override reaches the others without a code
// change.

pub const DEFAULT_PENALTY: u32 = 20;
/// Helmet is tracked as an informational flag, not a scored item.
pub const DEFAULT_HELMET_PENALTY: u32 = 0;

pub const DEFAULT_ABS_LITERS: f64 = 5.0;
pub const DEFAULT_PCT: f64 = 10.0;
pub const DEFAULT_PCT_FLOOR_LITERS: f64 = 1.0;
/// Below this billed volume the percentage test is skipped entirely,
/// guarding against division blow-up on near-zero fills.
pub const DEFAULT_MIN_BILLED_LITERS: f64 = 0.1;
pub const DEFAULT_STATION_FAULT_SESSIONS: u32 = 3;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    /// The "now" every date rule evaluates against. Injected rather than
    /// sampled from the clock so runs are reproducible.
    pub as_of: NaiveDate,
    pub inputs: InputsConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub penalties: PenaltyConfig,
    #[serde(default)]
    pub emissions: Option<crate::emissions::EmissionsConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Inputs + column mappings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InputsConfig {
    pub transactions: SourceConfig<TransactionColumns>,
    pub detections: SourceConfig<DetectionColumns>,
    pub registry: SourceConfig<RegistryColumns>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig<C> {
    pub file: String,
    #[serde(default)]
    pub columns: C,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransactionColumns {
    pub vehicle_id: String,
    pub timestamp: String,
    pub billed_volume: String,
    pub amount: String,
    pub station_id: String,
}

impl Default for TransactionColumns {
    fn default() -> Self {
        Self {
            vehicle_id: "vehicle_id".into(),
            timestamp: "timestamp".into(),
            billed_volume: "billed_volume".into(),
            amount: "amount".into(),
            station_id: "station_id".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionColumns {
    pub vehicle_id: String,
    pub vehicle_class: String,
    pub helmet: String,
    pub detected_volume: String,
    pub timestamp: String,
}

impl Default for DetectionColumns {
    fn default() -> Self {
        Self {
            vehicle_id: "vehicle_id".into(),
            vehicle_class: "vehicle_class".into(),
            helmet: "helmet".into(),
            detected_volume: "detected_volume".into(),
            timestamp: "timestamp".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryColumns {
    pub vehicle_id: String,
    pub owner: String,
    pub vehicle_class: String,
    pub registration_valid_until: String,
    pub insurance: String,
    pub puc_valid_until: String,
    pub pending_fine_amount: String,
    pub pending_fine_reason: String,
    pub road_tax: String,
}

impl Default for RegistryColumns {
    fn default() -> Self {
        Self {
            vehicle_id: "vehicle_id".into(),
            owner: "owner".into(),
            vehicle_class: "vehicle_class".into(),
            registration_valid_until: "registration_valid_until".into(),
            insurance: "insurance".into(),
            puc_valid_until: "puc_valid_until".into(),
            pending_fine_amount: "pending_fine_amount".into(),
            pending_fine_reason: "pending_fine_reason".into(),
            road_tax: "road_tax".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Thresholds + Penalties
// ---------------------------------------------------------------------------

/// Fuel-discrepancy thresholds. The absolute-liters test catches large-volume
/// fraud even at low percentage; the percentage test with an absolute floor
/// catches proportionally large fraud on small fills while ignoring noise on
/// tiny fills.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub abs_liters: f64,
    pub pct: f64,
    pub pct_floor_liters: f64,
    pub min_billed_liters: f64,
    /// Suspicious sessions at one station before the flag escalates from
    /// Suspicious to PotentialStationFault.
    pub station_fault_sessions: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            abs_liters: DEFAULT_ABS_LITERS,
            pct: DEFAULT_PCT,
            pct_floor_liters: DEFAULT_PCT_FLOOR_LITERS,
            min_billed_liters: DEFAULT_MIN_BILLED_LITERS,
            station_fault_sessions: DEFAULT_STATION_FAULT_SESSIONS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    pub registration: u32,
    pub insurance: u32,
    pub puc: u32,
    pub fine: u32,
    pub road_tax: u32,
    pub fuel_discrepancy: u32,
    pub helmet: u32,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            registration: DEFAULT_PENALTY,
            insurance: DEFAULT_PENALTY,
            puc: DEFAULT_PENALTY,
            fine: DEFAULT_PENALTY,
            road_tax: DEFAULT_PENALTY,
            fuel_discrepancy: DEFAULT_PENALTY,
            helmet: DEFAULT_HELMET_PENALTY,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let t = &self.thresholds;
        if t.abs_liters < 0.0 || t.pct < 0.0 || t.pct_floor_liters < 0.0 || t.min_billed_liters < 0.0
        {
            return Err(ReconError::ConfigValidation(
                "thresholds must be non-negative".into(),
            ));
        }
        if t.station_fault_sessions == 0 {
            return Err(ReconError::ConfigValidation(
                "station_fault_sessions must be at least 1".into(),
            ));
        }

        let p = &self.penalties;
        for (name, value) in [
            ("registration", p.registration),
            ("insurance", p.insurance),
            ("puc", p.puc),
            ("fine", p.fine),
            ("road_tax", p.road_tax),
            ("fuel_discrepancy", p.fuel_discrepancy),
            ("helmet", p.helmet),
        ] {
            if value > 100 {
                return Err(ReconError::ConfigValidation(format!(
                    "penalty '{name}' must be at most 100, got {value}"
                )));
            }
        }

        if let Some(ref emissions) = self.emissions {
            emissions.validate()?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "Daily Compliance"
as_of = "2026-02-01"

[inputs.transactions]
file = "transactions.csv"

[inputs.detections]
file = "detections.csv"

[inputs.registry]
file = "registry.csv"
"#;

    #[test]
    fn parse_minimal_uses_pinned_defaults() {
        let config = ReconConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "Daily Compliance");
        assert_eq!(config.as_of.to_string(), "2026-02-01");
        assert_eq!(config.thresholds.abs_liters, 5.0);
        assert_eq!(config.thresholds.pct, 10.0);
        assert_eq!(config.thresholds.station_fault_sessions, 3);
        assert_eq!(config.penalties.registration, 20);
        assert_eq!(config.penalties.fuel_discrepancy, 20);
        assert_eq!(config.penalties.helmet, 0, "helmet is informational by default");
        assert!(config.emissions.is_none());
        assert_eq!(config.inputs.transactions.columns.vehicle_id, "vehicle_id");
    }

    #[test]
    fn parse_column_mapping_override() {
        let input = format!(
            r#"{MINIMAL}
[inputs.transactions.columns]
vehicle_id = "vehicle_no"
billed_volume = "fuel_litres"
"#
        );
        let config = ReconConfig::from_toml(&input).unwrap();
        let cols = &config.inputs.transactions.columns;
        assert_eq!(cols.vehicle_id, "vehicle_no");
        assert_eq!(cols.billed_volume, "fuel_litres");
        // Unmentioned columns keep canonical names
        assert_eq!(cols.amount, "amount");
    }

    #[test]
    fn parse_penalty_variant_override() {
        // The -10 discrepancy / -15 helmet variant is reachable by config
        let input = format!(
            r#"{MINIMAL}
[penalties]
fuel_discrepancy = 10
helmet = 15
"#
        );
        let config = ReconConfig::from_toml(&input).unwrap();
        assert_eq!(config.penalties.fuel_discrepancy, 10);
        assert_eq!(config.penalties.helmet, 15);
        assert_eq!(config.penalties.registration, 20);
    }

    #[test]
    fn reject_penalty_over_100() {
        let input = format!(
            r#"{MINIMAL}
[penalties]
fine = 120
"#
        );
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("'fine'"));
    }

    #[test]
    fn reject_negative_threshold() {
        let input = format!(
            r#"{MINIMAL}
[thresholds]
abs_liters = -1.0
"#
        );
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn reject_zero_station_sessions() {
        let input = format!(
            r#"{MINIMAL}
[thresholds]
station_fault_sessions = 0
"#
        );
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("station_fault_sessions"));
    }

    #[test]
    fn reject_bad_as_of() {
        let input = MINIMAL.replace("2026-02-01", "not-a-date");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
