use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One fuel-purchase event from the station transaction log.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub vehicle_id: String,
    /// ISO-8601 timestamp, kept verbatim. Together with `vehicle_id` it forms
    /// the display identity of the resulting compliance record.
    pub timestamp: String,
    /// Liters as billed by the station. Non-negative.
    pub billed_volume: f64,
    /// Billed amount in raw currency units. Formatting is a caller concern.
    pub amount: f64,
    pub station_id: String,
}

/// One vision-derived observation of a vehicle. May not match any transaction.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub vehicle_id: String,
    pub vehicle_class: VehicleClass,
    pub helmet: HelmetStatus,
    /// Liters observed at the pump. Absent for non-fueling contexts
    /// (e.g. live camera frames).
    pub detected_volume: Option<f64>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    TwoWheeler,
    FourWheeler,
    Truck,
    Other,
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoWheeler => write!(f, "two_wheeler"),
            Self::FourWheeler => write!(f, "four_wheeler"),
            Self::Truck => write!(f, "truck"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Tri-state helmet observation. Only meaningful for two-wheelers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelmetStatus {
    Worn,
    NotWorn,
    Unknown,
}

impl std::fmt::Display for HelmetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Worn => write!(f, "worn"),
            Self::NotWorn => write!(f, "not_worn"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Regulatory record for one vehicle identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryRecord {
    pub owner: String,
    pub vehicle_class: VehicleClass,
    pub registration_valid_until: NaiveDate,
    pub insurance: InsuranceStatus,
    pub puc_valid_until: NaiveDate,
    pub pending_fine_amount: f64,
    pub pending_fine_reason: String,
    pub road_tax: RoadTaxStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceStatus {
    Active,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadTaxStatus {
    Paid,
    Due,
}

/// Pre-loaded engine input. The registry is injected, never a compile-time
/// constant, so production and test configurations swap cleanly.
pub struct ReconInput {
    pub transactions: Vec<Transaction>,
    pub detections: Vec<Detection>,
    pub registry: crate::registry::VehicleRegistry,
}

// ---------------------------------------------------------------------------
// Fueling discrepancy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyFlag {
    Ok,
    /// Isolated billed-vs-detected gap on one transaction.
    Suspicious,
    /// Systemic pattern: the station accumulated enough suspicious sessions
    /// to suggest a miscalibrated or fraudulent pump rather than one bad actor.
    PotentialStationFault,
}

impl std::fmt::Display for DiscrepancyFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Suspicious => write!(f, "suspicious"),
            Self::PotentialStationFault => write!(f, "potential_station_fault"),
        }
    }
}

/// Billed-vs-detected comparison for one transaction.
/// When no detection reported a volume, `detected` defaults to `billed`
/// (no discrepancy can be asserted without a detection).
#[derive(Debug, Clone, Serialize)]
pub struct FuelingResult {
    pub billed: f64,
    pub detected: f64,
    /// billed - detected.
    pub difference: f64,
    pub flag: DiscrepancyFlag,
}

// ---------------------------------------------------------------------------
// Compliance assessment
// ---------------------------------------------------------------------------

/// Per-field status strings. Derived from the same booleans as the violation
/// list so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStatuses {
    /// "Valid" | "Expired"
    pub registration: String,
    /// "Active" | "Expired"
    pub insurance: String,
    /// "Valid" | "Expired"
    pub puc: String,
    /// "Clear" | "Pending"
    pub fine: String,
    /// "Paid" | "Due"
    pub road_tax: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// 0 to 100, floored at 0 when stacked penalties would exceed 100.
    pub score: u32,
    /// Human-readable reasons in fixed rule order.
    pub violations: Vec<String>,
    pub statuses: FieldStatuses,
}

/// The output entity: one scored, flagged transaction.
///
/// Immutable once computed. A "refresh" or what-if recomputation must produce
/// a new record through the scorer, never patch fields in place.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceRecord {
    pub vehicle_id: String,
    pub timestamp: String,
    pub station_id: String,
    pub vehicle_class: VehicleClass,
    pub helmet: HelmetStatus,
    pub registry: RegistryRecord,
    pub amount: f64,
    pub fueling: FuelingResult,
    pub compliance: Assessment,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary {
    pub total_records: usize,
    pub fueling_ok: usize,
    pub suspicious: usize,
    pub station_faults: usize,
    /// Records with score 100 and an empty violation list.
    pub fully_compliant: usize,
    pub average_score: f64,
    pub violation_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    /// The "now" all date rules were evaluated against.
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: FleetSummary,
    /// One record per input transaction, in input order.
    pub records: Vec<ComplianceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissions: Option<crate::emissions::EmissionsRollup>,
}
