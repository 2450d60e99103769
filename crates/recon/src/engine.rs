use std::collections::HashMap;

use crate::config::ReconConfig;
use crate::discrepancy::{classify_fueling, FuelReading};
use crate::model::{
    ComplianceRecord, Detection, HelmetStatus, ReconInput, ReconMeta, ReconResult,
};
use crate::score::score;
use crate::summary::compute_summary;

/// Run the full pipeline: join transactions to detections by vehicle id,
/// classify fuel discrepancies in two passes, then score every transaction
/// against the registry.
///
/// Pure and synchronous: no I/O, no clock reads beyond the run timestamp in
/// the metadata. One output record per input transaction, in input order.
/// Missing join targets and unknown vehicles are handled states, not errors,
/// so this never fails.
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconResult {
    // Index detections by vehicle id. First occurrence wins; no time-window
    // correlation is performed.
    let mut by_vehicle: HashMap<&str, &Detection> = HashMap::new();
    for detection in &input.detections {
        by_vehicle.entry(detection.vehicle_id.as_str()).or_insert(detection);
    }

    let readings: Vec<FuelReading> = input
        .transactions
        .iter()
        .map(|txn| FuelReading {
            station_id: txn.station_id.clone(),
            billed: txn.billed_volume,
            detected: by_vehicle
                .get(txn.vehicle_id.as_str())
                .and_then(|d| d.detected_volume),
        })
        .collect();

    let fueling = classify_fueling(&readings, &config.thresholds);

    let records: Vec<ComplianceRecord> = input
        .transactions
        .iter()
        .zip(fueling)
        .map(|(txn, fueling)| {
            let registry = input.registry.lookup(&txn.vehicle_id).clone();
            let detection = by_vehicle.get(txn.vehicle_id.as_str());

            // Detection attributes win when present; otherwise fall back to
            // the registry class with helmet unknown.
            let vehicle_class = detection
                .map(|d| d.vehicle_class)
                .unwrap_or(registry.vehicle_class);
            let helmet = detection.map(|d| d.helmet).unwrap_or(HelmetStatus::Unknown);

            let compliance = score(
                &registry,
                fueling.flag,
                vehicle_class,
                helmet,
                &config.penalties,
                config.as_of,
            );

            ComplianceRecord {
                vehicle_id: txn.vehicle_id.clone(),
                timestamp: txn.timestamp.clone(),
                station_id: txn.station_id.clone(),
                vehicle_class,
                helmet,
                registry,
                amount: txn.amount,
                fueling,
                compliance,
            }
        })
        .collect();

    let summary = compute_summary(&records);
    let emissions = config
        .emissions
        .as_ref()
        .map(|e| crate::emissions::build_rollup(&records, e));

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            as_of: config.as_of,
        },
        summary,
        records,
        emissions,
    }
}
