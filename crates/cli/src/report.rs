//! Flat CSV report, one row per compliance record, for spreadsheet drill-down.

use std::path::Path;

use fleetlens_recon::model::ComplianceRecord;

const HEADERS: [&str; 16] = [
    "vehicle_id", "timestamp", "station_id", "vehicle_class", "helmet", "owner",
    "amount", "billed", "detected", "difference", "flag",
    "score", "violations",
    "registration", "insurance", "road_tax",
];

pub fn write_csv_report(records: &[ComplianceRecord], path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for record in records {
        writer.write_record(flatten(record))?;
    }
    writer.flush()?;
    Ok(())
}

fn flatten(record: &ComplianceRecord) -> Vec<String> {
    vec![
        record.vehicle_id.clone(),
        record.timestamp.clone(),
        record.station_id.clone(),
        record.vehicle_class.to_string(),
        record.helmet.to_string(),
        record.registry.owner.clone(),
        record.amount.to_string(),
        record.fueling.billed.to_string(),
        record.fueling.detected.to_string(),
        record.fueling.difference.to_string(),
        record.fueling.flag.to_string(),
        record.compliance.score.to_string(),
        record.compliance.violations.join("; "),
        record.compliance.statuses.registration.clone(),
        record.compliance.statuses.insurance.clone(),
        record.compliance.statuses.road_tax.clone(),
    ]
}
