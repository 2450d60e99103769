//! CSV ingest boundary. Malformed numerics, dates and enums fail fast here
//! with the offending source, record and value named; the engine itself never
//! sees a malformed record.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::{DetectionColumns, RegistryColumns, TransactionColumns};
use crate::error::ReconError;
use crate::model::{
    Detection, HelmetStatus, InsuranceStatus, RegistryRecord, RoadTaxStatus, Transaction,
    VehicleClass,
};
use crate::registry::VehicleRegistry;

pub fn load_transactions(
    csv_data: &str,
    columns: &TransactionColumns,
) -> Result<Vec<Transaction>, ReconError> {
    let source = "transactions";
    let mut reader = reader(csv_data);
    let headers = headers(&mut reader)?;

    let vehicle_id_idx = index_of(&headers, source, &columns.vehicle_id)?;
    let timestamp_idx = index_of(&headers, source, &columns.timestamp)?;
    let billed_idx = index_of(&headers, source, &columns.billed_volume)?;
    let amount_idx = index_of(&headers, source, &columns.amount)?;
    let station_idx = index_of(&headers, source, &columns.station_id)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let vehicle_id = field(&record, vehicle_id_idx);

        rows.push(Transaction {
            billed_volume: parse_f64(source, &vehicle_id, field(&record, billed_idx))?,
            amount: parse_f64(source, &vehicle_id, field(&record, amount_idx))?,
            timestamp: field(&record, timestamp_idx),
            station_id: field(&record, station_idx),
            vehicle_id,
        });
    }
    Ok(rows)
}

pub fn load_detections(
    csv_data: &str,
    columns: &DetectionColumns,
) -> Result<Vec<Detection>, ReconError> {
    let source = "detections";
    let mut reader = reader(csv_data);
    let headers = headers(&mut reader)?;

    let vehicle_id_idx = index_of(&headers, source, &columns.vehicle_id)?;
    let class_idx = index_of(&headers, source, &columns.vehicle_class)?;
    let helmet_idx = index_of(&headers, source, &columns.helmet)?;
    let volume_idx = index_of(&headers, source, &columns.detected_volume)?;
    let timestamp_idx = index_of(&headers, source, &columns.timestamp)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let vehicle_id = field(&record, vehicle_id_idx);

        let volume_raw = field(&record, volume_idx);
        let detected_volume = if volume_raw.is_empty() {
            None
        } else {
            Some(parse_f64(source, &vehicle_id, volume_raw)?)
        };

        rows.push(Detection {
            vehicle_class: parse_vehicle_class(&field(&record, class_idx)),
            helmet: parse_helmet(&field(&record, helmet_idx)),
            detected_volume,
            timestamp: field(&record, timestamp_idx),
            vehicle_id,
        });
    }
    Ok(rows)
}

pub fn load_registry(
    csv_data: &str,
    columns: &RegistryColumns,
) -> Result<VehicleRegistry, ReconError> {
    let source = "registry";
    let mut reader = reader(csv_data);
    let headers = headers(&mut reader)?;

    let vehicle_id_idx = index_of(&headers, source, &columns.vehicle_id)?;
    let owner_idx = index_of(&headers, source, &columns.owner)?;
    let class_idx = index_of(&headers, source, &columns.vehicle_class)?;
    let reg_until_idx = index_of(&headers, source, &columns.registration_valid_until)?;
    let insurance_idx = index_of(&headers, source, &columns.insurance)?;
    let puc_until_idx = index_of(&headers, source, &columns.puc_valid_until)?;
    let fine_amount_idx = index_of(&headers, source, &columns.pending_fine_amount)?;
    let fine_reason_idx = index_of(&headers, source, &columns.pending_fine_reason)?;
    let road_tax_idx = index_of(&headers, source, &columns.road_tax)?;

    let mut records: HashMap<String, RegistryRecord> = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let vehicle_id = field(&record, vehicle_id_idx);

        let entry = RegistryRecord {
            owner: field(&record, owner_idx),
            vehicle_class: parse_vehicle_class(&field(&record, class_idx)),
            registration_valid_until: parse_date(source, &vehicle_id, field(&record, reg_until_idx))?,
            insurance: parse_insurance(source, &vehicle_id, field(&record, insurance_idx))?,
            puc_valid_until: parse_date(source, &vehicle_id, field(&record, puc_until_idx))?,
            pending_fine_amount: parse_f64(source, &vehicle_id, field(&record, fine_amount_idx))?,
            pending_fine_reason: field(&record, fine_reason_idx),
            road_tax: parse_road_tax(source, &vehicle_id, field(&record, road_tax_idx))?,
        };
        records.insert(vehicle_id, entry);
    }
    Ok(VehicleRegistry::new(records))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn reader(csv_data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes())
}

fn headers(reader: &mut csv::Reader<&[u8]>) -> Result<Vec<String>, ReconError> {
    Ok(reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect())
}

fn index_of(headers: &[String], source: &str, name: &str) -> Result<usize, ReconError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ReconError::MissingColumn {
            source: source.into(),
            column: name.into(),
        })
}

fn field(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}

fn parse_f64(source: &str, record_id: &str, value: String) -> Result<f64, ReconError> {
    value.parse().map_err(|_| ReconError::NumberParse {
        source: source.into(),
        record_id: record_id.into(),
        value,
    })
}

fn parse_date(source: &str, record_id: &str, value: String) -> Result<NaiveDate, ReconError> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| ReconError::DateParse {
        source: source.into(),
        record_id: record_id.into(),
        value,
    })
}

/// Detector class labels are external and best-effort: anything unrecognized
/// maps to Other rather than failing the whole ingest.
fn parse_vehicle_class(value: &str) -> VehicleClass {
    match value.to_ascii_lowercase().replace('-', "_").as_str() {
        "two_wheeler" | "2w" | "bike" | "motorcycle" => VehicleClass::TwoWheeler,
        "four_wheeler" | "4w" | "car" => VehicleClass::FourWheeler,
        "truck" | "lorry" | "hgv" => VehicleClass::Truck,
        _ => VehicleClass::Other,
    }
}

/// Helmet is tri-state; an empty or unrecognized value is Unknown, not false.
fn parse_helmet(value: &str) -> HelmetStatus {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "worn" => HelmetStatus::Worn,
        "false" | "no" | "not_worn" => HelmetStatus::NotWorn,
        _ => HelmetStatus::Unknown,
    }
}

fn parse_insurance(
    source: &str,
    record_id: &str,
    value: String,
) -> Result<InsuranceStatus, ReconError> {
    match value.to_ascii_lowercase().as_str() {
        "active" => Ok(InsuranceStatus::Active),
        "expired" => Ok(InsuranceStatus::Expired),
        _ => Err(ReconError::EnumParse {
            source: source.into(),
            record_id: record_id.into(),
            value,
        }),
    }
}

fn parse_road_tax(
    source: &str,
    record_id: &str,
    value: String,
) -> Result<RoadTaxStatus, ReconError> {
    match value.to_ascii_lowercase().as_str() {
        "paid" => Ok(RoadTaxStatus::Paid),
        "due" => Ok(RoadTaxStatus::Due),
        _ => Err(ReconError::EnumParse {
            source: source.into(),
            record_id: record_id.into(),
            value,
        }),
    }
}
