use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{InsuranceStatus, RegistryRecord, RoadTaxStatus, VehicleClass};

/// Vehicle registry: maps a vehicle identifier to its regulatory record.
///
/// Lookup is total: an identifier with no entry resolves to a fixed sentinel
/// record representing "unknown/non-compliant" (all statuses expired/due, zero
/// fine). Absence is valid, handled data, not a failure.
#[derive(Debug, Clone)]
pub struct VehicleRegistry {
    records: HashMap<String, RegistryRecord>,
    sentinel: RegistryRecord,
}

impl VehicleRegistry {
    pub fn new(records: HashMap<String, RegistryRecord>) -> Self {
        Self {
            records,
            sentinel: sentinel_record(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = (String, RegistryRecord)>) -> Self {
        Self::new(records.into_iter().collect())
    }

    pub fn lookup(&self, vehicle_id: &str) -> &RegistryRecord {
        self.records.get(vehicle_id).unwrap_or(&self.sentinel)
    }

    pub fn contains(&self, vehicle_id: &str) -> bool {
        self.records.contains_key(vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The sentinel for unknown identifiers: registration and PUC expired on any
/// as_of date, insurance expired, road tax due, no pending fine.
fn sentinel_record() -> RegistryRecord {
    RegistryRecord {
        owner: "Unknown".into(),
        vehicle_class: VehicleClass::Other,
        registration_valid_until: NaiveDate::MIN,
        insurance: InsuranceStatus::Expired,
        puc_valid_until: NaiveDate::MIN,
        pending_fine_amount: 0.0,
        pending_fine_reason: String::new(),
        road_tax: RoadTaxStatus::Due,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str) -> RegistryRecord {
        RegistryRecord {
            owner: owner.into(),
            vehicle_class: VehicleClass::FourWheeler,
            registration_valid_until: NaiveDate::from_ymd_opt(2027, 3, 30).unwrap(),
            insurance: InsuranceStatus::Active,
            puc_valid_until: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            pending_fine_amount: 0.0,
            pending_fine_reason: String::new(),
            road_tax: RoadTaxStatus::Paid,
        }
    }

    #[test]
    fn known_vehicle_resolves() {
        let registry =
            VehicleRegistry::from_records([("KA01AB0001".to_string(), record("Asha"))]);
        assert_eq!(registry.lookup("KA01AB0001").owner, "Asha");
        assert!(registry.contains("KA01AB0001"));
    }

    #[test]
    fn unknown_vehicle_resolves_to_sentinel() {
        let registry = VehicleRegistry::from_records([]);
        let rec = registry.lookup("ZZ99XX9999");
        assert_eq!(rec.owner, "Unknown");
        assert_eq!(rec.insurance, InsuranceStatus::Expired);
        assert_eq!(rec.road_tax, RoadTaxStatus::Due);
        assert_eq!(rec.pending_fine_amount, 0.0);
        // Expired against any plausible as_of
        assert!(rec.registration_valid_until <= NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        assert!(!registry.contains("ZZ99XX9999"));
    }
}
