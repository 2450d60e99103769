use std::collections::HashMap;

use crate::model::{ComplianceRecord, DiscrepancyFlag, FleetSummary};

/// Compute fleet-wide statistics from the scored records.
pub fn compute_summary(records: &[ComplianceRecord]) -> FleetSummary {
    let mut fueling_ok = 0;
    let mut suspicious = 0;
    let mut station_faults = 0;
    let mut fully_compliant = 0;
    let mut score_sum: u64 = 0;
    let mut violation_counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        match record.fueling.flag {
            DiscrepancyFlag::Ok => fueling_ok += 1,
            DiscrepancyFlag::Suspicious => suspicious += 1,
            DiscrepancyFlag::PotentialStationFault => station_faults += 1,
        }

        if record.compliance.violations.is_empty() {
            fully_compliant += 1;
        }
        score_sum += u64::from(record.compliance.score);

        for reason in &record.compliance.violations {
            *violation_counts.entry(reason.clone()).or_insert(0) += 1;
        }
    }

    let average_score = if records.is_empty() {
        0.0
    } else {
        score_sum as f64 / records.len() as f64
    };

    FleetSummary {
        total_records: records.len(),
        fueling_ok,
        suspicious,
        station_faults,
        fully_compliant,
        average_score,
        violation_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use chrono::NaiveDate;

    fn record(flag: DiscrepancyFlag, score: u32, violations: Vec<&str>) -> ComplianceRecord {
        ComplianceRecord {
            vehicle_id: "KA01AB0001".into(),
            timestamp: "2026-01-15T09:00:00".into(),
            station_id: "FS-01".into(),
            vehicle_class: VehicleClass::FourWheeler,
            helmet: HelmetStatus::Unknown,
            registry: RegistryRecord {
                owner: "Test".into(),
                vehicle_class: VehicleClass::FourWheeler,
                registration_valid_until: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
                insurance: InsuranceStatus::Active,
                puc_valid_until: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
                pending_fine_amount: 0.0,
                pending_fine_reason: String::new(),
                road_tax: RoadTaxStatus::Paid,
            },
            amount: 1000.0,
            fueling: FuelingResult {
                billed: 10.0,
                detected: 10.0,
                difference: 0.0,
                flag,
            },
            compliance: Assessment {
                score,
                violations: violations.into_iter().map(String::from).collect(),
                statuses: FieldStatuses {
                    registration: "Valid".into(),
                    insurance: "Active".into(),
                    puc: "Valid".into(),
                    fine: "Clear".into(),
                    road_tax: "Paid".into(),
                },
            },
        }
    }

    #[test]
    fn summary_counts() {
        let records = vec![
            record(DiscrepancyFlag::Ok, 100, vec![]),
            record(DiscrepancyFlag::Suspicious, 80, vec!["Fueling Discrepancy"]),
            record(
                DiscrepancyFlag::PotentialStationFault,
                60,
                vec!["Fueling Discrepancy", "Tax Due"],
            ),
        ];
        let summary = compute_summary(&records);
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.fueling_ok, 1);
        assert_eq!(summary.suspicious, 1);
        assert_eq!(summary.station_faults, 1);
        assert_eq!(summary.fully_compliant, 1);
        assert_eq!(summary.average_score, 80.0);
        assert_eq!(summary.violation_counts["Fueling Discrepancy"], 2);
        assert_eq!(summary.violation_counts["Tax Due"], 1);
    }

    #[test]
    fn empty_input_yields_zero_average() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.violation_counts.is_empty());
    }
}
