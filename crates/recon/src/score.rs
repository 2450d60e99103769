use chrono::NaiveDate;

use crate::config::PenaltyConfig;
use crate::model::{
    Assessment, DiscrepancyFlag, FieldStatuses, HelmetStatus, InsuranceStatus, RegistryRecord,
    RoadTaxStatus, VehicleClass,
};

/// Score one vehicle: 100 minus a fixed penalty per triggered rule, floored
/// at 0. Rules run in fixed order; the order only matters for the reason
/// list, which golden outputs pin.
///
/// Total over its input domain: every absence has a defined fallback (the
/// registry sentinel), so there is no error path. Re-running on unchanged
/// inputs yields a bit-identical assessment.
pub fn score(
    record: &RegistryRecord,
    flag: DiscrepancyFlag,
    vehicle_class: VehicleClass,
    helmet: HelmetStatus,
    penalties: &PenaltyConfig,
    as_of: NaiveDate,
) -> Assessment {
    // One set of underlying booleans drives both the violation list and the
    // per-field statuses, so the two can never disagree.
    let registration_expired = record.registration_valid_until <= as_of;
    let insurance_expired = record.insurance != InsuranceStatus::Active;
    let puc_expired = record.puc_valid_until <= as_of;
    let fine_pending = record.pending_fine_amount > 0.0;
    let tax_due = record.road_tax != RoadTaxStatus::Paid;
    let fuel_discrepancy = flag != DiscrepancyFlag::Ok;
    let no_helmet = vehicle_class == VehicleClass::TwoWheeler && helmet == HelmetStatus::NotWorn;

    let mut deducted: u32 = 0;
    let mut violations = Vec::new();

    if registration_expired {
        deducted += penalties.registration;
        violations.push("Registration Expired".to_string());
    }
    if insurance_expired {
        deducted += penalties.insurance;
        violations.push("Insurance Expired".to_string());
    }
    if puc_expired {
        deducted += penalties.puc;
        violations.push("PUC Expired".to_string());
    }
    if fine_pending {
        deducted += penalties.fine;
        violations.push(format!(
            "Fine Pending: {} ({})",
            record.pending_fine_amount, record.pending_fine_reason
        ));
    }
    if tax_due {
        deducted += penalties.road_tax;
        violations.push("Tax Due".to_string());
    }
    if fuel_discrepancy {
        deducted += penalties.fuel_discrepancy;
        violations.push("Fueling Discrepancy".to_string());
    }
    if no_helmet {
        // Listed but unscored under the default penalty table.
        deducted += penalties.helmet;
        violations.push("No Helmet".to_string());
    }

    Assessment {
        score: 100u32.saturating_sub(deducted),
        violations,
        statuses: FieldStatuses {
            registration: status(registration_expired, "Valid", "Expired"),
            insurance: status(insurance_expired, "Active", "Expired"),
            puc: status(puc_expired, "Valid", "Expired"),
            fine: status(fine_pending, "Clear", "Pending"),
            road_tax: status(tax_due, "Paid", "Due"),
        },
    }
}

fn status(triggered: bool, ok: &str, bad: &str) -> String {
    if triggered { bad.into() } else { ok.into() }
}
