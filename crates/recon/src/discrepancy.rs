use std::collections::HashMap;

use crate::config::ThresholdConfig;
use crate::model::{DiscrepancyFlag, FuelingResult};

/// One transaction's fueling numbers, ready for classification.
/// `detected` is None when no detection matched the transaction or the
/// matching detection carried no volume.
#[derive(Debug, Clone)]
pub struct FuelReading {
    pub station_id: String,
    pub billed: f64,
    pub detected: Option<f64>,
}

/// Two-pass fuel-discrepancy classifier.
///
/// Pass 1 marks each reading suspicious or not and counts suspicious sessions
/// per station. Pass 2 assigns flags: a suspicious reading at a station with
/// `station_fault_sessions` or more suspicious sessions (across all vehicles)
/// escalates to PotentialStationFault; otherwise it stays Suspicious.
///
/// The station counter is per transaction, not deduplicated per vehicle: a
/// single vehicle with repeated suspicious fills at one station will itself
/// drive that station over the threshold.
pub fn classify_fueling(
    readings: &[FuelReading],
    thresholds: &ThresholdConfig,
) -> Vec<FuelingResult> {
    // Pass 1: per-transaction suspicion test + per-station session counts.
    let mut suspicious = vec![false; readings.len()];
    let mut station_sessions: HashMap<&str, u32> = HashMap::new();

    for (i, reading) in readings.iter().enumerate() {
        let Some(detected) = reading.detected else {
            continue;
        };
        if is_suspicious(reading.billed, detected, thresholds) {
            suspicious[i] = true;
            *station_sessions.entry(reading.station_id.as_str()).or_insert(0) += 1;
        }
    }

    // Pass 2: flag assignment.
    readings
        .iter()
        .zip(&suspicious)
        .map(|(reading, &is_susp)| {
            let detected = reading.detected.unwrap_or(reading.billed);
            let flag = if !is_susp {
                DiscrepancyFlag::Ok
            } else if station_sessions.get(reading.station_id.as_str()).copied().unwrap_or(0)
                >= thresholds.station_fault_sessions
            {
                DiscrepancyFlag::PotentialStationFault
            } else {
                DiscrepancyFlag::Suspicious
            };

            FuelingResult {
                billed: reading.billed,
                detected,
                difference: reading.billed - detected,
                flag,
            }
        })
        .collect()
}

fn is_suspicious(billed: f64, detected: f64, thresholds: &ThresholdConfig) -> bool {
    let abs_diff = (billed - detected).abs();
    let pct = if billed > thresholds.min_billed_liters {
        abs_diff / billed * 100.0
    } else {
        0.0
    };
    abs_diff > thresholds.abs_liters
        || (pct > thresholds.pct && abs_diff > thresholds.pct_floor_liters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(station: &str, billed: f64, detected: Option<f64>) -> FuelReading {
        FuelReading {
            station_id: station.into(),
            billed,
            detected,
        }
    }

    fn classify(readings: &[FuelReading]) -> Vec<FuelingResult> {
        classify_fueling(readings, &ThresholdConfig::default())
    }

    #[test]
    fn clean_fill_is_ok() {
        let out = classify(&[reading("FS-01", 20.0, Some(19.5))]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Ok);
        assert_eq!(out[0].difference, 0.5);
    }

    #[test]
    fn absolute_threshold_boundary() {
        // absDiff = 5.1 > 5.0 → suspicious via the absolute rule
        let out = classify(&[reading("FS-01", 20.0, Some(14.9))]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Suspicious);

        // absDiff = 5.0 is not > 5.0, but pct = 25% > 10% with absDiff > 1.0
        // → still suspicious via the percentage rule
        let out = classify(&[reading("FS-01", 20.0, Some(15.0))]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Suspicious);
    }

    #[test]
    fn percentage_rule_needs_absolute_floor() {
        // 0.5 L short on a 2 L fill is 25% but under the 1.0 L floor → noise
        let out = classify(&[reading("FS-01", 2.0, Some(1.5))]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Ok);
    }

    #[test]
    fn near_zero_billed_guard() {
        // billed ≤ 0.1 → pct forced to 0; absDiff 0.09 under both rules
        let out = classify(&[reading("FS-01", 0.1, Some(0.01))]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Ok);
    }

    #[test]
    fn missing_detection_defaults_to_billed() {
        let out = classify(&[reading("FS-01", 20.0, None)]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Ok);
        assert_eq!(out[0].detected, 20.0);
        assert_eq!(out[0].difference, 0.0);
    }

    #[test]
    fn two_suspicious_sessions_stay_isolated() {
        let out = classify(&[
            reading("FS-01", 20.0, Some(13.0)),
            reading("FS-01", 20.0, Some(13.0)),
        ]);
        assert!(out.iter().all(|r| r.flag == DiscrepancyFlag::Suspicious));
    }

    #[test]
    fn three_suspicious_sessions_escalate_station() {
        let out = classify(&[
            reading("FS-01", 20.0, Some(13.0)),
            reading("FS-01", 20.0, Some(13.0)),
            reading("FS-01", 20.0, Some(13.0)),
        ]);
        assert!(out
            .iter()
            .all(|r| r.flag == DiscrepancyFlag::PotentialStationFault));
    }

    #[test]
    fn escalation_is_per_station() {
        let out = classify(&[
            reading("FS-01", 20.0, Some(13.0)),
            reading("FS-01", 20.0, Some(13.0)),
            reading("FS-01", 20.0, Some(13.0)),
            reading("FS-02", 20.0, Some(13.0)),
        ]);
        assert_eq!(out[0].flag, DiscrepancyFlag::PotentialStationFault);
        assert_eq!(out[3].flag, DiscrepancyFlag::Suspicious);
    }

    #[test]
    fn ok_sessions_do_not_feed_station_counter() {
        let out = classify(&[
            reading("FS-01", 20.0, Some(19.9)),
            reading("FS-01", 20.0, Some(19.9)),
            reading("FS-01", 20.0, Some(13.0)),
        ]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Ok);
        assert_eq!(out[1].flag, DiscrepancyFlag::Ok);
        assert_eq!(out[2].flag, DiscrepancyFlag::Suspicious);
    }

    #[test]
    fn surplus_dispensed_also_flags() {
        // detected > billed flags too: |diff| is what matters
        let out = classify(&[reading("FS-01", 10.0, Some(16.0))]);
        assert_eq!(out[0].flag, DiscrepancyFlag::Suspicious);
        assert_eq!(out[0].difference, -6.0);
    }
}
