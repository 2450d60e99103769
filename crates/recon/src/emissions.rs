//! Derived emissions rollup, a computed analysis layered on top of the
//! compliance records, produced only when the run config asks for it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{ComplianceRecord, VehicleClass};

/// kg CO2 per liter of fuel burned.
pub const PETROL_KG_CO2_PER_LITER: f64 = 2.3477;
pub const DIESEL_KG_CO2_PER_LITER: f64 = 2.6893;

/// Base year for the projection growth curve.
pub const EMISSIONS_BASE_YEAR: i32 = 2025;
/// Assumed annual fleet growth for projections (+0.5%/year).
pub const ANNUAL_GROWTH_RATE: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
}

impl FuelType {
    pub fn kg_co2_per_liter(self) -> f64 {
        match self {
            Self::Petrol => PETROL_KG_CO2_PER_LITER,
            Self::Diesel => DIESEL_KG_CO2_PER_LITER,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct EmissionsConfig {
    /// Year the projection targets. Never earlier than the base year.
    pub projection_year: i32,
    #[serde(default)]
    pub fuel: FuelAssignments,
}

/// Fuel type assumed per vehicle class. Two-wheelers default to petrol,
/// everything else to diesel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FuelAssignments {
    pub two_wheeler: FuelType,
    pub four_wheeler: FuelType,
    pub truck: FuelType,
    pub other: FuelType,
}

impl Default for FuelAssignments {
    fn default() -> Self {
        Self {
            two_wheeler: FuelType::Petrol,
            four_wheeler: FuelType::Diesel,
            truck: FuelType::Diesel,
            other: FuelType::Diesel,
        }
    }
}

impl FuelAssignments {
    pub fn for_class(&self, class: VehicleClass) -> FuelType {
        match class {
            VehicleClass::TwoWheeler => self.two_wheeler,
            VehicleClass::FourWheeler => self.four_wheeler,
            VehicleClass::Truck => self.truck,
            VehicleClass::Other => self.other,
        }
    }
}

impl EmissionsConfig {
    pub fn validate(&self) -> Result<(), ReconError> {
        if self.projection_year < EMISSIONS_BASE_YEAR {
            return Err(ReconError::ConfigValidation(format!(
                "emissions projection_year must be {EMISSIONS_BASE_YEAR} or later, got {}",
                self.projection_year
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct EmissionsRow {
    pub vehicle_class: VehicleClass,
    pub fuel_type: FuelType,
    pub total_liters: f64,
    pub co2_kg: f64,
    pub co2_tons: f64,
    pub percent_of_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmissionsRollup {
    pub rows: Vec<EmissionsRow>,
    pub total_co2_tons: f64,
    pub projection_year: i32,
    pub projected_co2_tons: f64,
}

/// Roll up billed fuel volumes by vehicle class into CO2 estimates, with a
/// simple compound-growth projection to the configured year.
pub fn build_rollup(records: &[ComplianceRecord], config: &EmissionsConfig) -> EmissionsRollup {
    let mut liters_by_class: BTreeMap<VehicleClass, f64> = BTreeMap::new();
    for record in records {
        *liters_by_class.entry(record.vehicle_class).or_insert(0.0) += record.fueling.billed;
    }

    let mut rows: Vec<EmissionsRow> = liters_by_class
        .into_iter()
        .map(|(vehicle_class, total_liters)| {
            let fuel_type = config.fuel.for_class(vehicle_class);
            let co2_kg = total_liters * fuel_type.kg_co2_per_liter();
            EmissionsRow {
                vehicle_class,
                fuel_type,
                total_liters,
                co2_kg,
                co2_tons: co2_kg / 1000.0,
                percent_of_total: 0.0,
            }
        })
        .collect();

    let total_co2_tons: f64 = rows.iter().map(|r| r.co2_tons).sum();
    if total_co2_tons > 0.0 {
        for row in &mut rows {
            row.percent_of_total = row.co2_tons / total_co2_tons * 100.0;
        }
    }

    let years_ahead = (config.projection_year - EMISSIONS_BASE_YEAR).max(0);
    let projected_co2_tons = total_co2_tons * (1.0 + ANNUAL_GROWTH_RATE).powi(years_ahead);

    EmissionsRollup {
        rows,
        total_co2_tons,
        projection_year: config.projection_year,
        projected_co2_tons,
    }
}
