//! Fleet fuel-compliance reconciliation and scoring engine.
//!
//! Pure engine crate: receives pre-loaded transactions, detections and a
//! vehicle registry, returns scored + flagged compliance records.
//! No CLI dependencies; CSV/TOML parsing lives at the ingest boundary.

pub mod config;
pub mod discrepancy;
pub mod emissions;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod model;
pub mod registry;
pub mod score;
pub mod summary;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{ComplianceRecord, ReconInput, ReconResult};
pub use registry::VehicleRegistry;
