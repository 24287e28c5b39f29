//! Simulated hospital census: synthetic patients, heuristic risk scoring, and
//! population analytics over a JSON snapshot.

pub mod analytics;
pub mod census;
pub mod clock;
pub mod config;
pub mod error;
pub mod patients;
pub mod risk;
pub mod telemetry;

pub use census::{Census, CensusError, CensusSettings, StandardCensus};
