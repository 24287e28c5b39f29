pub mod domain;
pub mod export;
mod generator;
pub mod store;

pub use domain::{
    AdmissionStatus, BloodPressure, Department, Disposition, Gender, NewPatient, Patient,
    RiskAssessment, RiskFactors, RiskLevel, Vitals,
};
pub use export::{ExportError, PatientRow};
pub use generator::PatientGenerator;
pub use store::{PopulationStore, StoreError};
