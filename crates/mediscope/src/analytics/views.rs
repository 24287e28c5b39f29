use crate::patients::domain::{Department, RiskLevel};
use crate::patients::export::PatientRow;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyEntry {
    pub department: Department,
    pub occupied: usize,
    pub available: usize,
    pub total: usize,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEntry {
    pub date: NaiveDate,
    pub admissions: usize,
    pub discharges: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientStatistics {
    pub total_patients: usize,
    pub admitted: usize,
    pub discharged: usize,
    pub average_age: f64,
    pub risk_distribution: BTreeMap<&'static str, usize>,
    pub department_distribution: BTreeMap<&'static str, usize>,
    pub average_risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub department: Department,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub risk_level: RiskLevel,
    pub departments: Vec<DepartmentCount>,
}

/// Everything the dashboard page renders in one response.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: NaiveDateTime,
    pub statistics: Option<PatientStatistics>,
    pub bed_occupancy: Vec<OccupancyEntry>,
    pub flow_days: u32,
    pub patient_flow: Vec<FlowEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_breakdown: Option<RiskBreakdown>,
    pub patients: Vec<PatientRow>,
}
