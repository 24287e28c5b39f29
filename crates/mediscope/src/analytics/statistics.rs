use super::views::{DepartmentCount, PatientStatistics};
use crate::patients::domain::{AdmissionStatus, Department, Patient, RiskLevel};
use std::collections::BTreeMap;

pub const UNKNOWN_RISK: &str = "Unknown";

/// Population summary, or `None` when there is nothing to summarize.
pub fn patient_statistics(patients: &[Patient]) -> Option<PatientStatistics> {
    if patients.is_empty() {
        return None;
    }

    let total_patients = patients.len();
    let admitted = patients
        .iter()
        .filter(|patient| patient.status() == AdmissionStatus::Admitted)
        .count();

    let age_sum: f64 = patients.iter().map(|patient| f64::from(patient.age)).sum();
    let average_age = round_to(age_sum / total_patients as f64, 1);

    let mut risk_distribution = BTreeMap::new();
    let mut department_distribution = BTreeMap::new();
    for patient in patients {
        let risk = patient
            .risk_level()
            .map(RiskLevel::label)
            .unwrap_or(UNKNOWN_RISK);
        *risk_distribution.entry(risk).or_insert(0) += 1;
        *department_distribution
            .entry(patient.department.label())
            .or_insert(0) += 1;
    }

    let scores: Vec<f64> = patients
        .iter()
        .filter_map(|patient| patient.risk_score())
        .map(f64::from)
        .collect();
    let average_risk_score = if scores.is_empty() {
        0.0
    } else {
        round_to(scores.iter().sum::<f64>() / scores.len() as f64, 2)
    };

    Some(PatientStatistics {
        total_patients,
        admitted,
        discharged: total_patients - admitted,
        average_age,
        risk_distribution,
        department_distribution,
        average_risk_score,
    })
}

/// Departments holding at least one patient at `level`, in department order.
pub fn department_risk_breakdown(patients: &[Patient], level: RiskLevel) -> Vec<DepartmentCount> {
    Department::ordered()
        .into_iter()
        .filter_map(|department| {
            let count = patients
                .iter()
                .filter(|patient| {
                    patient.department == department && patient.risk_level() == Some(level)
                })
                .count();
            (count > 0).then_some(DepartmentCount { department, count })
        })
        .collect()
}

/// Distinct departments in the population, sorted by name.
pub fn departments_present(patients: &[Patient]) -> Vec<Department> {
    let mut departments: Vec<Department> = patients
        .iter()
        .map(|patient| patient.department)
        .collect();
    departments.sort_by_key(|department| department.label());
    departments.dedup();
    departments
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
