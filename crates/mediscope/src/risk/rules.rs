use crate::patients::domain::{BloodPressureError, Department, Patient, RiskFactors, RiskLevel};
use chrono::NaiveDateTime;

/// Deterministic part of an assessment: factor breakdown and the level the
/// unclamped total maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskEvaluation {
    pub factors: RiskFactors,
    pub raw_total: u32,
    pub baseline_level: RiskLevel,
}

pub fn evaluate(
    patient: &Patient,
    now: NaiveDateTime,
) -> Result<RiskEvaluation, BloodPressureError> {
    let vitals = &patient.vitals;
    let systolic = vitals.blood_pressure_reading()?.systolic;
    let days_in_hospital = (now - patient.admission_date).num_days();

    let factors = RiskFactors {
        age_score: age_score(patient.age),
        heart_rate_score: heart_rate_score(vitals.heart_rate),
        blood_pressure_score: blood_pressure_score(systolic),
        temperature_score: temperature_score(vitals.temperature),
        oxygen_score: oxygen_score(vitals.oxygen_saturation),
        department_score: department_score(patient.department),
        length_of_stay_score: length_of_stay_score(days_in_hospital),
    };
    let raw_total = factors.total();

    Ok(RiskEvaluation {
        factors,
        raw_total,
        baseline_level: RiskLevel::from_total(raw_total),
    })
}

pub fn age_score(age: u32) -> u8 {
    if age > 75 {
        3
    } else if age > 60 {
        2
    } else if age > 40 {
        1
    } else {
        0
    }
}

pub fn heart_rate_score(bpm: u32) -> u8 {
    if bpm > 120 || bpm < 50 {
        3
    } else if bpm > 100 || bpm < 60 {
        2
    } else {
        0
    }
}

pub fn blood_pressure_score(systolic: u32) -> u8 {
    if systolic > 180 || systolic < 90 {
        3
    } else if systolic > 140 || systolic < 100 {
        2
    } else {
        0
    }
}

pub fn temperature_score(celsius: f64) -> u8 {
    if celsius > 38.5 || celsius < 35.5 {
        2
    } else if celsius > 37.8 || celsius < 36.0 {
        1
    } else {
        0
    }
}

pub fn oxygen_score(saturation: u32) -> u8 {
    if saturation < 90 {
        3
    } else if saturation < 94 {
        1
    } else {
        0
    }
}

pub fn department_score(department: Department) -> u8 {
    match department {
        Department::IntensiveCareUnit | Department::Cardiology | Department::Neurology => 2,
        Department::Emergency | Department::Oncology | Department::Surgery => 1,
        Department::Pediatrics
        | Department::Maternity
        | Department::Orthopedics
        | Department::Radiology => 0,
    }
}

/// `days` is whole days since admission, truncated.
pub fn length_of_stay_score(days: i64) -> u8 {
    if days > 14 {
        2
    } else if days > 7 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_thresholds_are_strict() {
        assert_eq!(age_score(40), 0);
        assert_eq!(age_score(41), 1);
        assert_eq!(age_score(60), 1);
        assert_eq!(age_score(61), 2);
        assert_eq!(age_score(75), 2);
        assert_eq!(age_score(76), 3);
    }

    #[test]
    fn age_score_never_decreases_with_age() {
        let mut previous = 0;
        for age in 0..=110 {
            let score = age_score(age);
            assert!(score >= previous, "age {age} scored {score} < {previous}");
            previous = score;
        }
    }

    #[test]
    fn heart_rate_penalizes_both_extremes() {
        assert_eq!(heart_rate_score(49), 3);
        assert_eq!(heart_rate_score(50), 2);
        assert_eq!(heart_rate_score(59), 2);
        assert_eq!(heart_rate_score(60), 0);
        assert_eq!(heart_rate_score(100), 0);
        assert_eq!(heart_rate_score(101), 2);
        assert_eq!(heart_rate_score(120), 2);
        assert_eq!(heart_rate_score(121), 3);
    }

    #[test]
    fn systolic_pressure_buckets() {
        assert_eq!(blood_pressure_score(89), 3);
        assert_eq!(blood_pressure_score(90), 2);
        assert_eq!(blood_pressure_score(99), 2);
        assert_eq!(blood_pressure_score(100), 0);
        assert_eq!(blood_pressure_score(140), 0);
        assert_eq!(blood_pressure_score(141), 2);
        assert_eq!(blood_pressure_score(181), 3);
    }

    #[test]
    fn temperature_buckets() {
        assert_eq!(temperature_score(35.4), 2);
        assert_eq!(temperature_score(35.5), 1);
        assert_eq!(temperature_score(36.0), 0);
        assert_eq!(temperature_score(37.8), 0);
        assert_eq!(temperature_score(37.9), 1);
        assert_eq!(temperature_score(38.6), 2);
    }

    #[test]
    fn oxygen_and_stay_buckets() {
        assert_eq!(oxygen_score(89), 3);
        assert_eq!(oxygen_score(90), 1);
        assert_eq!(oxygen_score(94), 0);

        assert_eq!(length_of_stay_score(-1), 0);
        assert_eq!(length_of_stay_score(7), 0);
        assert_eq!(length_of_stay_score(8), 1);
        assert_eq!(length_of_stay_score(14), 1);
        assert_eq!(length_of_stay_score(15), 2);
    }

    #[test]
    fn department_weights() {
        let weights: Vec<u8> = Department::ordered()
            .into_iter()
            .map(department_score)
            .collect();
        assert_eq!(weights, vec![2, 2, 1, 0, 1, 2, 0, 0, 1, 0]);
    }
}
