//! Read-only views over a patient population. Every view is recomputed on
//! each call and accepts an empty population.

mod filter;
mod flow;
mod occupancy;
mod statistics;
pub mod views;

pub use filter::{FilterError, FilterQuery, PatientFilter};
pub use flow::{flow_window, patient_flow, FlowWindowError, MAX_FLOW_DAYS};
pub use occupancy::{bed_occupancy, BedCapacity};
pub use statistics::{
    department_risk_breakdown, departments_present, patient_statistics, UNKNOWN_RISK,
};
pub use views::{
    DashboardSnapshot, DepartmentCount, FlowEntry, OccupancyEntry, PatientStatistics,
    RiskBreakdown,
};

use crate::patients::domain::Patient;
use crate::patients::export::patient_rows;
use chrono::NaiveDateTime;

pub const DEFAULT_FLOW_DAYS: u32 = 7;

impl DashboardSnapshot {
    /// Statistics and flow cover the whole population. Occupancy narrows to
    /// the filtered department when one is set; the patient table and risk
    /// breakdown follow `filter`.
    pub fn build(
        patients: &[Patient],
        filter: &PatientFilter,
        capacity: &BedCapacity,
        flow_days: u32,
        now: NaiveDateTime,
    ) -> Self {
        let mut occupancy = match filter.department {
            Some(department) => bed_occupancy(patients, &capacity.restricted_to(department)),
            None => bed_occupancy(patients, capacity),
        };
        occupancy.sort_by(|a, b| b.occupancy_rate.total_cmp(&a.occupancy_rate));

        let risk_breakdown = filter.risk_level.map(|risk_level| RiskBreakdown {
            risk_level,
            departments: department_risk_breakdown(patients, risk_level),
        });

        Self {
            generated_at: now,
            statistics: patient_statistics(patients),
            bed_occupancy: occupancy,
            flow_days,
            patient_flow: patient_flow(patients, flow_days, now),
            risk_breakdown,
            patients: patient_rows(filter.apply(patients)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patients::domain::{
        AdmissionStatus, Department, Disposition, Gender, NewPatient, RiskLevel, Vitals,
    };
    use crate::clock::FixedClock;
    use crate::risk::{FixedShift, LevelShift, RiskScorer};
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .expect("valid date")
            .and_hms_opt(15, 45, 0)
            .expect("valid time")
    }

    fn patient(
        id: &str,
        department: Department,
        admitted_days_ago: i64,
        disposition: Disposition,
    ) -> Patient {
        NewPatient {
            patient_id: id.to_string(),
            medical_record_number: format!("MRN{id}"),
            first_name: "Test".to_string(),
            last_name: id.to_string(),
            age: 50,
            gender: Gender::Male,
            department,
            room: "A100".to_string(),
            admission_date: now() - Duration::days(admitted_days_ago),
            disposition,
            diagnosis: "Stroke".to_string(),
            vitals: Vitals {
                heart_rate: 80,
                blood_pressure: "120/80".to_string(),
                temperature: 36.9,
                respiratory_rate: 14,
                oxygen_saturation: 97,
                timestamp: now(),
            },
        }
        .into()
    }

    #[test]
    fn empty_population_has_zeroed_occupancy_and_no_statistics() {
        let occupancy = bed_occupancy(&[], &BedCapacity::standard());
        assert_eq!(occupancy.len(), 10);
        for entry in &occupancy {
            assert_eq!(entry.occupied, 0);
            assert_eq!(entry.available, entry.total);
            assert_eq!(entry.occupancy_rate, 0.0);
        }

        assert!(patient_statistics(&[]).is_none());
        let flow = patient_flow(&[], 7, now());
        assert_eq!(flow.len(), 8);
        assert!(flow
            .iter()
            .all(|entry| entry.admissions == 0 && entry.discharges == 0));
    }

    #[test]
    fn occupancy_counts_only_admitted_patients() {
        let discharged_at = now() - Duration::days(1);
        let patients = vec![
            patient("a", Department::Radiology, 2, Disposition::Admitted),
            patient("b", Department::Radiology, 2, Disposition::Admitted),
            patient(
                "c",
                Department::Radiology,
                3,
                Disposition::Discharged { discharged_at },
            ),
        ];

        let occupancy = bed_occupancy(&patients, &BedCapacity::standard());
        let radiology = occupancy
            .iter()
            .find(|entry| entry.department == Department::Radiology)
            .expect("radiology listed");
        assert_eq!(radiology.occupied, 2);
        assert_eq!(radiology.available, 8);
        assert_eq!(radiology.total, 10);
        assert!((radiology.occupancy_rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn overfull_department_reports_no_availability() {
        let patients: Vec<Patient> = (0..3)
            .map(|n| patient(&n.to_string(), Department::Surgery, 1, Disposition::Admitted))
            .collect();
        let capacity = BedCapacity::new([(Department::Surgery, 2), (Department::Maternity, 0)]);

        let occupancy = bed_occupancy(&patients, &capacity);
        assert_eq!(occupancy.len(), 2);
        assert_eq!(occupancy[0].available, 0);
        assert!((occupancy[0].occupancy_rate - 150.0).abs() < 1e-9);
        assert_eq!(occupancy[1].department, Department::Maternity);
        assert_eq!(occupancy[1].occupancy_rate, 0.0);
    }

    #[test]
    fn restricted_capacity_reports_single_department() {
        let capacity = BedCapacity::standard().restricted_to(Department::IntensiveCareUnit);
        assert_eq!(capacity.beds(), &[(Department::IntensiveCareUnit, 25)]);
        let total: usize = BedCapacity::standard().beds().iter().map(|(_, beds)| beds).sum();
        assert_eq!(total, 365);
    }

    #[test]
    fn flow_buckets_admissions_and_discharges_by_day() {
        let patients = vec![
            patient("today", Department::Emergency, 0, Disposition::Admitted),
            patient("edge", Department::Emergency, 7, Disposition::Admitted),
            patient("old", Department::Emergency, 8, Disposition::Admitted),
            patient(
                "out",
                Department::Emergency,
                10,
                Disposition::Discharged {
                    discharged_at: now() - Duration::days(3),
                },
            ),
            patient(
                "future",
                Department::Emergency,
                1,
                Disposition::Discharged {
                    discharged_at: now() + Duration::days(5),
                },
            ),
        ];

        let flow = patient_flow(&patients, 7, now());
        assert_eq!(flow.len(), 8);
        assert_eq!(flow[0].date, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(flow[7].date, now().date());

        assert_eq!(flow[0].admissions, 1);
        assert_eq!(flow[6].admissions, 1);
        assert_eq!(flow[7].admissions, 1);
        assert_eq!(flow.iter().map(|entry| entry.admissions).sum::<usize>(), 3);

        assert_eq!(flow[4].discharges, 1);
        assert_eq!(flow.iter().map(|entry| entry.discharges).sum::<usize>(), 1);
    }

    #[test]
    fn statistics_round_and_bucket_unscored_patients() {
        let patients = vec![
            patient("a", Department::Oncology, 1, Disposition::Admitted),
            patient(
                "b",
                Department::Oncology,
                4,
                Disposition::Discharged {
                    discharged_at: now(),
                },
            ),
            {
                let mut p = patient("c", Department::Neurology, 2, Disposition::Admitted);
                p.age = 21;
                p
            },
        ];

        let stats = patient_statistics(&patients).expect("non-empty");
        assert_eq!(stats.total_patients, 3);
        assert_eq!(stats.admitted, 2);
        assert_eq!(stats.discharged, 1);
        assert!((stats.average_age - 40.3).abs() < 1e-9);
        assert_eq!(stats.average_risk_score, 0.0);
        assert_eq!(stats.risk_distribution.get(UNKNOWN_RISK), Some(&3));
        assert_eq!(stats.department_distribution.get("Oncology"), Some(&2));
        assert_eq!(stats.department_distribution.get("Neurology"), Some(&1));
    }

    #[test]
    fn average_risk_score_skips_unscored_patients() {
        let elderly_cardiac = |id: &str, oxygen_saturation: u32| {
            let mut p = patient(id, Department::Cardiology, 20, Disposition::Admitted);
            p.age = 80;
            p.vitals.oxygen_saturation = oxygen_saturation;
            p
        };
        let mut scored = vec![
            elderly_cardiac("seven", 97),
            elderly_cardiac("eight", 93),
            elderly_cardiac("also-eight", 92),
        ];
        RiskScorer::new(FixedClock(now()), FixedShift(LevelShift::Hold))
            .score_population(&mut scored)
            .expect("well-formed vitals");
        let scores: Vec<Option<u8>> = scored.iter().map(Patient::risk_score).collect();
        assert_eq!(scores, vec![Some(7), Some(8), Some(8)]);

        let mut patients = scored;
        patients.push(patient("pending", Department::Radiology, 1, Disposition::Admitted));

        let stats = patient_statistics(&patients).expect("non-empty");
        assert_eq!(stats.total_patients, 4);
        assert!((stats.average_risk_score - 7.67).abs() < 1e-9);
        assert_eq!(stats.risk_distribution.get("High"), Some(&3));
        assert_eq!(stats.risk_distribution.get(UNKNOWN_RISK), Some(&1));
        assert_eq!(stats.risk_distribution.len(), 2);
    }

    #[test]
    fn filter_search_is_case_insensitive_and_stable() {
        let mut first = patient("x1", Department::Cardiology, 1, Disposition::Admitted);
        first.last_name = "McAllister".to_string();
        let mut second = patient("x2", Department::Cardiology, 1, Disposition::Admitted);
        second.room = "D455".to_string();
        let third = patient("x3", Department::Surgery, 1, Disposition::Admitted);
        let patients = vec![first, second, third];

        let by_name = PatientFilter {
            search: Some("mcall".to_string()),
            ..PatientFilter::default()
        };
        let matched: Vec<&str> = by_name
            .apply(&patients)
            .iter()
            .map(|patient| patient.patient_id.as_str())
            .collect();
        assert_eq!(matched, vec!["x1"]);

        let by_room = PatientFilter {
            search: Some("d45".to_string()),
            ..PatientFilter::default()
        };
        assert_eq!(by_room.apply(&patients).len(), 1);

        let by_mrn = PatientFilter {
            search: Some("mrnx".to_string()),
            department: Some(Department::Cardiology),
            ..PatientFilter::default()
        };
        let matched: Vec<&str> = by_mrn
            .apply(&patients)
            .iter()
            .map(|patient| patient.patient_id.as_str())
            .collect();
        assert_eq!(matched, vec!["x1", "x2"]);

        assert_eq!(PatientFilter::default().apply(&patients).len(), 3);
        assert!(PatientFilter::default().is_empty());
    }

    #[test]
    fn filter_query_treats_all_selections_as_unset() {
        let filter = PatientFilter::try_from(FilterQuery {
            department: Some("All Departments".to_string()),
            risk_level: Some("All Risk Levels".to_string()),
            status: Some("discharged".to_string()),
            search: Some("   ".to_string()),
        })
        .expect("valid query");

        assert_eq!(filter.department, None);
        assert_eq!(filter.risk_level, None);
        assert_eq!(filter.status, Some(AdmissionStatus::Discharged));
        assert_eq!(filter.search, None);

        let err = PatientFilter::try_from(FilterQuery {
            risk_level: Some("Severe".to_string()),
            ..FilterQuery::default()
        })
        .expect_err("unknown level");
        assert_eq!(err.to_string(), "invalid filter: unknown risk level 'Severe'");
    }

    #[test]
    fn dashboard_narrows_occupancy_to_the_filtered_department() {
        let patients = vec![
            patient("icu", Department::IntensiveCareUnit, 1, Disposition::Admitted),
            patient("ped", Department::Pediatrics, 1, Disposition::Admitted),
        ];
        let filter = PatientFilter {
            department: Some(Department::Pediatrics),
            risk_level: Some(RiskLevel::High),
            ..PatientFilter::default()
        };

        let snapshot = DashboardSnapshot::build(
            &patients,
            &filter,
            &BedCapacity::standard(),
            DEFAULT_FLOW_DAYS,
            now(),
        );

        assert_eq!(snapshot.statistics.as_ref().map(|s| s.total_patients), Some(2));
        assert_eq!(snapshot.bed_occupancy.len(), 1);
        assert_eq!(snapshot.bed_occupancy[0].department, Department::Pediatrics);
        assert_eq!(snapshot.bed_occupancy[0].occupied, 1);
        assert!(snapshot.patients.is_empty());
        let breakdown = snapshot.risk_breakdown.expect("risk level selected");
        assert!(breakdown.departments.is_empty());
        assert_eq!(snapshot.patient_flow.len(), 8);

        let unfiltered = DashboardSnapshot::build(
            &patients,
            &PatientFilter::default(),
            &BedCapacity::standard(),
            DEFAULT_FLOW_DAYS,
            now(),
        );
        assert_eq!(unfiltered.bed_occupancy.len(), 10);
        assert_eq!(
            unfiltered.bed_occupancy[0].department,
            Department::IntensiveCareUnit
        );
        assert!(unfiltered
            .bed_occupancy
            .windows(2)
            .all(|pair| pair[0].occupancy_rate >= pair[1].occupancy_rate));
        assert_eq!(unfiltered.patients.len(), 2);
    }

    #[test]
    fn oversized_flow_window_is_capped_without_panicking() {
        let flow = patient_flow(&[], u32::MAX, now());
        assert_eq!(flow.len(), MAX_FLOW_DAYS as usize + 1);
        assert_eq!(flow.last().map(|entry| entry.date), Some(now().date()));

        assert_eq!(flow_window(MAX_FLOW_DAYS), Ok(MAX_FLOW_DAYS));
        assert_eq!(
            flow_window(u32::MAX),
            Err(FlowWindowError { days: u32::MAX })
        );
    }

    #[test]
    fn departments_present_are_sorted_by_name() {
        let patients = vec![
            patient("1", Department::Surgery, 1, Disposition::Admitted),
            patient("2", Department::Cardiology, 1, Disposition::Admitted),
            patient("3", Department::IntensiveCareUnit, 1, Disposition::Admitted),
            patient("4", Department::Surgery, 1, Disposition::Admitted),
        ];
        assert_eq!(
            departments_present(&patients),
            vec![
                Department::Cardiology,
                Department::IntensiveCareUnit,
                Department::Surgery
            ]
        );
    }
}
