use super::views::OccupancyEntry;
use crate::patients::domain::{AdmissionStatus, Department, Patient};

/// Licensed beds per department. Only departments listed here are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedCapacity {
    beds: Vec<(Department, usize)>,
}

impl BedCapacity {
    pub fn standard() -> Self {
        Self::new([
            (Department::Cardiology, 50),
            (Department::Neurology, 40),
            (Department::Oncology, 60),
            (Department::Pediatrics, 45),
            (Department::Emergency, 30),
            (Department::IntensiveCareUnit, 25),
            (Department::Maternity, 35),
            (Department::Orthopedics, 40),
            (Department::Surgery, 30),
            (Department::Radiology, 10),
        ])
    }

    pub fn new(beds: impl IntoIterator<Item = (Department, usize)>) -> Self {
        Self {
            beds: beds.into_iter().collect(),
        }
    }

    pub fn restricted_to(&self, department: Department) -> Self {
        Self::new(
            self.beds
                .iter()
                .copied()
                .filter(|(listed, _)| *listed == department),
        )
    }

    pub fn beds(&self) -> &[(Department, usize)] {
        &self.beds
    }
}

impl Default for BedCapacity {
    fn default() -> Self {
        Self::standard()
    }
}

/// Admitted patients against each department's bed count, in table order.
pub fn bed_occupancy(patients: &[Patient], capacity: &BedCapacity) -> Vec<OccupancyEntry> {
    capacity
        .beds()
        .iter()
        .map(|&(department, total)| {
            let occupied = patients
                .iter()
                .filter(|patient| {
                    patient.department == department
                        && patient.status() == AdmissionStatus::Admitted
                })
                .count();
            let occupancy_rate = if total > 0 {
                occupied as f64 / total as f64 * 100.0
            } else {
                0.0
            };

            OccupancyEntry {
                department,
                occupied,
                available: total.saturating_sub(occupied),
                total,
                occupancy_rate,
            }
        })
        .collect()
}
