use super::domain::{Department, Disposition, Gender, NewPatient, Patient, Vitals};
use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

const DIAGNOSES: [(&str, [&str; 4]); 5] = [
    (
        "Cardiology",
        [
            "Hypertension",
            "Coronary Artery Disease",
            "Arrhythmia",
            "Heart Failure",
        ],
    ),
    (
        "Neurology",
        ["Migraine", "Epilepsy", "Stroke", "Parkinson's"],
    ),
    (
        "Oncology",
        ["Breast Cancer", "Lung Cancer", "Leukemia", "Lymphoma"],
    ),
    ("Emergency", ["Fracture", "Laceration", "Concussion", "Burn"]),
    (
        "Pediatrics",
        ["Asthma", "Ear Infection", "Bronchiolitis", "Gastroenteritis"],
    ),
];

const MALE_FIRST_NAMES: [&str; 12] = [
    "James", "Robert", "Michael", "David", "Daniel", "Thomas", "Samuel", "Lucas", "Omar", "Hiro",
    "Mateo", "Kwame",
];

const FEMALE_FIRST_NAMES: [&str; 12] = [
    "Mary", "Linda", "Susan", "Emily", "Grace", "Olivia", "Sofia", "Amara", "Yuki", "Priya",
    "Lucia", "Nadia",
];

const LAST_NAMES: [&str; 16] = [
    "Smith", "Johnson", "Williams", "Brown", "Garcia", "Miller", "Davis", "Martinez", "Lopez",
    "Wilson", "Anderson", "Nguyen", "Okafor", "Tanaka", "Kowalski", "Haddad",
];

const ROOM_WINGS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Share of generated patients that are still admitted.
const ADMITTED_SHARE: f64 = 0.7;

/// Fabricates plausible, unscored patient records.
pub struct PatientGenerator<R> {
    rng: R,
    issued_mrns: HashSet<u32>,
}

impl PatientGenerator<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> PatientGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            issued_mrns: HashSet::new(),
        }
    }

    pub fn generate_many(&mut self, count: usize, now: NaiveDateTime) -> Vec<Patient> {
        (0..count).map(|_| self.generate(now)).collect()
    }

    pub fn generate(&mut self, now: NaiveDateTime) -> Patient {
        let age = self.rng.gen_range(1..=100);
        let gender = if self.rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let departments = Department::ordered();
        let department = departments[self.rng.gen_range(0..departments.len())];

        let admission_date = now - Duration::days(self.rng.gen_range(0..=14));
        let disposition = if self.rng.gen_bool(ADMITTED_SHARE) {
            Disposition::Admitted
        } else {
            Disposition::Discharged {
                discharged_at: admission_date + Duration::days(self.rng.gen_range(1..=30)),
            }
        };

        let (_, diagnoses) = DIAGNOSES[self.rng.gen_range(0..DIAGNOSES.len())];
        let diagnosis = diagnoses[self.rng.gen_range(0..diagnoses.len())];

        let first_name = match gender {
            Gender::Male => self.pick(&MALE_FIRST_NAMES),
            Gender::Female => self.pick(&FEMALE_FIRST_NAMES),
        };
        let last_name = self.pick(&LAST_NAMES);
        let room = format!(
            "{}{}",
            ROOM_WINGS[self.rng.gen_range(0..ROOM_WINGS.len())],
            self.rng.gen_range(100..=599)
        );

        NewPatient {
            patient_id: uuid::Builder::from_random_bytes(self.rng.gen())
                .into_uuid()
                .to_string(),
            medical_record_number: format!("MRN{}", self.next_mrn()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            gender,
            department,
            room,
            admission_date,
            disposition,
            diagnosis: diagnosis.to_string(),
            vitals: self.vitals_for(age, now),
        }
        .into()
    }

    fn pick(&mut self, names: &[&'static str]) -> &'static str {
        names.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn next_mrn(&mut self) -> u32 {
        loop {
            let candidate = self.rng.gen_range(10_000_000..=99_999_999);
            if self.issued_mrns.insert(candidate) {
                return candidate;
            }
        }
    }

    fn vitals_for(&mut self, age: u32, now: NaiveDateTime) -> Vitals {
        let rng = &mut self.rng;
        let (heart_rate, systolic, diastolic, temperature, respiratory_rate): (
            i32,
            i32,
            i32,
            f64,
            i32,
        ) = if age < 1 {
            (
                rng.gen_range(100..=160),
                rng.gen_range(65..=100),
                rng.gen_range(40..=70),
                round_tenth(rng.gen_range(36.5..=37.5)),
                rng.gen_range(20..=40),
            )
        } else if age < 12 {
            (
                rng.gen_range(70..=120),
                rng.gen_range(80..=110),
                rng.gen_range(50..=80),
                round_tenth(rng.gen_range(36.0..=37.2)),
                rng.gen_range(16..=30),
            )
        } else {
            (
                rng.gen_range(60..=100),
                rng.gen_range(90..=140),
                rng.gen_range(60..=90),
                round_tenth(rng.gen_range(36.2..=37.2)),
                rng.gen_range(12..=20),
            )
        };

        let heart_rate = heart_rate + rng.gen_range(-5..=5);
        let systolic = systolic + rng.gen_range(-5..=5);
        let diastolic = diastolic + rng.gen_range(-3..=3);
        let temperature = temperature + round_tenth(rng.gen_range(-0.2..=0.2));

        Vitals {
            heart_rate: heart_rate.clamp(40, 200) as u32,
            blood_pressure: format!(
                "{}/{}",
                systolic.clamp(60, 200),
                diastolic.clamp(40, 120)
            ),
            temperature: round_tenth(temperature.clamp(35.0, 39.0)),
            respiratory_rate: respiratory_rate.clamp(8, 40) as u32,
            oxygen_saturation: rng.gen_range(90..=100),
            timestamp: now,
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
