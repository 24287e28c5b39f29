use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Cardiology,
    Neurology,
    Oncology,
    Pediatrics,
    Emergency,
    #[serde(rename = "Intensive Care Unit (ICU)")]
    IntensiveCareUnit,
    Maternity,
    Orthopedics,
    Surgery,
    Radiology,
}

impl Department {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Cardiology,
            Self::Neurology,
            Self::Oncology,
            Self::Pediatrics,
            Self::Emergency,
            Self::IntensiveCareUnit,
            Self::Maternity,
            Self::Orthopedics,
            Self::Surgery,
            Self::Radiology,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cardiology => "Cardiology",
            Self::Neurology => "Neurology",
            Self::Oncology => "Oncology",
            Self::Pediatrics => "Pediatrics",
            Self::Emergency => "Emergency",
            Self::IntensiveCareUnit => "Intensive Care Unit (ICU)",
            Self::Maternity => "Maternity",
            Self::Orthopedics => "Orthopedics",
            Self::Surgery => "Surgery",
            Self::Radiology => "Radiology",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|department| department.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLabel::new("department", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmissionStatus {
    Admitted,
    Discharged,
}

impl AdmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admitted => "Admitted",
            Self::Discharged => "Discharged",
        }
    }
}

impl FromStr for AdmissionStatus {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admitted" => Ok(Self::Admitted),
            "discharged" => Ok(Self::Discharged),
            _ => Err(UnknownLabel::new("status", value)),
        }
    }
}

/// Where a patient is in their episode. A discharge timestamp exists only for
/// discharged patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DispositionRecord", into = "DispositionRecord")]
pub enum Disposition {
    Admitted,
    Discharged { discharged_at: NaiveDateTime },
}

impl Disposition {
    pub const fn status(self) -> AdmissionStatus {
        match self {
            Self::Admitted => AdmissionStatus::Admitted,
            Self::Discharged { .. } => AdmissionStatus::Discharged,
        }
    }

    pub const fn discharge_date(self) -> Option<NaiveDateTime> {
        match self {
            Self::Admitted => None,
            Self::Discharged { discharged_at } => Some(discharged_at),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DispositionRecord {
    status: AdmissionStatus,
    #[serde(default)]
    discharge_date: Option<NaiveDateTime>,
}

impl TryFrom<DispositionRecord> for Disposition {
    type Error = DispositionError;

    fn try_from(record: DispositionRecord) -> Result<Self, Self::Error> {
        match (record.status, record.discharge_date) {
            (AdmissionStatus::Admitted, None) => Ok(Self::Admitted),
            (AdmissionStatus::Discharged, Some(discharged_at)) => {
                Ok(Self::Discharged { discharged_at })
            }
            (AdmissionStatus::Admitted, Some(_)) => Err(DispositionError::AdmittedWithDischarge),
            (AdmissionStatus::Discharged, None) => Err(DispositionError::MissingDischargeDate),
        }
    }
}

impl From<Disposition> for DispositionRecord {
    fn from(disposition: Disposition) -> Self {
        Self {
            status: disposition.status(),
            discharge_date: disposition.discharge_date(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispositionError {
    #[error("admitted patient must not carry a discharge_date")]
    AdmittedWithDischarge,
    #[error("discharged patient is missing its discharge_date")]
    MissingDischargeDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub heart_rate: u32,
    /// Encoded as "systolic/diastolic".
    pub blood_pressure: String,
    pub temperature: f64,
    pub respiratory_rate: u32,
    pub oxygen_saturation: u32,
    pub timestamp: NaiveDateTime,
}

impl Vitals {
    pub fn blood_pressure_reading(&self) -> Result<BloodPressure, BloodPressureError> {
        self.blood_pressure.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

impl FromStr for BloodPressure {
    type Err = BloodPressureError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || BloodPressureError {
            raw: raw.to_string(),
        };
        let (systolic, diastolic) = raw.split_once('/').ok_or_else(malformed)?;
        Ok(Self {
            systolic: systolic.trim().parse().map_err(|_| malformed())?,
            diastolic: diastolic.trim().parse().map_err(|_| malformed())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("blood pressure '{raw}' is not in systolic/diastolic form")]
pub struct BloodPressureError {
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Most severe first, the order the dashboard lists levels in.
    pub const fn ordered() -> [Self; 4] {
        [Self::Critical, Self::High, Self::Medium, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Buckets an unclamped factor total.
    pub const fn from_total(total: u32) -> Self {
        if total >= 10 {
            Self::Critical
        } else if total >= 7 {
            Self::High
        } else if total >= 4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn toward_critical(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
        }
    }

    pub const fn toward_low(self) -> Self {
        match self {
            Self::Critical => Self::High,
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskLevel {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLabel::new("risk level", value))
    }
}

/// Per-factor contributions to the raw risk total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub age_score: u8,
    pub heart_rate_score: u8,
    pub blood_pressure_score: u8,
    pub temperature_score: u8,
    pub oxygen_score: u8,
    pub department_score: u8,
    pub length_of_stay_score: u8,
}

impl RiskFactors {
    pub fn total(&self) -> u32 {
        self.entries()
            .iter()
            .map(|(_, score)| u32::from(*score))
            .sum()
    }

    pub fn entries(&self) -> [(&'static str, u8); 7] {
        [
            ("age_score", self.age_score),
            ("heart_rate_score", self.heart_rate_score),
            ("blood_pressure_score", self.blood_pressure_score),
            ("temperature_score", self.temperature_score),
            ("oxygen_score", self.oxygen_score),
            ("department_score", self.department_score),
            ("length_of_stay_score", self.length_of_stay_score),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Display score, capped at [`MAX_DISPLAY_SCORE`].
    pub risk_score: u8,
    pub factors: RiskFactors,
    pub last_updated: NaiveDateTime,
}

pub const MAX_DISPLAY_SCORE: u8 = 15;

/// A patient record. Risk fields are written only by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub medical_record_number: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    pub department: Department,
    pub room: String,
    pub admission_date: NaiveDateTime,
    #[serde(flatten)]
    pub disposition: Disposition,
    pub diagnosis: String,
    pub vitals: Vitals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    risk_assessment: Option<RiskAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    risk_level: Option<RiskLevel>,
    #[serde(default)]
    risk_score: Option<u8>,
}

/// Everything a patient record needs before it has been scored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub patient_id: String,
    pub medical_record_number: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    pub department: Department,
    pub room: String,
    pub admission_date: NaiveDateTime,
    pub disposition: Disposition,
    pub diagnosis: String,
    pub vitals: Vitals,
}

impl From<NewPatient> for Patient {
    fn from(new: NewPatient) -> Self {
        Self {
            patient_id: new.patient_id,
            medical_record_number: new.medical_record_number,
            first_name: new.first_name,
            last_name: new.last_name,
            age: new.age,
            gender: new.gender,
            department: new.department,
            room: new.room,
            admission_date: new.admission_date,
            disposition: new.disposition,
            diagnosis: new.diagnosis,
            vitals: new.vitals,
            risk_assessment: None,
            risk_level: None,
            risk_score: None,
        }
    }
}

impl Patient {
    pub fn status(&self) -> AdmissionStatus {
        self.disposition.status()
    }

    pub fn discharge_date(&self) -> Option<NaiveDateTime> {
        self.disposition.discharge_date()
    }

    pub fn risk_assessment(&self) -> Option<&RiskAssessment> {
        self.risk_assessment.as_ref()
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_level
    }

    pub fn risk_score(&self) -> Option<u8> {
        self.risk_score
    }

    /// "Last, First" as shown in the patient table.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub(crate) fn record_assessment(&mut self, assessment: RiskAssessment) {
        self.risk_level = Some(assessment.risk_level);
        self.risk_score = Some(assessment.risk_score);
        self.risk_assessment = Some(assessment);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownLabel {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
