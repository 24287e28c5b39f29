use super::domain::Patient;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

/// Flattened patient row used by the table view and CSV downloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "MRN")]
    pub mrn: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: &'static str,
    #[serde(rename = "Department")]
    pub department: &'static str,
    #[serde(rename = "Room")]
    pub room: String,
    #[serde(rename = "Admission Date")]
    pub admission_date: NaiveDate,
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: String,
    #[serde(rename = "Risk Level")]
    pub risk_level: &'static str,
    #[serde(rename = "Risk Score")]
    pub risk_score: u8,
}

pub const NOT_ASSESSED: &str = "Not Assessed";

impl From<&Patient> for PatientRow {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.patient_id.clone(),
            mrn: patient.medical_record_number.clone(),
            name: patient.display_name(),
            age: patient.age,
            gender: patient.gender.label(),
            department: patient.department.label(),
            room: patient.room.clone(),
            admission_date: patient.admission_date.date(),
            status: patient.status().label(),
            diagnosis: patient.diagnosis.clone(),
            risk_level: patient
                .risk_level()
                .map(|level| level.label())
                .unwrap_or(NOT_ASSESSED),
            risk_score: patient.risk_score().unwrap_or(0),
        }
    }
}

pub fn patient_rows<'a>(patients: impl IntoIterator<Item = &'a Patient>) -> Vec<PatientRow> {
    patients.into_iter().map(PatientRow::from).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes rows with a header line. An empty slice writes nothing.
pub fn write_csv<W: Write>(rows: &[PatientRow], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn csv_bytes(rows: &[PatientRow]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(buffer)
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("patient_data_{}.csv", date.format("%Y%m%d"))
}
