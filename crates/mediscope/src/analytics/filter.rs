use crate::patients::domain::{AdmissionStatus, Department, Patient, RiskLevel, UnknownLabel};
use serde::Deserialize;

/// Conjunctive patient filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    pub department: Option<Department>,
    pub risk_level: Option<RiskLevel>,
    pub status: Option<AdmissionStatus>,
    pub search: Option<String>,
}

impl PatientFilter {
    pub fn is_empty(&self) -> bool {
        self.department.is_none()
            && self.risk_level.is_none()
            && self.status.is_none()
            && self.search_term().is_none()
    }

    pub fn matches(&self, patient: &Patient) -> bool {
        if self
            .department
            .is_some_and(|department| patient.department != department)
        {
            return false;
        }
        if self
            .risk_level
            .is_some_and(|level| patient.risk_level() != Some(level))
        {
            return false;
        }
        if self.status.is_some_and(|status| patient.status() != status) {
            return false;
        }

        match self.search_term() {
            Some(term) => {
                let term = term.to_lowercase();
                [
                    patient.first_name.as_str(),
                    patient.last_name.as_str(),
                    patient.medical_record_number.as_str(),
                    patient.room.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }

    /// Keeps matching patients in their original order.
    pub fn apply<'a>(&self, patients: impl IntoIterator<Item = &'a Patient>) -> Vec<&'a Patient> {
        patients
            .into_iter()
            .filter(|patient| self.matches(patient))
            .collect()
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|term| !term.is_empty())
    }
}

/// Raw filter selections as they arrive from a query string or the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid filter: {0}")]
pub struct FilterError(#[from] pub UnknownLabel);

impl TryFrom<FilterQuery> for PatientFilter {
    type Error = FilterError;

    fn try_from(query: FilterQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            department: selection(query.department.as_deref(), "All Departments")
                .map(str::parse::<Department>)
                .transpose()?,
            risk_level: selection(query.risk_level.as_deref(), "All Risk Levels")
                .map(str::parse::<RiskLevel>)
                .transpose()?,
            status: selection(query.status.as_deref(), "All Statuses")
                .map(str::parse::<AdmissionStatus>)
                .transpose()?,
            search: query
                .search
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty()),
        })
    }
}

/// Blank values and the dashboard's "All ..." choices mean no criterion.
fn selection<'a>(raw: Option<&'a str>, all_label: &str) -> Option<&'a str> {
    raw.map(str::trim).filter(|value| {
        !value.is_empty()
            && !value.eq_ignore_ascii_case(all_label)
            && !value.eq_ignore_ascii_case("all")
    })
}
