use super::views::FlowEntry;
use crate::patients::domain::Patient;
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub const MAX_FLOW_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("flow window of {days} days exceeds the {max}-day limit", max = MAX_FLOW_DAYS)]
pub struct FlowWindowError {
    pub days: u32,
}

/// Accepts a requested flow window of at most [`MAX_FLOW_DAYS`].
pub fn flow_window(days: u32) -> Result<u32, FlowWindowError> {
    if days > MAX_FLOW_DAYS {
        Err(FlowWindowError { days })
    } else {
        Ok(days)
    }
}

/// Daily admissions and discharges for the `days` days before `now`, both
/// endpoints included. Events outside the window are ignored. Windows longer
/// than [`MAX_FLOW_DAYS`] are cut to that length.
pub fn patient_flow(patients: &[Patient], days: u32, now: NaiveDateTime) -> Vec<FlowEntry> {
    let days = days.min(MAX_FLOW_DAYS);
    let window_start = now
        .date()
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    let mut flow: Vec<FlowEntry> = (0..=days)
        .map(|offset| FlowEntry {
            date: window_start + Duration::days(i64::from(offset)),
            admissions: 0,
            discharges: 0,
        })
        .collect();

    for patient in patients {
        if let Some(slot) = bucket(window_start, days, patient.admission_date.date()) {
            flow[slot].admissions += 1;
        }
        if let Some(discharged) = patient.discharge_date() {
            if let Some(slot) = bucket(window_start, days, discharged.date()) {
                flow[slot].discharges += 1;
            }
        }
    }

    flow
}

fn bucket(window_start: NaiveDate, days: u32, date: NaiveDate) -> Option<usize> {
    let offset = (date - window_start).num_days();
    (0..=i64::from(days))
        .contains(&offset)
        .then_some(offset as usize)
}
