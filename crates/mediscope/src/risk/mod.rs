//! Heuristic risk scoring.
//!
//! Seven step-function factors are summed into a raw total, the total is
//! bucketed into a level, and the level may then be nudged one step by a
//! [`ShiftSource`]. The level reflects the unclamped total while the stored
//! score is capped at [`MAX_DISPLAY_SCORE`].

pub mod rules;
mod shift;

pub use rules::{evaluate, RiskEvaluation};
pub use shift::{FixedShift, LevelShift, RandomShift, ShiftSource};

use crate::clock::{Clock, SystemClock};
use crate::patients::domain::{BloodPressureError, Patient, RiskAssessment, MAX_DISPLAY_SCORE};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("cannot score patient {patient_id}: {source}")]
    MalformedVitals {
        patient_id: String,
        #[source]
        source: BloodPressureError,
    },
}

pub struct RiskScorer<C, S> {
    clock: C,
    shifts: S,
}

impl RiskScorer<SystemClock, RandomShift<ChaCha8Rng>> {
    pub fn standard(seed: Option<u64>) -> Self {
        let shifts = match seed {
            Some(seed) => RandomShift::seeded(seed),
            None => RandomShift::from_entropy(),
        };
        Self::new(SystemClock, shifts)
    }
}

impl<C: Clock, S: ShiftSource> RiskScorer<C, S> {
    pub fn new(clock: C, shifts: S) -> Self {
        Self { clock, shifts }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn score(&mut self, patient: &Patient) -> Result<RiskAssessment, ScoringError> {
        let now = self.clock.now();
        let evaluation = evaluate(patient, now).map_err(|source| {
            ScoringError::MalformedVitals {
                patient_id: patient.patient_id.clone(),
                source,
            }
        })?;

        let shift = self.shifts.draw();
        let risk_level = shift.apply(evaluation.baseline_level);
        if shift != LevelShift::Hold {
            trace!(
                patient_id = %patient.patient_id,
                baseline = %evaluation.baseline_level,
                adjusted = %risk_level,
                "risk level nudged"
            );
        }

        let risk_score = evaluation.raw_total.min(u32::from(MAX_DISPLAY_SCORE)) as u8;

        Ok(RiskAssessment {
            risk_level,
            risk_score,
            factors: evaluation.factors,
            last_updated: now,
        })
    }

    /// Scores `patient` and writes the assessment onto it.
    pub fn apply(&mut self, patient: &mut Patient) -> Result<(), ScoringError> {
        let assessment = self.score(patient)?;
        patient.record_assessment(assessment);
        Ok(())
    }

    /// Scores every record in order, stopping at the first malformed one.
    pub fn score_population(&mut self, patients: &mut [Patient]) -> Result<(), ScoringError> {
        for patient in patients.iter_mut() {
            self.apply(patient)?;
        }
        debug!(count = patients.len(), "scored patient population");
        Ok(())
    }
}
