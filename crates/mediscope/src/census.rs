use crate::analytics::{departments_present, BedCapacity, DashboardSnapshot, PatientFilter};
use crate::clock::{Clock, SystemClock};
use crate::config::DataConfig;
use crate::patients::domain::{Department, Patient};
use crate::patients::export::{csv_bytes, patient_rows, ExportError, PatientRow};
use crate::patients::{PatientGenerator, PopulationStore, StoreError};
use crate::risk::{RandomShift, RiskScorer, ScoringError, ShiftSource};
use chrono::NaiveDateTime;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Batch sizes used when the population is seeded or topped up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CensusSettings {
    pub initial_patients: usize,
    pub refresh_patients: usize,
}

impl Default for CensusSettings {
    fn default() -> Self {
        Self {
            initial_patients: DataConfig::DEFAULT_INITIAL_PATIENTS,
            refresh_patients: DataConfig::DEFAULT_REFRESH_PATIENTS,
        }
    }
}

impl From<&DataConfig> for CensusSettings {
    fn from(config: &DataConfig) -> Self {
        Self {
            initial_patients: config.initial_patients,
            refresh_patients: config.refresh_patients,
        }
    }
}

/// The single writer over a patient population: generation, scoring, and
/// persistence go through here, and every read view is recomputed on demand.
pub struct Census<C, S, R> {
    store: PopulationStore,
    scorer: RiskScorer<C, S>,
    generator: PatientGenerator<R>,
    capacity: BedCapacity,
    settings: CensusSettings,
}

pub type StandardCensus = Census<SystemClock, RandomShift<ChaCha8Rng>, ChaCha8Rng>;

impl StandardCensus {
    /// Loads the configured snapshot. A seed pins both generation and the
    /// scorer's perturbation draws.
    pub fn from_config(config: &DataConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => PatientGenerator::seeded(seed),
            None => PatientGenerator::from_entropy(),
        };
        let scorer = RiskScorer::standard(config.seed.map(|seed| seed.wrapping_add(1)));

        Census::new(
            PopulationStore::load(&config.snapshot_path),
            scorer,
            generator,
            CensusSettings::from(config),
        )
    }
}

impl<C: Clock, S: ShiftSource, R: Rng> Census<C, S, R> {
    pub fn new(
        store: PopulationStore,
        scorer: RiskScorer<C, S>,
        generator: PatientGenerator<R>,
        settings: CensusSettings,
    ) -> Self {
        Self {
            store,
            scorer,
            generator,
            capacity: BedCapacity::standard(),
            settings,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.scorer.clock().now()
    }

    pub fn patients(&self) -> &[Patient] {
        self.store.patients()
    }

    /// Seeds an empty population with the initial batch. Returns how many
    /// patients were generated, zero when a snapshot was already loaded.
    pub fn bootstrap(&mut self) -> Result<usize, CensusError> {
        if !self.store.is_empty() {
            info!(count = self.store.len(), "using existing patient snapshot");
            return Ok(0);
        }

        let patients = self.scored_batch(self.settings.initial_patients)?;
        let generated = patients.len();
        self.store.replace(patients);
        self.store.save()?;
        info!(count = generated, "seeded patient population");
        Ok(generated)
    }

    /// Appends a freshly generated, scored batch.
    pub fn refresh(&mut self) -> Result<usize, CensusError> {
        let patients = self.scored_batch(self.settings.refresh_patients)?;
        let added = patients.len();
        self.store.extend(patients);
        self.store.save()?;
        info!(added, total = self.store.len(), "refreshed patient population");
        Ok(added)
    }

    /// Discards the population and generates a new initial batch.
    pub fn regenerate(&mut self) -> Result<usize, CensusError> {
        let patients = self.scored_batch(self.settings.initial_patients)?;
        let total = patients.len();
        self.store.replace(patients);
        self.store.save()?;
        info!(total, "regenerated patient population");
        Ok(total)
    }

    /// Re-runs the scorer over every stored patient.
    pub fn rescore(&mut self) -> Result<usize, CensusError> {
        self.scorer.score_population(self.store.patients_mut())?;
        self.store.save()?;
        Ok(self.store.len())
    }

    pub fn dashboard(&self, filter: &PatientFilter, flow_days: u32) -> DashboardSnapshot {
        DashboardSnapshot::build(
            self.store.patients(),
            filter,
            &self.capacity,
            flow_days,
            self.now(),
        )
    }

    pub fn rows(&self, filter: &PatientFilter) -> Vec<PatientRow> {
        patient_rows(filter.apply(self.store.patients()))
    }

    pub fn export_csv(&self, filter: &PatientFilter) -> Result<Vec<u8>, CensusError> {
        Ok(csv_bytes(&self.rows(filter))?)
    }

    pub fn departments(&self) -> Vec<Department> {
        departments_present(self.store.patients())
    }

    fn scored_batch(&mut self, count: usize) -> Result<Vec<Patient>, CensusError> {
        let mut patients = self.generator.generate_many(count, self.now());
        self.scorer.score_population(&mut patients)?;
        Ok(patients)
    }
}
