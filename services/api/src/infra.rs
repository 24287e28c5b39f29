use mediscope::analytics::{FilterQuery, PatientFilter};
use mediscope::config::DataConfig;
use mediscope::error::AppError;
use mediscope::StandardCensus;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

pub(crate) type SharedCensus = Arc<Mutex<StandardCensus>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) census: SharedCensus,
}

impl AppState {
    /// Every handler goes through this guard, so reads see a consistent
    /// population and writers are serialized.
    pub(crate) fn census(&self) -> MutexGuard<'_, StandardCensus> {
        self.census.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Loads the configured snapshot and seeds it when empty.
pub(crate) fn open_census(config: &DataConfig) -> Result<StandardCensus, AppError> {
    let mut census = StandardCensus::from_config(config);
    let generated = census.bootstrap()?;
    info!(
        path = %config.snapshot_path.display(),
        patients = census.patients().len(),
        generated,
        "patient census ready"
    );
    Ok(census)
}

pub(crate) fn parse_filter(query: FilterQuery) -> Result<PatientFilter, AppError> {
    Ok(PatientFilter::try_from(query)?)
}
