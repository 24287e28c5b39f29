use super::domain::Patient;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is not a valid patient list: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The in-memory patient population, optionally backed by a JSON snapshot.
#[derive(Debug, Default)]
pub struct PopulationStore {
    snapshot_path: Option<PathBuf>,
    patients: Vec<Patient>,
}

impl PopulationStore {
    pub fn in_memory(patients: Vec<Patient>) -> Self {
        Self {
            snapshot_path: None,
            patients,
        }
    }

    /// Empty population that saves to `path`, ignoring anything already there.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: Some(path.into()),
            patients: Vec::new(),
        }
    }

    /// Loads the snapshot at `path`. A missing or unreadable snapshot yields an
    /// empty population that will still save back to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let patients = match read_snapshot(&path) {
            Ok(patients) => {
                debug!(path = %path.display(), count = patients.len(), "loaded patient snapshot");
                patients
            }
            Err(StoreError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no patient snapshot yet");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "discarding unreadable patient snapshot");
                Vec::new()
            }
        };

        Self {
            snapshot_path: Some(path),
            patients,
        }
    }

    pub fn save(&self) -> Result<(), StoreError> {
        match &self.snapshot_path {
            Some(path) => write_snapshot(path, &self.patients),
            None => Ok(()),
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn patients_mut(&mut self) -> &mut [Patient] {
        &mut self.patients
    }

    pub fn replace(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
    }

    pub fn extend(&mut self, patients: impl IntoIterator<Item = Patient>) {
        self.patients.extend(patients);
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

pub fn read_snapshot(path: &Path) -> Result<Vec<Patient>, StoreError> {
    let raw = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_snapshot(path: &Path, patients: &[Patient]) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let json = serde_json::to_vec_pretty(patients).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_error)
}
