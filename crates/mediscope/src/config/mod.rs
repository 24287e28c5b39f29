use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the population snapshot lives and how large generated batches are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub snapshot_path: PathBuf,
    pub initial_patients: usize,
    pub refresh_patients: usize,
    pub seed: Option<u64>,
}

impl DataConfig {
    pub const DEFAULT_SNAPSHOT_PATH: &'static str = "data/patients.json";
    pub const DEFAULT_INITIAL_PATIENTS: usize = 50;
    pub const DEFAULT_REFRESH_PATIENTS: usize = 5;

    fn from_env() -> Result<Self, ConfigError> {
        let snapshot_path = env::var("MEDISCOPE_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(Self::DEFAULT_SNAPSHOT_PATH));

        Ok(Self {
            snapshot_path,
            initial_patients: number_var("MEDISCOPE_INITIAL_PATIENTS")?
                .unwrap_or(Self::DEFAULT_INITIAL_PATIENTS),
            refresh_patients: number_var("MEDISCOPE_REFRESH_PATIENTS")?
                .unwrap_or(Self::DEFAULT_REFRESH_PATIENTS),
            seed: number_var("MEDISCOPE_SEED")?,
        })
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(Self::DEFAULT_SNAPSHOT_PATH),
            initial_patients: Self::DEFAULT_INITIAL_PATIENTS,
            refresh_patients: Self::DEFAULT_REFRESH_PATIENTS,
            seed: None,
        }
    }
}

fn number_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        _ => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MEDISCOPE_DATA_PATH",
            "MEDISCOPE_INITIAL_PATIENTS",
            "MEDISCOPE_REFRESH_PATIENTS",
            "MEDISCOPE_SEED",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_population_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("MEDISCOPE_DATA_PATH", "/var/lib/mediscope/ward.json");
        env::set_var("MEDISCOPE_INITIAL_PATIENTS", "120");
        env::set_var("MEDISCOPE_REFRESH_PATIENTS", " 8 ");
        env::set_var("MEDISCOPE_SEED", "42");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.data.snapshot_path,
            PathBuf::from("/var/lib/mediscope/ward.json")
        );
        assert_eq!(config.data.initial_patients, 120);
        assert_eq!(config.data.refresh_patients, 8);
        assert_eq!(config.data.seed, Some(42));
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_batch_size() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MEDISCOPE_INITIAL_PATIENTS", "lots");

        let err = AppConfig::load().expect_err("invalid number");
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                name: "MEDISCOPE_INITIAL_PATIENTS",
                ..
            }
        ));
        reset_env();
    }
}
