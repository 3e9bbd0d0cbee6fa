use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::scoring::cache::DEFAULT_DECIMAL_PLACES;
use crate::scoring::policy::{PolicySchedule, ScheduleError};

/// Highest number of decimal places the cache may be configured to keep.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Distinguishes runtime behavior for different stages of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEnvironment {
    Development,
    Test,
    Production,
}

impl EngineEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the scoring engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub environment: EngineEnvironment,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = EngineEnvironment::from_str(
            &env::var("SLOTY_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let schedule_path = env::var("SLOTY_POLICY_SCHEDULE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let decimal_places = match env::var("SLOTY_DECIMAL_PLACES") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|places| *places <= MAX_DECIMAL_PLACES)
                .ok_or(ConfigError::InvalidDecimalPlaces)?,
            Err(_) => DEFAULT_DECIMAL_PLACES,
        };

        let log_level = env::var("SLOTY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringConfig {
                schedule_path,
                decimal_places,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }

    pub fn schedule(&self) -> Result<PolicySchedule, ConfigError> {
        self.scoring.schedule()
    }
}

/// Settings controlling policy tables and cached precision.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub schedule_path: Option<PathBuf>,
    pub decimal_places: u32,
}

impl ScoringConfig {
    /// The schedule file when one is configured, otherwise the built-in tables.
    pub fn schedule(&self) -> Result<PolicySchedule, ConfigError> {
        match &self.schedule_path {
            Some(path) => PolicySchedule::from_json_file(path).map_err(ConfigError::Schedule),
            None => Ok(PolicySchedule::default()),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDecimalPlaces,
    Schedule(ScheduleError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDecimalPlaces => write!(
                f,
                "SLOTY_DECIMAL_PLACES must be an integer between 0 and {}",
                MAX_DECIMAL_PLACES
            ),
            ConfigError::Schedule(err) => write!(f, "SLOTY_POLICY_SCHEDULE: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidDecimalPlaces => None,
            ConfigError::Schedule(err) => Some(err),
        }
    }
}
