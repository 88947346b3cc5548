use crate::domain::error::RewardError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_PROXIMITY_BUFFER: f64 = 10.0;
pub const DEFAULT_ATTRACTION_PROXIMITY_RANGE: f64 = 200.0;
pub const DEFAULT_CELL_SIZE: f64 = 0.01;

/// Largest pool the worker semaphore can be built with
pub const MAX_WORKERS: usize = if Semaphore::MAX_PERMITS < u32::MAX as usize {
    Semaphore::MAX_PERMITS
} else {
    u32::MAX as usize
};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub reward_points: RewardPointsConfig,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineSettings {
    /// Radius in miles a visit must fall within to earn a reward
    #[serde(default = "default_proximity_buffer")]
    pub proximity_buffer_miles: f64,
    #[serde(default = "default_attraction_proximity_range")]
    pub attraction_proximity_range_miles: f64,
    /// Grid cell edge in degrees
    #[serde(default = "default_cell_size")]
    pub cell_size_degrees: f64,
    /// Worker pool size, 0 = 2 × available parallelism
    #[serde(default)]
    pub workers: usize,
    /// Overall deadline for both fan-out phases of one calculation
    pub deadline_ms: Option<u64>,
    #[serde(default = "default_distance_cache")]
    pub distance_cache: bool,
    #[serde(default = "default_nearby_limit")]
    pub nearby_limit: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RewardPointsConfig {
    /// Simulated latency of the built-in points provider
    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Logging {
    /// `tracing` filter directive for the configured level
    pub fn filter_level(&self) -> &'static str {
        match self.level.as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" => "warn",
            "ERROR" => "error",
            _ => "warn",
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            proximity_buffer_miles: DEFAULT_PROXIMITY_BUFFER,
            attraction_proximity_range_miles: DEFAULT_ATTRACTION_PROXIMITY_RANGE,
            cell_size_degrees: DEFAULT_CELL_SIZE,
            workers: 0,
            deadline_ms: None,
            distance_cache: true,
            nearby_limit: 5,
        }
    }
}

impl EngineSettings {
    /// Rejects settings the engine cannot run with
    pub fn validate(&self) -> Result<(), RewardError> {
        validate_buffer(self.proximity_buffer_miles)?;
        validate_buffer(self.attraction_proximity_range_miles)?;
        if !(self.cell_size_degrees.is_finite() && self.cell_size_degrees > 0.0) {
            return Err(RewardError::Config(format!(
                "cell size must be a positive number of degrees, got {}",
                self.cell_size_degrees
            )));
        }
        if self.workers > MAX_WORKERS {
            return Err(RewardError::Config(format!(
                "workers must be at most {}, got {}",
                MAX_WORKERS, self.workers
            )));
        }
        if self.nearby_limit == 0 {
            return Err(RewardError::Config(
                "nearby_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get() * 2)
            .unwrap_or(2)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// A proximity radius must be a non-negative number (infinity allowed)
pub fn validate_buffer(miles: f64) -> Result<(), RewardError> {
    if miles.is_nan() || miles < 0.0 {
        return Err(RewardError::Config(format!(
            "proximity radius must be a non-negative number of miles, got {}",
            miles
        )));
    }
    Ok(())
}

// Defaults
fn default_proximity_buffer() -> f64 {
    DEFAULT_PROXIMITY_BUFFER
}
fn default_attraction_proximity_range() -> f64 {
    DEFAULT_ATTRACTION_PROXIMITY_RANGE
}
fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}
fn default_distance_cache() -> bool {
    true
}
fn default_nearby_limit() -> usize {
    5
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tour-rewards").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<Config, RewardError> {
    let config = toml::from_str::<Config>(content)?;
    config.engine.validate()?;
    Ok(config)
}

pub fn load_config() -> Result<Config, RewardError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match parse_config(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "Failed to parse config file: {}. Using defaults.",
                        e
                    );
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), RewardError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        // Create directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| RewardError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| RewardError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(RewardError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
