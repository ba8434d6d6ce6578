use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

pub const DEFAULT_DISPLAY_THRESHOLD: usize = 50;
pub const DEFAULT_MIN_SAMPLE_SIZE: usize = 100;
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;
pub const DEFAULT_TOP_PAIRS: usize = 10;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegistryConfig {
    pub archive_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Above this many segments a matrix is reported as a sorted list.
    pub display_threshold: usize,
    /// Segments with fewer samples are left out of pairwise KS tests.
    pub min_sample_size: usize,
    pub significance: f64,
    pub top_pairs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            display_threshold: DEFAULT_DISPLAY_THRESHOLD,
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
            significance: DEFAULT_SIGNIFICANCE,
            top_pairs: DEFAULT_TOP_PAIRS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
    /// Emit log lines as JSON objects.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    pub analysis: AnalysisConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from("config", &run_mode)
    }

    pub fn load_from(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("analysis.display_threshold", DEFAULT_DISPLAY_THRESHOLD as u64)?
            .set_default("analysis.min_sample_size", DEFAULT_MIN_SAMPLE_SIZE as u64)?
            .set_default("analysis.significance", DEFAULT_SIGNIFICANCE)?
            .set_default("analysis.top_pairs", DEFAULT_TOP_PAIRS as u64)?
            .set_default("log.level", "warn")?
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            .add_source(Environment::with_prefix("INTERSEG").separator("__"));

        builder.build()?.try_deserialize()
    }
}
