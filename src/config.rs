//! Pipeline configuration loaded from YAML.

use crate::error::{ParseError, PipelineError};
use crate::matcher::MatcherConfig;
use crate::normalize::DateFormat;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Locations searched by [`PipelineConfig::load`] when no path is given.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["config/config.yaml", "config.yaml"];

/// Everything a pipeline run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Drug list CSV
    pub drugs_path: PathBuf,
    /// PubMed CSV export
    pub pubmed_csv_path: PathBuf,
    /// PubMed JSON export, repaired in place if it has trailing commas
    pub pubmed_json_path: PathBuf,
    /// Clinical trials CSV
    pub clinical_trials_path: PathBuf,
    /// Link graph output
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Directory for the `<source>_raw.csv` snapshots
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,
    /// Consolidated PubMed CSV written by the `consolidate` step
    #[serde(default = "default_consolidated_path")]
    pub consolidated_path: PathBuf,
    /// Extra attempts per task after a failure
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Pause before each retry
    #[serde(default)]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub dates: DateConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
}

/// Canonical date format per dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateConfig {
    pub clinical_trials: DateFormat,
    pub pubmed: DateFormat,
    pub consolidated: DateFormat,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            clinical_trials: DateFormat::DayMonthYear,
            pubmed: DateFormat::YearMonthDay,
            consolidated: DateFormat::DayMonthYear,
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("dags/output/graph.json")
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("dags/raw")
}

fn default_consolidated_path() -> PathBuf {
    PathBuf::from("data/pubmed_.csv")
}

fn default_retries() -> u32 {
    1
}

impl PipelineConfig {
    /// Configuration with the four source paths and defaults for everything else.
    pub fn new(
        drugs_path: impl Into<PathBuf>,
        pubmed_csv_path: impl Into<PathBuf>,
        pubmed_json_path: impl Into<PathBuf>,
        clinical_trials_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            drugs_path: drugs_path.into(),
            pubmed_csv_path: pubmed_csv_path.into(),
            pubmed_json_path: pubmed_json_path.into(),
            clinical_trials_path: clinical_trials_path.into(),
            output_path: default_output_path(),
            raw_dir: default_raw_dir(),
            consolidated_path: default_consolidated_path(),
            retries: default_retries(),
            retry_delay_ms: 0,
            dates: DateConfig::default(),
            matcher: MatcherConfig::default(),
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(storage: &dyn Storage, path: &Path) -> Result<Self, PipelineError> {
        let content = storage
            .read_to_string(path)
            .map_err(|e| PipelineError::io(path, e))?;
        let config = Self::from_yaml_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from `path`, or from the first of
    /// [`DEFAULT_CONFIG_PATHS`] that `storage` can read.
    pub fn load(storage: &dyn Storage, path: Option<&Path>) -> Result<Self, PipelineError> {
        if let Some(path) = path {
            return Self::from_file(storage, path);
        }

        for candidate in DEFAULT_CONFIG_PATHS.iter().map(Path::new) {
            match storage.read_to_string(candidate) {
                Ok(content) => {
                    let config = Self::from_yaml_str(&content)?;
                    log::info!("Loaded config from {}", candidate.display());
                    return Ok(config);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(PipelineError::io(candidate, e)),
            }
        }

        Err(PipelineError::Config(format!(
            "no configuration file found (looked for {})",
            DEFAULT_CONFIG_PATHS.join(", ")
        )))
    }

    /// Reject empty paths.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let paths = [
            ("drugs_path", &self.drugs_path),
            ("pubmed_csv_path", &self.pubmed_csv_path),
            ("pubmed_json_path", &self.pubmed_json_path),
            ("clinical_trials_path", &self.clinical_trials_path),
            ("output_path", &self.output_path),
            ("raw_dir", &self.raw_dir),
            ("consolidated_path", &self.consolidated_path),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(PipelineError::Config(format!("'{key}' must not be empty")));
            }
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Render the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, PipelineError> {
        serde_yaml::to_string(self).map_err(|e| PipelineError::Parse(e.into()))
    }
}
