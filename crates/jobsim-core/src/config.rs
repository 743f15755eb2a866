//! Configuration model: the immutable parameters a run is driven by,
//! and the JSON file format they are loaded from.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{JobsimError, Result};
use crate::worker::WorkerTier;

/// `(tag, weight, execution duration)` for one job class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobClass {
    pub tag: String,
    pub execution_duration: i64,
    pub weight: u32,
}

/// `(tag, weight, max jobs per request)` for one user class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserClass {
    pub tag: String,
    pub weight: u32,
    pub max_jobs_per_request: u32,
}

/// Immutable parameters consumed by the generator, pool, and kernel.
///
/// Constructed once (via [`Configuration::load`] or [`Configuration::default_config`])
/// and then passed by reference into every component that needs it —
/// not kept in a module-global singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub job_classes: Vec<JobClass>,
    pub user_classes: Vec<UserClass>,
    pub worker_tiers: Vec<WorkerTier>,
    pub lambda_per_hour: u32,
}

impl Configuration {
    /// A small, fast-to-reason-about configuration used when no config
    /// file is given and when a missing file is tolerated.
    pub fn default_config() -> Self {
        Configuration {
            job_classes: vec![JobClass {
                tag: "M".into(),
                execution_duration: 240,
                weight: 1,
            }],
            user_classes: vec![UserClass {
                tag: "C".into(),
                weight: 1,
                max_jobs_per_request: 1,
            }],
            worker_tiers: vec![WorkerTier {
                tag: "H".into(),
                capacity: 4,
                priority: 1,
                startup_latency: 0,
                shutdown_latency: 0,
            }],
            lambda_per_hour: 100,
        }
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// A missing file falls back to [`Configuration::default_config`] with a
    /// warning logged — mirroring the original source's
    /// `SimulationConfig.load_from_json` fallback behavior. Invalid JSON in a
    /// file that *does* exist is surfaced as an error rather than silently
    /// falling back, since a present-but-corrupt file is more likely a
    /// mistake the user should hear about.
    pub fn load(path: &Path) -> Result<Configuration> {
        if !path.exists() {
            log::warn!(
                "configuration file '{}' not found, using default configuration",
                path.display()
            );
            return Ok(Configuration::default_config());
        }
        let text = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&text)?;
        let config: Configuration = file.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration inconsistency checks (§7: fail fast at load).
    pub fn validate(&self) -> Result<()> {
        if self.job_classes.is_empty() {
            return Err(JobsimError::Configuration("no job classes defined".into()));
        }
        if self.user_classes.is_empty() {
            return Err(JobsimError::Configuration("no user classes defined".into()));
        }
        if self.worker_tiers.is_empty() {
            return Err(JobsimError::Configuration("no worker tiers defined".into()));
        }
        if self.lambda_per_hour == 0 {
            return Err(JobsimError::Configuration(
                "lambda_users_requests_per_hour must be positive".into(),
            ));
        }

        let mut seen = HashSet::new();
        for jc in &self.job_classes {
            if !seen.insert(jc.tag.as_str()) {
                return Err(JobsimError::Configuration(format!("duplicate job class tag '{}'", jc.tag)));
            }
            if jc.execution_duration <= 0 {
                return Err(JobsimError::Configuration(format!(
                    "job class '{}' has non-positive execution duration",
                    jc.tag
                )));
            }
            if jc.weight == 0 {
                return Err(JobsimError::Configuration(format!("job class '{}' has zero weight", jc.tag)));
            }
        }

        let mut seen = HashSet::new();
        for uc in &self.user_classes {
            if !seen.insert(uc.tag.as_str()) {
                return Err(JobsimError::Configuration(format!("duplicate user class tag '{}'", uc.tag)));
            }
            if uc.weight == 0 {
                return Err(JobsimError::Configuration(format!("user class '{}' has zero weight", uc.tag)));
            }
            if uc.max_jobs_per_request == 0 {
                return Err(JobsimError::Configuration(format!(
                    "user class '{}' allows zero jobs per request",
                    uc.tag
                )));
            }
        }

        let mut seen = HashSet::new();
        for wt in &self.worker_tiers {
            if !seen.insert(wt.tag.as_str()) {
                return Err(JobsimError::Configuration(format!("duplicate worker tier tag '{}'", wt.tag)));
            }
            if wt.startup_latency < 0 || wt.shutdown_latency < 0 {
                return Err(JobsimError::Configuration(format!(
                    "worker tier '{}' has a negative latency",
                    wt.tag
                )));
            }
        }

        Ok(())
    }

    pub fn execution_duration(&self, job_class: &str) -> i64 {
        self.job_classes
            .iter()
            .find(|jc| jc.tag == job_class)
            .map(|jc| jc.execution_duration)
            .unwrap_or(0)
    }

    pub fn max_jobs_per_request(&self, user_class: &str) -> u32 {
        self.user_classes
            .iter()
            .find(|uc| uc.tag == user_class)
            .map(|uc| uc.max_jobs_per_request)
            .unwrap_or(1)
    }
}

// --- Wire format (§6 of the specification) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDefinition {
    pub job_type: String,
    pub job_execution_duration: i64,
    pub job_probability: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDefinition {
    pub user_type: String,
    pub user_probability: u32,
    pub num_jobs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerDefinition {
    pub worker_type: String,
    pub pool_size: u32,
    pub pool_priority: i64,
    pub worker_startup_time: i64,
    pub worker_shutdown_time: i64,
}

/// The on-disk JSON shape of a configuration file. Unknown fields are
/// ignored by `serde_json`'s default (non-`deny_unknown_fields`) behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub job_definitions: Vec<JobDefinition>,
    pub user_definitions: Vec<UserDefinition>,
    pub worker_definitions: Vec<WorkerDefinition>,
    pub lambda_users_requests_per_hour: u32,
}

impl TryFrom<ConfigFile> for Configuration {
    type Error = JobsimError;

    fn try_from(file: ConfigFile) -> std::result::Result<Self, Self::Error> {
        Ok(Configuration {
            job_classes: file
                .job_definitions
                .into_iter()
                .map(|d| JobClass {
                    tag: d.job_type,
                    execution_duration: d.job_execution_duration,
                    weight: d.job_probability,
                })
                .collect(),
            user_classes: file
                .user_definitions
                .into_iter()
                .map(|d| UserClass {
                    tag: d.user_type,
                    weight: d.user_probability,
                    max_jobs_per_request: d.num_jobs,
                })
                .collect(),
            worker_tiers: file
                .worker_definitions
                .into_iter()
                .map(|d| WorkerTier {
                    tag: d.worker_type,
                    capacity: d.pool_size,
                    priority: d.pool_priority,
                    startup_latency: d.worker_startup_time,
                    shutdown_latency: d.worker_shutdown_time,
                })
                .collect(),
            lambda_per_hour: file.lambda_users_requests_per_hour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Configuration::default_config().validate().unwrap();
    }

    #[test]
    fn duplicate_tier_tags_rejected() {
        let mut cfg = Configuration::default_config();
        let tier = cfg.worker_tiers[0].clone();
        cfg.worker_tiers.push(tier);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn nonpositive_lambda_rejected() {
        let mut cfg = Configuration::default_config();
        cfg.lambda_per_hour = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn wire_schema_parses_exact_field_names() {
        let json = r#"{
            "job_definitions": [{"job_type": "S", "job_execution_duration": 60, "job_probability": 10}],
            "user_definitions": [{"user_type": "C", "user_probability": 70, "num_jobs": 2}],
            "worker_definitions": [{"worker_type": "H", "pool_size": 4, "pool_priority": 1, "worker_startup_time": 0, "worker_shutdown_time": 0}],
            "lambda_users_requests_per_hour": 100
        }"#;
        let file: ConfigFile = serde_json::from_str(json).unwrap();
        let config: Configuration = file.try_into().unwrap();
        config.validate().unwrap();
        assert_eq!(config.execution_duration("S"), 60);
        assert_eq!(config.max_jobs_per_request("C"), 2);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = Configuration::load(Path::new("/nonexistent/path/to/jobsim-config.json")).unwrap();
        assert_eq!(config, Configuration::default_config());
    }
}
