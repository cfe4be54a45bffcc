//! Configuration management for autodeploy
//!
//! Settings come from environment variables with built-in defaults. The
//! configuration feeds the scanner bounds, the fetcher limits and the values
//! interpolated into templates.
//!
//! # Environment Variables
//!
//! - `AUTODEPLOY_LOG_LEVEL`: Logging level - default: "info"
//! - `AUTODEPLOY_FETCH_TIMEOUT`: Download timeout in seconds - default: "30"
//! - `AUTODEPLOY_MAX_ARCHIVE_BYTES`: Archive size ceiling - default: "104857600" (100MB)
//! - `AUTODEPLOY_SCAN_MAX_DEPTH`: Directory depth walked by the inspector - default: "6"
//! - `AUTODEPLOY_SCAN_MAX_FILES`: Files examined by the inspector - default: "5000"
//! - `AUTODEPLOY_OUTPUT_ROOT`: Parent of `deployment_<name>/` - default: "."
//! - `AUTODEPLOY_AWS_REGION`: default: "us-west-2"
//! - `AUTODEPLOY_GCP_REGION`: default: "us-central1"
//! - `AUTODEPLOY_AZURE_LOCATION`: default: "eastus"
//!
//! # Example
//!
//! ```no_run
//! use autodeploy::AutodeployConfig;
//!
//! let config = AutodeployConfig::from_env().expect("Invalid environment");
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::fetch::{FetchConfig, GITHUB_BASE};
use crate::generate::GeneratorSettings;
use crate::inspect::ScanConfig;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ARCHIVE_BYTES: u64 = 104_857_600;
const DEFAULT_SCAN_MAX_DEPTH: usize = 6;
const DEFAULT_SCAN_MAX_FILES: usize = 5000;
const DEFAULT_OUTPUT_ROOT: &str = ".";

const MAX_FETCH_TIMEOUT_SECS: u64 = 600;
const MIN_ARCHIVE_BYTES: u64 = 1024;
const MAX_ARCHIVE_BYTES: u64 = 1_073_741_824;
const MAX_SCAN_DEPTH: usize = 32;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutodeployConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Repository download timeout in seconds
    pub fetch_timeout_secs: u64,

    /// Largest archive accepted, in bytes
    pub max_archive_bytes: u64,

    pub scan_max_depth: usize,
    pub scan_max_files: usize,

    /// Directory under which `deployment_<name>/` is created
    pub output_root: PathBuf,

    pub aws_region: String,
    pub gcp_region: String,
    pub azure_location: String,
}

impl Default for AutodeployConfig {
    fn default() -> Self {
        let settings = GeneratorSettings::default();
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_archive_bytes: DEFAULT_MAX_ARCHIVE_BYTES,
            scan_max_depth: DEFAULT_SCAN_MAX_DEPTH,
            scan_max_files: DEFAULT_SCAN_MAX_FILES,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            aws_region: settings.aws_region,
            gcp_region: settings.gcp_region,
            azure_location: settings.azure_location,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env_string(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                field: key.to_string(),
                error: format!("'{}': {}", raw, e),
            }),
    }
}

impl AutodeployConfig {
    /// Loads `AUTODEPLOY_*` variables over the defaults. Unset or blank
    /// variables keep their default; malformed numbers are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            log_level: env_string("AUTODEPLOY_LOG_LEVEL")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.log_level),
            fetch_timeout_secs: env_parsed("AUTODEPLOY_FETCH_TIMEOUT")?
                .unwrap_or(defaults.fetch_timeout_secs),
            max_archive_bytes: env_parsed("AUTODEPLOY_MAX_ARCHIVE_BYTES")?
                .unwrap_or(defaults.max_archive_bytes),
            scan_max_depth: env_parsed("AUTODEPLOY_SCAN_MAX_DEPTH")?
                .unwrap_or(defaults.scan_max_depth),
            scan_max_files: env_parsed("AUTODEPLOY_SCAN_MAX_FILES")?
                .unwrap_or(defaults.scan_max_files),
            output_root: env_string("AUTODEPLOY_OUTPUT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_root),
            aws_region: env_string("AUTODEPLOY_AWS_REGION").unwrap_or(defaults.aws_region),
            gcp_region: env_string("AUTODEPLOY_GCP_REGION").unwrap_or(defaults.gcp_region),
            azure_location: env_string("AUTODEPLOY_AZURE_LOCATION")
                .unwrap_or(defaults.azure_location),
        })
    }

    /// Validates the configuration
    ///
    /// Checks that numeric values are in range, the log level is known and
    /// region names are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Fetch timeout must be at least 1 second".to_string(),
            ));
        }
        if self.fetch_timeout_secs > MAX_FETCH_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Fetch timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.max_archive_bytes < MIN_ARCHIVE_BYTES {
            return Err(ConfigError::ValidationFailed(
                "Max archive size must be at least 1KB".to_string(),
            ));
        }
        if self.max_archive_bytes > MAX_ARCHIVE_BYTES {
            return Err(ConfigError::ValidationFailed(
                "Max archive size cannot exceed 1GB".to_string(),
            ));
        }

        if self.scan_max_depth == 0 || self.scan_max_depth > MAX_SCAN_DEPTH {
            return Err(ConfigError::ValidationFailed(format!(
                "Scan depth must be between 1 and {}",
                MAX_SCAN_DEPTH
            )));
        }
        if self.scan_max_files == 0 {
            return Err(ConfigError::ValidationFailed(
                "Scan file limit must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        for (field, value) in [
            ("aws_region", &self.aws_region),
            ("gcp_region", &self.gcp_region),
            ("azure_location", &self.azure_location),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!("{} is empty", field)));
            }
        }

        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_depth: self.scan_max_depth,
            max_files: self.scan_max_files,
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            max_archive_bytes: self.max_archive_bytes,
            github_base: GITHUB_BASE.to_string(),
        }
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            aws_region: self.aws_region.clone(),
            gcp_region: self.gcp_region.clone(),
            azure_location: self.azure_location.clone(),
            ..GeneratorSettings::default()
        }
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert(
            "fetch_timeout_secs".to_string(),
            self.fetch_timeout_secs.to_string(),
        );
        map.insert(
            "max_archive_bytes".to_string(),
            self.max_archive_bytes.to_string(),
        );
        map.insert("scan_max_depth".to_string(), self.scan_max_depth.to_string());
        map.insert("scan_max_files".to_string(), self.scan_max_files.to_string());
        map.insert(
            "output_root".to_string(),
            self.output_root.display().to_string(),
        );
        map.insert("aws_region".to_string(), self.aws_region.clone());
        map.insert("gcp_region".to_string(), self.gcp_region.clone());
        map.insert("azure_location".to_string(), self.azure_location.clone());

        map
    }
}

impl fmt::Display for AutodeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Autodeploy Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Fetch Timeout: {}s", self.fetch_timeout_secs)?;
        writeln!(f, "  Max Archive Size: {} bytes", self.max_archive_bytes)?;
        writeln!(
            f,
            "  Scan Bounds: depth {}, {} files",
            self.scan_max_depth, self.scan_max_files
        )?;
        writeln!(f, "  Output Root: {}", self.output_root.display())?;
        writeln!(
            f,
            "  Regions: aws={}, gcp={}, azure={}",
            self.aws_region, self.gcp_region, self.azure_location
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    const ALL_VARS: &[&str] = &[
        "AUTODEPLOY_LOG_LEVEL",
        "AUTODEPLOY_FETCH_TIMEOUT",
        "AUTODEPLOY_MAX_ARCHIVE_BYTES",
        "AUTODEPLOY_SCAN_MAX_DEPTH",
        "AUTODEPLOY_SCAN_MAX_FILES",
        "AUTODEPLOY_OUTPUT_ROOT",
        "AUTODEPLOY_AWS_REGION",
        "AUTODEPLOY_GCP_REGION",
        "AUTODEPLOY_AZURE_LOCATION",
    ];

    fn clear_env() -> Vec<EnvGuard> {
        ALL_VARS.iter().map(|key| EnvGuard::unset(key)).collect()
    }

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        let _guards = clear_env();
        let config = AutodeployConfig::from_env().unwrap();
        assert_eq!(config, AutodeployConfig::default());
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.max_archive_bytes, 100 * 1024 * 1024);
        assert_eq!(config.output_root, PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _cleared = clear_env();
        let _guards = vec![
            EnvGuard::set("AUTODEPLOY_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("AUTODEPLOY_FETCH_TIMEOUT", "90"),
            EnvGuard::set("AUTODEPLOY_MAX_ARCHIVE_BYTES", "2048"),
            EnvGuard::set("AUTODEPLOY_SCAN_MAX_DEPTH", "3"),
            EnvGuard::set("AUTODEPLOY_SCAN_MAX_FILES", "100"),
            EnvGuard::set("AUTODEPLOY_OUTPUT_ROOT", "/tmp/bundles"),
            EnvGuard::set("AUTODEPLOY_AWS_REGION", "eu-west-1"),
        ];

        let config = AutodeployConfig::from_env().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.fetch_timeout_secs, 90);
        assert_eq!(config.max_archive_bytes, 2048);
        assert_eq!(config.output_root, PathBuf::from("/tmp/bundles"));
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.gcp_region, "us-central1");

        assert_eq!(
            config.scan_config(),
            ScanConfig {
                max_depth: 3,
                max_files: 100
            }
        );
        assert_eq!(config.fetch_config().timeout, Duration::from_secs(90));
        assert_eq!(config.generator_settings().aws_region, "eu-west-1");
        assert_eq!(config.generator_settings().cpu, 256);
    }

    #[test]
    #[serial]
    fn test_malformed_number_is_a_parse_error() {
        let _cleared = clear_env();
        let _guard = EnvGuard::set("AUTODEPLOY_FETCH_TIMEOUT", "soon");

        let err = AutodeployConfig::from_env().unwrap_err();
        match err {
            ConfigError::ParseError { field, error } => {
                assert_eq!(field, "AUTODEPLOY_FETCH_TIMEOUT");
                assert!(error.contains("soon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_blank_variable_keeps_default() {
        let _cleared = clear_env();
        let _guard = EnvGuard::set("AUTODEPLOY_SCAN_MAX_FILES", "  ");
        let config = AutodeployConfig::from_env().unwrap();
        assert_eq!(config.scan_max_files, DEFAULT_SCAN_MAX_FILES);
    }

    #[test]
    fn test_validation_bounds() {
        let invalid = [
            AutodeployConfig {
                fetch_timeout_secs: 0,
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                fetch_timeout_secs: 601,
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                max_archive_bytes: 512,
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                max_archive_bytes: MAX_ARCHIVE_BYTES + 1,
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                scan_max_depth: 0,
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                scan_max_depth: 33,
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                scan_max_files: 0,
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                log_level: "loud".to_string(),
                ..AutodeployConfig::default()
            },
            AutodeployConfig {
                gcp_region: " ".to_string(),
                ..AutodeployConfig::default()
            },
        ];

        for config in invalid {
            assert!(
                matches!(config.validate(), Err(ConfigError::ValidationFailed(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_display_and_map() {
        let config = AutodeployConfig::default();
        let display = config.to_string();
        assert!(display.contains("Autodeploy Configuration:"));
        assert!(display.contains("aws=us-west-2"));

        let map = config.to_display_map();
        assert_eq!(map.get("scan_max_depth").map(String::as_str), Some("6"));
        assert_eq!(map.len(), 9);
    }
}
