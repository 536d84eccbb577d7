//! Configuration for frc-filter-tool
//!
//! A single [`ToolConfig`] carries:
//! - default filter design parameters applied to new filter nodes
//! - acquisition tuning for sample sources (queue capacity, batch size, poll interval)
//! - the live telemetry endpoint
//! - logging filter and optional log file
//!
//! # Config Location
//!
//! The default file lives in the platform config directory:
//! - **Linux**: `~/.config/frc-filter-tool/config.toml`
//! - **macOS**: `~/Library/Application Support/frc-filter-tool/config.toml`
//! - **Windows**: `%APPDATA%\frc-filter-tool\config.toml`
//!
//! Files ending in `.json` are read and written as JSON, everything else as TOML.
//!
//! # Example
//!
//! ```ignore
//! use frc_filter_tool::config::ToolConfig;
//!
//! let mut config = ToolConfig::load_or_default("robot.toml");
//! config.source.queue_capacity = 8192;
//! config.save("robot.toml")?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FilterToolError, Result};
use crate::filter::{DesignParams, FilterParameter};
use crate::source::LiveEndpoint;

/// Application identifier for config directories
pub const APP_ID: &str = "frc-filter-tool";

/// Config filename inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default sample queue capacity per source
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Default number of samples a log replay pushes per tick
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Default acquisition poll interval in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

// ==================== Config Directory ====================

/// Platform config directory for this tool
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Ensure the config directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().ok_or_else(|| {
        FilterToolError::Config("Could not determine config directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            FilterToolError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Path of the default config file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== File Format ====================

/// On-disk encoding, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

// ==================== Tool Config ====================

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Parameters new filter nodes start from
    #[serde(default)]
    pub filter: DesignParams,

    /// Acquisition tuning
    #[serde(default)]
    pub source: SourceSettings,

    /// Live telemetry endpoint
    #[serde(default)]
    pub live: LiveEndpoint,

    /// Logging setup
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FilterToolError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;

        let config: Self = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| {
                FilterToolError::Config(format!("Failed to parse config {:?}: {}", path, e))
            })?,
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| {
                FilterToolError::Config(format!("Failed to parse config {:?}: {}", path, e))
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Load from the platform config directory, defaults if absent
    pub fn load_default_location() -> Self {
        match default_config_path() {
            Some(path) => Self::load_or_default(path),
            None => Self::default(),
        }
    }

    /// Save to `path`, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    FilterToolError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| {
                FilterToolError::Config(format!("Failed to serialize config: {}", e))
            })?,
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                FilterToolError::Config(format!("Failed to serialize config: {}", e))
            })?,
        };

        std::fs::write(path, content).map_err(|e| {
            FilterToolError::Config(format!("Failed to write config {:?}: {}", path, e))
        })
    }

    /// Save to the platform config directory
    pub fn save_default_location(&self) -> Result<PathBuf> {
        let path = ensure_config_dir()?.join(CONFIG_FILE);
        self.save(&path)?;
        Ok(path)
    }

    /// Reject values the filters or sources would refuse
    pub fn validate(&self) -> Result<()> {
        let mut checked = DesignParams::default();
        for param in FilterParameter::ALL {
            checked.set(param, self.filter.get(param))?;
        }
        if self.source.queue_capacity == 0 {
            return Err(FilterToolError::Config(
                "source.queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.source.batch_size == 0 {
            return Err(FilterToolError::Config(
                "source.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ==================== Source Settings ====================

/// Sample source tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Samples buffered per source before back-pressure or eviction
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Samples a log replay pushes per tick
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Sleep between replay ticks and receive timeout for live sources
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Log file layout; picked from the extension when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<LogFileType>,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            file_type: None,
        }
    }
}

impl SourceSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Configured file type, else the one implied by `path`
    pub fn file_type_for(&self, path: &Path) -> LogFileType {
        self.file_type.unwrap_or_else(|| LogFileType::from_path(path))
    }
}

/// Layout of a log file read by a log source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFileType {
    /// Binary WPILOG
    Wpilog,
    /// Text columns, comma or whitespace separated
    Csv,
}

impl LogFileType {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext)
                if ["csv", "txt", "tsv"]
                    .iter()
                    .any(|t| ext.eq_ignore_ascii_case(t)) =>
            {
                LogFileType::Csv
            }
            _ => LogFileType::Wpilog,
        }
    }
}

// ==================== Logging ====================

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Also write logs to this file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.filter.order, 2);
        assert_eq!(config.filter.sample_rate, 44100.0);
        assert_eq!(config.source.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.logging.filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Toml);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tool.toml");

        let mut config = ToolConfig::default();
        config.filter.cutoff_freq = 12.5;
        config.source.batch_size = 32;
        config.source.file_type = Some(LogFileType::Csv);
        config.live.team_number = Some(254);
        config.save(&path).unwrap();

        let loaded = ToolConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool.json");

        let mut config = ToolConfig::default();
        config.logging.file = Some(PathBuf::from("/tmp/filter.log"));
        config.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.trim_start().starts_with('{'));
        assert_eq!(ToolConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ToolConfig = toml::from_str(
            r#"
            [filter]
            cutoffFreq = 5.0

            [source]
            queue_capacity = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.filter.cutoff_freq, 5.0);
        assert_eq!(config.filter.order, 2);
        assert_eq!(config.source.queue_capacity, 16);
        assert_eq!(config.source.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.source.file_type, None);
    }

    #[test]
    fn test_log_file_type() {
        assert_eq!(LogFileType::from_path(Path::new("m.wpilog")), LogFileType::Wpilog);
        assert_eq!(LogFileType::from_path(Path::new("m.CSV")), LogFileType::Csv);
        assert_eq!(LogFileType::from_path(Path::new("m.txt")), LogFileType::Csv);
        assert_eq!(LogFileType::from_path(Path::new("m")), LogFileType::Wpilog);

        let mut source: SourceSettings = toml::from_str("file_type = \"csv\"").unwrap();
        assert_eq!(source.file_type_for(Path::new("m.wpilog")), LogFileType::Csv);
        source.file_type = None;
        assert_eq!(source.file_type_for(Path::new("m.wpilog")), LogFileType::Wpilog);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[filter]\norder = 0\n").unwrap();
        assert!(matches!(
            ToolConfig::load(&path),
            Err(FilterToolError::Filter(_))
        ));
        assert_eq!(ToolConfig::load_or_default(&path), ToolConfig::default());

        let mut config = ToolConfig::default();
        config.source.queue_capacity = 0;
        assert!(matches!(config.validate(), Err(FilterToolError::Config(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolConfig::load_or_default(dir.path().join("absent.toml"));
        assert_eq!(config, ToolConfig::default());
    }
}
