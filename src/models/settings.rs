use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Where and how profiled statements are logged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilerSettings {
    /// Log target every profiler line is tagged with
    pub channel: String,
    /// Severity of the emitted lines
    pub level: LogLevel,
    /// Default filter for the logging backend when RUST_LOG is not set
    pub filter: LogLevel,
}

impl Default for ProfilerSettings {
    fn default() -> Self {
        ProfilerSettings {
            channel: "SqlLogger".to_string(),
            level: LogLevel::Debug,
            filter: LogLevel::Info,
        }
    }
}

impl ProfilerSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = ProfilerSettings::default();
        assert_eq!(settings.channel, "SqlLogger");
        assert_eq!(settings.level, LogLevel::Debug);
        assert_eq!(settings.filter, LogLevel::Info);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = ProfilerSettings::from_json(r#"{"channel":"Audit"}"#).unwrap();
        assert_eq!(settings.channel, "Audit");
        assert_eq!(settings.level, LogLevel::Debug);
    }

    #[test]
    fn test_level_names() {
        let settings =
            ProfilerSettings::from_json(r#"{"level":"trace","filter":"warn"}"#).unwrap();
        assert_eq!(settings.level, LogLevel::Trace);
        assert_eq!(log::Level::from(settings.filter), log::Level::Warn);
        assert_eq!(settings.level.to_string(), "trace");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(ProfilerSettings::from_json("{not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"channel":"Sql","level":"info"}}"#).unwrap();

        let settings = ProfilerSettings::load(file.path()).unwrap();
        assert_eq!(settings.channel, "Sql");
        assert_eq!(settings.level, LogLevel::Info);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProfilerSettings::load(Path::new("/nonexistent/profiler.json")).unwrap_err();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
