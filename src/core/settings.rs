//! Loading configuration from the environment and from JSON settings

use super::{
    config::{LogBuilder, SeverityConfig, DEFAULT_CAPACITY},
    error::{LoggerError, Result},
    fs::Filesystem,
    log::Log,
    severity::Severity,
    timestamp::TimestampFormat,
};
use crate::strategies::{ConsoleStrategy, ConsoleTarget, FileStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static DOTENV: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Load the working directory's `.env` file into the process environment.
///
/// Runs at most once per process; later calls return the first outcome.
/// A missing file is not an error.
pub fn load_dotenv() -> Result<()> {
    let outcome = DOTENV.get_or_init(|| match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.to_string()),
    });
    outcome
        .clone()
        .map_err(|message| LoggerError::config(".env", message))
}

/// Per-severity log file paths taken from `ALOG_LOGGER_*` variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    paths: BTreeMap<Severity, PathBuf>,
}

impl EnvConfig {
    pub fn new(
        info: impl Into<PathBuf>,
        warning: impl Into<PathBuf>,
        error: impl Into<PathBuf>,
    ) -> Self {
        let mut paths = BTreeMap::new();
        paths.insert(Severity::Info, info.into());
        paths.insert(Severity::Warning, warning.into());
        paths.insert(Severity::Error, error.into());
        Self { paths }
    }

    /// Load `.env` (once per process), then read the variables
    pub fn load() -> Result<Self> {
        load_dotenv()?;
        Ok(Self::from_env())
    }

    /// Load a specific env file, then read the variables
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        dotenv::from_path(path.as_ref()).map_err(LoggerError::EnvFile)?;
        Ok(Self::from_env())
    }

    /// Read the variables from the current process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let paths = Severity::ALL
            .into_iter()
            .filter_map(|severity| {
                lookup(severity.env_key())
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| (severity, PathBuf::from(value.trim())))
            })
            .collect();
        Self { paths }
    }

    /// Log file path for `severity`
    pub fn path(&self, severity: Severity) -> Result<&Path> {
        self.paths
            .get(&severity)
            .map(PathBuf::as_path)
            .ok_or_else(|| LoggerError::missing_variable(severity.env_key()))
    }
}

/// JSON description of a logger
///
/// ```
/// use alog::LogSettings;
///
/// let settings = LogSettings::from_json(r#"{
///     "time_format": "rfc3339",
///     "include_caller": true,
///     "severities": {
///         "info": { "console": "stdout", "color": true },
///         "error": { "capacity": 10, "console": "stderr", "files": ["logs/error.log"] }
///     }
/// }"#).unwrap();
/// assert_eq!(settings.severities.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub time_format: TimestampFormat,
    pub include_caller: bool,
    /// Keyed by severity name (`info`, `warning`/`warn`, `error`)
    pub severities: BTreeMap<String, SeveritySettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeveritySettings {
    pub capacity: usize,
    pub console: Option<ConsoleTarget>,
    /// Colorize console output with the severity's color
    pub color: bool,
    pub files: Vec<PathBuf>,
}

impl Default for SeveritySettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            console: None,
            color: false,
            files: Vec::new(),
        }
    }
}

impl LogSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LoggerError::file_io("reading settings", path, e))?;
        Self::from_json(&json)
    }

    /// Turn the settings into a builder.
    ///
    /// Console strategies come first, then files in listed order. Files
    /// that cannot be opened degrade to strategies reporting
    /// "file not defined".
    pub fn builder(&self, fs: &dyn Filesystem) -> Result<LogBuilder> {
        self.time_format.validate()?;
        let mut builder = Log::builder()
            .time_format(self.time_format.clone())
            .include_caller(self.include_caller);

        for (name, settings) in &self.severities {
            let severity: Severity = name
                .parse()
                .map_err(|message: String| LoggerError::config("LogSettings", message))?;

            let mut config = SeverityConfig::new(settings.capacity);
            if let Some(target) = settings.console {
                let mut console = ConsoleStrategy::new(target);
                if settings.color {
                    console = console.with_color(severity.color_code());
                }
                config.add_strategy(Box::new(console));
            }
            for path in &settings.files {
                config.add_strategy(Box::new(FileStrategy::open_with(fs, path)));
            }
            builder = builder.severity(severity, config);
        }
        Ok(builder)
    }

    pub fn build(&self, fs: &dyn Filesystem) -> Result<Log> {
        self.builder(fs)?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fs::MemoryFs;

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let env = EnvConfig::from_lookup(|key| match key {
            "ALOG_LOGGER_INFO" => Some("/logs/info.log".to_string()),
            "ALOG_LOGGER_WARNING" => Some(" /logs/warning.log ".to_string()),
            "ALOG_LOGGER_ERROR" => Some(String::new()),
            _ => None,
        });

        assert_eq!(env.path(Severity::Info).unwrap(), Path::new("/logs/info.log"));
        assert_eq!(
            env.path(Severity::Warning).unwrap(),
            Path::new("/logs/warning.log")
        );
        let err = env.path(Severity::Error).unwrap_err();
        assert!(err.to_string().contains("ALOG_LOGGER_ERROR"));
    }

    #[test]
    fn test_load_from_env_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let env_file = temp_dir.path().join("alog.env");
        std::fs::write(
            &env_file,
            "ALOG_LOGGER_INFO=/tmp/alog-test/info.log\n\
             ALOG_LOGGER_WARNING=/tmp/alog-test/warning.log\n\
             ALOG_LOGGER_ERROR=/tmp/alog-test/error.log\n",
        )
        .unwrap();

        let env = EnvConfig::load_from(&env_file).unwrap();
        assert_eq!(
            env.path(Severity::Error).unwrap(),
            Path::new("/tmp/alog-test/error.log")
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = EnvConfig::load_from("/definitely/not/here.env").unwrap_err();
        assert!(matches!(err, LoggerError::EnvFile(_)));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = LogSettings::from_json(r#"{"severities": {"warn": {}}}"#).unwrap();
        assert_eq!(settings.time_format, TimestampFormat::Rfc3339Nano);
        assert!(!settings.include_caller);
        assert_eq!(settings.severities["warn"].capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_settings_reject_unknown_fields() {
        let err = LogSettings::from_json(r#"{"rotation": "daily"}"#).unwrap_err();
        assert!(matches!(err, LoggerError::Settings(_)));
    }

    #[test]
    fn test_settings_build_against_filesystem() {
        let fs = MemoryFs::new();
        let settings = LogSettings::from_json(
            r#"{
                "time_format": {"custom": "T"},
                "severities": {
                    "error": { "capacity": 4, "files": ["/srv/a.log", "/srv/b.log"] }
                }
            }"#,
        )
        .unwrap();

        let log = settings.build(&fs).unwrap();
        log.error(Some("boom"));
        assert!(log.shutdown(std::time::Duration::from_secs(5)));

        assert_eq!(fs.contents("/srv/a.log").unwrap(), "T;boom\n");
        assert_eq!(fs.contents("/srv/b.log").unwrap(), "T;boom\n");
        assert!(!log.is_configured(Severity::Info));
    }

    #[test]
    fn test_settings_unknown_severity() {
        let settings = LogSettings::from_json(r#"{"severities": {"fatal": {}}}"#).unwrap();
        let err = settings.build(&MemoryFs::new()).err().unwrap();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_settings_invalid_time_format() {
        let fs = MemoryFs::new();
        let settings = LogSettings::from_json(
            r#"{
                "time_format": {"custom": "%Q"},
                "severities": { "info": { "files": ["/srv/info.log"] } }
            }"#,
        )
        .unwrap();

        let err = settings.build(&fs).err().unwrap();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        // Rejected before any file is opened
        assert!(fs.contents("/srv/info.log").is_none());
    }
}
