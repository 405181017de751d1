//! Configuration for pharmalog.
//!
//! Settings are read from `pharmalog.toml` in the project directory and
//! layered: file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [storage]
//! data_dir = "data"
//! employees_file = "funcionarios.json"
//! formulas_file = "formulas.json"
//! incidents_file = "erros.json"
//! error_types_file = "tipos_erro.json"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! cors = true
//!
//! [forms]
//! default_date = "today"   # or "previous-business-day"
//!
//! [reports]
//! group = "day"            # day | week | month
//!
//! [logging]
//! dir = "logs"             # optional daily-rolling log files
//! json = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use pharmalog_common::ParseEnumError;
use serde::{Deserialize, Serialize};

use crate::report::Granularity;
use crate::store::StorePaths;

/// Name of the configuration file inside the project directory.
pub const CONFIG_FILE: &str = "pharmalog.toml";

/// Which date a new formula gets when the form leaves it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultDate {
    #[default]
    Today,
    /// Yesterday, or the previous Friday when today is Monday.
    PreviousBusinessDay,
}

impl DefaultDate {
    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            DefaultDate::Today => today,
            DefaultDate::PreviousBusinessDay => {
                let back = if today.weekday() == Weekday::Mon { 3 } else { 1 };
                today - Duration::days(back)
            }
        }
    }
}

impl std::fmt::Display for DefaultDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultDate::Today => write!(f, "today"),
            DefaultDate::PreviousBusinessDay => write!(f, "previous-business-day"),
        }
    }
}

impl std::str::FromStr for DefaultDate {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(DefaultDate::Today),
            "previous-business-day" | "previous_business_day" => {
                Ok(DefaultDate::PreviousBusinessDay)
            }
            _ => Err(ParseEnumError {
                kind: "default date",
                value: s.to_string(),
                expected: "today, previous-business-day",
            }),
        }
    }
}

/// Where the JSON files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    /// Data directory, relative to the project directory unless absolute
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_employees_file")]
    pub employees_file: String,
    #[serde(default = "default_formulas_file")]
    pub formulas_file: String,
    #[serde(default = "default_incidents_file")]
    pub incidents_file: String,
    #[serde(default = "default_error_types_file")]
    pub error_types_file: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_employees_file() -> String {
    "funcionarios.json".to_string()
}

fn default_formulas_file() -> String {
    "formulas.json".to_string()
}

fn default_incidents_file() -> String {
    "erros.json".to_string()
}

fn default_error_types_file() -> String {
    "tipos_erro.json".to_string()
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            employees_file: default_employees_file(),
            formulas_file: default_formulas_file(),
            incidents_file: default_incidents_file(),
            error_types_file: default_error_types_file(),
        }
    }
}

/// REST server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allow cross-origin requests from any origin
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors() -> bool {
    true
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: default_cors(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormsSection {
    #[serde(default)]
    pub default_date: DefaultDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsSection {
    #[serde(default)]
    pub group: Granularity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Directory for daily-rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,
}

/// The complete pharmalog.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PharmalogToml {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub forms: FormsSection,
    #[serde(default)]
    pub reports: ReportsSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl PharmalogToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse pharmalog.toml")
    }

    /// Returns default configuration if the file doesn't exist.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize pharmalog.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let files = [
            ("employees_file", &self.storage.employees_file),
            ("formulas_file", &self.storage.formulas_file),
            ("incidents_file", &self.storage.incidents_file),
            ("error_types_file", &self.storage.error_types_file),
        ];
        for (i, (key, name)) in files.iter().enumerate() {
            if name.trim().is_empty() {
                warnings.push(format!("storage.{} is empty", key));
                continue;
            }
            if !name.ends_with(".json") {
                warnings.push(format!("storage.{} '{}' does not end in .json", key, name));
            }
            if name.contains('/') || name.contains('\\') {
                warnings.push(format!(
                    "storage.{} '{}' should be a file name; use storage.data_dir for the directory",
                    key, name
                ));
            }
            for (other_key, other) in &files[i + 1..] {
                if name == other {
                    warnings.push(format!(
                        "storage.{} and storage.{} both point to '{}'",
                        key, other_key, name
                    ));
                }
            }
        }

        if self.server.port == 0 {
            warnings.push("server.port 0 binds a random port".to_string());
        }
        if self.server.host.trim().is_empty() {
            warnings.push("server.host is empty".to_string());
        }

        warnings
    }
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    /// Path of pharmalog.toml when it exists
    pub config_file: Option<PathBuf>,
    pub toml: PharmalogToml,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the project directory and the process environment.
    pub fn load(project_dir: &Path, overrides: &Overrides) -> Result<Self> {
        Self::resolve(project_dir, overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit environment lookup.
    pub fn resolve(
        project_dir: &Path,
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        let config_file = config_path.exists().then_some(config_path);
        let toml = PharmalogToml::load_or_default(project_dir)?;

        let data_dir = overrides
            .data_dir
            .clone()
            .or_else(|| env("PHARMALOG_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| toml.storage.data_dir.clone());
        let data_dir = if data_dir.is_absolute() {
            data_dir
        } else {
            project_dir.join(data_dir)
        };

        let host = overrides
            .host
            .clone()
            .or_else(|| env("PHARMALOG_HOST"))
            .unwrap_or_else(|| toml.server.host.clone());

        let port = match overrides.port {
            Some(port) => port,
            None => match env("PHARMALOG_PORT") {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("PHARMALOG_PORT '{}' is not a valid port", raw))?,
                None => toml.server.port,
            },
        };

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            config_file,
            toml,
            data_dir,
            host,
            port,
        })
    }

    pub fn store_paths(&self) -> StorePaths {
        let storage = &self.toml.storage;
        StorePaths {
            employees: self.data_dir.join(&storage.employees_file),
            formulas: self.data_dir.join(&storage.formulas_file),
            incidents: self.data_dir.join(&storage.incidents_file),
            error_types: self.data_dir.join(&storage.error_types_file),
        }
    }

    pub fn default_date(&self) -> DefaultDate {
        self.toml.forms.default_date
    }

    pub fn report_group(&self) -> Granularity {
        self.toml.reports.group
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.toml.logging.dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                self.project_dir.join(dir)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_config_file() {
        let dir = tempdir().unwrap();
        let config = Config::resolve(dir.path(), &Overrides::default(), no_env).unwrap();
        assert!(config.config_file.is_none());
        assert_eq!(config.data_dir, dir.path().join("data"));
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(
            config.store_paths(),
            StorePaths::in_dir(dir.path().join("data"))
        );
    }

    #[test]
    fn file_values_are_used() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[storage]
data_dir = "registros"
incidents_file = "data_julia.json"

[server]
port = 8052

[forms]
default_date = "previous-business-day"

[reports]
group = "month"
"#,
        )
        .unwrap();
        let config = Config::resolve(dir.path(), &Overrides::default(), no_env).unwrap();
        assert!(config.config_file.is_some());
        assert_eq!(config.port, 8052);
        assert_eq!(config.default_date(), DefaultDate::PreviousBusinessDay);
        assert_eq!(config.report_group(), Granularity::Month);
        assert_eq!(
            config.store_paths().incidents,
            dir.path().join("registros/data_julia.json")
        );
    }

    #[test]
    fn env_beats_file_and_cli_beats_env() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[server]\nport = 7000\n").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([("PHARMALOG_PORT", "7100"), ("PHARMALOG_DATA_DIR", "/srv/pharma")]);
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let from_env = Config::resolve(dir.path(), &Overrides::default(), lookup).unwrap();
        assert_eq!(from_env.port, 7100);
        assert_eq!(from_env.data_dir, PathBuf::from("/srv/pharma"));

        let overrides = Overrides {
            port: Some(7200),
            ..Default::default()
        };
        let from_cli = Config::resolve(dir.path(), &overrides, lookup).unwrap();
        assert_eq!(from_cli.port, 7200);
    }

    #[test]
    fn invalid_port_in_env_is_an_error() {
        let dir = tempdir().unwrap();
        let result = Config::resolve(dir.path(), &Overrides::default(), |k| {
            (k == "PHARMALOG_PORT").then(|| "http".to_string())
        });
        assert!(result.unwrap_err().to_string().contains("PHARMALOG_PORT"));
    }

    #[test]
    fn validate_flags_clashing_file_names() {
        let mut toml = PharmalogToml::default();
        assert!(toml.validate().is_empty());
        toml.storage.incidents_file = "formulas.json".to_string();
        toml.storage.error_types_file = "tipos.txt".to_string();
        let warnings = toml.validate();
        assert!(warnings.iter().any(|w| w.contains("both point to 'formulas.json'")));
        assert!(warnings.iter().any(|w| w.contains("does not end in .json")));
    }

    #[test]
    fn save_and_reload_keeps_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut toml = PharmalogToml::default();
        toml.server.port = 8050;
        toml.save(&path).unwrap();
        let loaded = PharmalogToml::load(&path).unwrap();
        assert_eq!(loaded.server.port, 8050);
        assert_eq!(loaded.storage.formulas_file, "formulas.json");
    }

    #[test]
    fn previous_business_day_skips_the_weekend() {
        let monday = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let friday = NaiveDate::from_ymd_opt(2025, 9, 12).unwrap();
        let wednesday = NaiveDate::from_ymd_opt(2025, 9, 17).unwrap();
        assert_eq!(DefaultDate::PreviousBusinessDay.resolve(monday), friday);
        assert_eq!(
            DefaultDate::PreviousBusinessDay.resolve(wednesday),
            NaiveDate::from_ymd_opt(2025, 9, 16).unwrap()
        );
        assert_eq!(DefaultDate::Today.resolve(monday), monday);
    }
}
