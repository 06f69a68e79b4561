//! Pipeline configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use divyield_core::calendars::Market;
use divyield_core::expirations::{DayRule, DEFAULT_MAX_ADJUSTMENT_DAYS};
use divyield_core::reconcile::DEFAULT_MATURITIES_PER_DATE;
use divyield_core::Date;
use divyield_traits::IndexId;

use crate::error::{into_result, ConfigError, ConfigResult, Validate, ValidationError};

/// Overrides `data_dir`.
pub const ENV_DATA_DIR: &str = "DIVYIELD_DATA_DIR";
/// Overrides `start_date` (`YYYY-MM-DD`).
pub const ENV_START_DATE: &str = "DIVYIELD_START_DATE";
/// Overrides `end_date` (`YYYY-MM-DD`).
pub const ENV_END_DATE: &str = "DIVYIELD_END_DATE";
/// Overrides the vendor username.
pub const ENV_USERNAME: &str = "DIVYIELD_USERNAME";
/// Overrides the vendor password.
pub const ENV_PASSWORD: &str = "DIVYIELD_PASSWORD";
/// Overrides `indices` (comma separated).
pub const ENV_INDICES: &str = "DIVYIELD_INDICES";
/// Overrides `market`.
pub const ENV_MARKET: &str = "DIVYIELD_MARKET";

/// Vendor login.
///
/// The password is never serialized and is redacted from `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Vendor account name.
    #[serde(default)]
    pub username: Option<String>,
    /// Vendor password.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl Credentials {
    /// Creates credentials for `username` without a password.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: None,
        }
    }

    /// Returns true if neither a username nor a password is set.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Settings shared by every pipeline entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the raw and reconciled datasets.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// First observation date.
    #[serde(default)]
    pub start_date: Option<Date>,

    /// Last observation date.
    #[serde(default)]
    pub end_date: Option<Date>,

    /// Indices to pull.
    #[serde(default = "IndexId::defaults")]
    pub indices: Vec<IndexId>,

    /// Market whose trading calendar places expirations.
    #[serde(default)]
    pub market: Market,

    /// JSON holiday list used instead of the built-in market calendar.
    #[serde(default)]
    pub calendar_file: Option<PathBuf>,

    /// Expiration day rule, e.g. `WOM-3FRI`.
    #[serde(default)]
    pub day_rule: DayRule,

    /// Bound on the backward holiday search, in calendar days.
    #[serde(default = "default_max_adjustment_days")]
    pub max_adjustment_days: u32,

    /// Front maturities kept per observation date.
    #[serde(default = "default_maturities_per_date")]
    pub maturities_per_date: usize,

    /// Directory of vendor CSV exports (`<INDEX>.csv`).
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Vendor login.
    #[serde(default)]
    pub credentials: Credentials,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_max_adjustment_days() -> u32 {
    DEFAULT_MAX_ADJUSTMENT_DAYS
}

fn default_maturities_per_date() -> usize {
    DEFAULT_MATURITIES_PER_DATE
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            start_date: None,
            end_date: None,
            indices: IndexId::defaults(),
            market: Market::default(),
            calendar_file: None,
            day_rule: DayRule::default(),
            max_adjustment_days: default_max_adjustment_days(),
            maturities_per_date: default_maturities_per_date(),
            source_dir: None,
            credentials: Credentials::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the file if given (defaults otherwise), then applies the
    /// process environment. The result is not validated.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Renders the configuration as TOML (password omitted).
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Applies `DIVYIELD_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies `DIVYIELD_*` overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = get(ENV_START_DATE) {
            self.start_date = Some(parse_date(ENV_START_DATE, &value)?);
        }
        if let Some(value) = get(ENV_END_DATE) {
            self.end_date = Some(parse_date(ENV_END_DATE, &value)?);
        }
        if let Some(username) = get(ENV_USERNAME) {
            self.credentials.username = Some(username);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.credentials.password = Some(password);
        }
        if let Some(value) = get(ENV_INDICES) {
            self.indices = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(IndexId::new)
                .collect();
        }
        if let Some(value) = get(ENV_MARKET) {
            self.market = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_MARKET.to_string(),
                value,
            })?;
        }
        Ok(())
    }

    /// The configured observation range.
    ///
    /// Fails when either bound is missing or the range is reversed.
    pub fn date_range(&self) -> ConfigResult<(Date, Date)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Ok((start, end)),
            (Some(start), Some(end)) => Err(ConfigError::Validation {
                field: "start_date".to_string(),
                message: format!("{start} is after end_date {end}"),
            }),
            (None, _) => Err(ConfigError::Validation {
                field: "start_date".to_string(),
                message: "is required".to_string(),
            }),
            (_, None) => Err(ConfigError::Validation {
                field: "end_date".to_string(),
                message: "is required".to_string(),
            }),
        }
    }
}

fn parse_date(key: &str, value: &str) -> ConfigResult<Date> {
    Date::parse(value.trim()).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl PipelineConfig {
    /// Checks the settings no command-line flag overrides for every
    /// command. The date range and index list are left to [`Validate`].
    pub fn validate_settings(&self) -> ConfigResult<()> {
        into_result(self.settings_errors())
    }

    fn settings_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new("data_dir", "must not be empty"));
        }
        if self.maturities_per_date == 0 {
            errors.push(ValidationError::new(
                "maturities_per_date",
                "must be at least 1",
            ));
        }
        errors
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.settings_errors();

        if self.start_date.is_none() {
            errors.push(ValidationError::new("start_date", "is required"));
        }
        if self.end_date.is_none() {
            errors.push(ValidationError::new("end_date", "is required"));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                errors.push(ValidationError::new(
                    "start_date",
                    format!("{start} is after end_date {end}"),
                ));
            }
        }
        if self.indices.is_empty() {
            errors.push(ValidationError::new("indices", "at least one index is required"));
        }

        errors
    }
}
