use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Write,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{StatementError, StatementResult},
    ledger::PeriodKind,
    utils::{app_data_dir, ensure_dir, write_atomic},
};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementConfig {
    /// `chrono` format string used to parse and print dates in the shell.
    pub date_format: String,
    pub default_period: PeriodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_path: Option<PathBuf>,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".into(),
            default_period: PeriodKind::Month,
            templates_path: None,
        }
    }
}

impl StatementConfig {
    /// Rejects date formats that cannot print a date and read it back.
    pub fn validate(&self) -> StatementResult<()> {
        let sample = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap_or_default();
        let mut text = String::new();
        let round_trip = write!(text, "{}", sample.format(&self.date_format))
            .ok()
            .and_then(|_| NaiveDate::parse_from_str(&text, &self.date_format).ok());
        if round_trip != Some(sample) {
            return Err(StatementError::InvalidInput(format!(
                "date format `{}` must print year, month and day",
                self.date_format
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> StatementResult<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> StatementResult<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> StatementResult<StatementConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: StatementConfig = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(StatementConfig::default())
        }
    }

    pub fn save(&self, config: &StatementConfig) -> StatementResult<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
