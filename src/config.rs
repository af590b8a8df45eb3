use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Utc};
use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LoggingConfig};
use crate::progress::DEFAULT_WORKOUT_TARGET_MIN;

/// Which clock decides the calendar date a log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// The machine's local time zone.
    #[default]
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl DayBoundary {
    /// Calendar date of `now` under this boundary.
    pub fn date_of(self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => now.with_timezone(&Local).date_naive(),
            Self::Fixed(offset) => now.with_timezone(&offset).date_naive(),
        }
    }

    /// Wall-clock time of `now` under this boundary.
    pub fn time_of(self, now: DateTime<Utc>) -> NaiveTime {
        match self {
            Self::Local => now.with_timezone(&Local).time(),
            Self::Fixed(offset) => now.with_timezone(&offset).time(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Present only when both Firebase variables are set.
    pub firebase: Option<FirebaseConfig>,
    pub workout_target_min: u32,
    pub day_boundary: DayBoundary,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            firebase: None,
            workout_target_min: DEFAULT_WORKOUT_TARGET_MIN,
            day_boundary: DayBoundary::Local,
            logging: LoggingConfig::default(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| Error::Config(format!("{name} has invalid value {raw:?}")))
        })
        .transpose()
}

impl Config {
    /// Load from `REDDYFIT_*` environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `REDDYFIT_FIREBASE_API_KEY` | unset |
    /// | `REDDYFIT_FIREBASE_PROJECT_ID` | unset |
    /// | `REDDYFIT_WORKOUT_TARGET_MIN` | `30` |
    /// | `REDDYFIT_UTC_OFFSET_MINUTES` | unset (machine local time) |
    /// | `REDDYFIT_LOG_LEVEL` | `info` |
    /// | `REDDYFIT_LOG_FORMAT` | `pretty` |
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a variable is set but malformed, or only
    /// one of the two Firebase variables is set.
    pub fn from_env() -> Result<Self> {
        let firebase = match (
            var("REDDYFIT_FIREBASE_API_KEY"),
            var("REDDYFIT_FIREBASE_PROJECT_ID"),
        ) {
            (Some(api_key), Some(project_id)) => Some(FirebaseConfig {
                api_key,
                project_id,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "REDDYFIT_FIREBASE_API_KEY and REDDYFIT_FIREBASE_PROJECT_ID must be set together"
                        .into(),
                ))
            }
        };

        let workout_target_min =
            parse_var("REDDYFIT_WORKOUT_TARGET_MIN")?.unwrap_or(DEFAULT_WORKOUT_TARGET_MIN);

        let day_boundary = match parse_var::<i32>("REDDYFIT_UTC_OFFSET_MINUTES")? {
            None => DayBoundary::Local,
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(DayBoundary::Fixed)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "REDDYFIT_UTC_OFFSET_MINUTES out of range: {minutes}"
                    ))
                })?,
        };

        let mut logging = LoggingConfig::default();
        if let Some(level) = var("REDDYFIT_LOG_LEVEL") {
            logging.level = level;
        }
        if let Some(format) = parse_var::<LogFormat>("REDDYFIT_LOG_FORMAT")? {
            logging.format = format;
        }

        Ok(Self {
            firebase,
            workout_target_min,
            day_boundary,
            logging,
        })
    }
}
