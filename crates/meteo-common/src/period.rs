//! Requested periods: a single day or a calendar month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{MeteoError, MeteoResult};

/// Granularity of a requested period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    #[serde(alias = "date")]
    Day,
    Month,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Month => "month",
        }
    }
}

impl FromStr for PeriodType {
    type Err = MeteoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "date" => Ok(PeriodType::Day),
            "month" => Ok(PeriodType::Month),
            other => Err(MeteoError::invalid_parameter(
                "period_type",
                format!("expected 'day' or 'month', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated period.
///
/// Day periods are `YYYYMMDD`, month periods are `YYYY-MM`, matching the
/// `date_raw` keys of the station dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Period {
    Day(String),
    Month(String),
}

impl Period {
    /// Validate a period value against its type.
    pub fn parse(period_type: PeriodType, value: &str) -> MeteoResult<Self> {
        let value = value.trim();
        match period_type {
            PeriodType::Day => {
                if value.len() != 8 {
                    return Err(MeteoError::InvalidPeriod(format!(
                        "day period must be YYYYMMDD, got '{}'",
                        value
                    )));
                }
                NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| {
                    MeteoError::InvalidPeriod(format!("'{}' is not a calendar date", value))
                })?;
                Ok(Period::Day(value.to_string()))
            }
            PeriodType::Month => {
                if value.len() != 7 || value.as_bytes()[4] != b'-' {
                    return Err(MeteoError::InvalidPeriod(format!(
                        "month period must be YYYY-MM, got '{}'",
                        value
                    )));
                }
                NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").map_err(|_| {
                    MeteoError::InvalidPeriod(format!("'{}' is not a calendar month", value))
                })?;
                Ok(Period::Month(value.to_string()))
            }
        }
    }

    /// Build a period from the mutually exclusive `--date` / `--month` shorthands.
    pub fn from_options(date: Option<&str>, month: Option<&str>) -> MeteoResult<Self> {
        match (date, month) {
            (Some(_), Some(_)) => Err(MeteoError::invalid_parameter(
                "period",
                "choose either a day or a month, not both",
            )),
            (None, None) => Err(MeteoError::MissingParameter(
                "period (a day YYYYMMDD or a month YYYY-MM)".to_string(),
            )),
            (Some(day), None) => Self::parse(PeriodType::Day, day),
            (None, Some(month)) => Self::parse(PeriodType::Month, month),
        }
    }

    pub fn period_type(&self) -> PeriodType {
        match self {
            Period::Day(_) => PeriodType::Day,
            Period::Month(_) => PeriodType::Month,
        }
    }

    /// The period value as supplied (`YYYYMMDD` or `YYYY-MM`).
    pub fn as_str(&self) -> &str {
        match self {
            Period::Day(s) | Period::Month(s) => s,
        }
    }

    /// Whether a dataset day key (`YYYYMMDD`) falls in this period.
    pub fn contains_day(&self, day_key: &str) -> bool {
        match self {
            Period::Day(day) => day_key == day,
            Period::Month(month) => {
                let prefix = month.replace('-', "");
                day_key.starts_with(&prefix)
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
