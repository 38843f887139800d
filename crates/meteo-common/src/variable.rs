//! Station variables and how they aggregate over a month.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MeteoError;

/// A measured station variable, keyed the way the station dataset keys it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Daily minimum temperature (°C)
    TempMin,
    /// Daily maximum temperature (°C)
    TempMax,
    /// Daily mean temperature (°C)
    #[serde(alias = "temperature")]
    TempMoy,
    /// Daily precipitation (mm)
    Precipitation,
    /// Daily mean wind speed (m/s)
    #[serde(alias = "vent")]
    VentMoy,
    /// Daily maximum instantaneous wind speed (m/s)
    VentMax,
}

/// How daily values are combined into a monthly value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Cumulative quantities (precipitation).
    Sum,
    /// Intensive quantities (temperature, wind).
    Mean,
}

impl Aggregation {
    /// Aggregate present values; `None` when there is nothing to aggregate.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        match self {
            Aggregation::Sum => Some(sum),
            Aggregation::Mean => Some(sum / values.len() as f64),
        }
    }
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::TempMin,
        Variable::TempMax,
        Variable::TempMoy,
        Variable::Precipitation,
        Variable::VentMoy,
        Variable::VentMax,
    ];

    /// Key used in the station dataset and in output file names.
    pub fn key(&self) -> &'static str {
        match self {
            Variable::TempMin => "temp_min",
            Variable::TempMax => "temp_max",
            Variable::TempMoy => "temp_moy",
            Variable::Precipitation => "precipitation",
            Variable::VentMoy => "vent_moy",
            Variable::VentMax => "vent_max",
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        match self {
            Variable::Precipitation => Aggregation::Sum,
            _ => Aggregation::Mean,
        }
    }
}

impl FromStr for Variable {
    type Err = MeteoError;

    /// Parse a dataset key, also accepting the dashboard aliases
    /// `temperature` and `vent`/`wind`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temp_min" => Ok(Variable::TempMin),
            "temp_max" => Ok(Variable::TempMax),
            "temp_moy" | "temperature" => Ok(Variable::TempMoy),
            "precipitation" => Ok(Variable::Precipitation),
            "vent_moy" | "vent" | "wind" => Ok(Variable::VentMoy),
            "vent_max" => Ok(Variable::VentMax),
            _ => Err(MeteoError::UnknownVariable(s.to_string())),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
