//! Station dataset produced by the upstream ETL, and per-station value selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::{MeteoError, MeteoResult, Period, Variable};

/// The full station dataset (`meteo_data.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationDataset {
    /// Stations keyed by name. Ordered so that selection is deterministic.
    #[serde(rename = "communes", default)]
    pub stations: BTreeMap<String, Station>,
}

/// A single weather station and its daily records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    #[serde(rename = "nom", default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Daily records, ordered by day.
    #[serde(rename = "donnees", default)]
    pub records: Vec<DailyRecord>,
}

/// One day of measurements. `None` marks a missing value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Day key, `YYYYMMDD`.
    #[serde(rename = "date_raw")]
    pub day: String,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub temp_moy: Option<f64>,
    #[serde(default)]
    pub vent_moy: Option<f64>,
    #[serde(default)]
    pub vent_max: Option<f64>,
}

impl DailyRecord {
    /// Value of a variable for this day, if present and finite.
    pub fn value(&self, variable: Variable) -> Option<f64> {
        let value = match variable {
            Variable::TempMin => self.temp_min,
            Variable::TempMax => self.temp_max,
            Variable::TempMoy => self.temp_moy,
            Variable::Precipitation => self.precipitation,
            Variable::VentMoy => self.vent_moy,
            Variable::VentMax => self.vent_max,
        };
        value.filter(|v| v.is_finite())
    }
}

/// One scalar per station for the requested variable and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSample {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
}

impl Station {
    /// The station's value for a period: the matching day's value, or the
    /// month aggregate of present daily values.
    pub fn value_for(&self, variable: Variable, period: &Period) -> Option<f64> {
        match period {
            Period::Day(day) => self
                .records
                .iter()
                .find(|r| &r.day == day)
                .and_then(|r| r.value(variable)),
            Period::Month(_) => {
                let values: Vec<f64> = self
                    .records
                    .iter()
                    .filter(|r| period.contains_day(&r.day))
                    .filter_map(|r| r.value(variable))
                    .collect();
                variable.aggregation().apply(&values)
            }
        }
    }
}

impl StationDataset {
    /// Load the dataset from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> MeteoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MeteoError::DataReadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse the dataset from JSON text.
    pub fn from_json_str(text: &str) -> MeteoResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Select one sample per station with data for `variable` over `period`.
    ///
    /// Stations without a value are excluded. An empty selection is a
    /// `NoData` error so that a run never produces an empty layer.
    pub fn select_samples(
        &self,
        variable: Variable,
        period: &Period,
    ) -> MeteoResult<Vec<StationSample>> {
        let mut samples = Vec::new();

        for (key, station) in &self.stations {
            if !station.latitude.is_finite() || !station.longitude.is_finite() {
                warn!(station = %key, "Skipping station with non-finite coordinates");
                continue;
            }

            let Some(value) = station.value_for(variable, period) else {
                continue;
            };

            let name = if station.name.is_empty() {
                key.clone()
            } else {
                station.name.clone()
            };

            samples.push(StationSample {
                name,
                latitude: station.latitude,
                longitude: station.longitude,
                value,
            });
        }

        debug!(
            variable = %variable,
            period = %period,
            stations = self.stations.len(),
            selected = samples.len(),
            "Selected station values"
        );

        if samples.is_empty() {
            return Err(MeteoError::NoData {
                variable: variable.to_string(),
                period: period.to_string(),
            });
        }

        Ok(samples)
    }
}
