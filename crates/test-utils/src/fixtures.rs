//! Common test fixtures for meteo-surface tests.
//!
//! Station datasets follow the upstream ETL layout (`communes` keyed by
//! name, daily records under `donnees`). Boundaries are GeoJSON in
//! Lambert-93 metres.

use serde_json::{json, Map, Value};

/// Real station locations in the Bouches-du-Rhône (lat, lon).
pub mod stations {
    pub const MARSEILLE: (f64, f64) = (43.2965, 5.3698);
    pub const AIX_EN_PROVENCE: (f64, f64) = (43.5297, 5.4474);
    pub const ARLES: (f64, f64) = (43.6766, 4.6300);
    pub const SALON: (f64, f64) = (43.6403, 5.0970);
}

/// Period keys used by the bundled datasets.
pub mod periods {
    /// Day present in [`three_station_dataset`](super::three_station_dataset).
    pub const DAY: &str = "20240115";
    /// Day with no record for any station.
    pub const EMPTY_DAY: &str = "20240116";
    /// Month covered by [`three_day_month_dataset`](super::three_day_month_dataset).
    pub const MONTH: &str = "2024-01";
}

/// Lambert-93 square used by the end-to-end tests.
///
/// 40 km wide and centred on Marseille/Aix, so a 10 km grid has 5×5 nodes
/// of which the 3×3 interior ones fall strictly inside.
pub mod squares {
    pub const PROVENCE: (f64, f64, f64, f64) = (870000.0, 6240000.0, 910000.0, 6280000.0);
    pub const PROVENCE_RESOLUTION: f64 = 10000.0;
}

/// Builds one daily record. Fields not listed are omitted (missing).
pub fn daily_record(day: &str, fields: &[(&str, f64)]) -> Value {
    let mut record = Map::new();
    record.insert("date_raw".into(), json!(day));
    for (name, value) in fields {
        record.insert((*name).into(), json!(value));
    }
    Value::Object(record)
}

/// Builds one station entry.
pub fn station_json(name: &str, (lat, lon): (f64, f64), records: Vec<Value>) -> Value {
    json!({
        "nom": name,
        "latitude": lat,
        "longitude": lon,
        "altitude": 10.0,
        "donnees": records,
    })
}

/// Wraps stations into a full dataset document.
pub fn dataset_json(stations: Vec<(&str, Value)>) -> String {
    let communes: Map<String, Value> = stations
        .into_iter()
        .map(|(key, station)| (key.to_string(), station))
        .collect();
    json!({ "communes": communes }).to_string()
}

/// Three stations with one day of data each ([`periods::DAY`]).
///
/// | station         | temp_moy | precipitation |
/// |-----------------|----------|---------------|
/// | Aix-en-Provence | 12.0     | 0.0           |
/// | Arles           | 10.0     | 2.5           |
/// | Marseille       | 14.0     | (missing)     |
pub fn three_station_dataset() -> String {
    dataset_json(vec![
        (
            "Marseille",
            station_json(
                "Marseille",
                stations::MARSEILLE,
                vec![daily_record(
                    periods::DAY,
                    &[("temp_moy", 14.0), ("temp_min", 9.0), ("temp_max", 18.0)],
                )],
            ),
        ),
        (
            "Aix-en-Provence",
            station_json(
                "Aix-en-Provence",
                stations::AIX_EN_PROVENCE,
                vec![daily_record(
                    periods::DAY,
                    &[("temp_moy", 12.0), ("precipitation", 0.0)],
                )],
            ),
        ),
        (
            "Arles",
            station_json(
                "Arles",
                stations::ARLES,
                vec![daily_record(
                    periods::DAY,
                    &[("temp_moy", 10.0), ("precipitation", 2.5)],
                )],
            ),
        ),
    ])
}

/// One station with three January days plus noise around them.
///
/// January: precipitation 1.0 + 2.0 + 3.5 = 6.5, temp_moy mean
/// (4 + 6 + 11) / 3 = 7.0. A fourth January day has both values null and a
/// February day carries large values that must not leak into January.
pub fn three_day_month_dataset() -> String {
    let mut null_day = daily_record("20240104", &[]);
    if let Value::Object(map) = &mut null_day {
        map.insert("precipitation".into(), Value::Null);
        map.insert("temp_moy".into(), Value::Null);
    }
    dataset_json(vec![(
        "Salon-de-Provence",
        station_json(
            "Salon-de-Provence",
            stations::SALON,
            vec![
                daily_record("20240101", &[("precipitation", 1.0), ("temp_moy", 4.0)]),
                daily_record("20240102", &[("precipitation", 2.0), ("temp_moy", 6.0)]),
                daily_record("20240103", &[("precipitation", 3.5), ("temp_moy", 11.0)]),
                null_day,
                daily_record("20240201", &[("precipitation", 100.0), ("temp_moy", 50.0)]),
            ],
        ),
    )])
}

/// Closed ring for an axis-aligned rectangle, counter-clockwise.
pub fn square_ring((min_x, min_y, max_x, max_y): (f64, f64, f64, f64)) -> Value {
    json!([
        [min_x, min_y],
        [max_x, min_y],
        [max_x, max_y],
        [min_x, max_y],
        [min_x, min_y]
    ])
}

/// FeatureCollection holding a single rectangular polygon.
pub fn square_boundary_geojson(square: (f64, f64, f64, f64)) -> String {
    boundary_collection(vec![json!({
        "type": "Feature",
        "properties": { "nom": "test" },
        "geometry": { "type": "Polygon", "coordinates": [square_ring(square)] }
    })])
}

/// FeatureCollection from raw feature values.
pub fn boundary_collection(features: Vec<Value>) -> String {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_station_dataset_shape() {
        let doc: Value = serde_json::from_str(&three_station_dataset()).unwrap();
        let communes = doc["communes"].as_object().unwrap();
        assert_eq!(communes.len(), 3);
        assert_eq!(communes["Arles"]["donnees"][0]["date_raw"], periods::DAY);
        assert!(communes["Marseille"]["donnees"][0]
            .get("precipitation")
            .is_none());
    }

    #[test]
    fn test_square_boundary_is_closed() {
        let doc: Value = serde_json::from_str(&square_boundary_geojson(squares::PROVENCE)).unwrap();
        let ring = doc["features"][0]["geometry"]["coordinates"][0]
            .as_array()
            .unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}
