//! Index files written by the earlier layer generator must stay readable.

use meteo_common::{InterpolationMethod, LayerStats, OutputPaths, PeriodType, Variable};
use storage::Catalog;
use test_utils::{temp_test_dir, write_fixture};

const LEGACY_INDEX: &str = r#"{
  "layers": [
    {
      "variable": "temperature",
      "period_type": "date",
      "period": "20240115",
      "geojson": "outputs/spatial/temperature_20240115.geojson",
      "png": "outputs/spatial/temperature_20240115.png",
      "stats": { "min": 8.1, "max": 14.2, "mean": 11.0 }
    },
    {
      "variable": "precipitation",
      "period_type": "month",
      "period": "2024-01",
      "method": "idw",
      "grid": 2000,
      "geojson": "outputs/interpolation/precipitation_2024-01_idw_grid2000.geojson",
      "stats": { "min": null, "max": null, "mean": null }
    }
  ]
}"#;

#[test]
fn test_reads_legacy_records() {
    let dir = temp_test_dir();
    let catalog = Catalog::new(write_fixture(dir.path(), "index.json", LEGACY_INDEX));

    let index = catalog.load().unwrap();
    assert_eq!(index.len(), 2);

    let first = &index.layers[0];
    assert_eq!(first.variable, Variable::TempMoy);
    assert_eq!(first.period_type, PeriodType::Day);
    assert_eq!(first.method, None);
    assert_eq!(first.outputs.png.as_deref(), Some("outputs/spatial/temperature_20240115.png"));

    let second = &index.layers[1];
    assert_eq!(second.method, Some(InterpolationMethod::Idw));
    assert_eq!(second.grid_resolution, Some(2000.0));
    assert!(second.stats.is_empty());
}

#[test]
fn test_new_layer_appends_after_legacy_records() {
    let dir = temp_test_dir();
    let catalog = Catalog::new(write_fixture(dir.path(), "index.json", LEGACY_INDEX));

    // Same variable/period as the legacy record but with a method: a new key
    let index = catalog
        .register_layer(meteo_common::LayerRecord {
            variable: Variable::TempMoy,
            period_type: PeriodType::Day,
            period: "20240115".into(),
            method: Some(InterpolationMethod::Kriging),
            grid_resolution: Some(2000.0),
            stats: LayerStats {
                min: Some(1.0),
                max: Some(2.0),
                mean: Some(1.5),
            },
            outputs: OutputPaths {
                geojson: "out/a.geojson".into(),
                ..Default::default()
            },
            generated_at: None,
        })
        .unwrap();
    assert_eq!(index.len(), 3);

    // Flat path fields, canonical variable names on rewrite
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(catalog.path()).unwrap()).unwrap();
    assert_eq!(raw["layers"][0]["variable"], "temp_moy");
    assert_eq!(raw["layers"][0]["period_type"], "day");
    assert_eq!(raw["layers"][2]["geojson"], "out/a.geojson");
    assert!(raw["layers"][2].get("geotiff").is_none());
}
