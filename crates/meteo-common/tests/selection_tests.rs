//! Station value selection against the ETL dataset layout.

use meteo_common::{MeteoError, Period, PeriodType, StationDataset, Variable};
use test_utils::{assert_approx_eq, periods, stations};

#[test]
fn test_day_selection_on_three_stations() {
    let dataset = StationDataset::from_json_str(&test_utils::three_station_dataset()).unwrap();
    let day = Period::parse(PeriodType::Day, periods::DAY).unwrap();

    let temps = dataset.select_samples(Variable::TempMoy, &day).unwrap();
    let names: Vec<&str> = temps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Aix-en-Provence", "Arles", "Marseille"]);

    let marseille = &temps[2];
    assert_eq!((marseille.latitude, marseille.longitude), stations::MARSEILLE);
    assert_eq!(marseille.value, 14.0);

    // Marseille has no precipitation that day and is left out
    let rain = dataset.select_samples(Variable::Precipitation, &day).unwrap();
    assert_eq!(rain.len(), 2);
    assert!(rain.iter().all(|s| s.name != "Marseille"));
}

#[test]
fn test_month_sums_precipitation_and_averages_temperature() {
    let dataset = StationDataset::from_json_str(&test_utils::three_day_month_dataset()).unwrap();
    let month = Period::parse(PeriodType::Month, periods::MONTH).unwrap();

    let rain = dataset.select_samples(Variable::Precipitation, &month).unwrap();
    assert_eq!(rain.len(), 1);
    assert_approx_eq!(rain[0].value, 6.5, 1e-12);

    let temp = dataset.select_samples(Variable::TempMoy, &month).unwrap();
    assert_approx_eq!(temp[0].value, 7.0, 1e-12);
}

#[test]
fn test_empty_day_is_no_data() {
    let dataset = StationDataset::from_json_str(&test_utils::three_station_dataset()).unwrap();
    let day = Period::parse(PeriodType::Day, periods::EMPTY_DAY).unwrap();

    match dataset.select_samples(Variable::TempMoy, &day) {
        Err(MeteoError::NoData { variable, period }) => {
            assert_eq!(variable, "temp_moy");
            assert_eq!(period, periods::EMPTY_DAY);
        }
        other => panic!("expected NoData, got {:?}", other),
    }
}

#[test]
fn test_variable_without_values_is_no_data() {
    let dataset = StationDataset::from_json_str(&test_utils::three_station_dataset()).unwrap();
    let day = Period::parse(PeriodType::Day, periods::DAY).unwrap();
    assert!(matches!(
        dataset.select_samples(Variable::VentMax, &day),
        Err(MeteoError::NoData { .. })
    ));
}
