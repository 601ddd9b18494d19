use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sales_forecast::data::{DataLoader, HistoricalRecord, SalesDataset, TargetSource};
use sales_forecast::SalesError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_data_loader_renames_sales_column() {
    let file = write_csv(&[
        "flavor,weather,location,week,sales",
        "Oreo,Sunny,Provo,1,120",
        "Oreo,Rainy,Logan,2,180",
        "Pink Sugar,Cloudy,Provo,1,90",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data.target_source(), TargetSource::Renamed);
    assert!(data.columns().contains(&"units_sold".to_string()));
    assert!(!data.columns().contains(&"sales".to_string()));
    assert!(data.has_week());
    assert_eq!(
        data.records()[0],
        HistoricalRecord {
            flavor: "Oreo".to_string(),
            weather: "Sunny".to_string(),
            location: "Provo".to_string(),
            week: Some(1),
            units_sold: 120.0,
        }
    );
}

#[test]
fn test_data_loader_keeps_existing_target() {
    let file = write_csv(&[
        "flavor,weather,location,units_sold",
        "Oreo,Sunny,Provo,75.5",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.target_source(), TargetSource::Present);
    assert!(!data.has_week());
    assert_eq!(data.records()[0].week, None);
    assert_relative_eq!(data.records()[0].units_sold, 75.5);
}

#[test]
fn test_sales_column_wins_over_units_sold() {
    let file = write_csv(&[
        "flavor,weather,location,units_sold,sales",
        "Oreo,Sunny,Provo,1,140",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.target_source(), TargetSource::Renamed);
    assert_eq!(
        data.columns()
            .iter()
            .filter(|c| c.as_str() == "units_sold")
            .count(),
        1
    );
    assert_relative_eq!(data.records()[0].units_sold, 140.0);
}

#[test]
fn test_synthesized_units_sold_within_range() {
    let mut lines = vec!["flavor,weather,location".to_string()];
    for i in 0..200 {
        let flavor = if i % 2 == 0 { "Oreo" } else { "Lemon Glaze" };
        lines.push(format!("{},Sunny,Provo", flavor));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write_csv(&refs);

    let mut rng = StdRng::seed_from_u64(7);
    let data = DataLoader::from_csv_with_rng(file.path(), &mut rng).unwrap();

    assert_eq!(data.target_source(), TargetSource::Synthesized);
    assert_eq!(data.len(), 200);
    for record in data.records() {
        assert!(record.units_sold >= 50.0 && record.units_sold < 200.0);
        assert_eq!(record.units_sold.fract(), 0.0);
    }
}

#[test]
fn test_seeded_synthesis_is_reproducible() {
    let file = write_csv(&[
        "flavor,weather,location",
        "Oreo,Sunny,Provo",
        "Oreo,Rainy,Logan",
        "Oreo,Cloudy,Provo",
    ]);

    let first = DataLoader::from_csv_with_rng(file.path(), &mut StdRng::seed_from_u64(42)).unwrap();
    let second = DataLoader::from_csv_with_rng(file.path(), &mut StdRng::seed_from_u64(42)).unwrap();

    assert_eq!(first.records(), second.records());
}

#[test]
fn test_selector_values_are_sorted_and_distinct() {
    let file = write_csv(&[
        "flavor,weather,location,sales",
        "Pink Sugar,Sunny,Provo,100",
        "Chocolate Chip,Rainy,Logan,100",
        "Pink Sugar,Cloudy,Orem,100",
        "Chocolate Chip,Sunny,Provo,100",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.flavors(), vec!["Chocolate Chip", "Pink Sugar"]);
    assert_eq!(data.weathers(), vec!["Cloudy", "Rainy", "Sunny"]);
    assert_eq!(data.locations(), vec!["Logan", "Orem", "Provo"]);
}

#[test]
fn test_historical_average() {
    let data = SalesDataset::from_records(vec![
        record("Oreo", 120.0),
        record("Oreo", 180.0),
        record("Pink Sugar", 90.0),
    ])
    .unwrap();

    assert_relative_eq!(data.historical_average("Oreo").unwrap(), 150.0);
    assert_relative_eq!(data.historical_average("Pink Sugar").unwrap(), 90.0);
    assert!(matches!(
        data.historical_average("Snickerdoodle"),
        Err(SalesError::NoHistoricalData(_))
    ));
}

#[test]
fn test_data_loader_error_handling() {
    // Missing file
    let result = DataLoader::from_csv("nonexistent_file.csv");
    assert!(matches!(result, Err(SalesError::IoError(_))));

    // Missing categorical columns
    let file = write_csv(&["flavor,units_sold", "Oreo,100"]);
    match DataLoader::from_csv(file.path()) {
        Err(SalesError::DataError(msg)) => {
            assert!(msg.contains("weather"));
            assert!(msg.contains("location"));
        }
        other => panic!("Expected DataError, got {:?}", other),
    }
}

fn record(flavor: &str, units_sold: f64) -> HistoricalRecord {
    HistoricalRecord {
        flavor: flavor.to_string(),
        weather: "Sunny".to_string(),
        location: "Provo".to_string(),
        week: None,
        units_sold,
    }
}

#[test]
fn test_rows_with_empty_cells_are_skipped_from_records() {
    let file = write_csv(&[
        "flavor,weather,location,units_sold",
        "Oreo,Sunny,Provo,100",
        "Oreo,,Provo,300",
        "Pink Sugar,Rainy,,90",
        "Pink Sugar,Sunny,Logan,",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 1);
    assert_eq!(data.records()[0].units_sold, 100.0);
    assert_eq!(data.flavors(), vec!["Oreo"]);
    assert_eq!(data.weathers(), vec!["Sunny"]);
}

#[test]
fn test_historical_average_keeps_rows_missing_weather_or_location() {
    let file = write_csv(&[
        "flavor,weather,location,units_sold",
        "Oreo,Sunny,Provo,100",
        "Oreo,,Provo,300",
        "Pink Sugar,Rainy,,90",
        "Pink Sugar,Sunny,Logan,",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_relative_eq!(data.historical_average("Oreo").unwrap(), 200.0);
    // the row without units_sold does not count
    assert_relative_eq!(data.historical_average("Pink Sugar").unwrap(), 90.0);
}

#[test]
fn test_fractional_weeks_are_rejected() {
    let file = write_csv(&[
        "flavor,weather,location,week,units_sold",
        "Oreo,Sunny,Provo,1.5,100",
        "Oreo,Rainy,Logan,2.5,120",
    ]);

    match DataLoader::from_csv(file.path()) {
        Err(SalesError::DataError(msg)) => assert!(msg.contains("week")),
        other => panic!("Expected DataError, got {:?}", other),
    }
}
