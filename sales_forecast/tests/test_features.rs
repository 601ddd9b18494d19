use pretty_assertions::assert_eq;
use sales_forecast::features::{
    encode, Category, FeatureSchema, SchemaCoverage, Selection, HOLIDAY_COLUMN,
    SOCIAL_MENTIONS_COLUMN,
};
use sales_forecast::SalesError;
use std::io::Write;
use tempfile::NamedTempFile;

fn full_schema() -> FeatureSchema {
    FeatureSchema::new(
        [
            "holiday",
            "social_media_mentions",
            "flavor_Chocolate Chip",
            "flavor_Oreo",
            "weather_Rainy",
            "weather_Sunny",
            "location_Logan",
            "location_Provo",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    )
    .unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_encode_sets_one_indicator_per_group() {
    let schema = full_schema();
    let selection = Selection::new("Oreo", "Sunny", "Provo")
        .with_holiday(true)
        .with_social_mentions(42);

    let input = encode(&selection, &schema);

    assert_eq!(input.len(), schema.len());
    assert_eq!(
        input.values(),
        &[1.0, 42.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]
    );
    assert_eq!(input.columns(), schema.columns());
}

#[test]
fn test_encode_holiday_off_is_zero() {
    let schema = full_schema();
    let selection = Selection::new("Chocolate Chip", "Rainy", "Logan");

    let input = encode(&selection, &schema);

    assert_eq!(input.get(HOLIDAY_COLUMN), Some(0.0));
    assert_eq!(input.get(SOCIAL_MENTIONS_COLUMN), Some(0.0));
    assert_eq!(input.get("flavor_Chocolate Chip"), Some(1.0));
    assert_eq!(input.get("weather_Rainy"), Some(1.0));
    assert_eq!(input.get("location_Logan"), Some(1.0));
    assert_eq!(input.values().iter().sum::<f64>(), 3.0);
}

#[test]
fn test_encode_is_idempotent() {
    let schema = full_schema();
    let selection = Selection::new("Oreo", "Rainy", "Logan").with_social_mentions(100);

    assert_eq!(encode(&selection, &schema), encode(&selection, &schema));
}

#[test]
fn test_encode_follows_schema_order() {
    let schema = FeatureSchema::new(strings(&[
        "location_Provo",
        "weather_Sunny",
        "social_media_mentions",
        "flavor_Oreo",
    ]))
    .unwrap();

    let input = encode(
        &Selection::new("Oreo", "Sunny", "Provo").with_social_mentions(5),
        &schema,
    );

    assert_eq!(input.values(), &[1.0, 1.0, 5.0, 1.0]);
}

#[test]
fn test_unknown_values_leave_vector_untouched() {
    let schema = full_schema();
    // "sunny" differs in case from the schema's "weather_Sunny"
    let selection = Selection::new("Snickerdoodle", "sunny", "Orem");

    let input = encode(&selection, &schema);

    assert!(input.values().iter().all(|v| *v == 0.0));
}

#[test]
fn test_optional_numeric_columns_are_ignored_when_absent() {
    let schema = FeatureSchema::new(strings(&["flavor_Oreo", "weather_Sunny"])).unwrap();
    let selection = Selection::new("Oreo", "Sunny", "Provo")
        .with_holiday(true)
        .with_social_mentions(80);

    let input = encode(&selection, &schema);

    assert_eq!(input.values(), &[1.0, 1.0]);
    assert_eq!(input.get(HOLIDAY_COLUMN), None);
}

#[test]
fn test_schema_rejects_duplicates_and_empty() {
    let duplicate = FeatureSchema::new(strings(&["holiday", "flavor_Oreo", "holiday"]));
    assert!(matches!(duplicate, Err(SalesError::SchemaError(_))));

    let empty = FeatureSchema::new(Vec::new());
    assert!(matches!(empty, Err(SalesError::SchemaError(_))));
}

#[test]
fn test_schema_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"["holiday", "social_media_mentions", "flavor_Oreo"]"#).unwrap();

    let schema = FeatureSchema::from_json_file(file.path()).unwrap();

    assert_eq!(schema.len(), 3);
    assert_eq!(schema.position("flavor_Oreo"), Some(2));
    assert!(schema.contains("holiday"));

    let invalid = FeatureSchema::from_json_str(r#"{"columns": []}"#);
    assert!(matches!(invalid, Err(SalesError::SerializationError(_))));
}

#[test]
fn test_schema_coverage_reports_gaps() {
    let schema = FeatureSchema::new(strings(&["flavor_Oreo", "weather_Sunny", "location_Provo"]))
        .unwrap();

    let coverage = SchemaCoverage::check(
        &schema,
        &strings(&["Oreo", "Pink Sugar"]),
        &strings(&["Sunny"]),
        &strings(&["Logan", "Provo"]),
    );

    assert!(!coverage.is_complete());
    assert!(!coverage.has_holiday);
    assert!(!coverage.has_social_mentions);
    let missing: Vec<&str> = coverage.missing.iter().map(|m| m.column.as_str()).collect();
    assert_eq!(missing, vec!["flavor_Pink Sugar", "location_Logan"]);
    assert_eq!(coverage.missing[0].category, Category::Flavor);

    match coverage.require_complete() {
        Err(SalesError::SchemaError(msg)) => assert!(msg.contains("location_Logan")),
        other => panic!("Expected SchemaError, got {:?}", other),
    }
}

#[test]
fn test_schema_coverage_complete() {
    let coverage = SchemaCoverage::check(
        &full_schema(),
        &strings(&["Chocolate Chip", "Oreo"]),
        &strings(&["Rainy", "Sunny"]),
        &strings(&["Logan", "Provo"]),
    );

    assert!(coverage.is_complete());
    assert!(coverage.has_holiday);
    assert!(coverage.has_social_mentions);
    assert!(coverage.require_complete().is_ok());
}

#[test]
fn test_selection_validation_and_summary() {
    let selection = Selection::new("Oreo", "Sunny", "Provo").with_social_mentions(101);
    assert!(matches!(
        selection.validate(),
        Err(SalesError::InvalidParameter(_))
    ));

    let holiday = Selection::new("Oreo", "Sunny", "Provo").with_holiday(true);
    assert!(holiday.validate().is_ok());
    assert_eq!(
        holiday.summary(),
        "Oreo cookies during Sunny weather at Provo location (Holiday Week)"
    );
    assert_eq!(
        Selection::new("Oreo", "Rainy", "Logan").summary(),
        "Oreo cookies during Rainy weather at Logan location"
    );
}
