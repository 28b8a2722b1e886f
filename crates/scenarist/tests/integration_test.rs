//! Integration tests for Scenarist.

use scenarist::{
    AttributeIndex, ChangeKind, ChangeSpec, ExpandOptions, FilterEvaluator, FilterSet,
    MetricChange, ScenarioSession, ScenarioStore, CellValue, expand_changes,
    extract_value_drivers,
    export::{archive_bytes, scenario_to_csv},
    input::{parse_archive_bytes, parse_catalog_bytes, parse_table_bytes},
    scenario::LookupKey,
    store::FileStore,
};
use std::io::Write;

const BASE_CSV: &str = "\
Product Variant Id;Product Name;Current Price;Current Availability;Current Cost;Is Competitor;Region
var_01;Ice Tea Lemon;10.00;95;4.00;No;North
var_02;Ice Tea Lemon;12.00;80;4.50;No;South
var_03;Cola Classic;8.00;60;3.00;Yes;North
var_04;Cola Classic;8.50;70;3.20;Yes;South
var_05;Orange Juice;15.00;90;6.00;No;North
var_06;Orange Juice;15.50;85;6.10;No;South
var_07;Apple Spritz;9.00;50;3.80;Yes;North
var_08;Apple Spritz;9.20;55;3.90;Yes;South
var_09;Berry Mix;11.00;40;4.40;No;North
var_10;Berry Mix;11.30;45;4.60;No;South
";

const MASTER_JSON: &str = r#"[
  {
    "referenceId": "prod_ice_tea",
    "name": "Ice Tea Lemon",
    "attributes": [
      {"valueDriverReferenceId": "brand", "referenceId": "brand_own"},
      {"valueDriverReferenceId": "category", "referenceId": "category_tea"}
    ],
    "variants": [
      {
        "referenceId": "var_01",
        "attributes": [{"valueDriverReferenceId": "format", "referenceId": "format_0_50l"}],
        "aggregations": {"pack_size": 6}
      },
      {
        "referenceId": "var_02",
        "attributes": [{"valueDriverReferenceId": "format", "referenceId": "format_1_00l"}]
      }
    ]
  },
  {
    "referenceId": "prod_cola",
    "name": "Cola Classic",
    "attributes": [{"valueDriverReferenceId": "brand", "referenceId": "brand_competitor_01"}]
  },
  {
    "referenceId": "prod_juice",
    "name": "Orange Juice",
    "attributes": [{"valueDriverReferenceId": "brand", "referenceId": "brand_own"}]
  },
  {
    "referenceId": "prod_spritz",
    "name": "Apple Spritz",
    "attributes": [{"valueDriverReferenceId": "brand", "referenceId": "brand_competitor_02"}]
  },
  {
    "referenceId": "prod_berry",
    "name": "Berry Mix",
    "attributes": [{"valueDriverReferenceId": "brand", "referenceId": "brand_own"}]
  }
]"#;

fn load() -> (scenarist::Table, AttributeIndex) {
    let table = parse_table_bytes(BASE_CSV.as_bytes()).expect("table parse failed");
    let catalog = parse_catalog_bytes(MASTER_JSON.as_bytes()).expect("catalog parse failed");
    let index = AttributeIndex::build(&catalog);
    (table, index)
}

// =============================================================================
// Indexing
// =============================================================================

#[test]
fn test_index_and_driver_map_are_idempotent() {
    let catalog = parse_catalog_bytes(MASTER_JSON.as_bytes()).unwrap();

    assert_eq!(AttributeIndex::build(&catalog), AttributeIndex::build(&catalog));
    assert_eq!(extract_value_drivers(&catalog), extract_value_drivers(&catalog));
}

#[test]
fn test_driver_map_contents() {
    let catalog = parse_catalog_bytes(MASTER_JSON.as_bytes()).unwrap();
    let drivers = extract_value_drivers(&catalog);

    assert_eq!(
        drivers["brand"],
        vec!["brand_competitor_01", "brand_competitor_02", "brand_own"]
    );
    assert_eq!(drivers["format"], vec!["format_0_50l", "format_1_00l"]);
    // Aggregation values are normalized with the driver prefix.
    assert_eq!(drivers["pack_size"], vec!["pack_size_6"]);
}

#[test]
fn test_name_index_carries_merged_variant_attributes() {
    let (_, index) = load();
    let attrs = index.attributes_for_name("Ice Tea Lemon").unwrap();

    // Two variants disagree on format; both values are retained.
    assert_eq!(
        attrs["format"],
        scenarist::AttributeValue::Many(vec![
            "format_0_50l".to_string(),
            "format_1_00l".to_string()
        ])
    );
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_no_filter_matches_every_row() {
    let (table, index) = load();
    let evaluator = FilterEvaluator::new(&index);
    let empty = FilterSet::new();

    for row in &table.rows {
        assert!(evaluator.matches(row, &empty, &empty, LookupKey::ProductName));
        assert!(evaluator.matches(row, &empty, &empty, LookupKey::VariantId));
    }
}

#[test]
fn test_filter_monotonicity() {
    let (table, index) = load();
    let evaluator = FilterEvaluator::new(&index);
    let empty = FilterSet::new();

    let narrow = FilterSet::new().allow("brand", ["brand_own"]);
    let wide = FilterSet::new().allow("brand", ["brand_own", "brand_competitor_01"]);

    let count = |filters: &FilterSet| {
        table
            .rows
            .iter()
            .filter(|row| evaluator.matches(row, &empty, filters, LookupKey::ProductName))
            .count()
    };

    assert!(count(&narrow) <= count(&wide));
    assert_eq!(count(&narrow), 6);
    assert_eq!(count(&wide), 8);
}

// =============================================================================
// Expansion
// =============================================================================

#[test]
fn test_cartesian_expansion_count() {
    let specs = vec![
        ChangeSpec::new().with_price(MetricChange::range(1.0, 3.0, 1.0, ChangeKind::Absolute)),
        ChangeSpec::new().with_availability(MetricChange::value(-10.0, ChangeKind::Absolute)),
    ];

    let params = expand_changes(&specs, &ExpandOptions::default()).unwrap();
    assert_eq!(params.len(), 3);
    assert!(params.iter().all(|p| p.availability.unwrap().value == -10.0));
    assert!(params.iter().all(|p| p.cost.is_none()));
}

#[test]
fn test_all_absent_collapse() {
    let specs = vec![ChangeSpec::new().with_attribute_filter("brand", ["brand_own"])];
    let params = expand_changes(&specs, &ExpandOptions::default()).unwrap();

    assert_eq!(params.len(), 1);
    assert!(params[0].is_filter_only());
}

// =============================================================================
// Transformation
// =============================================================================

#[test]
fn test_absolute_price_round_trip() {
    let (table, index) = load();
    let mut session = ScenarioSession::new();

    let spec = ChangeSpec::new().with_price(MetricChange::value(2.5, ChangeKind::Absolute));
    let created = session.create_scenarios(&table, &index, &[spec]).unwrap();

    let row = &created[0].table.rows[0];
    assert_eq!(row["Current Price"], CellValue::from("12.50"));
    // The recorded change is the declared delta, not re-derived.
    assert_eq!(row["Price Change"], CellValue::Number(2.5));
    assert_eq!(row["Price Change Type"], CellValue::from("INCREASE_AMOUNT"));
}

#[test]
fn test_target_price_derivation() {
    let (table, index) = load();
    let mut session = ScenarioSession::new();

    let spec = ChangeSpec::new()
        .with_column_filter("Product Variant Id", ["var_01"])
        .with_price(MetricChange::value(12.5, ChangeKind::Target));
    let created = session.create_scenarios(&table, &index, &[spec]).unwrap();

    let row = &created[0].table.rows[0];
    assert_eq!(row["Current Price"], CellValue::from("12.50"));
    assert_eq!(row["Price Change"], CellValue::Number(2.5));
    assert_eq!(row["Price Change Type"], CellValue::from("TARGET_PRICE"));
    assert_eq!(created[0].meta.modified_rows, 1);
}

#[test]
fn test_availability_clamping() {
    let (table, index) = load();
    let mut session = ScenarioSession::new();

    let spec = ChangeSpec::new()
        .with_column_filter("Product Variant Id", ["var_01"])
        .with_availability(MetricChange::value(20.0, ChangeKind::Percentage));
    let created = session.create_scenarios(&table, &index, &[spec]).unwrap();

    let row = &created[0].table.rows[0];
    // 95 * 1.2 = 114, clamped to the inclusive [0, 100] range.
    assert_eq!(row["Current Availability"], CellValue::from("100.00"));
    assert_eq!(row["Availability Change"], CellValue::Number(20.0));
}

#[test]
fn test_modified_row_counting() {
    let (table, index) = load();
    let mut session = ScenarioSession::new();

    // "Yes" competitor rows: var_03, var_04, var_07, var_08.
    let spec = ChangeSpec::new()
        .with_column_filter("Is Competitor", ["Yes"])
        .with_price(MetricChange::value(-1.0, ChangeKind::Absolute));
    let created = session.create_scenarios(&table, &index, &[spec]).unwrap();

    let scenario = &created[0];
    assert_eq!(scenario.meta.modified_rows, 4);
    assert_eq!(scenario.meta.total_rows, 10);

    // The six non-matching rows are present with original values.
    let untouched: Vec<_> = scenario
        .table
        .rows
        .iter()
        .filter(|row| row["Is Competitor"] == CellValue::from("No"))
        .collect();
    assert_eq!(untouched.len(), 6);
    assert_eq!(untouched[0]["Current Price"], CellValue::from("10.00"));
    assert!(!untouched[0].contains_key("Price Change"));
}

#[test]
fn test_attribute_and_column_filters_combine() {
    let (table, index) = load();
    let mut session = ScenarioSession::new();

    // Own-brand products in the North: var_01, var_05, var_09.
    let spec = ChangeSpec::new()
        .with_attribute_filter("brand", ["brand_own"])
        .with_column_filter("Region", ["North"])
        .with_cost(MetricChange::value(10.0, ChangeKind::Percentage));
    let created = session.create_scenarios(&table, &index, &[spec]).unwrap();

    assert_eq!(created[0].meta.modified_rows, 3);
    let row = &created[0].table.rows[0];
    assert_eq!(row["Current Cost"], CellValue::from("4.40"));
}

#[test]
fn test_session_ordinals_and_names() {
    let (table, index) = load();
    let mut session = ScenarioSession::new();

    let spec =
        ChangeSpec::new().with_price(MetricChange::range(5.0, 10.0, 5.0, ChangeKind::Percentage));
    let created = session.create_scenarios(&table, &index, &[spec]).unwrap();

    assert_eq!(created.len(), 2);
    assert!(created[0].name.starts_with("Scenario_1_P5%_"));
    assert!(created[1].name.starts_with("Scenario_2_P10%_"));

    let spec = ChangeSpec::new().with_cost(MetricChange::value(0.5, ChangeKind::Absolute));
    let next = session.create_scenarios(&table, &index, &[spec]).unwrap();
    assert!(next[0].name.starts_with("Scenario_3_C0.5_"));
}

// =============================================================================
// Loaders and export
// =============================================================================

#[test]
fn test_archive_round_trip() {
    use std::io::Cursor;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("base.csv", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(BASE_CSV.as_bytes()).unwrap();
    writer
        .start_file("master.json", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(MASTER_JSON.as_bytes()).unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let (table, catalog) = parse_archive_bytes(&bytes).unwrap();
    assert_eq!(table.row_count(), 10);
    assert_eq!(catalog.len(), 5);
}

#[test]
fn test_export_round_trip() {
    let (table, index) = load();
    let mut session = ScenarioSession::new();

    let spec = ChangeSpec::new().with_price(MetricChange::value(1.0, ChangeKind::Absolute));
    let created = session.create_scenarios(&table, &index, &[spec]).unwrap();

    let csv = scenario_to_csv(&created[0]).unwrap();
    let reparsed = parse_table_bytes(csv.as_bytes()).unwrap();

    assert_eq!(reparsed.columns, created[0].table.columns);
    assert_eq!(reparsed.row_count(), 10);
    assert_eq!(reparsed.rows[0]["Current Price"], CellValue::from("11.00"));
    assert_eq!(reparsed.rows[0]["Price Change"].as_finite(), Some(1.0));
}

#[test]
fn test_bundle_and_file_store() {
    let (table, index) = load();
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("scenarios")).unwrap();

    let mut session = ScenarioSession::new().with_store(store);
    let spec =
        ChangeSpec::new().with_price(MetricChange::range(1.0, 2.0, 1.0, ChangeKind::Absolute));
    session.create_scenarios(&table, &index, &[spec]).unwrap();

    // The store saw both scenarios, newest first.
    let store = FileStore::new(dir.path().join("scenarios")).unwrap();
    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);

    // And they bundle into a zip with one member each.
    let bytes = archive_bytes(session.scenarios()).unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);
}
