//! Integration tests for configuration parsing and handling.
//!
//! These tests verify that `tessera.toml` settings drive comparison,
//! merging and metadata reconciliation.

use tessera::schema::{
    DuplicatePolicy, Row, Schema, SchemaError, Table, TesseraConfig, Trigger, TriggerEvent,
};

/// Test empty configuration falls back to defaults
#[test]
fn test_config_minimal() {
    let config = TesseraConfig::from_str("").expect("Failed to parse config");

    assert!(!config.compare.include_triggers);
    assert_eq!(config.merge.on_duplicate, DuplicatePolicy::Replace);
    assert_eq!(config.metadata.table, "SQLMETA");
}

/// Test full configuration with all options
#[test]
fn test_config_full() {
    let config_str = r#"
        [compare]
        include_triggers = true

        [merge]
        on_duplicate = "reject"

        [metadata]
        table = "_schema_meta"
    "#;

    let config = TesseraConfig::from_str(config_str).expect("Failed to parse config");

    assert!(config.compare.include_triggers);
    assert_eq!(config.merge.on_duplicate, DuplicatePolicy::Reject);
    assert_eq!(config.metadata.table, "_schema_meta");
}

/// Test unknown sections are rejected
#[test]
fn test_config_unknown_section() {
    let err = TesseraConfig::from_str("[database]\nurl = \"mysql://localhost\"\n").unwrap_err();
    assert!(matches!(err, SchemaError::TomlError { .. }));
}

/// Test environment variables are expanded before parsing
#[test]
fn test_config_env_expansion() {
    // SAFETY: This test runs single-threaded and we clean up after
    unsafe {
        std::env::set_var("TESSERA_IT_META_TABLE", "dump_meta");
    }
    let config = TesseraConfig::from_str("[metadata]\ntable = \"${TESSERA_IT_META_TABLE}\"\n")
        .expect("Failed to parse config");
    unsafe {
        std::env::remove_var("TESSERA_IT_META_TABLE");
    }

    assert_eq!(config.metadata.table, "dump_meta");
}

/// Test the configured comparison options reach schema equality
#[test]
fn test_config_drives_comparison() {
    let config = TesseraConfig::from_str("[compare]\ninclude_triggers = true\n").unwrap();

    let mut a = Schema::new();
    a.add_trigger(Trigger::new("audit", "orders").after().on(TriggerEvent::Update));
    let mut b = Schema::new();
    b.add_trigger(Trigger::new("audit", "orders").before().on(TriggerEvent::Update));

    assert!(a.equal_to(&b));
    assert!(!a.equal_to_with(&b, &config.compare));
}

/// Test the configured merge policy reaches schema merging
#[test]
fn test_config_drives_merge() {
    let config = TesseraConfig::from_str("[merge]\non_duplicate = \"reject\"\n").unwrap();

    let mut target = Schema::new();
    target.add_table(Table::new("orders"));
    let mut fragment = Schema::new();
    fragment.add_table(Table::new("orders"));

    assert!(matches!(
        target.merge_with(fragment, &config.merge),
        Err(SchemaError::Duplicate { .. })
    ));
}

/// Test the configured metadata table name reaches reconciliation
#[test]
fn test_config_drives_reconciler() {
    let config = TesseraConfig::from_str("[metadata]\ntable = \"_meta\"\n").unwrap();

    let mut schema = Schema::new();
    schema.add_table(Table::new("orders"));
    let mut meta = Table::new("_meta");
    meta.add_row(Row::from([
        ("kind".into(), "'TABLE'".to_string()),
        ("which".into(), "'orders'".to_string()),
        ("value".into(), r#"'{"docs":"Customer orders"}'"#.to_string()),
    ]));
    schema.add_table(meta);

    let report = config.reconciler().reconcile(&mut schema).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(schema.tables["orders"].docs, "Customer orders");
    assert!(schema.get_table("_meta").is_none());
}

/// Test loading from a missing file reports the path
#[test]
fn test_config_missing_file() {
    match TesseraConfig::from_file("/nonexistent/tessera.toml") {
        Err(SchemaError::IoError { path, .. }) => assert_eq!(path, "/nonexistent/tessera.toml"),
        other => panic!("Expected IoError, got {:?}", other),
    }
}
