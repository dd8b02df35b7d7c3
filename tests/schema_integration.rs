//! Integration tests for schema comparison, merging and metadata recovery.
//!
//! These tests build schemas the way a loader would (one fragment per source)
//! and check the observable behavior of the public API.

use pretty_assertions::assert_eq;
use tessera::schema::{
    ArgDirection, Argument, Column, Comparable, DuplicatePolicy, EntityRef, Event, Index,
    IndexKind, MergeOptions, Row, Routine, Schema, SchemaError, SqlType, Table, Trigger,
    TriggerEvent, View,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("tessera_schema=trace")
        .try_init();
}

fn orders_table() -> Table {
    Table::new("orders")
        .column(Column::new("id", SqlType::new("INT").unsigned()).not_null())
        .column(Column::new("total", SqlType::new("DECIMAL").param("10").param("2")))
        .index(Index::new("PRIMARY", IndexKind::Primary, vec!["id".into()]))
}

fn add_order(body: &str) -> Routine {
    Routine::procedure("add_order")
        .param("qty", SqlType::new("INT"))
        .out_param("id", SqlType::new("INT"))
        .body(body)
}

fn shop_schema() -> Schema {
    let mut schema = Schema::new();
    schema.set_name("shop");
    schema.add_table(orders_table());
    schema.add_routine(add_order("BEGIN\nINSERT INTO orders VALUES ();\nEND"));
    schema.add_view(View::new("big_orders", "SELECT * FROM orders WHERE total > 100"));
    schema.add_event(Event::new("nightly").schedule("EVERY 1 DAY"));
    schema.add_trigger(
        Trigger::new("orders_ai", "orders")
            .after()
            .on(TriggerEvent::Insert),
    );
    schema
}

fn meta_row(kind: &str, which: &str, value: &str) -> Row {
    Row::from([
        ("kind".into(), format!("'{}'", kind)),
        ("which".into(), format!("'{}'", which)),
        ("value".into(), format!("'{}'", value)),
    ])
}

/// Every schema is equal to itself and to a deep copy of itself
#[test]
fn test_equality_is_reflexive() {
    init_tracing();
    let schema = shop_schema();

    assert!(schema.equal_to(&schema));
    assert!(schema.equal_to(&schema.clone()));
    assert!(schema.tables["orders"].equal_to(&schema.tables["orders"]));
}

/// Routines that differ only in comments and indentation compare equal
#[test]
fn test_comments_do_not_affect_equality() {
    let documented = add_order(
        "BEGIN\n    /* create the order\n       row */\n    INSERT INTO orders VALUES (); -- new row\n\n\nEND",
    );
    let live = add_order("BEGIN\nINSERT INTO orders VALUES ();\nEND");

    assert!(documented.equal_to(&live));
    assert!(live.equal_to(&documented));

    let changed = add_order("BEGIN\nDELETE FROM orders;\nEND");
    assert!(!documented.equal_to(&changed));
}

/// Documentation never takes part in comparison
#[test]
fn test_docs_do_not_affect_equality() {
    let mut documented = shop_schema();
    documented.docs = "The shop".to_string();
    documented.get_table_mut("orders").unwrap().docs = "Customer orders".to_string();
    documented.get_routine_mut("add_order").unwrap().docs = "Creates an order".to_string();

    assert!(documented.equal_to(&shop_schema()));
}

/// An extra entity of any kind makes schemas unequal
#[test]
fn test_cardinality_mismatch() {
    let base = shop_schema();

    let mut extra_table = shop_schema();
    extra_table.add_table(Table::new("invoices"));
    assert!(!base.equal_to(&extra_table));
    assert!(!extra_table.equal_to(&base));

    let mut extra_trigger = shop_schema();
    extra_trigger.add_trigger(Trigger::new("orders_bd", "orders").before().on(TriggerEvent::Delete));
    assert!(!base.equal_to(&extra_trigger));
}

/// Same count but different names are unequal
#[test]
fn test_key_mismatch() {
    let mut a = Schema::new();
    a.add_table(Table::new("orders"));
    let mut b = Schema::new();
    b.add_table(Table::new("invoices"));

    assert!(!a.equal_to(&b));
}

/// Adding an argument changes the routine
#[test]
fn test_argument_count_matters() {
    let base = add_order("BEGIN\nEND");
    let wider = add_order("BEGIN\nEND").param("note", SqlType::new("TEXT"));

    assert!(!base.equal_to(&wider));
}

/// Argument direction and type take part in comparison
#[test]
fn test_argument_details_matter() {
    let a = Argument::new("id", SqlType::new("INT"));
    let b = Argument::new("id", SqlType::new("INT")).dir(ArgDirection::Out);
    let c = Argument::new("id", SqlType::new("BIGINT"));

    assert!(!a.equal_to(&b));
    assert!(!a.equal_to(&c));
    assert!(a.equal_to(&Argument::new("id", SqlType::new("int"))));
}

/// Procedures and functions are never equal
#[test]
fn test_routine_kinds_differ() {
    let procedure = Routine::procedure("total");
    let function = Routine::function("total", SqlType::new("INT"));

    assert!(!procedure.equal_to(&function));
    assert!(!EntityRef::from(&procedure).equal_to(&EntityRef::from(&function)));
}

/// Different entity kinds are never equal
#[test]
fn test_cross_kind_comparison() {
    let table = Table::new("orders");
    let view = View::new("orders", "SELECT 1");

    assert!(!EntityRef::from(&table).equal_to(&EntityRef::from(&view)));
    assert_eq!(EntityRef::from(&view).kind(), "view");
}

/// Merging disjoint fragments yields their union
#[test]
fn test_merge_disjoint_fragments() {
    init_tracing();
    let mut tables = Schema::new();
    tables.add_table(orders_table());
    tables.add_table(Table::new("customers"));

    let mut routines = Schema::new();
    routines.add_routine(add_order("BEGIN\nEND"));
    routines.add_event(Event::new("nightly"));

    let mut merged = Schema::new();
    merged.merge(tables);
    merged.merge(routines);

    let stats = merged.stats();
    assert_eq!(stats.table_count, 2);
    assert_eq!(stats.routine_count, 1);
    assert_eq!(stats.event_count, 1);
    assert_eq!(
        merged.table_names().collect::<Vec<_>>(),
        vec!["orders", "customers"]
    );
}

/// An unnamed schema adopts the name of the first named fragment
#[test]
fn test_merge_adopts_name() {
    let mut merged = Schema::new();
    assert!(merged.name_is_default());

    let mut named = Schema::new();
    named.set_name("shop");
    merged.merge(named);
    assert_eq!(merged.name(), "shop");

    let mut other = Schema::new();
    other.set_name("warehouse");
    merged.merge(other);
    assert_eq!(merged.name(), "shop");
}

/// Merging from a borrowed schema leaves the source untouched
#[test]
fn test_merge_from_copies() {
    let source = shop_schema();
    let mut target = Schema::new();
    target.merge_from(&source);

    assert!(target.equal_to(&source));
    assert_eq!(source.tables.len(), 1);
}

/// Reject policy reports collisions without mutating
#[test]
fn test_merge_reject_duplicates() {
    let mut target = shop_schema();
    let mut fragment = Schema::new();
    fragment.add_table(Table::new("invoices"));
    fragment.add_table(Table::new("orders"));

    let options = MergeOptions {
        on_duplicate: DuplicatePolicy::Reject,
    };
    let err = target.merge_with(fragment, &options).unwrap_err();

    match err {
        SchemaError::Duplicate { kind, name } => {
            assert_eq!(kind, "table");
            assert_eq!(name, "orders");
        }
        other => panic!("Expected Duplicate, got {:?}", other),
    }
    assert!(target.get_table("invoices").is_none());
}

/// Replace policy lets the later fragment win
#[test]
fn test_merge_replace_duplicates() {
    init_tracing();
    let mut target = shop_schema();
    let mut fragment = Schema::new();
    fragment.add_table(Table::new("orders").docs("replacement"));

    target.merge_with(fragment, &MergeOptions::default()).unwrap();
    assert_eq!(target.tables["orders"].docs, "replacement");
    assert!(target.tables["orders"].columns.is_empty());
}

/// A dump's SQLMETA table is folded back onto the schema
#[test]
fn test_sqlmeta_round_trip() {
    init_tracing();
    let mut dumped = shop_schema();
    let mut meta = Table::new("SQLMETA");
    meta.add_row(meta_row("TABLE", "orders", r#"{"docs":"Customer orders","static":true}"#));
    meta.add_row(meta_row("COLUMN", "orders.total", r#"{"docs":"Order total"}"#));
    meta.add_row(meta_row("INDEX", "orders.PRIMARY", r#"{"docs":"Row id"}"#));
    meta.add_row(meta_row("ROUTINE", "add_order", r#"{"docs":"It''s how orders start"}"#));
    dumped.add_table(meta);

    let report = dumped.load_sqlmeta().unwrap();
    assert_eq!(report.applied, 4);
    assert_eq!(report.skipped, 0);

    let orders = &dumped.tables["orders"];
    assert_eq!(orders.docs, "Customer orders");
    assert!(orders.static_data);
    assert_eq!(orders.columns["total"].docs, "Order total");
    assert_eq!(orders.indexes["PRIMARY"].docs, "Row id");
    assert_eq!(dumped.routines["add_order"].docs, "It's how orders start");

    // Reconciled dump compares equal to the live schema
    assert!(dumped.get_table("SQLMETA").is_none());
    assert!(dumped.equal_to(&shop_schema()));
}

/// An unknown metadata kind aborts reconciliation
#[test]
fn test_sqlmeta_unknown_kind() {
    let mut dumped = shop_schema();
    let mut meta = Table::new("SQLMETA");
    meta.add_row(meta_row("WIDGET", "orders", r#"{"docs":"x"}"#));
    dumped.add_table(meta);

    match dumped.load_sqlmeta() {
        Err(SchemaError::UnknownMetadataKind { kind }) => assert_eq!(kind, "WIDGET"),
        other => panic!("Expected UnknownMetadataKind, got {:?}", other),
    }
    assert!(dumped.get_table("SQLMETA").is_some());
}

/// Rows naming dropped entities are skipped
#[test]
fn test_sqlmeta_stale_rows() {
    let mut dumped = shop_schema();
    let mut meta = Table::new("SQLMETA");
    meta.add_row(meta_row("TABLE", "invoices", r#"{"docs":"gone"}"#));
    meta.add_row(meta_row("COLUMN", "orders.discount", r#"{"docs":"gone"}"#));
    meta.add_row(meta_row("TABLE", "orders", r#"{"docs":"kept"}"#));
    dumped.add_table(meta);

    let report = dumped.load_sqlmeta().unwrap();
    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(dumped.tables["orders"].docs, "kept");
    assert!(dumped.get_table("invoices").is_none());
}

/// Triggers are only counted unless deep comparison is requested
#[test]
fn test_trigger_comparison_is_opt_in() {
    let base = shop_schema();
    let mut changed = shop_schema();
    changed.add_trigger(
        Trigger::new("orders_ai", "orders")
            .after()
            .on(TriggerEvent::Insert)
            .body("BEGIN\nSET @n = @n + 1;\nEND"),
    );

    assert!(base.equal_to(&changed));

    let options = tessera::schema::CompareOptions {
        include_triggers: true,
    };
    assert!(!base.equal_to_with(&changed, &options));
    assert!(base.equal_to_with(&shop_schema(), &options));
}

/// The summary line lists every collection
#[test]
fn test_schema_display() {
    insta::assert_snapshot!(
        shop_schema().to_string(),
        @"Schema `shop` (1 tables, 1 routines, 1 views, 1 events, 1 triggers)"
    );
}

/// Serialized schemas carry entity data but not prior-version links
#[test]
fn test_schema_serializes_to_json() {
    let mut schema = shop_schema();
    schema.get_routine_mut("add_order").unwrap().txns = tessera::schema::Txns::Has;

    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(json["name"], "shop");
    assert_eq!(json["charset"], serde_json::Value::Null);
    assert_eq!(json["routines"]["add_order"]["txns"], "HAS");
    assert!(json["tables"]["orders"].get("from").is_none());
    assert!(json.get("from").is_none());
}

/// Charset and collation defaults are applied before comparison
#[test]
fn test_schema_definition_defaults() {
    let mut explicit = Schema::new();
    explicit.set_charset("utf8");
    explicit.set_collate("utf8_general_ci");

    assert!(explicit.equal_to(&Schema::new()));

    explicit.set_charset("utf8mb4");
    assert!(!explicit.equal_to(&Schema::new()));
}
