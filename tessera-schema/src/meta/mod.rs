//! Recovery of out-of-band metadata from the `SQLMETA` table.
//!
//! The database engine has nowhere to keep documentation and similar
//! annotations, so dumps carry them in a reserved table with three columns:
//!
//! | column  | content                                             |
//! |---------|-----------------------------------------------------|
//! | `kind`  | `TABLE`, `COLUMN`, `INDEX` or `ROUTINE`             |
//! | `which` | entity name; `table.child` for columns and indexes  |
//! | `value` | JSON object of metadata fields                      |
//!
//! Every field is a raw SQL literal. Reconciliation folds each row back onto
//! the entity it names and then removes the `SQLMETA` table from the schema.
//! Rows naming entities that no longer exist are skipped.
//!
//! ```rust
//! use tessera_schema::ast::{Row, Schema, Table};
//!
//! let mut meta = Table::new("SQLMETA");
//! meta.add_row(Row::from([
//!     ("kind".into(), "'TABLE'".to_string()),
//!     ("which".into(), "'orders'".to_string()),
//!     ("value".into(), r#"'{"docs":"Customer orders"}'"#.to_string()),
//! ]));
//!
//! let mut schema = Schema::new();
//! schema.add_table(Table::new("orders"));
//! schema.add_table(meta);
//!
//! schema.load_sqlmeta().unwrap();
//! assert_eq!(schema.tables["orders"].docs, "Customer orders");
//! assert!(schema.get_table("SQLMETA").is_none());
//! ```

mod record;

pub use record::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::ast::{Row, Schema};
use crate::error::{SchemaError, SchemaResult};
use crate::sql::{LiteralUnquoter, SqlLiteralUnquoter};

/// Default name of the metadata table.
pub const SQLMETA_TABLE: &str = "SQLMETA";

/// Metadata reconciliation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataConfig {
    /// Name of the metadata table.
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    SQLMETA_TABLE.to_string()
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Rows applied to an entity.
    pub applied: usize,
    /// Rows naming an entity that does not exist.
    pub skipped: usize,
}

/// Folds `SQLMETA` rows back onto the entities they describe.
#[derive(Debug, Clone, Default)]
pub struct MetadataReconciler<U = SqlLiteralUnquoter> {
    config: MetadataConfig,
    unquoter: U,
}

impl MetadataReconciler {
    /// Create a reconciler using the built-in literal unquoting.
    pub fn new(config: MetadataConfig) -> Self {
        Self {
            config,
            unquoter: SqlLiteralUnquoter,
        }
    }
}

impl<U: LiteralUnquoter> MetadataReconciler<U> {
    /// Use a different literal unquoter.
    pub fn with_unquoter<V: LiteralUnquoter>(self, unquoter: V) -> MetadataReconciler<V> {
        MetadataReconciler {
            config: self.config,
            unquoter,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Apply every metadata row to `schema` and drop the metadata table.
    ///
    /// Nothing happens when the metadata table is missing or carries no rows.
    /// On error the metadata table is left in place; rows processed before
    /// the failing one stay applied.
    pub fn reconcile(&self, schema: &mut Schema) -> SchemaResult<ReconcileReport> {
        let name = self.config.table.as_str();
        let Some(rows) = schema.get_table_mut(name).and_then(|t| t.data.take()) else {
            return Ok(ReconcileReport::default());
        };

        match self.apply_rows(schema, &rows) {
            Ok(report) => {
                schema.tables.shift_remove(name);
                info!(
                    table = name,
                    applied = report.applied,
                    skipped = report.skipped,
                    "reconciled schema metadata"
                );
                Ok(report)
            }
            Err(e) => {
                if let Some(table) = schema.get_table_mut(name) {
                    table.data = Some(rows);
                }
                Err(e)
            }
        }
    }

    fn apply_rows(&self, schema: &mut Schema, rows: &[Row]) -> SchemaResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for (index, row) in rows.iter().enumerate() {
            let kind: MetadataKind = self.field(row, index, "kind")?.parse()?;
            let which = self.field(row, index, "which")?;

            let Some(target) = resolve(schema, kind, &which) else {
                debug!(%kind, which = %which, "skipping metadata for missing entity");
                report.skipped += 1;
                continue;
            };

            let value = self.field(row, index, "value")?;
            target.apply(&which, parse_object(&which, &value)?)?;
            report.applied += 1;
        }

        Ok(report)
    }

    fn field(&self, row: &Row, index: usize, column: &str) -> SchemaResult<String> {
        let raw = row.get(column).ok_or_else(|| {
            SchemaError::invalid_metadata(
                format!("row {}", index),
                format!("missing `{}` field", column),
            )
        })?;
        self.unquoter.unquote(raw)
    }
}

/// Find the entity a metadata row refers to.
///
/// Columns and indexes are named `table.child`; segments past the second
/// are ignored.
pub fn resolve<'a>(schema: &'a mut Schema, kind: MetadataKind, which: &str) -> Option<MetaTarget<'a>> {
    if !kind.is_nested() {
        return match kind {
            MetadataKind::Routine => schema.routines.get_mut(which).map(MetaTarget::Routine),
            _ => schema.tables.get_mut(which).map(MetaTarget::Table),
        };
    }

    let mut path = which.split('.');
    let table = schema.tables.get_mut(path.next()?)?;
    let child = path.next()?;
    match kind {
        MetadataKind::Index => table.indexes.get_mut(child).map(MetaTarget::Index),
        _ => table.columns.get_mut(child).map(MetaTarget::Column),
    }
}

fn parse_object(which: &str, value: &str) -> SchemaResult<Map<String, Value>> {
    match serde_json::from_str(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(SchemaError::invalid_metadata(which, "expected a JSON object")),
        Err(e) => Err(SchemaError::invalid_metadata(which, e.to_string())),
    }
}

impl Schema {
    /// Fold the `SQLMETA` table of a raw dump back onto this schema.
    ///
    /// See [`MetadataReconciler::reconcile`].
    pub fn load_sqlmeta(&mut self) -> SchemaResult<ReconcileReport> {
        MetadataReconciler::new(MetadataConfig::default()).reconcile(self)
    }
}
