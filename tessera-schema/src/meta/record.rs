//! Typed metadata records carried in SQLMETA rows.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::ast::{Column, Index, Routine, Table, Txns};
use crate::error::{SchemaError, SchemaResult};

/// The kind of entity a metadata row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// `which` names a table.
    Table,
    /// `which` is `table.column`.
    Column,
    /// `which` is `table.index`.
    Index,
    /// `which` names a routine.
    Routine,
}

impl MetadataKind {
    /// Get the tag as stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::Column => "COLUMN",
            Self::Index => "INDEX",
            Self::Routine => "ROUTINE",
        }
    }

    /// Metadata fields accepted for this kind.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Table => &["docs", "static"],
            Self::Column => &["docs", "aliases"],
            Self::Index => &["docs", "weak"],
            Self::Routine => &["docs", "args_type", "txns"],
        }
    }

    /// Whether `which` is a dotted `table.child` path for this kind.
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Column | Self::Index)
    }
}

impl FromStr for MetadataKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TABLE" => Ok(Self::Table),
            "COLUMN" => Ok(Self::Column),
            "INDEX" => Ok(Self::Index),
            "ROUTINE" => Ok(Self::Routine),
            other => Err(SchemaError::unknown_metadata_kind(other)),
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableMeta {
    /// Table documentation.
    pub docs: Option<String>,
    /// Whether the table's rows belong to the schema.
    #[serde(rename = "static")]
    pub static_data: Option<bool>,
}

/// Column metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMeta {
    /// Column documentation.
    pub docs: Option<String>,
    /// Former names of the column.
    pub aliases: Option<Vec<SmolStr>>,
}

/// Index metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexMeta {
    /// Index documentation.
    pub docs: Option<String>,
    /// Whether the index exists for application bookkeeping only.
    pub weak: Option<bool>,
}

/// Routine metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutineMeta {
    /// Routine documentation.
    pub docs: Option<String>,
    /// Calling convention tag.
    pub args_type: Option<SmolStr>,
    /// Transaction behaviour.
    pub txns: Option<Txns>,
}

impl TableMeta {
    fn apply(self, table: &mut Table) {
        if let Some(docs) = self.docs {
            table.docs = docs;
        }
        if let Some(static_data) = self.static_data {
            table.static_data = static_data;
        }
    }
}

impl ColumnMeta {
    fn apply(self, column: &mut Column) {
        if let Some(docs) = self.docs {
            column.docs = docs;
        }
        if let Some(aliases) = self.aliases {
            column.aliases = aliases;
        }
    }
}

impl IndexMeta {
    fn apply(self, index: &mut Index) {
        if let Some(docs) = self.docs {
            index.docs = docs;
        }
        if let Some(weak) = self.weak {
            index.weak = weak;
        }
    }
}

impl RoutineMeta {
    fn apply(self, routine: &mut Routine) {
        if let Some(docs) = self.docs {
            routine.docs = docs;
        }
        if let Some(args_type) = self.args_type {
            routine.args_type = args_type;
        }
        if let Some(txns) = self.txns {
            routine.txns = txns;
        }
    }
}

/// An entity resolved from a metadata row, borrowed for patching.
#[derive(Debug)]
pub enum MetaTarget<'a> {
    /// A table.
    Table(&'a mut Table),
    /// A column of a table.
    Column(&'a mut Column),
    /// An index of a table.
    Index(&'a mut Index),
    /// A stored routine.
    Routine(&'a mut Routine),
}

impl MetaTarget<'_> {
    /// The metadata kind this target accepts.
    pub fn kind(&self) -> MetadataKind {
        match self {
            Self::Table(_) => MetadataKind::Table,
            Self::Column(_) => MetadataKind::Column,
            Self::Index(_) => MetadataKind::Index,
            Self::Routine(_) => MetadataKind::Routine,
        }
    }

    /// Validate decoded metadata against this target's record and apply it.
    pub fn apply(self, which: &str, fields: Map<String, Value>) -> SchemaResult<()> {
        let kind = self.kind();
        if let Some(field) = fields.keys().find(|k| !kind.fields().contains(&k.as_str())) {
            return Err(SchemaError::unknown_metadata_field(kind.as_str(), which, field.as_str()));
        }

        let value = Value::Object(fields);
        match self {
            Self::Table(table) => decode::<TableMeta>(which, value)?.apply(table),
            Self::Column(column) => decode::<ColumnMeta>(which, value)?.apply(column),
            Self::Index(index) => decode::<IndexMeta>(which, value)?.apply(index),
            Self::Routine(routine) => decode::<RoutineMeta>(which, value)?.apply(routine),
        }
        Ok(())
    }
}

fn decode<T: for<'de> Deserialize<'de>>(which: &str, value: Value) -> SchemaResult<T> {
    serde_json::from_value(value).map_err(|e| SchemaError::invalid_metadata(which, e.to_string()))
}
