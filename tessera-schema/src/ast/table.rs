//! Tables, columns, indexes and views.
//!
//! Only the parts of these entities that take part in comparison and
//! metadata reconciliation are modelled here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Comparable, Prior, SqlType, maps_equal};

/// A data row: column name to raw SQL literal token.
pub type Row = IndexMap<SmolStr, String>;

/// A table definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: SmolStr,
    /// Columns keyed by name.
    pub columns: IndexMap<SmolStr, Column>,
    /// Indexes keyed by name.
    pub indexes: IndexMap<SmolStr, Index>,
    /// Seed/static rows, as dumped.
    pub data: Option<Vec<Row>>,
    /// Documentation.
    pub docs: String,
    /// Contents are part of the schema rather than application data.
    pub static_data: bool,
    /// Prior version of this table.
    #[serde(skip)]
    pub from: Prior<Table>,
}

impl Table {
    /// Create a new table.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a column, replacing any column of the same name.
    pub fn add_column(&mut self, column: Column) -> Option<Column> {
        self.columns.insert(column.name.clone(), column)
    }

    /// Add an index, replacing any index of the same name.
    pub fn add_index(&mut self, index: Index) -> Option<Index> {
        self.indexes.insert(index.name.clone(), index)
    }

    /// Append a data row.
    pub fn add_row(&mut self, row: Row) {
        self.data.get_or_insert_with(Vec::new).push(row);
    }

    /// Builder form of [`Table::add_column`].
    pub fn column(mut self, column: Column) -> Self {
        self.add_column(column);
        self
    }

    /// Builder form of [`Table::add_index`].
    pub fn index(mut self, index: Index) -> Self {
        self.add_index(index);
        self
    }

    /// Set documentation.
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Get an index by name.
    pub fn get_index(&self, name: &str) -> Option<&Index> {
        self.indexes.get(name)
    }
}

impl Comparable for Table {
    fn equal_to(&self, other: &Self) -> bool {
        maps_equal(&self.columns, &other.columns) && maps_equal(&self.indexes, &other.indexes)
    }
}

/// A column definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: SmolStr,
    /// Column type.
    pub ty: SqlType,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default value expression.
    pub default: Option<String>,
    /// Documentation.
    pub docs: String,
    /// Former names of this column.
    pub aliases: Vec<SmolStr>,
    /// Prior version of this column.
    #[serde(skip)]
    pub from: Prior<Column>,
}

impl Column {
    /// Create a new nullable column.
    pub fn new(name: impl Into<SmolStr>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            default: None,
            docs: String::new(),
            aliases: Vec::new(),
            from: Prior::none(),
        }
    }

    /// Mark as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set the default expression.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl Comparable for Column {
    fn equal_to(&self, other: &Self) -> bool {
        self.name == other.name
            && self.nullable == other.nullable
            && self.default == other.default
            && self.ty.equal_to(&other.ty)
    }
}

/// An index definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: SmolStr,
    /// Index kind.
    pub kind: IndexKind,
    /// Indexed columns, in order.
    pub columns: Vec<SmolStr>,
    /// Documentation.
    pub docs: String,
    /// Exists for application bookkeeping only and is not enforced.
    pub weak: bool,
    /// Prior version of this index.
    #[serde(skip)]
    pub from: Prior<Index>,
}

impl Index {
    /// Create a new index.
    pub fn new(name: impl Into<SmolStr>, kind: IndexKind, columns: Vec<SmolStr>) -> Self {
        Self {
            name: name.into(),
            kind,
            columns,
            docs: String::new(),
            weak: false,
            from: Prior::none(),
        }
    }
}

impl Comparable for Index {
    fn equal_to(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind && self.columns == other.columns
    }
}

/// Index kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexKind {
    /// The primary key.
    Primary,
    /// A unique key.
    Unique,
    /// A non-unique key.
    #[default]
    Plain,
}

/// A view definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct View {
    /// View name.
    pub name: SmolStr,
    /// The SELECT statement.
    pub def: String,
    /// Documentation.
    pub docs: String,
    /// Prior version of this view.
    #[serde(skip)]
    pub from: Prior<View>,
}

impl View {
    /// Create a new view.
    pub fn new(name: impl Into<SmolStr>, def: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            def: def.into(),
            ..Default::default()
        }
    }

    /// Definition with whitespace runs collapsed.
    fn canonical_def(&self) -> String {
        self.def.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Comparable for View {
    fn equal_to(&self, other: &Self) -> bool {
        self.canonical_def() == other.canonical_def()
    }
}
