//! Top-level schema definition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::{Event, Prior, Routine, Table, Trigger, View, maps_equal};
use crate::error::{SchemaError, SchemaResult};

/// Effective schema name when none was set.
pub const DEFAULT_NAME: &str = "database";
/// Effective character set when none was set.
pub const DEFAULT_CHARSET: &str = "utf8";
/// Effective collation when none was set.
pub const DEFAULT_COLLATE: &str = "utf8_general_ci";

/// A complete database schema.
///
/// Scalar properties are `None` until explicitly set; accessors fall back to
/// [`DEFAULT_NAME`], [`DEFAULT_CHARSET`] and [`DEFAULT_COLLATE`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    name: Option<SmolStr>,
    charset: Option<SmolStr>,
    collate: Option<SmolStr>,
    /// Free-form documentation.
    pub docs: String,
    /// All tables in the schema.
    pub tables: IndexMap<SmolStr, Table>,
    /// All stored routines in the schema.
    pub routines: IndexMap<SmolStr, Routine>,
    /// All views in the schema.
    pub views: IndexMap<SmolStr, View>,
    /// All scheduled events in the schema.
    pub events: IndexMap<SmolStr, Event>,
    /// All triggers in the schema.
    pub triggers: IndexMap<SmolStr, Trigger>,
    /// Prior version of this schema.
    #[serde(skip)]
    pub from: Prior<Schema>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entity and forget all explicitly set properties.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get the effective schema name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Set the schema name.
    ///
    /// Setting the default name leaves the schema in its unnamed state, so a
    /// later merge may still adopt another name.
    pub fn set_name(&mut self, name: impl Into<SmolStr>) {
        let name = name.into();
        self.name = (name != DEFAULT_NAME).then_some(name);
    }

    /// Check whether the name was never explicitly set.
    pub fn name_is_default(&self) -> bool {
        self.name.is_none()
    }

    /// Get the effective character set.
    pub fn charset(&self) -> &str {
        self.charset.as_deref().unwrap_or(DEFAULT_CHARSET)
    }

    /// Set the character set.
    ///
    /// Like [`Schema::set_name`], setting the default leaves it unset.
    pub fn set_charset(&mut self, charset: impl Into<SmolStr>) {
        let charset = charset.into();
        self.charset = (charset != DEFAULT_CHARSET).then_some(charset);
    }

    /// Get the effective collation.
    pub fn collate(&self) -> &str {
        self.collate.as_deref().unwrap_or(DEFAULT_COLLATE)
    }

    /// Set the collation.
    ///
    /// Like [`Schema::set_name`], setting the default leaves it unset.
    pub fn set_collate(&mut self, collate: impl Into<SmolStr>) {
        let collate = collate.into();
        self.collate = (collate != DEFAULT_COLLATE).then_some(collate);
    }

    /// Add a table, returning the one it replaced.
    pub fn add_table(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.name.clone(), table)
    }

    /// Add a routine, returning the one it replaced.
    pub fn add_routine(&mut self, routine: Routine) -> Option<Routine> {
        self.routines.insert(routine.name.clone(), routine)
    }

    /// Add a view, returning the one it replaced.
    pub fn add_view(&mut self, view: View) -> Option<View> {
        self.views.insert(view.name.clone(), view)
    }

    /// Add an event, returning the one it replaced.
    pub fn add_event(&mut self, event: Event) -> Option<Event> {
        self.events.insert(event.name.clone(), event)
    }

    /// Add a trigger, returning the one it replaced.
    pub fn add_trigger(&mut self, trigger: Trigger) -> Option<Trigger> {
        self.triggers.insert(trigger.name.clone(), trigger)
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Get a mutable table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Get a routine by name.
    pub fn get_routine(&self, name: &str) -> Option<&Routine> {
        self.routines.get(name)
    }

    /// Get a mutable routine by name.
    pub fn get_routine_mut(&mut self, name: &str) -> Option<&mut Routine> {
        self.routines.get_mut(name)
    }

    /// Get a view by name.
    pub fn get_view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    /// Get an event by name.
    pub fn get_event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    /// Get a trigger by name.
    pub fn get_trigger(&self, name: &str) -> Option<&Trigger> {
        self.triggers.get(name)
    }

    /// Get all table names.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    /// Get all routine names.
    pub fn routine_names(&self) -> impl Iterator<Item = &str> {
        self.routines.keys().map(|s| s.as_str())
    }

    /// Merge another schema into this one, consuming it.
    ///
    /// Unset properties adopt the other schema's values and every entity of
    /// `other` is moved in. Entities with a name already present replace the
    /// existing entry.
    pub fn merge(&mut self, other: Schema) {
        self.merge_scalars(&other);
        self.tables.extend(other.tables);
        self.routines.extend(other.routines);
        self.views.extend(other.views);
        self.events.extend(other.events);
        self.triggers.extend(other.triggers);
    }

    /// Merge a deep copy of another schema into this one.
    pub fn merge_from(&mut self, other: &Schema) {
        self.merge(other.clone());
    }

    /// Merge another schema into this one under an explicit policy.
    ///
    /// With [`DuplicatePolicy::Reject`] the first name collision is reported
    /// and `self` is left untouched.
    pub fn merge_with(&mut self, other: Schema, options: &MergeOptions) -> SchemaResult<()> {
        match options.on_duplicate {
            DuplicatePolicy::Replace => {
                for (kind, name) in self.collisions(&other) {
                    debug!(kind, name, "replacing entity during merge");
                }
            }
            DuplicatePolicy::Reject => {
                if let Some((kind, name)) = self.collisions(&other).next() {
                    return Err(SchemaError::duplicate(kind, name));
                }
            }
        }
        self.merge(other);
        Ok(())
    }

    fn merge_scalars(&mut self, other: &Schema) {
        if self.name.is_none() {
            self.name = other.name.clone();
        }
        if self.charset.is_none() {
            self.charset = other.charset.clone();
        }
        if self.collate.is_none() {
            self.collate = other.collate.clone();
        }
        if self.docs.is_empty() {
            self.docs = other.docs.clone();
        }
    }

    /// Names present in both schemas, tagged with their entity kind.
    fn collisions<'a>(&'a self, other: &'a Schema) -> impl Iterator<Item = (&'static str, &'a str)> {
        fn shared<'a, A, B>(
            kind: &'static str,
            mine: &'a IndexMap<SmolStr, A>,
            theirs: &'a IndexMap<SmolStr, B>,
        ) -> impl Iterator<Item = (&'static str, &'a str)> {
            theirs
                .keys()
                .filter(move |k| mine.contains_key(k.as_str()))
                .map(move |k| (kind, k.as_str()))
        }

        shared("table", &self.tables, &other.tables)
            .chain(shared("routine", &self.routines, &other.routines))
            .chain(shared("view", &self.views, &other.views))
            .chain(shared("event", &self.events, &other.events))
            .chain(shared("trigger", &self.triggers, &other.triggers))
    }

    /// Check whether the schema-level definition (charset, collation) matches.
    pub fn schema_def_equal_to(&self, other: &Schema) -> bool {
        self.charset() == other.charset() && self.collate() == other.collate()
    }

    /// Check whether two schemas describe the same database.
    ///
    /// Triggers are only counted, not compared; see [`Schema::equal_to_with`].
    pub fn equal_to(&self, other: &Schema) -> bool {
        self.equal_to_with(other, &CompareOptions::default())
    }

    /// Check whether two schemas describe the same database.
    pub fn equal_to_with(&self, other: &Schema, options: &CompareOptions) -> bool {
        if !self.schema_def_equal_to(other) {
            trace!("schema definitions differ");
            return false;
        }
        if self.tables.len() != other.tables.len()
            || self.routines.len() != other.routines.len()
            || self.events.len() != other.events.len()
            || self.triggers.len() != other.triggers.len()
            || self.views.len() != other.views.len()
        {
            trace!("entity counts differ");
            return false;
        }

        let same = maps_equal(&self.tables, &other.tables)
            && maps_equal(&self.routines, &other.routines)
            && maps_equal(&self.events, &other.events)
            && maps_equal(&self.views, &other.views)
            && (!options.include_triggers || maps_equal(&self.triggers, &other.triggers));
        if !same {
            trace!("entity definitions differ");
        }
        same
    }

    /// Get statistics about the schema.
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            table_count: self.tables.len(),
            routine_count: self.routines.len(),
            view_count: self.views.len(),
            event_count: self.events.len(),
            trigger_count: self.triggers.len(),
        }
    }
}

/// Options for [`Schema::equal_to_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareOptions {
    /// Compare trigger definitions, not just their count.
    #[serde(default)]
    pub include_triggers: bool,
}

/// Options for [`Schema::merge_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeOptions {
    /// What to do when both schemas define an entity with the same name.
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

/// Handling of same-name entities during a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The incoming entity replaces the existing one.
    #[default]
    Replace,
    /// The merge fails with [`SchemaError::Duplicate`].
    Reject,
}

/// Schema statistics for debugging/info.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaStats {
    /// Number of tables.
    pub table_count: usize,
    /// Number of routines.
    pub routine_count: usize,
    /// Number of views.
    pub view_count: usize,
    /// Number of events.
    pub event_count: usize,
    /// Number of triggers.
    pub trigger_count: usize,
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        write!(
            f,
            "Schema `{}` ({} tables, {} routines, {} views, {} events, {} triggers)",
            self.name(),
            stats.table_count,
            stats.routine_count,
            stats.view_count,
            stats.event_count,
            stats.trigger_count
        )
    }
}
