//! Semantic equality between schema entities.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::{Argument, Event, Routine, Table, Trigger, View};

/// Semantic equality between two entities of the same kind.
///
/// Unlike `PartialEq`, this ignores documentation, metadata flags, data rows
/// and the `from` back-reference, and it compares procedural bodies after
/// stripping comments and whitespace.
pub trait Comparable {
    /// Check whether `other` is semantically the same entity.
    fn equal_to(&self, other: &Self) -> bool;
}

impl<T: Comparable> Comparable for [T] {
    fn equal_to(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.equal_to(b))
    }
}

impl<T: Comparable> Comparable for Vec<T> {
    fn equal_to(&self, other: &Self) -> bool {
        self.as_slice().equal_to(other.as_slice())
    }
}

/// Compare two name-keyed collections.
///
/// Requires equal cardinality, identical key sets and pairwise equality.
/// Insertion order does not matter.
pub fn maps_equal<T: Comparable>(
    this: &IndexMap<SmolStr, T>,
    other: &IndexMap<SmolStr, T>,
) -> bool {
    if this.len() != other.len() {
        return false;
    }
    this.iter().all(|(key, value)| match other.get(key) {
        Some(theirs) => value.equal_to(theirs),
        None => false,
    })
}

/// A borrowed entity of any kind, for comparisons across kinds.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    /// A table.
    Table(&'a Table),
    /// A view.
    View(&'a View),
    /// A procedure or function.
    Routine(&'a Routine),
    /// A routine argument.
    Argument(&'a Argument),
    /// A scheduled event.
    Event(&'a Event),
    /// A trigger.
    Trigger(&'a Trigger),
}

impl EntityRef<'_> {
    /// Human readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::View(_) => "view",
            Self::Routine(r) => r.kind.as_str(),
            Self::Argument(_) => "argument",
            Self::Event(_) => "event",
            Self::Trigger(_) => "trigger",
        }
    }

    /// Entity name.
    pub fn name(&self) -> &str {
        match self {
            Self::Table(t) => &t.name,
            Self::View(v) => &v.name,
            Self::Routine(r) => &r.name,
            Self::Argument(a) => &a.name,
            Self::Event(e) => &e.name,
            Self::Trigger(t) => &t.name,
        }
    }

    /// Compare two entities; different kinds are never equal.
    pub fn equal_to(&self, other: &EntityRef<'_>) -> bool {
        match (self, other) {
            (Self::Table(a), EntityRef::Table(b)) => a.equal_to(b),
            (Self::View(a), EntityRef::View(b)) => a.equal_to(b),
            (Self::Routine(a), EntityRef::Routine(b)) => a.equal_to(b),
            (Self::Argument(a), EntityRef::Argument(b)) => a.equal_to(b),
            (Self::Event(a), EntityRef::Event(b)) => a.equal_to(b),
            (Self::Trigger(a), EntityRef::Trigger(b)) => a.equal_to(b),
            _ => false,
        }
    }
}

impl<'a> From<&'a Table> for EntityRef<'a> {
    fn from(t: &'a Table) -> Self {
        Self::Table(t)
    }
}

impl<'a> From<&'a View> for EntityRef<'a> {
    fn from(v: &'a View) -> Self {
        Self::View(v)
    }
}

impl<'a> From<&'a Routine> for EntityRef<'a> {
    fn from(r: &'a Routine) -> Self {
        Self::Routine(r)
    }
}

impl<'a> From<&'a Argument> for EntityRef<'a> {
    fn from(a: &'a Argument) -> Self {
        Self::Argument(a)
    }
}

impl<'a> From<&'a Event> for EntityRef<'a> {
    fn from(e: &'a Event) -> Self {
        Self::Event(e)
    }
}

impl<'a> From<&'a Trigger> for EntityRef<'a> {
    fn from(t: &'a Trigger) -> Self {
        Self::Trigger(t)
    }
}
