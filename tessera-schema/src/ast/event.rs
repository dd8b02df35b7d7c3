//! Scheduled events and triggers.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{CodeBody, Comparable, Prior};

// ============================================================================
// Event
// ============================================================================

/// A scheduled event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    /// Event name.
    pub name: SmolStr,
    /// Schedule clause (`EVERY 1 DAY`, `AT '2024-01-01 00:00:00'`, ...).
    pub schedule: String,
    /// `ON COMPLETION PRESERVE`.
    pub preserve: bool,
    /// Enabled state, when declared.
    pub status: Option<EventStatus>,
    /// Documentation.
    pub docs: String,
    /// Event body.
    pub body: CodeBody,
    /// Prior version of this event.
    #[serde(skip)]
    pub from: Prior<Event>,
}

impl Event {
    /// Create a new event.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the schedule clause.
    pub fn schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = schedule.into();
        self
    }

    /// Preserve the event after completion.
    pub fn preserve(mut self) -> Self {
        self.preserve = true;
        self
    }

    /// Set the status.
    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<CodeBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set documentation.
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }
}

impl Comparable for Event {
    fn equal_to(&self, other: &Self) -> bool {
        self.body.equal_to(&other.body)
            && self.schedule == other.schedule
            && self.preserve == other.preserve
            && self.status == other.status
    }
}

/// Event status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    /// Runs on schedule.
    Enable,
    /// Kept but never runs.
    Disable,
    /// Enabled on the primary only.
    DisableOnSlave,
}

impl EventStatus {
    /// Get SQL status string.
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::Enable => "ENABLE",
            Self::Disable => "DISABLE",
            Self::DisableOnSlave => "DISABLE ON SLAVE",
        }
    }
}

// ============================================================================
// Trigger
// ============================================================================

/// A table trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trigger {
    /// Trigger name.
    pub name: SmolStr,
    /// Trigger timing.
    pub time: TriggerTiming,
    /// Statement that fires the trigger.
    pub event: TriggerEvent,
    /// Table the trigger is on.
    pub table: SmolStr,
    /// Trigger body.
    pub body: CodeBody,
    /// Documentation.
    pub docs: String,
    /// Prior version of this trigger.
    #[serde(skip)]
    pub from: Prior<Trigger>,
}

impl Trigger {
    /// Create a new trigger definition.
    pub fn new(name: impl Into<SmolStr>, table: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            ..Default::default()
        }
    }

    /// Set timing to BEFORE.
    pub fn before(mut self) -> Self {
        self.time = TriggerTiming::Before;
        self
    }

    /// Set timing to AFTER.
    pub fn after(mut self) -> Self {
        self.time = TriggerTiming::After;
        self
    }

    /// Set the firing statement.
    pub fn on(mut self, event: TriggerEvent) -> Self {
        self.event = event;
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<CodeBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set documentation.
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }
}

/// Triggers also compare the table they are attached to: the same body on
/// another table is a different trigger.
impl Comparable for Trigger {
    fn equal_to(&self, other: &Self) -> bool {
        self.body.equal_to(&other.body)
            && self.time == other.time
            && self.event == other.event
            && self.table == other.table
    }
}

/// Trigger timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerTiming {
    /// Fires before the row change.
    #[default]
    Before,
    /// Fires after the row change.
    After,
}

impl TriggerTiming {
    /// Get SQL timing string.
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
        }
    }
}

/// Trigger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// `INSERT`
    #[default]
    Insert,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
}

impl TriggerEvent {
    /// Get SQL event string.
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}
