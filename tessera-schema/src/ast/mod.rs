//! Schema entity types.
//!
//! This module contains all the types that represent a schema snapshot and
//! the [`Comparable`] contract they share.

mod body;
mod comparable;
mod event;
mod routine;
mod schema;
mod table;
mod types;

pub use body::*;
pub use comparable::*;
pub use event::*;
pub use routine::*;
pub use schema::*;
pub use table::*;
pub use types::*;
