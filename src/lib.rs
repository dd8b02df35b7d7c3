//! # Tessera
//!
//! Comparable, mergeable in-memory models of relational database schemas.
//!
//! Tessera provides:
//! - Schema entities (tables, views, routines, triggers, events) with semantic equality
//! - Comment- and whitespace-insensitive comparison of routine bodies
//! - Merging of schema fragments loaded from separate sources
//! - Recovery of documentation from a dump's `SQLMETA` table
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::prelude::*;
//! use tessera::schema::Row;
//!
//! let mut dumped = Schema::new();
//! dumped.add_table(Table::new("orders"));
//!
//! let mut meta = Table::new("SQLMETA");
//! meta.add_row(Row::from([
//!     ("kind".into(), "'TABLE'".to_string()),
//!     ("which".into(), "'orders'".to_string()),
//!     ("value".into(), r#"'{"docs":"Customer orders"}'"#.to_string()),
//! ]));
//! dumped.add_table(meta);
//!
//! let report = dumped.load_sqlmeta()?;
//! assert_eq!(report.applied, 1);
//! assert_eq!(dumped.get_table("orders").unwrap().docs, "Customer orders");
//! assert!(dumped.get_table("SQLMETA").is_none());
//! # Ok::<(), tessera::SchemaError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Schema model, comparison, merging and metadata reconciliation.
pub mod schema {
    pub use tessera_schema::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::schema::{
        CodeBody, Comparable, MetadataReconciler, Routine, Schema, Table, TesseraConfig,
    };
}

// Re-export key types at the crate root
pub use schema::{Schema, SchemaError};
