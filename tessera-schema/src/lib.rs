//! # tessera-schema
//!
//! Comparable in-memory model of a relational database schema.
//!
//! This crate provides:
//! - Entity types for tables, views, stored routines, triggers and events
//! - Semantic equality that ignores comments, whitespace and documentation
//! - Merging of partial schema fragments into one logical schema
//! - Recovery of documentation stored in a dump's `SQLMETA` table
//! - Configuration parser for `tessera.toml` files
//!
//! ## Example
//!
//! ```rust
//! use tessera_schema::{Routine, Schema, Table};
//!
//! let mut documented = Schema::new();
//! documented.set_name("shop");
//! documented.add_table(Table::new("orders"));
//! documented.add_routine(
//!     Routine::procedure("purge").body("BEGIN\n  -- old rows only\n  DELETE FROM orders;\nEND"),
//! );
//!
//! let mut live = Schema::new();
//! live.add_table(Table::new("orders"));
//! live.add_routine(Routine::procedure("purge").body("BEGIN\nDELETE FROM orders;\nEND"));
//!
//! assert!(documented.equal_to(&live));
//!
//! let mut merged = Schema::new();
//! merged.merge(documented);
//! assert_eq!(merged.name(), "shop");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod meta;
pub mod sql;

pub use ast::*;
pub use config::TesseraConfig;
pub use error::{SchemaError, SchemaResult};
pub use meta::{MetadataConfig, MetadataKind, MetadataReconciler, ReconcileReport};
pub use sql::{LiteralUnquoter, SqlLiteralUnquoter, quote_ident, unquote_literal};
