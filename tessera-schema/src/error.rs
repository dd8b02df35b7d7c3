//! Error types for schema merging, metadata reconciliation and configuration.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while working with a schema model.
///
/// Equality never fails: kind and structural mismatches simply compare
/// unequal. Only reconciliation, strict merging and configuration loading
/// surface errors.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(tessera::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A metadata row names a kind that is not TABLE, COLUMN, INDEX or ROUTINE.
    #[error("unknown kind of metadata `{kind}` found in SQLMETA")]
    #[diagnostic(
        code(tessera::schema::unknown_metadata_kind),
        help("expected one of TABLE, COLUMN, INDEX, ROUTINE")
    )]
    UnknownMetadataKind { kind: String },

    /// A metadata row carries a field the target kind does not define.
    #[error("unknown {kind} metadata field `{field}` for `{which}`")]
    #[diagnostic(code(tessera::schema::unknown_metadata_field))]
    UnknownMetadataField {
        kind: String,
        which: String,
        field: String,
    },

    /// A metadata row is malformed (missing field, bad JSON, wrong value shape).
    #[error("invalid metadata for `{which}`: {message}")]
    #[diagnostic(code(tessera::schema::invalid_metadata))]
    InvalidMetadata { which: String, message: String },

    /// A raw SQL literal could not be unquoted.
    #[error("invalid SQL literal `{literal}`: {message}")]
    #[diagnostic(code(tessera::schema::invalid_literal))]
    InvalidLiteral { literal: String, message: String },

    /// Duplicate definition under a strict merge policy.
    #[error("duplicate {kind} `{name}`")]
    #[diagnostic(code(tessera::schema::duplicate))]
    Duplicate { kind: String, name: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    #[diagnostic(code(tessera::schema::config_error))]
    ConfigError { message: String },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(tessera::schema::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },
}

impl SchemaError {
    /// Create an unknown metadata kind error.
    pub fn unknown_metadata_kind(kind: impl Into<String>) -> Self {
        Self::UnknownMetadataKind { kind: kind.into() }
    }

    /// Create an unknown metadata field error.
    pub fn unknown_metadata_field(
        kind: impl Into<String>,
        which: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::UnknownMetadataField {
            kind: kind.into(),
            which: which.into(),
            field: field.into(),
        }
    }

    /// Create an invalid metadata error.
    pub fn invalid_metadata(which: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            which: which.into(),
            message: message.into(),
        }
    }

    /// Create an invalid literal error.
    pub fn invalid_literal(literal: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            literal: literal.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Duplicate {
            kind: kind.into(),
            name: name.into(),
        }
    }
}
