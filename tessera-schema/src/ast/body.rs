//! Procedural bodies shared by routines, triggers and events.
//!
//! Bodies loaded back from a live database never carry comments, so bodies
//! are compared in a normalized form:
//!
//! 1. `/* ... */` block comments are removed (non-greedy, across lines)
//! 2. `#` and `--` line comments are removed through end of line
//! 3. spaces and tabs are trimmed from both ends of every line
//! 4. runs of newlines collapse into a single newline

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::Comparable;

/// Default body of a freshly created routine, trigger or event.
pub const DEFAULT_BODY: &str = "BEGIN\nEND";

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(#|--).*").expect("valid line comment regex"));
static EDGE_BLANKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]+|[ \t]+$").expect("valid edge blank regex"));
static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid newline regex"));

/// Procedural source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeBody(String);

impl CodeBody {
    /// Wrap body text.
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// The body exactly as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The body with comments and insignificant whitespace removed.
    pub fn normalized(&self) -> String {
        normalize_body(&self.0)
    }
}

impl Default for CodeBody {
    fn default() -> Self {
        Self(DEFAULT_BODY.to_string())
    }
}

impl Comparable for CodeBody {
    fn equal_to(&self, other: &Self) -> bool {
        self.0 == other.0 || self.normalized() == other.normalized()
    }
}

impl From<&str> for CodeBody {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CodeBody {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CodeBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip comments and insignificant whitespace from procedural source.
pub fn normalize_body(body: &str) -> String {
    let stripped = BLOCK_COMMENT.replace_all(body, "");
    let stripped = LINE_COMMENT.replace_all(&stripped, "");
    let stripped = EDGE_BLANKS.replace_all(&stripped, "");
    NEWLINE_RUNS.replace_all(&stripped, "\n").into_owned()
}
