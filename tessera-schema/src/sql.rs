//! SQL lexical helpers: identifier quoting and literal unquoting.

use crate::error::{SchemaError, SchemaResult};

/// Escape an identifier with backticks, doubling embedded backticks.
pub fn escape_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Check if an identifier needs quoting.
pub fn needs_quoting(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "add", "all", "alter", "and", "as", "asc", "before", "between", "by", "call", "case",
        "change", "check", "column", "condition", "create", "cross", "current_date", "database",
        "declare", "default", "delete", "desc", "distinct", "div", "drop", "each", "else",
        "exists", "false", "for", "foreign", "from", "function", "group", "having", "if", "in",
        "index", "inner", "inout", "insert", "interval", "into", "is", "join", "key", "keys",
        "left", "like", "limit", "lock", "match", "mod", "not", "null", "on", "or", "order",
        "out", "outer", "primary", "procedure", "range", "read", "references", "rename",
        "replace", "return", "right", "schema", "select", "set", "show", "table", "then", "to",
        "trigger", "true", "union", "unique", "update", "usage", "use", "using", "values",
        "when", "where", "while", "with", "write",
    ];

    if name.is_empty() || RESERVED.contains(&name.to_ascii_lowercase().as_str()) {
        return true;
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Quote an identifier if needed.
pub fn quote_ident(name: &str) -> String {
    if needs_quoting(name) {
        escape_identifier(name)
    } else {
        name.to_string()
    }
}

/// Turns a raw SQL literal token into its string value.
///
/// Metadata rows arrive exactly as they were dumped, so every field has to
/// pass through one of these before it can be interpreted.
pub trait LiteralUnquoter {
    /// Unquote a single literal token.
    fn unquote(&self, raw: &str) -> SchemaResult<String>;
}

/// MySQL-flavoured literal unquoting.
///
/// Accepts single- or double-quoted strings (doubled quotes and backslash
/// escapes), `NULL` (as the empty string) and bare tokens such as numbers,
/// which are returned verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlLiteralUnquoter;

impl LiteralUnquoter for SqlLiteralUnquoter {
    fn unquote(&self, raw: &str) -> SchemaResult<String> {
        unquote_literal(raw)
    }
}

impl<F> LiteralUnquoter for F
where
    F: Fn(&str) -> SchemaResult<String>,
{
    fn unquote(&self, raw: &str) -> SchemaResult<String> {
        self(raw)
    }
}

/// Unquote a single SQL literal token.
pub fn unquote_literal(raw: &str) -> SchemaResult<String> {
    let token = raw.trim();
    match token.chars().next() {
        None => Ok(String::new()),
        Some(quote @ ('\'' | '"')) => unquote_string(token, quote),
        Some(_) if token.eq_ignore_ascii_case("NULL") => Ok(String::new()),
        Some(_) => Ok(token.to_string()),
    }
}

fn unquote_string(token: &str, quote: char) -> SchemaResult<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token[quote.len_utf8()..].chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('b') => out.push('\u{8}'),
                Some('0') => out.push('\0'),
                Some('Z') => out.push('\u{1a}'),
                // Kept escaped so LIKE patterns survive
                Some(c @ ('%' | '_')) => {
                    out.push('\\');
                    out.push(c);
                }
                Some(c) => out.push(c),
                None => break,
            },
            c if c == quote => {
                if chars.peek() == Some(&quote) {
                    chars.next();
                    out.push(quote);
                    continue;
                }
                let rest: String = chars.collect();
                if !rest.trim().is_empty() {
                    return Err(SchemaError::invalid_literal(
                        token,
                        "unexpected characters after closing quote",
                    ));
                }
                return Ok(out);
            }
            c => out.push(c),
        }
    }

    Err(SchemaError::invalid_literal(token, "unterminated string"))
}
