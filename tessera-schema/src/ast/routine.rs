//! Stored procedures, stored functions and their arguments.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{CodeBody, Comparable, Prior, SqlType};
use crate::sql::quote_ident;

/// Default calling convention tag.
pub const DEFAULT_ARGS_TYPE: &str = "LIST";

/// Default return tag of a stored procedure.
pub const DEFAULT_PROC_RETURNS: &str = "NONE";

// ============================================================================
// Routine
// ============================================================================

/// A stored procedure or function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    /// Routine name.
    pub name: SmolStr,
    /// Procedure or function, with its return shape.
    pub kind: RoutineKind,
    /// Arguments, in declaration order.
    pub args: Vec<Argument>,
    /// Calling convention tag.
    pub args_type: SmolStr,
    /// `DETERMINISTIC` characteristic.
    pub deterministic: bool,
    /// SQL data access characteristic.
    pub access: SqlAccess,
    /// Transaction behaviour.
    pub txns: Txns,
    /// Documentation.
    pub docs: String,
    /// Routine body.
    pub body: CodeBody,
    /// Prior version of this routine.
    #[serde(skip)]
    pub from: Prior<Routine>,
}

/// Closed set of routine variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineKind {
    /// A stored procedure.
    Procedure {
        /// What the procedure yields to its caller.
        returns: ProcReturns,
    },
    /// A stored function.
    Function {
        /// Return type.
        returns: SqlType,
    },
}

impl RoutineKind {
    /// Get the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Procedure { .. } => "procedure",
            Self::Function { .. } => "function",
        }
    }

    /// Get the SQL object type.
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::Procedure { .. } => "PROCEDURE",
            Self::Function { .. } => "FUNCTION",
        }
    }
}

/// The tagged value a stored procedure declares it returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcReturns(pub SmolStr);

impl Default for ProcReturns {
    fn default() -> Self {
        Self(SmolStr::new_static(DEFAULT_PROC_RETURNS))
    }
}

impl Routine {
    fn with_kind(name: impl Into<SmolStr>, kind: RoutineKind) -> Self {
        Self {
            name: name.into(),
            kind,
            args: Vec::new(),
            args_type: SmolStr::new_static(DEFAULT_ARGS_TYPE),
            deterministic: false,
            access: SqlAccess::default(),
            txns: Txns::default(),
            docs: String::new(),
            body: CodeBody::default(),
            from: Prior::none(),
        }
    }

    /// Create a new stored procedure definition.
    pub fn procedure(name: impl Into<SmolStr>) -> Self {
        Self::with_kind(
            name,
            RoutineKind::Procedure {
                returns: ProcReturns::default(),
            },
        )
    }

    /// Create a new stored function definition.
    pub fn function(name: impl Into<SmolStr>, returns: SqlType) -> Self {
        Self::with_kind(name, RoutineKind::Function { returns })
    }

    /// Check if this is a stored function.
    pub fn is_function(&self) -> bool {
        matches!(self.kind, RoutineKind::Function { .. })
    }

    /// Add an argument.
    pub fn arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    /// Add an IN argument.
    pub fn param(self, name: impl Into<SmolStr>, ty: SqlType) -> Self {
        self.arg(Argument::new(name, ty))
    }

    /// Add an OUT argument.
    pub fn out_param(self, name: impl Into<SmolStr>, ty: SqlType) -> Self {
        self.arg(Argument::new(name, ty).dir(ArgDirection::Out))
    }

    /// Add an INOUT argument.
    pub fn inout_param(self, name: impl Into<SmolStr>, ty: SqlType) -> Self {
        self.arg(Argument::new(name, ty).dir(ArgDirection::InOut))
    }

    /// Set the procedure return tag. Has no effect on functions.
    pub fn returns_tag(mut self, tag: impl Into<SmolStr>) -> Self {
        if let RoutineKind::Procedure { ref mut returns } = self.kind {
            *returns = ProcReturns(tag.into());
        }
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<CodeBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Mark as DETERMINISTIC.
    pub fn deterministic(mut self) -> Self {
        self.deterministic = true;
        self
    }

    /// Set the data access characteristic.
    pub fn access(mut self, access: SqlAccess) -> Self {
        self.access = access;
        self
    }

    /// Set transaction behaviour.
    pub fn txns(mut self, txns: Txns) -> Self {
        self.txns = txns;
        self
    }

    /// Set the calling convention tag.
    pub fn args_type(mut self, args_type: impl Into<SmolStr>) -> Self {
        self.args_type = args_type.into();
        self
    }

    /// Set documentation.
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }
}

impl Comparable for Routine {
    fn equal_to(&self, other: &Self) -> bool {
        let returns_equal = match (&self.kind, &other.kind) {
            (RoutineKind::Procedure { returns: a }, RoutineKind::Procedure { returns: b }) => {
                a == b
            }
            (RoutineKind::Function { returns: a }, RoutineKind::Function { returns: b }) => {
                a.equal_to(b)
            }
            _ => return false,
        };

        self.body.equal_to(&other.body)
            && self.deterministic == other.deterministic
            && self.access == other.access
            && self.args_type == other.args_type
            && self.txns == other.txns
            && self.args.equal_to(&other.args)
            && returns_equal
    }
}

/// SQL data access characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SqlAccess {
    /// `CONTAINS SQL`
    #[default]
    ContainsSql,
    /// `NO SQL`
    NoSql,
    /// `READS SQL DATA`
    ReadsSqlData,
    /// `MODIFIES SQL DATA`
    ModifiesSqlData,
}

impl SqlAccess {
    /// Get SQL characteristic string.
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::ContainsSql => "CONTAINS SQL",
            Self::NoSql => "NO SQL",
            Self::ReadsSqlData => "READS SQL DATA",
            Self::ModifiesSqlData => "MODIFIES SQL DATA",
        }
    }
}

/// Transaction behaviour of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "TxnsRepr", into = "SmolStr")]
pub enum Txns {
    /// Neither opens nor must be called within a transaction.
    #[default]
    None,
    /// Must be called within a transaction.
    Call,
    /// Opens its own transaction.
    Has,
}

impl Txns {
    /// Get the tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Call => "CALL",
            Self::Has => "HAS",
        }
    }
}

/// Wire forms accepted for [`Txns`]: numeric codes or tag names.
#[derive(Deserialize)]
#[serde(untagged)]
enum TxnsRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<TxnsRepr> for Txns {
    type Error = String;

    fn try_from(repr: TxnsRepr) -> Result<Self, Self::Error> {
        match repr {
            TxnsRepr::Code(0) => Ok(Self::None),
            TxnsRepr::Code(1) => Ok(Self::Call),
            TxnsRepr::Code(2) => Ok(Self::Has),
            TxnsRepr::Code(n) => Err(format!("unknown txns code {}", n)),
            TxnsRepr::Name(name) => match name.to_ascii_uppercase().as_str() {
                "NONE" => Ok(Self::None),
                "CALL" => Ok(Self::Call),
                "HAS" => Ok(Self::Has),
                _ => Err(format!("unknown txns value `{}`", name)),
            },
        }
    }
}

impl From<Txns> for SmolStr {
    fn from(txns: Txns) -> Self {
        SmolStr::new_static(txns.as_str())
    }
}

// ============================================================================
// Argument
// ============================================================================

/// An argument to a stored procedure or function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    pub name: SmolStr,
    /// Argument type.
    pub ty: SqlType,
    /// Argument direction.
    pub dir: ArgDirection,
    /// Documentation.
    pub docs: String,
    /// Prior version of this argument.
    #[serde(skip)]
    pub from: Prior<Argument>,
}

impl Argument {
    /// Create a new IN argument.
    pub fn new(name: impl Into<SmolStr>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
            dir: ArgDirection::In,
            docs: String::new(),
            from: Prior::none(),
        }
    }

    /// Set the direction.
    pub fn dir(mut self, dir: ArgDirection) -> Self {
        self.dir = dir;
        self
    }

    /// Set documentation.
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = docs.into();
        self
    }

    /// Render as it appears in a routine signature.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        if self.dir != ArgDirection::In {
            sql.push_str(self.dir.to_sql());
            sql.push(' ');
        }
        sql.push_str(&quote_ident(&self.name));
        sql.push(' ');
        sql.push_str(&self.ty.to_sql());
        sql
    }
}

impl Comparable for Argument {
    fn equal_to(&self, other: &Self) -> bool {
        self.name == other.name && self.dir == other.dir && self.ty.equal_to(&other.ty)
    }
}

/// Argument direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArgDirection {
    /// Passed in by the caller.
    #[default]
    In,
    /// Written back to the caller.
    Out,
    /// Passed in and written back.
    InOut,
}

impl ArgDirection {
    /// Get SQL direction keyword.
    pub fn to_sql(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::InOut => "INOUT",
        }
    }
}
