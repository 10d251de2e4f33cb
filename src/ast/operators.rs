use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Names under which operator callbacks are registered in a
/// [`Declaration`](crate::schema::Declaration).
pub mod names {
    pub const EQ: &str = "=";
    pub const NE: &str = "!=";
    pub const GT: &str = ">";
    pub const GE: &str = ">=";
    pub const LT: &str = "<";
    pub const LE: &str = "<=";
    pub const HAS: &str = ":";

    /// Nullary constant emitted for literals that fold to true.
    pub const TRUE: &str = "_true";
    /// Nullary constant emitted for literals that fold to false.
    pub const FALSE: &str = "_false";
    pub const AND: &str = "_and";
    pub const OR: &str = "_or";
    pub const NOT: &str = "_not";

    pub const ASC: &str = "_asc";
    pub const DESC: &str = "_desc";
}

/// Comparison operator of a restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equal (`=`)
    Eq,
    /// Not equal (`!=`)
    Ne,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Has (`:`): substring containment between literals, or entry point of
    /// a relational sub-filter on a column with a nested declaration.
    ///
    /// Against a plain column, `:` dispatches like any other comparison, so
    /// `id:1` with no `:` callback for integers fails with
    /// `CompileError::UnknownOperator(":")`, not `UnsupportedConstruct`.
    Has,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 7] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Gt,
        ComparisonOp::Ge,
        ComparisonOp::Lt,
        ComparisonOp::Le,
        ComparisonOp::Has,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => names::EQ,
            ComparisonOp::Ne => names::NE,
            ComparisonOp::Gt => names::GT,
            ComparisonOp::Ge => names::GE,
            ComparisonOp::Lt => names::LT,
            ComparisonOp::Le => names::LE,
            ComparisonOp::Has => names::HAS,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown comparison operator {0:?}")]
pub struct UnknownOperator(pub String);

impl FromStr for ComparisonOp {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}
