use std::fmt;

use thiserror::Error;

use crate::parser::ParseError;

/// Error returned by a user-supplied operator or combine callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Return type of every user-supplied callback.
pub type CallbackResult<T> = Result<T, BoxError>;

/// Syntactically valid constructs the compiler never accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// `*`
    Wildcard,
    /// `a.b` in a filter, or a multi-segment order-by path
    FieldPath,
    /// `f(...)`
    CallForm,
    /// A parenthesized argument outside `column:( ... )` on a column with a
    /// nested declaration, or any other use of such a column
    NestedFilter,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::Wildcard => write!(f, "wildcard"),
            Unsupported::FieldPath => write!(f, "nested field"),
            Unsupported::CallForm => write!(f, "callable"),
            Unsupported::NestedFilter => write!(f, "nested filter"),
        }
    }
}

/// Errors that can occur while compiling a parsed filter or order-by.
///
/// Compilation is pure, so none of these are worth retrying; any error
/// aborts the whole compile.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Identifier that is not registered, or lacks the required capability
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Operator that is not registered, or lacks the required signature
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("{0} is not supported")]
    UnsupportedConstruct(Unsupported),

    /// A value that matches no literal dispatch signature
    #[error("no '{operator}' signature accepts a {value} value")]
    TypeMismatch {
        operator: String,
        value: &'static str,
    },

    /// A registered callback reported an error
    #[error("operator '{operator}' failed: {source}")]
    Callback {
        operator: String,
        #[source]
        source: BoxError,
    },
}

/// Invalid schema definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column name must not be empty")]
    EmptyColumnName,

    #[error("operator name must not be empty")]
    EmptyOperatorName,
}

/// Any error produced while turning filter or order-by text into output.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
