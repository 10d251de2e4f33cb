use std::fmt;

use crate::ast::ComparisonOp;

/// A literal appearing in a filter.
///
/// Exactly one variant is populated; the compiler's dispatch relies on
/// matching it exhaustively. `Ident` is a bare name that the compiler
/// resolves against the schema, and `Wildcard` never compiles.
///
/// # Examples
///
/// ```
/// use aip_filter::{ComparisonOp, Value};
///
/// assert!(Value::Int(2).compare(ComparisonOp::Gt, &Value::Int(1)));
/// assert!(Value::Str("catalog".into()).compare(ComparisonOp::Has, &Value::Str("cat".into())));
///
/// // operands of different variants never compare true
/// assert!(!Value::Int(1).compare(ComparisonOp::Eq, &Value::Float(1.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `*`
    Wildcard,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Unquoted string payload
    Str(String),
    /// `true` / `false`
    Boolean(bool),
    /// Bare identifier
    Ident(String),
}

impl Value {
    /// Compares two literals of the same variant.
    ///
    /// Int, Float and Str support the ordering operators, Str additionally
    /// supports `:` as substring containment, and Boolean only supports `=`
    /// and `!=`. Every other combination, including any cross-variant pair,
    /// is false.
    pub fn compare(&self, op: ComparisonOp, other: &Value) -> bool {
        use ComparisonOp::*;
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => ordered(op, a, b),
            (Value::Float(a), Value::Float(b)) => ordered(op, a, b),
            (Value::Str(a), Value::Str(b)) => match op {
                Has => a.contains(b.as_str()),
                _ => ordered(op, a, b),
            },
            (Value::Boolean(a), Value::Boolean(b)) => match op {
                Eq => a == b,
                Ne => a != b,
                _ => false,
            },
            _ => false,
        }
    }

    /// Zero value of this literal's own variant: `0`, `0.0`, `""` or `false`.
    pub fn zero(&self) -> Option<Value> {
        match self {
            Value::Int(_) => Some(Value::Int(0)),
            Value::Float(_) => Some(Value::Float(0.0)),
            Value::Str(_) => Some(Value::Str(String::new())),
            Value::Boolean(_) => Some(Value::Boolean(false)),
            Value::Wildcard | Value::Ident(_) => None,
        }
    }

    /// True when the literal equals the zero of its own variant.
    pub fn is_zero(&self) -> bool {
        self.zero()
            .is_some_and(|zero| self.compare(ComparisonOp::Eq, &zero))
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Value::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Value::Wildcard)
    }

    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Wildcard => "wildcard",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Ident(_) => "identifier",
        }
    }
}

fn ordered<V: PartialOrd + ?Sized>(op: ComparisonOp, a: &V, b: &V) -> bool {
    match op {
        ComparisonOp::Eq => a == b,
        ComparisonOp::Ne => a != b,
        ComparisonOp::Gt => a > b,
        ComparisonOp::Ge => a >= b,
        ComparisonOp::Lt => a < b,
        ComparisonOp::Le => a <= b,
        ComparisonOp::Has => false,
    }
}

/// Canonical filter syntax. Floats keep a fractional part so they re-lex as
/// floats; strings are double-quoted unless the payload contains `"`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Wildcard => f.write_str("*"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{:.1}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) if s.contains('"') => write!(f, "'{}'", s),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Ident(name) => f.write_str(name),
        }
    }
}
