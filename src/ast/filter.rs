//! Filter syntax tree.
//!
//! Every node implements [`Display`](std::fmt::Display) with a canonical
//! rendering that parses back to an equivalent tree: negation is written as
//! `-`, strings are re-quoted and composite expressions keep their
//! parentheses.

use std::fmt;

use crate::ast::ComparisonOp;
use crate::value::Value;

/// A parsed filter string.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub expression: Expression,
}

/// Sequences joined by `AND`.
///
/// `AND` binds looser than `OR`, so `a AND b OR c` is `a AND (b OR c)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    pub sequences: Vec<Sequence>,
}

/// Terms joined by `OR`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub terms: Vec<Term>,
}

/// A simple expression with an optional `NOT` / `-` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub negated: bool,
    pub simple: Simple,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Simple {
    /// `( expression )`
    Composite(Expression),
    Restriction(Restriction),
}

/// `comparable [operator arg]`
///
/// Without an operator the restriction tests the truthiness of its
/// comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    pub comparable: Comparable,
    pub comparison: Option<(ComparisonOp, Arg)>,
}

/// A value with an optional dotted path and an optional call suffix.
///
/// # Examples
/// ```text
/// age
/// foo.bar.baz
/// foo.bar(1, 2)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Comparable {
    pub value: Value,
    pub fields: Vec<Field>,
    /// Arguments of a call suffix; `None` when the comparable is not called.
    pub call: Option<Vec<Arg>>,
}

/// Right-hand side of a restriction or an argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// `( expression )`
    Composite(Expression),
    Comparable(Comparable),
}

/// A segment after a `.` in a comparable. Keywords are allowed here.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Value(Value),
    /// `AND`, `OR` or `NOT` used as a field name
    Keyword(String),
}

impl Comparable {
    /// A comparable made of a single value, with no path and no call.
    pub fn value(value: Value) -> Self {
        Comparable {
            value,
            fields: Vec::new(),
            call: None,
        }
    }

    pub fn is_callable(&self) -> bool {
        self.call.is_some()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expression.fmt(f)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sequence) in self.sequences.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            sequence.fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" OR ")?;
            }
            term.fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("-")?;
        }
        self.simple.fmt(f)
    }
}

impl fmt::Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Simple::Composite(expression) => write!(f, "({})", expression),
            Simple::Restriction(restriction) => restriction.fmt(f),
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.comparable.fmt(f)?;
        if let Some((op, arg)) = &self.comparison {
            write!(f, "{}{}", op, arg)?;
        }
        Ok(())
    }
}

impl fmt::Display for Comparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)?;
        for field in &self.fields {
            match field {
                // `a.1` would re-lex as `a` followed by the float `.1`
                Field::Value(Value::Int(_) | Value::Float(_)) => write!(f, ". {}", field)?,
                _ => write!(f, ".{}", field)?,
            }
        }
        if let Some(args) = &self.call {
            f.write_str("(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                arg.fmt(f)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Composite(expression) => write!(f, "({})", expression),
            Arg::Comparable(comparable) => comparable.fmt(f),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(value) => value.fmt(f),
            Field::Keyword(keyword) => f.write_str(keyword),
        }
    }
}
