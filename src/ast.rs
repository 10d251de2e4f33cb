//! # Filter and Order-By Syntax Trees
//!
//! This module defines the tokens and syntax trees of the two small
//! languages accepted by the crate: AIP-160 style filters and comma
//! separated order-by lists.
//!
//! - **[tokens]** - Lexical tokens, spans and source positions
//! - **[filter]** - Filter tree (`Filter` → `Expression` → `Sequence` → `Term` → ...)
//! - **[order_by]** - Order-by tree
//! - **[operators]** - Comparison operators and registered operator names
//!
//! ## Filter grammar
//!
//! ```text
//! Filter      := Expression
//! Expression  := Sequence ("AND" Sequence)*
//! Sequence    := Term ("OR" Term)*
//! Term        := ("NOT" | "-")? Simple
//! Simple      := "(" Expression ")" | Restriction
//! Restriction := Comparable (Operator Arg)?
//! Comparable  := Value ("." Field)* ( "(" (Arg ("," Arg)*)? ")" )?
//! Arg         := Comparable | "(" Expression ")"
//! Field       := Value | "AND" | "OR" | "NOT"
//! ```
//!
//! `OR` binds tighter than `AND`:
//!
//! ```text
//! age > 21 AND pets:(name='cat' OR name='dog')
//! ```
//!
//! ## Order-by grammar
//!
//! ```text
//! OrderBy       := OrderSequence ("," OrderSequence)*
//! OrderSequence := Ident ("." Ident)* "desc"?
//! ```
pub mod filter;
pub mod operators;
pub mod order_by;
pub mod tokens;

pub use filter::{Arg, Comparable, Expression, Field, Filter, Restriction, Sequence, Simple, Term};
pub use operators::{ComparisonOp, names};
pub use order_by::{OrderBy, OrderExpression, OrderSequence};
pub use tokens::{Position, Span, Token, TokenKind};
