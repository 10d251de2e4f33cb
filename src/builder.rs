//! Builder-style backends.
//!
//! A [`Builder`] produces output from two primitives: atomic values
//! ([`Builder::standalone`]) and named function applications
//! ([`Builder::function`]). [`operators_from_builder`] turns any builder into
//! a full operator table, so one backend implementation can drive the filter
//! and order-by compilers without registering each callback by hand.

use std::sync::Arc;

use crate::{
    ast::{ComparisonOp, names},
    error::CallbackResult,
    schema::{Column, Declaration, OperatorFunc},
    value::Value,
};

/// Function names passed to [`Builder::function`] for combinators and
/// ordering. Comparisons use their operator text (`=`, `!=`, `:` ...).
pub mod functions {
    pub const AND: &str = "AND";
    pub const OR: &str = "OR";
    pub const NOT: &str = "NOT";
    pub const ASC: &str = "ASC";
    pub const DESC: &str = "DESC";
}

/// Closure handed to [`NestedBuilder::has_nested`].
///
/// It returns the inner filter. Closures created by [`nested_column`] return
/// a result already compiled by the nested declaration's operators and ignore
/// the builder argument.
pub type NestedFn<'a, T> = Box<dyn FnOnce(&dyn Builder<T>) -> CallbackResult<T> + 'a>;

pub trait Builder<T> {
    /// Builds an atomic value. Fields arrive as [`Value::Ident`].
    fn standalone(&self, value: &Value) -> CallbackResult<T>;

    /// Applies a function to already-built arguments.
    ///
    /// Comparisons receive `[field, value]`, `AND`/`OR` receive two operands,
    /// `NOT` one, and `ASC`/`DESC` the field alone.
    fn function(&self, operator: &str, target: Option<T>, args: Vec<T>) -> CallbackResult<T>;
}

/// A builder that can traverse into a related collection, as in
/// `pets:(name = "rex")`.
///
/// Under [`nested_column`], the rendering of the inner filter is decided by
/// the nested declaration's operator table. `has_nested` only embeds it.
pub trait NestedBuilder<T>: Builder<T> {
    fn has_nested(&self, field: &[String], build: NestedFn<'_, T>) -> CallbackResult<T>;
}

fn field_value<T, B: Builder<T> + ?Sized>(builder: &B, field: &str) -> CallbackResult<T> {
    builder.standalone(&Value::Ident(field.to_string()))
}

fn comparison<T, B: Builder<T> + ?Sized>(
    builder: &B,
    op: ComparisonOp,
    lhs: T,
    rhs: T,
) -> CallbackResult<T> {
    builder.function(op.as_str(), None, vec![lhs, rhs])
}

/// Realises the standard operator table on top of `builder`: every
/// comparison operator, `_true`, `_false`, `_and`, `_or`, `_not`, `_asc`
/// and `_desc`.
pub fn operators_from_builder<T, B>(builder: Arc<B>) -> Vec<OperatorFunc<T>>
where
    T: 'static,
    B: Builder<T> + Send + Sync + 'static,
{
    let mut operators = Vec::with_capacity(ComparisonOp::ALL.len() + 7);

    for op in ComparisonOp::ALL {
        let with_value = Arc::clone(&builder);
        let with_field = Arc::clone(&builder);
        operators.push(
            OperatorFunc::new(op.as_str())
                .with_field_value(move |field, value| {
                    let lhs = field_value(&*with_value, field)?;
                    let rhs = with_value.standalone(value)?;
                    comparison(&*with_value, op, lhs, rhs)
                })
                .with_field_with_field(move |lhs, rhs| {
                    let lhs = field_value(&*with_field, lhs)?;
                    let rhs = field_value(&*with_field, rhs)?;
                    comparison(&*with_field, op, lhs, rhs)
                }),
        );
    }

    for (name, value) in [(names::TRUE, true), (names::FALSE, false)] {
        let b = Arc::clone(&builder);
        operators.push(
            OperatorFunc::new(name).with_no_field(move || b.standalone(&Value::Boolean(value))),
        );
    }

    for (name, function) in [
        (names::AND, functions::AND),
        (names::OR, functions::OR),
        (names::NOT, functions::NOT),
    ] {
        let b = Arc::clone(&builder);
        operators.push(
            OperatorFunc::new(name).with_combine(move |operands| b.function(function, None, operands)),
        );
    }

    for (name, function) in [(names::ASC, functions::ASC), (names::DESC, functions::DESC)] {
        let b = Arc::clone(&builder);
        operators.push(OperatorFunc::new(name).with_field(move |field| {
            let field = field_value(&*b, field)?;
            b.function(function, None, vec![field])
        }));
    }

    operators
}

/// A filterable column whose `field:( ... )` restriction is compiled
/// against `declaration` and handed to [`NestedBuilder::has_nested`].
///
/// The inner result is compiled with the nested declaration's own
/// operators before `has_nested` runs, so the closure ignores the
/// sub-builder it is given and returns that result.
pub fn nested_column<T, B>(
    builder: Arc<B>,
    field: impl Into<String>,
    declaration: impl Into<Arc<Declaration<T>>>,
) -> Column<T>
where
    T: 'static,
    B: NestedBuilder<T> + Send + Sync + 'static,
{
    let field = field.into();
    let path = vec![field.clone()];
    Column::new(field)
        .filterable()
        .with_declaration(declaration, move |inner| {
            builder.has_nested(&path, Box::new(move |_| Ok(inner)))
        })
}
