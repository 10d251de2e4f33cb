//! Schema registry: which fields exist, what they may be used for, and the
//! callbacks that turn each restriction shape into the caller's output type.
//!
//! A [`Declaration`] is assembled once with [`Declaration::builder`] and is
//! read-only afterwards, so it can be shared between threads and compiled
//! against concurrently. Columns may point at a nested declaration, which
//! forms a tree of `Arc`s.
//!
//! # Examples
//!
//! ```
//! use aip_filter::{Column, Declaration, OperatorFunc, names};
//!
//! let declaration = Declaration::<String>::builder()
//!     .column(Column::new("age").filterable().sortable())
//!     .operator(OperatorFunc::new(names::GT).with_field_value(|field, v| Ok(format!("{field} > {v}"))))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(declaration.filter("age > 21").unwrap(), "age > 21");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::{
    error::{CallbackResult, CompileError, SchemaError},
    value::Value,
};

bitflags! {
    /// What a column may be used for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const FILTERABLE = 0b01;
        const SORTABLE   = 0b10;
    }
}

bitflags! {
    /// Callback shapes an [`OperatorFunc`] can implement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Signatures: u16 {
        const FIELD_WITH_INT    = 1 << 0;
        const FIELD_WITH_FLOAT  = 1 << 1;
        const FIELD_WITH_BOOL   = 1 << 2;
        const FIELD_WITH_STRING = 1 << 3;
        const FIELD_WITH_FIELD  = 1 << 4;
        const FIELD             = 1 << 5;
        const NO_FIELD          = 1 << 6;
        const COMBINE           = 1 << 7;
    }
}

impl Signatures {
    /// All four field-with-literal shapes.
    pub const fn field_with_value() -> Self {
        Self::FIELD_WITH_INT
            .union(Self::FIELD_WITH_FLOAT)
            .union(Self::FIELD_WITH_BOOL)
            .union(Self::FIELD_WITH_STRING)
    }
}

type FieldWithValueFn<T, V> = Arc<dyn Fn(&str, V) -> CallbackResult<T> + Send + Sync>;
type FieldWithStringFn<T> = Arc<dyn Fn(&str, &str) -> CallbackResult<T> + Send + Sync>;
type FieldWithFieldFn<T> = Arc<dyn Fn(&str, &str) -> CallbackResult<T> + Send + Sync>;
type FieldFn<T> = Arc<dyn Fn(&str) -> CallbackResult<T> + Send + Sync>;
type NoFieldFn<T> = Arc<dyn Fn() -> CallbackResult<T> + Send + Sync>;
type CombineFn<T> = Arc<dyn Fn(Vec<T>) -> CallbackResult<T> + Send + Sync>;
type EmbedFn<T> = Arc<dyn Fn(T) -> CallbackResult<T> + Send + Sync>;

/// Nested declaration of a relational column and the callback embedding a
/// result compiled against it into the parent's output.
pub struct Nested<T> {
    declaration: Arc<Declaration<T>>,
    combine: EmbedFn<T>,
}

impl<T> Nested<T> {
    pub fn declaration(&self) -> &Declaration<T> {
        &self.declaration
    }

    pub(crate) fn combine(&self, field: &str, inner: T) -> Result<T, CompileError> {
        (self.combine)(inner).map_err(|source| CompileError::Callback {
            operator: field.to_string(),
            source,
        })
    }
}

impl<T> Clone for Nested<T> {
    fn clone(&self) -> Self {
        Nested {
            declaration: Arc::clone(&self.declaration),
            combine: Arc::clone(&self.combine),
        }
    }
}

/// A field known to the schema.
pub struct Column<T> {
    field: String,
    capabilities: Capabilities,
    nested: Option<Nested<T>>,
}

impl<T> Column<T> {
    pub fn new(field: impl Into<String>) -> Self {
        Column {
            field: field.into(),
            capabilities: Capabilities::empty(),
            nested: None,
        }
    }

    pub fn filterable(mut self) -> Self {
        self.capabilities |= Capabilities::FILTERABLE;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.capabilities |= Capabilities::SORTABLE;
        self
    }

    /// Makes the column relational: `column:( ... )` compiles the
    /// parenthesized expression against `declaration` and passes the result
    /// to `combine`.
    pub fn with_declaration(
        mut self,
        declaration: impl Into<Arc<Declaration<T>>>,
        combine: impl Fn(T) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.nested = Some(Nested {
            declaration: declaration.into(),
            combine: Arc::new(combine),
        });
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn nested(&self) -> Option<&Nested<T>> {
        self.nested.as_ref()
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Column {
            field: self.field.clone(),
            capabilities: self.capabilities,
            nested: self.nested.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("capabilities", &self.capabilities)
            .field("nested", &self.nested.as_ref().map(|n| &n.declaration))
            .finish()
    }
}

/// Callbacks registered under one operator name.
///
/// Each signature is present or absent independently; the compiler asks for
/// the signature it needs and reports an unknown operator when it is absent.
pub struct OperatorFunc<T> {
    name: String,
    field_with_int: Option<FieldWithValueFn<T, i64>>,
    field_with_float: Option<FieldWithValueFn<T, f64>>,
    field_with_bool: Option<FieldWithValueFn<T, bool>>,
    field_with_string: Option<FieldWithStringFn<T>>,
    field_with_field: Option<FieldWithFieldFn<T>>,
    field: Option<FieldFn<T>>,
    no_field: Option<NoFieldFn<T>>,
    combine: Option<CombineFn<T>>,
}

impl<T> OperatorFunc<T> {
    pub fn new(name: impl Into<String>) -> Self {
        OperatorFunc {
            name: name.into(),
            field_with_int: None,
            field_with_float: None,
            field_with_bool: None,
            field_with_string: None,
            field_with_field: None,
            field: None,
            no_field: None,
            combine: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signatures that have a callback registered.
    pub fn signatures(&self) -> Signatures {
        let slots = [
            (self.field_with_int.is_some(), Signatures::FIELD_WITH_INT),
            (self.field_with_float.is_some(), Signatures::FIELD_WITH_FLOAT),
            (self.field_with_bool.is_some(), Signatures::FIELD_WITH_BOOL),
            (self.field_with_string.is_some(), Signatures::FIELD_WITH_STRING),
            (self.field_with_field.is_some(), Signatures::FIELD_WITH_FIELD),
            (self.field.is_some(), Signatures::FIELD),
            (self.no_field.is_some(), Signatures::NO_FIELD),
            (self.combine.is_some(), Signatures::COMBINE),
        ];
        slots
            .into_iter()
            .filter(|(present, _)| *present)
            .fold(Signatures::empty(), |acc, (_, sign)| acc | sign)
    }

    pub fn supports(&self, required: Signatures) -> bool {
        self.signatures().contains(required)
    }

    fn failed(&self, source: crate::error::BoxError) -> CompileError {
        CompileError::Callback {
            operator: self.name.clone(),
            source,
        }
    }

    fn missing(&self) -> CompileError {
        CompileError::UnknownOperator(self.name.clone())
    }

    pub(crate) fn call_field_with_int(&self, field: &str, value: i64) -> Result<T, CompileError> {
        let f = self.field_with_int.as_ref().ok_or_else(|| self.missing())?;
        f(field, value).map_err(|e| self.failed(e))
    }

    pub(crate) fn call_field_with_float(&self, field: &str, value: f64) -> Result<T, CompileError> {
        let f = self.field_with_float.as_ref().ok_or_else(|| self.missing())?;
        f(field, value).map_err(|e| self.failed(e))
    }

    pub(crate) fn call_field_with_bool(&self, field: &str, value: bool) -> Result<T, CompileError> {
        let f = self.field_with_bool.as_ref().ok_or_else(|| self.missing())?;
        f(field, value).map_err(|e| self.failed(e))
    }

    pub(crate) fn call_field_with_string(&self, field: &str, value: &str) -> Result<T, CompileError> {
        let f = self.field_with_string.as_ref().ok_or_else(|| self.missing())?;
        f(field, value).map_err(|e| self.failed(e))
    }

    pub(crate) fn call_field_with_field(&self, lhs: &str, rhs: &str) -> Result<T, CompileError> {
        let f = self.field_with_field.as_ref().ok_or_else(|| self.missing())?;
        f(lhs, rhs).map_err(|e| self.failed(e))
    }

    pub(crate) fn call_field(&self, field: &str) -> Result<T, CompileError> {
        let f = self.field.as_ref().ok_or_else(|| self.missing())?;
        f(field).map_err(|e| self.failed(e))
    }

    pub(crate) fn call_no_field(&self) -> Result<T, CompileError> {
        let f = self.no_field.as_ref().ok_or_else(|| self.missing())?;
        f().map_err(|e| self.failed(e))
    }

    pub(crate) fn call_combine(&self, operands: Vec<T>) -> Result<T, CompileError> {
        let f = self.combine.as_ref().ok_or_else(|| self.missing())?;
        f(operands).map_err(|e| self.failed(e))
    }
}

impl<T: 'static> OperatorFunc<T> {
    pub fn with_field_value_int(
        mut self,
        f: impl Fn(&str, i64) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.field_with_int = Some(Arc::new(f));
        self
    }

    pub fn with_field_value_float(
        mut self,
        f: impl Fn(&str, f64) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.field_with_float = Some(Arc::new(f));
        self
    }

    pub fn with_field_value_bool(
        mut self,
        f: impl Fn(&str, bool) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.field_with_bool = Some(Arc::new(f));
        self
    }

    pub fn with_field_value_string(
        mut self,
        f: impl Fn(&str, &str) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.field_with_string = Some(Arc::new(f));
        self
    }

    /// Registers one callback for all four field-with-literal signatures.
    /// It receives the literal as a [`Value`].
    pub fn with_field_value(
        mut self,
        f: impl Fn(&str, &Value) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        let f = Arc::new(f);

        let any = Arc::clone(&f);
        self.field_with_int = Some(Arc::new(move |field: &str, v: i64| any(field, &Value::Int(v))));
        let any = Arc::clone(&f);
        self.field_with_float =
            Some(Arc::new(move |field: &str, v: f64| any(field, &Value::Float(v))));
        let any = Arc::clone(&f);
        self.field_with_bool =
            Some(Arc::new(move |field: &str, v: bool| any(field, &Value::Boolean(v))));
        let any = f;
        self.field_with_string = Some(Arc::new(move |field: &str, v: &str| {
            any(field, &Value::Str(v.to_string()))
        }));
        self
    }

    pub fn with_field_with_field(
        mut self,
        f: impl Fn(&str, &str) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.field_with_field = Some(Arc::new(f));
        self
    }

    pub fn with_field(
        mut self,
        f: impl Fn(&str) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.field = Some(Arc::new(f));
        self
    }

    pub fn with_no_field(
        mut self,
        f: impl Fn() -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.no_field = Some(Arc::new(f));
        self
    }

    /// Registers the combinator used by `_and`, `_or` (two operands per
    /// call, folded left to right) and `_not` (one operand).
    pub fn with_combine(
        mut self,
        f: impl Fn(Vec<T>) -> CallbackResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.combine = Some(Arc::new(f));
        self
    }
}

impl<T> Clone for OperatorFunc<T> {
    fn clone(&self) -> Self {
        OperatorFunc {
            name: self.name.clone(),
            field_with_int: self.field_with_int.clone(),
            field_with_float: self.field_with_float.clone(),
            field_with_bool: self.field_with_bool.clone(),
            field_with_string: self.field_with_string.clone(),
            field_with_field: self.field_with_field.clone(),
            field: self.field.clone(),
            no_field: self.no_field.clone(),
            combine: self.combine.clone(),
        }
    }
}

impl<T> fmt::Debug for OperatorFunc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorFunc")
            .field("name", &self.name)
            .field("signatures", &self.signatures())
            .finish()
    }
}

/// Columns and operators available to the compiler.
pub struct Declaration<T> {
    columns: HashMap<String, Column<T>>,
    operators: HashMap<String, OperatorFunc<T>>,
}

impl<T> Declaration<T> {
    pub fn builder() -> DeclarationBuilder<T> {
        DeclarationBuilder::default()
    }

    /// Looks up a column that has every capability in `required`.
    pub fn column(&self, name: &str, required: Capabilities) -> Option<&Column<T>> {
        self.columns
            .get(name)
            .filter(|column| column.capabilities.contains(required))
    }

    /// Looks up an operator that implements every signature in `required`.
    pub fn operator(&self, name: &str, required: Signatures) -> Option<&OperatorFunc<T>> {
        self.operators
            .get(name)
            .filter(|operator| operator.supports(required))
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.values()
    }

    pub fn operators(&self) -> impl Iterator<Item = &OperatorFunc<T>> {
        self.operators.values()
    }
}

impl<T> fmt::Debug for Declaration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut columns: Vec<_> = self.columns.values().collect();
        columns.sort_by(|a, b| a.field.cmp(&b.field));
        let mut operators: Vec<_> = self.operators.values().collect();
        operators.sort_by(|a, b| a.name.cmp(&b.name));

        f.debug_struct("Declaration")
            .field("columns", &columns)
            .field("operators", &operators)
            .finish()
    }
}

/// Collects columns and operators for a [`Declaration`]. A later entry with
/// the same name replaces an earlier one.
pub struct DeclarationBuilder<T> {
    columns: Vec<Column<T>>,
    operators: Vec<OperatorFunc<T>>,
}

impl<T> Default for DeclarationBuilder<T> {
    fn default() -> Self {
        DeclarationBuilder {
            columns: Vec::new(),
            operators: Vec::new(),
        }
    }
}

impl<T> DeclarationBuilder<T> {
    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column<T>>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn operator(mut self, operator: OperatorFunc<T>) -> Self {
        self.operators.push(operator);
        self
    }

    pub fn operators(mut self, operators: impl IntoIterator<Item = OperatorFunc<T>>) -> Self {
        self.operators.extend(operators);
        self
    }

    pub fn build(self) -> Result<Declaration<T>, SchemaError> {
        let mut columns = HashMap::with_capacity(self.columns.len());
        for column in self.columns {
            if column.field.is_empty() {
                return Err(SchemaError::EmptyColumnName);
            }
            columns.insert(column.field.clone(), column);
        }

        let mut operators = HashMap::with_capacity(self.operators.len());
        for operator in self.operators {
            if operator.name.is_empty() {
                return Err(SchemaError::EmptyOperatorName);
            }
            operators.insert(operator.name.clone(), operator);
        }

        Ok(Declaration { columns, operators })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::names;

    fn declaration() -> Declaration<String> {
        Declaration::builder()
            .column(Column::new("id").filterable())
            .column(Column::new("age").filterable().sortable())
            .operator(
                OperatorFunc::new(names::EQ)
                    .with_field_value_int(|f, v| Ok(format!("{f}={v}")))
                    .with_field_with_field(|a, b| Ok(format!("{a}={b}"))),
            )
            .operator(OperatorFunc::new(names::TRUE).with_no_field(|| Ok("TRUE".into())))
            .build()
            .unwrap()
    }

    #[test]
    fn test_column_requires_every_capability() {
        let decl = declaration();
        assert!(decl.column("id", Capabilities::FILTERABLE).is_some());
        assert!(decl.column("id", Capabilities::SORTABLE).is_none());
        assert!(decl.column("age", Capabilities::FILTERABLE | Capabilities::SORTABLE).is_some());
        assert!(decl.column("missing", Capabilities::empty()).is_none());
    }

    #[test]
    fn test_operator_requires_every_signature() {
        let decl = declaration();
        assert!(decl.operator(names::EQ, Signatures::FIELD_WITH_INT).is_some());
        assert!(
            decl.operator(names::EQ, Signatures::FIELD_WITH_INT | Signatures::FIELD_WITH_FIELD)
                .is_some()
        );
        assert!(decl.operator(names::EQ, Signatures::FIELD_WITH_FLOAT).is_none());
        assert!(decl.operator(names::TRUE, Signatures::NO_FIELD).is_some());
        assert!(decl.operator(names::FALSE, Signatures::NO_FIELD).is_none());
    }

    #[test]
    fn test_field_value_fills_all_literal_slots() {
        let op = OperatorFunc::<String>::new(names::NE).with_field_value(|f, v| Ok(format!("{f}!={v}")));
        assert_eq!(op.signatures(), Signatures::field_with_value());
        assert_eq!(op.call_field_with_string("name", "cat").unwrap(), "name!=\"cat\"");
        assert_eq!(op.call_field_with_float("score", 1.5).unwrap(), "score!=1.5");
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let decl = Declaration::<String>::builder()
            .operator(OperatorFunc::new(names::LT).with_field_value_int(|f, v| Ok(format!("{f}<{v}"))))
            .operator(OperatorFunc::new(names::LT).with_field_with_field(|a, b| Ok(format!("{a}<{b}"))))
            .build()
            .unwrap();
        assert!(decl.operator(names::LT, Signatures::FIELD_WITH_INT).is_none());
        assert!(decl.operator(names::LT, Signatures::FIELD_WITH_FIELD).is_some());
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let err = Declaration::<String>::builder()
            .column(Column::new(""))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptyColumnName);

        let err = Declaration::<String>::builder()
            .operator(OperatorFunc::new(""))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptyOperatorName);
    }

    #[test]
    fn test_declaration_is_shareable_across_threads() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Declaration<String>>();
    }
}
