use tracing::debug;

use crate::{
    ast::{
        Arg, Comparable, ComparisonOp, Expression, Filter, OrderBy, Restriction, Sequence, Simple,
        Term, names,
    },
    error::{CompileError, Error, Unsupported},
    parser::{parse_filter, parse_order_by},
    schema::{Capabilities, Column, Declaration, OperatorFunc, Signatures},
    value::Value,
};

pub mod order_by;

pub use order_by::OrderByCompiler;

/// One side of a restriction after resolution against the schema.
enum Operand<'a, T> {
    Column(&'a Column<T>),
    Literal(&'a Value),
}

/// Compiles a [`Filter`] into one value of the declaration's output type.
///
/// Literal-only comparisons are folded at compile time into the `_true` /
/// `_false` constants; user callbacks only ever see restrictions that
/// involve at least one column.
pub struct FilterCompiler<'d, T> {
    declaration: &'d Declaration<T>,
}

impl<'d, T> FilterCompiler<'d, T> {
    pub fn new(declaration: &'d Declaration<T>) -> Self {
        FilterCompiler { declaration }
    }

    pub fn compile(&self, filter: &Filter) -> Result<T, CompileError> {
        self.compile_expression(&filter.expression)
    }

    /// Folds the sequences through `_and`. An expression without sequences
    /// compiles to `_true`.
    pub fn compile_expression(&self, expression: &Expression) -> Result<T, CompileError> {
        let mut result = None;
        for sequence in &expression.sequences {
            let Some(compiled) = self.compile_sequence(sequence)? else {
                continue;
            };
            result = Some(match result {
                None => compiled,
                Some(acc) => self.combine(names::AND, vec![acc, compiled])?,
            });
        }

        match result {
            Some(result) => Ok(result),
            None => self.constant(true),
        }
    }

    fn compile_sequence(&self, sequence: &Sequence) -> Result<Option<T>, CompileError> {
        let mut result = None;
        for term in &sequence.terms {
            let compiled = self.compile_term(term)?;
            result = Some(match result {
                None => compiled,
                Some(acc) => self.combine(names::OR, vec![acc, compiled])?,
            });
        }
        Ok(result)
    }

    fn compile_term(&self, term: &Term) -> Result<T, CompileError> {
        let compiled = match &term.simple {
            Simple::Composite(expression) => self.compile_expression(expression)?,
            Simple::Restriction(restriction) => self.compile_restriction(restriction)?,
        };

        if term.negated {
            return self.combine(names::NOT, vec![compiled]);
        }
        Ok(compiled)
    }

    fn compile_restriction(&self, restriction: &Restriction) -> Result<T, CompileError> {
        let lhs = self.resolve(&restriction.comparable)?;

        let Some((op, arg)) = &restriction.comparison else {
            return match lhs {
                // a bare column means "field is truthy"
                Operand::Column(column) => self
                    .operator(names::EQ, Signatures::FIELD_WITH_BOOL)?
                    .call_field_with_bool(column.field(), true),
                Operand::Literal(value) => self.constant(!value.is_zero()),
            };
        };

        let rhs = match arg {
            Arg::Composite(expression) => {
                if let (ComparisonOp::Has, Operand::Column(column)) = (op, &lhs)
                    && let Some(nested) = column.nested()
                {
                    debug!(field = column.field(), "compiling nested filter");
                    let inner = FilterCompiler::new(nested.declaration())
                        .compile_expression(expression)?;
                    return nested.combine(column.field(), inner);
                }
                return Err(CompileError::UnsupportedConstruct(Unsupported::NestedFilter));
            }
            Arg::Comparable(comparable) => comparable,
        };

        if let Operand::Column(column) = &lhs
            && column.nested().is_some()
        {
            return Err(CompileError::UnsupportedConstruct(Unsupported::NestedFilter));
        }

        match (lhs, self.resolve(rhs)?) {
            (Operand::Column(lhs), Operand::Column(rhs)) => self
                .operator(op.as_str(), Signatures::FIELD_WITH_FIELD)?
                .call_field_with_field(lhs.field(), rhs.field()),
            (Operand::Column(column), Operand::Literal(value))
            | (Operand::Literal(value), Operand::Column(column)) => {
                self.compile_field_with_value(*op, column, value)
            }
            (Operand::Literal(lhs), Operand::Literal(rhs)) => {
                let folded = lhs.compare(*op, rhs);
                debug!(%lhs, %op, %rhs, folded, "folded literal comparison");
                self.constant(folded)
            }
        }
    }

    /// Dispatches on the literal's variant.
    fn compile_field_with_value(
        &self,
        op: ComparisonOp,
        column: &Column<T>,
        value: &Value,
    ) -> Result<T, CompileError> {
        let field = column.field();
        match value {
            Value::Int(v) => self
                .operator(op.as_str(), Signatures::FIELD_WITH_INT)?
                .call_field_with_int(field, *v),
            Value::Float(v) => self
                .operator(op.as_str(), Signatures::FIELD_WITH_FLOAT)?
                .call_field_with_float(field, *v),
            Value::Boolean(v) => self
                .operator(op.as_str(), Signatures::FIELD_WITH_BOOL)?
                .call_field_with_bool(field, *v),
            Value::Str(v) => self
                .operator(op.as_str(), Signatures::FIELD_WITH_STRING)?
                .call_field_with_string(field, v),
            Value::Wildcard | Value::Ident(_) => Err(CompileError::TypeMismatch {
                operator: op.to_string(),
                value: value.type_name(),
            }),
        }
    }

    /// Resolves a comparable to a filterable column or a literal. Paths,
    /// calls and wildcards never resolve.
    fn resolve<'c>(&self, comparable: &'c Comparable) -> Result<Operand<'c, T>, CompileError>
    where
        'd: 'c,
    {
        if comparable.is_callable() {
            return Err(CompileError::UnsupportedConstruct(Unsupported::CallForm));
        }
        if !comparable.fields.is_empty() {
            return Err(CompileError::UnsupportedConstruct(Unsupported::FieldPath));
        }

        match &comparable.value {
            Value::Wildcard => Err(CompileError::UnsupportedConstruct(Unsupported::Wildcard)),
            Value::Ident(name) => self
                .declaration
                .column(name, Capabilities::FILTERABLE)
                .map(Operand::Column)
                .ok_or_else(|| {
                    debug!(field = %name, "identifier is not a filterable column");
                    CompileError::UnknownField(name.clone())
                }),
            value => Ok(Operand::Literal(value)),
        }
    }

    fn operator(&self, name: &str, required: Signatures) -> Result<&'d OperatorFunc<T>, CompileError> {
        self.declaration
            .operator(name, required)
            .ok_or_else(|| CompileError::UnknownOperator(name.to_string()))
    }

    fn combine(&self, name: &str, operands: Vec<T>) -> Result<T, CompileError> {
        self.operator(name, Signatures::COMBINE)?.call_combine(operands)
    }

    fn constant(&self, value: bool) -> Result<T, CompileError> {
        let name = if value { names::TRUE } else { names::FALSE };
        self.operator(name, Signatures::NO_FIELD)?.call_no_field()
    }
}

impl<T> Declaration<T> {
    /// Compiles a parsed filter against this declaration.
    pub fn compile_filter(&self, filter: &Filter) -> Result<T, CompileError> {
        FilterCompiler::new(self).compile(filter)
    }

    /// Compiles a parsed order-by against this declaration.
    pub fn compile_order_by(&self, order_by: &OrderBy) -> Result<Vec<T>, CompileError> {
        OrderByCompiler::new(self).compile(order_by)
    }

    /// Parses and compiles a filter string.
    pub fn filter(&self, input: &str) -> Result<T, Error> {
        let filter = parse_filter(input)?;
        Ok(self.compile_filter(&filter)?)
    }

    /// Parses and compiles an order-by string.
    pub fn order_by(&self, input: &str) -> Result<Vec<T>, Error> {
        let order_by = parse_order_by(input)?;
        Ok(self.compile_order_by(&order_by)?)
    }
}
