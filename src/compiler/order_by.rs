use tracing::trace;

use crate::{
    ast::{OrderBy, OrderSequence, names},
    error::{CompileError, Unsupported},
    schema::{Capabilities, Declaration, Signatures},
};

/// Compiles an [`OrderBy`] into one output value per ordering term, in
/// input order.
pub struct OrderByCompiler<'d, T> {
    declaration: &'d Declaration<T>,
}

impl<'d, T> OrderByCompiler<'d, T> {
    pub fn new(declaration: &'d Declaration<T>) -> Self {
        OrderByCompiler { declaration }
    }

    pub fn compile(&self, order_by: &OrderBy) -> Result<Vec<T>, CompileError> {
        order_by
            .expression
            .sequences
            .iter()
            .map(|sequence| self.compile_sequence(sequence))
            .collect()
    }

    fn compile_sequence(&self, sequence: &OrderSequence) -> Result<T, CompileError> {
        let [name] = sequence.path.as_slice() else {
            return Err(CompileError::UnsupportedConstruct(Unsupported::FieldPath));
        };

        let column = self
            .declaration
            .column(name, Capabilities::SORTABLE)
            .ok_or_else(|| CompileError::UnknownField(name.clone()))?;

        let direction = if sequence.desc { names::DESC } else { names::ASC };
        let operator = self
            .declaration
            .operator(direction, Signatures::FIELD)
            .ok_or_else(|| CompileError::UnknownOperator(direction.to_string()))?;

        trace!(field = column.field(), direction, "ordering term");
        operator.call_field(column.field())
    }
}
