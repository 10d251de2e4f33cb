use std::fmt;

/// A parsed order-by string: `field [desc] (, field [desc])*`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expression: OrderExpression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderExpression {
    pub sequences: Vec<OrderSequence>,
}

/// One ordering term.
///
/// The path may have several dotted segments; the compiler rejects those,
/// the parser does not.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSequence {
    pub path: Vec<String>,
    pub desc: bool,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expression.fmt(f)
    }
}

impl fmt::Display for OrderExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sequence) in self.sequences.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            sequence.fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for OrderSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join("."))?;
        if self.desc {
            f.write_str(" desc")?;
        }
        Ok(())
    }
}
