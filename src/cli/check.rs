//! Parse filter and order-by strings and render them back

use std::fmt;

use super::CliError;
use crate::{
    ast::{Filter, OrderBy},
    parser::{parse_filter, parse_order_by},
};

/// Options for the parse command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Text to parse
    pub text: String,
    /// Parse as an order-by string instead of a filter
    pub order_by: bool,
}

/// Result of a parse operation
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    Filter(Filter),
    OrderBy(OrderBy),
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Filter(filter) => write!(f, "{filter}"),
            CheckResult::OrderBy(order_by) => write!(f, "{order_by}"),
        }
    }
}

pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.order_by {
        return Ok(CheckResult::OrderBy(parse_order_by(&options.text)?));
    }
    Ok(CheckResult::Filter(parse_filter(&options.text)?))
}
