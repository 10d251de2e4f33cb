//! CLI support for aip-filter
//!
//! Provides programmatic access to the `aipf` commands so the same output
//! can be produced from tests or other tools.

mod check;
mod convert;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{symbols_to_json, tokens_to_json};

use thiserror::Error;

use crate::{lexer::LexError, parser::ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
