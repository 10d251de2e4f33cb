pub mod ast;
pub mod builder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod schema;
pub mod value;

pub use ast::{ComparisonOp, Filter, OrderBy, Position, Token, TokenKind, names};
pub use builder::{Builder, NestedBuilder, nested_column, operators_from_builder};
pub use compiler::{FilterCompiler, OrderByCompiler};
pub use error::{BoxError, CallbackResult, CompileError, Error, SchemaError, Unsupported};
pub use lexer::{Grammar, LexError, Lexer};
pub use parser::{MAX_DEPTH, OrderByParser, ParseError, Parser, parse_filter, parse_order_by};
pub use schema::{Capabilities, Column, Declaration, DeclarationBuilder, OperatorFunc, Signatures};
pub use value::Value;
