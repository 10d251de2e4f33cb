use thiserror::Error;

use crate::{
    ast::{
        Arg, Comparable, ComparisonOp, Expression, Field, Filter, OrderBy, Position, Restriction,
        Sequence, Simple, Term, Token, TokenKind,
    },
    lexer::{LexError, Lexer},
    value::Value,
};

pub mod order_by;

pub use order_by::OrderByParser;

/// Errors that can occur while parsing a filter or order-by string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The lexer could not match the input
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token that the grammar does not allow at this point, including
    /// trailing input and missing closing parentheses
    #[error("{position}: unexpected {found} (expected {expected})")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: Position,
    },

    /// A numeric token that does not fit its type
    #[error("{position}: invalid {kind} literal {text:?}")]
    InvalidLiteral {
        kind: &'static str,
        text: String,
        position: Position,
    },

    /// Parentheses or call arguments nested deeper than [`MAX_DEPTH`]
    #[error("{position}: nesting exceeds {limit} levels")]
    TooDeep { limit: usize, position: Position },
}

/// Maximum nesting of composites and call argument lists in one filter.
pub const MAX_DEPTH: usize = 100;

/// One token of lookahead over a lexer, shared by both parsers.
pub(crate) struct TokenStream<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> TokenStream<'a> {
    pub(crate) fn new(mut lexer: Lexer<'a>) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(TokenStream {
            lexer,
            current_token,
        })
    }

    pub(crate) fn current(&self) -> &Token {
        &self.current_token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_token.is(kind)
    }

    /// Moves to the next token and returns the one just consumed.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current_token, next))
    }

    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<Token, ParseError> {
        if !self.check(kind) {
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    pub(crate) fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current_token.to_string(),
            position: self.current_token.position,
        }
    }
}

/// Recursive-descent parser for filter strings.
///
/// # Examples
///
/// ```
/// use aip_filter::{Lexer, Parser};
///
/// let mut parser = Parser::new(Lexer::new("NOT foo AND bar OR baz")).unwrap();
/// let filter = parser.parse().unwrap();
/// assert_eq!(filter.to_string(), "-foo AND bar OR baz");
/// assert_eq!(filter.expression.sequences.len(), 2);
/// ```
pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a filter lexer, reading the first token.
    pub fn new(lexer: Lexer<'a>) -> Result<Self, ParseError> {
        Ok(Parser {
            tokens: TokenStream::new(lexer)?,
            depth: 0,
        })
    }

    /// Parses the complete input as a filter.
    pub fn parse(&mut self) -> Result<Filter, ParseError> {
        let expression = self.parse_expression()?;
        self.tokens.expect(TokenKind::Eof, "end of input")?;
        Ok(Filter { expression })
    }

    /// `Sequence ("AND" Sequence)*`
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut sequences = vec![self.parse_sequence()?];
        while self.tokens.check(TokenKind::And) {
            self.tokens.advance()?;
            sequences.push(self.parse_sequence()?);
        }
        Ok(Expression { sequences })
    }

    /// `Term ("OR" Term)*`
    fn parse_sequence(&mut self) -> Result<Sequence, ParseError> {
        let mut terms = vec![self.parse_term()?];
        while self.tokens.check(TokenKind::Or) {
            self.tokens.advance()?;
            terms.push(self.parse_term()?);
        }
        Ok(Sequence { terms })
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let negated = self.tokens.check(TokenKind::Not) || self.tokens.check(TokenKind::Neg);
        if negated {
            self.tokens.advance()?;
        }
        let simple = self.parse_simple()?;
        Ok(Term { negated, simple })
    }

    fn parse_simple(&mut self) -> Result<Simple, ParseError> {
        if self.tokens.check(TokenKind::LParen) {
            return Ok(Simple::Composite(self.parse_composite()?));
        }
        Ok(Simple::Restriction(self.parse_restriction()?))
    }

    /// `"(" Expression ")"`
    fn parse_composite(&mut self) -> Result<Expression, ParseError> {
        self.nested(|parser| {
            parser.tokens.expect(TokenKind::LParen, "'('")?;
            let expression = parser.parse_expression()?;
            parser.tokens.expect(TokenKind::RParen, "')'")?;
            Ok(expression)
        })
    }

    /// Runs `parse` one nesting level deeper, failing past [`MAX_DEPTH`].
    fn nested<R>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<R, ParseError>,
    ) -> Result<R, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                position: self.tokens.current().position,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_restriction(&mut self) -> Result<Restriction, ParseError> {
        let comparable = self.parse_comparable()?;

        if !self.tokens.check(TokenKind::Operator) {
            return Ok(Restriction {
                comparable,
                comparison: None,
            });
        }

        let op = match self.tokens.current().text.parse::<ComparisonOp>() {
            Ok(op) => op,
            Err(_) => return Err(self.tokens.unexpected("comparison operator")),
        };
        self.tokens.advance()?;
        let arg = self.parse_arg()?;

        Ok(Restriction {
            comparable,
            comparison: Some((op, arg)),
        })
    }

    /// `Value ("." Field)* ( "(" (Arg ("," Arg)*)? ")" )?`
    fn parse_comparable(&mut self) -> Result<Comparable, ParseError> {
        let value = self.parse_value()?;

        let mut fields = vec![];
        while self.tokens.check(TokenKind::Dot) {
            self.tokens.advance()?;
            fields.push(self.parse_field()?);
        }

        let call = if self.tokens.check(TokenKind::LParen) {
            Some(self.nested(Self::parse_call_args)?)
        } else {
            None
        };

        Ok(Comparable {
            value,
            fields,
            call,
        })
    }

    /// `"(" (Arg ("," Arg)*)? ")"`
    fn parse_call_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.tokens.expect(TokenKind::LParen, "'('")?;
        let mut args = vec![];
        if !self.tokens.check(TokenKind::RParen) {
            args.push(self.parse_arg()?);
            while self.tokens.check(TokenKind::Comma) {
                self.tokens.advance()?;
                args.push(self.parse_arg()?);
            }
        }
        self.tokens.expect(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    fn parse_arg(&mut self) -> Result<Arg, ParseError> {
        if self.tokens.check(TokenKind::LParen) {
            return Ok(Arg::Composite(self.parse_composite()?));
        }
        Ok(Arg::Comparable(self.parse_comparable()?))
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        match self.tokens.current().kind {
            TokenKind::And | TokenKind::Or | TokenKind::Not => {
                let keyword = self.tokens.advance()?;
                Ok(Field::Keyword(keyword.text))
            }
            _ => Ok(Field::Value(self.parse_value()?)),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let value = match self.tokens.current().kind {
            TokenKind::Wildcard => Value::Wildcard,
            TokenKind::Float => Value::Float(self.parse_float()?),
            TokenKind::Int => Value::Int(self.parse_number("integer")?),
            TokenKind::String => Value::Str(self.tokens.current().text.clone()),
            TokenKind::True => Value::Boolean(true),
            TokenKind::False => Value::Boolean(false),
            TokenKind::Ident => Value::Ident(self.tokens.current().text.clone()),
            _ => return Err(self.tokens.unexpected("value")),
        };
        self.tokens.advance()?;
        Ok(value)
    }

    /// Out-of-range floats parse to infinity; reject them like integer overflow.
    fn parse_float(&self) -> Result<f64, ParseError> {
        let n: f64 = self.parse_number("float")?;
        if !n.is_finite() {
            let token = self.tokens.current();
            return Err(ParseError::InvalidLiteral {
                kind: "float",
                text: token.text.clone(),
                position: token.position,
            });
        }
        Ok(n)
    }

    fn parse_number<N: std::str::FromStr>(&self, kind: &'static str) -> Result<N, ParseError> {
        let token = self.tokens.current();
        token.text.parse().map_err(|_| ParseError::InvalidLiteral {
            kind,
            text: token.text.clone(),
            position: token.position,
        })
    }
}

/// Lexes and parses a filter string.
pub fn parse_filter(input: &str) -> Result<Filter, ParseError> {
    Parser::new(Lexer::new(input))?.parse()
}

/// Lexes and parses an order-by string.
pub fn parse_order_by(input: &str) -> Result<OrderBy, ParseError> {
    OrderByParser::new(Lexer::order_by(input))?.parse()
}
