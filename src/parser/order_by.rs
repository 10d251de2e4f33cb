use crate::{
    ast::{OrderBy, OrderExpression, OrderSequence, TokenKind},
    lexer::Lexer,
    parser::{ParseError, TokenStream},
};

/// Parser for order-by strings such as `active, age desc`.
///
/// Dotted paths are accepted here and rejected by the compiler.
pub struct OrderByParser<'a> {
    tokens: TokenStream<'a>,
}

impl<'a> OrderByParser<'a> {
    /// Creates a parser over an order-by lexer, reading the first token.
    pub fn new(lexer: Lexer<'a>) -> Result<Self, ParseError> {
        Ok(OrderByParser {
            tokens: TokenStream::new(lexer)?,
        })
    }

    /// `OrderSequence ("," OrderSequence)*`
    pub fn parse(&mut self) -> Result<OrderBy, ParseError> {
        let mut sequences = vec![self.parse_sequence()?];
        while self.tokens.check(TokenKind::Comma) {
            self.tokens.advance()?;
            sequences.push(self.parse_sequence()?);
        }
        self.tokens.expect(TokenKind::Eof, "end of input")?;

        Ok(OrderBy {
            expression: OrderExpression { sequences },
        })
    }

    /// `Ident ("." Ident)* "desc"?`
    fn parse_sequence(&mut self) -> Result<OrderSequence, ParseError> {
        let mut path = vec![self.tokens.expect(TokenKind::Ident, "identifier")?.text];
        while self.tokens.check(TokenKind::Dot) {
            self.tokens.advance()?;
            path.push(self.tokens.expect(TokenKind::Ident, "identifier")?.text);
        }

        let desc = self.tokens.check(TokenKind::Desc);
        if desc {
            self.tokens.advance()?;
        }

        Ok(OrderSequence { path, desc })
    }
}
