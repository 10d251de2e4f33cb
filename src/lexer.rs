//! Priority-ordered lexers for the filter and order-by languages.
//!
//! At every position the rules of a grammar are tried in a fixed order and
//! the first one that matches wins, even when a later rule would match a
//! longer prefix. `true` is therefore a keyword in `trueish` (`true` +
//! `ish`), `-1` is `Neg` followed by `Int`, and `!=` must be listed before
//! `=` inside the operator class.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::ast::{Position, Span, Token, TokenKind};

/// Maximum number of characters of remaining input quoted in a [`LexError`].
const ERROR_SAMPLE_CHARS: usize = 16;

/// Input at `position` matched no rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: invalid input text {sample:?}")]
pub struct LexError {
    pub position: Position,
    pub sample: String,
}

/// Which language a [`Lexer`] recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Filter,
    OrderBy,
}

struct Rule {
    kind: TokenKind,
    pattern: Regex,
}

fn rules(table: &[(TokenKind, &str)]) -> Vec<Rule> {
    table
        .iter()
        .map(|&(kind, pattern)| Rule {
            kind,
            // the tables below are fixed at compile time
            pattern: Regex::new(&format!("^(?:{})", pattern)).expect("lexer rule must compile"),
        })
        .collect()
}

static FILTER_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (TokenKind::Whitespace, r"[\t\n\f\r ]+"),
        (TokenKind::And, r"AND"),
        (TokenKind::Or, r"OR"),
        (TokenKind::Not, r"NOT"),
        (TokenKind::LParen, r"\("),
        (TokenKind::RParen, r"\)"),
        (TokenKind::Neg, r"-"),
        (TokenKind::Operator, r"!=|>=|<=|>|<|=|:"),
        (TokenKind::True, r"true"),
        (TokenKind::False, r"false"),
        (TokenKind::Ident, r"[A-Za-z_][A-Za-z0-9_]*"),
        (TokenKind::Float, r"[-+]?[0-9]*\.[0-9]+"),
        (TokenKind::Int, r"[-+]?[0-9]+"),
        (TokenKind::Wildcard, r"\*"),
        (TokenKind::String, r#"'[^']*'|"[^"]*""#),
        (TokenKind::Comma, r","),
        (TokenKind::Dot, r"\."),
    ])
});

static ORDER_BY_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    rules(&[
        (TokenKind::Whitespace, r"[\t\n\f\r ]+"),
        (TokenKind::Desc, r"desc"),
        (TokenKind::Ident, r"[A-Za-z_][A-Za-z0-9_]*"),
        (TokenKind::Dot, r"\."),
        (TokenKind::Comma, r","),
    ])
});

impl Grammar {
    fn rules(self) -> &'static [Rule] {
        match self {
            Grammar::Filter => &FILTER_RULES,
            Grammar::OrderBy => &ORDER_BY_RULES,
        }
    }

    /// Token kinds in the order the lexer tries them.
    pub fn kinds(self) -> Vec<TokenKind> {
        self.rules().iter().map(|rule| rule.kind).collect()
    }

    /// Symbol table of the lexer: `EOF` is `-1` and the rule at priority
    /// index `i` is `-(i + 2)`.
    pub fn symbols(self) -> BTreeMap<&'static str, i32> {
        let mut symbols = BTreeMap::new();
        symbols.insert(TokenKind::Eof.name(), -1);
        for (i, rule) in self.rules().iter().enumerate() {
            symbols.insert(rule.kind.name(), -(i as i32 + 2));
        }
        symbols
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    grammar: Grammar,
    position: Position,
}

impl<'a> Lexer<'a> {
    /// Creates a filter lexer.
    pub fn new(input: &'a str) -> Self {
        Self::with_grammar(Grammar::Filter, input)
    }

    /// Creates an order-by lexer.
    pub fn order_by(input: &'a str) -> Self {
        Self::with_grammar(Grammar::OrderBy, input)
    }

    pub fn with_grammar(grammar: Grammar, input: &'a str) -> Self {
        Lexer {
            input,
            grammar,
            position: Position::start(),
        }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Returns the next token exactly as matched, whitespace included.
    /// Once the input is exhausted every call returns `Eof`.
    pub fn next_raw_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let rest = &self.input[start.offset..];
        if rest.is_empty() {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                Span::new(start.offset, start.offset),
                start,
            ));
        }

        let matched = self
            .grammar
            .rules()
            .iter()
            .find_map(|rule| rule.pattern.find(rest).map(|m| (rule.kind, m.end())));

        let Some((kind, len)) = matched else {
            return Err(self.error());
        };

        let text = &rest[..len];
        self.position.advance(text);
        Ok(Token::new(
            kind,
            text,
            Span::new(start.offset, self.position.offset),
            start,
        ))
    }

    /// Returns the next token the parser consumes: whitespace is skipped and
    /// string literals are unquoted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            let mut token = self.next_raw_token()?;
            match token.kind {
                TokenKind::Whitespace => continue,
                TokenKind::String => {
                    token.text = unquote(&token.text).to_string();
                    return Ok(token);
                }
                _ => return Ok(token),
            }
        }
    }

    /// Lexes the whole input into raw tokens, whitespace included, ending
    /// with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_raw_token()?;
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn error(&self) -> LexError {
        let rest = &self.input[self.position.offset..];
        let mut sample: String = rest.chars().take(ERROR_SAMPLE_CHARS).collect();
        if rest.chars().nth(ERROR_SAMPLE_CHARS).is_some() {
            sample.push_str("...");
        }
        LexError {
            position: self.position,
            sample,
        }
    }
}

/// Strips the delimiters of a quoted string token. No escape processing.
fn unquote(text: &str) -> &str {
    text.get(1..text.len().saturating_sub(1)).unwrap_or("")
}
