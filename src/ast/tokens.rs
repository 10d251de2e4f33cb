use std::fmt;

/// Kind of a lexical token.
///
/// The filter and order-by lexers share this enum; each lexer only ever
/// produces the subset of kinds its rule table contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Runs of `\t`, `\n`, `\f`, `\r` or space. Produced by the lexer and
    /// elided before the parser sees the stream.
    Whitespace,

    // Keywords
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `NOT`
    Not,
    /// `desc` (order-by only)
    Desc,

    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `.`
    Dot,

    /// `-` prefix negation
    Neg,

    /// One of `!=`, `>=`, `<=`, `>`, `<`, `=`, `:`
    Operator,

    // Literals
    /// `true`
    True,
    /// `false`
    False,
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Ident,
    /// Number with a mandatory fractional part, e.g. `1.5`, `.5`, `+0.25`
    Float,
    /// Signed decimal integer
    Int,
    /// `*`
    Wildcard,
    /// `'...'` or `"..."`, without escape processing
    String,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Name under which the kind appears in a lexer symbol table.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::And => "And",
            TokenKind::Or => "Or",
            TokenKind::Not => "Not",
            TokenKind::Desc => "Desc",
            TokenKind::LParen => "LParen",
            TokenKind::RParen => "RParen",
            TokenKind::Comma => "Comma",
            TokenKind::Dot => "Dot",
            TokenKind::Neg => "Neg",
            TokenKind::Operator => "Operator",
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::Ident => "Ident",
            TokenKind::Float => "Float",
            TokenKind::Int => "Int",
            TokenKind::Wildcard => "Wildcard",
            TokenKind::String => "String",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Location of a byte offset in the source text. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Moves the position past `text`.
    pub fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += text.len();
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte range `start..end` of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Matched source text. For [`TokenKind::String`] tokens handed to the
    /// parser this is the unquoted payload; `span` still covers the quotes.
    pub text: String,
    pub span: Span,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, position: Position) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
            position,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::String => write!(f, "string {:?}", self.text),
            _ => write!(f, "{:?}", self.text),
        }
    }
}
