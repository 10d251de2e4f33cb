//! JSON views of lexer output

use serde_json::{Map, Value as JsonValue, json};

use super::CliError;
use crate::lexer::{Grammar, Lexer};

/// Symbol table of `grammar` as a JSON object of name to symbol id.
pub fn symbols_to_json(grammar: Grammar) -> JsonValue {
    let symbols: Map<String, JsonValue> = grammar
        .symbols()
        .into_iter()
        .map(|(name, id)| (name.to_string(), JsonValue::from(id)))
        .collect();
    JsonValue::Object(symbols)
}

/// Raw tokens of `input`, whitespace included, as a JSON array.
pub fn tokens_to_json(grammar: Grammar, input: &str) -> Result<JsonValue, CliError> {
    let symbols = grammar.symbols();
    let tokens = Lexer::with_grammar(grammar, input)
        .tokenize()?
        .into_iter()
        .map(|token| {
            json!({
                "kind": token.kind.name(),
                "symbol": symbols.get(token.kind.name()),
                "text": token.text,
                "span": [token.span.start, token.span.end],
                "line": token.position.line,
                "column": token.position.column,
            })
        })
        .collect();
    Ok(JsonValue::Array(tokens))
}
