//! Wraps the logos-generated lexer, stamping every token with a [`Span`] up
//! front so the parser can operate over a plain `Vec` with a cursor instead
//! of re-deriving positions while backtracking.

use logos::Logos;

use crate::error::ParseError;
use crate::span::{SourceMap, Span};
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenize a whole source string eagerly. Fails on the first unrecognized
/// character, matching the analyzer's "first error aborts" policy (spec.md
/// §7) rather than collecting and reporting every lexical error.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let source_map = SourceMap::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let (line, column) = source_map.line_col(range.start);
        let span = Span::new(range.start, range.end, line, column);
        match result {
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => {
                return Err(ParseError::LexerError {
                    text: lexer.slice().to_string(),
                    span,
                })
            }
        }
    }

    Ok(tokens)
}
