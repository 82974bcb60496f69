// Core Parser Implementation
//
// This module implements the statement dispatcher and the scanning helpers
// shared by the clause parsers.

use log::debug;

use crate::query::parser::ast::Query;
use crate::query::parser::error::{ParseError, ParseResult};
use crate::query::parser::reader::{LexerReader, TokenReader};
use crate::query::parser::token::{Token, TokenType};

use super::parser_select::parse_select;

/// SQL Parser for constructing an AST from a token stream
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    /// Parse a single query from `reader`.
    ///
    /// Only SELECT is assembled into a tree; any other leading token is an
    /// invalid query.
    pub fn parse<R: TokenReader>(&self, reader: &mut R) -> ParseResult<Query> {
        let first = match peek_type(reader)? {
            Some(token_type) => token_type,
            None => return Err(ParseError::invalid("empty query")),
        };

        let result = match first {
            TokenType::SELECT => {
                debug!("Parsing SELECT statement");
                parse_select(reader).map(Query::Select)
            }
            other => Err(ParseError::invalid(format!("{} statements are not supported", other))),
        };

        // A required element ran into the end of the stream
        result.map_err(|err| match err {
            ParseError::EndOfInput => ParseError::invalid("unexpected end of query"),
            err => err,
        })
    }

    /// Parse query text directly
    pub fn parse_str(&self, query: &str) -> ParseResult<Query> {
        self.parse(&mut LexerReader::from_query(query))
    }
}

/// Type of the next token, or `None` at end of input
pub fn peek_type<R: TokenReader>(reader: &mut R) -> ParseResult<Option<TokenType>> {
    match reader.peek(1) {
        Ok(tokens) => Ok(Some(tokens[0].token_type.clone())),
        Err(ParseError::EndOfInput) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Check if the next token is of the given kind
pub fn next_is<R: TokenReader>(reader: &mut R, expected: &TokenType) -> ParseResult<bool> {
    Ok(peek_type(reader)?.is_some_and(|t| t.same_kind(expected)))
}

/// Consume the next token, which must be of the expected kind
pub fn expect_token<R: TokenReader>(reader: &mut R, expected: TokenType) -> ParseResult<Token> {
    match reader.scan() {
        Ok(token) if token.is(&expected) => Ok(token),
        Ok(token) => Err(ParseError::invalid(format!("expected {}, found {}", expected, token))),
        Err(ParseError::EndOfInput) => Err(ParseError::invalid(format!(
            "expected {}, found end of query",
            expected
        ))),
        Err(err) => Err(err),
    }
}

/// Take tokens until one of `boundaries` is next or the input ends. The
/// boundary token itself is left in the reader.
pub fn collect_until<R: TokenReader>(
    reader: &mut R,
    boundaries: &[TokenType],
) -> ParseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    loop {
        let token = match reader.peek(1) {
            Ok(next) => next[0].clone(),
            Err(ParseError::EndOfInput) => break,
            Err(err) => return Err(err),
        };
        if boundaries.iter().any(|b| token.is(b)) {
            break;
        }
        reader.discard(1);
        tokens.push(token);
    }
    Ok(tokens)
}

/// Split a token run into comma separated sublists
pub fn split_on_commas(tokens: &[Token]) -> Vec<&[Token]> {
    tokens.split(|t| t.is(&TokenType::COMMA)).collect()
}

/// Render a token run back to text for error messages
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.literal.as_str()).collect::<Vec<_>>().join(" ")
}
