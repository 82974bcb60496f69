// sqlfront SQL front end

pub mod query;

// Re-export key items for convenient access
pub use query::parser::ast;
pub use query::parser::{
    Lexer, LexerReader, ParseError, ParseResult, Parser, Position, Query, Token, TokenReader,
    TokenType, TokenWindow,
};
