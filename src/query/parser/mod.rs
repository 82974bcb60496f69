// SQL Parser Module
//
// This module is responsible for parsing SQL queries and converting them
// into an abstract syntax tree (AST) representation.

// Re-export public components
pub mod ast;
pub mod components;
pub mod error;
pub mod lexer;
pub mod reader;
pub mod token;

// Export key types
pub use self::ast::Query;
pub use self::components::Parser;
pub use self::error::{ParseError, ParseResult};
pub use self::lexer::Lexer;
pub use self::reader::{LexerReader, TokenReader, TokenWindow};
pub use self::token::{Position, Token, TokenType};
