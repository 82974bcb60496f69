#![allow(dead_code)]

use anyhow::Result;
use sqlfront::ast::{JoinedTable, Select, ValueExpr};
use sqlfront::{Lexer, Parser, Query, Token, TokenType};

// Tokenize a query held in memory
pub fn tokens(query: &str) -> Result<Vec<Token>> {
    Ok(Lexer::from_query(query).tokenize()?)
}

// (kind, line, offset, column) of every token, for position tables
pub fn positions(query: &str) -> Result<Vec<(TokenType, usize, usize, usize)>> {
    Ok(tokens(query)?
        .into_iter()
        .map(|t| (t.token_type, t.position.line, t.position.offset, t.position.column))
        .collect())
}

// Parse a query that must be a SELECT
pub fn parse_select(query: &str) -> Result<Select> {
    let Query::Select(select) = Parser::new().parse_str(query)?;
    Ok(select)
}

pub fn ident(name: &str) -> TokenType {
    TokenType::IDENTIFIER(name.to_string())
}

pub fn string(name: &str) -> ValueExpr {
    ValueExpr::String(name.to_string())
}

// Dotted identifier chain such as `users.id`
pub fn qualified(parts: &[&str]) -> ValueExpr {
    ValueExpr::Identifiers(parts.iter().map(|p| p.to_string()).collect())
}

// Join type words of a joined table, without their positions
pub fn join_kinds(join: &JoinedTable) -> Vec<TokenType> {
    join.join_type.iter().map(|t| t.token_type.clone()).collect()
}
