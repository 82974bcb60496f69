// SELECT Statement Parser Implementation
//
// This module implements parsing for SQL SELECT statements: the select list,
// the table expression (FROM, joined table, WHERE, GROUP BY, HAVING) and
// ORDER BY.

use log::trace;

use crate::query::parser::ast::*;
use crate::query::parser::error::{ParseError, ParseResult};
use crate::query::parser::reader::TokenReader;
use crate::query::parser::token::{Token, TokenType};

use super::parser_core::{collect_until, expect_token, next_is, peek_type, render, split_on_commas};
use super::parser_expressions::parse_condition;

/// Tokens that end the table list of a FROM clause
const FROM_BOUNDARY: &[TokenType] = &[
    TokenType::WHERE,
    TokenType::OrderBy,
    TokenType::GroupBy,
    TokenType::HAVING,
    TokenType::LEFT,
    TokenType::RIGHT,
];

/// Tokens that end a WHERE or join condition
const CONDITION_BOUNDARY: &[TokenType] = &[
    TokenType::WHERE,
    TokenType::GroupBy,
    TokenType::OrderBy,
    TokenType::HAVING,
];

const GROUP_BY_BOUNDARY: &[TokenType] = &[TokenType::HAVING, TokenType::OrderBy];

const HAVING_BOUNDARY: &[TokenType] = &[TokenType::OrderBy];

/// Parse a SELECT statement
pub fn parse_select<R: TokenReader>(reader: &mut R) -> ParseResult<Select> {
    expect_token(reader, TokenType::SELECT)?;

    let select_list = parse_select_list(reader)?;
    let table = parse_table_expression(reader)?;
    let order_by = parse_order_by_clause(reader)?;

    if let Some(token_type) = peek_type(reader)? {
        return Err(ParseError::invalid(format!("unexpected {} after end of query", token_type)));
    }

    Ok(Select {
        select_list,
        table,
        order_by,
    })
}

/// Parse the select list, everything up to FROM
fn parse_select_list<R: TokenReader>(reader: &mut R) -> ParseResult<Vec<SelectExpr>> {
    let tokens = collect_until(reader, &[TokenType::FROM])?;
    if tokens.is_empty() {
        return Err(ParseError::invalid("empty select list"));
    }

    split_on_commas(&tokens).into_iter().map(resolve_select_item).collect()
}

fn resolve_select_item(tokens: &[Token]) -> ParseResult<SelectExpr> {
    match tokens {
        [] => Err(ParseError::invalid("empty select item")),
        [Token {
            token_type: TokenType::ASTERISK,
            ..
        }] => Ok(SelectExpr::asterisk()),
        [
            Token {
                token_type: TokenType::IDENTIFIER(column),
                ..
            },
            Token {
                token_type: TokenType::AS,
                ..
            },
            Token {
                token_type: TokenType::IDENTIFIER(alias),
                ..
            },
        ] => Ok(SelectExpr::column(column.clone(), Some(alias.clone()))),
        _ => {
            let column: String = tokens.iter().map(|t| t.literal.as_str()).collect();
            Ok(SelectExpr::column(column, None))
        }
    }
}

/// Parse FROM and the optional clauses that follow it
fn parse_table_expression<R: TokenReader>(reader: &mut R) -> ParseResult<TableExpression> {
    let from = parse_from_clause(reader)?;
    let where_clause = parse_where_clause(reader)?;
    let group_by = parse_group_by_clause(reader)?;
    let having = parse_having_clause(reader)?;

    Ok(TableExpression {
        from,
        where_clause,
        group_by,
        having,
    })
}

fn parse_from_clause<R: TokenReader>(reader: &mut R) -> ParseResult<FromClause> {
    if !next_is(reader, &TokenType::FROM)? {
        return Err(ParseError::invalid("missing FROM clause"));
    }
    reader.discard(1);

    let references = collect_until(reader, FROM_BOUNDARY)?;
    let tables = split_on_commas(&references)
        .into_iter()
        .map(resolve_table_reference)
        .collect::<ParseResult<Vec<_>>>()?;
    trace!("FROM clause: {} table(s)", tables.len());

    let join = parse_joined_table(reader)?;

    Ok(FromClause { tables, join })
}

/// `name`, `name alias` or `name AS alias`
fn resolve_table_reference(tokens: &[Token]) -> ParseResult<TableReference> {
    let (name, alias) = match tokens {
        [] => return Err(ParseError::invalid("missing table name")),
        [Token {
            token_type: TokenType::IDENTIFIER(name),
            ..
        }] => (name, None),
        [
            Token {
                token_type: TokenType::IDENTIFIER(name),
                ..
            },
            Token {
                token_type: TokenType::IDENTIFIER(alias),
                ..
            },
        ]
        | [
            Token {
                token_type: TokenType::IDENTIFIER(name),
                ..
            },
            Token {
                token_type: TokenType::AS,
                ..
            },
            Token {
                token_type: TokenType::IDENTIFIER(alias),
                ..
            },
        ] => (name, Some(alias.clone())),
        _ => {
            let reason = format!("malformed table reference `{}`", render(tokens));
            return Err(ParseError::invalid(reason));
        }
    };

    Ok(TableReference {
        name: name.clone(),
        alias,
    })
}

/// States of the joined table scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinState {
    /// Collecting LEFT / RIGHT / OUTER / INNER until JOIN
    JoinType,
    /// Collecting the joined table until ON
    TableName,
}

enum JoinStep {
    Continue,
    /// ON was seen; the join condition follows
    Condition,
}

struct JoinScan {
    state: JoinState,
    pending: Vec<Token>,
    join_type: Vec<Token>,
}

impl JoinScan {
    fn new() -> Self {
        JoinScan {
            state: JoinState::JoinType,
            pending: Vec::new(),
            join_type: Vec::new(),
        }
    }

    fn step(&mut self, token: Token) -> ParseResult<JoinStep> {
        match self.state {
            JoinState::JoinType => self.on_join_type(token),
            JoinState::TableName => self.on_table_name(token),
        }
    }

    fn on_join_type(&mut self, token: Token) -> ParseResult<JoinStep> {
        match token.token_type {
            TokenType::LEFT | TokenType::RIGHT | TokenType::OUTER | TokenType::INNER => {
                self.pending.push(token);
                Ok(JoinStep::Continue)
            }
            TokenType::JOIN => {
                self.join_type = std::mem::take(&mut self.pending);
                self.state = JoinState::TableName;
                Ok(JoinStep::Continue)
            }
            _ => Err(ParseError::invalid(format!("unexpected {} in join type", token.token_type))),
        }
    }

    fn on_table_name(&mut self, token: Token) -> ParseResult<JoinStep> {
        match token.token_type {
            TokenType::ON => Ok(JoinStep::Condition),
            _ => {
                self.pending.push(token);
                Ok(JoinStep::Continue)
            }
        }
    }
}

/// Parse `LEFT|RIGHT [OUTER] JOIN table ON condition`, if present
fn parse_joined_table<R: TokenReader>(reader: &mut R) -> ParseResult<Option<JoinedTable>> {
    match peek_type(reader)? {
        Some(TokenType::LEFT) | Some(TokenType::RIGHT) => {}
        _ => return Ok(None),
    }

    let mut scan = JoinScan::new();
    loop {
        let token = match reader.scan() {
            Ok(token) => token,
            Err(ParseError::EndOfInput) => {
                return Err(ParseError::invalid("join without ON condition"));
            }
            Err(err) => return Err(err),
        };
        if let JoinStep::Condition = scan.step(token)? {
            break;
        }
    }

    if scan.pending.is_empty() {
        return Err(ParseError::invalid("join without table name"));
    }
    let table = resolve_table_reference(&scan.pending)?;

    let condition_tokens = collect_until(reader, CONDITION_BOUNDARY)?;
    let condition = parse_condition(&condition_tokens)?;
    trace!("joined table {} on {}", table.name, condition);

    Ok(Some(JoinedTable {
        join_type: scan.join_type,
        table,
        condition,
    }))
}

fn parse_where_clause<R: TokenReader>(reader: &mut R) -> ParseResult<Option<WhereClause>> {
    if !next_is(reader, &TokenType::WHERE)? {
        return Ok(None);
    }
    reader.discard(1);

    let tokens = collect_until(reader, CONDITION_BOUNDARY)?;
    let condition = parse_condition(&tokens)?;
    trace!("WHERE {}", condition);

    Ok(Some(WhereClause { condition }))
}

/// GROUP BY keeps the identifier tokens and drops everything else
fn parse_group_by_clause<R: TokenReader>(reader: &mut R) -> ParseResult<Option<GroupByClause>> {
    if !next_is(reader, &TokenType::GroupBy)? {
        return Ok(None);
    }
    reader.discard(1);

    let columns: Vec<Token> = collect_until(reader, GROUP_BY_BOUNDARY)?
        .into_iter()
        .filter(|t| t.token_type.is_identifier())
        .collect();
    if columns.is_empty() {
        return Err(ParseError::invalid("GROUP BY without columns"));
    }

    Ok(Some(GroupByClause { columns }))
}

fn parse_having_clause<R: TokenReader>(reader: &mut R) -> ParseResult<Option<HavingClause>> {
    if !next_is(reader, &TokenType::HAVING)? {
        return Ok(None);
    }
    reader.discard(1);

    let tokens = collect_until(reader, HAVING_BOUNDARY)?;
    let condition = parse_condition(&tokens)?;
    trace!("HAVING {}", condition);

    Ok(Some(HavingClause { condition }))
}

/// Parse ORDER BY; an absent clause yields an empty list
fn parse_order_by_clause<R: TokenReader>(reader: &mut R) -> ParseResult<OrderByClause> {
    if !next_is(reader, &TokenType::OrderBy)? {
        return Ok(OrderByClause::default());
    }
    reader.discard(1);

    let tokens = collect_until(reader, &[])?;
    let sort_specifications = split_on_commas(&tokens)
        .into_iter()
        .map(|item| match item {
            [] => Err(ParseError::invalid("empty sort specification")),
            [key, rest @ ..] => Ok(SortSpecification {
                key: key.clone(),
                direction: rest.first().cloned(),
            }),
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(OrderByClause { sort_specifications })
}
