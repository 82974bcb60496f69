// SQL Abstract Syntax Tree (AST) Implementation
//
// This module defines the AST nodes for representing parsed SQL queries.
// Trees are built bottom-up by the parser and never mutated afterwards.

use std::fmt;

use serde::Serialize;

use super::token::{Token, TokenType};

/// Represents a parsed SQL query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Query {
    Select(Select),
}

/// SELECT statement representation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Select {
    pub select_list: Vec<SelectExpr>,
    pub table: TableExpression,
    pub order_by: OrderByClause,
}

/// One item of the select list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectExpr {
    pub column: String,
    pub alias: Option<String>,
    pub asterisk: bool,
}

impl SelectExpr {
    pub fn asterisk() -> Self {
        SelectExpr {
            asterisk: true,
            ..Default::default()
        }
    }

    pub fn column(name: impl Into<String>, alias: Option<String>) -> Self {
        SelectExpr {
            column: name.into(),
            alias,
            asterisk: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableExpression {
    pub from: FromClause,
    pub where_clause: Option<WhereClause>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<HavingClause>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FromClause {
    pub tables: Vec<TableReference>,
    pub join: Option<JoinedTable>,
}

/// Table reference in FROM clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReference {
    pub name: String,
    pub alias: Option<String>,
}

impl TableReference {
    pub fn new(name: impl Into<String>) -> Self {
        TableReference {
            name: name.into(),
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedTable {
    /// Join type words in source order, e.g. `LEFT OUTER`
    pub join_type: Vec<Token>,
    pub table: TableReference,
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhereClause {
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HavingClause {
    pub condition: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupByClause {
    pub columns: Vec<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderByClause {
    pub sort_specifications: Vec<SortSpecification>,
}

impl OrderByClause {
    pub fn is_empty(&self) -> bool {
        self.sort_specifications.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortSpecification {
    pub key: Token,
    pub direction: Option<Token>,
}

/// Boolean condition tree of WHERE, HAVING and join conditions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Comparison {
        operator: ComparisonOperator,
        left: ValueExpr,
        right: ValueExpr,
    },
    BooleanTerm {
        connective: Connective,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn comparison(operator: ComparisonOperator, left: ValueExpr, right: ValueExpr) -> Self {
        Expression::Comparison { operator, left, right }
    }

    pub fn boolean(connective: Connective, left: Expression, right: Expression) -> Self {
        Expression::BooleanTerm {
            connective,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOperator {
    Equal,
    LessThan,
    GreaterThan,
}

impl ComparisonOperator {
    pub fn from_token_type(token_type: &TokenType) -> Option<Self> {
        match token_type {
            TokenType::EQUALS => Some(ComparisonOperator::Equal),
            TokenType::LessThan => Some(ComparisonOperator::LessThan),
            TokenType::GreaterThan => Some(ComparisonOperator::GreaterThan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn from_token_type(token_type: &TokenType) -> Option<Self> {
        match token_type {
            TokenType::AND => Some(Connective::And),
            TokenType::OR => Some(Connective::Or),
            _ => None,
        }
    }
}

/// Operand of a comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum ValueExpr {
    /// Token run that did not match any value form
    #[default]
    Empty,
    Integer(i64),
    /// Bare identifier or other single word
    String(String),
    /// Dotted reference such as `table.column`
    Identifiers(Vec<String>),
    /// `?` placeholder bound at execution time
    DynamicParameter,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Select(_) => write!(f, "SELECT statement"),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Equal => write!(f, "="),
            ComparisonOperator::LessThan => write!(f, "<"),
            ComparisonOperator::GreaterThan => write!(f, ">"),
        }
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpr::Empty => write!(f, "<empty>"),
            ValueExpr::Integer(value) => write!(f, "{}", value),
            ValueExpr::String(value) => write!(f, "{}", value),
            ValueExpr::Identifiers(parts) => write!(f, "{}", parts.join(".")),
            ValueExpr::DynamicParameter => write!(f, "?"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Comparison { operator, left, right } => {
                write!(f, "{} {} {}", left, operator, right)
            }
            Expression::BooleanTerm { connective, left, right } => {
                let word = match connective {
                    Connective::And => "AND",
                    Connective::Or => "OR",
                };
                write!(f, "({} {} {})", left, word, right)
            }
        }
    }
}
