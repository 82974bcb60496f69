// SQL Token Model
//
// Shared vocabulary between the lexer and the parser: token kinds, source
// positions and the token itself.

use std::fmt;

use serde::Serialize;

/// SQL Token types
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub enum TokenType {
    // Keywords
    SELECT,
    INSERT,
    UPDATE,
    DELETE,
    CREATE,
    ALTER,
    DROP,
    FROM,
    AS,
    SET,
    INTO,
    WHERE,
    JOIN,
    LEFT,
    RIGHT,
    OUTER,
    INNER,
    ON,
    GroupBy,
    OrderBy,
    HAVING,
    VALUES,
    DESC,
    ASC,
    NULL,
    PrimaryKey,
    AND,
    OR,
    IF,
    NOT,
    EXIST,
    ADD,
    COLUMN,
    DEFAULT,
    DATABASE,
    TABLE,
    ASSERTION,
    INDEX,
    CHECK,
    REFERENCES,
    UNIQUE,

    // Column types
    INTEGER,
    SERIAL,
    VARCHAR,

    // Literals
    NUMBER(i64),

    // Identifiers
    IDENTIFIER(String),

    // Operators
    EQUALS,      // =
    LessThan,    // <
    GreaterThan, // >

    // Punctuation
    ASTERISK,   // *
    COMMA,      // ,
    PERIOD,     // .
    LeftParen,  // (
    RightParen, // )
    QUESTION,   // ?

    // Special
    ILLEGAL,
}

impl TokenType {
    /// Whether two token types are the same kind, ignoring literal payloads
    pub fn same_kind(&self, other: &TokenType) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, TokenType::IDENTIFIER(_))
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::GroupBy => write!(f, "GROUP BY"),
            TokenType::OrderBy => write!(f, "ORDER BY"),
            TokenType::PrimaryKey => write!(f, "PRIMARY KEY"),
            TokenType::NUMBER(value) => write!(f, "INT({})", value),
            TokenType::IDENTIFIER(name) => write!(f, "IDENT({})", name),
            TokenType::EQUALS => write!(f, "="),
            TokenType::LessThan => write!(f, "<"),
            TokenType::GreaterThan => write!(f, ">"),
            TokenType::ASTERISK => write!(f, "*"),
            TokenType::COMMA => write!(f, ","),
            TokenType::PERIOD => write!(f, "."),
            TokenType::LeftParen => write!(f, "("),
            TokenType::RightParen => write!(f, ")"),
            TokenType::QUESTION => write!(f, "?"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Location of a token in the query text.
///
/// `offset` is the byte offset of the token's first byte, `column` is the
/// number of bytes the token consumed (including any whitespace swallowed by
/// a two-word keyword such as `ORDER BY`).
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Position {
    pub line: usize,
    pub offset: usize,
    pub column: usize,
}

/// A Token represents a lexical unit in the SQL query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub position: Position,
    /// Source text the token was scanned from
    pub literal: String,
}

impl Token {
    pub fn new(token_type: TokenType, position: Position, literal: impl Into<String>) -> Self {
        Token {
            token_type,
            position,
            literal: literal.into(),
        }
    }

    pub fn is(&self, token_type: &TokenType) -> bool {
        self.token_type.same_kind(token_type)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} line {} offset {} column {}",
            self.token_type, self.position.line, self.position.offset, self.position.column
        )
    }
}
