use thiserror::Error;

/// SQL Parsing errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// No more tokens. Used internally to detect missing optional clauses.
    #[error("Unexpected end of input")]
    EndOfInput,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Read failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ParseError::InvalidQuery(reason.into())
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
