// SQL Lexer Implementation
//
// This module implements a lexer for SQL that tokenizes input queries.
// The lexer works on bytes pulled from any `Read` source: offsets and
// columns in `Position` are byte counts.

use std::collections::{HashMap, VecDeque};
use std::io::{self, BufReader, Bytes, Read};

use log::trace;
use once_cell::sync::Lazy;

use super::token::{Position, Token, TokenType};

/// Single-word keywords, matched case-insensitively
static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    HashMap::from([
        ("select", TokenType::SELECT),
        ("insert", TokenType::INSERT),
        ("update", TokenType::UPDATE),
        ("delete", TokenType::DELETE),
        ("create", TokenType::CREATE),
        ("alter", TokenType::ALTER),
        ("drop", TokenType::DROP),
        ("from", TokenType::FROM),
        ("as", TokenType::AS),
        ("set", TokenType::SET),
        ("into", TokenType::INTO),
        ("where", TokenType::WHERE),
        ("join", TokenType::JOIN),
        ("left", TokenType::LEFT),
        ("right", TokenType::RIGHT),
        ("outer", TokenType::OUTER),
        ("inner", TokenType::INNER),
        ("on", TokenType::ON),
        ("having", TokenType::HAVING),
        ("values", TokenType::VALUES),
        ("desc", TokenType::DESC),
        ("asc", TokenType::ASC),
        ("null", TokenType::NULL),
        ("and", TokenType::AND),
        ("or", TokenType::OR),
        ("if", TokenType::IF),
        ("not", TokenType::NOT),
        ("exist", TokenType::EXIST),
        ("add", TokenType::ADD),
        ("column", TokenType::COLUMN),
        ("default", TokenType::DEFAULT),
        ("database", TokenType::DATABASE),
        ("table", TokenType::TABLE),
        ("assertion", TokenType::ASSERTION),
        ("index", TokenType::INDEX),
        ("check", TokenType::CHECK),
        ("references", TokenType::REFERENCES),
        ("unique", TokenType::UNIQUE),
        ("serial", TokenType::SERIAL),
        ("varchar", TokenType::VARCHAR),
        ("int", TokenType::INTEGER),
    ])
});

/// SQL Lexer for breaking a query into tokens
pub struct Lexer<R: Read> {
    input: Bytes<BufReader<R>>,
    lookahead: VecDeque<u8>,
    line: usize,
    start: usize,
    cur: usize,
}

impl<'a> Lexer<&'a [u8]> {
    /// Create a lexer over an in-memory query string
    pub fn from_query(query: &'a str) -> Self {
        Lexer::new(query.as_bytes())
    }
}

impl<R: Read> Lexer<R> {
    /// Create a new lexer reading from `source`
    pub fn new(source: R) -> Self {
        Lexer {
            input: BufReader::new(source).bytes(),
            lookahead: VecDeque::new(),
            line: 1,
            start: 0,
            cur: 0,
        }
    }

    /// Current cursor position. Once `scan` has returned `None` this is the
    /// end-of-input position.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            offset: self.cur,
            column: 0,
        }
    }

    /// Scan the next token.
    ///
    /// Returns `Ok(None)` at end of input; read failures from the source are
    /// returned unchanged.
    pub fn scan(&mut self) -> io::Result<Option<Token>> {
        let first = loop {
            match self.peek()? {
                None => return Ok(None),
                Some(b) if is_whitespace(b) || is_line_break(b) => self.discard(),
                Some(b) => break b,
            }
        };

        let line = self.line;
        self.start = self.cur;

        let (token_type, literal) = match first {
            b',' => self.single(TokenType::COMMA, first),
            b'.' => self.single(TokenType::PERIOD, first),
            b'*' => self.single(TokenType::ASTERISK, first),
            b'=' => self.single(TokenType::EQUALS, first),
            b'<' => self.single(TokenType::LessThan, first),
            b'>' => self.single(TokenType::GreaterThan, first),
            b'(' => self.single(TokenType::LeftParen, first),
            b')' => self.single(TokenType::RightParen, first),
            b'?' => self.single(TokenType::QUESTION, first),
            _ => self.scan_word()?,
        };

        let token = Token::new(
            token_type,
            Position {
                line,
                offset: self.start,
                column: self.cur - self.start,
            },
            literal,
        );
        trace!("scanned {}", token);
        Ok(Some(token))
    }

    /// Drain the lexer into a vector of tokens
    pub fn tokenize(&mut self) -> io::Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.scan()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn single(&mut self, token_type: TokenType, ch: u8) -> (TokenType, String) {
        self.discard();
        (token_type, (ch as char).to_string())
    }

    /// Read a keyword, number or identifier
    fn scan_word(&mut self) -> io::Result<(TokenType, String)> {
        let mut word = Vec::new();
        while let Some(b) = self.peek()? {
            if is_word_boundary(b) {
                break;
            }
            word.push(b);
            self.discard();
        }

        let text = String::from_utf8_lossy(&word).into_owned();
        let lowered = text.to_lowercase();

        let token_type = match lowered.as_str() {
            "order" => self.scan_phrase(&mut word, b"by", TokenType::OrderBy)?,
            "group" => self.scan_phrase(&mut word, b"by", TokenType::GroupBy)?,
            "primary" => self.scan_phrase(&mut word, b"key", TokenType::PrimaryKey)?,
            _ => match KEYWORDS.get(lowered.as_str()) {
                Some(keyword) => keyword.clone(),
                None => match text.parse::<i64>() {
                    Ok(value) => TokenType::NUMBER(value),
                    Err(_) => TokenType::IDENTIFIER(text),
                },
            },
        };

        Ok((token_type, String::from_utf8_lossy(&word).into_owned()))
    }

    /// Finish a two-word keyword: skip whitespace, then consume exactly
    /// `expected.len()` bytes whether or not they match.
    fn scan_phrase(
        &mut self,
        word: &mut Vec<u8>,
        expected: &[u8],
        matched: TokenType,
    ) -> io::Result<TokenType> {
        self.skip_whitespace(word)?;

        let lookahead = self.peek_n(expected.len())?;
        word.extend_from_slice(&lookahead);
        self.discard_n(expected.len());

        if lookahead.eq_ignore_ascii_case(expected) {
            Ok(matched)
        } else {
            Ok(TokenType::ILLEGAL)
        }
    }

    fn skip_whitespace(&mut self, skipped: &mut Vec<u8>) -> io::Result<()> {
        while let Some(b) = self.peek()? {
            if !(is_whitespace(b) || is_line_break(b)) {
                break;
            }
            skipped.push(b);
            self.discard();
        }
        Ok(())
    }

    /// Make sure `n` bytes are buffered if the source has them
    fn fill(&mut self, n: usize) -> io::Result<bool> {
        while self.lookahead.len() < n {
            match self.input.next() {
                Some(Ok(b)) => self.lookahead.push_back(b),
                Some(Err(err)) => return Err(err),
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Peek the next byte. Every line break observed here counts as a new
    /// line, even if the byte is not consumed afterwards.
    fn peek(&mut self) -> io::Result<Option<u8>> {
        if !self.fill(1)? {
            return Ok(None);
        }
        let b = self.lookahead[0];
        if is_line_break(b) {
            self.line += 1;
        }
        Ok(Some(b))
    }

    /// Peek up to `n` raw bytes, without line accounting
    fn peek_n(&mut self, n: usize) -> io::Result<Vec<u8>> {
        self.fill(n)?;
        Ok(self.lookahead.iter().take(n).copied().collect())
    }

    fn discard(&mut self) {
        self.cur += 1;
        self.lookahead.pop_front();
    }

    /// Drop up to `n` buffered bytes; the cursor always advances by `n`
    fn discard_n(&mut self, n: usize) {
        self.cur += n;
        let available = n.min(self.lookahead.len());
        self.lookahead.drain(..available);
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}

fn is_line_break(b: u8) -> bool {
    b == b'\n'
}

fn is_word_boundary(b: u8) -> bool {
    is_whitespace(b) || is_line_break(b) || matches!(b, b',' | b'.' | b'(' | b')')
}
