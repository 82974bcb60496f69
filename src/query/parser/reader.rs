// Token Readers
//
// The parser pulls tokens through `TokenReader`, so it does not care whether
// they come live from the lexer or from a token range it already cut out of
// the stream.

use std::io::Read;

use super::error::{ParseError, ParseResult};
use super::lexer::Lexer;
use super::token::Token;

/// Pull interface over a token stream
pub trait TokenReader {
    /// Take the next token
    fn scan(&mut self) -> ParseResult<Token>;

    /// Look at the next `n` tokens without consuming them.
    ///
    /// Fails with `ParseError::EndOfInput` when fewer than `n` remain; nothing
    /// is consumed in that case.
    fn peek(&mut self, n: usize) -> ParseResult<&[Token]>;

    /// Drop the next `n` tokens. When fewer than `n` are left this does
    /// nothing at all.
    fn discard(&mut self, n: usize);
}

/// Streaming reader on top of the lexer, with a small pushback buffer
pub struct LexerReader<R: Read> {
    lexer: Lexer<R>,
    buffer: Vec<Token>,
}

impl<R: Read> LexerReader<R> {
    pub fn new(lexer: Lexer<R>) -> Self {
        LexerReader {
            lexer,
            buffer: Vec::with_capacity(2),
        }
    }

    /// Buffer up to `n` tokens; false if the lexer ran dry first
    fn fill(&mut self, n: usize) -> ParseResult<bool> {
        while self.buffer.len() < n {
            match self.lexer.scan()? {
                Some(token) => self.buffer.push(token),
                None => return Ok(false),
            }
        }
        Ok(true)
    }
}

impl<'a> LexerReader<&'a [u8]> {
    pub fn from_query(query: &'a str) -> Self {
        LexerReader::new(Lexer::from_query(query))
    }
}

impl<R: Read> TokenReader for LexerReader<R> {
    fn scan(&mut self) -> ParseResult<Token> {
        if !self.buffer.is_empty() {
            return Ok(self.buffer.remove(0));
        }
        self.lexer.scan()?.ok_or(ParseError::EndOfInput)
    }

    fn peek(&mut self, n: usize) -> ParseResult<&[Token]> {
        if !self.fill(n)? {
            return Err(ParseError::EndOfInput);
        }
        Ok(&self.buffer[..n])
    }

    fn discard(&mut self, n: usize) {
        if self.buffer.len() >= n {
            self.buffer.drain(..n);
        }
    }
}

/// Index window over an already scanned token arena.
///
/// Sub-ranges are handed out as new windows on the same arena, so cutting a
/// condition apart never copies tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenWindow<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenWindow<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        TokenWindow { tokens, pos: 0 }
    }

    /// Tokens not consumed yet
    pub fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

impl TokenReader for TokenWindow<'_> {
    fn scan(&mut self) -> ParseResult<Token> {
        let token = self.tokens.get(self.pos).cloned().ok_or(ParseError::EndOfInput)?;
        self.pos += 1;
        Ok(token)
    }

    fn peek(&mut self, n: usize) -> ParseResult<&[Token]> {
        let remaining = self.remaining();
        if remaining.len() < n {
            return Err(ParseError::EndOfInput);
        }
        Ok(&remaining[..n])
    }

    fn discard(&mut self, n: usize) {
        if self.remaining().len() >= n {
            self.pos += n;
        }
    }
}
