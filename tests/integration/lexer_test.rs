use std::io::{self, Read};

use anyhow::Result;
use sqlfront::{Lexer, LexerReader, ParseError, TokenReader, TokenType};

#[path = "../common/mod.rs"]
mod common;

use common::{ident, positions, tokens};

use TokenType::*;

#[test]
fn test_select_positions() -> Result<()> {
    let cases: Vec<(&str, Vec<(TokenType, usize, usize, usize)>)> = vec![
        (
            "select * from `test`",
            vec![
                (SELECT, 1, 0, 6),
                (ASTERISK, 1, 7, 1),
                (FROM, 1, 9, 4),
                (ident("`test`"), 1, 14, 6),
            ],
        ),
        (
            "select    *    from    test",
            vec![
                (SELECT, 1, 0, 6),
                (ASTERISK, 1, 10, 1),
                (FROM, 1, 15, 4),
                (ident("test"), 1, 23, 4),
            ],
        ),
        (
            "SELECT id,age from users",
            vec![
                (SELECT, 1, 0, 6),
                (ident("id"), 1, 7, 2),
                (COMMA, 1, 9, 1),
                (ident("age"), 1, 10, 3),
                (FROM, 1, 14, 4),
                (ident("users"), 1, 19, 5),
            ],
        ),
        (
            "select * from users order by created_date desc",
            vec![
                (SELECT, 1, 0, 6),
                (ASTERISK, 1, 7, 1),
                (FROM, 1, 9, 4),
                (ident("users"), 1, 14, 5),
                (OrderBy, 1, 20, 8),
                (ident("created_date"), 1, 29, 12),
                (DESC, 1, 42, 4),
            ],
        ),
        (
            "select * from users group by group_id having group_id > 10",
            vec![
                (SELECT, 1, 0, 6),
                (ASTERISK, 1, 7, 1),
                (FROM, 1, 9, 4),
                (ident("users"), 1, 14, 5),
                (GroupBy, 1, 20, 8),
                (ident("group_id"), 1, 29, 8),
                (HAVING, 1, 38, 6),
                (ident("group_id"), 1, 45, 8),
                (GreaterThan, 1, 54, 1),
                (NUMBER(10), 1, 56, 2),
            ],
        ),
        (
            "select * from users right outer join blog on users.id = blog.user_id",
            vec![
                (SELECT, 1, 0, 6),
                (ASTERISK, 1, 7, 1),
                (FROM, 1, 9, 4),
                (ident("users"), 1, 14, 5),
                (RIGHT, 1, 20, 5),
                (OUTER, 1, 26, 5),
                (JOIN, 1, 32, 4),
                (ident("blog"), 1, 37, 4),
                (ON, 1, 42, 2),
                (ident("users"), 1, 45, 5),
                (PERIOD, 1, 50, 1),
                (ident("id"), 1, 51, 2),
                (EQUALS, 1, 54, 1),
                (ident("blog"), 1, 56, 4),
                (PERIOD, 1, 60, 1),
                (ident("user_id"), 1, 61, 7),
            ],
        ),
        (
            "SELECT id as foo from users",
            vec![
                (SELECT, 1, 0, 6),
                (ident("id"), 1, 7, 2),
                (AS, 1, 10, 2),
                (ident("foo"), 1, 13, 3),
                (FROM, 1, 17, 4),
                (ident("users"), 1, 22, 5),
            ],
        ),
    ];

    for (query, expected) in cases {
        assert_eq!(positions(query)?, expected, "{}", query);
    }
    Ok(())
}

#[test]
fn test_end_of_input_position() -> Result<()> {
    for (query, end) in [
        ("select * from test", 18),
        ("select * from users where id = 1", 32),
        ("select * from users left inner join blog on users.id = blog.user_id", 67),
    ] {
        let mut lexer = Lexer::from_query(query);
        lexer.tokenize()?;
        assert_eq!(lexer.position().offset, end, "{}", query);
        assert!(lexer.scan()?.is_none());
    }
    Ok(())
}

#[test]
fn test_update_and_insert_tokens() -> Result<()> {
    assert_eq!(
        positions("update users set name = \"test\" where id = 1")?,
        vec![
            (UPDATE, 1, 0, 6),
            (ident("users"), 1, 7, 5),
            (SET, 1, 13, 3),
            (ident("name"), 1, 17, 4),
            (EQUALS, 1, 22, 1),
            (ident("\"test\""), 1, 24, 6),
            (WHERE, 1, 31, 5),
            (ident("id"), 1, 37, 2),
            (EQUALS, 1, 40, 1),
            (NUMBER(1), 1, 42, 1),
        ]
    );

    assert_eq!(
        positions("insert into users (id, name) values (1, \"test\")")?,
        vec![
            (INSERT, 1, 0, 6),
            (INTO, 1, 7, 4),
            (ident("users"), 1, 12, 5),
            (LeftParen, 1, 18, 1),
            (ident("id"), 1, 19, 2),
            (COMMA, 1, 21, 1),
            (ident("name"), 1, 23, 4),
            (RightParen, 1, 27, 1),
            (VALUES, 1, 29, 6),
            (LeftParen, 1, 36, 1),
            (NUMBER(1), 1, 37, 1),
            (COMMA, 1, 38, 1),
            (ident("\"test\""), 1, 40, 6),
            (RightParen, 1, 46, 1),
        ]
    );
    Ok(())
}

#[test]
fn test_ddl_keywords() -> Result<()> {
    assert_eq!(
        positions("alter table users add column name varchar(255)")?,
        vec![
            (ALTER, 1, 0, 5),
            (TABLE, 1, 6, 5),
            (ident("users"), 1, 12, 5),
            (ADD, 1, 18, 3),
            (COLUMN, 1, 22, 6),
            (ident("name"), 1, 29, 4),
            (VARCHAR, 1, 34, 7),
            (LeftParen, 1, 41, 1),
            (NUMBER(255), 1, 42, 3),
            (RightParen, 1, 45, 1),
        ]
    );

    assert_eq!(
        positions("create assertion check_input check (not exist (select * from blog))")?,
        vec![
            (CREATE, 1, 0, 6),
            (ASSERTION, 1, 7, 9),
            (ident("check_input"), 1, 17, 11),
            (CHECK, 1, 29, 5),
            (LeftParen, 1, 35, 1),
            (NOT, 1, 36, 3),
            (EXIST, 1, 40, 5),
            (LeftParen, 1, 46, 1),
            (SELECT, 1, 47, 6),
            (ASTERISK, 1, 54, 1),
            (FROM, 1, 56, 4),
            (ident("blog"), 1, 61, 4),
            (RightParen, 1, 65, 1),
            (RightParen, 1, 66, 1),
        ]
    );
    Ok(())
}

#[test]
fn test_multi_line_create_table() -> Result<()> {
    let query = "create table test (
id serial primary key,
name varchar(4) default \"none\",
user_id int references user(id),
blog_id int unique,
page_id int not null,
community_id int null,
file varchar(20) check(file = \"foo\"))";

    let expected = vec![
        (CREATE, 1, 0, 6),
        (TABLE, 1, 7, 5),
        (ident("test"), 1, 13, 4),
        (LeftParen, 1, 18, 1),
        (ident("id"), 2, 20, 2),
        (SERIAL, 2, 23, 6),
        (PrimaryKey, 2, 30, 11),
        (COMMA, 2, 41, 1),
        (ident("name"), 3, 43, 4),
        (VARCHAR, 3, 48, 7),
        (LeftParen, 3, 55, 1),
        (NUMBER(4), 3, 56, 1),
        (RightParen, 3, 57, 1),
        (DEFAULT, 3, 59, 7),
        (ident("\"none\""), 3, 67, 6),
        (COMMA, 3, 73, 1),
        (ident("user_id"), 4, 75, 7),
        (INTEGER, 4, 83, 3),
        (REFERENCES, 4, 87, 10),
        (ident("user"), 4, 98, 4),
        (LeftParen, 4, 102, 1),
        (ident("id"), 4, 103, 2),
        (RightParen, 4, 105, 1),
        (COMMA, 4, 106, 1),
        (ident("blog_id"), 5, 108, 7),
        (INTEGER, 5, 116, 3),
        (UNIQUE, 5, 120, 6),
        (COMMA, 5, 126, 1),
        (ident("page_id"), 6, 128, 7),
        (INTEGER, 6, 136, 3),
        (NOT, 6, 140, 3),
        (NULL, 6, 144, 4),
        (COMMA, 6, 148, 1),
        (ident("community_id"), 7, 150, 12),
        (INTEGER, 7, 163, 3),
        (NULL, 7, 167, 4),
        (COMMA, 7, 171, 1),
        (ident("file"), 8, 173, 4),
        (VARCHAR, 8, 178, 7),
        (LeftParen, 8, 185, 1),
        (NUMBER(20), 8, 186, 2),
        (RightParen, 8, 188, 1),
        (CHECK, 8, 190, 5),
        (LeftParen, 8, 195, 1),
        (ident("file"), 8, 196, 4),
        (EQUALS, 8, 201, 1),
        (ident("\"foo\""), 8, 203, 5),
        (RightParen, 8, 208, 1),
        (RightParen, 8, 209, 1),
    ];

    assert_eq!(positions(query)?, expected);

    let mut lexer = Lexer::from_query(query);
    lexer.tokenize()?;
    assert_eq!(lexer.position().offset, 210);
    assert_eq!(lexer.position().line, 8);
    Ok(())
}

#[test]
fn test_literals_keep_source_text() -> Result<()> {
    let scanned = tokens("Select Users.ID from T order BY x")?;
    let literals: Vec<&str> = scanned.iter().map(|t| t.literal.as_str()).collect();
    assert_eq!(literals, vec!["Select", "Users", ".", "ID", "from", "T", "order BY", "x"]);
    assert_eq!(scanned[3].token_type, ident("ID"));
    Ok(())
}

#[test]
fn test_dynamic_parameter_token() -> Result<()> {
    assert_eq!(
        positions("id=?")?,
        vec![(ident("id"), 1, 0, 2), (EQUALS, 1, 2, 1), (QUESTION, 1, 3, 1)]
    );
    Ok(())
}

struct ChunkedReader<'a> {
    data: &'a [u8],
}

impl Read for ChunkedReader<'_> {
    // Hand out one byte per call
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.split_first() {
            Some((b, rest)) if !buf.is_empty() => {
                buf[0] = *b;
                self.data = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn test_lexer_over_streaming_source() -> Result<()> {
    let query = "select id from users order by id";
    let mut streamed = Lexer::new(ChunkedReader { data: query.as_bytes() });
    assert_eq!(streamed.tokenize()?, tokens(query)?);
    Ok(())
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
    }
}

#[test]
fn test_read_failure_reaches_the_parser() {
    let mut reader = LexerReader::new(Lexer::new(BrokenReader));
    match reader.peek(1) {
        Err(ParseError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("expected read failure, got {:?}", other.map(|t| t.len())),
    }
}
