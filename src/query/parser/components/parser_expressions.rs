// Condition Parser Implementation
//
// Resolves WHERE / HAVING / join condition token runs into `Expression`
// trees. A condition is split at its first top-level AND/OR; both halves are
// resolved recursively on windows over the same token arena, so chains group
// to the right: `a AND b AND c` is `AND(a, AND(b, c))`. A run without a
// connective must hold exactly one comparison.

use log::{trace, warn};

use crate::query::parser::ast::{ComparisonOperator, Connective, Expression, ValueExpr};
use crate::query::parser::error::{ParseError, ParseResult};
use crate::query::parser::reader::{TokenReader, TokenWindow};
use crate::query::parser::token::{Token, TokenType};

use super::parser_core::render;

/// Resolve a complete condition cut out of the token stream
pub fn parse_condition(tokens: &[Token]) -> ParseResult<Expression> {
    if tokens.is_empty() {
        return Err(ParseError::invalid("empty condition"));
    }
    parse_search_condition(&mut TokenWindow::new(tokens))
}

/// Split the window at the first AND/OR outside parentheses, or fall through
/// to a single comparison
pub fn parse_search_condition(window: &mut TokenWindow<'_>) -> ParseResult<Expression> {
    let remaining = window.remaining();
    let tokens = strip_redundant_parens(remaining);
    if tokens.len() < remaining.len() {
        // Wholly parenthesized run: resolve what is inside
        window.discard(remaining.len());
        return parse_search_condition(&mut TokenWindow::new(tokens));
    }

    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match &token.token_type {
            TokenType::LeftParen => depth += 1,
            TokenType::RightParen => {
                if depth == 0 {
                    let reason = format!("unbalanced ')' in `{}`", render(tokens));
                    return Err(ParseError::invalid(reason));
                }
                depth -= 1;
            }
            token_type if depth == 0 => {
                let Some(connective) = Connective::from_token_type(token_type) else {
                    continue;
                };

                let rest = &tokens[i + 1..];
                let end = rest
                    .iter()
                    .position(|t| matches!(t.token_type, TokenType::OrderBy | TokenType::GroupBy))
                    .unwrap_or(rest.len());
                window.discard(i + 1 + end);

                let left = &tokens[..i];
                let right = &rest[..end];
                trace!("{:?} split: `{}` / `{}`", connective, render(left), render(right));

                let left = parse_search_condition(&mut TokenWindow::new(left))?;
                let right = parse_search_condition(&mut TokenWindow::new(right))?;
                return Ok(Expression::boolean(connective, left, right));
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::invalid(format!("unclosed '(' in `{}`", render(tokens))));
    }

    parse_boolean_value_expression(window)
}

/// Resolve `value <op> value` at the first `=`, `<` or `>`
pub fn parse_boolean_value_expression(window: &mut TokenWindow<'_>) -> ParseResult<Expression> {
    let tokens = window.remaining();
    let found = tokens
        .iter()
        .enumerate()
        .find_map(|(i, t)| {
            ComparisonOperator::from_token_type(&t.token_type).map(|op| (i, op))
        });

    let Some((i, operator)) = found else {
        return Err(ParseError::invalid(format!(
            "expected a comparison in `{}`",
            render(tokens)
        )));
    };
    window.discard(tokens.len());

    Ok(Expression::comparison(
        operator,
        parse_value_expr(&tokens[..i]),
        parse_value_expr(&tokens[i + 1..]),
    ))
}

/// Reduce a token run to a value.
///
/// Runs that fit none of the value forms resolve to `ValueExpr::Empty`
/// rather than an error.
pub fn parse_value_expr(tokens: &[Token]) -> ValueExpr {
    match tokens {
        [Token {
            token_type: TokenType::IDENTIFIER(name),
            ..
        }] => ValueExpr::String(name.clone()),
        [Token {
            token_type: TokenType::NUMBER(value),
            ..
        }] => ValueExpr::Integer(*value),
        [Token {
            token_type: TokenType::QUESTION,
            ..
        }] => ValueExpr::DynamicParameter,
        _ => match qualified_identifiers(tokens) {
            Some(parts) => ValueExpr::Identifiers(parts),
            None => {
                warn!("Unrecognized value expression `{}`, using empty value", render(tokens));
                ValueExpr::Empty
            }
        },
    }
}

/// `IDENT (PERIOD IDENT)+`
fn qualified_identifiers(tokens: &[Token]) -> Option<Vec<String>> {
    let (first, rest) = tokens.split_first()?;
    if rest.is_empty() || rest.len() % 2 != 0 {
        return None;
    }

    let mut parts = vec![identifier(first)?];
    for pair in rest.chunks(2) {
        if !pair[0].is(&TokenType::PERIOD) {
            return None;
        }
        parts.push(identifier(&pair[1])?);
    }
    Some(parts)
}

fn identifier(token: &Token) -> Option<String> {
    match &token.token_type {
        TokenType::IDENTIFIER(name) => Some(name.clone()),
        _ => None,
    }
}

/// Drop one enclosing paren pair, but only when the leading `(` is closed by
/// the trailing `)`. Runs shorter than three tokens are returned as is.
pub fn strip_redundant_parens(tokens: &[Token]) -> &[Token] {
    if tokens.len() < 3 {
        return tokens;
    }
    let last = tokens.len() - 1;
    if !tokens[0].is(&TokenType::LeftParen) || !tokens[last].is(&TokenType::RightParen) {
        return tokens;
    }

    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.token_type {
            TokenType::LeftParen => depth += 1,
            TokenType::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return if i == last { &tokens[1..last] } else { tokens };
                }
            }
            _ => {}
        }
    }
    tokens
}
