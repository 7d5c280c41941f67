//! Recursive-descent parser for path expressions
//!
//! Grammar:
//!
//! ```text
//! jsonpath         := '$' subscript* EOF
//! subscript        := subscriptDot | subscriptBracket
//! subscriptDot     := '.' ID arraySub?
//! subscriptBracket := '[' STRING ']' arraySub?
//! arraySub         := '[' (NUMBER | '*') ']'
//! ```

use crate::ast::{ArraySub, FieldStep, Notation, PathExpression};
use crate::error::ParseError;
use crate::limits::PathLimits;
use crate::token::{Token, TokenKind, Tokenizer};
use smallvec::SmallVec;

/// Parse a path expression using default [`PathLimits`]
pub fn parse(text: &str) -> Result<PathExpression, ParseError> {
    parse_with_limits(text, &PathLimits::default())
}

/// Parse a path expression, enforcing the given limits
pub fn parse_with_limits(text: &str, limits: &PathLimits) -> Result<PathExpression, ParseError> {
    if text.len() > limits.max_expression_len {
        return Err(ParseError::new(
            text,
            limits.max_expression_len,
            format!(
                "expression is {} bytes long (max: {})",
                text.len(),
                limits.max_expression_len
            ),
        ));
    }

    let tokens = Tokenizer::new(text).tokenize()?;
    let expression = Parser::new(text, tokens).jsonpath()?;

    if expression.task_count() > limits.max_tasks {
        return Err(ParseError::new(
            text,
            0,
            format!(
                "expression compiles to {} tasks (max: {})",
                expression.task_count(),
                limits.max_tasks
            ),
        ));
    }

    Ok(expression)
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, tokens: Vec<Token>) -> Self {
        Parser {
            text,
            tokens,
            cursor: 0,
        }
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.cursor + offset).map(|t| &t.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn error(&self, position: usize, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.text, position, reason)
    }

    fn unexpected(&self, token: Option<Token>, expected: &str) -> ParseError {
        match token {
            Some(token) => self.error(
                token.position,
                format!("expected {}, found {}", expected, token.kind),
            ),
            None => self.error(
                self.text.len(),
                format!("expected {}, found end of input", expected),
            ),
        }
    }

    fn expect_bracket_right(&mut self) -> Result<(), ParseError> {
        match self.bump() {
            Some(Token {
                kind: TokenKind::BracketRight,
                ..
            }) => Ok(()),
            other => Err(self.unexpected(other, "']'")),
        }
    }

    fn jsonpath(mut self) -> Result<PathExpression, ParseError> {
        match self.bump() {
            Some(Token {
                kind: TokenKind::Root,
                ..
            }) => {}
            None => return Err(self.error(0, "empty expression")),
            other => return Err(self.unexpected(other, "'$' at start of expression")),
        }

        let mut steps = SmallVec::new();
        while let Some(kind) = self.peek_kind(0) {
            let step = match kind {
                TokenKind::Dot => self.subscript_dot()?,
                TokenKind::BracketLeft => self.subscript_bracket()?,
                _ => {
                    let token = self.bump();
                    return Err(self.unexpected(token, "'.' or '[' after complete path"));
                }
            };
            steps.push(step);
        }

        Ok(PathExpression::new(self.text, steps))
    }

    fn subscript_dot(&mut self) -> Result<FieldStep, ParseError> {
        self.bump();
        let name = match self.bump() {
            Some(Token {
                kind: TokenKind::Id(name),
                ..
            }) => name,
            other => return Err(self.unexpected(other, "identifier after '.'")),
        };
        Ok(FieldStep {
            name,
            notation: Notation::Dot,
            array: self.array_sub()?,
        })
    }

    fn subscript_bracket(&mut self) -> Result<FieldStep, ParseError> {
        self.bump();
        let name = match self.bump() {
            Some(Token {
                kind: TokenKind::Str(name),
                ..
            }) => name,
            other => return Err(self.unexpected(other, "quoted field name after '['")),
        };
        self.expect_bracket_right()?;
        Ok(FieldStep {
            name,
            notation: Notation::Bracket,
            array: self.array_sub()?,
        })
    }

    // `[` only opens an array subscript when followed by a number or `*`;
    // `['name']` is the next field subscript.
    fn array_sub(&mut self) -> Result<Option<ArraySub>, ParseError> {
        if self.peek_kind(0) != Some(&TokenKind::BracketLeft) {
            return Ok(None);
        }
        let sub = match self.peek_kind(1) {
            Some(TokenKind::Number(index)) => ArraySub::Index(*index),
            Some(TokenKind::Wildcard) => ArraySub::Wildcard,
            _ => return Ok(None),
        };
        self.bump();
        self.bump();
        self.expect_bracket_right()?;
        Ok(Some(sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, notation: Notation, array: Option<ArraySub>) -> FieldStep {
        FieldStep {
            name: name.to_string(),
            notation,
            array,
        }
    }

    #[test]
    fn parses_root_alone() {
        let expr = parse("$").unwrap();
        assert!(expr.steps().is_empty());
    }

    #[test]
    fn parses_dot_and_bracket_steps() {
        let expr = parse("$.buz['arr'][*].haha[3]").unwrap();
        assert_eq!(
            expr.steps(),
            &[
                step("buz", Notation::Dot, None),
                step("arr", Notation::Bracket, Some(ArraySub::Wildcard)),
                step("haha", Notation::Dot, Some(ArraySub::Index(3))),
            ]
        );
    }

    #[test]
    fn bracket_field_after_bracket_field_is_not_an_array_sub() {
        let expr = parse("$['a']['b']").unwrap();
        assert_eq!(
            expr.steps(),
            &[
                step("a", Notation::Bracket, None),
                step("b", Notation::Bracket, None),
            ]
        );
    }

    #[test]
    fn bracket_names_accept_arbitrary_characters() {
        let expr = parse(r#"$["user.name"]['with space']['']"#).unwrap();
        let names: Vec<&str> = expr.steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["user.name", "with space", ""]);
    }

    #[test]
    fn rejects_missing_root() {
        let err = parse("text").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.reason.contains("'$'"));
    }

    #[test]
    fn rejects_empty_expression() {
        let err = parse("").unwrap_err();
        assert_eq!(err.reason, "empty expression");
        assert!(parse("   ").is_err());
    }

    #[test]
    fn rejects_unterminated_bracket() {
        let err = parse("$.[").unwrap_err();
        assert_eq!(err.position, 2);
        assert!(parse("$['a'").is_err());
        assert!(parse("$.a[0").is_err());
        assert!(parse("$.a[").is_err());
    }

    #[test]
    fn rejects_non_identifier_after_dot() {
        assert!(parse("$.0").is_err());
        assert!(parse("$.*").is_err());
        assert!(parse("$.'a'").is_err());
    }

    #[test]
    fn rejects_trailing_tokens() {
        let err = parse("$.a]").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(parse("$.a $").is_err());
        assert!(parse("$$").is_err());
    }

    #[test]
    fn rejects_second_array_subscript() {
        let err = parse("$.a[0][1]").unwrap_err();
        assert!(err.reason.contains("quoted field name"));
    }

    #[test]
    fn rejects_bare_array_subscript_on_root() {
        assert!(parse("$[0]").is_err());
        assert!(parse("$[*]").is_err());
    }

    #[test]
    fn enforces_expression_length_limit() {
        let limits = PathLimits {
            max_expression_len: 8,
            ..PathLimits::default()
        };
        assert!(parse_with_limits("$.abcdef", &limits).is_ok());
        assert!(parse_with_limits("$.abcdefg", &limits).is_err());
    }

    #[test]
    fn enforces_task_limit() {
        let limits = PathLimits {
            max_tasks: 3,
            ..PathLimits::default()
        };
        assert!(parse_with_limits("$.a[*].b", &limits).is_ok());
        let err = parse_with_limits("$.a[*].b[0]", &limits).unwrap_err();
        assert!(err.reason.contains("4 tasks"));
    }
}
