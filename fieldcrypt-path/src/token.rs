//! Path expression tokenizer
//!
//! Lexical rules:
//! - `$`, `.`, `[`, `]`, `*` are single-character tokens
//! - identifiers start with a Unicode letter or `_` and continue with letters,
//!   digits or `_`
//! - quoted strings use `'` or `"`; a backslash escapes the next character
//! - numbers are non-negative decimal integers that fit in `usize`
//! - whitespace between tokens is ignored

use crate::error::ParseError;
use std::fmt;

/// Token kinds produced by [`Tokenizer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Root marker `$`
    Root,
    /// Field separator `.`
    Dot,
    /// `[`
    BracketLeft,
    /// `]`
    BracketRight,
    /// `*`
    Wildcard,
    /// Bare identifier
    Id(String),
    /// Quoted literal, quotes stripped and escapes resolved
    Str(String),
    /// Non-negative integer literal
    Number(usize),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Root => f.write_str("'$'"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::BracketLeft => f.write_str("'['"),
            TokenKind::BracketRight => f.write_str("']'"),
            TokenKind::Wildcard => f.write_str("'*'"),
            TokenKind::Id(name) => write!(f, "identifier '{}'", name),
            TokenKind::Str(value) => write!(f, "string '{}'", value),
            TokenKind::Number(n) => write!(f, "number {}", n),
        }
    }
}

/// A token with its byte offset in the source expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind and payload
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub position: usize,
}

/// Streaming tokenizer over a path expression
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`
    pub fn new(input: &'a str) -> Self {
        Tokenizer { input, pos: 0 }
    }

    /// Tokenize the whole input
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn error(&self, position: usize, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.input, position, reason)
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_ws();
        let position = self.pos;
        let c = match self.bump() {
            Some(c) => c,
            None => return Ok(None),
        };

        let kind = match c {
            '$' => TokenKind::Root,
            '.' => TokenKind::Dot,
            '[' => TokenKind::BracketLeft,
            ']' => TokenKind::BracketRight,
            '*' => TokenKind::Wildcard,
            '\'' | '"' => self.lex_string(c, position)?,
            c if c.is_ascii_digit() => self.lex_number(position)?,
            c if is_identifier_start(c) => self.lex_identifier(position),
            other => {
                return Err(self.error(position, format!("unexpected character '{}'", other)));
            }
        };

        Ok(Some(Token { kind, position }))
    }

    fn lex_string(&mut self, quote: char, start: usize) -> Result<TokenKind, ParseError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error(start, "unterminated string literal")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error(start, "unterminated string literal")),
            }
        }
    }

    // The first digit has already been consumed.
    fn lex_number(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else {
                break;
            }
        }
        self.input[start..self.pos]
            .parse::<usize>()
            .map(TokenKind::Number)
            .map_err(|_| self.error(start, "array index out of range"))
    }

    fn lex_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if is_identifier_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Id(self.input[start..self.pos].to_string())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `name` can be written in dot notation
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_continue),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_dot_path_with_wildcard() {
        assert_eq!(
            kinds("$.buz.arr[*].haha"),
            vec![
                TokenKind::Root,
                TokenKind::Dot,
                TokenKind::Id("buz".to_string()),
                TokenKind::Dot,
                TokenKind::Id("arr".to_string()),
                TokenKind::BracketLeft,
                TokenKind::Wildcard,
                TokenKind::BracketRight,
                TokenKind::Dot,
                TokenKind::Id("haha".to_string()),
            ]
        );
    }

    #[test]
    fn strips_quotes_and_resolves_escapes() {
        assert_eq!(
            kinds(r#"['it\'s'] ["a\"b"]"#),
            vec![
                TokenKind::BracketLeft,
                TokenKind::Str("it's".to_string()),
                TokenKind::BracketRight,
                TokenKind::BracketLeft,
                TokenKind::Str("a\"b".to_string()),
                TokenKind::BracketRight,
            ]
        );
    }

    #[test]
    fn skips_whitespace_between_tokens() {
        assert_eq!(
            kinds(" $ .\tfoo [ 12 ] "),
            vec![
                TokenKind::Root,
                TokenKind::Dot,
                TokenKind::Id("foo".to_string()),
                TokenKind::BracketLeft,
                TokenKind::Number(12),
                TokenKind::BracketRight,
            ]
        );
    }

    #[test]
    fn records_byte_positions() {
        let tokens = Tokenizer::new("$.ab[3]").tokenize().unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn identifiers_may_contain_digits_after_the_first_char() {
        assert_eq!(kinds("field_2"), vec![TokenKind::Id("field_2".to_string())]);
        assert_eq!(
            kinds("2field"),
            vec![TokenKind::Number(2), TokenKind::Id("field".to_string())]
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = Tokenizer::new("$['abc").tokenize().unwrap_err();
        assert_eq!(err.position, 2);
        assert!(err.reason.contains("unterminated"));
    }

    #[test]
    fn rejects_unexpected_character() {
        let err = Tokenizer::new("$.a-b").tokenize().unwrap_err();
        assert_eq!(err.position, 3);
    }

    #[test]
    fn rejects_index_overflow() {
        let err = Tokenizer::new("[99999999999999999999999999]")
            .tokenize()
            .unwrap_err();
        assert!(err.reason.contains("out of range"));
    }

    #[test]
    fn is_identifier_matches_lexer() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_x9"));
        assert!(is_identifier("données"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier("a.b"));
    }
}
