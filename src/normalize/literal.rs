//! Safe structured-literal parser
//!
//! Parses the array-like strings found in listing exports, e.g.
//! `['SingleFamily', 'Condo']` or `[{'date': '2021-01-01', 'price': 350000}]`.
//! Only literals are accepted: lists, tuples, sets, dicts, numbers, quoted
//! strings, `True`, `False` and `None`. Nothing is ever evaluated.

use crate::batch::Value;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Error produced when a string is not a valid literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid literal at offset {offset}: {message}")]
pub struct LiteralError {
    /// Byte offset into the input
    pub offset: usize,
    pub message: String,
}

/// Maximum container nesting before the input is rejected
const MAX_DEPTH: usize = 64;

/// Parse a single literal, rejecting trailing input
///
/// Tuples and sets become [`Value::List`]; dicts become [`Value::Map`] with
/// keys rendered as text.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = LiteralParser::new(input);
    parser.skip_whitespace();
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some(_) => Err(parser.error("unexpected trailing input")),
    }
}

struct LiteralParser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> LiteralParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |(i, _)| *i)
    }

    fn error(&mut self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.offset(),
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }

        match self.peek() {
            Some('[') => {
                self.bump();
                let items = self.parse_sequence(']', depth)?.0;
                Ok(Value::List(items))
            }
            Some('(') => {
                self.bump();
                let (mut items, trailing_comma) = self.parse_sequence(')', depth)?;
                // `(x)` is a parenthesized value, `(x,)` is a tuple
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Value::List(items))
                }
            }
            Some('{') => {
                self.bump();
                self.parse_braces(depth)
            }
            Some('\'' | '"') => self.parse_string().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_name(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Parse comma-separated values up to `close`
    ///
    /// Returns the items and whether the last item was followed by a comma.
    fn parse_sequence(
        &mut self,
        close: char,
        depth: usize,
    ) -> Result<(Vec<Value>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, trailing_comma));
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    trailing_comma = true;
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok((items, false));
                }
                _ => return Err(self.error(format!("expected ',' or '{close}'"))),
            }
        }
    }

    /// Parse a dict or set body after the opening brace
    fn parse_braces(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Map(Vec::new()));
        }

        let first = self.parse_value(depth + 1)?;
        self.skip_whitespace();
        if self.peek() != Some(':') {
            // Set literal
            let mut items = vec![first];
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::List(items));
                }
                Some(',') => {
                    self.bump();
                }
                _ => return Err(self.error("expected ',', ':' or '}'")),
            }
            items.extend(self.parse_sequence('}', depth)?.0);
            return Ok(Value::List(items));
        }

        let mut entries = Vec::new();
        let mut key = first;
        loop {
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            entries.push((key_text(&key), value));
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(Value::Map(entries));
                    }
                    key = self.parse_value(depth + 1)?;
                    self.skip_whitespace();
                }
                Some('}') => {
                    self.bump();
                    return Ok(Value::Map(entries));
                }
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or_else(|| self.error("expected quote"))?;
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.parse_escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0'..='7' => out.push(self.parse_octal(c)?),
            '\\' | '\'' | '"' => out.push(c),
            '\n' => {}
            'x' => out.push(self.parse_hex(2)?),
            'u' => out.push(self.parse_hex(4)?),
            'U' => out.push(self.parse_hex(8)?),
            other => {
                // Unknown escapes keep the backslash
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    /// Up to three octal digits, the first already consumed
    fn parse_octal(&mut self, first: char) -> Result<char, LiteralError> {
        let mut code = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    code = code * 8 + digit;
                    self.bump();
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn parse_hex(&mut self, digits: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.offset();
        let mut text = String::new();

        if let Some(sign @ ('-' | '+')) = self.peek() {
            text.push(sign);
            self.bump();
            self.skip_whitespace();
        }

        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => text.push(c),
                '_' => {}
                '.' => {
                    is_float = true;
                    text.push(c);
                }
                'e' | 'E' => {
                    is_float = true;
                    text.push(c);
                    self.bump();
                    if let Some(sign @ ('-' | '+')) = self.peek() {
                        text.push(sign);
                    } else {
                        continue;
                    }
                }
                _ => break,
            }
            self.bump();
        }

        let invalid = || LiteralError {
            offset: start,
            message: format!("invalid number '{text}'"),
        };

        if is_float {
            return text.parse::<f64>().map(Value::Float).map_err(|_| invalid());
        }
        match text.parse::<i64>() {
            Ok(n) => Ok(Value::Int(n)),
            // Integers beyond i64 degrade to floats
            Err(_) => text
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && !text.trim_start_matches(['-', '+']).is_empty())
                .map(Value::Float)
                .ok_or_else(invalid),
        }
    }

    fn parse_name(&mut self) -> Result<Value, LiteralError> {
        let start = self.offset();
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }

        match name.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            _ => Err(LiteralError {
                offset: start,
                message: format!("name '{name}' is not a literal"),
            }),
        }
    }
}

/// Render a dict key as text
fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_string_list() {
        let value = parse_literal("['SingleFamily', \"Condo\"]").unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::from("SingleFamily"), Value::from("Condo")])
        );
    }

    #[test]
    fn test_parse_nested_and_mixed() {
        let value = parse_literal("[1, -2.5, (True, None), [], 'x',]").unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int(1),
                Value::Float(-2.5),
                Value::List(vec![Value::Bool(true), Value::Null]),
                Value::List(vec![]),
                Value::from("x"),
            ])
        );
    }

    #[test]
    fn test_parse_dict_list() {
        let value = parse_literal("[{'date': '2021-01-01', 'price': 350000}]").unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::Map(vec![
                ("date".to_string(), Value::from("2021-01-01")),
                ("price".to_string(), Value::Int(350_000)),
            ])])
        );
    }

    #[test]
    fn test_parse_tuple_vs_parens() {
        assert_eq!(parse_literal("(1)").unwrap(), Value::Int(1));
        assert_eq!(
            parse_literal("(1,)").unwrap(),
            Value::List(vec![Value::Int(1)])
        );
        assert_eq!(parse_literal("()").unwrap(), Value::List(vec![]));
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_literal("{1, 2}").unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(parse_literal("{}").unwrap(), Value::Map(vec![]));
    }

    #[test]
    fn test_parse_escapes() {
        assert_eq!(
            parse_literal(r"'it\'s\n\x41'").unwrap(),
            Value::from("it's\nA")
        );
    }

    #[test]
    fn test_parse_octal_escapes() {
        assert_eq!(parse_literal(r"'\101'").unwrap(), Value::from("A"));
        assert_eq!(parse_literal(r"'\101\0'").unwrap(), Value::from("A\0"));
        assert_eq!(parse_literal(r"'\1019'").unwrap(), Value::from("A9"));
        assert_eq!(parse_literal(r"'\7x'").unwrap(), Value::from("\u{7}x"));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_literal("1_000").unwrap(), Value::Int(1000));
        assert_eq!(parse_literal("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(parse_literal("-7").unwrap(), Value::Int(-7));
        assert_eq!(
            parse_literal("99999999999999999999").unwrap(),
            Value::Float(1e20)
        );
    }

    #[test]
    fn test_rejects_non_literals() {
        assert!(parse_literal("__import__('os')").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("[1] 2").is_err());
        assert!(parse_literal("'open").is_err());
        assert!(parse_literal("").is_err());
        assert!(parse_literal("-").is_err());
        assert!(parse_literal("nan").is_err());
    }

    #[test]
    fn test_rejects_deep_nesting() {
        let input = format!("{}{}", "[".repeat(100), "]".repeat(100));
        assert!(parse_literal(&input).is_err());
    }
}
