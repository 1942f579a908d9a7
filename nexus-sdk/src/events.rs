//! Decoding of the pseudo-JSON event payloads emitted by the Nexus package.
//!
//! The node reports event payloads under a `parsedJson` key, but the string
//! is not guaranteed to be valid JSON: payloads have been observed with
//! single-quoted strings, Python-style keywords (`True`, `None`), and raw
//! embedded newlines inside string values. Instead of a strict JSON parse,
//! this module escapes the raw newlines and runs a small literal parser
//! that accepts both conventions.

use std::collections::BTreeMap;
use thiserror::Error;

/// A structured decode failure, carrying the byte offset into the
/// (newline-escaped) payload at which parsing stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of payload at byte {0}")]
    UnexpectedEnd(usize),

    #[error("unexpected character `{ch}` at byte {at}")]
    UnexpectedChar { ch: char, at: usize },

    #[error("invalid escape `\\{ch}` at byte {at}")]
    BadEscape { ch: char, at: usize },

    #[error("integer out of range at byte {0}")]
    IntOutOfRange(usize),

    #[error("trailing data after value at byte {0}")]
    TrailingData(usize),
}

/// A decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<Literal>),
    Map(BTreeMap<String, Literal>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a key when the literal is a map.
    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Looks up a key and requires the value to be a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Literal::as_str)
    }
}

/// Decodes an event payload string into a [`Literal`].
///
/// Raw newline characters are escaped first; the chain serializer emits
/// them unescaped inside string values, which no parser would otherwise
/// accept.
pub fn decode_event_payload(raw: &str) -> Result<Literal, DecodeError> {
    let escaped = raw.replace('\n', "\\n");
    Parser::new(&escaped).parse()
}

/// Extracts the execution identifier from a decoded `cluster::execute`
/// event.
///
/// The same call can emit two differently-shaped events, so the identifier
/// may appear under `execution` or `cluster_execution`. The precedence is
/// fixed: `execution` wins when both keys are present. Returns `None` when
/// neither exists.
pub fn execution_id(event: &Literal) -> Option<&str> {
    event
        .get_str("execution")
        .or_else(|| event.get_str("cluster_execution"))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse(mut self) -> Result<Literal, DecodeError> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.src.len() {
            return Err(DecodeError::TrailingData(self.pos));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Result<char, DecodeError> {
        let ch = self.peek().ok_or(DecodeError::UnexpectedEnd(self.pos))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), DecodeError> {
        let at = self.pos;
        let ch = self.bump()?;
        if ch != expected {
            return Err(DecodeError::UnexpectedChar { ch, at });
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Literal, DecodeError> {
        self.skip_whitespace();
        match self.peek().ok_or(DecodeError::UnexpectedEnd(self.pos))? {
            '{' => self.parse_map(),
            '[' => self.parse_list(),
            '\'' | '"' => Ok(Literal::Str(self.parse_string()?)),
            '-' => self.parse_number(),
            ch if ch.is_ascii_digit() => self.parse_number(),
            _ => self.parse_keyword(),
        }
    }

    fn parse_map(&mut self) -> Result<Literal, DecodeError> {
        self.expect('{')?;
        let mut map = BTreeMap::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump()?;
            return Ok(Literal::Map(map));
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_whitespace();
            let at = self.pos;
            match self.bump()? {
                ',' => continue,
                '}' => return Ok(Literal::Map(map)),
                ch => return Err(DecodeError::UnexpectedChar { ch, at }),
            }
        }
    }

    fn parse_list(&mut self) -> Result<Literal, DecodeError> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump()?;
            return Ok(Literal::List(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            let at = self.pos;
            match self.bump()? {
                ',' => continue,
                ']' => return Ok(Literal::List(items)),
                ch => return Err(DecodeError::UnexpectedChar { ch, at }),
            }
        }
    }

    /// Parses a string delimited by either single or double quotes.
    fn parse_string(&mut self) -> Result<String, DecodeError> {
        let at = self.pos;
        let quote = self.bump()?;
        if quote != '\'' && quote != '"' {
            return Err(DecodeError::UnexpectedChar { ch: quote, at });
        }
        let mut out = String::new();
        loop {
            let ch = self.bump()?;
            if ch == quote {
                return Ok(out);
            }
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            let at = self.pos;
            match self.bump()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '\\' => out.push('\\'),
                '/' => out.push('/'),
                '\'' => out.push('\''),
                '"' => out.push('"'),
                'u' => out.push(self.parse_unicode_escape(at)?),
                ch => return Err(DecodeError::BadEscape { ch, at }),
            }
        }
    }

    fn parse_unicode_escape(&mut self, at: usize) -> Result<char, DecodeError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()?
                .to_digit(16)
                .ok_or(DecodeError::BadEscape { ch: 'u', at })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(DecodeError::BadEscape { ch: 'u', at })
    }

    fn parse_number(&mut self) -> Result<Literal, DecodeError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump()?;
        }
        let mut is_float = false;
        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => {
                    self.bump()?;
                }
                '.' | 'e' | 'E' | '+' | '-' if !is_float || ch != '.' => {
                    is_float = true;
                    self.bump()?;
                }
                _ => break,
            }
        }
        let text = &self.src[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| DecodeError::IntOutOfRange(start))
        } else {
            text.parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| DecodeError::IntOutOfRange(start))
        }
    }

    fn parse_keyword(&mut self) -> Result<Literal, DecodeError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "true" | "True" => Ok(Literal::Bool(true)),
            "false" | "False" => Ok(Literal::Bool(false)),
            "null" | "None" => Ok(Literal::Null),
            _ => Err(DecodeError::UnexpectedChar {
                ch: self.src[start..].chars().next().unwrap_or('\0'),
                at: start,
            }),
        }
    }
}
