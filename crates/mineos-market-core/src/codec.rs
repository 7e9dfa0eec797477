//! Lua table literal decoder.
//!
//! The market service answers every call with a Lua chunk such as
//! `return {success=true,result={file_id=5}}` instead of JSON. This module
//! turns that text into a [`LuaValue`] tree. It understands the literal
//! subset of Lua the service emits: tables, strings (quoted and long
//! bracket), numbers, booleans, `nil` and comments.
//!
//! # Table shape
//!
//! Lua has a single table type, so every table has to be classified:
//!
//! | Table | Decoded as |
//! |-------|------------|
//! | `{}` | empty [`LuaValue::Sequence`] |
//! | keys exactly `1..=n` | [`LuaValue::Sequence`] in key order |
//! | anything else | [`LuaValue::Mapping`], keys rendered as strings |
//!
//! An empty table is always a sequence because the service uses `{}` for
//! "no results" on list endpoints. An endpoint that legitimately returns an
//! empty object receives an empty sequence as well.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::{format_float, LuaMap, LuaValue};

const MAX_DEPTH: usize = 256;

/// Why a payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated long string")]
    UnterminatedLongString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(String),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("table key must be a string, number or boolean")]
    InvalidKey,
    #[error("tables nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("unexpected trailing input")]
    TrailingInput,
}

/// Malformed table literal, with the position the decoder stopped at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    line: usize,
    column: usize,
}

impl DecodeError {
    pub const fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    pub const fn line(&self) -> usize {
        self.line
    }

    pub const fn column(&self) -> usize {
        self.column
    }
}

/// Decode a response body into a [`LuaValue`].
///
/// A leading `return` keyword and a trailing `;` are accepted. Blank input
/// decodes to an empty sequence, same as `{}`.
pub fn decode(text: &str) -> Result<LuaValue, DecodeError> {
    let mut parser = Parser::new(text.strip_prefix('\u{feff}').unwrap_or(text));

    parser.skip_trivia()?;
    if parser.at_end() {
        return Ok(LuaValue::Sequence(Vec::new()));
    }

    if parser.peek_keyword("return") {
        parser.pos += "return".len();
        parser.skip_trivia()?;
    }

    let value = parser.parse_value(0)?;

    parser.skip_trivia()?;
    if parser.peek() == Some(b';') {
        parser.pos += 1;
        parser.skip_trivia()?;
    }

    if !parser.at_end() {
        return Err(parser.error(DecodeErrorKind::TrailingInput));
    }

    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum TableKey {
    Int(i64),
    Str(String),
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<(), DecodeError> {
        match self.peek() {
            Some(byte) if byte == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.unexpected_char()),
            None => Err(self.error(DecodeErrorKind::UnexpectedEof)),
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.bytes[self.pos..].starts_with(keyword.as_bytes())
            && !self
                .bytes
                .get(self.pos + keyword.len())
                .copied()
                .is_some_and(is_ident_continue)
    }

    fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        let consumed = &self.bytes[..self.pos.min(self.bytes.len())];
        let line_start = consumed
            .iter()
            .rposition(|byte| *byte == b'\n')
            .map_or(0, |index| index + 1);
        let line = consumed.iter().filter(|byte| **byte == b'\n').count() + 1;
        let column = String::from_utf8_lossy(&consumed[line_start..]).chars().count() + 1;

        DecodeError { kind, line, column }
    }

    fn unexpected_char(&self) -> DecodeError {
        let ch = self
            .text
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .or_else(|| self.peek().map(char::from))
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.error(DecodeErrorKind::UnexpectedChar(ch))
    }

    fn skip_trivia(&mut self) -> Result<(), DecodeError> {
        loop {
            while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
                self.pos += 1;
            }

            if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'-') {
                self.pos += 2;
                if let Some(level) = self.long_bracket_level() {
                    self.read_long_bracket(level, DecodeErrorKind::UnterminatedComment)?;
                } else {
                    while self.peek().is_some_and(|byte| byte != b'\n') {
                        self.pos += 1;
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<LuaValue, DecodeError> {
        match self.peek() {
            None => Err(self.error(DecodeErrorKind::UnexpectedEof)),
            Some(b'{') => self.parse_table(depth),
            Some(quote @ (b'"' | b'\'')) => self.parse_quoted(quote).map(LuaValue::String),
            Some(b'[') => match self.long_bracket_level() {
                Some(level) => self
                    .read_long_bracket(level, DecodeErrorKind::UnterminatedLongString)
                    .map(LuaValue::String),
                None => Err(self.unexpected_char()),
            },
            Some(b'-') => {
                self.pos += 1;
                self.skip_trivia()?;
                match self.peek() {
                    Some(byte) if starts_number(byte, self.peek_at(1)) => self.parse_number(true),
                    Some(_) => Err(self.unexpected_char()),
                    None => Err(self.error(DecodeErrorKind::UnexpectedEof)),
                }
            }
            Some(byte) if starts_number(byte, self.peek_at(1)) => self.parse_number(false),
            Some(byte) if is_ident_start(byte) => {
                let start = self.pos;
                let ident = self.read_ident();
                match ident {
                    "nil" => Ok(LuaValue::Nil),
                    "true" => Ok(LuaValue::Boolean(true)),
                    "false" => Ok(LuaValue::Boolean(false)),
                    other => {
                        let other = other.to_owned();
                        self.pos = start;
                        Err(self.error(DecodeErrorKind::UnknownIdentifier(other)))
                    }
                }
            }
            Some(_) => Err(self.unexpected_char()),
        }
    }

    fn parse_table(&mut self, depth: usize) -> Result<LuaValue, DecodeError> {
        if depth >= MAX_DEPTH {
            return Err(self.error(DecodeErrorKind::TooDeep(MAX_DEPTH)));
        }
        self.expect(b'{')?;

        let mut positional: Vec<LuaValue> = Vec::new();
        let mut keyed: Vec<(TableKey, LuaValue)> = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(self.error(DecodeErrorKind::UnexpectedEof)),
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b'[') if self.long_bracket_level().is_none() => {
                    self.pos += 1;
                    self.skip_trivia()?;
                    let key_start = self.pos;
                    let key = self.parse_value(depth + 1)?;
                    let Some(key) = table_key(key) else {
                        self.pos = key_start;
                        return Err(self.error(DecodeErrorKind::InvalidKey));
                    };
                    self.skip_trivia()?;
                    self.expect(b']')?;
                    self.skip_trivia()?;
                    self.expect(b'=')?;
                    self.skip_trivia()?;
                    let value = self.parse_value(depth + 1)?;
                    keyed.push((key, value));
                }
                Some(byte) if is_ident_start(byte) => {
                    let start = self.pos;
                    let name = self.read_ident().to_owned();
                    self.skip_trivia()?;
                    if self.peek() == Some(b'=') && self.peek_at(1) != Some(b'=') {
                        self.pos += 1;
                        self.skip_trivia()?;
                        let value = self.parse_value(depth + 1)?;
                        keyed.push((TableKey::Str(name), value));
                    } else {
                        self.pos = start;
                        positional.push(self.parse_value(depth + 1)?);
                    }
                }
                Some(_) => positional.push(self.parse_value(depth + 1)?),
            }

            self.skip_trivia()?;
            match self.peek() {
                Some(b',' | b';') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.unexpected_char()),
                None => return Err(self.error(DecodeErrorKind::UnexpectedEof)),
            }
        }

        Ok(build_table(positional, keyed))
    }

    fn parse_number(&mut self, negative: bool) -> Result<LuaValue, DecodeError> {
        let text = self.text;
        let start = self.pos;

        let value = if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|byte| byte.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let digits = &text[digits_start..self.pos];
            if digits.is_empty() || self.peek().is_some_and(|byte| byte == b'.' || is_ident_continue(byte)) {
                return Err(self.invalid_number(start));
            }
            // Lua wraps hexadecimal integers modulo 2^64.
            let magnitude = digits
                .bytes()
                .fold(0_u64, |acc, byte| {
                    acc.wrapping_mul(16)
                        .wrapping_add(u64::from(hex_value(byte).unwrap_or(0)))
                }) as i64;
            LuaValue::Integer(if negative { magnitude.wrapping_neg() } else { magnitude })
        } else {
            let mut is_float = false;
            while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.peek() == Some(b'.') {
                is_float = true;
                self.pos += 1;
                while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek(), Some(b'e' | b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                if !self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
                    return Err(self.invalid_number(start));
                }
                while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if self.peek().is_some_and(|byte| byte == b'.' || is_ident_continue(byte)) {
                return Err(self.invalid_number(start));
            }

            let literal = if negative {
                format!("-{}", &text[start..self.pos])
            } else {
                text[start..self.pos].to_owned()
            };

            let integer = if is_float { None } else { literal.parse::<i64>().ok() };
            match integer {
                Some(value) => LuaValue::Integer(value),
                None => literal
                    .parse::<f64>()
                    .map(LuaValue::Float)
                    .map_err(|_| self.invalid_number(start))?,
            }
        };

        Ok(value)
    }

    fn invalid_number(&mut self, start: usize) -> DecodeError {
        while self
            .peek()
            .is_some_and(|byte| byte == b'.' || is_ident_continue(byte))
        {
            self.pos += 1;
        }
        let literal = self.text[start..self.pos].to_owned();
        self.pos = start;
        self.error(DecodeErrorKind::InvalidNumber(literal))
    }

    fn parse_quoted(&mut self, quote: u8) -> Result<String, DecodeError> {
        self.pos += 1;
        let mut buffer: Vec<u8> = Vec::new();

        loop {
            let Some(byte) = self.bump() else {
                return Err(self.error(DecodeErrorKind::UnterminatedString));
            };

            match byte {
                _ if byte == quote => break,
                b'\n' | b'\r' => {
                    self.pos -= 1;
                    return Err(self.error(DecodeErrorKind::UnterminatedString));
                }
                b'\\' => self.read_escape(&mut buffer)?,
                other => buffer.push(other),
            }
        }

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn read_escape(&mut self, buffer: &mut Vec<u8>) -> Result<(), DecodeError> {
        let escape_start = self.pos;
        let Some(byte) = self.bump() else {
            return Err(self.error(DecodeErrorKind::UnterminatedString));
        };

        match byte {
            b'n' => buffer.push(b'\n'),
            b't' => buffer.push(b'\t'),
            b'r' => buffer.push(b'\r'),
            b'a' => buffer.push(0x07),
            b'b' => buffer.push(0x08),
            b'f' => buffer.push(0x0c),
            b'v' => buffer.push(0x0b),
            b'\\' | b'"' | b'\'' => buffer.push(byte),
            b'\n' | b'\r' => {
                // An escaped line break, `\r\n` and `\n\r` count as one.
                if matches!(self.peek(), Some(next) if (next == b'\n' || next == b'\r') && next != byte)
                {
                    self.pos += 1;
                }
                buffer.push(b'\n');
            }
            b'z' => {
                while self.peek().is_some_and(|next| next.is_ascii_whitespace()) {
                    self.pos += 1;
                }
            }
            b'x' => {
                let high = self.bump().and_then(hex_value);
                let low = self.bump().and_then(hex_value);
                match (high, low) {
                    (Some(high), Some(low)) => buffer.push(high * 16 + low),
                    _ => return Err(self.escape_error(escape_start)),
                }
            }
            b'0'..=b'9' => {
                let mut code = u32::from(byte - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(digit @ b'0'..=b'9') => {
                            code = code * 10 + u32::from(digit - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                let code = u8::try_from(code).map_err(|_| self.escape_error(escape_start))?;
                buffer.push(code);
            }
            b'u' => {
                if self.bump() != Some(b'{') {
                    return Err(self.escape_error(escape_start));
                }
                let mut code: u32 = 0;
                let mut digits = 0;
                while let Some(digit) = self.peek().and_then(hex_value) {
                    code = code.saturating_mul(16).saturating_add(u32::from(digit));
                    digits += 1;
                    self.pos += 1;
                }
                if digits == 0 || self.bump() != Some(b'}') {
                    return Err(self.escape_error(escape_start));
                }
                let ch = char::from_u32(code).ok_or_else(|| self.escape_error(escape_start))?;
                let mut encoded = [0_u8; 4];
                buffer.extend_from_slice(ch.encode_utf8(&mut encoded).as_bytes());
            }
            _ => return Err(self.escape_error(escape_start)),
        }

        Ok(())
    }

    fn escape_error(&mut self, escape_start: usize) -> DecodeError {
        let end = self.pos.min(self.bytes.len());
        let sequence = String::from_utf8_lossy(&self.bytes[escape_start..end]).into_owned();
        self.pos = escape_start.saturating_sub(1);
        self.error(DecodeErrorKind::InvalidEscape(sequence))
    }

    /// Level of a long bracket opening at the cursor (`[[` is 0, `[=[` is 1).
    fn long_bracket_level(&self) -> Option<usize> {
        if self.peek() != Some(b'[') {
            return None;
        }
        let mut level = 0;
        while self.peek_at(1 + level) == Some(b'=') {
            level += 1;
        }
        (self.peek_at(1 + level) == Some(b'[')).then_some(level)
    }

    fn read_long_bracket(
        &mut self,
        level: usize,
        unterminated: DecodeErrorKind,
    ) -> Result<String, DecodeError> {
        self.pos += level + 2;

        // A line break directly after the opening bracket is not part of the string.
        match (self.peek(), self.peek_at(1)) {
            (Some(b'\r'), Some(b'\n')) | (Some(b'\n'), Some(b'\r')) => self.pos += 2,
            (Some(b'\n' | b'\r'), _) => self.pos += 1,
            _ => {}
        }

        let mut closing = Vec::with_capacity(level + 2);
        closing.push(b']');
        closing.extend(std::iter::repeat(b'=').take(level));
        closing.push(b']');

        let content_start = self.pos;
        let found = self.bytes[content_start..]
            .windows(closing.len())
            .position(|window| window == closing.as_slice());

        match found {
            Some(offset) => {
                let content = self.text[content_start..content_start + offset].to_owned();
                self.pos = content_start + offset + closing.len();
                Ok(content)
            }
            None => {
                self.pos = self.bytes.len();
                Err(self.error(unterminated))
            }
        }
    }

    fn read_ident(&mut self) -> &'a str {
        let text = self.text;
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        &text[start..self.pos]
    }
}

fn table_key(value: LuaValue) -> Option<TableKey> {
    match value {
        LuaValue::Integer(key) => Some(TableKey::Int(key)),
        LuaValue::Float(key) if key.is_nan() => None,
        LuaValue::Float(key)
            if key.fract() == 0.0 && key >= i64::MIN as f64 && key < i64::MAX as f64 =>
        {
            Some(TableKey::Int(key as i64))
        }
        LuaValue::Float(key) => Some(TableKey::Str(format_float(key))),
        LuaValue::String(key) => Some(TableKey::Str(key)),
        LuaValue::Boolean(key) => Some(TableKey::Str(key.to_string())),
        LuaValue::Nil | LuaValue::Sequence(_) | LuaValue::Mapping(_) => None,
    }
}

fn build_table(positional: Vec<LuaValue>, keyed: Vec<(TableKey, LuaValue)>) -> LuaValue {
    let mut entries: BTreeMap<TableKey, LuaValue> = BTreeMap::new();

    for (key, value) in keyed {
        if value.is_nil() {
            entries.remove(&key);
        } else {
            entries.insert(key, value);
        }
    }
    // Positional items win over explicit `[n] =` keys, as in stock Lua.
    for (index, value) in positional.into_iter().enumerate() {
        entries.insert(TableKey::Int(index as i64 + 1), value);
    }
    // Trailing nils add no length. Inner holes stay so dense
    // `dependencies_data` keeps its positions.
    while entries.last_key_value().is_some_and(|(_, value)| value.is_nil()) {
        entries.pop_last();
    }

    let is_sequence = entries
        .keys()
        .enumerate()
        .all(|(index, key)| *key == TableKey::Int(index as i64 + 1));

    if is_sequence {
        return LuaValue::Sequence(entries.into_values().collect());
    }

    let mapping: LuaMap = entries
        .into_iter()
        .filter(|(_, value)| !value.is_nil())
        .map(|(key, value)| match key {
            TableKey::Int(key) => (key.to_string(), value),
            TableKey::Str(key) => (key, value),
        })
        .collect();

    LuaValue::Mapping(mapping)
}

fn starts_number(byte: u8, next: Option<u8>) -> bool {
    byte.is_ascii_digit() || (byte == b'.' && next.is_some_and(|next| next.is_ascii_digit()))
}

const fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

const fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: &[(&str, LuaValue)]) -> LuaValue {
        LuaValue::Mapping(
            entries
                .iter()
                .map(|(key, value)| ((*key).to_owned(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn decodes_success_envelope() {
        let value = decode(r#"return {success=true,result={file_id=5,user_name="Bob"}}"#)
            .expect("valid literal");

        assert_eq!(
            value,
            mapping(&[
                ("success", LuaValue::Boolean(true)),
                (
                    "result",
                    mapping(&[
                        ("file_id", LuaValue::Integer(5)),
                        ("user_name", LuaValue::from("Bob")),
                    ])
                ),
            ])
        );
    }

    #[test]
    fn empty_table_is_a_sequence() {
        assert_eq!(decode("{}").expect("valid"), LuaValue::Sequence(Vec::new()));
        assert_eq!(decode("return {}").expect("valid"), LuaValue::Sequence(Vec::new()));
        assert_eq!(decode("").expect("valid"), LuaValue::Sequence(Vec::new()));
        assert_eq!(decode("  \n ").expect("valid"), LuaValue::Sequence(Vec::new()));
    }

    #[test]
    fn positional_and_dense_integer_keys_form_sequences() {
        let positional = decode(r#"{"a", "b", 3}"#).expect("valid");
        assert_eq!(
            positional,
            LuaValue::Sequence(vec![
                LuaValue::from("a"),
                LuaValue::from("b"),
                LuaValue::Integer(3)
            ])
        );

        let explicit = decode(r#"{[2]="b", [1]="a"}"#).expect("valid");
        assert_eq!(
            explicit,
            LuaValue::Sequence(vec![LuaValue::from("a"), LuaValue::from("b")])
        );
    }

    #[test]
    fn sparse_integer_keys_form_a_mapping() {
        let value = decode(r#"{[1488]={path="Main.lua"},[12]={path="Icon.pic"}}"#).expect("valid");
        let entries = value.as_mapping().expect("mapping");

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries.get("1488").and_then(|dep| dep.get("path")),
            Some(&LuaValue::from("Main.lua"))
        );
        assert!(entries.contains_key("12"));
    }

    #[test]
    fn nil_fields_are_dropped_from_mappings() {
        let value = decode("{a=1,b=nil}").expect("valid");
        assert_eq!(value, mapping(&[("a", LuaValue::Integer(1))]));
    }

    #[test]
    fn trailing_positional_nils_do_not_extend_a_sequence() {
        assert_eq!(decode("{nil}").expect("valid"), LuaValue::Sequence(Vec::new()));
        assert_eq!(
            decode("{1,nil}").expect("valid"),
            LuaValue::Sequence(vec![LuaValue::Integer(1)])
        );
        assert_eq!(
            decode("{1,nil,3,nil,nil}").expect("valid"),
            LuaValue::Sequence(vec![
                LuaValue::Integer(1),
                LuaValue::Nil,
                LuaValue::Integer(3),
            ])
        );
    }

    #[test]
    fn decodes_numbers() {
        let value = decode("{1, -2, 3.5, 1e3, 0x1F, - 4, .5}").expect("valid");
        assert_eq!(
            value,
            LuaValue::Sequence(vec![
                LuaValue::Integer(1),
                LuaValue::Integer(-2),
                LuaValue::Float(3.5),
                LuaValue::Float(1000.0),
                LuaValue::Integer(31),
                LuaValue::Integer(-4),
                LuaValue::Float(0.5),
            ])
        );
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        let value = decode("99999999999999999999").expect("valid");
        assert!(matches!(value, LuaValue::Float(_)));
    }

    #[test]
    fn decodes_string_escapes() {
        let value = decode(r#"{"line\nbreak", 'it\'s', "\65\066", "\x41", "\u{44F}", "a\z
              b"}"#)
        .expect("valid");

        assert_eq!(
            value,
            LuaValue::Sequence(vec![
                LuaValue::from("line\nbreak"),
                LuaValue::from("it's"),
                LuaValue::from("AB"),
                LuaValue::from("A"),
                LuaValue::from("я"),
                LuaValue::from("ab"),
            ])
        );
    }

    #[test]
    fn decodes_long_strings_and_comments() {
        let text = "-- header\nreturn { --[[ block\ncomment ]] text = [==[\nfirst ]] line]==], n = 1 } ;";
        let value = decode(text).expect("valid");

        assert_eq!(
            value,
            mapping(&[
                ("n", LuaValue::Integer(1)),
                ("text", LuaValue::from("first ]] line")),
            ])
        );
    }

    #[test]
    fn accepts_semicolon_separators_and_trailing_separator() {
        let value = decode("{a=1; b=2,}").expect("valid");
        assert_eq!(
            value,
            mapping(&[("a", LuaValue::Integer(1)), ("b", LuaValue::Integer(2))])
        );
    }

    #[test]
    fn keeps_multibyte_text() {
        let value = decode(r#"{name="Привет"}"#).expect("valid");
        assert_eq!(value.get("name"), Some(&LuaValue::from("Привет")));
    }

    #[test]
    fn rejects_unterminated_table() {
        let err = decode("{success=true").expect_err("must fail");
        assert_eq!(err.kind(), &DecodeErrorKind::UnexpectedEof);
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = decode("{\"abc}").expect_err("must fail");
        assert_eq!(err.kind(), &DecodeErrorKind::UnterminatedString);
    }

    #[test]
    fn rejects_html_error_pages() {
        let err = decode("<html><body>502</body></html>").expect_err("must fail");
        assert_eq!(err.kind(), &DecodeErrorKind::UnexpectedChar('<'));
        assert_eq!((err.line(), err.column()), (1, 1));
    }

    #[test]
    fn rejects_unknown_identifiers() {
        let err = decode("{a=undefined}").expect_err("must fail");
        assert_eq!(
            err.kind(),
            &DecodeErrorKind::UnknownIdentifier(String::from("undefined"))
        );
    }

    #[test]
    fn rejects_trailing_input() {
        let err = decode("{} {}").expect_err("must fail");
        assert_eq!(err.kind(), &DecodeErrorKind::TrailingInput);
    }

    #[test]
    fn rejects_nil_keys() {
        let err = decode("{[nil]=1}").expect_err("must fail");
        assert_eq!(err.kind(), &DecodeErrorKind::InvalidKey);
    }

    #[test]
    fn reports_line_and_column() {
        let err = decode("{\n  a = 1,\n  b = @\n}").expect_err("must fail");
        assert_eq!(err.kind(), &DecodeErrorKind::UnexpectedChar('@'));
        assert_eq!((err.line(), err.column()), (3, 7));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let text = format!("{}{}", "{".repeat(MAX_DEPTH + 1), "}".repeat(MAX_DEPTH + 1));
        let err = decode(&text).expect_err("must fail");
        assert_eq!(err.kind(), &DecodeErrorKind::TooDeep(MAX_DEPTH));
    }
}
