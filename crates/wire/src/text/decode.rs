//! JSON text decoding into reduced trees
//!
//! Integers that fit `i64` decode as [`JsonValue::Int`], every other number
//! as [`JsonValue::Float`]. No type reconstruction is attempted: a string
//! that looks like a date stays a string.

use cells_json_core::JsonValue;
use std::collections::HashMap;
use thiserror::Error;

/// Deepest nesting accepted, matching the accelerated backend's parser.
const MAX_NESTING: usize = 127;

/// Decode error types
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Invalid JSON syntax
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Invalid number format
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Input nested deeper than the parser allows
    #[error("Nesting deeper than {0} levels")]
    TooDeep(usize),

    /// Non-whitespace input after the top-level value
    #[error("Trailing characters at offset {0}")]
    TrailingCharacters(usize),

    /// Unexpected end of input
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Unexpected character
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
}

/// Decode a JSON string to a tree
pub fn decode_json(json: &str) -> Result<JsonValue, DecodeError> {
    let mut parser = JsonParser::new(json);
    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(DecodeError::UnexpectedEnd);
    }
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < parser.input.len() {
        return Err(DecodeError::TrailingCharacters(parser.pos));
    }
    Ok(value)
}

/// Simple recursive-descent JSON parser
struct JsonParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> JsonParser<'a> {
    fn new(input: &'a str) -> Self {
        JsonParser {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek() {
            self.advance();
        }
    }

    fn parse_value(&mut self) -> Result<JsonValue, DecodeError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(DecodeError::UnexpectedEnd),
            Some('n') => self.parse_literal("null", JsonValue::Null),
            Some('t') => self.parse_literal("true", JsonValue::Bool(true)),
            Some('f') => self.parse_literal("false", JsonValue::Bool(false)),
            Some('"') => self.parse_string().map(JsonValue::String),
            Some('[') => self.nested(Self::parse_array),
            Some('{') => self.nested(Self::parse_object),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(DecodeError::UnexpectedChar(c)),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<JsonValue, DecodeError>,
    ) -> Result<JsonValue, DecodeError> {
        if self.depth >= MAX_NESTING {
            return Err(DecodeError::TooDeep(MAX_NESTING));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_literal(&mut self, literal: &str, value: JsonValue) -> Result<JsonValue, DecodeError> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(value)
        } else {
            Err(DecodeError::InvalidJson(format!("Expected '{}'", literal)))
        }
    }

    fn parse_string(&mut self) -> Result<String, DecodeError> {
        self.advance(); // consume opening quote
        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(DecodeError::UnexpectedEnd),
                Some('"') => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('b') => '\x08',
                        Some('f') => '\x0c',
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape()?);
                            continue;
                        }
                        Some(c) => {
                            return Err(DecodeError::InvalidJson(format!(
                                "Invalid escape: \\{}",
                                c
                            )))
                        }
                        None => return Err(DecodeError::UnexpectedEnd),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) if (c as u32) < 0x20 => {
                    return Err(DecodeError::InvalidJson(
                        "Control character in string".to_string(),
                    ))
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Parse the hex digits after `\u`, joining a surrogate pair when one
    /// follows.
    fn parse_unicode_escape(&mut self) -> Result<char, DecodeError> {
        let high = self.parse_hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high)
                .ok_or_else(|| DecodeError::InvalidJson("Lone low surrogate".to_string()));
        }
        if !self.input[self.pos..].starts_with("\\u") {
            return Err(DecodeError::InvalidJson("Unpaired high surrogate".to_string()));
        }
        self.pos += 2;
        let low = self.parse_hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(DecodeError::InvalidJson("Invalid low surrogate".to_string()));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code)
            .ok_or_else(|| DecodeError::InvalidJson("Invalid unicode codepoint".to_string()))
    }

    fn parse_hex4(&mut self) -> Result<u32, DecodeError> {
        let hex = self
            .input
            .get(self.pos..self.pos + 4)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| DecodeError::InvalidJson("Invalid unicode escape".to_string()))?;
        self.pos += 4;
        u32::from_str_radix(hex, 16)
            .map_err(|_| DecodeError::InvalidJson("Invalid unicode escape".to_string()))
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.pos - start
    }

    fn parse_number(&mut self) -> Result<JsonValue, DecodeError> {
        let start = self.pos;

        // Handle negative sign
        if self.peek() == Some('-') {
            self.advance();
        }

        let int_start = self.pos;
        let int_digits = self.skip_digits();
        // No leading zeros in the integer part
        let mut well_formed =
            int_digits == 1 || (int_digits > 1 && !self.input[int_start..].starts_with('0'));
        let mut is_float = false;

        // Parse decimal part
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            well_formed &= self.skip_digits() > 0;
        }

        // Parse exponent
        if let Some('e' | 'E') = self.peek() {
            is_float = true;
            self.advance();
            if let Some('+' | '-') = self.peek() {
                self.advance();
            }
            well_formed &= self.skip_digits() > 0;
        }

        let num_str = &self.input[start..self.pos];
        if !well_formed {
            return Err(DecodeError::InvalidNumber(num_str.to_string()));
        }

        if !is_float {
            // Integers outside i64 fall back to f64
            if let Ok(i) = num_str.parse::<i64>() {
                return Ok(JsonValue::Int(i));
            }
        }
        match num_str.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(JsonValue::Float(f)),
            _ => Err(DecodeError::InvalidNumber(num_str.to_string())),
        }
    }

    fn parse_array(&mut self) -> Result<JsonValue, DecodeError> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let mut arr = Vec::new();

        if self.peek() == Some(']') {
            self.advance();
            return Ok(JsonValue::Array(arr));
        }

        loop {
            arr.push(self.parse_value()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {
                    self.advance();
                    return Ok(JsonValue::Array(arr));
                }
                Some(c) => return Err(DecodeError::UnexpectedChar(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
    }

    fn parse_object(&mut self) -> Result<JsonValue, DecodeError> {
        self.advance(); // consume '{'
        self.skip_whitespace();

        let mut map = HashMap::new();

        if self.peek() == Some('}') {
            self.advance();
            return Ok(JsonValue::Object(map));
        }

        loop {
            self.skip_whitespace();

            // Parse key
            if self.peek() != Some('"') {
                return Err(DecodeError::InvalidJson("Expected string key".to_string()));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();

            // Expect colon
            if self.peek() != Some(':') {
                return Err(DecodeError::InvalidJson("Expected ':'".to_string()));
            }
            self.advance();

            // Parse value
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some('}') => {
                    self.advance();
                    return Ok(JsonValue::Object(map));
                }
                Some(c) => return Err(DecodeError::UnexpectedChar(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
    }
}
