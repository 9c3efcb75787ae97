//! Streaming decoding of a sequence of JSON values.
//!
//! [`StreamDecoder`] reads whitespace-separated top-level values one at a
//! time, and can also walk a document token by token. The two can be mixed:
//! after reading `[` as a token, each element can be decoded whole.
//!
//! ```rust
//! use jsonptr_error::{JsonDecoder, Token, stream::StreamDecoder};
//!
//! let mut stream = StreamDecoder::new(&br#"[{"n": 1}, {"n": 2}]"#[..]);
//! assert_eq!(stream.next_token().unwrap(), Some(Token::BeginArray));
//! let mut total = 0;
//! while stream.more() {
//!     let item: std::collections::HashMap<String, u32> = stream.decode().unwrap().unwrap();
//!     total += item["n"];
//! }
//! assert_eq!(stream.next_token().unwrap(), Some(Token::EndArray));
//! assert_eq!(total, 3);
//! ```

use std::{fmt, io};

use serde::de::DeserializeOwned;

use crate::{
    DecoderOptions, JsonDecoder,
    de::Deserializer,
    error::{Error, SyntaxError},
};

type Result<T> = std::result::Result<T, Error>;

/// Where the token stream is inside the current container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenState {
    TopValue,
    ArrayStart,
    ArrayValue,
    ArrayComma,
    ObjectStart,
    ObjectKey,
    ObjectColon,
    ObjectValue,
    ObjectComma,
}

/// One structural element of a JSON document.
///
/// Commas and colons are consumed by [`JsonDecoder::next_token`] without
/// being reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A number, as written.
    Number(Number),
    /// A string value or object key, unescaped.
    String(String),
}

/// A JSON number kept as its literal text.
///
/// Decoding into `Number` never loses precision. It is also what untyped
/// targets receive when [`DecoderOptions::use_number`] is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// The literal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value as an `f64`, if it parses as one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    /// The value as an `i64`, if it is an integer in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// The value as a `u64`, if it is a non-negative integer in range.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes as the narrowest of `u64`, `i64` and `f64` that holds the
/// value. Integers outside the `i64`/`u64` range go through `f64` and lose
/// precision; use [`Number::as_str`] to keep the exact text.
impl serde::Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if let Some(n) = self.as_u64() {
            serializer.serialize_u64(n)
        } else if let Some(n) = self.as_i64() {
            serializer.serialize_i64(n)
        } else {
            serializer.serialize_f64(self.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl<'de> serde::Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct NumberVisitor;

        impl serde::de::Visitor<'_> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Number, E> {
                Ok(Number(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Number, E> {
                Ok(Number(v.to_string()))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> std::result::Result<Number, E> {
                Ok(Number(v.to_string()))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Number, E> {
                if is_number_literal(v) {
                    Ok(Number(v.to_owned()))
                } else {
                    Err(E::invalid_value(serde::de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// Whether `s` matches the JSON number grammar.
fn is_number_literal(s: &str) -> bool {
    let mut de = Deserializer::new(s.as_bytes());
    if de.parse_number_text().is_err() {
        return false;
    }
    de.end().is_ok()
}

/// Decodes a stream of JSON values from an [`io::Read`] source.
///
/// Offsets in errors count bytes from the first byte the source produced.
/// A type mismatch is reported as [`Error::UnmarshalType`]; wrap the source
/// in a [`Decoder`](crate::Decoder) to get a JSON Pointer instead.
pub struct StreamDecoder<R> {
    de: Deserializer<R>,
    token_state: TokenState,
    token_stack: Vec<TokenState>,
    /// An error hit by [`JsonDecoder::more`], returned by every later call.
    pending: Option<Error>,
}

impl<R: io::Read> StreamDecoder<R> {
    /// Creates a decoder with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    /// Creates a decoder with the given options.
    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            de: Deserializer::with_options(reader, options),
            token_state: TokenState::TopValue,
            token_stack: Vec::new(),
            pending: None,
        }
    }

    /// The underlying source.
    pub fn get_ref(&self) -> &R {
        self.de.read.get_ref()
    }

    /// The underlying source, mutably. Reading from it directly desynchronizes
    /// the decoder.
    pub fn get_mut(&mut self) -> &mut R {
        self.de.read.get_mut()
    }

    /// Like [`JsonDecoder::more`], but reports a failed read instead of
    /// hiding it. The error is also kept for the next call.
    pub(crate) fn try_more(&mut self) -> Result<bool> {
        self.check_pending()?;
        match self.de.parse_whitespace() {
            Ok(next) => Ok(matches!(next, Some(c) if c != b']' && c != b'}')),
            Err(error) => {
                self.pending = Some(error.clone());
                Err(error)
            }
        }
    }

    fn check_pending(&self) -> Result<()> {
        match &self.pending {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn eof(&self) -> Error {
        self.de.syntax_here(SyntaxError::UnexpectedEof)
    }

    fn token_error(&self, c: u8) -> Error {
        self.de.syntax_here(SyntaxError::UnexpectedToken(c))
    }

    /// Consumes a pending `,` or `:` so a value can be decoded whole.
    fn prepare_for_decode(&mut self) -> Result<()> {
        let (separator, next) = match self.token_state {
            TokenState::ArrayComma => (b',', TokenState::ArrayValue),
            TokenState::ObjectColon => (b':', TokenState::ObjectValue),
            _ => return Ok(()),
        };
        match self.de.parse_whitespace()? {
            Some(c) if c == separator => {
                self.de.read.discard();
                self.token_state = next;
                Ok(())
            }
            Some(c) => Err(self.token_error(c)),
            None => Err(self.eof()),
        }
    }

    fn value_allowed(&self) -> bool {
        matches!(
            self.token_state,
            TokenState::TopValue
                | TokenState::ArrayStart
                | TokenState::ArrayValue
                | TokenState::ObjectValue
        )
    }

    fn value_end(&mut self) {
        match self.token_state {
            TokenState::ArrayStart | TokenState::ArrayValue => {
                self.token_state = TokenState::ArrayComma;
            }
            TokenState::ObjectValue => self.token_state = TokenState::ObjectComma,
            _ => {}
        }
    }

    fn push_container(&mut self, state: TokenState) {
        self.de.read.discard();
        self.token_stack.push(self.token_state);
        self.token_state = state;
    }

    fn pop_container(&mut self) {
        self.de.read.discard();
        self.token_state = self.token_stack.pop().unwrap_or(TokenState::TopValue);
        self.value_end();
    }

    /// Reads a scalar token whose first byte is `c`.
    fn scalar_token(&mut self, c: u8) -> Result<Token> {
        let token = match c {
            b'n' => {
                self.de.read.discard();
                self.de.parse_ident(b"ull")?;
                Token::Null
            }
            b't' => {
                self.de.read.discard();
                self.de.parse_ident(b"rue")?;
                Token::Bool(true)
            }
            b'f' => {
                self.de.read.discard();
                self.de.parse_ident(b"alse")?;
                Token::Bool(false)
            }
            b'"' => {
                self.de.read.discard();
                Token::String(self.de.parse_string()?.to_owned())
            }
            b'-' | b'0'..=b'9' => Token::Number(Number(self.de.parse_number_text()?.to_owned())),
            other => return Err(self.de.syntax_here(SyntaxError::ExpectedValue(other))),
        };
        Ok(token)
    }
}

impl<R: io::Read> JsonDecoder for StreamDecoder<R> {
    fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        self.check_pending()?;
        self.prepare_for_decode()?;
        if !self.value_allowed() {
            return Err(self.de.syntax_here(SyntaxError::NotAtValueStart));
        }
        if self.de.parse_whitespace()?.is_none() {
            return if self.token_stack.is_empty() {
                Ok(None)
            } else {
                Err(self.eof())
            };
        }
        let value = T::deserialize(&mut self.de)?;
        self.value_end();
        Ok(Some(value))
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.check_pending()?;
        loop {
            let Some(c) = self.de.parse_whitespace()? else {
                return if self.token_stack.is_empty() && self.token_state == TokenState::TopValue {
                    Ok(None)
                } else {
                    Err(self.eof())
                };
            };
            match c {
                b'[' if self.value_allowed() => {
                    self.push_container(TokenState::ArrayStart);
                    return Ok(Some(Token::BeginArray));
                }
                b'{' if self.value_allowed() => {
                    self.push_container(TokenState::ObjectStart);
                    return Ok(Some(Token::BeginObject));
                }
                b']' if matches!(
                    self.token_state,
                    TokenState::ArrayStart | TokenState::ArrayComma
                ) =>
                {
                    self.pop_container();
                    return Ok(Some(Token::EndArray));
                }
                b'}' if matches!(
                    self.token_state,
                    TokenState::ObjectStart | TokenState::ObjectComma
                ) =>
                {
                    self.pop_container();
                    return Ok(Some(Token::EndObject));
                }
                b':' if self.token_state == TokenState::ObjectColon => {
                    self.de.read.discard();
                    self.token_state = TokenState::ObjectValue;
                }
                b',' if self.token_state == TokenState::ArrayComma => {
                    self.de.read.discard();
                    self.token_state = TokenState::ArrayValue;
                }
                b',' if self.token_state == TokenState::ObjectComma => {
                    self.de.read.discard();
                    self.token_state = TokenState::ObjectKey;
                }
                b'"' if matches!(
                    self.token_state,
                    TokenState::ObjectStart | TokenState::ObjectKey
                ) =>
                {
                    self.de.read.discard();
                    let key = self.de.parse_string()?.to_owned();
                    self.token_state = TokenState::ObjectColon;
                    return Ok(Some(Token::String(key)));
                }
                b'[' | b'{' | b']' | b'}' | b':' | b',' => return Err(self.token_error(c)),
                _ if self.value_allowed() => {
                    let token = self.scalar_token(c)?;
                    self.value_end();
                    return Ok(Some(token));
                }
                _ => return Err(self.token_error(c)),
            }
        }
    }

    fn more(&mut self) -> bool {
        self.try_more().unwrap_or(false)
    }

    fn use_number(&mut self) {
        self.de.options.use_number = true;
    }

    fn disallow_unknown_fields(&mut self) {
        self.de.options.disallow_unknown_fields = true;
    }

    fn input_offset(&self) -> u64 {
        self.de.position() as u64
    }

    fn buffered(&self) -> &[u8] {
        self.de.read.buffered()
    }
}
