//! The primary JSON decoder: a serde [`Deserializer`] over a byte stream.
//!
//! This decoder knows *where* in the stream a value starts but not *what
//! path* leads to it. A type mismatch is reported as
//! [`Error::UnmarshalType`] carrying the absolute byte offset of the
//! offending value; turning that offset into a pointer is the job of
//! [`pointer_at_offset`](crate::pointer_at_offset).
//!
//! Most callers want [`Decoder`](crate::Decoder) or
//! [`from_slice`](crate::from_slice) instead.

use std::io;

use serde::de::{self, DeserializeOwned, Unexpected, Visitor, value::StrDeserializer};

use crate::{
    DecoderOptions,
    error::{Error, SyntaxError},
    read::ByteReader,
};

type Result<T> = std::result::Result<T, Error>;

/// A number as it appears in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ParsedNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Deserializes JSON values one at a time from an [`io::Read`] source.
pub struct Deserializer<R> {
    pub(crate) read: ByteReader<R>,
    scratch: Vec<u8>,
    remaining_depth: usize,
    pub(crate) options: DecoderOptions,
}

impl<R: io::Read> Deserializer<R> {
    /// Creates a deserializer with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    /// Creates a deserializer with the given options.
    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            read: ByteReader::with_chunk_size(reader, options.read_buffer_size),
            scratch: Vec::new(),
            remaining_depth: options.max_depth,
            options,
        }
    }

    /// Checks that only whitespace remains in the input.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::TrailingCharacters`] if anything else follows, or an
    /// I/O error from the source.
    pub fn end(&mut self) -> Result<()> {
        match self.parse_whitespace()? {
            None => Ok(()),
            Some(b) => Err(self.syntax_here(SyntaxError::TrailingCharacters(b))),
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.read.position()
    }

    pub(crate) fn syntax_here(&self, code: SyntaxError) -> Error {
        Error::syntax(code, self.read.position())
    }

    fn eof(&self) -> Error {
        self.syntax_here(SyntaxError::UnexpectedEof)
    }

    /// Skips whitespace and returns the next byte without consuming it.
    pub(crate) fn parse_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            match self.read.peek()? {
                Some(b' ' | b'\n' | b'\t' | b'\r') => self.read.discard(),
                other => return Ok(other),
            }
        }
    }

    fn next_or_eof(&mut self) -> Result<u8> {
        match self.read.next_byte()? {
            Some(b) => Ok(b),
            None => Err(self.eof()),
        }
    }

    /// Skips whitespace up to the first byte of a value and returns its
    /// offset along with the byte.
    fn begin_value(&mut self) -> Result<(usize, u8)> {
        match self.parse_whitespace()? {
            Some(b) => Ok((self.read.position(), b)),
            None => Err(self.eof()),
        }
    }

    /// Consumes the rest of `true`, `false` or `null` after its first byte.
    pub(crate) fn parse_ident(&mut self, rest: &[u8]) -> Result<()> {
        for expected in rest {
            match self.read.peek()? {
                Some(b) if b == *expected => self.read.discard(),
                Some(b) => return Err(self.syntax_here(SyntaxError::InvalidLiteral(b))),
                None => return Err(self.eof()),
            }
        }
        Ok(())
    }

    fn parse_object_colon(&mut self) -> Result<()> {
        match self.parse_whitespace()? {
            Some(b':') => {
                self.read.discard();
                Ok(())
            }
            Some(b) => Err(self.syntax_here(SyntaxError::ExpectedColon(b))),
            None => Err(self.eof()),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.remaining_depth == 0 {
            return Err(self.syntax_here(SyntaxError::RecursionLimitExceeded));
        }
        self.remaining_depth -= 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.remaining_depth += 1;
    }

    // --------------------------------------------------------------------------------------------
    // Numbers
    // --------------------------------------------------------------------------------------------

    /// Copies the digits of the next byte run into `scratch`.
    fn scan_digits(&mut self) -> Result<usize> {
        let mut count = 0;
        while let Some(b @ b'0'..=b'9') = self.read.peek()? {
            self.read.discard();
            self.scratch.push(b);
            count += 1;
        }
        Ok(count)
    }

    fn expect_digits(&mut self) -> Result<()> {
        if self.scan_digits()? == 0 {
            return Err(match self.read.peek()? {
                Some(b) => self.syntax_here(SyntaxError::InvalidNumber(b)),
                None => self.eof(),
            });
        }
        Ok(())
    }

    /// Scans a number lexeme into `scratch`. The first byte has been peeked
    /// but not consumed. Returns whether the number is an integer.
    fn scan_number(&mut self) -> Result<bool> {
        self.scratch.clear();
        if self.read.peek()? == Some(b'-') {
            self.read.discard();
            self.scratch.push(b'-');
        }
        match self.read.peek()? {
            Some(b'0') => {
                self.read.discard();
                self.scratch.push(b'0');
            }
            Some(b'1'..=b'9') => {
                self.scan_digits()?;
            }
            Some(b) => return Err(self.syntax_here(SyntaxError::InvalidNumber(b))),
            None => return Err(self.eof()),
        }

        let mut integer = true;
        if self.read.peek()? == Some(b'.') {
            self.read.discard();
            self.scratch.push(b'.');
            self.expect_digits()?;
            integer = false;
        }
        if let Some(e @ (b'e' | b'E')) = self.read.peek()? {
            self.read.discard();
            self.scratch.push(e);
            if let Some(sign @ (b'+' | b'-')) = self.read.peek()? {
                self.read.discard();
                self.scratch.push(sign);
            }
            self.expect_digits()?;
            integer = false;
        }
        Ok(integer)
    }

    /// The lexeme left in `scratch` by [`scan_number`](Self::scan_number).
    pub(crate) fn number_text(&self) -> &str {
        // Only ASCII digits, signs, `.`, `e` and `E` are ever pushed.
        std::str::from_utf8(&self.scratch).unwrap_or_default()
    }

    pub(crate) fn parse_number(&mut self) -> Result<ParsedNumber> {
        let integer = self.scan_number()?;
        let text = self.number_text();
        if integer {
            let parsed = if text.starts_with('-') {
                text.parse().ok().map(ParsedNumber::Signed)
            } else {
                text.parse().ok().map(ParsedNumber::Unsigned)
            };
            if let Some(number) = parsed {
                return Ok(number);
            }
        }
        // The grammar above only admits lexemes `f64::from_str` accepts;
        // out-of-range magnitudes become infinities.
        Ok(ParsedNumber::Float(text.parse().unwrap_or(f64::NAN)))
    }

    /// Scans the next number, leaving its lexeme in `scratch`.
    pub(crate) fn parse_number_text(&mut self) -> Result<&str> {
        self.scan_number()?;
        Ok(self.number_text())
    }

    /// Visits a number target. Numbers are always visited numerically here,
    /// whatever `use_number` says; anything else goes through
    /// `deserialize_any` so the type error names what was found.
    fn deserialize_number<'de, V: Visitor<'de>>(&mut self, visitor: V) -> Result<V::Value> {
        let (start, peek) = self.begin_value()?;
        if !matches!(peek, b'-' | b'0'..=b'9') {
            return de::Deserializer::deserialize_any(self, visitor);
        }
        let value = match self.parse_number()? {
            ParsedNumber::Unsigned(n) => visitor.visit_u64(n),
            ParsedNumber::Signed(n) => visitor.visit_i64(n),
            ParsedNumber::Float(n) => visitor.visit_f64(n),
        };
        value.map_err(|e: Error| e.at_value(start))
    }

    // --------------------------------------------------------------------------------------------
    // Strings
    // --------------------------------------------------------------------------------------------

    /// Parses a string body; the opening quote has been consumed.
    pub(crate) fn parse_string(&mut self) -> Result<&str> {
        self.scratch.clear();
        loop {
            match self.next_or_eof()? {
                b'"' => break,
                b'\\' => self.parse_escape()?,
                b if b < 0x20 => {
                    return Err(Error::syntax(
                        SyntaxError::ControlCharacterInString(b),
                        self.read.position() - 1,
                    ));
                }
                b => self.scratch.push(b),
            }
        }
        match std::str::from_utf8(&self.scratch) {
            Ok(s) => Ok(s),
            Err(_) => Err(self.syntax_here(SyntaxError::InvalidUtf8)),
        }
    }

    fn parse_escape(&mut self) -> Result<()> {
        let escape = self.next_or_eof()?;
        self.push_escape(escape)
    }

    fn push_escape(&mut self, escape: u8) -> Result<()> {
        let byte = match escape {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => return self.parse_unicode_escape(),
            other => {
                return Err(Error::syntax(
                    SyntaxError::InvalidEscape(other),
                    self.read.position() - 1,
                ));
            }
        };
        self.scratch.push(byte);
        Ok(())
    }

    fn decode_hex4(&mut self) -> Result<u16> {
        let mut unit = 0u16;
        for _ in 0..4 {
            let b = self.next_or_eof()?;
            let Some(digit) = char::from(b).to_digit(16) else {
                return Err(Error::syntax(
                    SyntaxError::InvalidUnicodeEscape(b),
                    self.read.position() - 1,
                ));
            };
            #[allow(clippy::cast_possible_truncation)]
            let digit = digit as u16;
            unit = (unit << 4) | digit;
        }
        Ok(unit)
    }

    fn push_char(&mut self, c: char) {
        self.scratch
            .extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
    }

    /// Decodes `\uXXXX`, joining surrogate pairs. A surrogate that is not
    /// part of a valid pair decodes to U+FFFD.
    fn parse_unicode_escape(&mut self) -> Result<()> {
        let mut unit = self.decode_hex4()?;
        loop {
            match unit {
                0xD800..=0xDBFF => {
                    if self.read.peek()? != Some(b'\\') {
                        self.push_char(char::REPLACEMENT_CHARACTER);
                        return Ok(());
                    }
                    self.read.discard();
                    let escape = self.next_or_eof()?;
                    if escape != b'u' {
                        self.push_char(char::REPLACEMENT_CHARACTER);
                        return self.push_escape(escape);
                    }
                    let low = self.decode_hex4()?;
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let c = 0x10000 + ((u32::from(unit) - 0xD800) << 10)
                            + (u32::from(low) - 0xDC00);
                        self.push_char(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER));
                        return Ok(());
                    }
                    self.push_char(char::REPLACEMENT_CHARACTER);
                    unit = low;
                }
                0xDC00..=0xDFFF => {
                    self.push_char(char::REPLACEMENT_CHARACTER);
                    return Ok(());
                }
                _ => {
                    let c = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
                    self.push_char(c);
                    return Ok(());
                }
            }
        }
    }

    // --------------------------------------------------------------------------------------------
    // Containers
    // --------------------------------------------------------------------------------------------

    /// Visits an array whose `[` has been consumed.
    fn visit_array<'de, V: Visitor<'de>>(&mut self, visitor: V) -> Result<V::Value> {
        self.enter()?;
        let value = visitor.visit_seq(SeqAccess {
            de: &mut *self,
            first: true,
        });
        self.leave();
        let value = value?;
        match self.parse_whitespace()? {
            Some(b']') => {
                self.read.discard();
                Ok(value)
            }
            Some(_) => Err(de::Error::custom("invalid length: array has too many elements")),
            None => Err(self.eof()),
        }
    }

    /// Visits an object whose `{` has been consumed.
    fn visit_object<'de, V: Visitor<'de>>(
        &mut self,
        visitor: V,
        fields: Option<&'static [&'static str]>,
    ) -> Result<V::Value> {
        self.enter()?;
        let value = visitor.visit_map(MapAccess {
            de: &mut *self,
            first: true,
            fields,
        });
        self.leave();
        let value = value?;
        self.end_object()?;
        Ok(value)
    }

    fn end_object(&mut self) -> Result<()> {
        match self.parse_whitespace()? {
            Some(b'}') => {
                self.read.discard();
                Ok(())
            }
            Some(_) => Err(de::Error::custom("invalid length: object has too many members")),
            None => Err(self.eof()),
        }
    }
}

/// What a value looks like from its first byte, for type errors raised
/// before the value is read.
fn unexpected_from_first_byte(b: u8) -> Unexpected<'static> {
    match b {
        b'n' => Unexpected::Unit,
        b't' => Unexpected::Bool(true),
        b'f' => Unexpected::Bool(false),
        b'"' => Unexpected::Other("string"),
        b'[' => Unexpected::Seq,
        b'{' => Unexpected::Map,
        _ => Unexpected::Other("number"),
    }
}

macro_rules! deserialize_number {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                self.deserialize_number(visitor)
            }
        )*
    };
}

impl<'de, R: io::Read> de::Deserializer<'de> for &mut Deserializer<R> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let (start, peek) = self.begin_value()?;
        let value = match peek {
            b'n' => {
                self.read.discard();
                self.parse_ident(b"ull")?;
                visitor.visit_unit()
            }
            b't' => {
                self.read.discard();
                self.parse_ident(b"rue")?;
                visitor.visit_bool(true)
            }
            b'f' => {
                self.read.discard();
                self.parse_ident(b"alse")?;
                visitor.visit_bool(false)
            }
            b'-' | b'0'..=b'9' if self.options.use_number => {
                visitor.visit_str(self.parse_number_text()?)
            }
            b'-' | b'0'..=b'9' => match self.parse_number()? {
                ParsedNumber::Unsigned(n) => visitor.visit_u64(n),
                ParsedNumber::Signed(n) => visitor.visit_i64(n),
                ParsedNumber::Float(n) => visitor.visit_f64(n),
            },
            b'"' => {
                self.read.discard();
                visitor.visit_str(self.parse_string()?)
            }
            b'[' => {
                self.read.discard();
                self.visit_array(visitor)
            }
            b'{' => {
                self.read.discard();
                self.visit_object(visitor, None)
            }
            other => return Err(Error::syntax(SyntaxError::ExpectedValue(other), start)),
        };
        value.map_err(|e| e.at_value(start))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let (start, peek) = self.begin_value()?;
        if peek == b'n' {
            self.read.discard();
            self.parse_ident(b"ull")?;
            visitor.visit_none().map_err(|e: Error| e.at_value(start))
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let (start, peek) = self.begin_value()?;
        if peek != b'{' {
            return self.deserialize_any(visitor);
        }
        self.read.discard();
        let fields = self.options.disallow_unknown_fields.then_some(fields);
        self.visit_object(visitor, fields)
            .map_err(|e| e.at_value(start))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let (start, peek) = self.begin_value()?;
        let value = match peek {
            b'"' => {
                self.read.discard();
                let variant = self.parse_string()?;
                visitor.visit_enum(StrDeserializer::<Error>::new(variant))
            }
            b'{' => {
                self.read.discard();
                self.enter()?;
                let value = visitor.visit_enum(VariantAccess { de: &mut *self });
                self.leave();
                value.and_then(|value| self.end_object().map(|()| value))
            }
            other => Err(de::Error::invalid_type(
                unexpected_from_first_byte(other),
                &visitor,
            )),
        };
        value.map_err(|e| e.at_value(start))
    }

    deserialize_number! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64
    }

    serde::forward_to_deserialize_any! {
        bool char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
        ignored_any
    }
}

struct SeqAccess<'a, R> {
    de: &'a mut Deserializer<R>,
    first: bool,
}

impl<'de, R: io::Read> de::SeqAccess<'de> for SeqAccess<'_, R> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        let peek = match self.de.parse_whitespace()? {
            Some(b']') => return Ok(None),
            Some(b',') if !self.first => {
                self.de.read.discard();
                self.de.parse_whitespace()?
            }
            Some(b) if !self.first => {
                return Err(self.de.syntax_here(SyntaxError::ExpectedArrayCommaOrEnd(b)));
            }
            other => other,
        };
        self.first = false;
        match peek {
            Some(b']') => Err(self.de.syntax_here(SyntaxError::ExpectedValue(b']'))),
            Some(_) => seed.deserialize(&mut *self.de).map(Some),
            None => Err(self.de.eof()),
        }
    }
}

struct MapAccess<'a, R> {
    de: &'a mut Deserializer<R>,
    first: bool,
    /// Declared struct fields, when unknown members are rejected.
    fields: Option<&'static [&'static str]>,
}

impl<'de, R: io::Read> de::MapAccess<'de> for MapAccess<'_, R> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let peek = match self.de.parse_whitespace()? {
            Some(b'}') => return Ok(None),
            Some(b',') if !self.first => {
                self.de.read.discard();
                self.de.parse_whitespace()?
            }
            Some(b) if !self.first => {
                return Err(self.de.syntax_here(SyntaxError::ExpectedObjectCommaOrEnd(b)));
            }
            other => other,
        };
        self.first = false;
        match peek {
            Some(b'"') => {
                let start = self.de.read.position();
                self.de.read.discard();
                let key = self.de.parse_string()?;
                if let Some(fields) = self.fields {
                    if !fields.contains(&key) {
                        return Err(Error::Data {
                            msg: format!("unknown field \"{key}\""),
                            offset: Some(start),
                        });
                    }
                }
                seed.deserialize(MapKey { key })
                    .map(Some)
                    .map_err(|e| e.at_value(start))
            }
            Some(b) => Err(self.de.syntax_here(SyntaxError::KeyMustBeString(b))),
            None => Err(self.de.eof()),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        self.de.parse_object_colon()?;
        seed.deserialize(&mut *self.de)
    }
}

/// Deserializes an already-decoded object key.
///
/// Integer targets parse the key text, so `{"1": ...}` fills a
/// `HashMap<u32, _>`.
struct MapKey<'a> {
    key: &'a str,
}

macro_rules! deserialize_integer_key {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                match self.key.parse() {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => visitor.visit_str(self.key),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKey<'_> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_str(self.key)
    }

    deserialize_integer_key! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(StrDeserializer::<Error>::new(self.key))
    }

    serde::forward_to_deserialize_any! {
        bool f32 f64 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// `{"Variant": value}` enum representation.
struct VariantAccess<'a, R> {
    de: &'a mut Deserializer<R>,
}

impl<'de, R: io::Read> de::EnumAccess<'de> for VariantAccess<'_, R> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.de.parse_whitespace()? {
            Some(b'"') => self.de.read.discard(),
            Some(b) => return Err(self.de.syntax_here(SyntaxError::KeyMustBeString(b))),
            None => return Err(self.de.eof()),
        }
        let variant = self.de.parse_string()?;
        let value = seed.deserialize(StrDeserializer::<Error>::new(variant))?;
        self.de.parse_object_colon()?;
        Ok((value, self))
    }
}

impl<'de, R: io::Read> de::VariantAccess<'de> for VariantAccess<'_, R> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        de::Deserialize::deserialize(self.de)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(self.de, "", fields, visitor)
    }
}

/// Decodes a complete string literal, quotes included.
///
/// This is the routine the decoder itself uses for keys and string values,
/// so a key decoded here is exactly the key the decoder saw.
pub(crate) fn decode_str(lexeme: &[u8]) -> Result<String> {
    let options = DecoderOptions {
        read_buffer_size: lexeme.len(),
        ..DecoderOptions::default()
    };
    let mut de = Deserializer::with_options(lexeme, options);
    match de.read.next_byte()? {
        Some(b'"') => {}
        Some(b) => return Err(Error::syntax(SyntaxError::ExpectedValue(b), 0)),
        None => return Err(de.eof()),
    }
    Ok(de.parse_string()?.to_owned())
}

/// Deserializes one value from `reader`; only whitespace may follow it.
///
/// Type mismatches are reported as [`Error::UnmarshalType`] with a byte
/// offset.
///
/// # Errors
///
/// Any I/O, syntax or data error.
pub fn from_reader<R: io::Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    let mut de = Deserializer::new(reader);
    let value = T::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Deserializes one value from `bytes`; only whitespace may follow it.
///
/// Type mismatches are reported as [`Error::UnmarshalType`] with a byte
/// offset.
///
/// # Errors
///
/// Any syntax or data error.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let options = DecoderOptions {
        read_buffer_size: bytes.len(),
        ..DecoderOptions::default()
    };
    let mut de = Deserializer::with_options(bytes, options);
    let value = T::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}
