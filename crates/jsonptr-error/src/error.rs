use std::{fmt, io, sync::Arc};

use thiserror::Error;

use crate::JsonPointer;

/// Errors produced while decoding.
///
/// Every variant is cheap to clone: a failed [`Decoder`](crate::Decoder)
/// hands the same error back on every later call.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Reading from the underlying source failed.
    #[error("i/o error: {0}")]
    Io(#[source] Arc<io::Error>),

    /// The input is not well-formed JSON.
    #[error("{code} at offset {offset}")]
    Syntax {
        /// What went wrong.
        code: SyntaxError,
        /// Absolute byte offset where the problem was detected.
        offset: usize,
    },

    /// A value cannot be converted into the requested type.
    ///
    /// Only the low-level [`de`](crate::de) and [`stream`](crate::stream)
    /// APIs return this variant. [`Decoder`](crate::Decoder),
    /// [`from_slice`](crate::from_slice) and [`from_str`](crate::from_str)
    /// replace it with [`Error::Pointer`].
    #[error(transparent)]
    UnmarshalType(#[from] UnmarshalTypeError),

    /// A type mismatch located with a JSON Pointer.
    #[error(transparent)]
    Pointer(#[from] PointerError),

    /// Any other error raised by the target's `Deserialize` implementation
    /// (missing or unknown fields, wrong length, unknown variant, ...).
    #[error("{msg}")]
    Data {
        /// The message produced by the implementation.
        msg: String,
        /// Offset of the value being decoded when the error was raised.
        offset: Option<usize>,
    },
}

/// The broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// [`Error::Io`].
    Io,
    /// [`Error::Syntax`].
    Syntax,
    /// The input was well-formed but did not fit the target type.
    Data,
}

impl Error {
    pub(crate) fn syntax(code: SyntaxError, offset: usize) -> Self {
        Error::Syntax { code, offset }
    }

    /// Classifies the error.
    #[must_use]
    pub fn classify(&self) -> Category {
        match self {
            Error::Io(_) => Category::Io,
            Error::Syntax { .. } => Category::Syntax,
            Error::UnmarshalType(_) | Error::Pointer(_) | Error::Data { .. } => Category::Data,
        }
    }

    /// The byte offset the error refers to, if any.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Io(_) => None,
            Error::Syntax { offset, .. } => Some(*offset),
            Error::UnmarshalType(e) => Some(e.offset()),
            Error::Pointer(e) => Some(e.source.offset()),
            Error::Data { offset, .. } => *offset,
        }
    }

    /// The location of the offending value, for located type errors.
    #[must_use]
    pub fn pointer(&self) -> Option<&JsonPointer> {
        match self {
            Error::Pointer(e) => Some(&e.pointer),
            _ => None,
        }
    }

    /// Gives the error the offset of the value being decoded, unless it
    /// already carries one from a more deeply nested value.
    pub(crate) fn at_value(mut self, start: usize) -> Self {
        match &mut self {
            Error::UnmarshalType(e) if e.offset.is_none() => e.offset = Some(start),
            Error::Data { offset, .. } if offset.is_none() => *offset = Some(start),
            _ => {}
        }
        self
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(Arc::new(error))
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Data {
            msg: msg.to_string(),
            offset: None,
        }
    }

    fn invalid_type(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        UnmarshalTypeError::new(unexp, exp).into()
    }

    fn invalid_value(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        UnmarshalTypeError::new(unexp, exp).into()
    }
}

/// Malformed input, detected by the decoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The input ended in the middle of a value.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A byte that cannot start a value.
    #[error("invalid character {} looking for beginning of value", Byte(*.0))]
    ExpectedValue(u8),
    /// An object member name must be a string.
    #[error("invalid character {} looking for beginning of object key string", Byte(*.0))]
    KeyMustBeString(u8),
    /// Missing `:` after an object key.
    #[error("invalid character {} after object key", Byte(*.0))]
    ExpectedColon(u8),
    /// Missing `,` or `]` after an array element.
    #[error("invalid character {} after array element", Byte(*.0))]
    ExpectedArrayCommaOrEnd(u8),
    /// Missing `,` or `}` after an object member.
    #[error("invalid character {} after object key:value pair", Byte(*.0))]
    ExpectedObjectCommaOrEnd(u8),
    /// A misspelled `true`, `false` or `null`.
    #[error("invalid character {} in literal", Byte(*.0))]
    InvalidLiteral(u8),
    /// A malformed number.
    #[error("invalid character {} in numeric literal", Byte(*.0))]
    InvalidNumber(u8),
    /// An unknown `\` escape.
    #[error("invalid character {} in string escape code", Byte(*.0))]
    InvalidEscape(u8),
    /// A `\u` escape without four hex digits.
    #[error("invalid character {} in \\u hexadecimal character escape", Byte(*.0))]
    InvalidUnicodeEscape(u8),
    /// A raw control character inside a string.
    #[error("invalid character {} in string literal", Byte(*.0))]
    ControlCharacterInString(u8),
    /// A string is not valid UTF-8.
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    /// Nesting deeper than the configured limit.
    #[error("exceeded max depth")]
    RecursionLimitExceeded,
    /// Non-whitespace after the single value of a one-shot decode.
    #[error("invalid character {} after top-level value", Byte(*.0))]
    TrailingCharacters(u8),
    /// A token that the streaming token state does not allow here.
    #[error("unexpected {} in token stream", Byte(*.0))]
    UnexpectedToken(u8),
    /// A value was requested where the token stream expects a key, `:` or
    /// `,`.
    #[error("not at beginning of value")]
    NotAtValueStart,
}

/// Renders a byte the way it reads in a message: `'x'`, or escaped.
struct Byte(u8);

impl fmt::Display for Byte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii() {
            write!(f, "'{}'", char::from(self.0).escape_default())
        } else {
            write!(f, "'\\x{:02x}'", self.0)
        }
    }
}

/// A JSON value that does not fit the requested Rust type.
///
/// `value` describes what the document contains (``integer `5` ``,
/// ``string "a"``, `sequence`, ...), `expected` what the target accepts
/// (`a boolean`, `struct Config`, ...). Both come from serde.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot convert {value} into {expected}")]
pub struct UnmarshalTypeError {
    /// Description of the JSON value.
    pub value: String,
    /// Description of the target type.
    pub expected: String,
    pub(crate) offset: Option<usize>,
}

impl UnmarshalTypeError {
    fn new(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        let value = match unexp {
            serde::de::Unexpected::Unit => "null".to_owned(),
            other => other.to_string(),
        };
        Self {
            value,
            expected: exp.to_string(),
            offset: None,
        }
    }

    /// Absolute byte offset of the first byte of the offending value.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset.unwrap_or_default()
    }
}

/// An [`UnmarshalTypeError`] together with the pointer to the value.
///
/// ```rust
/// let err = jsonptr_error::from_str::<Vec<i32>>("[1,true,1]").unwrap_err();
/// assert_eq!(err.pointer().unwrap().to_string(), "/1");
/// assert_eq!(
///     err.to_string(),
///     "/1: cannot convert boolean `true` into i32"
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub struct PointerError {
    /// The error reported by the decoder.
    pub source: UnmarshalTypeError,
    /// Where the offending value is.
    pub pointer: JsonPointer,
}

impl fmt::Display for PointerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: cannot convert {} into {}",
            self.pointer, self.source.value, self.source.expected
        )
    }
}

impl PointerError {
    /// The pointer in its RFC 6901 text form.
    #[must_use]
    pub fn rendered_pointer(&self) -> String {
        self.pointer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde::de::{Error as _, Unexpected};

    use super::*;
    use crate::pointer;

    #[test]
    fn invalid_type_becomes_unmarshal_type_error() {
        let err = Error::invalid_type(Unexpected::Unsigned(5), &"a boolean").at_value(20);
        let Error::UnmarshalType(e) = &err else {
            panic!("unexpected {err:?}");
        };
        assert_eq!(e.value, "integer `5`");
        assert_eq!(e.expected, "a boolean");
        assert_eq!(err.offset(), Some(20));
        assert_eq!(err.classify(), Category::Data);
    }

    #[test]
    fn inner_offset_wins() {
        let err = Error::custom("missing field `a`").at_value(7).at_value(0);
        assert_eq!(err.offset(), Some(7));
    }

    #[test]
    fn pointer_error_display() {
        let err = PointerError {
            source: UnmarshalTypeError {
                value: "integer `5`".into(),
                expected: "a boolean".into(),
                offset: Some(22),
            },
            pointer: pointer!["value"],
        };
        insta::assert_snapshot!(err, @"/value: cannot convert integer `5` into a boolean");
        assert_eq!(err.rendered_pointer(), "/value");
    }

    #[test]
    fn syntax_error_display() {
        let err = Error::syntax(SyntaxError::ExpectedColon(b'x'), 4);
        insta::assert_snapshot!(err, @"invalid character 'x' after object key at offset 4");
        let err = Error::syntax(SyntaxError::InvalidLiteral(b'\n'), 2);
        insta::assert_snapshot!(err, @r"invalid character '\n' in literal at offset 2");
    }

    #[test]
    fn io_error_is_shared_on_clone() {
        let err = Error::from(io::Error::other("boom"));
        let again = err.clone();
        assert_eq!(err.to_string(), again.to_string());
        assert_eq!(again.classify(), Category::Io);
        assert_eq!(again.offset(), None);
    }
}
