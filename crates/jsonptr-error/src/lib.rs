//! JSON decoding whose type errors say *where* the offending value is.
//!
//! A plain decoder can only report that the value at byte 1834 is not a
//! boolean. [`Decoder`] and [`from_slice`] report `/items/3/enabled` instead:
//! a JSON Pointer (RFC 6901) to the value, computed by replaying the bytes
//! read so far.
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! let err = jsonptr_error::from_str::<Vec<HashMap<String, bool>>>(r#"[{},{"a":1}]"#)
//!     .unwrap_err();
//! assert_eq!(err.pointer().unwrap().to_string(), "/1/a");
//! ```
//!
//! # Layers
//!
//! - [`de`] and [`stream`] decode JSON with serde and report type mismatches
//!   as [`Error::UnmarshalType`] with a byte offset.
//! - [`pointer_at_offset`] turns such an offset back into a [`JsonPointer`].
//! - [`Decoder`] ties the two together over any [`std::io::Read`] source,
//!   and stops for good at the first error.

mod decoder;
mod error;
mod options;
mod path_component;
mod pointer;
mod read;
mod resolve;
mod tee;

pub mod de;
pub mod stream;

#[cfg(test)]
mod tests;

pub use decoder::{Decoder, JsonDecoder};
pub use error::{Category, Error, PointerError, SyntaxError, UnmarshalTypeError};
pub use options::DecoderOptions;
pub use path_component::{Index, Key, PathComponent, PathComponentFrom};
pub use pointer::{JsonPointer, ParsePointerError};
pub use resolve::pointer_at_offset;
pub use stream::{Number, Token};
pub use tee::TeeReader;

use serde::de::DeserializeOwned;

/// Decodes a single value from `bytes`.
///
/// Only whitespace may follow the value. A type mismatch is reported as
/// [`Error::Pointer`], located against `bytes`.
///
/// # Errors
///
/// A syntax error, a located type error, or any other error raised by
/// `T`'s `Deserialize` implementation.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    de::from_slice(bytes).map_err(|error| decoder::locate(error, bytes))
}

/// Decodes a single value from `s`. See [`from_slice`].
///
/// # Errors
///
/// As for [`from_slice`].
pub fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, Error> {
    from_slice(s.as_bytes())
}

/// Builds a [`JsonPointer`] from a list of keys and indices.
///
/// ```rust
/// use jsonptr_error::{PathComponent, pointer};
///
/// let p = pointer![0, "foo", 2];
/// assert_eq!(
///     p.components(),
///     [
///         PathComponent::Index(0),
///         PathComponent::Key("foo".into()),
///         PathComponent::Index(2)
///     ]
/// );
/// ```
#[macro_export]
macro_rules! pointer {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathComponentFrom;
        let components: ::std::vec::Vec<$crate::PathComponent> =
            ::std::vec![$($crate::PathComponent::from_path_component($elem)),*];
        $crate::JsonPointer::from(components)
    }};
}
