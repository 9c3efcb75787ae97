//! JSON Pointer (RFC 6901) values.
//!
//! A [`JsonPointer`] is the structural location of a value inside a JSON
//! document: the keys and indices that lead from the root to it. The empty
//! pointer denotes the root itself.

use std::{fmt, ops::Deref, str::FromStr};

use thiserror::Error;

use crate::{Index, Key, PathComponent};

/// A JSON Pointer, stored as its decoded components.
///
/// The textual form produced by [`Display`](fmt::Display) is the RFC 6901
/// encoding: each component is prefixed by `/`, and inside keys `~` is
/// written as `~0` and `/` as `~1`.
///
/// ```rust
/// use jsonptr_error::pointer;
///
/// assert_eq!(pointer!["a", 0].to_string(), "/a/0");
/// assert_eq!(pointer!["a/b~c"].to_string(), "/a~1b~0c");
/// assert_eq!(pointer![].to_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer(Vec<PathComponent>);

impl JsonPointer {
    /// The pointer to the document root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Appends an object key step.
    pub fn push_key(&mut self, key: impl Into<Key>) {
        self.0.push(PathComponent::Key(key.into()));
    }

    /// Appends an array index step.
    pub fn push_index(&mut self, index: Index) {
        self.0.push(PathComponent::Index(index));
    }

    /// Returns the components, root first.
    #[must_use]
    pub fn components(&self) -> &[PathComponent] {
        &self.0
    }

    /// Consumes the pointer, returning its components.
    #[must_use]
    pub fn into_components(self) -> Vec<PathComponent> {
        self.0
    }
}

impl Deref for JsonPointer {
    type Target = [PathComponent];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PathComponent>> for JsonPointer {
    fn from(components: Vec<PathComponent>) -> Self {
        Self(components)
    }
}

impl FromIterator<PathComponent> for JsonPointer {
    fn from_iter<T: IntoIterator<Item = PathComponent>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a JsonPointer {
    type Item = &'a PathComponent;
    type IntoIter = std::slice::Iter<'a, PathComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .iter()
            .try_for_each(|component| fmt::Display::fmt(component, f))
    }
}

/// Error returned when parsing the textual form of a pointer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParsePointerError {
    /// A non-empty pointer must start with `/`.
    #[error("JSON pointer must be empty or start with '/'")]
    MissingLeadingSlash,
    /// `~` must be followed by `0` or `1`.
    #[error("invalid escape '~' at byte {0} of JSON pointer")]
    InvalidEscape(usize),
}

/// Parses the RFC 6901 text form.
///
/// The text form does not say whether a segment addresses an object or an
/// array. A segment that is a canonical array index (`0`, or digits without
/// a leading zero) parses as [`PathComponent::Index`]; every other segment
/// parses as [`PathComponent::Key`].
impl FromStr for JsonPointer {
    type Err = ParsePointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let Some(body) = s.strip_prefix('/') else {
            return Err(ParsePointerError::MissingLeadingSlash);
        };

        let mut pointer = Self::root();
        let mut start = 1;
        for segment in body.split('/') {
            pointer.0.push(parse_segment(segment, start)?);
            start += segment.len() + 1;
        }
        Ok(pointer)
    }
}

fn parse_segment(segment: &str, start: usize) -> Result<PathComponent, ParsePointerError> {
    if is_array_index(segment) {
        if let Ok(index) = segment.parse::<Index>() {
            return Ok(PathComponent::Index(index));
        }
    }

    let mut key = String::with_capacity(segment.len());
    let mut chars = segment.char_indices();
    while let Some((at, c)) = chars.next() {
        if c != '~' {
            key.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '0')) => key.push('~'),
            Some((_, '1')) => key.push('/'),
            _ => return Err(ParsePointerError::InvalidEscape(start + at)),
        }
    }
    Ok(PathComponent::Key(key.into()))
}

fn is_array_index(segment: &str) -> bool {
    match segment.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(u8::is_ascii_digit),
    }
}

/// Serialized as its RFC 6901 text.
impl serde::Serialize for JsonPointer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for JsonPointer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
