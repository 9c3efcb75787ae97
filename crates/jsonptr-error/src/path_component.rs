use std::{fmt, sync::Arc};

/// A decoded object key.
pub type Key = Arc<str>;
/// A zero-based array position.
pub type Index = usize;

/// One step of a [`JsonPointer`](crate::JsonPointer).
///
/// A pointer is a sequence of keys or indices (for objects and arrays,
/// respectively) leading from the document root to a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathComponent {
    /// Selects a member of an object by its (decoded) key.
    Key(Key),
    /// Selects an element of an array by zero-based position.
    Index(Index),
}

// Convenient conversions so users can write `pointer![0, "foo"]` etc.
macro_rules! impl_from_int_for_pathcomponent {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathComponent {
                fn from(i: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation)]
                    PathComponent::Index(i as Index)
                }
            }
        )*
    };
}

impl_from_int_for_pathcomponent!(u8, u16, u32, u64, usize);

impl From<&str> for PathComponent {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<String> for PathComponent {
    fn from(s: String) -> Self {
        Self::Key(s.into())
    }
}

#[doc(hidden)]
pub trait PathComponentFrom<T> {
    fn from_path_component(value: T) -> PathComponent;
}

macro_rules! impl_integer_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathComponentFrom<$t> for PathComponent {
                fn from_path_component(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(value as Index)
                }
            }
        )+
    };
}
impl_integer_as_path_component!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathComponentFrom<&str> for PathComponent {
    fn from_path_component(value: &str) -> Self {
        PathComponent::Key(value.into())
    }
}

impl PathComponentFrom<String> for PathComponent {
    fn from_path_component(value: String) -> Self {
        PathComponent::Key(value.into())
    }
}

/// Writes one reference token: `/` followed by the escaped key or the index.
impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        match self {
            PathComponent::Key(key) => {
                let mut rest: &str = key;
                while let Some(at) = rest.find(['~', '/']) {
                    f.write_str(&rest[..at])?;
                    f.write_str(if rest.as_bytes()[at] == b'~' { "~0" } else { "~1" })?;
                    rest = &rest[at + 1..];
                }
                f.write_str(rest)
            }
            PathComponent::Index(index) => write!(f, "{index}"),
        }
    }
}

impl PathComponent {
    #[must_use]
    /// Returns the index if this component is an index, otherwise `None`.
    pub fn as_index(&self) -> Option<Index> {
        if let Self::Index(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    /// Returns the key if this component is a key, otherwise `None`.
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(v) = self {
            Some(v)
        } else {
            None
        }
    }
}
