//! The pointer-reporting streaming decoder.

use std::io;

use serde::de::DeserializeOwned;

use crate::{
    DecoderOptions, Error, PointerError, Token, pointer_at_offset, stream::StreamDecoder,
    tee::TeeReader,
};

type Result<T> = std::result::Result<T, Error>;

/// The operations shared by [`StreamDecoder`] and [`Decoder`].
///
/// `Decoder` wraps a `StreamDecoder` and offers exactly the same set of
/// operations, so code written against this trait works with either.
pub trait JsonDecoder {
    /// Decodes the next value in the stream.
    ///
    /// Returns `Ok(None)` once the stream holds nothing but whitespace.
    ///
    /// # Errors
    ///
    /// Any I/O, syntax or data error. Inside a container reached through
    /// [`next_token`](Self::next_token), decoding where a key is expected
    /// fails with [`SyntaxError::NotAtValueStart`](crate::SyntaxError::NotAtValueStart).
    fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>>;

    /// Reads the next structural token. Commas and colons are consumed
    /// silently.
    ///
    /// Returns `Ok(None)` at the end of the stream when no container is open.
    ///
    /// # Errors
    ///
    /// Any I/O or syntax error, including a token that is not allowed where
    /// it appears.
    fn next_token(&mut self) -> Result<Option<Token>>;

    /// Whether another element or member follows in the current array or
    /// object, or another value in the stream.
    ///
    /// A read error makes this return `false`; the next
    /// [`decode`](Self::decode) or [`next_token`](Self::next_token) returns
    /// the error without reading again.
    fn more(&mut self) -> bool;

    /// Untyped targets receive numbers as their literal text from now on.
    fn use_number(&mut self);

    /// Struct targets reject members they do not declare from now on.
    fn disallow_unknown_fields(&mut self);

    /// Number of bytes of the stream consumed so far.
    fn input_offset(&self) -> u64;

    /// Bytes read from the source but not consumed yet.
    fn buffered(&self) -> &[u8];
}

enum State<R> {
    Active(StreamDecoder<TeeReader<R>>),
    Failed {
        error: Error,
        /// Input offset at the moment of failure.
        consumed: u64,
    },
}

/// A streaming JSON decoder whose type errors carry a JSON Pointer.
///
/// `Decoder` keeps a copy of every byte it reads. When a value does not fit
/// the requested type it replays that copy to find the value's location and
/// reports [`Error::Pointer`] instead of a bare offset:
///
/// ```rust
/// use jsonptr_error::{Decoder, JsonDecoder};
///
/// #[derive(Debug, serde::Deserialize)]
/// struct Entry {
///     key: String,
///     value: bool,
/// }
///
/// let mut decoder = Decoder::new(&br#"{"key": "x", "value": 5}"#[..]);
/// let err = decoder.decode::<Entry>().unwrap_err();
/// assert_eq!(err.pointer().unwrap().to_string(), "/value");
/// assert_eq!(err.to_string(), "/value: cannot convert integer `5` into a boolean");
/// ```
///
/// The first error of any kind is final. The decoder drops its source and
/// its copy of the input, and every later fallible call returns the same
/// error without reading anything.
///
/// Every operation takes `&mut self`; sharing a decoder across threads
/// needs external locking.
pub struct Decoder<R> {
    state: State<R>,
}

impl<R: io::Read> Decoder<R> {
    /// Creates a decoder with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    /// Creates a decoder with the given options.
    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            state: State::Active(StreamDecoder::with_options(TeeReader::new(reader), options)),
        }
    }

    /// The underlying source, or `None` once the decoder has failed.
    pub fn get_ref(&self) -> Option<&R> {
        match &self.state {
            State::Active(stream) => Some(stream.get_ref().get_ref()),
            State::Failed { .. } => None,
        }
    }

    /// The error that ended decoding, if any.
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            State::Active(_) => None,
            State::Failed { error, .. } => Some(error),
        }
    }

    /// Forwards `op` to the inner decoder and handles the transition to the
    /// failed state.
    fn forward<T>(
        &mut self,
        op: impl FnOnce(&mut StreamDecoder<TeeReader<R>>) -> Result<T>,
    ) -> Result<T> {
        let stream = match &mut self.state {
            State::Active(stream) => stream,
            State::Failed { error, .. } => return Err(error.clone()),
        };
        match op(&mut *stream) {
            Ok(value) => Ok(value),
            Err(error) => {
                let consumed = stream.input_offset();
                let error = locate(error, stream.get_ref().captured());
                log::debug!(
                    "decoder failed after {consumed} bytes ({:?}): {error}",
                    error.classify()
                );
                self.state = State::Failed {
                    error: error.clone(),
                    consumed,
                };
                Err(error)
            }
        }
    }
}

/// Replaces a type error with one that carries the pointer to the offending
/// value in `document`. Every other error is returned unchanged.
pub(crate) fn locate(error: Error, document: &[u8]) -> Error {
    match error {
        Error::UnmarshalType(source) => {
            let pointer = pointer_at_offset(document, source.offset());
            Error::Pointer(PointerError { source, pointer })
        }
        other => other,
    }
}

impl<R: io::Read> JsonDecoder for Decoder<R> {
    fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        self.forward(|stream| stream.decode())
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.forward(|stream| stream.next_token())
    }

    fn more(&mut self) -> bool {
        self.forward(|stream| stream.try_more()).unwrap_or(false)
    }

    fn use_number(&mut self) {
        if let State::Active(stream) = &mut self.state {
            stream.use_number();
        }
    }

    fn disallow_unknown_fields(&mut self) {
        if let State::Active(stream) = &mut self.state {
            stream.disallow_unknown_fields();
        }
    }

    fn input_offset(&self) -> u64 {
        match &self.state {
            State::Active(stream) => stream.input_offset(),
            State::Failed { consumed, .. } => *consumed,
        }
    }

    fn buffered(&self) -> &[u8] {
        match &self.state {
            State::Active(stream) => stream.buffered(),
            State::Failed { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::HashMap, io::Read as _, rc::Rc};

    use super::*;
    use crate::{SyntaxError, pointer};

    /// Counts the reads issued to the wrapped source.
    struct Counting<'a> {
        data: &'a [u8],
        reads: Rc<Cell<usize>>,
    }

    impl io::Read for Counting<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.set(self.reads.get() + 1);
            self.data.read(buf)
        }
    }

    #[test]
    fn type_error_gets_a_pointer() {
        let mut decoder = Decoder::new(&br#"{"/":[1]}"#[..]);
        let err = decoder.decode::<HashMap<String, Vec<String>>>().unwrap_err();
        assert_eq!(err.pointer(), Some(&pointer!["/", 0]));
        insta::assert_snapshot!(err, @r#"/~1/0: cannot convert integer `1` into a string"#);
    }

    #[test]
    fn failed_state_is_sticky() {
        let reads = Rc::new(Cell::new(0));
        let source = Counting {
            data: b"[1,true,1] [2]",
            reads: Rc::clone(&reads),
        };
        let options = DecoderOptions {
            read_buffer_size: 2,
            ..DecoderOptions::default()
        };
        let mut decoder = Decoder::with_options(source, options);
        let first = decoder.decode::<Vec<i32>>().unwrap_err();
        assert_eq!(first.pointer(), Some(&pointer![1]));
        let reads_at_failure = reads.get();

        for _ in 0..3 {
            let again = decoder.decode::<Vec<i32>>().unwrap_err();
            assert_eq!(again.to_string(), first.to_string());
            assert_eq!(again.pointer(), first.pointer());
            assert!(decoder.next_token().is_err());
        }
        assert_eq!(reads.get(), reads_at_failure);
        assert!(!decoder.more());
        assert!(decoder.buffered().is_empty());
        assert!(decoder.get_ref().is_none());
        assert_eq!(decoder.input_offset(), 7);
        assert_eq!(decoder.error().map(Error::to_string), Some(first.to_string()));
    }

    #[test]
    fn other_errors_pass_through() {
        let mut decoder = Decoder::new(&b"[1, 2"[..]);
        let err = decoder.decode::<Vec<u8>>().unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                code: SyntaxError::UnexpectedEof,
                offset: 5
            }
        ));
        assert!(err.pointer().is_none());
        assert!(matches!(decoder.decode::<Vec<u8>>(), Err(Error::Syntax { .. })));
    }

    #[test]
    fn io_errors_pass_through() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        let mut decoder = Decoder::new(Broken);
        let err = decoder.decode::<u8>().unwrap_err();
        let Error::Io(inner) = &err else {
            panic!("{err:?}");
        };
        assert_eq!(inner.kind(), io::ErrorKind::ConnectionReset);
        assert!(matches!(decoder.next_token(), Err(Error::Io(_))));
    }

    /// Yields `first`, fails once, then yields `rest`.
    struct Flaky {
        first: &'static [u8],
        rest: &'static [u8],
        reads: Rc<Cell<usize>>,
    }

    impl io::Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.set(self.reads.get() + 1);
            match self.reads.get() {
                1 => self.first.read(buf),
                2 => Err(io::Error::new(io::ErrorKind::ConnectionAborted, "aborted")),
                _ => self.rest.read(buf),
            }
        }
    }

    #[test]
    fn read_error_in_more_fails_the_decoder() {
        let reads = Rc::new(Cell::new(0));
        let mut decoder = Decoder::new(Flaky {
            first: b"true ",
            rest: b"true",
            reads: Rc::clone(&reads),
        });
        assert_eq!(decoder.decode::<bool>().unwrap(), Some(true));
        assert!(!decoder.more());
        assert!(matches!(decoder.error(), Some(Error::Io(_))));
        assert!(matches!(decoder.decode::<bool>(), Err(Error::Io(_))));
        assert!(matches!(decoder.next_token(), Err(Error::Io(_))));
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn success_keeps_decoding() {
        let mut decoder = Decoder::new(&b"true false"[..]);
        assert_eq!(decoder.decode::<bool>().unwrap(), Some(true));
        assert!(decoder.more());
        assert_eq!(decoder.decode::<bool>().unwrap(), Some(false));
        assert_eq!(decoder.decode::<bool>().unwrap(), None);
        assert!(decoder.get_ref().is_some());
        assert!(decoder.error().is_none());
    }

    #[test]
    fn toggles_are_ignored_once_failed() {
        let mut decoder = Decoder::new(&b"\"a\""[..]);
        assert!(decoder.decode::<bool>().unwrap_err().pointer().unwrap().is_empty());
        decoder.use_number();
        decoder.disallow_unknown_fields();
        assert!(decoder.decode::<bool>().is_err());
    }

    #[test]
    fn locate_leaves_located_errors_alone() {
        let err = Error::syntax(SyntaxError::UnexpectedEof, 3);
        assert!(matches!(locate(err, b"[1,"), Error::Syntax { offset: 3, .. }));
    }
}
