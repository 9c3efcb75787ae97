//! Chunked byte input for the decoder.
//!
//! [`ByteReader`] pulls bytes from an [`io::Read`] source one chunk at a time
//! and hands them to the lexer one byte at a time. It keeps the absolute
//! offset of the next unread byte, counted from the first byte the source
//! ever produced, so every offset the decoder reports is an index into the
//! full stream.
//!
//! The reader may hold bytes it has read from the source but not yet
//! consumed; [`ByteReader::buffered`] exposes them.

use std::io;

pub(crate) const DEFAULT_CHUNK_SIZE: usize = 4096;

pub(crate) struct ByteReader<R> {
    inner: R,
    chunk: Box<[u8]>,
    /// Next unread byte in `chunk`.
    head: usize,
    /// End of the filled part of `chunk`.
    tail: usize,
    /// Absolute offset of `chunk[0]`.
    chunk_start: usize,
    eof: bool,
}

impl<R: io::Read> ByteReader<R> {
    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk: vec![0; chunk_size.max(1)].into_boxed_slice(),
            head: 0,
            tail: 0,
            chunk_start: 0,
            eof: false,
        }
    }

    /// Returns the next byte without consuming it, or `None` at end of input.
    #[inline]
    pub fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.head == self.tail && !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.chunk[self.head]))
    }

    /// Consumes and returns the next byte.
    #[inline]
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.head += 1;
        }
        Ok(byte)
    }

    /// Consumes the byte returned by the last successful [`peek`](Self::peek).
    #[inline]
    pub fn discard(&mut self) {
        debug_assert!(self.head < self.tail, "discard without a peeked byte");
        self.head += 1;
    }

    /// Absolute offset of the next unread byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.chunk_start + self.head
    }

    /// Bytes read from the source but not consumed yet.
    pub fn buffered(&self) -> &[u8] {
        &self.chunk[self.head..self.tail]
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Refills the chunk. Returns `false` once the source is exhausted.
    fn fill(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }
        self.chunk_start += self.tail;
        self.head = 0;
        self.tail = 0;
        loop {
            match self.inner.read(&mut self.chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.tail = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    /// A source that yields at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn positions_are_absolute_across_chunks() {
        let mut reader = ByteReader::with_chunk_size(&b"abcdefg"[..], 3);
        let mut seen = Vec::new();
        while let Some(b) = reader.next_byte().unwrap() {
            seen.push((reader.position() - 1, b));
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[4], (4, b'e'));
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.peek().unwrap(), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut reader = ByteReader::with_chunk_size(Trickle { data: b"xy", step: 1 }, 8);
        assert_eq!(reader.peek().unwrap(), Some(b'x'));
        assert_eq!(reader.peek().unwrap(), Some(b'x'));
        reader.discard();
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.next_byte().unwrap(), Some(b'y'));
        assert_eq!(reader.next_byte().unwrap(), None);
    }

    #[test]
    fn buffered_is_the_unconsumed_part_of_the_chunk() {
        let mut reader = ByteReader::with_chunk_size(&b"[1, 2]"[..], 16);
        reader.next_byte().unwrap();
        assert_eq!(reader.buffered(), b"1, 2]");
    }

    #[test]
    fn errors_propagate() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("unplugged"))
            }
        }
        let mut reader = ByteReader::with_chunk_size(Broken, 4);
        assert_eq!(reader.peek().unwrap_err().to_string(), "unplugged");
    }
}
