use std::io;

/// An [`io::Read`] adapter that keeps a copy of every byte it hands out.
///
/// Bytes are appended to the capture buffer as each `read` returns, so the
/// buffer always holds exactly what the consumer has been given so far, in
/// order, starting at stream offset 0.
#[derive(Debug)]
pub struct TeeReader<R> {
    inner: R,
    captured: Vec<u8>,
}

impl<R> TeeReader<R> {
    /// Wraps `inner` with an empty capture buffer.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            captured: Vec::new(),
        }
    }

    /// Everything read through this adapter so far.
    pub fn captured(&self) -> &[u8] {
        &self.captured
    }

    /// The wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns the wrapped reader and the capture buffer.
    pub fn into_parts(self) -> (R, Vec<u8>) {
        (self.inner, self.captured)
    }
}

impl<R: io::Read> io::Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.captured.extend_from_slice(&buf[..n]);
        log::trace!("tee captured {n} bytes, {} total", self.captured.len());
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn captures_incrementally() {
        let mut tee = TeeReader::new(&b"{\"a\": 1}"[..]);
        let mut buf = [0; 3];
        assert_eq!(tee.read(&mut buf).unwrap(), 3);
        assert_eq!(tee.captured(), b"{\"a");
        let mut rest = Vec::new();
        tee.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"\": 1}");
        assert_eq!(tee.captured(), b"{\"a\": 1}");
    }

    #[test]
    fn failed_reads_capture_nothing() {
        struct Flaky(bool);
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.0 = !self.0;
                if self.0 {
                    Err(io::Error::other("flaky"))
                } else {
                    buf[0] = b'x';
                    Ok(1)
                }
            }
        }

        let mut tee = TeeReader::new(Flaky(false));
        let mut buf = [0; 4];
        assert!(tee.read(&mut buf).is_err());
        assert_eq!(tee.read(&mut buf).unwrap(), 1);
        let (_, captured) = tee.into_parts();
        assert_eq!(captured, b"x");
    }
}
