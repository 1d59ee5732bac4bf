//! Forward-only byte cursor used by the object header and tree parsers.

/// A read position over a borrowed byte slice.
///
/// Every method either consumes bytes and returns them, or leaves the
/// position untouched and returns `None`.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Consume up to (not including) the next `delim`, then skip the delimiter.
    pub fn take_until(&mut self, delim: u8) -> Option<&'a [u8]> {
        let rest = self.remaining();
        let idx = rest.iter().position(|&b| b == delim)?;
        self.pos += idx + 1;
        Some(&rest[..idx])
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let rest = self.remaining();
        if rest.len() < n {
            return None;
        }
        self.pos += n;
        Some(&rest[..n])
    }

    /// Consume everything that is left.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = self.remaining();
        self.pos = self.buf.len();
        rest
    }
}
