//! Fixed-capacity byte window used by the stream adapters.
//!
//! [`ByteBuffer`] replaces raw cursor/remaining-count bookkeeping with an
//! explicit bounded buffer. The input side fills it from a stream and
//! consumes from the front; the output side appends encoded bytes and
//! drains it in whole-capacity chunks. Both directions share one
//! invariant: `cursor <= len <= capacity`.

use core::fmt;

/// A fixed-capacity byte window with a read cursor and a fill length.
///
/// Bytes `cursor..len` are readable (filled but not yet consumed); bytes
/// `len..capacity` are writable. The capacity is chosen once at
/// construction and never grows.
pub struct ByteBuffer {
    data: Box<[u8]>,
    cursor: usize,
    len: usize,
}

impl ByteBuffer {
    /// Create a zeroed buffer of the given fixed capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            cursor: 0,
            len: 0,
        }
    }

    /// The fixed capacity.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Discard all contents: cursor and length back to zero.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.len = 0;
    }

    /// Filled bytes not yet consumed.
    pub fn readable(&self) -> &[u8] {
        &self.data[self.cursor..self.len]
    }

    /// Number of filled bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.len - self.cursor
    }

    /// Mark `n` readable bytes as consumed.
    ///
    /// # Panics
    ///
    /// If `n` exceeds [`remaining()`](ByteBuffer::remaining).
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.remaining(), "consumed past the fill length");
        self.cursor += n;
    }

    /// Unfilled space at the end of the buffer.
    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.data[self.len..]
    }

    /// Number of unfilled bytes.
    pub fn free(&self) -> usize {
        self.capacity() - self.len
    }

    /// Mark `n` writable bytes as filled.
    ///
    /// # Panics
    ///
    /// If `n` exceeds [`free()`](ByteBuffer::free).
    pub fn commit(&mut self, n: usize) {
        assert!(n <= self.free(), "committed past the capacity");
        self.len += n;
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .field("len", &self.len)
            .finish()
    }
}
