//! Pull side: feeds the decode engine from a readable byte stream.

use std::io::{self, ErrorKind, Read};

use crate::buffer::ByteBuffer;
use crate::marker;

/// Input buffer capacity in bytes.
///
/// Deliberately small — the decode engine consumes at byte granularity and
/// refills are cheap relative to entropy decoding.
pub const INPUT_BUFFER_CAPACITY: usize = 8192;

/// The decode engine's input callback table.
///
/// [`initialize`](Source::initialize), [`fill`](Source::fill),
/// [`skip`](Source::skip) and [`terminate`](Source::terminate) are the four
/// operations of the engine's source manager; [`buffered`](Source::buffered)
/// and [`consume`](Source::consume) replace its raw next-byte pointer and
/// remaining-count pair.
pub trait Source {
    /// Reset the buffered-byte count to zero. Called once when a decode
    /// session begins; idempotent.
    fn initialize(&mut self);

    /// Refill the buffer, discarding any unconsumed bytes, and return the
    /// number of bytes now buffered. Never returns zero: an exhausted
    /// source buffers the terminator marker instead.
    fn fill(&mut self) -> usize;

    /// Discard `n` bytes starting at the current read position — buffered
    /// bytes first, then directly from the underlying stream.
    fn skip(&mut self, n: u64);

    /// End the session. The source holds nothing beyond its buffer, so
    /// this releases nothing, but the engine calls it symmetrically with
    /// [`initialize`](Source::initialize).
    fn terminate(&mut self);

    /// Buffered bytes not yet consumed.
    fn buffered(&self) -> &[u8];

    /// Mark `n` buffered bytes as consumed.
    fn consume(&mut self, n: usize);

    /// Next byte, refilling as needed.
    ///
    /// The fill contract guarantees this never runs dry: once the stream is
    /// exhausted the source replays the terminator marker on every refill.
    fn next_byte(&mut self) -> u8 {
        if self.buffered().is_empty() {
            self.fill();
        }
        let byte = self.buffered()[0];
        self.consume(1);
        byte
    }
}

/// Pulls bytes from a caller-supplied readable stream on demand from the
/// decode engine.
///
/// Bytes are read one at a time so the source never consumes stream bytes
/// past a terminator marker — trailing data after a complete image is left
/// in the stream. Callers with unbuffered streams should wrap them in
/// [`std::io::BufReader`].
///
/// Once the stream has produced its last byte, or a terminator marker has
/// been seen, the source is exhausted: every subsequent fill buffers the
/// synthetic terminator and the underlying stream is never touched again,
/// so the engine always observes a well-formed end of image.
#[derive(Debug)]
pub struct InputStreamSource<R: Read> {
    reader: R,
    buf: ByteBuffer,
    exhausted: bool,
}

impl<R: Read> InputStreamSource<R> {
    /// Wrap a readable stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            // Two bytes of slack past the fill bound: a marker-escape pair
            // read at the bound lands there.
            buf: ByteBuffer::with_capacity(INPUT_BUFFER_CAPACITY + 2),
            exhausted: false,
        }
    }

    /// Whether the underlying stream has produced its last byte or a
    /// terminator marker has been seen.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Unwrap the underlying stream, discarding buffered bytes.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// One byte from the stream, or `None` at physical end.
    ///
    /// Interrupted reads are retried; any other read error is folded into
    /// exhaustion, matching the stream-end handling of the fill contract.
    fn read_one(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => return Some(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("treating read error as end of stream: {e}");
                    return None;
                }
            }
        }
    }

    fn fill_once(&mut self) -> usize {
        self.buf.clear();

        if self.exhausted {
            self.buf.writable()[..2].copy_from_slice(&marker::TERMINATOR);
            self.buf.commit(2);
            return 2;
        }

        let mut n = 0;
        while n < INPUT_BUFFER_CAPACITY {
            let Some(byte) = self.read_one() else {
                self.exhausted = true;
                break;
            };
            self.buf.writable()[0] = byte;
            self.buf.commit(1);
            n += 1;

            if byte == marker::INTRODUCER {
                // Marker-escape lead byte: the following byte belongs with
                // it, whatever it is.
                let Some(code) = self.read_one() else {
                    self.exhausted = true;
                    break;
                };
                self.buf.writable()[0] = code;
                self.buf.commit(1);
                n += 1;

                if code == marker::EOI {
                    // A complete image. Stop here so trailing bytes after
                    // it are never consumed from the stream.
                    self.exhausted = true;
                    break;
                }
            }
        }
        n
    }
}

impl<R: Read> Source for InputStreamSource<R> {
    fn initialize(&mut self) {
        self.buf.clear();
    }

    fn fill(&mut self) -> usize {
        loop {
            let n = self.fill_once();
            if n > 0 {
                return n;
            }
            // A zero-byte fill marked the source exhausted; the retry
            // buffers the synthetic terminator.
        }
    }

    fn skip(&mut self, n: u64) {
        let buffered = self.buf.remaining() as u64;
        if n > buffered {
            let excess = n - buffered;
            self.buf.clear();
            if !self.exhausted {
                match io::copy(&mut (&mut self.reader).take(excess), &mut io::sink()) {
                    Ok(copied) if copied < excess => self.exhausted = true,
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("treating read error during skip as end of stream: {e}");
                        self.exhausted = true;
                    }
                }
            }
        } else {
            self.buf.consume(n as usize);
        }
    }

    fn terminate(&mut self) {}

    fn buffered(&self) -> &[u8] {
        self.buf.readable()
    }

    fn consume(&mut self, n: usize) {
        self.buf.consume(n);
    }
}
