//! Push side: drains encoded bytes to a writable byte stream.

use std::io::{self, Write};

use crate::buffer::ByteBuffer;

/// Output buffer capacity in bytes.
///
/// Deliberately large — encoded output leaves in whole-buffer chunks, so a
/// typical image flushes downstream only a handful of times.
pub const OUTPUT_BUFFER_CAPACITY: usize = 262_144;

/// The encode engine's output callback table.
///
/// [`initialize`](Sink::initialize), [`flush`](Sink::flush) and
/// [`terminate`](Sink::terminate) are the three operations of the engine's
/// destination manager; [`space`](Sink::space) and
/// [`advance`](Sink::advance) replace its raw next-byte pointer and
/// free-count pair.
pub trait Sink {
    /// Reset the write cursor to the start of the buffer, leaving the full
    /// capacity free. Called once when a compression session begins.
    fn initialize(&mut self);

    /// Write the buffer's full capacity downstream, then reset it. The
    /// engine calls this only when the buffer is completely full.
    fn flush(&mut self);

    /// Write the final partial buffer downstream. Called exactly once,
    /// after the last encode call, before the sink is discarded.
    fn terminate(&mut self);

    /// Free space in the current buffer.
    fn space(&mut self) -> &mut [u8];

    /// Commit `n` bytes written into [`space`](Sink::space).
    fn advance(&mut self, n: usize);

    /// Append one byte, flushing first when the buffer is full.
    fn push(&mut self, byte: u8) {
        if self.space().is_empty() {
            self.flush();
        }
        self.space()[0] = byte;
        self.advance(1);
    }

    /// Append a run of bytes, flushing as the buffer fills.
    fn push_all(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            if self.space().is_empty() {
                self.flush();
            }
            let take = data.len().min(self.space().len());
            self.space()[..take].copy_from_slice(&data[..take]);
            self.advance(take);
            data = &data[take..];
        }
    }
}

/// Accumulates encoded bytes and flushes whole buffers to a caller-supplied
/// writable stream.
///
/// The engine never observes write failures: the sink latches the first
/// `io::Error` it sees, stops writing, and the owning
/// [`Encoder`](crate::Encoder) surfaces it as
/// [`WriteError`](crate::Error::WriteError) at the next public boundary.
pub struct OutputStreamSink<W: Write> {
    writer: W,
    buf: ByteBuffer,
    write_error: Option<io::Error>,
}

impl<W: Write> OutputStreamSink<W> {
    /// Wrap a writable stream.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: ByteBuffer::with_capacity(OUTPUT_BUFFER_CAPACITY),
            write_error: None,
        }
    }

    /// The first write failure observed, if any, clearing it.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    /// Unwrap the underlying stream, discarding buffered bytes.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn drain(&mut self) {
        if self.write_error.is_none() {
            if let Err(e) = self.writer.write_all(self.buf.readable()) {
                self.write_error = Some(e);
            }
        }
        self.buf.clear();
    }
}

impl<W: Write> Sink for OutputStreamSink<W> {
    fn initialize(&mut self) {
        self.buf.clear();
    }

    fn flush(&mut self) {
        debug_assert_eq!(self.buf.free(), 0, "flushed a buffer that is not full");
        self.drain();
    }

    fn terminate(&mut self) {
        self.drain();
        if self.write_error.is_none() {
            if let Err(e) = self.writer.flush() {
                self.write_error = Some(e);
            }
        }
    }

    fn space(&mut self) -> &mut [u8] {
        self.buf.writable()
    }

    fn advance(&mut self, n: usize) {
        self.buf.commit(n);
    }
}
