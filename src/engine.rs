//! Interfaces of the external scanline codec engine.
//!
//! This crate does not implement JPEG compression itself — it drives an
//! engine through these traits, supplying bytes on demand through
//! [`Source`] and accepting encoded bytes through [`Sink`]. The traits are
//! the polymorphic rendition of the engine's C-style callback tables: the
//! adapter installs itself as the engine's byte supplier/consumer, and the
//! engine signals failure by abandoning the current call with
//! [`Aborted`](crate::Aborted) rather than unwinding normally.
//!
//! An engine value is owned by exactly one [`Decoder`](crate::Decoder) or
//! [`Encoder`](crate::Encoder) for its entire lifetime and is dropped with
//! it, so engine-held resources are released exactly once even when a
//! session fails partway through.

use crate::info::{EncodeParams, ImageInfo};
use crate::sink::Sink;
use crate::source::Source;
use crate::trampoline::EngineResult;

/// Diagnostics facility shared by both engine directions.
pub trait Engine {
    /// Render the diagnostic for the most recent abort.
    ///
    /// Called by the checkpoint after an operation returns
    /// [`Aborted`](crate::Aborted); the result becomes the payload of the
    /// typed error handed to the caller.
    fn format_message(&self) -> String;
}

/// Decompression side of the engine.
///
/// Operations pull bytes through the [`Source`] they are given. The source
/// never runs dry: once the underlying stream is exhausted it replays the
/// terminator marker, so a decoder that tracks markers correctly always
/// reaches a well-formed end of image.
pub trait DecodeEngine: Engine {
    /// Parse the container header eagerly and set up decompression.
    ///
    /// Must call `source.initialize()` once before pulling any bytes.
    /// Returns the image metadata; an unparseable header aborts.
    fn parse_header(&mut self, source: &mut dyn Source) -> EngineResult<ImageInfo>;

    /// Decode the next scanline in row order into `row`.
    ///
    /// `row` holds exactly width × channel-count bytes. Successive calls
    /// advance the engine's internal scanline counter; decoding past the
    /// declared height aborts.
    fn decode_scanline(&mut self, source: &mut dyn Source, row: &mut [u8]) -> EngineResult<()>;

    /// Complete decompression bookkeeping and release engine resources.
    ///
    /// Must call `source.terminate()` on success. Called exactly once per
    /// session, including sessions abandoned before the last scanline.
    fn finish(&mut self, source: &mut dyn Source) -> EngineResult<()>;
}

/// Compression side of the engine.
///
/// Operations push bytes through the [`Sink`] they are given. The sink
/// buffers internally and flushes downstream in whole-buffer chunks; write
/// failures are latched by the sink and surfaced by the owning encoder, so
/// the engine never observes them.
pub trait EncodeEngine: Engine {
    /// Write the container header and begin the compression session.
    ///
    /// Must call `sink.initialize()` once before producing any output.
    fn start(&mut self, sink: &mut dyn Sink, params: &EncodeParams) -> EngineResult<()>;

    /// Embed a marker segment in the header area.
    ///
    /// The segment is the marker code followed by a big-endian 2-byte
    /// length covering the length field itself plus the payload, with no
    /// trailing terminator. Called after [`start`](EncodeEngine::start) and
    /// before the first scanline.
    fn write_marker(&mut self, sink: &mut dyn Sink, marker: u8, payload: &[u8])
    -> EngineResult<()>;

    /// Encode one scanline of exactly width × channel-count bytes.
    fn encode_scanline(&mut self, sink: &mut dyn Sink, row: &[u8]) -> EngineResult<()>;

    /// Write the terminator marker, flush, and release engine resources.
    ///
    /// Must call `sink.terminate()` so the final partial buffer reaches the
    /// stream. Aborts if the session did not receive the declared number of
    /// scanlines.
    fn finish(&mut self, sink: &mut dyn Sink) -> EngineResult<()>;
}
