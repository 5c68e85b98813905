//! Encode orchestration over a writable byte stream.

use std::io::Write;

use imgref::ImgRef;
use rgb::{Gray, Rgb};

use crate::engine::EncodeEngine;
use crate::error::{Error, Result};
use crate::info::{ChannelLayout, EncodeParams};
use crate::marker;
use crate::sink::OutputStreamSink;
use crate::trampoline::{Boundary, recover};

/// Encode quality on the 0–100 scale.
///
/// Fixed: no chroma-subsampling or progressive-mode configuration is
/// exposed.
pub const QUALITY: u8 = 95;

/// Longest comment payload a marker segment can carry.
///
/// The marker's 16-bit length field covers the two length bytes as well as
/// the payload, so the bound is 65533, not 65535.
pub const MAX_COMMENT_BYTES: usize = 65_533;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Encoding,
    Finished,
    Defunct,
}

/// Streaming encoder: drives an encode engine over a writable byte stream.
///
/// Construction installs the stream sink, writes the container header, and
/// embeds the optional comment; [`encode_lines`](Encoder::encode_lines)
/// then pushes scanlines in row order, and [`finish`](Encoder::finish)
/// writes the terminator and flushes. The caller must supply exactly
/// `height` scanlines across the session or finish reports an invalid
/// stream. Dropping an unfinished encoder finishes it on a best-effort
/// basis.
///
/// Engine failures and underlying write failures surface as
/// [`Error::WriteError`]. After one, the encoder is defunct: further calls
/// report the failed session, and dropping it releases the engine without
/// re-entering it.
pub struct Encoder<W: Write, E: EncodeEngine> {
    sink: OutputStreamSink<W>,
    engine: E,
    params: EncodeParams,
    rows_written: u32,
    state: State,
}

impl<W: Write, E: EncodeEngine> Encoder<W, E> {
    /// Construct over `writer` for a `width` × `height` image.
    ///
    /// A request for fewer than three channels encodes grayscale, anything
    /// else RGB — there is no intermediate mode. A non-empty `comment` is
    /// embedded as a comment marker after the header, truncated to
    /// [`MAX_COMMENT_BYTES`] and written without a trailing terminator —
    /// the marker's own length field delimits it.
    pub fn new(
        writer: W,
        mut engine: E,
        width: u32,
        height: u32,
        requested_channels: u8,
        comment: &[u8],
    ) -> Result<Self> {
        let params = EncodeParams {
            width,
            height,
            channels: ChannelLayout::from_requested(requested_channels),
            quality: QUALITY,
        };
        let mut sink = OutputStreamSink::new(writer);
        recover(&mut engine, Boundary::Encode, |e| {
            e.start(&mut sink, &params)
        })?;

        let comment = if comment.len() > MAX_COMMENT_BYTES {
            log::warn!("comment truncated to {MAX_COMMENT_BYTES} bytes");
            &comment[..MAX_COMMENT_BYTES]
        } else {
            comment
        };
        if !comment.is_empty() {
            recover(&mut engine, Boundary::Encode, |e| {
                e.write_marker(&mut sink, marker::COM, comment)
            })?;
        }

        let mut encoder = Self {
            sink,
            engine,
            params,
            rows_written: 0,
            state: State::Encoding,
        };
        encoder.surface_sink_error()?;
        Ok(encoder)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.params.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.params.height
    }

    /// Channel layout the caller must supply rows in.
    pub fn channels(&self) -> ChannelLayout {
        self.params.channels
    }

    /// Bytes in one source scanline: width × channel count.
    pub fn bytes_per_line(&self) -> usize {
        self.params.bytes_per_line()
    }

    /// Scanlines still owed before the stream is complete.
    pub fn rows_remaining(&self) -> u32 {
        self.params.height - self.rows_written
    }

    /// Encode exactly `lines` scanlines from `src` in row order.
    ///
    /// Rows are read tightly packed: `lines × bytes_per_line()` bytes, no
    /// row padding. Repeated calls continue where the previous call left
    /// off.
    ///
    /// # Panics
    ///
    /// If `lines` is zero or `src` holds fewer than `lines` rows.
    pub fn encode_lines(&mut self, src: &[u8], lines: usize) -> Result<()> {
        assert!(lines >= 1, "must encode at least one scanline");
        let row_bytes = self.params.bytes_per_line();
        assert!(
            src.len() >= lines * row_bytes,
            "source too small for {lines} scanlines"
        );
        if self.state == State::Defunct {
            return Err(Error::WriteError("encode session already failed".into()));
        }

        for row in src[..lines * row_bytes].chunks_exact(row_bytes) {
            let encoded = recover(&mut self.engine, Boundary::Encode, |e| {
                e.encode_scanline(&mut self.sink, row)
            });
            if let Err(err) = encoded {
                self.state = State::Defunct;
                return Err(err);
            }
            self.rows_written += 1;
        }
        self.surface_sink_error()
    }

    /// Encode a whole RGB image, row by row.
    ///
    /// Handles non-contiguous buffers (stride wider than the image).
    ///
    /// # Panics
    ///
    /// If the encoder was not constructed for RGB rows, or the image
    /// dimensions do not match the session.
    pub fn encode_rgb8(&mut self, img: ImgRef<'_, Rgb<u8>>) -> Result<()> {
        assert_eq!(
            self.params.channels,
            ChannelLayout::Rgb,
            "session encodes grayscale rows"
        );
        assert_eq!(img.width() as u32, self.params.width, "width mismatch");
        let mut row_bytes = Vec::with_capacity(self.bytes_per_line());
        for row in img.rows() {
            row_bytes.clear();
            row_bytes.extend(row.iter().flat_map(|p| [p.r, p.g, p.b]));
            self.encode_lines(&row_bytes, 1)?;
        }
        Ok(())
    }

    /// Encode a whole grayscale image, row by row.
    ///
    /// # Panics
    ///
    /// If the encoder was not constructed for grayscale rows, or the image
    /// dimensions do not match the session.
    pub fn encode_gray8(&mut self, img: ImgRef<'_, Gray<u8>>) -> Result<()> {
        assert_eq!(
            self.params.channels,
            ChannelLayout::Gray,
            "session encodes RGB rows"
        );
        assert_eq!(img.width() as u32, self.params.width, "width mismatch");
        let mut row_bytes = Vec::with_capacity(self.bytes_per_line());
        for row in img.rows() {
            row_bytes.clear();
            row_bytes.extend(row.iter().map(|p| p.value()));
            self.encode_lines(&row_bytes, 1)?;
        }
        Ok(())
    }

    /// Write the terminator marker, flush the remainder, and release the
    /// engine.
    pub fn finish(mut self) -> Result<()> {
        self.finish_in_place()
    }

    fn surface_sink_error(&mut self) -> Result<()> {
        if let Some(e) = self.sink.take_error() {
            self.state = State::Defunct;
            return Err(Error::WriteError(e.to_string()));
        }
        Ok(())
    }

    fn finish_in_place(&mut self) -> Result<()> {
        match self.state {
            State::Finished => return Ok(()),
            State::Defunct => {
                return Err(Error::WriteError("encode session already failed".into()));
            }
            State::Encoding => {}
        }
        let finished = recover(&mut self.engine, Boundary::Encode, |e| {
            e.finish(&mut self.sink)
        });
        if let Err(err) = finished {
            self.state = State::Defunct;
            return Err(err);
        }
        self.surface_sink_error()?;
        self.state = State::Finished;
        Ok(())
    }
}

impl<W: Write, E: EncodeEngine> Drop for Encoder<W, E> {
    fn drop(&mut self) {
        if self.state == State::Encoding {
            if let Err(e) = self.finish_in_place() {
                log::warn!("encode finalize during drop failed: {e}");
            }
        }
    }
}
