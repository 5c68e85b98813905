//! Decode orchestration over a readable byte stream.

use std::io::Read;

use imgref::ImgVec;
use rgb::{Gray, Rgb};

use crate::engine::DecodeEngine;
use crate::error::{Error, Result};
use crate::info::{ChannelLayout, ImageInfo};
use crate::pixel::PixelData;
use crate::source::InputStreamSource;
use crate::trampoline::{Boundary, recover};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Decompressing,
    Finished,
    Defunct,
}

/// Streaming decoder: drives a decode engine over a readable byte stream.
///
/// Construction installs the stream source, parses the container header
/// eagerly, and begins decompression; [`decode_lines`](Decoder::decode_lines)
/// then pulls scanlines in row order, and [`finish`](Decoder::finish)
/// completes the session. Dropping an unfinished decoder finishes it on a
/// best-effort basis.
///
/// Engine failures surface as [`Error::MalformedImage`]. After one, the
/// decoder is defunct: further calls report the failed session, and
/// dropping it releases the engine without re-entering it.
#[derive(Debug)]
pub struct Decoder<R: Read, E: DecodeEngine> {
    source: InputStreamSource<R>,
    engine: E,
    info: ImageInfo,
    rows_remaining: u32,
    state: State,
}

impl<R: Read, E: DecodeEngine> Decoder<R, E> {
    /// Construct over `reader`, parsing the container header eagerly.
    ///
    /// The stream must yield a conformant bitstream; it does not need to
    /// support seeking or report a length, and it may end without a
    /// terminator marker — the source supplies one synthetically. A header
    /// the engine cannot parse fails with [`Error::MalformedImage`], and
    /// everything allocated up to that point is released.
    pub fn new(reader: R, mut engine: E) -> Result<Self> {
        let mut source = InputStreamSource::new(reader);
        let info = recover(&mut engine, Boundary::Decode, |e| {
            e.parse_header(&mut source)
        })?;
        Ok(Self {
            source,
            engine,
            rows_remaining: info.height,
            info,
            state: State::Decompressing,
        })
    }

    /// Image metadata from the parsed header.
    pub fn info(&self) -> ImageInfo {
        self.info
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.info.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// Channel layout of decoded rows.
    pub fn channels(&self) -> ChannelLayout {
        self.info.channels
    }

    /// Bytes in one decoded scanline: width × channel count.
    pub fn bytes_per_line(&self) -> usize {
        self.info.bytes_per_line()
    }

    /// Scanlines not yet decoded.
    pub fn rows_remaining(&self) -> u32 {
        self.rows_remaining
    }

    /// Decode exactly `lines` scanlines in row order into `dest`.
    ///
    /// Rows are packed tightly: `lines × bytes_per_line()` bytes, no row
    /// padding. Repeated calls continue where the previous call left off;
    /// the caller must stop at the declared height.
    ///
    /// # Panics
    ///
    /// If `lines` is zero or `dest` is too small for `lines` rows.
    pub fn decode_lines(&mut self, dest: &mut [u8], lines: usize) -> Result<()> {
        assert!(lines >= 1, "must decode at least one scanline");
        let row_bytes = self.info.bytes_per_line();
        assert!(
            dest.len() >= lines * row_bytes,
            "destination too small for {lines} scanlines"
        );
        if self.state == State::Defunct {
            return Err(Error::MalformedImage("decode session already failed".into()));
        }

        for row in dest[..lines * row_bytes].chunks_exact_mut(row_bytes) {
            let decoded = recover(&mut self.engine, Boundary::Decode, |e| {
                e.decode_scanline(&mut self.source, row)
            });
            if let Err(err) = decoded {
                self.state = State::Defunct;
                return Err(err);
            }
            self.rows_remaining = self.rows_remaining.saturating_sub(1);
        }
        Ok(())
    }

    /// Decode all remaining scanlines into a typed pixel buffer and finish
    /// the session.
    pub fn decode_image(mut self) -> Result<PixelData> {
        let info = self.info;
        let rows = self.rows_remaining as usize;
        let mut bytes = vec![0u8; rows * info.bytes_per_line()];
        if rows > 0 {
            self.decode_lines(&mut bytes, rows)?;
        }
        self.finish()?;

        let width = info.width as usize;
        Ok(match info.channels {
            ChannelLayout::Gray => {
                let pixels: Vec<Gray<u8>> = bytes.iter().map(|&v| Gray(v)).collect();
                PixelData::Gray8(ImgVec::new(pixels, width, rows))
            }
            ChannelLayout::Rgb => {
                let pixels: Vec<Rgb<u8>> = bytes
                    .chunks_exact(3)
                    .map(|c| Rgb {
                        r: c[0],
                        g: c[1],
                        b: c[2],
                    })
                    .collect();
                PixelData::Rgb8(ImgVec::new(pixels, width, rows))
            }
        })
    }

    /// Complete decompression bookkeeping and release the engine.
    pub fn finish(mut self) -> Result<()> {
        self.finish_in_place()
    }

    fn finish_in_place(&mut self) -> Result<()> {
        match self.state {
            State::Finished => return Ok(()),
            State::Defunct => {
                return Err(Error::MalformedImage("decode session already failed".into()));
            }
            State::Decompressing => {}
        }
        let finished = recover(&mut self.engine, Boundary::Decode, |e| {
            e.finish(&mut self.source)
        });
        match finished {
            Ok(()) => {
                self.state = State::Finished;
                Ok(())
            }
            Err(err) => {
                self.state = State::Defunct;
                Err(err)
            }
        }
    }
}

impl<R: Read, E: DecodeEngine> Drop for Decoder<R, E> {
    fn drop(&mut self) {
        if self.state == State::Decompressing {
            if let Err(e) = self.finish_in_place() {
                log::warn!("decode finalize during drop failed: {e}");
            }
        }
    }
}
