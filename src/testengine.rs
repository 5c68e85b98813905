//! Test-only scanline engine over a lossless JPEG-shaped container.
//!
//! Bit-exact by construction, so round-trip tests can compare pixels
//! directly while still exercising the full adapter machinery: marker
//! framing, byte stuffing of `0xFF` in the scan data, comment segments,
//! segment skipping, and the terminator.
//!
//! Wire format: `FF D8`, a frame segment (`FF C0`, big-endian length,
//! precision byte, height, width, channel count), optional marker segments,
//! a scan segment (`FF DA`, length 2), stuffed scanline bytes, `FF D9`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{DecodeEngine, EncodeEngine, Engine};
use crate::info::{ChannelLayout, EncodeParams, ImageInfo};
use crate::marker;
use crate::sink::Sink;
use crate::source::Source;
use crate::trampoline::{Aborted, EngineResult};

type CommentProbe = Rc<RefCell<Option<Vec<u8>>>>;

#[derive(Debug)]
pub(crate) struct TestEngine {
    message: String,
    comment_probe: Option<CommentProbe>,
    // Decode session state.
    decode_info: Option<ImageInfo>,
    rows_decoded: u32,
    // Encode session state.
    rows_expected: u32,
    rows_seen: u32,
    sos_written: bool,
}

impl TestEngine {
    pub(crate) fn new() -> Self {
        Self {
            message: String::new(),
            comment_probe: None,
            decode_info: None,
            rows_decoded: 0,
            rows_expected: 0,
            rows_seen: 0,
            sos_written: false,
        }
    }

    /// Record any decoded comment segment into `probe` for assertions.
    pub(crate) fn with_comment_probe(probe: CommentProbe) -> Self {
        Self {
            comment_probe: Some(probe),
            ..Self::new()
        }
    }

    fn abort(&mut self, message: impl Into<String>) -> Aborted {
        self.message = message.into();
        Aborted
    }

    fn read_u16(source: &mut dyn Source) -> u16 {
        u16::from_be_bytes([source.next_byte(), source.next_byte()])
    }
}

impl Engine for TestEngine {
    fn format_message(&self) -> String {
        self.message.clone()
    }
}

impl DecodeEngine for TestEngine {
    fn parse_header(&mut self, source: &mut dyn Source) -> EngineResult<ImageInfo> {
        source.initialize();
        if source.next_byte() != marker::INTRODUCER || source.next_byte() != marker::SOI {
            return Err(self.abort("missing start-of-image marker"));
        }

        loop {
            if source.next_byte() != marker::INTRODUCER {
                return Err(self.abort("expected a marker between segments"));
            }
            let code = source.next_byte();
            if code == marker::EOI {
                return Err(self.abort("end of image before scan data"));
            }
            let length = Self::read_u16(source);
            if length < 2 {
                return Err(self.abort("corrupt segment length"));
            }
            let payload = u64::from(length) - 2;

            match code {
                marker::SOF0 => {
                    if payload != 6 {
                        return Err(self.abort("corrupt frame header"));
                    }
                    let _precision = source.next_byte();
                    let height = u32::from(Self::read_u16(source));
                    let width = u32::from(Self::read_u16(source));
                    if width == 0 || height == 0 {
                        return Err(self.abort("zero image dimension"));
                    }
                    let channels = match source.next_byte() {
                        1 => ChannelLayout::Gray,
                        3 => ChannelLayout::Rgb,
                        _ => return Err(self.abort("unsupported channel count")),
                    };
                    self.decode_info = Some(ImageInfo::new(width, height, channels));
                }
                marker::COM => {
                    let mut comment = Vec::with_capacity(payload as usize);
                    for _ in 0..payload {
                        comment.push(source.next_byte());
                    }
                    if let Some(probe) = &self.comment_probe {
                        *probe.borrow_mut() = Some(comment);
                    }
                }
                marker::SOS => {
                    source.skip(payload);
                    return match self.decode_info {
                        Some(info) => Ok(info),
                        None => Err(self.abort("scan data before frame header")),
                    };
                }
                _ => source.skip(payload),
            }
        }
    }

    fn decode_scanline(&mut self, source: &mut dyn Source, row: &mut [u8]) -> EngineResult<()> {
        let Some(info) = self.decode_info else {
            return Err(self.abort("scanline requested before header parse"));
        };
        if self.rows_decoded >= info.height {
            return Err(self.abort("decoded past the image height"));
        }

        for slot in row.iter_mut() {
            let byte = source.next_byte();
            *slot = if byte == marker::INTRODUCER {
                match source.next_byte() {
                    marker::STUFFING => marker::INTRODUCER,
                    marker::EOI => {
                        return Err(self.abort("unexpected end of image in scan data"));
                    }
                    code => {
                        return Err(self.abort(format!("unexpected marker 0x{code:02X} in scan data")));
                    }
                }
            } else {
                byte
            };
        }
        self.rows_decoded += 1;
        Ok(())
    }

    fn finish(&mut self, source: &mut dyn Source) -> EngineResult<()> {
        // Discard any undecoded scan data, stopping at the terminator. An
        // exhausted source replays it, so this always returns.
        loop {
            if source.next_byte() == marker::INTRODUCER && source.next_byte() == marker::EOI {
                break;
            }
        }
        source.terminate();
        Ok(())
    }
}

impl EncodeEngine for TestEngine {
    fn start(&mut self, sink: &mut dyn Sink, params: &EncodeParams) -> EngineResult<()> {
        if params.width == 0 || params.height == 0 {
            return Err(self.abort("zero image dimension"));
        }
        if params.width > u32::from(u16::MAX) || params.height > u32::from(u16::MAX) {
            return Err(self.abort("image dimension exceeds 16 bits"));
        }

        sink.initialize();
        sink.push_all(&[marker::INTRODUCER, marker::SOI]);
        sink.push_all(&[marker::INTRODUCER, marker::SOF0]);
        sink.push_all(&8u16.to_be_bytes());
        sink.push(8); // sample precision
        sink.push_all(&(params.height as u16).to_be_bytes());
        sink.push_all(&(params.width as u16).to_be_bytes());
        sink.push(params.channels.channels() as u8);

        self.rows_expected = params.height;
        self.rows_seen = 0;
        self.sos_written = false;
        Ok(())
    }

    fn write_marker(
        &mut self,
        sink: &mut dyn Sink,
        marker_code: u8,
        payload: &[u8],
    ) -> EngineResult<()> {
        if payload.len() > 65_533 {
            return Err(self.abort("marker payload exceeds the length field"));
        }
        sink.push_all(&[marker::INTRODUCER, marker_code]);
        sink.push_all(&((payload.len() as u16 + 2).to_be_bytes()));
        sink.push_all(payload);
        Ok(())
    }

    fn encode_scanline(&mut self, sink: &mut dyn Sink, row: &[u8]) -> EngineResult<()> {
        if !self.sos_written {
            sink.push_all(&[marker::INTRODUCER, marker::SOS]);
            sink.push_all(&2u16.to_be_bytes());
            self.sos_written = true;
        }
        if self.rows_seen == self.rows_expected {
            return Err(self.abort("more scanlines than the declared height"));
        }

        for &byte in row {
            sink.push(byte);
            if byte == marker::INTRODUCER {
                sink.push(marker::STUFFING);
            }
        }
        self.rows_seen += 1;
        Ok(())
    }

    fn finish(&mut self, sink: &mut dyn Sink) -> EngineResult<()> {
        if self.rows_seen != self.rows_expected {
            return Err(self.abort(format!(
                "expected {} scanlines, got {}",
                self.rows_expected, self.rows_seen
            )));
        }
        sink.push_all(&[marker::INTRODUCER, marker::EOI]);
        sink.terminate();
        Ok(())
    }
}
