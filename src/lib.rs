//! Streaming adapters for scanline JPEG codec engines.
//!
//! A scanline codec engine wants a byte supplier on one side and a byte
//! consumer on the other; this crate lets it run over arbitrary sequential
//! streams — sockets, pipes, anything [`std::io::Read`] /
//! [`std::io::Write`] — and converts the engine's abrupt-termination
//! failure signaling into [`Result`]s at every public boundary.
//!
//! - [`Decoder`] — construct over a readable stream (header parsed
//!   eagerly), pull scanlines, finish. Decode failures surface as
//!   [`Error::MalformedImage`].
//! - [`Encoder`] — construct over a writable stream with dimensions,
//!   channel request, and an optional bounded comment; push scanlines,
//!   finish. Encode and write failures surface as [`Error::WriteError`].
//! - [`Source`] / [`Sink`] — the callback tables the engine pulls bytes
//!   through, implemented by [`InputStreamSource`] / [`OutputStreamSink`].
//! - [`DecodeEngine`] / [`EncodeEngine`] — the engine interface. This
//!   crate implements no JPEG itself; plug in a native or ported codec.
//!
//! Data flow:
//!
//! ```text
//! decode: stream → InputStreamSource → engine → caller scanlines
//! encode: caller scanlines → engine → OutputStreamSink → stream
//! ```
//!
//! An ill-terminated input stream is handled deterministically: once the
//! stream ends, the source synthesizes the end-of-image marker, so the
//! engine always sees a well-formed terminator and either completes or
//! fails with a diagnostic — it never reads past the end and never hangs.
//!
//! Everything is synchronous and single-threaded. One decoder or encoder
//! owns its engine, buffer, and stream exclusively; independent instances
//! share nothing and may run on separate threads without coordination.

#![forbid(unsafe_code)]

mod buffer;
mod decoder;
mod encoder;
mod engine;
mod error;
mod info;
pub mod marker;
mod pixel;
mod sink;
mod source;
mod trampoline;

#[cfg(test)]
mod testengine;

pub use buffer::ByteBuffer;
pub use decoder::Decoder;
pub use encoder::{Encoder, MAX_COMMENT_BYTES, QUALITY};
pub use engine::{DecodeEngine, EncodeEngine, Engine};
pub use error::{Error, Result};
pub use info::{ChannelLayout, EncodeParams, ImageInfo};
pub use pixel::PixelData;
pub use sink::{OUTPUT_BUFFER_CAPACITY, OutputStreamSink, Sink};
pub use source::{INPUT_BUFFER_CAPACITY, InputStreamSource, Source};
pub use trampoline::{Aborted, EngineResult};

// Re-exports for engine implementors and users.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb;
pub use rgb::{Gray, Rgb};
