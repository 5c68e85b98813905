//! Marker byte values of the container format.
//!
//! Only the markers the stream adapters themselves care about are listed —
//! everything else belongs to the engine.

/// Lead byte introducing every marker code.
pub const INTRODUCER: u8 = 0xFF;

/// Start-of-image marker code.
pub const SOI: u8 = 0xD8;

/// End-of-image (terminator) marker code.
pub const EOI: u8 = 0xD9;

/// Baseline start-of-frame marker code.
pub const SOF0: u8 = 0xC0;

/// Start-of-scan marker code.
pub const SOS: u8 = 0xDA;

/// Comment segment marker code.
pub const COM: u8 = 0xFE;

/// Follows a literal `0xFF` byte in entropy-coded data (byte stuffing).
pub const STUFFING: u8 = 0x00;

/// The terminator sequence an input source replays once its stream is
/// exhausted, so the engine always observes a well-formed end of image.
pub const TERMINATOR: [u8; 2] = [INTRODUCER, EOI];
