//! Image metadata types.

/// Channel layout of the interleaved pixel rows the adapters move.
///
/// The container supports exactly two modes — single-channel luminance and
/// interleaved red/green/blue. There is no intermediate (2- or 4-channel)
/// mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelLayout {
    /// Single luminance channel.
    Gray = 1,
    /// Red, green, blue.
    Rgb = 3,
}

impl ChannelLayout {
    /// Number of channels in this layout.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }

    /// Coerce a requested channel count to a supported layout.
    ///
    /// Fewer than three channels requests grayscale; three or more requests
    /// RGB.
    pub const fn from_requested(channels: u8) -> Self {
        if channels < 3 { Self::Gray } else { Self::Rgb }
    }
}

/// Image metadata from the parsed container header.
///
/// Produced by [`DecodeEngine::parse_header`](crate::DecodeEngine::parse_header)
/// and exposed read-only by the [`Decoder`](crate::Decoder).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels (scanline count).
    pub height: u32,
    /// Channel layout of decoded rows.
    pub channels: ChannelLayout,
}

impl ImageInfo {
    /// Create a new `ImageInfo` with the given dimensions and layout.
    pub fn new(width: u32, height: u32, channels: ChannelLayout) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Bytes in one interleaved scanline: width × channel count, row-major,
    /// no padding.
    pub fn bytes_per_line(&self) -> usize {
        self.width as usize * self.channels.channels()
    }
}

/// Parameters handed to the engine when a compression session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeParams {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels (scanline count the caller must supply).
    pub height: u32,
    /// Channel layout of the rows the caller will push.
    pub channels: ChannelLayout,
    /// Quality on the 0–100 scale. The encoder always passes
    /// [`QUALITY`](crate::QUALITY).
    pub quality: u8,
}

impl EncodeParams {
    /// Bytes in one interleaved scanline: width × channel count.
    pub fn bytes_per_line(&self) -> usize {
        self.width as usize * self.channels.channels()
    }
}
