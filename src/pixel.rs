//! Typed pixel buffers for whole-image decode.
//!
//! Uses `imgref::ImgVec` for 2D pixel data with typed pixels from the `rgb`
//! crate. The scanline APIs work on raw interleaved bytes; these types are
//! the convenience layer on top.

use imgref::{ImgRef, ImgVec};
use rgb::{Gray, Rgb};

use crate::info::ChannelLayout;

/// Decoded pixel data in a typed buffer.
///
/// The variant matches the stream's channel layout. Width and height are
/// embedded in the `ImgVec`.
pub enum PixelData {
    /// Single-channel luminance.
    Gray8(ImgVec<Gray<u8>>),
    /// Interleaved red, green, blue.
    Rgb8(ImgVec<Rgb<u8>>),
}

impl PixelData {
    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            PixelData::Gray8(img) => img.width() as u32,
            PixelData::Rgb8(img) => img.width() as u32,
        }
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            PixelData::Gray8(img) => img.height() as u32,
            PixelData::Rgb8(img) => img.height() as u32,
        }
    }

    /// Channel layout of this buffer.
    pub fn channels(&self) -> ChannelLayout {
        match self {
            PixelData::Gray8(_) => ChannelLayout::Gray,
            PixelData::Rgb8(_) => ChannelLayout::Rgb,
        }
    }

    /// Borrow as Gray8 if that's the native layout.
    pub fn as_gray8(&self) -> Option<ImgRef<'_, Gray<u8>>> {
        match self {
            PixelData::Gray8(img) => Some(img.as_ref()),
            _ => None,
        }
    }

    /// Borrow as RGB8 if that's the native layout.
    pub fn as_rgb8(&self) -> Option<ImgRef<'_, Rgb<u8>>> {
        match self {
            PixelData::Rgb8(img) => Some(img.as_ref()),
            _ => None,
        }
    }

    /// Convert to RGB8, allocating a new buffer.
    ///
    /// Gray8 is expanded to RGB with R=G=B=gray.
    pub fn to_rgb8(&self) -> ImgVec<Rgb<u8>> {
        match self {
            PixelData::Rgb8(img) => {
                let (buf, w, h) = img.as_ref().to_contiguous_buf();
                ImgVec::new(buf.into_owned(), w, h)
            }
            PixelData::Gray8(img) => {
                let (buf, w, h) = img.as_ref().to_contiguous_buf();
                let rgb: Vec<Rgb<u8>> = buf
                    .iter()
                    .map(|p| {
                        let v = p.value();
                        Rgb { r: v, g: v, b: v }
                    })
                    .collect();
                ImgVec::new(rgb, w, h)
            }
        }
    }
}
