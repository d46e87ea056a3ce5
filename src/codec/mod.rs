//! Block compression codecs.
//!
//! Completed row-blocks are compressed before being stored in the tile cache
//! and decompressed again on demand. The [`BlockCodec`] trait is the seam:
//! any compress/decompress pair can be injected per decode session.
//!
//! # Bundled codecs
//!
//! - [`RawBlockCodec`]: identity passthrough. Lossless, zero CPU cost.
//! - [`DeflateBlockCodec`]: zlib compression. Lossless, the default choice
//!   when bounding memory actually matters.
//! - [`JpegBlockCodec`]: baseline JPEG for 8-bit gray/RGB blocks. Lossy;
//!   trades exactness for the best compression of photographic data.

mod deflate;
mod jpeg;
mod raw;

pub use deflate::DeflateBlockCodec;
pub use jpeg::JpegBlockCodec;
pub use raw::RawBlockCodec;

use bytes::Bytes;

use crate::error::CodecError;

// =============================================================================
// Codec Options
// =============================================================================

/// Pixel-layout options in effect when a block is compressed.
///
/// The same options must be passed back, unchanged, when decompressing that
/// block. `width`, `height` and `channels` are overwritten per block at flush
/// time; the remaining fields are fixed for the whole decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Block width in pixels
    pub width: u32,

    /// Block height in rows
    pub height: u32,

    /// Samples per pixel (1 = grayscale, 3 = RGB)
    pub channels: u32,

    /// Bits per sample
    pub bits_per_sample: u32,

    /// Whether samples are signed
    pub signed: bool,

    /// Whether samples are interleaved (RGBRGB rather than planar)
    pub interleaved: bool,

    /// Byte order of multi-byte samples
    pub little_endian: bool,
}

impl Default for CodecOptions {
    /// Session base options: 8-bit unsigned interleaved big-endian samples.
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            channels: 1,
            bits_per_sample: 8,
            signed: false,
            interleaved: true,
            little_endian: false,
        }
    }
}

impl CodecOptions {
    /// Bytes occupied by one pixel under these options.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize / 8)
    }

    /// Uncompressed size in bytes of a full block under these options.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_pixel()
    }
}

// =============================================================================
// Block Codec Trait
// =============================================================================

/// Compress/decompress dependency applied to each row-block.
///
/// Implementations must be deterministic for a given `(data, options)` pair
/// but need not be lossless; callers that require byte-exact reads must pick
/// a lossless codec.
pub trait BlockCodec: Send {
    /// Compress one row-block of raw pixel data.
    fn compress(&self, data: &[u8], options: &CodecOptions) -> Result<Bytes, CodecError>;

    /// Decompress a previously compressed block.
    ///
    /// `options` must be the exact options recorded at compression time.
    fn decompress(&self, data: &[u8], options: &CodecOptions) -> Result<Bytes, CodecError>;
}
