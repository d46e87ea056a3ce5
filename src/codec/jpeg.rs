use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader};

use super::{BlockCodec, CodecOptions};
use crate::error::CodecError;

/// Default JPEG quality for block compression (1-100).
pub const DEFAULT_BLOCK_QUALITY: u8 = 90;

/// Baseline JPEG codec for stored row-blocks.
///
/// Compresses each block as a standalone JPEG image and decodes it back to
/// raw interleaved samples. Only 8-bit unsigned data with 1 (grayscale) or
/// 3 (RGB) channels is supported; anything else fails with
/// [`CodecError::UnsupportedLayout`].
///
/// JPEG is lossy: reads through this codec return pixel values close to, but
/// not byte-identical with, the rows that were accumulated. Use
/// [`super::DeflateBlockCodec`] where exactness matters.
#[derive(Debug, Clone, Copy)]
pub struct JpegBlockCodec {
    quality: u8,
}

impl JpegBlockCodec {
    /// Create a codec with the default quality.
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_BLOCK_QUALITY,
        }
    }

    /// Create a codec with an explicit quality (clamped to 1-100).
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegBlockCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn color_type(options: &CodecOptions) -> Result<ExtendedColorType, CodecError> {
    if options.bits_per_sample != 8 || options.signed || !options.interleaved {
        return Err(CodecError::UnsupportedLayout {
            message: format!(
                "JPEG blocks require 8-bit unsigned interleaved samples, got {} bits (signed: {}, interleaved: {})",
                options.bits_per_sample, options.signed, options.interleaved
            ),
        });
    }
    match options.channels {
        1 => Ok(ExtendedColorType::L8),
        3 => Ok(ExtendedColorType::Rgb8),
        n => Err(CodecError::UnsupportedLayout {
            message: format!("JPEG blocks support 1 or 3 channels, got {n}"),
        }),
    }
}

impl BlockCodec for JpegBlockCodec {
    fn compress(&self, data: &[u8], options: &CodecOptions) -> Result<Bytes, CodecError> {
        let color = color_type(options)?;
        if data.len() != options.block_len() {
            return Err(CodecError::Encode {
                message: format!(
                    "block has {} bytes, expected {} for {}x{}x{}",
                    data.len(),
                    options.block_len(),
                    options.width,
                    options.height,
                    options.channels
                ),
            });
        }

        let mut output = Vec::new();
        JpegEncoder::new_with_quality(&mut output, self.quality)
            .write_image(data, options.width, options.height, color)
            .map_err(|e| CodecError::Encode {
                message: e.to_string(),
            })?;
        Ok(Bytes::from(output))
    }

    fn decompress(&self, data: &[u8], options: &CodecOptions) -> Result<Bytes, CodecError> {
        color_type(options)?;

        let reader = ImageReader::with_format(Cursor::new(data), image::ImageFormat::Jpeg);
        let img = reader.decode().map_err(|e| CodecError::Decode {
            message: e.to_string(),
        })?;

        if img.width() != options.width || img.height() != options.height {
            return Err(CodecError::Decode {
                message: format!(
                    "decoded block is {}x{}, expected {}x{}",
                    img.width(),
                    img.height(),
                    options.width,
                    options.height
                ),
            });
        }

        let raw = match options.channels {
            1 => img.into_luma8().into_raw(),
            _ => img.into_rgb8().into_raw(),
        };
        Ok(Bytes::from(raw))
    }
}
