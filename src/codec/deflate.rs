use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::{BlockCodec, CodecOptions};
use crate::error::CodecError;

/// Lossless zlib codec for stored row-blocks.
///
/// The default choice when the cache is expected to hold many blocks: raw
/// pixel rows compress well and the round-trip is byte-exact.
#[derive(Debug, Clone, Copy)]
pub struct DeflateBlockCodec {
    level: Compression,
}

impl DeflateBlockCodec {
    /// Create a codec with the default compression level.
    pub fn new() -> Self {
        Self {
            level: Compression::default(),
        }
    }

    /// Create a codec with an explicit compression level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for DeflateBlockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCodec for DeflateBlockCodec {
    fn compress(&self, data: &[u8], _options: &CodecOptions) -> Result<Bytes, CodecError> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
        encoder.write_all(data).map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })?;
        let compressed = encoder.finish().map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })?;
        Ok(Bytes::from(compressed))
    }

    fn decompress(&self, data: &[u8], options: &CodecOptions) -> Result<Bytes, CodecError> {
        let expected = options.block_len();
        let mut decoder = ZlibDecoder::new(data);
        let mut raw = Vec::with_capacity(expected);
        decoder
            .read_to_end(&mut raw)
            .map_err(|e| CodecError::Decode {
                message: e.to_string(),
            })?;

        if raw.len() != expected {
            return Err(CodecError::Decode {
                message: format!(
                    "decompressed {} bytes, expected {} for a {}x{} block",
                    raw.len(),
                    expected,
                    options.width,
                    options.height
                ),
            });
        }

        Ok(Bytes::from(raw))
    }
}
