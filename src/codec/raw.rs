use bytes::Bytes;

use super::{BlockCodec, CodecOptions};
use crate::error::CodecError;

/// Identity codec: stores blocks uncompressed.
///
/// Useful when the decode pass itself is the expensive part and memory is
/// plentiful, and as the lossless baseline in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBlockCodec;

impl RawBlockCodec {
    /// Create a new passthrough codec.
    pub fn new() -> Self {
        Self
    }
}

impl BlockCodec for RawBlockCodec {
    fn compress(&self, data: &[u8], _options: &CodecOptions) -> Result<Bytes, CodecError> {
        Ok(Bytes::copy_from_slice(data))
    }

    fn decompress(&self, data: &[u8], _options: &CodecOptions) -> Result<Bytes, CodecError> {
        Ok(Bytes::copy_from_slice(data))
    }
}
