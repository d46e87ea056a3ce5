use bytes::Bytes;

use super::ByteSource;
use crate::error::IoError;

/// In-memory [`ByteSource`] backed by [`Bytes`].
///
/// The cheapest possible source: cloning the underlying `Bytes` is
/// reference-counted, so a `MemorySource` can be created per decode session
/// without copying the encoded stream.
///
/// # Example
///
/// ```
/// use tile_streamer::io::{ByteSource, MemorySource};
///
/// let mut source = MemorySource::new(vec![0x12, 0x34, 0x56, 0x78]);
/// assert_eq!(source.len(), 4);
///
/// source.set_little_endian(false);
/// assert_eq!(source.read_u16().unwrap(), 0x1234);
/// assert_eq!(source.remaining(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
    position: u64,
    little_endian: bool,
}

impl MemorySource {
    /// Create a source over the given bytes, positioned at the start,
    /// big-endian by default.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            little_endian: false,
        }
    }
}

impl ByteSource for MemorySource {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        let offset = self.position;
        let requested = buf.len() as u64;
        if offset + requested > self.data.len() as u64 {
            return Err(IoError::ReadOutOfBounds {
                offset,
                requested,
                size: self.data.len() as u64,
            });
        }
        let start = offset as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        self.position += requested;
        Ok(())
    }

    fn seek(&mut self, position: u64) -> Result<(), IoError> {
        if position > self.data.len() as u64 {
            return Err(IoError::SeekOutOfBounds {
                position,
                size: self.data.len() as u64,
            });
        }
        self.position = position;
        Ok(())
    }

    fn skip(&mut self, count: u64) -> Result<(), IoError> {
        self.seek(self.position + count)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn little_endian(&self) -> bool {
        self.little_endian
    }

    fn set_little_endian(&mut self, little_endian: bool) {
        self.little_endian = little_endian;
    }
}
