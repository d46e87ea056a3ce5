use crate::error::IoError;

/// Trait for seekable, endianness-aware access to an encoded byte stream.
///
/// This abstraction lets the decode adapter pre-scan a stream's segment
/// structure and then hand the remaining bytes to a decoder, without caring
/// where the bytes live. Implementations maintain a read position and a
/// current byte order; multi-byte integer reads honor the byte order in
/// effect at the time of the call.
pub trait ByteSource {
    /// Read exactly `buf.len()` bytes at the current position, advancing it.
    ///
    /// Returns an error if fewer bytes remain than requested.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError>;

    /// Move the read position to an absolute offset.
    fn seek(&mut self, position: u64) -> Result<(), IoError>;

    /// Advance the read position by `count` bytes.
    fn skip(&mut self, count: u64) -> Result<(), IoError>;

    /// Current read position in bytes from the start of the stream.
    fn position(&self) -> u64;

    /// Total size of the stream in bytes.
    fn len(&self) -> u64;

    /// Whether the stream is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes remaining between the current position and the end.
    fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }

    /// Current byte order for multi-byte integer reads.
    fn little_endian(&self) -> bool;

    /// Set the byte order for subsequent multi-byte integer reads.
    fn set_little_endian(&mut self, little_endian: bool);

    /// Read a single byte.
    fn read_u8(&mut self) -> Result<u8, IoError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a `u16` in the current byte order.
    fn read_u16(&mut self) -> Result<u16, IoError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(if self.little_endian() {
            read_u16_le(&buf)
        } else {
            read_u16_be(&buf)
        })
    }

    /// Read a `u32` in the current byte order.
    fn read_u32(&mut self) -> Result<u32, IoError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(if self.little_endian() {
            read_u32_le(&buf)
        } else {
            read_u32_be(&buf)
        })
    }

    /// Read every byte from the current position to the end of the stream.
    fn read_remaining(&mut self) -> Result<Vec<u8>, IoError> {
        let mut buf = vec![0u8; self.remaining() as usize];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// Encoded streams may be either little-endian or big-endian; the marker
// pre-scan always reads big-endian regardless of the source's configured
// order. These helpers are shared by ByteSource implementations.

/// Read a little-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Read a big-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Read a little-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a big-endian u32 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 4 bytes.
#[inline]
pub fn read_u32_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
