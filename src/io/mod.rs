//! I/O layer: seekable byte sources for encoded image streams.
//!
//! The decode adapter consumes any [`ByteSource`]: a seekable,
//! endianness-aware stream supporting positioned reads, skip, and
//! length/remaining queries. [`MemorySource`] is the bundled in-memory
//! implementation.

mod byte_source;
mod memory;

pub use byte_source::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, ByteSource};
pub use memory::MemorySource;
