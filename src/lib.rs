//! # Tile Streamer
//!
//! Random-access reads of rectangular pixel regions from images that can only
//! be decoded through a one-shot, forward-only, push-style decoder.
//!
//! Push-style decoders drive decoding themselves and hand decoded rows to a
//! callback; they cannot seek and cannot be asked for a sub-region. This
//! library bridges that access pattern to arbitrary, repeated rectangular
//! reads with bounded memory:
//!
//! - a [`decode::TileDecoder`] runs exactly one forward pass of an injected
//!   [`decode::PushDecoder`] over a [`io::ByteSource`], restricted to a
//!   caller-chosen vertical window;
//! - accepted rows accumulate in a [`tile::TileCache`], which compresses each
//!   run of 128 rows into a stored block keyed by its [`Region`];
//! - reads decompress and slice a stored block on demand, with a single-slot
//!   decompressed cache for locality.
//!
//! Peak uncompressed memory is roughly one row-block instead of the whole
//! image.
//!
//! ## Modules
//!
//! - [`region`] - rectangle value type used as the block key
//! - [`tile`] - row-block accumulation, compression and querying
//! - [`decode`] - push-decoder boundary, header pre-scan, session adapter
//! - [`codec`] - block compression codecs (raw, deflate, JPEG)
//! - [`io`] - seekable byte sources
//! - [`error`] - error taxonomy
//!
//! ## Example
//!
//! ```no_run
//! use tile_streamer::codec::DeflateBlockCodec;
//! use tile_streamer::decode::{PushDecoder, TileDecoder};
//! use tile_streamer::io::MemorySource;
//!
//! fn read_band(decoder: Box<dyn PushDecoder>, encoded: Vec<u8>) {
//!     let mut adapter = TileDecoder::new(decoder, Box::new(DeflateBlockCodec::new()));
//!
//!     // Decode rows 256..512 only; blocks until production finishes
//!     adapter
//!         .initialize(Box::new(MemorySource::new(encoded)), 256, 256)
//!         .unwrap();
//!
//!     if let Some(row) = adapter.scanline(300) {
//!         println!("row 300: {} bytes", row.len());
//!     }
//!     adapter.close();
//! }
//! ```

pub mod codec;
pub mod decode;
pub mod error;
pub mod io;
pub mod region;
pub mod tile;

// Re-export commonly used types
pub use codec::{BlockCodec, CodecOptions, DeflateBlockCodec, JpegBlockCodec, RawBlockCodec};
pub use decode::{CompletionStatus, PushDecoder, RowPixels, RowSink, TileDecoder};
pub use error::{CacheError, CodecError, ConfigError, IoError};
pub use io::{ByteSource, MemorySource};
pub use region::Region;
pub use tile::{TileCache, ROW_COUNT};
