//! Row-block accumulation and querying.
//!
//! [`TileCache`] bridges two incompatible access patterns: a forward-only
//! producer that delivers pixel rows exactly once, and callers that want
//! arbitrary, repeated rectangular reads. Rows are folded into fixed-height
//! compressed blocks as they arrive; reads decompress and slice a stored
//! block on demand.
//!
//! See [`crate::decode::TileDecoder`] for the adapter that feeds a cache from
//! a push-style decoder.

mod cache;

pub use cache::{TileCache, ROW_COUNT};
