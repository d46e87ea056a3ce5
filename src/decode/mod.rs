//! Decode adapter layer.
//!
//! Bridges a one-shot, forward-only, push-style decoder to the random-access
//! [`crate::tile::TileCache`]:
//!
//! - [`PushDecoder`] is the capability interface any concrete decoder
//!   implements; it pushes dimensions, rows and a completion status into a
//!   [`RowSink`], possibly from a thread it owns.
//! - [`TileDecoder`] drives the single decode pass: advisory header pre-scan,
//!   production start, window filtering, cancellation once the window is
//!   satisfied, and the blocking wait for completion.
//!
//! The producer/consumer boundary is explicit message passing: the producer
//! thread only sends events over a channel; all cache mutation happens on the
//! thread that called [`TileDecoder::initialize`].

mod adapter;
mod prescan;
mod push;

pub use adapter::TileDecoder;
pub use push::{CompletionStatus, PushDecoder, RowPixels, RowSink};
