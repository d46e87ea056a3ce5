use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::IoError;

// =============================================================================
// Push Decoder Trait
// =============================================================================

/// A one-shot, forward-only decoder that pushes decoded rows to a sink.
///
/// Implementations receive the full encoded stream and a [`RowSink`] and
/// drive decoding themselves, either on the calling thread or on a thread
/// they own. The contract:
///
/// - report image dimensions via [`RowSink::dimensions`] before any rows;
/// - deliver rows in increasing row order via [`RowSink::rows`];
/// - stop producing (best-effort) once [`RowSink::is_detached`] returns true;
/// - eventually call [`RowSink::complete`] or drop every clone of the sink,
///   otherwise the consumer blocks forever.
pub trait PushDecoder: Send {
    /// Begin the single decode pass over `encoded`.
    ///
    /// May return before decoding finishes if production happens on another
    /// thread. A returned error means production never started.
    fn start_production(&mut self, encoded: Bytes, sink: RowSink) -> Result<(), IoError>;
}

// =============================================================================
// Producer-Side Events
// =============================================================================

/// Pixel payload of one row delivery.
#[derive(Debug, Clone)]
pub enum RowPixels {
    /// Interleaved 8-bit samples, `width * channels` bytes per row
    Bytes { data: Vec<u8>, channels: u32 },

    /// One 32-bit word per pixel carrying R, G, B in its low three bytes
    Packed(Vec<u32>),
}

/// Terminal status reported by a producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The whole image was decoded
    ImageComplete,

    /// Production stopped early (e.g. the consumer detached)
    ImageAborted,

    /// Decoding failed
    ImageError(String),
}

/// Event stream crossing the producer/consumer boundary.
#[derive(Debug, Clone)]
pub(crate) enum DecodeEvent {
    Dimensions {
        width: u32,
        height: u32,
    },
    Rows {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: RowPixels,
    },
    Complete(CompletionStatus),
}

// =============================================================================
// Row Sink
// =============================================================================

/// Producer-side handle for delivering decode events.
///
/// Cloneable and cheap: a sink is an unbounded channel sender plus a shared
/// detach flag. Calls never block, so a producer thread does pure data
/// handoff and holds no locks across a delivery.
///
/// Once the consumer detaches (its window is satisfied), `dimensions` and
/// `rows` become no-ops; producers should poll [`is_detached`](Self::is_detached)
/// and stop decoding, but continuing to send is harmless.
#[derive(Debug, Clone)]
pub struct RowSink {
    tx: Sender<DecodeEvent>,
    detached: Arc<AtomicBool>,
}

impl RowSink {
    /// Create a connected sink/receiver pair plus the consumer's detach flag.
    pub(crate) fn channel() -> (Self, Receiver<DecodeEvent>, Arc<AtomicBool>) {
        let (tx, rx) = std::sync::mpsc::channel();
        let detached = Arc::new(AtomicBool::new(false));
        let sink = Self {
            tx,
            detached: Arc::clone(&detached),
        };
        (sink, rx, detached)
    }

    /// Report the full image dimensions. Must precede any row delivery.
    pub fn dimensions(&self, width: u32, height: u32) {
        if !self.is_detached() {
            let _ = self.tx.send(DecodeEvent::Dimensions { width, height });
        }
    }

    /// Deliver `height` complete rows starting at row `y`, columns
    /// `[x, x + width)`.
    pub fn rows(&self, x: u32, y: u32, width: u32, height: u32, pixels: RowPixels) {
        if !self.is_detached() {
            let _ = self.tx.send(DecodeEvent::Rows {
                x,
                y,
                width,
                height,
                pixels,
            });
        }
    }

    /// Report the end of production. Always delivered, even after detach,
    /// so the consumer can unblock promptly.
    pub fn complete(&self, status: CompletionStatus) {
        let _ = self.tx.send(DecodeEvent::Complete(status));
    }

    /// Whether the consumer has asked production to stop.
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }
}
