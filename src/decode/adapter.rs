use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use super::prescan::prescan_dimensions;
use super::push::{CompletionStatus, DecodeEvent, PushDecoder, RowPixels, RowSink};
use crate::codec::{BlockCodec, CodecOptions};
use crate::error::ConfigError;
use crate::io::ByteSource;
use crate::tile::TileCache;

// =============================================================================
// Session State
// =============================================================================

/// Lifecycle of one decode session.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    /// No source attached yet
    Idle,
    /// Walking the header for declared dimensions
    Prescanning,
    /// Production started, dimensions not yet reported
    AwaitingDimensions,
    /// Rows are being accepted into the cache
    Accumulating,
    /// The window was satisfied or the producer finished
    Complete,
    /// An error was recorded; queries return nothing
    Failed(String),
}

// =============================================================================
// Tile Decoder
// =============================================================================

/// Adapter that runs one forward pass of a push-style decoder and caches the
/// delivered rows for random access.
///
/// A `TileDecoder` owns the byte source and the injected [`PushDecoder`],
/// restricts accepted rows to a caller-chosen vertical window, and feeds them
/// into a [`TileCache`]. After [`initialize`](Self::initialize) returns, the
/// cached rows can be read in arbitrary rectangles via
/// [`scanline`](Self::scanline) and [`get_region`](Self::get_region).
///
/// # Blocking contract
///
/// `initialize` is synchronous: it returns only once the producer has
/// completed or failed, even when the decoder delivers rows from a thread it
/// owns. A producer that never completes nor drops its sink leaves
/// `initialize` blocked indefinitely; no timeout is applied.
///
/// # One session per instance
///
/// The decoder supports exactly one production pass. Queries must not be
/// issued until `initialize` has returned; there is no concurrent
/// reader/writer support.
pub struct TileDecoder {
    decoder: Box<dyn PushDecoder>,
    codec: Option<Box<dyn BlockCodec>>,
    base_options: CodecOptions,

    source: Option<Box<dyn ByteSource>>,
    cache: Option<TileCache>,
    state: SessionState,

    width: u32,
    height: u32,
}

impl TileDecoder {
    /// Create an adapter around a push decoder and a block codec.
    ///
    /// Uses the default session pixel layout (8-bit unsigned interleaved
    /// big-endian samples).
    pub fn new(decoder: Box<dyn PushDecoder>, codec: Box<dyn BlockCodec>) -> Self {
        Self::with_options(decoder, codec, CodecOptions::default())
    }

    /// Create an adapter with explicit session base options.
    pub fn with_options(
        decoder: Box<dyn PushDecoder>,
        codec: Box<dyn BlockCodec>,
        base_options: CodecOptions,
    ) -> Self {
        Self {
            decoder,
            codec: Some(codec),
            base_options,
            source: None,
            cache: None,
            state: SessionState::Idle,
            width: 0,
            height: 0,
        }
    }

    /// Run the single decode pass over `source`, accepting only rows in
    /// `[window_y, window_y + window_height)`.
    ///
    /// A `window_height` of 0 selects everything from `window_y` to the end
    /// of the image. Blocks until the producer completes or fails; producer
    /// and I/O failures are recorded and surfaced as absent results from the
    /// query methods, not returned here.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroDimensions`] if the stream's header declares a
    ///   zero width or height (checked before any row is requested)
    /// - [`ConfigError::SessionExhausted`] if this adapter already ran its
    ///   decode pass
    pub fn initialize(
        &mut self,
        mut source: Box<dyn ByteSource>,
        window_y: u32,
        window_height: u32,
    ) -> Result<(), ConfigError> {
        let codec = self.codec.take().ok_or(ConfigError::SessionExhausted)?;

        self.state = SessionState::Prescanning;
        if let Err(e) = prescan_dimensions(source.as_mut()) {
            self.state = SessionState::Failed(e.to_string());
            return Err(e);
        }

        self.cache = Some(TileCache::new(
            window_y,
            window_height,
            codec,
            self.base_options,
        ));
        self.state = SessionState::AwaitingDimensions;

        let encoded = match source.read_remaining() {
            Ok(encoded) => Bytes::from(encoded),
            Err(e) => {
                warn!(error = %e, "reading encoded stream failed");
                self.state = SessionState::Failed(e.to_string());
                self.source = Some(source);
                return Ok(());
            }
        };
        self.source = Some(source);

        let (sink, rx, detached) = RowSink::channel();
        if let Err(e) = self.decoder.start_production(encoded, sink) {
            warn!(error = %e, "decoder failed to start production");
            self.state = SessionState::Failed(e.to_string());
            return Ok(());
        }

        // Consume the event stream on this thread. The producer only hands
        // off data; all cache mutation happens here.
        let mut window_end: Option<u64> = if window_height > 0 {
            Some(window_y as u64 + window_height as u64)
        } else {
            None
        };

        while let Ok(event) = rx.recv() {
            match event {
                DecodeEvent::Dimensions { width, height } => {
                    self.width = width;
                    self.height = height;
                    if let Some(cache) = self.cache.as_mut() {
                        cache.set_image_height(height);
                    }
                    if window_end.is_none() {
                        window_end = Some(window_y as u64 + height as u64);
                    }
                    if self.state == SessionState::AwaitingDimensions {
                        self.state = SessionState::Accumulating;
                    }
                }
                DecodeEvent::Rows {
                    x,
                    y,
                    width,
                    height,
                    pixels,
                } => {
                    self.accept_rows(x, y, width, height, pixels, window_y, window_end, &detached);
                }
                DecodeEvent::Complete(status) => {
                    match status {
                        CompletionStatus::ImageError(message) => {
                            warn!(error = %message, "producer reported a decode error");
                            self.state = SessionState::Failed(message);
                        }
                        CompletionStatus::ImageComplete | CompletionStatus::ImageAborted => {
                            if !matches!(self.state, SessionState::Failed(_)) {
                                self.state = SessionState::Complete;
                            }
                        }
                    }
                    break;
                }
            }
        }

        // Producer dropped its sink without an explicit completion: natural
        // end of production.
        if matches!(
            self.state,
            SessionState::AwaitingDimensions | SessionState::Accumulating
        ) {
            self.state = SessionState::Complete;
        }
        Ok(())
    }

    /// Window-filter one row delivery and forward the accepted rows.
    #[allow(clippy::too_many_arguments)]
    fn accept_rows(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: RowPixels,
        window_y: u32,
        window_end: Option<u64>,
        detached: &Arc<AtomicBool>,
    ) {
        if matches!(self.state, SessionState::Failed(_) | SessionState::Complete) {
            // Rows still in flight after cancellation or failure
            return;
        }
        let Some(cache) = self.cache.as_mut() else {
            return;
        };

        for r in 0..height {
            let row_y = y + r;
            if let Some(end) = window_end {
                if row_y as u64 >= end {
                    // Window satisfied: ask the producer to stop and discard
                    // whatever else arrives
                    debug!(row = row_y, "window satisfied, detaching from producer");
                    detached.store(true, Ordering::Release);
                    self.state = SessionState::Complete;
                    return;
                }
            }
            if row_y < window_y {
                continue;
            }

            if self.height > 0 {
                debug!(row = row_y, total = self.height, "storing row");
            }

            let result = match &pixels {
                RowPixels::Bytes { data, channels } => {
                    let row_len = width as usize * *channels as usize;
                    let start = r as usize * row_len;
                    if start + row_len > data.len() {
                        warn!(row = row_y, "row delivery shorter than declared, dropping");
                        continue;
                    }
                    cache.add_row(&data[start..start + row_len], x, row_y, width, *channels)
                }
                RowPixels::Packed(words) => {
                    let start = r as usize * width as usize;
                    if start + width as usize > words.len() {
                        warn!(row = row_y, "row delivery shorter than declared, dropping");
                        continue;
                    }
                    cache.add_packed_row(&words[start..start + width as usize], x, row_y, width)
                }
            };

            if let Err(e) = result {
                warn!(error = %e, row = row_y, "storing row failed, aborting session");
                detached.store(true, Ordering::Release);
                self.state = SessionState::Failed(e.to_string());
                return;
            }
        }
    }

    /// Read one full-width scanline.
    ///
    /// Returns `None` if the session failed, the row is outside the cached
    /// window, or the read crosses a block boundary; the underlying cause is
    /// logged at debug level.
    pub fn scanline(&mut self, y: u32) -> Option<Vec<u8>> {
        let width = self.width;
        self.get_region(0, y, width, 1)
    }

    /// Read an arbitrary rectangle from the cached rows.
    ///
    /// Same absence semantics as [`scanline`](Self::scanline).
    pub fn get_region(&mut self, x: u32, y: u32, w: u32, h: u32) -> Option<Vec<u8>> {
        if let SessionState::Failed(message) = &self.state {
            debug!(error = %message, "query against a failed session");
            return None;
        }
        let cache = self.cache.as_mut()?;
        match cache.get(x, y, w, h) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!(error = %e, x, y, w, h, "region query failed");
                None
            }
        }
    }

    /// Full image width, valid once the producer has reported dimensions.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Full image height, valid once the producer has reported dimensions.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Message recorded when the session failed, if it did.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Release the byte source and all cached buffers. Idempotent.
    pub fn close(&mut self) {
        self.source = None;
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
        self.cache = None;
    }
}

impl Drop for TileDecoder {
    fn drop(&mut self) {
        self.close();
    }
}

// =============================================================================
// Tests
// =============================================================================
