//! Shared helpers for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use bytes::Bytes;

use tile_streamer::error::IoError;
use tile_streamer::{CompletionStatus, MemorySource, PushDecoder, RowPixels, RowSink};

/// Install the log subscriber for the test process. Safe to call from every
/// test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic sample value for pixel (x, y) of the synthetic gradient
/// image the mock decoders produce.
pub fn gradient(x: u32, y: u32) -> u8 {
    ((x + 3 * y) % 251) as u8
}

/// An encoded stream whose header declares the given dimensions, as the
/// adapter's pre-scan expects to find them.
pub fn encoded_stream(width: u16, height: u16) -> Box<MemorySource> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0u8; 64]);
    Box::new(MemorySource::new(data))
}

/// Mock push decoder that produces a grayscale gradient image from a thread
/// it owns, one row per delivery, honoring the sink's detach flag.
///
/// Tracks how many rows it actually produced so tests can assert that
/// cancellation stopped production early.
pub struct ThreadedGradientDecoder {
    width: u32,
    height: u32,
    produced: Arc<AtomicU32>,
}

impl ThreadedGradientDecoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            produced: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Shared counter of rows delivered before the producer stopped.
    pub fn produced_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.produced)
    }
}

impl PushDecoder for ThreadedGradientDecoder {
    fn start_production(&mut self, _encoded: Bytes, sink: RowSink) -> Result<(), IoError> {
        let width = self.width;
        let height = self.height;
        let produced = Arc::clone(&self.produced);

        thread::spawn(move || {
            sink.dimensions(width, height);
            for y in 0..height {
                if sink.is_detached() {
                    sink.complete(CompletionStatus::ImageAborted);
                    return;
                }
                let row: Vec<u8> = (0..width).map(|x| gradient(x, y)).collect();
                sink.rows(
                    0,
                    y,
                    width,
                    1,
                    RowPixels::Bytes {
                        data: row,
                        channels: 1,
                    },
                );
                produced.fetch_add(1, Ordering::SeqCst);
            }
            sink.complete(CompletionStatus::ImageComplete);
        });

        Ok(())
    }
}

/// Mock decoder whose producer thread fails partway through the image.
pub struct FailingDecoder {
    width: u32,
    fail_at_row: u32,
}

impl FailingDecoder {
    pub fn new(width: u32, fail_at_row: u32) -> Self {
        Self { width, fail_at_row }
    }
}

impl PushDecoder for FailingDecoder {
    fn start_production(&mut self, _encoded: Bytes, sink: RowSink) -> Result<(), IoError> {
        let width = self.width;
        let fail_at_row = self.fail_at_row;

        thread::spawn(move || {
            sink.dimensions(width, 1000);
            for y in 0..fail_at_row {
                let row: Vec<u8> = (0..width).map(|x| gradient(x, y)).collect();
                sink.rows(
                    0,
                    y,
                    width,
                    1,
                    RowPixels::Bytes {
                        data: row,
                        channels: 1,
                    },
                );
            }
            sink.complete(CompletionStatus::ImageError(
                "corrupt entropy-coded segment".to_string(),
            ));
        });

        Ok(())
    }
}
