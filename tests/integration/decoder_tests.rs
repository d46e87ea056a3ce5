//! End-to-end decode session tests with producers on their own threads.

use std::sync::atomic::Ordering;
use std::time::Duration;

use tile_streamer::{ConfigError, DeflateBlockCodec, RawBlockCodec, TileDecoder};

use super::test_utils::{
    encoded_stream, gradient, init_tracing, FailingDecoder, ThreadedGradientDecoder,
};

// =============================================================================
// Full Sessions
// =============================================================================

#[test]
fn test_threaded_full_image_session() {
    init_tracing();
    let decoder = ThreadedGradientDecoder::new(64, 300);
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(DeflateBlockCodec::new()));

    adapter.initialize(encoded_stream(64, 300), 0, 0).unwrap();

    assert_eq!(adapter.width(), 64);
    assert_eq!(adapter.height(), 300);

    // Rows from every stored block read back byte-exactly
    for &y in &[0, 127, 128, 255, 256, 299] {
        let row = adapter.scanline(y).unwrap();
        assert_eq!(row.len(), 64);
        for (x, &v) in row.iter().enumerate() {
            assert_eq!(v, gradient(x as u32, y), "row {y} col {x}");
        }
    }
}

#[test]
fn test_windowed_session_clips_rows() {
    init_tracing();
    let decoder = ThreadedGradientDecoder::new(32, 400);
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(RawBlockCodec::new()));

    adapter.initialize(encoded_stream(32, 400), 100, 64).unwrap();

    // Every row inside the window is readable and exact
    for y in 100..164 {
        let row = adapter.scanline(y).unwrap();
        assert_eq!(row[5], gradient(5, y));
    }
    // Rows outside the window were never stored
    assert!(adapter.scanline(99).is_none());
    assert!(adapter.scanline(164).is_none());
    assert!(adapter.scanline(399).is_none());
}

#[test]
fn test_window_satisfaction_cancels_production() {
    init_tracing();
    let decoder = ThreadedGradientDecoder::new(16, 100_000);
    let produced = decoder.produced_counter();
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(RawBlockCodec::new()));

    adapter.initialize(encoded_stream(16, 512), 0, 64).unwrap();

    // Give the producer thread a moment to observe the detach flag and exit
    std::thread::sleep(Duration::from_millis(50));

    // Cancellation is best-effort: some rows beyond the window may have been
    // produced before the flag was observed, but production must stop far
    // short of the full image.
    let rows = produced.load(Ordering::SeqCst);
    assert!(rows >= 64, "window must be fully produced, got {rows}");
    assert!(rows < 10_000, "producer kept running, produced {rows} rows");

    assert!(adapter.scanline(32).is_some());
}

// =============================================================================
// Region Reads
// =============================================================================

#[test]
fn test_region_reads_after_threaded_session() {
    init_tracing();
    let decoder = ThreadedGradientDecoder::new(256, 256);
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(DeflateBlockCodec::new()));

    adapter.initialize(encoded_stream(256, 256), 0, 0).unwrap();

    let rect = adapter.get_region(10, 5, 20, 3).unwrap();
    assert_eq!(rect.len(), 20 * 3);
    for row in 0..3u32 {
        for col in 0..20u32 {
            assert_eq!(
                rect[(row * 20 + col) as usize],
                gradient(10 + col, 5 + row)
            );
        }
    }

    // A rectangle straddling the 128-row block boundary is rejected
    assert!(adapter.get_region(0, 120, 16, 16).is_none());
}

#[test]
fn test_repeated_reads_identical_across_block_swaps() {
    init_tracing();
    let decoder = ThreadedGradientDecoder::new(128, 256);
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(DeflateBlockCodec::new()));

    adapter.initialize(encoded_stream(128, 256), 0, 0).unwrap();

    let first = adapter.get_region(40, 60, 8, 4).unwrap();
    // Swap the decompressed slot to the second block, then read again
    adapter.get_region(0, 200, 128, 1).unwrap();
    let second = adapter.get_region(40, 60, 8, 4).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Error Paths
// =============================================================================

#[test]
fn test_zero_dimension_header_fails_initialize() {
    init_tracing();
    let decoder = ThreadedGradientDecoder::new(16, 16);
    let produced = decoder.produced_counter();
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(RawBlockCodec::new()));

    let result = adapter.initialize(encoded_stream(0, 16), 0, 0);
    assert!(matches!(result, Err(ConfigError::ZeroDimensions { .. })));
    assert_eq!(produced.load(Ordering::SeqCst), 0);
}

#[test]
fn test_producer_failure_surfaces_as_absent_results() {
    init_tracing();
    let decoder = FailingDecoder::new(32, 10);
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(RawBlockCodec::new()));

    // The failure is recorded, not raised
    adapter.initialize(encoded_stream(32, 1000), 0, 0).unwrap();

    assert!(adapter.failure().is_some());
    assert!(adapter.scanline(0).is_none());
    assert!(adapter.get_region(0, 0, 4, 4).is_none());
}

#[test]
fn test_close_releases_cached_rows() {
    init_tracing();
    let decoder = ThreadedGradientDecoder::new(16, 16);
    let mut adapter = TileDecoder::new(Box::new(decoder), Box::new(RawBlockCodec::new()));

    adapter.initialize(encoded_stream(16, 16), 0, 0).unwrap();
    assert!(adapter.scanline(0).is_some());

    adapter.close();
    assert!(adapter.scanline(0).is_none());
    adapter.close(); // idempotent
}
