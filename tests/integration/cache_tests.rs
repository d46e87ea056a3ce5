//! Row-block cache behavior through the public API.

use tile_streamer::{
    CacheError, CodecOptions, DeflateBlockCodec, RawBlockCodec, Region, TileCache, ROW_COUNT,
};

use super::test_utils::gradient;

fn fill_gradient(cache: &mut TileCache, rows: u32, width: u32) {
    for y in 0..rows {
        let row: Vec<u8> = (0..width).map(|x| gradient(x, y)).collect();
        cache.add_row(&row, 0, y, width, 1).unwrap();
    }
}

// =============================================================================
// Segmentation
// =============================================================================

#[test]
fn test_full_image_segments_into_row_count_blocks() {
    let mut cache = TileCache::new(
        0,
        0,
        Box::new(DeflateBlockCodec::new()),
        CodecOptions::default(),
    );
    cache.set_image_height(256);
    fill_gradient(&mut cache, 256, 256);

    assert_eq!(
        cache.regions(),
        vec![
            Region::new(0, 0, 256, ROW_COUNT).unwrap(),
            Region::new(0, ROW_COUNT, 256, ROW_COUNT).unwrap(),
        ]
    );
}

#[test]
fn test_trailing_partial_block() {
    let mut cache = TileCache::new(
        0,
        0,
        Box::new(RawBlockCodec::new()),
        CodecOptions::default(),
    );
    cache.set_image_height(ROW_COUNT + 1);
    fill_gradient(&mut cache, ROW_COUNT + 1, 64);

    let regions = cache.regions();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].height, ROW_COUNT);
    assert_eq!(regions[1].height, 1);
}

// =============================================================================
// Reads
// =============================================================================

#[test]
fn test_read_is_byte_exact_within_one_block() {
    let mut cache = TileCache::new(
        0,
        0,
        Box::new(DeflateBlockCodec::new()),
        CodecOptions::default(),
    );
    cache.set_image_height(256);
    fill_gradient(&mut cache, 256, 256);

    let out = cache.get(10, 5, 20, 3).unwrap();
    assert_eq!(out.len(), 60);
    for row in 0..3u32 {
        for col in 0..20u32 {
            assert_eq!(out[(row * 20 + col) as usize], gradient(10 + col, 5 + row));
        }
    }
}

#[test]
fn test_boundary_straddling_read_is_deterministically_rejected() {
    let mut cache = TileCache::new(
        0,
        0,
        Box::new(RawBlockCodec::new()),
        CodecOptions::default(),
    );
    cache.set_image_height(256);
    fill_gradient(&mut cache, 256, 64);

    // Rows 120..136 cross the block boundary at row 128
    for _ in 0..3 {
        let result = cache.get(0, 120, 16, 16);
        assert!(matches!(
            result,
            Err(CacheError::SpansBlocks { matches: 2, .. })
        ));
    }
}

#[test]
fn test_miss_and_coverage_errors() {
    let mut cache = TileCache::new(
        0,
        0,
        Box::new(RawBlockCodec::new()),
        CodecOptions::default(),
    );
    cache.set_image_height(64);
    fill_gradient(&mut cache, 64, 64);

    assert!(matches!(
        cache.get(0, 100, 4, 4),
        Err(CacheError::NotCached { .. })
    ));
    // Intersects the block but runs off its right edge
    assert!(matches!(
        cache.get(60, 0, 16, 4),
        Err(CacheError::OutOfCoverage { .. })
    ));
}

#[test]
fn test_windowed_cache_serves_window_coordinates() {
    // Window rows 200..264 of a tall image
    let mut cache = TileCache::new(
        200,
        64,
        Box::new(DeflateBlockCodec::new()),
        CodecOptions::default(),
    );
    cache.set_image_height(1000);

    for y in 200..264 {
        let row: Vec<u8> = (0..32).map(|x| gradient(x, y)).collect();
        cache.add_row(&row, 0, y, 32, 1).unwrap();
    }

    assert_eq!(cache.regions(), vec![Region::new(0, 200, 32, 64).unwrap()]);

    let out = cache.get(4, 230, 8, 2).unwrap();
    for row in 0..2u32 {
        for col in 0..8u32 {
            assert_eq!(out[(row * 8 + col) as usize], gradient(4 + col, 230 + row));
        }
    }
}
