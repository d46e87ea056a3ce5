//! Compressed row-block cache.
//!
//! This module turns a row-ordered, possibly-windowed stream of pixel data
//! into a queryable, memory-bounded store. Rows are accumulated into a single
//! growable buffer; every time the open block reaches [`ROW_COUNT`] rows (or
//! the image/window ends) the buffer is compressed and stored as one block
//! keyed by its [`Region`]. Peak uncompressed memory is therefore roughly one
//! row-block, not the whole image.
//!
//! # Query model
//!
//! [`TileCache::get`] answers arbitrary rectangular reads by locating the one
//! stored block that intersects the request, decompressing it (with a
//! single-slot cache for locality between nearby reads), and slicing out the
//! requested rectangle. A request that intersects no block, more than one
//! block, or reaches outside its matched block fails; partial data is never
//! returned.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::codec::{BlockCodec, CodecOptions};
use crate::error::{CacheError, CodecError};
use crate::region::Region;

/// Rows accumulated per stored block.
pub const ROW_COUNT: u32 = 128;

// =============================================================================
// Compressed Block
// =============================================================================

/// One stored row-block: its region, compressed bytes, and the pixel-layout
/// options in effect when it was compressed.
#[derive(Debug, Clone)]
struct CompressedBlock {
    region: Region,
    data: Bytes,
    options: CodecOptions,
}

// =============================================================================
// Tile Cache
// =============================================================================

/// Accumulates pixel rows into compressed row-blocks and answers rectangular
/// read queries against them.
///
/// # Contract
///
/// Rows must be added in strictly increasing row order, each row exactly
/// once. The cache performs no reordering and does not verify this; it is the
/// producer's obligation.
///
/// A cache serves exactly one decode session: an accumulation phase (rows
/// added by the producer) followed by a query phase. No rows may be added
/// once queries begin.
pub struct TileCache {
    /// First row of the configured vertical window
    window_y: u32,
    /// Height of the window; 0 until resolved against the image height
    window_height: u32,
    /// Full image height; 0 until the producer reports dimensions
    image_height: u32,

    codec: Box<dyn BlockCodec>,
    base_options: CodecOptions,

    /// Stored blocks in row order (rows arrive ordered, so blocks do too)
    blocks: Vec<CompressedBlock>,

    /// Raw rows of the block currently being built
    accumulator: BytesMut,
    /// Rows currently in the accumulator
    open_rows: u32,

    /// Single-slot cache of the most recently decompressed block
    decompressed: Option<(Region, Bytes)>,
}

impl TileCache {
    /// Create a cache for one decode session.
    ///
    /// # Arguments
    ///
    /// * `window_y` - First image row to accept
    /// * `window_height` - Number of rows to accept; 0 means "to the end of
    ///   the image" (resolved when [`set_image_height`](Self::set_image_height)
    ///   is called)
    /// * `codec` - Compression applied to each completed block
    /// * `base_options` - Session-wide pixel layout (bits per sample,
    ///   signedness, interleaving, byte order); width, height and channel
    ///   count are overwritten per block at flush time
    pub fn new(
        window_y: u32,
        window_height: u32,
        codec: Box<dyn BlockCodec>,
        base_options: CodecOptions,
    ) -> Self {
        Self {
            window_y,
            window_height,
            image_height: 0,
            codec,
            base_options,
            blocks: Vec::new(),
            accumulator: BytesMut::new(),
            open_rows: 0,
            decompressed: None,
        }
    }

    /// Record the full image height reported by the producer.
    ///
    /// Resolves a zero window height to the full image height and arms the
    /// "last row of the image" flush condition.
    pub fn set_image_height(&mut self, height: u32) {
        self.image_height = height;
        if self.window_height == 0 {
            self.window_height = height;
        }
    }

    /// Exclusive end row of the window, once resolved.
    fn window_end(&self) -> Option<u64> {
        if self.window_height == 0 {
            None
        } else {
            Some(self.window_y as u64 + self.window_height as u64)
        }
    }

    /// Append one row of interleaved 8-bit samples.
    ///
    /// `pixels` must hold at least `row_width * channels` bytes; exactly that
    /// many are consumed. Flushes the open block when it reaches
    /// [`ROW_COUNT`] rows, or when `row_y` is the last row of the image or of
    /// the window.
    ///
    /// # Errors
    ///
    /// [`CodecError::Encode`] if compressing a completed block fails. The
    /// session cannot continue past a failed flush.
    pub fn add_row(
        &mut self,
        pixels: &[u8],
        origin_x: u32,
        row_y: u32,
        row_width: u32,
        channels: u32,
    ) -> Result<(), CodecError> {
        let row_len = row_width as usize * channels as usize;
        if row_len == 0 {
            return Ok(());
        }
        debug_assert!(pixels.len() >= row_len);

        self.accumulator.extend_from_slice(&pixels[..row_len]);
        self.open_rows += 1;

        let last_of_image = self.image_height > 0 && row_y as u64 + 1 == self.image_height as u64;
        let last_of_window = self.window_end() == Some(row_y as u64 + 1);

        if self.open_rows == ROW_COUNT || last_of_image || last_of_window {
            self.flush(origin_x, row_y, row_width, channels)?;
        }
        Ok(())
    }

    /// Append one row of packed pixels, one 32-bit word per pixel carrying
    /// red, green and blue in its low three bytes.
    ///
    /// Each word is unpacked to 3 interleaved 8-bit samples (R, G, B) before
    /// accumulation; the block is stored with `channels = 3`.
    pub fn add_packed_row(
        &mut self,
        pixels: &[u32],
        origin_x: u32,
        row_y: u32,
        row_width: u32,
    ) -> Result<(), CodecError> {
        let count = (row_width as usize).min(pixels.len());
        let mut unpacked = vec![0u8; count * 3];
        for (i, &word) in pixels[..count].iter().enumerate() {
            unpacked[i * 3] = ((word >> 16) & 0xFF) as u8;
            unpacked[i * 3 + 1] = ((word >> 8) & 0xFF) as u8;
            unpacked[i * 3 + 2] = (word & 0xFF) as u8;
        }
        self.add_row(&unpacked, origin_x, row_y, count as u32, 3)
    }

    /// Compress and store the open block, then reset the accumulator.
    fn flush(
        &mut self,
        origin_x: u32,
        last_row_y: u32,
        row_width: u32,
        channels: u32,
    ) -> Result<(), CodecError> {
        // row_width and open_rows are both non-zero here
        let region = Region {
            x: origin_x,
            y: last_row_y + 1 - self.open_rows,
            width: row_width,
            height: self.open_rows,
        };

        let mut options = self.base_options;
        options.width = row_width;
        options.height = self.open_rows;
        options.channels = channels;

        let compressed = self.codec.compress(&self.accumulator, &options)?;
        debug!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            raw_len = self.accumulator.len(),
            compressed_len = compressed.len(),
            "stored row-block"
        );

        self.blocks.push(CompressedBlock {
            region,
            data: compressed,
            options,
        });
        self.accumulator.clear();
        self.open_rows = 0;
        Ok(())
    }

    /// Read the rectangle `(x, y, w, h)` from the stored blocks.
    ///
    /// Returns a freshly allocated buffer of `w * h * bytes_per_pixel` bytes,
    /// row-major, sliced from the single stored block that covers the
    /// rectangle.
    ///
    /// # Errors
    ///
    /// - [`CacheError::NotCached`] if no stored block intersects the
    ///   rectangle (including zero-sized rectangles, which match nothing)
    /// - [`CacheError::SpansBlocks`] if more than one block intersects it;
    ///   a read straddling a block boundary is rejected deterministically
    ///   rather than served from an arbitrary block
    /// - [`CacheError::OutOfCoverage`] if the matched block does not fully
    ///   contain the rectangle; partial data is never returned
    /// - [`CacheError::Codec`] if decompressing the block fails
    pub fn get(&mut self, x: u32, y: u32, w: u32, h: u32) -> Result<Vec<u8>, CacheError> {
        let query = match Region::new(x, y, w, h) {
            Ok(query) => query,
            Err(_) => {
                return Err(CacheError::NotCached {
                    x,
                    y,
                    width: w,
                    height: h,
                })
            }
        };

        let mut matched: Option<usize> = None;
        let mut matches = 0usize;
        for (idx, block) in self.blocks.iter().enumerate() {
            if block.region.intersects(&query) {
                matches += 1;
                matched = Some(idx);
            }
        }

        let idx = match (matches, matched) {
            (0, _) | (_, None) => {
                return Err(CacheError::NotCached {
                    x,
                    y,
                    width: w,
                    height: h,
                })
            }
            (1, Some(idx)) => idx,
            (n, Some(_)) => {
                return Err(CacheError::SpansBlocks {
                    x,
                    y,
                    width: w,
                    height: h,
                    matches: n,
                })
            }
        };

        let region = self.blocks[idx].region;
        let options = self.blocks[idx].options;
        if !region.contains_rect(&query) {
            return Err(CacheError::OutOfCoverage {
                x,
                y,
                width: w,
                height: h,
            });
        }

        // Single-slot decompressed cache: reuse the raw bytes if the last
        // query resolved to the same block.
        let raw: Bytes = match &self.decompressed {
            Some((cached, data)) if *cached == region => data.clone(),
            _ => {
                debug!(x = region.x, y = region.y, "decompressing row-block");
                let raw = self.codec.decompress(&self.blocks[idx].data, &options)?;
                self.decompressed = Some((region, raw.clone()));
                raw
            }
        };

        let bpp = options.bytes_per_pixel();
        let stride = region.width as usize * bpp;
        let out_row = w as usize * bpp;
        let mut out = Vec::with_capacity(out_row * h as usize);

        for i in 0..h as usize {
            let src_row = (y as usize + i) - region.y as usize;
            let src_col = (x as usize - region.x as usize) * bpp;
            let start = src_row * stride + src_col;
            let end = start + out_row;
            if end > raw.len() {
                // The block is shorter than its recorded geometry promises
                return Err(CacheError::OutOfCoverage {
                    x,
                    y,
                    width: w,
                    height: h,
                });
            }
            out.extend_from_slice(&raw[start..end]);
        }

        Ok(out)
    }

    /// Number of stored blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Regions of the stored blocks, in storage (row) order.
    pub fn regions(&self) -> Vec<Region> {
        self.blocks.iter().map(|b| b.region).collect()
    }

    /// Drop all stored blocks and cached buffers.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.accumulator.clear();
        self.open_rows = 0;
        self.decompressed = None;
    }
}

// =============================================================================
// Tests
// =============================================================================
