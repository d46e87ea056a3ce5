//! Axis-aligned rectangle value type.
//!
//! [`Region`] identifies a rectangular pixel area and serves as the key for
//! stored row-blocks in the tile cache. It carries no ownership of pixel
//! data; it is a plain value with equality, hashing and an intersection
//! predicate.

use crate::error::ConfigError;

/// An immutable axis-aligned rectangle in pixel coordinates.
///
/// Both dimensions are guaranteed non-zero by construction. Intervals are
/// half-open: a region covers columns `[x, x + width)` and rows
/// `[y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Leftmost column
    pub x: u32,

    /// Topmost row
    pub y: u32,

    /// Width in pixels (non-zero)
    pub width: u32,

    /// Height in pixels (non-zero)
    pub height: u32,
}

impl Region {
    /// Create a new region.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRegion`] if `width` or `height` is zero.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyRegion { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Exclusive right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Check whether two regions share at least one pixel.
    ///
    /// Standard half-open interval overlap test on both axes.
    pub fn intersects(&self, other: &Region) -> bool {
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }

    /// Check whether `other` lies entirely inside this region.
    pub fn contains_rect(&self, other: &Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
