use thiserror::Error;

/// Configuration errors that abort a decode session before it starts.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A region was constructed with a zero dimension
    #[error("Region must have non-zero dimensions, got {width}x{height}")]
    EmptyRegion { width: u32, height: u32 },

    /// The encoded stream declares a zero width or height
    #[error("Declared image dimensions are invalid: {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// The adapter's single decode pass has already been run
    #[error("Decode session already consumed; create a new adapter")]
    SessionExhausted,
}

/// I/O errors from a byte source.
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Requested range exceeds source bounds
    #[error("Read out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    ReadOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Seek target lies past the end of the source
    #[error("Seek out of bounds: position {position}, size is {size}")]
    SeekOutOfBounds { position: u64, size: u64 },

    /// The producer reported a read failure it could not recover from
    #[error("Source error: {0}")]
    Source(String),
}

/// Errors from the block compression codec.
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// Compression of a completed row-block failed
    #[error("Block compression failed: {message}")]
    Encode { message: String },

    /// Decompression of a stored row-block failed
    #[error("Block decompression failed: {message}")]
    Decode { message: String },

    /// Pixel layout options the codec cannot represent
    #[error("Unsupported pixel layout: {message}")]
    UnsupportedLayout { message: String },
}

/// Errors answering a rectangular read query against the block store.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// No stored block intersects the requested rectangle
    #[error("No stored block intersects ({x},{y}) {width}x{height}")]
    NotCached {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// The rectangle intersects more than one stored block
    #[error("Query ({x},{y}) {width}x{height} spans {matches} stored blocks")]
    SpansBlocks {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        matches: usize,
    },

    /// The rectangle is only partially covered by the matched block
    #[error("Query ({x},{y}) {width}x{height} is not fully covered by the matched block")]
    OutOfCoverage {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Codec failure while compressing or decompressing a block
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}
