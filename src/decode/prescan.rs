//! Advisory header pre-scan.
//!
//! Before committing to a full decode pass, the adapter walks the encoded
//! stream's marker-segment structure looking for the first dimension-bearing
//! segment, solely to confirm the declared width and height are non-zero.
//! The scan is best-effort: unrecognized segments are skipped by their
//! declared length, I/O failures are swallowed, and the stream position and
//! byte order are restored before returning.

use tracing::debug;

use crate::error::{ConfigError, IoError};
use crate::io::ByteSource;

/// Marker value introducing a dimension-bearing (start-of-frame) segment.
const SOF0: u16 = 0xFFC0;

/// Smallest value a marker code can take; anything lower is entropy data.
const MARKER_FLOOR: u16 = 0xFF00;

/// Scan the stream for its declared dimensions and fail if either is zero.
///
/// Returns `Ok(())` when the dimensions are non-zero or could not be located
/// at all (the scan never blocks a decode attempt on its own). The stream is
/// left at its original position and byte order in every case.
///
/// # Errors
///
/// [`ConfigError::ZeroDimensions`] if the first start-of-frame segment
/// declares a zero width or height.
pub(crate) fn prescan_dimensions(source: &mut dyn ByteSource) -> Result<(), ConfigError> {
    let saved_position = source.position();
    let saved_order = source.little_endian();
    source.set_little_endian(false);

    let scanned = scan_for_frame(source);

    // Best-effort restore; a source that cannot seek back to where it was
    // will surface the problem on the decode pass proper.
    if source.seek(saved_position).is_err() {
        debug!("could not restore stream position after header pre-scan");
    }
    source.set_little_endian(saved_order);

    match scanned {
        Ok(Some((width, height))) if width == 0 || height == 0 => {
            Err(ConfigError::ZeroDimensions { width, height })
        }
        Ok(Some((width, height))) => {
            debug!(width, height, "pre-scan found declared dimensions");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            // Advisory only: an unreadable header never aborts initialization
            debug!(error = %e, "header pre-scan failed, proceeding anyway");
            Ok(())
        }
    }
}

/// Walk marker segments until the first start-of-frame segment or the end of
/// the stream. Returns the declared `(width, height)` if one was found.
fn scan_for_frame(source: &mut dyn ByteSource) -> Result<Option<(u32, u32)>, IoError> {
    while source.position() + 1 < source.len() {
        let code = source.read_u16()?;
        let length = source.read_u16()? as u64;
        let pointer = source.position();

        // Not a marker boundary: step one byte forward and resynchronize
        if length > MARKER_FLOOR as u64 || code < MARKER_FLOOR {
            source.seek(pointer - 3)?;
            continue;
        }

        if code == SOF0 {
            // Precision byte, then height and width, big-endian
            source.skip(1)?;
            let height = source.read_u16()? as u32;
            let width = source.read_u16()? as u32;
            return Ok(Some((width, height)));
        }

        // Skip the segment body by its declared length (which includes the
        // two length bytes themselves)
        let next = (pointer + length).saturating_sub(2);
        if next < source.len() {
            source.seek(next)?;
        } else {
            break;
        }
    }
    Ok(None)
}
