//! Remote canvas state
//!
//! A fixed-size grid of 3-3-2 packed cells painted from a browser. Every
//! accepted update publishes a fresh immutable [`CanvasSnapshot`]; readers
//! clone the `Arc` and never observe a half-written grid.

use crate::codec::decode_grid;
use crate::frame::ImageFrame;
use flate2::read::ZlibDecoder;
use parking_lot::RwLock;
use std::io::Read;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Immutable view of the canvas at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSnapshot {
    pub width: u32,
    pub height: u32,
    /// Row-major packed cells, `width * height` bytes
    pub cells: Vec<u8>,
    /// Server-side stamp in ms, strictly increasing per accepted update
    pub updated_at: u64,
    /// Client clock value carried by the accepted update
    pub client_timestamp: u64,
}

impl CanvasSnapshot {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; (width * height) as usize],
            updated_at: 0,
            client_timestamp: 0,
        }
    }

    /// Decode the cells into an RGB frame
    pub fn to_frame(&self) -> ImageFrame {
        decode_grid(&self.cells, self.width, self.height)
    }
}

/// Result of applying an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Accepted,
    /// Client timestamp older than the last accepted one
    Stale,
    /// Wrong row/column count or undecodable payload
    ShapeMismatch,
}

impl UpdateOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Shared remote canvas
pub struct RemoteCanvas {
    width: u32,
    height: u32,
    epoch: Instant,
    current: RwLock<Arc<CanvasSnapshot>>,
}

impl RemoteCanvas {
    /// Create a blank canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            epoch: Instant::now(),
            current: RwLock::new(Arc::new(CanvasSnapshot::blank(width, height))),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<CanvasSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Stamp of the last accepted update, 0 before the first one
    pub fn last_updated_at(&self) -> u64 {
        self.current.read().updated_at
    }

    /// Replace the grid from a list of rows
    pub fn update(&self, rows: &[Vec<u8>], client_timestamp: u64) -> UpdateOutcome {
        if rows.len() != self.height as usize
            || rows.iter().any(|row| row.len() != self.width as usize)
        {
            debug!(rows = rows.len(), "Canvas update has wrong shape");
            return UpdateOutcome::ShapeMismatch;
        }
        self.update_flat(rows.concat(), client_timestamp)
    }

    /// Replace the grid from row-major cells
    pub fn update_flat(&self, cells: Vec<u8>, client_timestamp: u64) -> UpdateOutcome {
        if cells.len() != self.cell_count() {
            debug!(len = cells.len(), "Canvas update has wrong length");
            return UpdateOutcome::ShapeMismatch;
        }

        let mut current = self.current.write();
        if client_timestamp < current.client_timestamp {
            debug!(
                client_timestamp,
                last = current.client_timestamp,
                "Dropping stale canvas update"
            );
            return UpdateOutcome::Stale;
        }

        let now = self.epoch.elapsed().as_millis() as u64;
        let updated_at = now.max(current.updated_at + 1);
        *current = Arc::new(CanvasSnapshot {
            width: self.width,
            height: self.height,
            cells,
            updated_at,
            client_timestamp,
        });
        UpdateOutcome::Accepted
    }

    /// Apply a network push
    ///
    /// The payload is a zlib stream inflating to exactly `width * height`
    /// bytes, or those bytes uncompressed.
    pub fn apply_push(&self, client_timestamp: u64, payload: &[u8]) -> UpdateOutcome {
        let expected = self.cell_count();

        let cells = match inflate(payload, expected) {
            Some(cells) if cells.len() == expected => cells,
            _ if payload.len() == expected => payload.to_vec(),
            _ => {
                debug!(len = payload.len(), "Canvas push is neither zlib nor raw grid");
                return UpdateOutcome::ShapeMismatch;
            }
        };

        self.update_flat(cells, client_timestamp)
    }

    fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}

/// Inflate at most `limit + 1` bytes so an oversized stream is detectable
/// without unbounded allocation
fn inflate(payload: &[u8], limit: usize) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(limit);
    ZlibDecoder::new(payload)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn rows(w: usize, h: usize, value: u8) -> Vec<Vec<u8>> {
        vec![vec![value; w]; h]
    }

    #[test]
    fn test_update_accepted_and_stamp_increases() {
        let canvas = RemoteCanvas::new(4, 4);
        assert_eq!(canvas.last_updated_at(), 0);

        assert_eq!(canvas.update(&rows(4, 4, 0xFF), 10), UpdateOutcome::Accepted);
        let first = canvas.last_updated_at();
        assert!(first > 0);

        assert_eq!(canvas.update(&rows(4, 4, 0xE0), 10), UpdateOutcome::Accepted);
        let second = canvas.last_updated_at();
        assert!(second > first);
        assert_eq!(canvas.snapshot().cells[0], 0xE0);
    }

    #[test]
    fn test_shape_mismatch_is_noop() {
        let canvas = RemoteCanvas::new(4, 4);
        canvas.update(&rows(4, 4, 1), 1);
        let before = canvas.snapshot();

        assert_eq!(canvas.update(&rows(4, 3, 2), 2), UpdateOutcome::ShapeMismatch);
        assert_eq!(canvas.update(&rows(3, 4, 2), 2), UpdateOutcome::ShapeMismatch);

        let mut ragged = rows(4, 4, 2);
        ragged[2].pop();
        assert_eq!(canvas.update(&ragged, 2), UpdateOutcome::ShapeMismatch);

        assert_eq!(canvas.snapshot(), before);
    }

    #[test]
    fn test_stale_timestamp_dropped() {
        let canvas = RemoteCanvas::new(2, 2);
        canvas.update(&rows(2, 2, 1), 100);
        let stamp = canvas.last_updated_at();

        assert_eq!(canvas.update(&rows(2, 2, 2), 99), UpdateOutcome::Stale);
        assert_eq!(canvas.last_updated_at(), stamp);
        assert_eq!(canvas.snapshot().cells, vec![1; 4]);
    }

    #[test]
    fn test_push_zlib_and_raw() {
        let canvas = RemoteCanvas::new(8, 8);
        let grid = vec![0x1C; 64];

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&grid).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(canvas.apply_push(1, &compressed), UpdateOutcome::Accepted);
        assert_eq!(canvas.snapshot().cells, grid);

        assert_eq!(canvas.apply_push(2, &[0xE0; 64]), UpdateOutcome::Accepted);
        assert_eq!(canvas.snapshot().to_frame().get_pixel(7, 7), Some([255, 0, 0]));
    }

    #[test]
    fn test_push_wrong_length() {
        let canvas = RemoteCanvas::new(8, 8);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0u8; 65]).unwrap();
        let oversized = encoder.finish().unwrap();

        assert_eq!(canvas.apply_push(1, &oversized), UpdateOutcome::ShapeMismatch);
        assert_eq!(canvas.apply_push(1, &[0u8; 10]), UpdateOutcome::ShapeMismatch);
        assert_eq!(canvas.last_updated_at(), 0);
    }
}
