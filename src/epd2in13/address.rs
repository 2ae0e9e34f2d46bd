//! RAM addressing
//!
//! x is positioned in bytes, so the last 3 bits which show the position inside a byte in the ram
//! aren't relevant and are dropped on the wire.

use crate::config::DisplayGeometry;

/// Rectangle of RAM the following writes are restricted to, in pixels (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWindow {
    pub x_start: u16,
    pub y_start: u16,
    pub x_end: u16,
    pub y_end: u16,
}

impl AddressWindow {
    /// Returns `None` unless `x_start <= x_end < width` and `y_start <= y_end < height`
    pub fn new(
        geometry: DisplayGeometry,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> Option<Self> {
        let fits = x_start <= x_end
            && x_end < geometry.width
            && y_start <= y_end
            && y_end < geometry.height;
        fits.then_some(AddressWindow {
            x_start,
            y_start,
            x_end,
            y_end,
        })
    }

    /// The whole panel
    pub fn full(geometry: DisplayGeometry) -> Self {
        AddressWindow {
            x_start: 0,
            y_start: 0,
            x_end: geometry.width - 1,
            y_end: geometry.height - 1,
        }
    }

    /// Start and end byte column
    pub fn x_bytes(&self) -> [u8; 2] {
        [(self.x_start >> 3) as u8, (self.x_end >> 3) as u8]
    }

    /// 2 Databytes: A[7:0] & 0..A[8] for each - start and end
    pub fn y_bytes(&self) -> [u8; 4] {
        let [start_lo, start_hi] = self.y_start.to_le_bytes();
        let [end_lo, end_hi] = self.y_end.to_le_bytes();
        [start_lo, start_hi, end_lo, end_hi]
    }
}

/// Position of the RAM address counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryPointer {
    pub x: u16,
    pub y: u16,
}

impl MemoryPointer {
    /// Returns `None` if the pointer is outside of the panel
    pub fn new(geometry: DisplayGeometry, x: u16, y: u16) -> Option<Self> {
        (x < geometry.width && y < geometry.height).then_some(MemoryPointer { x, y })
    }

    /// Start of the given gate line
    pub fn row(y: u16) -> Self {
        MemoryPointer { x: 0, y }
    }

    pub fn x_bytes(&self) -> [u8; 1] {
        [(self.x >> 3) as u8]
    }

    pub fn y_bytes(&self) -> [u8; 2] {
        self.y.to_le_bytes()
    }
}
