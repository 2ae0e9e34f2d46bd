//! Wiring and timing configuration
//!
//! Everything that differs between two boards driving the same panel lives
//! here as plain data, so there is only one copy of the protocol.

use embedded_hal::spi::Mode as SpiMode;

use crate::traits::RefreshLut;
use crate::SPI_MODE;

/// Panel size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub width: u16,
    pub height: u16,
}

impl DisplayGeometry {
    /// The 2.13" panel: 128 source lines, 250 gate lines
    pub const EPD2IN13: DisplayGeometry = DisplayGeometry {
        width: 128,
        height: 250,
    };

    /// Returns `None` unless `width` is a non zero multiple of 8 and `height` is non zero
    pub const fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || width % 8 != 0 || height == 0 {
            None
        } else {
            Some(DisplayGeometry { width, height })
        }
    }

    /// Bytes of RAM per gate line
    pub const fn bytes_per_row(&self) -> usize {
        self.width as usize / 8
    }

    /// Bytes of a full frame buffer
    pub const fn buffer_len(&self) -> usize {
        self.bytes_per_row() * self.height as usize
    }
}

const _: () = assert!(DisplayGeometry::EPD2IN13.width % 8 == 0);

/// Host pin indices the control lines are wired to
///
/// Only used by the host when it builds the HAL pins the driver takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub busy: u8,
    pub chip_select: u8,
    pub data_command: u8,
    pub reset: u8,
}

/// Settings the host has to apply to the [`SpiDevice`](embedded_hal::spi::SpiDevice)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    pub clock_hz: u32,
    pub mode: SpiMode,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            clock_hz: 4_000_000,
            mode: SPI_MODE,
        }
    }
}

/// Hold time of each edge of the reset pulse the controller needs at least
pub const MIN_RESET_HOLD_MS: u32 = 200;

/// Bounds of the busy line polling
///
/// A `poll_interval_ms` of 0 is polled in 1ms steps, so every wait ends
/// after `timeout_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyWait {
    /// Sleep between two reads of the busy line
    pub poll_interval_ms: u32,
    /// Total sleep after which a wait fails
    pub timeout_ms: u32,
}

impl BusyWait {
    /// Returns `None` for a zero `poll_interval_ms`
    pub const fn new(poll_interval_ms: u32, timeout_ms: u32) -> Option<Self> {
        if poll_interval_ms == 0 {
            None
        } else {
            Some(BusyWait {
                poll_interval_ms,
                timeout_ms,
            })
        }
    }

    /// Sleep between two reads, never 0
    pub(crate) const fn step_ms(&self) -> u32 {
        if self.poll_interval_ms == 0 {
            1
        } else {
            self.poll_interval_ms
        }
    }
}

impl Default for BusyWait {
    fn default() -> Self {
        BusyWait {
            poll_interval_ms: 50,
            timeout_ms: 5_000,
        }
    }
}

/// Known wirings of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// BUSY on 0, CS on 5, DC on 6, RST on 7; quick LUT
    PortA,
    /// BUSY on 2, CS on 5, DC on 3, RST on 4; full LUT
    PortB,
}

/// EPD Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub pins: PinMap,
    pub bus: BusConfig,
    /// Lookup table loaded by `initialize`
    pub lut: RefreshLut,
    pub busy: BusyWait,
    /// How long RST is held low, and the settle time after it is released
    ///
    /// Values below [`MIN_RESET_HOLD_MS`] are raised to it.
    pub reset_hold_ms: u32,
}

impl Config {
    pub fn preset(preset: Preset) -> Self {
        let (pins, lut) = match preset {
            Preset::PortA => (
                PinMap {
                    busy: 0,
                    chip_select: 5,
                    data_command: 6,
                    reset: 7,
                },
                RefreshLut::Quick,
            ),
            Preset::PortB => (
                PinMap {
                    busy: 2,
                    chip_select: 5,
                    data_command: 3,
                    reset: 4,
                },
                RefreshLut::Full,
            ),
        };
        Config {
            pins,
            bus: BusConfig::default(),
            lut,
            busy: BusyWait::default(),
            reset_hold_ms: MIN_RESET_HOLD_MS,
        }
    }

    /// Hold time of the reset pulse, at least [`MIN_RESET_HOLD_MS`]
    pub fn reset_hold(&self) -> u32 {
        self.reset_hold_ms.max(MIN_RESET_HOLD_MS)
    }

    pub fn with_lut(mut self, lut: RefreshLut) -> Self {
        self.lut = lut;
        self
    }

    pub fn with_busy_wait(mut self, busy: BusyWait) -> Self {
        self.busy = busy;
        self
    }

    pub fn with_pins(mut self, pins: PinMap) -> Self {
        self.pins = pins;
        self
    }

    pub fn with_bus(mut self, bus: BusConfig) -> Self {
        self.bus = bus;
        self
    }

    /// Lengthens the reset pulse, values below [`MIN_RESET_HOLD_MS`] are raised to it
    pub fn with_reset_hold_ms(mut self, reset_hold_ms: u32) -> Self {
        self.reset_hold_ms = reset_hold_ms.max(MIN_RESET_HOLD_MS);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::preset(Preset::PortA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epd_size() {
        let geometry = DisplayGeometry::EPD2IN13;
        assert_eq!(geometry.width, 128);
        assert_eq!(geometry.height, 250);
        assert_eq!(geometry.bytes_per_row(), 16);
        assert_eq!(geometry.buffer_len(), 4000);
    }

    #[test]
    fn geometry_needs_byte_aligned_width() {
        assert_eq!(DisplayGeometry::new(122, 250), None);
        assert_eq!(DisplayGeometry::new(0, 250), None);
        assert_eq!(
            DisplayGeometry::new(128, 250),
            Some(DisplayGeometry::EPD2IN13)
        );
    }

    #[test]
    fn presets_differ_in_wiring_and_lut() {
        let a = Config::preset(Preset::PortA);
        let b = Config::preset(Preset::PortB);
        assert_eq!(a.pins.data_command, 6);
        assert_eq!(a.pins.reset, 7);
        assert_eq!(a.lut, RefreshLut::Quick);
        assert_eq!(b.lut, RefreshLut::Full);
        assert_ne!(a.pins, b.pins);
        assert_eq!(a.bus, b.bus);
        assert_eq!(Config::default(), a);
    }

    #[test]
    fn defaults_match_the_controller_timing() {
        let config = Config::default();
        assert_eq!(config.bus.clock_hz, 4_000_000);
        assert_eq!(config.bus.mode, SPI_MODE);
        assert_eq!(config.busy.poll_interval_ms, 50);
        assert_eq!(config.busy.timeout_ms, 5_000);
        assert_eq!(config.reset_hold_ms, 200);
    }

    #[test]
    fn builders_override_a_preset() {
        let config = Config::preset(Preset::PortA)
            .with_lut(RefreshLut::Full)
            .with_reset_hold_ms(250)
            .with_busy_wait(BusyWait {
                poll_interval_ms: 10,
                timeout_ms: 100,
            });
        assert_eq!(config.lut, RefreshLut::Full);
        assert_eq!(config.reset_hold_ms, 250);
        assert_eq!(config.busy.timeout_ms, 100);
    }

    #[test]
    fn busy_wait_needs_a_poll_interval() {
        assert_eq!(BusyWait::new(0, 5_000), None);
        let wait = BusyWait::new(50, 5_000).unwrap();
        assert_eq!(wait, BusyWait::default());
        assert_eq!(wait.step_ms(), 50);
        let zero = BusyWait {
            poll_interval_ms: 0,
            timeout_ms: 5_000,
        };
        assert_eq!(zero.step_ms(), 1);
    }

    #[test]
    fn reset_hold_is_never_shorter_than_the_controller_needs() {
        let config = Config::default().with_reset_hold_ms(0);
        assert_eq!(config.reset_hold_ms, MIN_RESET_HOLD_MS);
        let raw = Config {
            reset_hold_ms: 10,
            ..Config::default()
        };
        assert_eq!(raw.reset_hold(), MIN_RESET_HOLD_MS);
        assert_eq!(Config::default().with_reset_hold_ms(300).reset_hold(), 300);
    }
}
