//! A simple Driver for the Waveshare 2.13" (128x250) E-Ink Display via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 4Mhz is used by the default presets, see [`config::BusConfig`]
//!
//! ### Other....
//!
//! - Buffersize: Wherever a buffer is used it always needs to be of the size: `width / 8 * height`
//! - The BUSY line is active high: while it is high the controller ignores new commands
//!
//! # Examples
//!
//! ```ignore
//! use epd2in13::{epd2in13::Epd2in13, prelude::*};
//!
//! let mut epd = Epd2in13::new(busy, dc, rst, Config::preset(Preset::PortA));
//! epd.initialize(&mut spi, &mut delay)?;
//!
//! let mut buffer = [0xFFu8; epd2in13::epd2in13::BUFFER_LEN];
//!
//! // draw something into the buffer
//!
//! epd.update_and_display_frame(&mut spi, &mut delay, &buffer)?;
//!
//! // wait and look at the image
//!
//! epd.clear_frame(&mut spi, &mut delay, Color::White)?;
//! epd.display_frame(&mut spi, &mut delay)?;
//!
//! epd.sleep(&mut spi, &mut delay)?;
//! ```
//!
#![cfg_attr(not(test), no_std)]

pub mod color;
pub mod config;
pub mod error;
pub mod traits;

/// Interface for the physical connection between display and the controlling device
mod interface;
pub use interface::Mode;

pub mod epd2in13;

#[cfg(test)]
pub(crate) mod mock;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::{BusConfig, BusyWait, Config, DisplayGeometry, PinMap, Preset};
    pub use crate::epd2in13::{AddressWindow, MemoryPointer, SessionState};
    pub use crate::error::{Error, ErrorKind, Operation};
    pub use crate::traits::{NoopObserver, Observer, RefreshLut, SessionEvent};
    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode as SpiMode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: SpiMode = SpiMode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Computes the needed buffer length. Takes care of rounding up in case width
/// is not divisible by 8.
///
///  unused
///  bits        width
/// <----><------------------------>
/// \[XXXXX210\]\[76543210\]...\[76543210\] ^
/// \[XXXXX210\]\[76543210\]...\[76543210\] | height
/// \[XXXXX210\]\[76543210\]...\[76543210\] v
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width + 7) / 8 * height
}
