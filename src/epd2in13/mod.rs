//! A simple Driver for the Waveshare 2.13" E-Ink Display (V1, 128x250) via SPI
//!
//! # Example for the 2.13" E-Ink Display
//!
//!```rust, no_run
//!# use embedded_hal_mock::eh1::*;
//!# fn main() -> Result<(), epd2in13::error::Error<spi::Mock<u8>, digital::Mock, digital::Mock, digital::Mock>> {
//!use epd2in13::{epd2in13::*, prelude::*};
//!#
//!# let expectations = [];
//!# let mut spi = spi::Mock::new(&expectations);
//!# let expectations = [];
//!# let busy_in = digital::Mock::new(&expectations);
//!# let dc = digital::Mock::new(&expectations);
//!# let rst = digital::Mock::new(&expectations);
//!# let mut delay = delay::NoopDelay::new();
//!
//!// Setup EPD
//!let mut epd = Epd2in13::new(busy_in, dc, rst, Config::preset(Preset::PortA));
//!epd.initialize(&mut spi, &mut delay)?;
//!
//!// Start from a white frame
//!epd.clear_frame_memory(&mut spi, &mut delay, DEFAULT_FILL)?;
//!epd.display_frame(&mut spi, &mut delay)?;
//!
//!// Transfer and show your own frame
//!let buffer = [Color::Black.get_byte_value(); BUFFER_LEN];
//!epd.update_and_display_frame(&mut spi, &mut delay, &buffer)?;
//!
//!// Set the EPD to sleep
//!epd.sleep(&mut spi, &mut delay)?;
//!# Ok(())
//!# }
//!```

use core::marker::PhantomData;

use embedded_hal::{delay::*, digital::*, spi::SpiDevice};
use log::{debug, warn};

use crate::color::Color;
use crate::config::{Config, DisplayGeometry};
use crate::error::{Error, ErrorKind, Operation};
use crate::interface::DisplayInterface;
use crate::traits::{NoopObserver, Observer, SessionEvent};

mod address;
pub(crate) mod command;
mod constants;
mod register;
mod state;

pub use self::address::{AddressWindow, MemoryPointer};
pub use self::state::SessionState;

use self::command::Command;
use self::register::Register;

/// Size of the panel
pub const GEOMETRY: DisplayGeometry = DisplayGeometry::EPD2IN13;
/// Width of epd2in13 in pixels
pub const WIDTH: u32 = GEOMETRY.width as u32;
/// Height of epd2in13 in pixels
pub const HEIGHT: u32 = GEOMETRY.height as u32;
/// Bytes of a full frame
pub const BUFFER_LEN: usize = crate::buffer_len(WIDTH as usize, HEIGHT as usize);
/// Default Background Color (white)
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::White;
/// Byte written by a default clear, all pixels white
pub const DEFAULT_FILL: u8 = 0xFF;

/// Epd2in13 driver
///
/// One instance owns the control lines of one panel. The spi device and the
/// delay are borrowed for each operation.
pub struct Epd2in13<SPI, BUSY, DC, RST, DELAY, OBS = NoopObserver> {
    /// Connection Interface
    interface: DisplayInterface<BUSY, DC, RST>,
    config: Config,
    state: SessionState,
    observer: OBS,
    _bus: PhantomData<(SPI, DELAY)>,
}

impl<SPI, BUSY, DC, RST, DELAY> Epd2in13<SPI, BUSY, DC, RST, DELAY, NoopObserver>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new driver, nothing is sent before [`initialize`](Epd2in13::initialize)
    pub fn new(busy: BUSY, dc: DC, rst: RST, config: Config) -> Self {
        Epd2in13::with_observer(busy, dc, rst, config, NoopObserver)
    }
}

impl<SPI, BUSY, DC, RST, DELAY, OBS> Epd2in13<SPI, BUSY, DC, RST, DELAY, OBS>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    OBS: Observer,
{
    /// Same as [`new`](Epd2in13::new), `observer` receives the [`SessionEvent`]s
    pub fn with_observer(busy: BUSY, dc: DC, rst: RST, config: Config, observer: OBS) -> Self {
        Epd2in13 {
            interface: DisplayInterface::new(busy, dc, rst, config.busy),
            config,
            state: SessionState::Uninitialized,
            observer,
            _bus: PhantomData,
        }
    }

    /// Resets the controller and programs its registers
    ///
    /// Emits [`SessionEvent::Reset`] after the reset pulse and
    /// [`SessionEvent::Ready`] once the lookup table is loaded. This is also
    /// the way back from any failed operation and from deep sleep.
    pub fn initialize(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.init(spi, delay)
            .map_err(|kind| Error::new(Operation::Initialize, kind))
    }

    /// Wakes the device up from sleep, same as [`initialize`](Epd2in13::initialize)
    pub fn wake_up(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.initialize(spi, delay)
    }

    /// Fills the whole RAM with `fill`, this won't update the display
    ///
    /// The address counter is set for every line, it doesn't reliably wrap
    /// over to the next line in this data entry mode.
    pub fn clear_frame_memory(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        fill: u8,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.clear(spi, delay, fill)
            .map_err(|kind| Error::new(Operation::ClearFrameMemory, kind))
    }

    /// Fills the whole RAM with `color`, this won't update the display
    pub fn clear_frame(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        color: Color,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.clear_frame_memory(spi, delay, color.get_byte_value())
    }

    /// Transmit a full frame to the SRAM of the EPD
    ///
    /// `buffer` has to be [`BUFFER_LEN`] bytes: row-major, 1 bit per pixel, MSB first.
    pub fn update_frame(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        buffer: &[u8],
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.write_frame(spi, delay, buffer)
            .map_err(|kind| Error::new(Operation::UpdateFrame, kind))
    }

    /// Displays the frame data from SRAM
    ///
    /// This function waits until the device isn`t busy anymore
    pub fn display_frame(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.refresh(spi, delay)
            .map_err(|kind| Error::new(Operation::DisplayFrame, kind))
    }

    /// Provide a combined update&display
    pub fn update_and_display_frame(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        buffer: &[u8],
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.update_frame(spi, delay, buffer)?;
        self.display_frame(spi, delay)
    }

    /// Restricts the following RAM writes to the given rectangle (pixels, inclusive)
    ///
    /// x values are rounded down to a multiple of 8
    pub fn set_memory_area(
        &mut self,
        spi: &mut SPI,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure(self.state.accepts_writes())
            .and_then(|()| {
                AddressWindow::new(GEOMETRY, x_start, y_start, x_end, y_end)
                    .ok_or(ErrorKind::InvalidWindow)
            })
            .and_then(|window| self.set_ram_area(spi, &window))
            .map_err(|kind| Error::new(Operation::SetMemoryArea, kind))
    }

    /// Moves the RAM address counter and waits until the controller took it
    ///
    /// x is rounded down to a multiple of 8
    pub fn set_memory_pointer(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        x: u16,
        y: u16,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.ensure(self.state.accepts_writes())
            .and_then(|()| MemoryPointer::new(GEOMETRY, x, y).ok_or(ErrorKind::InvalidWindow))
            .and_then(|pointer| self.set_ram_counter(spi, delay, &pointer))
            .map_err(|kind| Error::new(Operation::SetMemoryPointer, kind))
    }

    /// Let the device enter deep-sleep mode to save power.
    ///
    /// The deep sleep mode returns to standby with a hardware reset, so the
    /// only way out is [`initialize`](Epd2in13::initialize).
    pub fn sleep(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.deep_sleep(spi, delay)
            .map_err(|kind| Error::new(Operation::Sleep, kind))
    }

    /// Wait until the display has stopped processing data
    ///
    /// You can call this to make sure a frame is displayed before goin further
    pub fn wait_until_idle(&mut self, delay: &mut DELAY) -> Result<(), Error<SPI, BUSY, DC, RST>> {
        self.interface
            .wait_until_idle::<SPI, _>(delay)
            .map_err(|kind| Error::new(Operation::WaitUntilIdle, kind))
    }

    /// Checks if the display is busy processing a command
    pub fn is_busy(&mut self) -> Result<bool, Error<SPI, BUSY, DC, RST>> {
        self.interface
            .is_busy::<SPI>()
            .map_err(|kind| Error::new(Operation::ReadBusy, kind))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn geometry(&self) -> DisplayGeometry {
        GEOMETRY
    }

    /// Get the width of the display
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Get the height of the display
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    pub fn observer(&self) -> &OBS {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut OBS {
        &mut self.observer
    }

    fn init(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.enter(SessionState::Resetting);
        self.interface
            .reset::<SPI, _>(delay, self.config.reset_hold())?;
        self.notify(SessionEvent::Reset);

        self.enter(SessionState::Configuring);
        for register in register::configuration(GEOMETRY, self.config.lut) {
            self.write_register(spi, &register)?;
        }

        self.enter(SessionState::Idle);
        self.notify(SessionEvent::Ready);
        Ok(())
    }

    fn clear(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        fill: u8,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.ensure(self.state.accepts_writes())?;
        self.enter(SessionState::WritingFrame);
        self.set_ram_area(spi, &AddressWindow::full(GEOMETRY))?;

        for row in 0..GEOMETRY.height {
            self.set_ram_counter(spi, delay, &MemoryPointer::row(row))?;
            self.interface.cmd(spi, Command::WriteRam)?;
            self.interface
                .data_x_times(spi, fill, GEOMETRY.bytes_per_row())?;
        }

        self.enter(SessionState::Idle);
        Ok(())
    }

    fn write_frame(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        buffer: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.ensure(self.state.accepts_writes())?;
        if buffer.len() != GEOMETRY.buffer_len() {
            return Err(ErrorKind::BufferSize {
                expected: GEOMETRY.buffer_len(),
                actual: buffer.len(),
            });
        }
        self.enter(SessionState::WritingFrame);
        self.set_ram_area(spi, &AddressWindow::full(GEOMETRY))?;

        for (row, line) in (0..GEOMETRY.height).zip(buffer.chunks_exact(GEOMETRY.bytes_per_row())) {
            self.set_ram_counter(spi, delay, &MemoryPointer::row(row))?;
            self.write_register(spi, &register::write_ram(line))?;
        }

        self.enter(SessionState::Idle);
        Ok(())
    }

    fn refresh(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.ensure(self.state.accepts_refresh())?;
        self.enter(SessionState::Refreshing);
        for register in register::refresh() {
            self.write_register(spi, &register)?;
        }
        self.interface.wait_until_idle::<SPI, _>(delay)?;
        self.enter(SessionState::Idle);
        Ok(())
    }

    fn deep_sleep(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.ensure(self.state.accepts_writes())?;
        self.interface.wait_until_idle::<SPI, _>(delay)?;
        self.write_register(spi, &register::deep_sleep())?;
        self.enter(SessionState::Sleeping);
        Ok(())
    }

    fn set_ram_area(
        &mut self,
        spi: &mut SPI,
        window: &AddressWindow,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.write_register(spi, &register::ram_x_window(window))?;
        self.write_register(spi, &register::ram_y_window(window))
    }

    fn set_ram_counter(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        pointer: &MemoryPointer,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.write_register(spi, &register::ram_x_counter(pointer))?;
        self.write_register(spi, &register::ram_y_counter(pointer))?;
        self.interface.wait_until_idle::<SPI, _>(delay)
    }

    fn write_register(
        &mut self,
        spi: &mut SPI,
        register: &Register<'_>,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.interface
            .cmd_with_data(spi, register.command, register.data())
    }

    fn ensure(&self, allowed: bool) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        if allowed {
            Ok(())
        } else {
            warn!("operation rejected while {:?}", self.state);
            Err(ErrorKind::InvalidState(self.state))
        }
    }

    fn enter(&mut self, state: SessionState) {
        debug!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn notify(&mut self, event: SessionEvent) {
        debug!("event {:?}", event);
        self.observer.notify(event);
    }
}
