//! Encoding of the controller operations into command + data bytes
//!
//! Nothing in here touches the bus: every function returns a [`Register`]
//! write, which is sent as one command frame directly followed by its data frame.

use super::address::{AddressWindow, MemoryPointer};
use super::command::Command;
use super::constants::*;
use crate::config::DisplayGeometry;
use crate::traits::RefreshLut;

// Longest data of a register that isn't a LUT or RAM write
const INLINE_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload<'a> {
    Inline { bytes: [u8; INLINE_LEN], len: usize },
    Borrowed(&'a [u8]),
}

/// A command and the data belonging to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Register<'a> {
    pub command: Command,
    payload: Payload<'a>,
}

impl<'a> Register<'a> {
    /// At most [`INLINE_LEN`] bytes, checked at compile time
    fn inline<const N: usize>(command: Command, data: [u8; N]) -> Self {
        const { assert!(N <= INLINE_LEN) };
        let mut bytes = [0u8; INLINE_LEN];
        bytes[..N].copy_from_slice(&data);
        Register {
            command,
            payload: Payload::Inline { bytes, len: N },
        }
    }

    fn borrowed(command: Command, data: &'a [u8]) -> Self {
        Register {
            command,
            payload: Payload::Borrowed(data),
        }
    }

    fn bare(command: Command) -> Self {
        Register::borrowed(command, &[])
    }

    pub fn data(&self) -> &[u8] {
        match &self.payload {
            Payload::Inline { bytes, len } => &bytes[..*len],
            Payload::Borrowed(data) => data,
        }
    }
}

/// Waveform for the given refresh mode
pub(crate) fn lut_table(lut: RefreshLut) -> &'static [u8; 30] {
    match lut {
        RefreshLut::Full => &LUT_FULL_UPDATE,
        RefreshLut::Quick => &LUT_PARTIAL_UPDATE,
    }
}

/// Number of gate lines and scan direction
pub(crate) fn driver_output_control(geometry: DisplayGeometry) -> Register<'static> {
    let [lo, hi] = (geometry.height - 1).to_le_bytes();
    Register::inline(Command::DriverOutputControl, [lo, hi, GATE_SCAN_FLAGS])
}

pub(crate) fn booster_soft_start() -> Register<'static> {
    Register::inline(Command::BoosterSoftStartControl, BOOSTER_SOFT_START)
}

pub(crate) fn write_vcom() -> Register<'static> {
    Register::inline(Command::WriteVcomRegister, [VCOM])
}

pub(crate) fn dummy_line_period() -> Register<'static> {
    Register::inline(Command::SetDummyLinePeriod, [DUMMY_LINE_PERIOD])
}

pub(crate) fn gate_time() -> Register<'static> {
    Register::inline(Command::SetGateLineWidth, [GATE_LINE_WIDTH])
}

pub(crate) fn data_entry_mode() -> Register<'static> {
    Register::inline(Command::DataEntryModeSetting, [DATA_ENTRY_MODE])
}

pub(crate) fn write_lut(lut: RefreshLut) -> Register<'static> {
    Register::borrowed(Command::WriteLutRegister, lut_table(lut))
}

/// The registers programmed after a reset, in the order they have to be sent
pub(crate) fn configuration(geometry: DisplayGeometry, lut: RefreshLut) -> [Register<'static>; 7] {
    [
        driver_output_control(geometry),
        booster_soft_start(),
        write_vcom(),
        dummy_line_period(),
        gate_time(),
        data_entry_mode(),
        write_lut(lut),
    ]
}

pub(crate) fn ram_x_window(window: &AddressWindow) -> Register<'static> {
    Register::inline(Command::SetRamXAddressStartEndPosition, window.x_bytes())
}

pub(crate) fn ram_y_window(window: &AddressWindow) -> Register<'static> {
    Register::inline(Command::SetRamYAddressStartEndPosition, window.y_bytes())
}

pub(crate) fn ram_x_counter(pointer: &MemoryPointer) -> Register<'static> {
    Register::inline(Command::SetRamXAddressCounter, pointer.x_bytes())
}

pub(crate) fn ram_y_counter(pointer: &MemoryPointer) -> Register<'static> {
    Register::inline(Command::SetRamYAddressCounter, pointer.y_bytes())
}

/// Pixel data, 1 bit per pixel, MSB first
pub(crate) fn write_ram(buffer: &[u8]) -> Register<'_> {
    Register::borrowed(Command::WriteRam, buffer)
}

/// Selects, starts and terminates the full refresh sequence
///
/// MASTER Activation should not be interupted to avoid currption of panel images
/// therefore a terminate command is send
pub(crate) fn refresh() -> [Register<'static>; 3] {
    [
        Register::inline(Command::DisplayUpdateControl2, [DISPLAY_UPDATE_FULL]),
        Register::bare(Command::MasterActivation),
        Register::bare(Command::TerminateFrameReadWrite),
    ]
}

pub(crate) fn deep_sleep() -> Register<'static> {
    Register::inline(Command::DeepSleepMode, [ENTER_DEEP_SLEEP])
}
