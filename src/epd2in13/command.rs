//! SPI Commands for the Waveshare 2.13" E-Ink Display

use crate::traits;

/// Epd2in13 commands
///
/// Should rarely (never?) be needed directly.
///
/// For more infos about the addresses and what they are doing look into the pdfs
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Driver Output control
    ///     3 Databytes:
    ///     A[7:0]
    ///     0.. A[8]
    ///     0.. B[2:0]
    ///     Default: Set A[8:0] = 0xF9 (250 - 1) and B[2:0] = 0x0
    DriverOutputControl = 0x01,
    /// Booster Soft start control
    ///     3 Databytes:
    ///     1.. A[6:0]
    ///     1.. B[6:0]
    ///     1.. C[6:0]
    BoosterSoftStartControl = 0x0C,
    GateScanStartPosition = 0x0F,
    /// Deep Sleep Mode Control
    ///     1 Databyte:
    ///     0.. A[0]
    ///     Values:
    ///         A[0] = 0: Normal Mode (POR)
    ///         A[0] = 1: Enter Deep Sleep Mode
    DeepSleepMode = 0x10,
    /// Data Entry mode setting
    ///     1 Databyte: address counter direction (bit 0: x, bit 1: y, bit 2: x or y first)
    DataEntryModeSetting = 0x11,

    SwReset = 0x12,

    TemperatureSensorControl = 0x1A,

    /// Runs the sequence selected with `DisplayUpdateControl2`, BUSY stays high until it is done
    MasterActivation = 0x20,

    DisplayUpdateControl1 = 0x21,

    DisplayUpdateControl2 = 0x22,

    WriteRam = 0x24,

    WriteVcomRegister = 0x2C,

    /// 30 Databytes waveform
    WriteLutRegister = 0x32,

    SetDummyLinePeriod = 0x3A,

    SetGateLineWidth = 0x3B,

    BorderWaveformControl = 0x3C,

    SetRamXAddressStartEndPosition = 0x44,

    SetRamYAddressStartEndPosition = 0x45,

    SetRamXAddressCounter = 0x4E,

    SetRamYAddressCounter = 0x4F,

    /// Terminates a frame read/write, also used as NOP
    TerminateFrameReadWrite = 0xFF,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::Command;
    use crate::traits::Command as CommandTrait;

    #[test]
    fn command_addr() {
        assert_eq!(Command::DriverOutputControl.address(), 0x01);

        assert_eq!(Command::SetRamXAddressCounter.address(), 0x4E);

        assert_eq!(Command::WriteLutRegister.address(), 0x32);

        assert_eq!(Command::TerminateFrameReadWrite.address(), 0xFF);
    }
}
