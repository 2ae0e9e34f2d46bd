use embedded_hal::{delay::DelayNs, digital::*, spi::SpiDevice};
use log::{trace, warn};

use crate::config::BusyWait;
use crate::error::ErrorKind;
use crate::traits::Command;

/// Level of the Data/Command line for a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// DC low
    Command,
    /// DC high
    Data,
}

/// One transfer over spi: the DC level plus the bytes clocked out with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFrame<'a> {
    pub mode: Mode,
    pub payload: &'a [u8],
}

impl<'a> TransactionFrame<'a> {
    pub fn command(address: &'a [u8]) -> Self {
        TransactionFrame {
            mode: Mode::Command,
            payload: address,
        }
    }

    pub fn data(payload: &'a [u8]) -> Self {
        TransactionFrame {
            mode: Mode::Data,
            payload,
        }
    }
}

// Repeated bytes are written in blocks of this size
const REPEAT_CHUNK: usize = 32;

/// The Connection Interface of the EPD
///
/// Chip select is handled by the [`SpiDevice`].
pub(crate) struct DisplayInterface<BUSY, DC, RST> {
    /// High for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// Polling interval and upper bound of [`wait_until_idle`](DisplayInterface::wait_until_idle)
    busy_wait: BusyWait,
}

impl<BUSY, DC, RST> DisplayInterface<BUSY, DC, RST>
where
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Creates a new `DisplayInterface` struct
    pub fn new(busy: BUSY, dc: DC, rst: RST, busy_wait: BusyWait) -> Self {
        DisplayInterface {
            busy,
            dc,
            rst,
            busy_wait,
        }
    }

    /// Sets the DC line to the level of `mode`
    pub(crate) fn set_select<SPI: SpiDevice>(
        &mut self,
        mode: Mode,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        match mode {
            // low for commands
            Mode::Command => self.dc.set_low(),
            // high for data
            Mode::Data => self.dc.set_high(),
        }
        .map_err(ErrorKind::DcError)
    }

    /// Sends one [`TransactionFrame`]
    ///
    /// DC is set before the first byte and kept for the whole payload,
    /// the controller samples it per byte.
    pub(crate) fn send<SPI: SpiDevice>(
        &mut self,
        spi: &mut SPI,
        frame: TransactionFrame<'_>,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        if frame.payload.is_empty() {
            return Ok(());
        }
        trace!("{:?} frame, {} bytes", frame.mode, frame.payload.len());
        self.set_select::<SPI>(frame.mode)?;
        self.write(spi, frame.payload)
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub(crate) fn cmd<SPI: SpiDevice, T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.send(spi, TransactionFrame::command(&[command.address()]))
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data<SPI: SpiDevice>(
        &mut self,
        spi: &mut SPI,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.send(spi, TransactionFrame::data(data))
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    pub(crate) fn cmd_with_data<SPI: SpiDevice, T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.cmd(spi, command)?;
        self.data(spi, data)
    }

    /// Basic function for sending the same byte of data (one u8) multiple times over spi
    pub(crate) fn data_x_times<SPI: SpiDevice>(
        &mut self,
        spi: &mut SPI,
        val: u8,
        repetitions: usize,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        if repetitions == 0 {
            return Ok(());
        }
        self.set_select::<SPI>(Mode::Data)?;
        let block = [val; REPEAT_CHUNK];
        let mut remaining = repetitions;
        while remaining > 0 {
            let len = remaining.min(REPEAT_CHUNK);
            self.write(spi, &block[..len])?;
            remaining -= len;
        }
        Ok(())
    }

    // spi write helper/abstraction function
    fn write<SPI: SpiDevice>(
        &mut self,
        spi: &mut SPI,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        // transfer spi data
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                spi.write(data_chunk).map_err(ErrorKind::SpiError)?;
            }
            Ok(())
        } else {
            spi.write(data).map_err(ErrorKind::SpiError)
        }
    }

    /// Checks if device is still busy
    ///
    /// The BUSY line of this controller is active high. A failing read is
    /// reported instead of being taken as "idle".
    pub(crate) fn is_busy<SPI: SpiDevice>(&mut self) -> Result<bool, ErrorKind<SPI, BUSY, DC, RST>> {
        self.busy.is_high().map_err(ErrorKind::BusyError)
    }

    /// Waits until device isn't busy anymore (busy == LOW)
    ///
    /// Sleeps `poll_interval_ms` (at least 1ms) between two reads and gives up with
    /// [`ErrorKind::Timeout`] once `timeout_ms` have been slept
    /// with the line still high.
    pub(crate) fn wait_until_idle<SPI: SpiDevice, DELAY: DelayNs>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        let step_ms = self.busy_wait.step_ms();
        let timeout_ms = self.busy_wait.timeout_ms;
        let mut waited_ms: u32 = 0;
        while self.is_busy::<SPI>()? {
            if waited_ms >= timeout_ms {
                warn!("display still busy after {}ms", waited_ms);
                return Err(ErrorKind::Timeout { waited_ms });
            }
            delay.delay_ms(step_ms);
            waited_ms = waited_ms.saturating_add(step_ms);
        }
        if waited_ms > 0 {
            trace!("display idle after {}ms", waited_ms);
        }
        Ok(())
    }

    /// Resets the device.
    ///
    /// Often used to awake the module from deep sleep.
    ///
    /// RST is held low for `hold_ms` and the controller gets another
    /// `hold_ms` to settle afterwards.
    pub(crate) fn reset<SPI: SpiDevice, DELAY: DelayNs>(
        &mut self,
        delay: &mut DELAY,
        hold_ms: u32,
    ) -> Result<(), ErrorKind<SPI, BUSY, DC, RST>> {
        self.rst.set_low().map_err(ErrorKind::RstError)?;
        delay.delay_ms(hold_ms);
        self.rst.set_high().map_err(ErrorKind::RstError)?;
        delay.delay_ms(hold_ms);
        Ok(())
    }
}
