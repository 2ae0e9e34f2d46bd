use core::fmt::{Debug, Display, Formatter};

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::epd2in13::SessionState;

/// Epd error type
pub enum ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Encountered an SPI error
    SpiError(SPI::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// The busy line was still asserted after waiting `waited_ms`
    Timeout { waited_ms: u32 },

    /// The operation is not allowed in the current session state
    InvalidState(SessionState),

    /// Address window or pointer outside of the panel or with start > end
    InvalidWindow,

    /// Frame buffer of the wrong length
    BufferSize { expected: usize, actual: usize },
}

impl<SPI, BUSY, DC, RST> Debug for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::Timeout { waited_ms } => f
                .debug_struct("Timeout")
                .field("waited_ms", waited_ms)
                .finish(),
            Self::InvalidState(state) => f.debug_tuple("InvalidState").field(state).finish(),
            Self::InvalidWindow => f.write_str("InvalidWindow"),
            Self::BufferSize { expected, actual } => f
                .debug_struct("BufferSize")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
        }
    }
}

impl<SPI, BUSY, DC, RST> Display for ErrorKind<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "SPI error: {err:?}"),
            Self::BusyError(err) => write!(f, "Busy pin error: {err:?}"),
            Self::DcError(err) => write!(f, "DC pin error: {err:?}"),
            Self::RstError(err) => write!(f, "RST pin error: {err:?}"),
            Self::Timeout { waited_ms } => {
                write!(f, "display still busy after {waited_ms}ms")
            }
            Self::InvalidState(state) => write!(f, "not allowed while {state:?}"),
            Self::InvalidWindow => write!(f, "address outside of the display"),
            Self::BufferSize { expected, actual } => {
                write!(f, "buffer has {actual} bytes, expected {expected}")
            }
        }
    }
}

/// The public operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initialize,
    ClearFrameMemory,
    UpdateFrame,
    DisplayFrame,
    SetMemoryArea,
    SetMemoryPointer,
    WaitUntilIdle,
    /// A single read of the busy line
    ReadBusy,
    Sleep,
}

impl Operation {
    /// The configuration sequence was aborted
    pub fn is_init(self) -> bool {
        self == Operation::Initialize
    }

    /// A frame write or a refresh was aborted
    pub fn is_io(self) -> bool {
        matches!(
            self,
            Operation::ClearFrameMemory | Operation::UpdateFrame | Operation::DisplayFrame
        )
    }
}

/// Error returned by the public operations of [`Epd2in13`](crate::epd2in13::Epd2in13)
///
/// The controller state is undefined after any error, recover with
/// [`initialize`](crate::epd2in13::Epd2in13::initialize).
pub struct Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    operation: Operation,
    kind: ErrorKind<SPI, BUSY, DC, RST>,
}

impl<SPI, BUSY, DC, RST> Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    pub(crate) fn new(operation: Operation, kind: ErrorKind<SPI, BUSY, DC, RST>) -> Self {
        Error { operation, kind }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn kind(&self) -> &ErrorKind<SPI, BUSY, DC, RST> {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind<SPI, BUSY, DC, RST> {
        self.kind
    }
}

impl<SPI, BUSY, DC, RST> Debug for Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Error")
            .field("operation", &self.operation)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<SPI, BUSY, DC, RST> Display for Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} failed: {}", self.operation, self.kind)
    }
}

impl<SPI, BUSY, DC, RST> core::error::Error for Error<SPI, BUSY, DC, RST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Bus, Pin};

    type Kind = ErrorKind<Bus, Pin, Pin, Pin>;

    #[test]
    fn operation_groups() {
        assert!(Operation::Initialize.is_init());
        assert!(!Operation::Initialize.is_io());
        assert!(Operation::ClearFrameMemory.is_io());
        assert!(Operation::UpdateFrame.is_io());
        assert!(Operation::DisplayFrame.is_io());
        assert!(!Operation::SetMemoryPointer.is_io());
        assert!(!Operation::ReadBusy.is_io());
    }

    #[test]
    fn display_names_operation_and_cause() {
        let kind: Kind = ErrorKind::Timeout { waited_ms: 5000 };
        let err = Error::new(Operation::DisplayFrame, kind);
        assert_eq!(
            std::format!("{err}"),
            "DisplayFrame failed: display still busy after 5000ms"
        );
        assert!(matches!(err.into_kind(), Kind::Timeout { waited_ms: 5000 }));
    }
}
