/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Seperates the different LUT for the Display Refresh process
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum RefreshLut {
    /// The "normal" full Lookuptable for the Refresh-Sequence
    #[default]
    Full,
    /// The quick LUT where not the full refresh sequence is followed.
    /// This might lead to some ghosting
    Quick,
}

/// Notifications emitted by [`Epd2in13`](crate::epd2in13::Epd2in13) while it is initialised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The reset pulse completed
    Reset,
    /// The configuration sequence completed and the display accepts frames
    Ready,
}

/// Receives [`SessionEvent`]s from a display session
///
/// Implemented for [`NoopObserver`] and for every `FnMut(SessionEvent)` closure.
pub trait Observer {
    fn notify(&mut self, event: SessionEvent);
}

/// Observer that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&mut self, _event: SessionEvent) {}
}

impl<F> Observer for F
where
    F: FnMut(SessionEvent),
{
    fn notify(&mut self, event: SessionEvent) {
        self(event)
    }
}
