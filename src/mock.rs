//! Shared-wire test doubles for the SPI device, the control lines and the delay
//!
//! Every double appends to the same [`Wire`] log, so tests can check the DC
//! level a payload was clocked out with, count busy polls and inject faults.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{self, ErrorType as SpiErrorType, Operation, SpiDevice};

use crate::interface::Mode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write { mode: Mode, bytes: Vec<u8> },
    Dc(bool),
    Rst(bool),
    BusyRead(bool),
    Sleep { ns: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Busy,
    Dc,
    Rst,
}

#[derive(Debug, Default)]
pub struct Wire {
    pub log: Vec<Event>,
    pub dc_high: bool,
    pub elapsed_ns: u64,
    /// BUSY reads high while `elapsed_ns` is below this
    pub busy_until_ns: u64,
    /// (command, busy duration in ns) started whenever that command is written
    pub busy_after_command: Vec<(u8, u64)>,
    /// 1-based index of the SPI write that fails
    pub fail_write: Option<usize>,
    pub fail_pin: Option<Role>,
    writes: usize,
}

impl Wire {
    /// All payloads clocked out, with the DC level they were sent with
    pub fn frames(&self) -> Vec<(Mode, Vec<u8>)> {
        self.log
            .iter()
            .filter_map(|event| match event {
                Event::Write { mode, bytes } => Some((*mode, bytes.clone())),
                _ => None,
            })
            .collect()
    }

    /// Command bytes in the order they were sent
    pub fn commands(&self) -> Vec<u8> {
        self.frames()
            .into_iter()
            .filter(|(mode, _)| *mode == Mode::Command)
            .flat_map(|(_, bytes)| bytes)
            .collect()
    }

    /// Commands paired with the data sent after them (concatenated)
    pub fn registers(&self) -> Vec<(u8, Vec<u8>)> {
        let mut registers: Vec<(u8, Vec<u8>)> = Vec::new();
        for (mode, bytes) in self.frames() {
            match mode {
                Mode::Command => registers.extend(bytes.into_iter().map(|b| (b, Vec::new()))),
                Mode::Data => {
                    if let Some((_, data)) = registers.last_mut() {
                        data.extend(bytes);
                    }
                }
            }
        }
        registers
    }

    pub fn sleeps(&self) -> Vec<u64> {
        self.log
            .iter()
            .filter_map(|event| match event {
                Event::Sleep { ns } => Some(*ns),
                _ => None,
            })
            .collect()
    }

    pub fn busy_reads(&self) -> usize {
        self.log
            .iter()
            .filter(|event| matches!(event, Event::BusyRead(_)))
            .count()
    }
}

pub type SharedWire = Rc<RefCell<Wire>>;

pub struct Bus {
    wire: SharedWire,
}

impl SpiErrorType for Bus {
    type Error = spi::ErrorKind;
}

impl SpiDevice for Bus {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut wire = self.wire.borrow_mut();
        for op in operations.iter() {
            match op {
                Operation::Write(bytes) => {
                    wire.writes += 1;
                    if wire.fail_write == Some(wire.writes) {
                        return Err(spi::ErrorKind::Other);
                    }
                    let mode = if wire.dc_high {
                        Mode::Data
                    } else {
                        Mode::Command
                    };
                    if mode == Mode::Command {
                        let now = wire.elapsed_ns;
                        let busy_for = wire
                            .busy_after_command
                            .iter()
                            .find(|(command, _)| bytes.contains(command))
                            .map(|(_, ns)| *ns);
                        if let Some(ns) = busy_for {
                            wire.busy_until_ns = now.saturating_add(ns);
                        }
                    }
                    wire.log.push(Event::Write {
                        mode,
                        bytes: bytes.to_vec(),
                    });
                }
                Operation::DelayNs(ns) => {
                    wire.elapsed_ns += u64::from(*ns);
                    wire.log.push(Event::Sleep { ns: u64::from(*ns) });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

pub struct Pin {
    wire: SharedWire,
    role: Role,
}

impl Pin {
    fn check(&self) -> Result<(), digital::ErrorKind> {
        if self.wire.borrow().fail_pin == Some(self.role) {
            Err(digital::ErrorKind::Other)
        } else {
            Ok(())
        }
    }

    fn drive(&mut self, high: bool) -> Result<(), digital::ErrorKind> {
        self.check()?;
        let mut wire = self.wire.borrow_mut();
        match self.role {
            Role::Dc => {
                wire.dc_high = high;
                wire.log.push(Event::Dc(high));
            }
            Role::Rst => wire.log.push(Event::Rst(high)),
            Role::Busy => {}
        }
        Ok(())
    }

    fn sample(&mut self) -> Result<bool, digital::ErrorKind> {
        self.check()?;
        let mut wire = self.wire.borrow_mut();
        let busy = wire.elapsed_ns < wire.busy_until_ns;
        wire.log.push(Event::BusyRead(busy));
        Ok(busy)
    }
}

impl PinErrorType for Pin {
    type Error = digital::ErrorKind;
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.sample()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.sample().map(|busy| !busy)
    }
}

pub struct Delay {
    wire: SharedWire,
}

impl DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        let mut wire = self.wire.borrow_mut();
        wire.elapsed_ns += u64::from(ns);
        wire.log.push(Event::Sleep { ns: u64::from(ns) });
    }

    fn delay_us(&mut self, us: u32) {
        let mut wire = self.wire.borrow_mut();
        wire.elapsed_ns += u64::from(us) * 1_000;
        wire.log.push(Event::Sleep {
            ns: u64::from(us) * 1_000,
        });
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut wire = self.wire.borrow_mut();
        wire.elapsed_ns += u64::from(ms) * 1_000_000;
        wire.log.push(Event::Sleep {
            ns: u64::from(ms) * 1_000_000,
        });
    }
}

/// Bus, delay and the three control lines, all attached to one [`Wire`]
pub struct Harness {
    pub wire: SharedWire,
    pub spi: Bus,
    pub delay: Delay,
}

pub fn harness() -> (Harness, Pin, Pin, Pin) {
    let wire: SharedWire = Rc::new(RefCell::new(Wire::default()));
    let pin = |role| Pin {
        wire: Rc::clone(&wire),
        role,
    };
    let (busy, dc, rst) = (pin(Role::Busy), pin(Role::Dc), pin(Role::Rst));
    let harness = Harness {
        spi: Bus {
            wire: Rc::clone(&wire),
        },
        delay: Delay {
            wire: Rc::clone(&wire),
        },
        wire,
    };
    (harness, busy, dc, rst)
}
