/// Waveform of the full refresh: slow, wipes ghosting
#[rustfmt::skip]
pub(crate) const LUT_FULL_UPDATE: [u8; 30] = [
    0x22, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x11,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Waveform of the quick refresh: fast, leaves ghosting behind
#[rustfmt::skip]
pub(crate) const LUT_PARTIAL_UPDATE: [u8; 30] = [
    0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x0F, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// 3 Databytes: (and default values from datasheet and arduino)
// 1 .. A[6:0]  = 0xCF | 0xD7
// 1 .. B[6:0]  = 0xCE | 0xD6
// 1 .. C[6:0]  = 0x8D | 0x9D
pub(crate) const BOOSTER_SOFT_START: [u8; 3] = [0xD7, 0xD6, 0x9D];

// VCOM 7V
pub(crate) const VCOM: u8 = 0xA8;

// 4 dummy lines per gate
pub(crate) const DUMMY_LINE_PERIOD: u8 = 0x1A;

// 2us per line
pub(crate) const GATE_LINE_WIDTH: u8 = 0x08;

// x increment, y increment, address counter is updated in x direction
pub(crate) const DATA_ENTRY_MODE: u8 = 0x03;

// GD = 0, SM = 0, TB = 0
pub(crate) const GATE_SCAN_FLAGS: u8 = 0x00;

// enable clock signal, enable cp, display pattern
pub(crate) const DISPLAY_UPDATE_FULL: u8 = 0xC4;

pub(crate) const ENTER_DEEP_SLEEP: u8 = 0x01;
