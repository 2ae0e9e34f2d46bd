//! B/W Color for the EPD

/// Only for the Black/White-Displays
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black color
    Black,
    /// White color
    #[default]
    White,
}

impl Color {
    /// Gets a full byte of black or white pixels
    ///
    /// The controller RAM stores 1 for white and 0 for black
    pub fn get_byte_value(self) -> u8 {
        match self {
            Color::White => 0xff,
            Color::Black => 0x00,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_values() {
        assert_eq!(Color::White.get_byte_value(), 0xFF);
        assert_eq!(Color::Black.get_byte_value(), 0x00);
        assert_eq!(Color::default(), Color::White);
    }
}
