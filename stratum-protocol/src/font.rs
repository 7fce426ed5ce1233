//! Built-in fonts of the display controller
//!
//! Glyph bitmaps live in the panel's flash; the UI only selects them by code
//! and needs their cell size to lay text out.

/// Font sizes understood by the string and value commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Font {
    Font6x12 = 0x00,
    #[default]
    Font8x16 = 0x01,
    Font10x20 = 0x02,
    Font12x24 = 0x03,
    Font14x28 = 0x04,
    Font16x32 = 0x05,
    Font20x40 = 0x06,
    Font24x48 = 0x07,
    Font28x56 = 0x08,
    Font32x64 = 0x09,
}

impl Font {
    /// Menu rows
    pub const MENU: Font = Font::Font8x16;
    /// Status area
    pub const STATUS: Font = Font::Font10x20;
    /// Title bar
    pub const HEADING: Font = Font::Font10x20;
    /// Popup text
    pub const ALERT: Font = Font::Font10x20;

    /// Wire code (low nibble of the flag byte)
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Glyph cell width in pixels
    pub const fn width(self) -> u16 {
        match self {
            Font::Font6x12 => 6,
            Font::Font8x16 => 8,
            Font::Font10x20 => 10,
            Font::Font12x24 => 12,
            Font::Font14x28 => 14,
            Font::Font16x32 => 16,
            Font::Font20x40 => 20,
            Font::Font24x48 => 24,
            Font::Font28x56 => 28,
            Font::Font32x64 => 32,
        }
    }

    /// Glyph cell height in pixels
    pub const fn height(self) -> u16 {
        self.width() * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_cells() {
        assert_eq!(Font::Font6x12.width(), 6);
        assert_eq!(Font::Font6x12.height(), 12);
        assert_eq!(Font::Font32x64.height(), 64);
        assert_eq!(Font::MENU.width(), 8);
    }

    #[test]
    fn test_font_codes() {
        assert_eq!(Font::Font8x16.code(), 0x01);
        assert_eq!(Font::Font32x64.code(), 0x09);
    }
}
