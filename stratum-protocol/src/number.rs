//! Numeric field encoding
//!
//! The value command carries a flag byte whose bits are independent
//! switches, a field width, a decimal count and a fixed 8-byte payload.
//!
//! # Preconditions
//!
//! Nothing here validates ranges. A value with more digits than the field
//! width renders however the controller decides to render it; that is a
//! caller bug, not something the encoder reports.

use crate::font::Font;

/// Bit 7: paint the background color behind the digits
pub const FLAG_SHOW_BACKGROUND: u8 = 0x80;
/// Bit 6: signed number
pub const FLAG_SIGNED: u8 = 0x40;
/// Bit 5: pad the field with leading zeros
pub const FLAG_ZERO_FILL: u8 = 0x20;
/// Bit 4: leading zero drawn as `0` (set) or blank (clear)
pub const FLAG_ZERO_MODE: u8 = 0x10;
/// Bits 3-0: font size
pub const FLAG_SIZE_MASK: u8 = 0x0F;

/// Formatting switches for a numeric field
///
/// The four booleans are independent bits on the wire; any combination is
/// legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NumberFormat {
    pub show_background: bool,
    pub signed: bool,
    pub zero_fill: bool,
    pub zero_mode: bool,
    pub font: Font,
}

impl NumberFormat {
    /// Unsigned, zero-filled, no background: the format used for most fields
    pub const fn plain(font: Font) -> Self {
        Self {
            show_background: false,
            signed: false,
            zero_fill: true,
            zero_mode: false,
            font,
        }
    }

    /// Same format with the background bit set
    pub const fn with_background(mut self) -> Self {
        self.show_background = true;
        self
    }

    /// Same format with the signed bit set
    pub const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    /// The flag byte
    pub const fn flag_byte(&self) -> u8 {
        let mut flags = self.font.code() & FLAG_SIZE_MASK;
        if self.show_background {
            flags |= FLAG_SHOW_BACKGROUND;
        }
        if self.signed {
            flags |= FLAG_SIGNED;
        }
        if self.zero_fill {
            flags |= FLAG_ZERO_FILL;
        }
        if self.zero_mode {
            flags |= FLAG_ZERO_MODE;
        }
        flags
    }

    /// Field width sent for `value` with `i_num` integer digits
    ///
    /// Signed fields get one extra slot only when the value is non-negative;
    /// a negative value goes out with the bare `i_num`. The controller
    /// expects exactly this, so it must not be evened out.
    pub const fn field_width(&self, i_num: u8, value: i64) -> u8 {
        if self.signed && value >= 0 {
            i_num.saturating_add(1)
        } else {
            i_num
        }
    }
}

/// Scale a float to the fixed-point integer the value command carries
///
/// `value × 10^f_num`, rounded half away from zero. The integer digit count
/// plays no part: it only shapes the on-screen field.
pub fn scale_float(value: f32, f_num: u8) -> i64 {
    let mut scale = 1.0f32;
    for _ in 0..f_num {
        scale *= 10.0;
    }
    let scaled = value * scale;
    if scaled >= 0.0 {
        (scaled + 0.5) as i64
    } else {
        (scaled - 0.5) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flag_bits_are_independent() {
        let base = NumberFormat {
            show_background: false,
            signed: false,
            zero_fill: false,
            zero_mode: false,
            font: Font::Font6x12,
        };
        assert_eq!(base.flag_byte(), 0x00);

        let all = NumberFormat {
            show_background: true,
            signed: true,
            zero_fill: true,
            zero_mode: true,
            font: Font::Font32x64,
        };
        assert_eq!(all.flag_byte(), 0xF9);

        let only_zero_mode = NumberFormat {
            zero_mode: true,
            ..base
        };
        assert_eq!(only_zero_mode.flag_byte(), FLAG_ZERO_MODE);

        let bg_and_fill = NumberFormat {
            show_background: true,
            zero_fill: true,
            font: Font::Font10x20,
            ..base
        };
        assert_eq!(bg_and_fill.flag_byte(), 0x80 | 0x20 | 0x02);
    }

    #[test]
    fn test_plain_format() {
        let f = NumberFormat::plain(Font::Font8x16);
        assert_eq!(f.flag_byte(), 0x21);
        assert_eq!(f.with_background().flag_byte(), 0xA1);
        assert_eq!(f.signed().flag_byte(), 0x61);
    }

    // Wire-format quirk: negative signed values are one slot narrower than
    // non-negative ones in the same field. Kept on purpose.
    #[test]
    fn test_signed_width_quirk_negative_is_narrower() {
        let f = NumberFormat::plain(Font::MENU).signed();
        assert_eq!(f.field_width(3, 0), 4);
        assert_eq!(f.field_width(3, 125), 4);
        assert_eq!(f.field_width(3, -125), 3);
    }

    #[test]
    fn test_unsigned_width_is_i_num() {
        let f = NumberFormat::plain(Font::MENU);
        assert_eq!(f.field_width(3, 5), 3);
        assert_eq!(f.field_width(3, -5), 3);
    }

    #[test]
    fn test_signed_width_saturates_at_max_digits() {
        let f = NumberFormat::plain(Font::MENU).signed();
        assert_eq!(f.field_width(u8::MAX, 7), u8::MAX);
        assert_eq!(f.field_width(u8::MAX, -7), u8::MAX);
    }

    #[test]
    fn test_scale_float_rounding() {
        assert_eq!(scale_float(1.25, 1), 13);
        assert_eq!(scale_float(-1.25, 1), -13);
        assert_eq!(scale_float(0.004, 2), 0);
        assert_eq!(scale_float(215.0, 0), 215);
        assert_eq!(scale_float(-0.05, 3), -50);
    }

    proptest! {
        #[test]
        fn prop_signed_width(i_num in 1u8..10, value in any::<i32>()) {
            let f = NumberFormat::plain(Font::MENU).signed();
            let width = f.field_width(i_num, value as i64);
            if value >= 0 {
                prop_assert_eq!(width, i_num + 1);
            } else {
                prop_assert_eq!(width, i_num);
            }
        }

        #[test]
        fn prop_scale_float_recovers_fixed_point(n in -999_999i32..999_999, f_num in 0u8..4) {
            let mut div = 1.0f32;
            for _ in 0..f_num {
                div *= 10.0;
            }
            let value = n as f32 / div;
            prop_assert_eq!(scale_float(value, f_num), n as i64);
        }
    }
}
