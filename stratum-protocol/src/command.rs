//! Command set of the display controller
//!
//! Each [`Command`] encodes to exactly one frame. Coordinates are pixels
//! from the top-left corner of the portrait 272×480 panel.

use heapless::Vec;

use crate::font::Font;
use crate::frame::{FrameError, FrameWriter, MAX_FRAME_SIZE, SEND_BUFFER_SIZE};
use crate::number::NumberFormat;

/// Panel width in pixels
pub const DISPLAY_WIDTH: u16 = 272;

/// Panel height in pixels
pub const DISPLAY_HEIGHT: u16 = 480;

// Command identifiers
pub const CMD_HANDSHAKE: u8 = 0x00;
pub const CMD_FRAME_CLEAR: u8 = 0x01;
pub const CMD_DRAW_POINT: u8 = 0x02;
pub const CMD_DRAW_LINE: u8 = 0x03;
pub const CMD_DRAW_RECTANGLE: u8 = 0x05;
pub const CMD_AREA_MOVE: u8 = 0x09;
pub const CMD_DRAW_STRING: u8 = 0x11;
pub const CMD_DRAW_VALUE: u8 = 0x14;
pub const CMD_ICON_SHOW: u8 = 0x23;
pub const CMD_BACKLIGHT: u8 = 0x30;
pub const CMD_FRAME_SET_DIR: u8 = 0x34;
pub const CMD_UPDATE_LCD: u8 = 0x3D;

/// Lowest backlight level the controller accepts
pub const MIN_LUMINANCE: u8 = 0x1F;

/// Bytes ahead of the text in a draw-string frame
const DRAW_STRING_PREFIX: usize = 11;

/// Longest text a single draw-string frame carries
pub const MAX_STRING_LEN: usize = SEND_BUFFER_SIZE - DRAW_STRING_PREFIX;

/// Rectangle drawing mode (low two bits of the command byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RectMode {
    Frame = 0,
    Fill = 1,
    Xor = 2,
}

/// Direction of an area move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AreaMoveDir {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

/// Icon blending switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IconFlags {
    /// Draw the icon's own background
    pub with_background: bool,
    /// Blend against the current background
    pub blend: bool,
    /// Filter the background color out
    pub filter: bool,
}

impl IconFlags {
    /// Transparent icon over whatever is already drawn
    pub const TRANSPARENT: Self = Self {
        with_background: false,
        blend: false,
        filter: true,
    };

    /// Icon including its own background
    pub const OPAQUE: Self = Self {
        with_background: true,
        blend: false,
        filter: false,
    };

    const fn bits(&self) -> u8 {
        ((self.with_background as u8) << 7) | ((self.blend as u8) << 6) | ((self.filter as u8) << 5)
    }
}

/// A single display command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command<'a> {
    /// Ask the controller to answer `OK`
    Handshake,
    /// Set backlight level
    Backlight { luminance: u8 },
    /// Set frame orientation (0..=3)
    FrameSetDir { dir: u8 },
    /// Latch everything drawn so far onto the panel
    UpdateLcd,
    /// Fill the whole frame with one color
    FrameClear { color: u16 },
    /// Draw a point of the given pen size
    DrawPoint {
        color: u16,
        width: u8,
        height: u8,
        x: u16,
        y: u16,
    },
    /// Draw a line
    DrawLine {
        color: u16,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    },
    /// Draw a rectangle between two inclusive corners
    DrawRectangle {
        mode: RectMode,
        color: u16,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    },
    /// Move a screen area, filling the vacated strip
    AreaMove {
        circular: bool,
        dir: AreaMoveDir,
        distance: u16,
        color: u16,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    },
    /// Draw text
    DrawString {
        width_adjust: bool,
        show_background: bool,
        font: Font,
        color: u16,
        background: u16,
        x: u16,
        y: u16,
        text: &'a str,
        /// Draw at most this many characters
        limit: u16,
    },
    /// Draw a number from its fixed-point representation
    DrawValue {
        format: NumberFormat,
        color: u16,
        background: u16,
        /// Integer digits
        i_num: u8,
        /// Decimal digits
        f_num: u8,
        x: u16,
        y: u16,
        value: i64,
    },
    /// Draw an icon from a library stored on the controller
    IconShow {
        flags: IconFlags,
        library: u8,
        icon: u8,
        x: u16,
        y: u16,
    },
}

impl<'a> Command<'a> {
    /// Encode this command into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        match *self {
            Command::Handshake => FrameWriter::start(buffer, CMD_HANDSHAKE)?.finish(),
            Command::Backlight { luminance } => {
                let mut w = FrameWriter::start(buffer, CMD_BACKLIGHT)?;
                w.byte(luminance.max(MIN_LUMINANCE))?;
                w.finish()
            }
            Command::FrameSetDir { dir } => {
                let mut w = FrameWriter::start(buffer, CMD_FRAME_SET_DIR)?;
                w.byte(0x5A)?;
                w.byte(0xA5)?;
                w.byte(dir)?;
                w.finish()
            }
            Command::UpdateLcd => FrameWriter::start(buffer, CMD_UPDATE_LCD)?.finish(),
            Command::FrameClear { color } => {
                let mut w = FrameWriter::start(buffer, CMD_FRAME_CLEAR)?;
                w.word(color)?;
                w.finish()
            }
            Command::DrawPoint {
                color,
                width,
                height,
                x,
                y,
            } => {
                let mut w = FrameWriter::start(buffer, CMD_DRAW_POINT)?;
                w.word(color)?;
                w.byte(width)?;
                w.byte(height)?;
                w.word(x)?;
                w.word(y)?;
                w.finish()
            }
            Command::DrawLine {
                color,
                x0,
                y0,
                x1,
                y1,
            } => {
                let mut w = FrameWriter::start(buffer, CMD_DRAW_LINE)?;
                w.word(color)?;
                w.word(x0)?;
                w.word(y0)?;
                w.word(x1)?;
                w.word(y1)?;
                w.finish()
            }
            Command::DrawRectangle {
                mode,
                color,
                x0,
                y0,
                x1,
                y1,
            } => {
                let mut w = FrameWriter::start(buffer, CMD_DRAW_RECTANGLE | (mode as u8 & 0x03))?;
                w.word(color)?;
                w.word(x0)?;
                w.word(y0)?;
                w.word(x1)?;
                w.word(y1)?;
                w.finish()
            }
            Command::AreaMove {
                circular,
                dir,
                distance,
                color,
                x0,
                y0,
                x1,
                y1,
            } => {
                let mut w = FrameWriter::start(buffer, CMD_AREA_MOVE)?;
                w.byte(((circular as u8) << 7) | dir as u8)?;
                w.word(distance)?;
                w.word(color)?;
                w.word(x0)?;
                w.word(y0)?;
                w.word(x1)?;
                w.word(y1)?;
                w.finish()
            }
            Command::DrawString {
                width_adjust,
                show_background,
                font,
                color,
                background,
                x,
                y,
                text,
                limit,
            } => {
                let mut w = FrameWriter::start(buffer, CMD_DRAW_STRING)?;
                w.byte(((width_adjust as u8) << 7) | ((show_background as u8) << 6) | font.code())?;
                w.word(color)?;
                w.word(background)?;
                w.word(x)?;
                w.word(y)?;
                w.string(text, limit)?;
                w.finish()
            }
            Command::DrawValue {
                format,
                color,
                background,
                i_num,
                f_num,
                x,
                y,
                value,
            } => {
                let mut w = FrameWriter::start(buffer, CMD_DRAW_VALUE)?;
                w.byte(format.flag_byte())?;
                w.word(color)?;
                w.word(background)?;
                w.byte(format.field_width(i_num, value))?;
                w.byte(f_num)?;
                w.word(x)?;
                w.word(y)?;
                w.int64(value)?;
                w.finish()
            }
            Command::IconShow {
                flags,
                library,
                icon,
                x,
                y,
            } => {
                let mut w = FrameWriter::start(buffer, CMD_ICON_SHOW)?;
                w.word(x.min(DISPLAY_WIDTH - 1))?;
                w.word(y.min(DISPLAY_HEIGHT - 1))?;
                w.byte(flags.bits() | library)?;
                w.byte(icon)?;
                w.finish()
            }
        }
    }

    /// Bytes of `text` a draw-string frame carries for the given `limit`
    pub fn string_len(text: &str, limit: u16) -> usize {
        text.len().min(limit as usize).min(MAX_STRING_LEN)
    }

    /// Encode this command into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::scale_float;
    use proptest::prelude::*;

    const TAIL: [u8; 4] = [0xCC, 0x33, 0xC3, 0x3C];

    fn value_command(format: NumberFormat, i_num: u8, f_num: u8, value: i64) -> Command<'static> {
        Command::DrawValue {
            format,
            color: 0xFFFF,
            background: 0x0000,
            i_num,
            f_num,
            x: 210,
            y: 100,
            value,
        }
    }

    #[test]
    fn test_handshake_frame() {
        let frame = Command::Handshake.encode_to_vec().unwrap();
        assert_eq!(frame.as_slice(), &[0xAA, 0x00, 0xCC, 0x33, 0xC3, 0x3C]);
    }

    #[test]
    fn test_update_lcd_frame() {
        let frame = Command::UpdateLcd.encode_to_vec().unwrap();
        assert_eq!(frame.as_slice(), &[0xAA, 0x3D, 0xCC, 0x33, 0xC3, 0x3C]);
    }

    #[test]
    fn test_backlight_clamped() {
        let frame = Command::Backlight { luminance: 0x05 }.encode_to_vec().unwrap();
        assert_eq!(frame[2], MIN_LUMINANCE);
        let frame = Command::Backlight { luminance: 0xFF }.encode_to_vec().unwrap();
        assert_eq!(frame[2], 0xFF);
    }

    #[test]
    fn test_rectangle_mode_in_command_byte() {
        let frame = Command::DrawRectangle {
            mode: RectMode::Fill,
            color: 0x1234,
            x0: 0,
            y0: 30,
            x1: 271,
            y1: 353,
        }
        .encode_to_vec()
        .unwrap();
        assert_eq!(
            frame.as_slice(),
            &[
                0xAA, 0x06, 0x12, 0x34, 0x00, 0x00, 0x00, 0x1E, 0x01, 0x0F, 0x01, 0x61, 0xCC,
                0x33, 0xC3, 0x3C
            ]
        );
    }

    #[test]
    fn test_draw_string_layout() {
        let frame = Command::DrawString {
            width_adjust: false,
            show_background: true,
            font: Font::Font8x16,
            color: 0xFFFF,
            background: 0x0000,
            x: 60,
            y: 48,
            text: "Prepare",
            limit: u16::MAX,
        }
        .encode_to_vec()
        .unwrap();
        assert_eq!(frame[1], CMD_DRAW_STRING);
        assert_eq!(frame[2], 0x41);
        assert_eq!(&frame[3..7], &[0xFF, 0xFF, 0x00, 0x00]);
        assert_eq!(&frame[7..11], &[0x00, 60, 0x00, 48]);
        assert_eq!(&frame[11..18], b"Prepare");
        assert_eq!(&frame[18..], &TAIL);
    }

    #[test]
    fn test_draw_string_rlimit() {
        let frame = Command::DrawString {
            width_adjust: false,
            show_background: false,
            font: Font::Font8x16,
            color: 0xFFFF,
            background: 0x0000,
            x: 0,
            y: 0,
            text: "Filename.gcode",
            limit: 8,
        }
        .encode_to_vec()
        .unwrap();
        assert_eq!(&frame[11..19], b"Filename");
        assert_eq!(&frame[19..], &TAIL);
    }

    #[test]
    fn test_draw_string_truncated_to_send_buffer() {
        let text = "0123456789".repeat(12);
        let frame = Command::DrawString {
            width_adjust: false,
            show_background: false,
            font: Font::Font8x16,
            color: 0xFFFF,
            background: 0x0000,
            x: 0,
            y: 0,
            text: &text,
            limit: u16::MAX,
        }
        .encode_to_vec()
        .unwrap();
        let carried = Command::string_len(&text, u16::MAX);
        assert_eq!(carried, MAX_STRING_LEN);
        assert!(carried < text.len());
        assert_eq!(frame.len(), 11 + carried + TAIL.len());
        assert_eq!(&frame[11..11 + carried], &text.as_bytes()[..carried]);
        assert_eq!(&frame[11 + carried..], &TAIL);
        assert_eq!(Command::string_len(&text, 8), 8);
    }

    #[test]
    fn test_draw_value_layout() {
        let frame = value_command(NumberFormat::plain(Font::Font8x16), 3, 1, 2155)
            .encode_to_vec()
            .unwrap();
        assert_eq!(frame[1], CMD_DRAW_VALUE);
        assert_eq!(frame[2], 0x21);
        assert_eq!(&frame[3..7], &[0xFF, 0xFF, 0x00, 0x00]);
        assert_eq!(frame[7], 3); // width
        assert_eq!(frame[8], 1); // decimals
        assert_eq!(&frame[9..13], &[0x00, 210, 0x00, 100]);
        assert_eq!(&frame[13..21], &2155i64.to_be_bytes());
        assert_eq!(&frame[21..], &TAIL);
    }

    // Wire-format quirk carried through the full frame: signed field width
    // depends on the sign of the value.
    #[test]
    fn test_draw_value_signed_width_quirk() {
        let format = NumberFormat::plain(Font::Font8x16).signed();
        let positive = value_command(format, 2, 2, 150).encode_to_vec().unwrap();
        let negative = value_command(format, 2, 2, -150).encode_to_vec().unwrap();
        assert_eq!(positive[7], 3);
        assert_eq!(negative[7], 2);
    }

    #[test]
    fn test_icon_coordinates_clamped() {
        let frame = Command::IconShow {
            flags: IconFlags::TRANSPARENT,
            library: 0x09,
            icon: 13,
            x: 400,
            y: 900,
        }
        .encode_to_vec()
        .unwrap();
        assert_eq!(&frame[2..6], &[0x01, 0x0F, 0x01, 0xDF]);
        assert_eq!(frame[6], 0x20 | 0x09);
        assert_eq!(frame[7], 13);
    }

    #[test]
    fn test_area_move_mode_byte() {
        let frame = Command::AreaMove {
            circular: true,
            dir: AreaMoveDir::Up,
            distance: 53,
            color: 0,
            x0: 0,
            y0: 31,
            x1: 272,
            y1: 349,
        }
        .encode_to_vec()
        .unwrap();
        assert_eq!(frame[2], 0x82);
        assert_eq!(&frame[3..5], &[0x00, 53]);
    }

    proptest! {
        #[test]
        fn prop_float_payload_independent_of_i_num(
            value in -9999.0f32..9999.0,
            f_num in 0u8..4,
            i_a in 1u8..8,
            i_b in 1u8..8,
        ) {
            let format = NumberFormat::plain(Font::MENU);
            let scaled = scale_float(value, f_num);
            let a = value_command(format, i_a, f_num, scaled).encode_to_vec().unwrap();
            let b = value_command(format, i_b, f_num, scaled).encode_to_vec().unwrap();
            prop_assert_eq!(a.len(), b.len());
            prop_assert_eq!(&a[13..21], &b[13..21]);
            prop_assert_eq!(&a[13..21], &scaled.to_be_bytes()[..]);
        }
    }
}
