//! Stateful drawing surface
//!
//! [`Surface`] owns the transport and the [`DisplayContext`] (cursor, font
//! and colors). Every primitive turns into one or more wire commands sent
//! straight away; nothing is buffered and nothing reports failure.

use stratum_protocol::icons::ICON_LIBRARY;
use stratum_protocol::{
    AreaMoveDir, Command, Font, IconFlags, NumberFormat, RectMode, DISPLAY_WIDTH, MAX_FRAME_SIZE,
};

use crate::color;
use crate::layout::{FrameRect, MENU_AREA};
use crate::transport::Transport;

/// Cursor position, font and colors shared by the cursor-relative primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayContext {
    pub x: i16,
    pub y: i16,
    pub font: Font,
    pub pen_color: u16,
    pub text_color: u16,
    pub back_color: u16,
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            font: Font::Font8x16,
            pen_color: color::WHITE,
            text_color: color::DEF_TEXT,
            back_color: color::DEF_BACKGROUND,
        }
    }
}

/// Font and colors for a string
///
/// With a background the glyph cells are painted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    pub font: Font,
    pub color: u16,
    pub background: u16,
    pub show_background: bool,
}

impl TextStyle {
    /// Transparent text
    pub const fn new(font: Font, color: u16) -> Self {
        Self {
            font,
            color,
            background: 0,
            show_background: false,
        }
    }

    /// Text over a painted background
    pub const fn with_background(mut self, background: u16) -> Self {
        self.background = background;
        self.show_background = true;
        self
    }
}

/// Format and colors for a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NumberStyle {
    pub format: NumberFormat,
    pub color: u16,
    pub background: u16,
}

impl NumberStyle {
    pub const fn new(font: Font, color: u16) -> Self {
        Self {
            format: NumberFormat::plain(font),
            color,
            background: 0,
        }
    }

    /// Paint `background` behind the digits
    pub const fn with_background(mut self, background: u16) -> Self {
        self.format = self.format.with_background();
        self.background = background;
        self
    }

    /// Style of the sign glyph drawn next to a signed float
    const fn sign_style(&self) -> TextStyle {
        TextStyle {
            font: self.format.font,
            color: self.color,
            background: self.background,
            show_background: self.format.show_background,
        }
    }
}

/// Drawing surface over a [`Transport`]
pub struct Surface<T: Transport> {
    transport: T,
    ctx: DisplayContext,
}

fn coord(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

/// Floor of the square root
fn isqrt(n: u32) -> u32 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

impl<T: Transport> Surface<T> {
    /// Wrap a transport; the context starts at its defaults
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            ctx: DisplayContext::default(),
        }
    }

    /// Handshake, orientation, clear, latch; resets the context
    pub fn init(&mut self) {
        self.send(Command::Handshake);
        self.send(Command::FrameSetDir { dir: 1 });
        self.send(Command::FrameClear {
            color: color::BG_BLACK,
        });
        self.send(Command::UpdateLcd);
        self.ctx = DisplayContext::default();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn context(&self) -> &DisplayContext {
        &self.ctx
    }

    fn send(&mut self, command: Command<'_>) {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        match command.encode(&mut buffer) {
            Ok(len) => self.transport.send_bytes(&buffer[..len]),
            Err(_e) => warn!("frame encode failed: {}", _e),
        }
    }

    // Context

    pub fn set_font(&mut self, font: Font) {
        self.ctx.font = font;
    }

    pub fn set_colors(&mut self, text: u16, background: u16) {
        self.ctx.text_color = text;
        self.ctx.back_color = background;
    }

    pub fn set_text_color(&mut self, text: u16) {
        self.ctx.text_color = text;
    }

    pub fn set_background_color(&mut self, background: u16) {
        self.ctx.back_color = background;
    }

    pub fn set_pen_color(&mut self, pen: u16) {
        self.ctx.pen_color = pen;
    }

    pub fn move_to(&mut self, x: i16, y: i16) {
        self.ctx.x = x;
        self.ctx.y = y;
    }

    pub fn move_by(&mut self, dx: i16, dy: i16) {
        self.ctx.x = self.ctx.x.wrapping_add(dx);
        self.ctx.y = self.ctx.y.wrapping_add(dy);
    }

    /// Screen x of text column `col` in the current font
    pub fn col_to_x(&self, col: u8) -> u16 {
        col as u16 * self.ctx.font.width()
    }

    /// Screen y of text row `row` in the current font
    pub fn row_to_y(&self, row: u8) -> u16 {
        row as u16 * self.ctx.font.height()
    }

    fn cursor(&self) -> (u16, u16) {
        (coord(self.ctx.x as i32), coord(self.ctx.y as i32))
    }

    fn advance(&mut self, chars: usize, font: Font) {
        let dx = (chars as i32 * font.width() as i32).clamp(0, i16::MAX as i32) as i16;
        self.move_by(dx, 0);
    }

    // Panel control

    pub fn frame_clear(&mut self, color: u16) {
        self.send(Command::FrameClear { color });
    }

    pub fn update_lcd(&mut self) {
        self.send(Command::UpdateLcd);
    }

    pub fn backlight(&mut self, luminance: u8) {
        self.send(Command::Backlight { luminance });
    }

    // Shapes

    pub fn draw_point(&mut self, color: u16, width: u8, height: u8, x: u16, y: u16) {
        self.send(Command::DrawPoint {
            color,
            width,
            height,
            x,
            y,
        });
    }

    pub fn draw_line(&mut self, color: u16, x0: u16, y0: u16, x1: u16, y1: u16) {
        self.send(Command::DrawLine {
            color,
            x0,
            y0,
            x1,
            y1,
        });
    }

    /// Line from the cursor to `(x, y)` in the pen color
    pub fn line_to(&mut self, x: u16, y: u16) {
        let (x0, y0) = self.cursor();
        self.draw_line(self.ctx.pen_color, x0, y0, x, y);
    }

    pub fn draw_rectangle(&mut self, mode: RectMode, color: u16, x0: u16, y0: u16, x1: u16, y1: u16) {
        self.send(Command::DrawRectangle {
            mode,
            color,
            x0,
            y0,
            x1,
            y1,
        });
    }

    /// Rectangle given by corner and size
    pub fn draw_box(&mut self, mode: RectMode, color: u16, frame: FrameRect) {
        let x1 = (frame.x + frame.w).saturating_sub(1);
        let y1 = (frame.y + frame.h).saturating_sub(1);
        self.draw_rectangle(mode, color, frame.x, frame.y, x1, y1);
    }

    /// Shift an area by `distance` pixels, filling the uncovered strip
    pub fn area_move(&mut self, dir: AreaMoveDir, distance: u16, color: u16, frame: FrameRect) {
        self.send(Command::AreaMove {
            circular: false,
            dir,
            distance,
            color,
            x0: frame.x,
            y0: frame.y,
            x1: frame.x + frame.w,
            y1: frame.y + frame.h,
        });
    }

    /// Circle outline of radius `r` centered on `(x, y)`
    pub fn draw_circle(&mut self, color: u16, x: u16, y: u16, r: u8) {
        let (x, y) = (x as i32, y as i32);
        let r2 = r as u32 * r as u32;
        let mut a: i32 = 0;
        let mut b: i32 = 0;
        while a <= b {
            b = isqrt(r2.saturating_sub((a * a) as u32)) as i32;
            if a == 0 {
                b -= 1;
            }
            for (px, py) in [
                (x + a, y + b),
                (x + b, y + a),
                (x + b, y - a),
                (x + a, y - b),
                (x - a, y - b),
                (x - b, y - a),
                (x - b, y + a),
                (x - a, y + b),
            ] {
                self.draw_point(color, 1, 1, coord(px), coord(py));
            }
            a += 1;
        }
    }

    /// Circle outline around the cursor
    pub fn draw_circle_here(&mut self, color: u16, r: u8) {
        let (x, y) = self.cursor();
        self.draw_circle(color, x, y, r);
    }

    /// Filled circle of radius `r` centered on `(x, y)`
    pub fn draw_fill_circle(&mut self, color: u16, x: u16, y: u16, r: u8) {
        let (x, y) = (x as i32, y as i32);
        let r2 = r as u32 * r as u32;
        let mut a: i32 = 0;
        let mut b: i32 = 0;
        while a <= b {
            b = isqrt(r2.saturating_sub((a * a) as u32)) as i32;
            if a == 0 {
                b -= 1;
            }
            for (x0, y0, x1, y1) in [
                (x - b, y - a, x + b, y - a),
                (x - a, y - b, x + a, y - b),
                (x - b, y + a, x + b, y + a),
                (x - a, y + b, x + a, y + b),
            ] {
                self.draw_line(color, coord(x0), coord(y0), coord(x1), coord(y1));
            }
            a += 1;
        }
    }

    /// Checkbox with its upper-left corner at `(x, y)`
    pub fn draw_checkbox(&mut self, color: u16, background: u16, x: u16, y: u16, checked: bool) {
        let style = TextStyle::new(Font::Font8x16, color).with_background(background);
        self.draw_string_styled(style, x + 4, y, if checked { "x" } else { " " });
        self.draw_rectangle(RectMode::Frame, color, x + 2, y + 2, x + 17, y + 17);
    }

    /// Small degree ring with its upper-left pixel at `(x, y)`
    pub fn draw_degree_symbol(&mut self, color: u16, x: u16, y: u16) {
        for (dx, dy) in [(1, 0), (2, 0), (0, 1), (3, 1), (0, 2), (3, 2), (1, 3), (2, 3)] {
            self.draw_point(color, 1, 1, x + dx, y + dy);
        }
    }

    /// Fill the menu area with the background color
    pub fn clear_menu_area(&mut self) {
        let back = self.ctx.back_color;
        self.draw_box(RectMode::Fill, back, MENU_AREA);
    }

    // Text

    /// Draw a string with an explicit style
    pub fn draw_string_styled(&mut self, style: TextStyle, x: u16, y: u16, text: &str) {
        self.draw_string_limited(style, x, y, text, u16::MAX);
    }

    /// Draw at most `limit` characters of `text`
    ///
    /// Returns the number of bytes the frame carried, which is also bounded
    /// by the controller's buffer.
    pub fn draw_string_limited(
        &mut self,
        style: TextStyle,
        x: u16,
        y: u16,
        text: &str,
        limit: u16,
    ) -> usize {
        self.send(Command::DrawString {
            width_adjust: false,
            show_background: style.show_background,
            font: style.font,
            color: style.color,
            background: style.background,
            x,
            y,
            text,
            limit,
        });
        Command::string_len(text, limit)
    }

    /// Draw at `(x, y)` in the context font and text color
    pub fn draw_string_at(&mut self, x: u16, y: u16, text: &str) {
        let style = TextStyle::new(self.ctx.font, self.ctx.text_color);
        self.draw_string_styled(style, x, y, text);
    }

    /// Draw at the cursor and advance it by the characters drawn
    pub fn draw_string(&mut self, text: &str) {
        self.draw_string_colored(self.ctx.text_color, text, u16::MAX);
    }

    /// Cursor variant with explicit color and an `rlimit`
    pub fn draw_string_colored(&mut self, color: u16, text: &str, rlimit: u16) {
        let (x, y) = self.cursor();
        let font = self.ctx.font;
        let drawn = self.draw_string_limited(TextStyle::new(font, color), x, y, text, rlimit);
        self.advance(drawn, font);
    }

    /// Single character at the cursor
    pub fn draw_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        let text: &str = c.encode_utf8(&mut buf);
        self.draw_string_colored(self.ctx.text_color, text, 1);
    }

    /// Draw horizontally centered on the full display width
    ///
    /// A string wider than the display starts at column zero.
    pub fn draw_centered_string(&mut self, style: TextStyle, y: u16, text: &str) {
        let width = text.len() as i32 * style.font.width() as i32;
        let x = ((DISPLAY_WIDTH as i32 - width).max(0) / 2 - 1).max(0);
        self.draw_string_styled(style, x as u16, y, text);
    }

    // Numbers

    /// Context style for cursor-relative numbers
    pub fn number_style(&self) -> NumberStyle {
        NumberStyle {
            format: NumberFormat::plain(self.ctx.font),
            color: self.ctx.text_color,
            background: self.ctx.back_color,
        }
    }

    /// Integer with `i_num` digits
    pub fn draw_int(&mut self, style: NumberStyle, i_num: u8, x: u16, y: u16, value: i32) {
        self.send(Command::DrawValue {
            format: style.format,
            color: style.color,
            background: style.background,
            i_num,
            f_num: 0,
            x,
            y,
            value: value as i64,
        });
    }

    /// Fixed-point float with `i_num` whole and `f_num` decimal digits
    pub fn draw_float(&mut self, style: NumberStyle, i_num: u8, f_num: u8, x: u16, y: u16, value: f32) {
        self.send(Command::DrawValue {
            format: style.format,
            color: style.color,
            background: style.background,
            i_num,
            f_num,
            x,
            y,
            value: stratum_protocol::scale_float(value, f_num),
        });
    }

    /// Float magnitude with a separate `-` or blank glyph just left of it
    pub fn draw_signed_float(&mut self, style: NumberStyle, i_num: u8, f_num: u8, x: u16, y: u16, value: f32) {
        let negative = value < 0.0;
        let magnitude = if negative { -value } else { value };
        self.draw_float(style, i_num, f_num, x, y, magnitude);
        let sign = if negative { "-" } else { " " };
        self.draw_string_styled(style.sign_style(), x.saturating_sub(6), y, sign);
    }

    /// Integer at the cursor, advancing it by the field width
    pub fn draw_int_here(&mut self, i_num: u8, value: i32) {
        let (x, y) = self.cursor();
        let style = self.number_style();
        self.draw_int(style, i_num, x, y, value);
        self.advance(i_num as usize, style.format.font);
    }

    /// Float at the cursor, advancing it by the field width plus the point
    pub fn draw_float_here(&mut self, i_num: u8, f_num: u8, value: f32) {
        let (x, y) = self.cursor();
        let style = self.number_style();
        self.draw_float(style, i_num, f_num, x, y, value);
        self.advance(i_num as usize + f_num as usize + 1, style.format.font);
    }

    /// Signed float at the cursor
    pub fn draw_signed_float_here(&mut self, i_num: u8, f_num: u8, value: f32) {
        let (x, y) = self.cursor();
        let style = self.number_style();
        self.draw_signed_float(style, i_num, f_num, x, y, value);
        self.advance(i_num as usize + f_num as usize + 1, style.format.font);
    }

    // Icons

    /// Icon from the UI library drawn over the existing content
    pub fn draw_icon(&mut self, icon: u8, x: u16, y: u16) {
        self.icon_show(IconFlags::TRANSPARENT, ICON_LIBRARY, icon, x, y);
    }

    /// Icon from the UI library including its own background
    pub fn draw_icon_with_background(&mut self, icon: u8, x: u16, y: u16) {
        self.icon_show(IconFlags::OPAQUE, ICON_LIBRARY, icon, x, y);
    }

    pub fn icon_show(&mut self, flags: IconFlags, library: u8, icon: u8, x: u16, y: u16) {
        self.send(Command::IconShow {
            flags,
            library,
            icon,
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::CaptureTransport;
    use stratum_protocol::command::{
        CMD_DRAW_LINE, CMD_DRAW_POINT, CMD_DRAW_RECTANGLE, CMD_DRAW_STRING, CMD_DRAW_VALUE,
    };

    fn surface() -> Surface<CaptureTransport<512>> {
        Surface::new(CaptureTransport::new())
    }

    fn u16_at(frame: &[u8], offset: usize) -> u16 {
        u16::from_be_bytes([frame[offset], frame[offset + 1]])
    }

    #[test]
    fn test_init_sequence() {
        let mut s = surface();
        s.move_to(10, 10);
        s.init();
        let cmds: heapless::Vec<u8, 8> = s.transport().commands().collect();
        assert_eq!(cmds.as_slice(), &[0x00, 0x34, 0x01, 0x3D]);
        assert_eq!(*s.context(), DisplayContext::default());
    }

    #[test]
    fn test_draw_string_advances_cursor() {
        let mut s = surface();
        s.move_to(60, 48);
        s.draw_string("Move");
        assert_eq!(s.context().x, 60 + 4 * 8);
        assert_eq!(s.context().y, 48);

        s.set_font(Font::Font10x20);
        s.draw_string_colored(color::WHITE, "Filename", 3);
        assert_eq!(s.context().x, 92 + 3 * 10);

        let frame = s.transport().last().unwrap();
        assert_eq!(&frame[11..14], b"Fil");
    }

    #[test]
    fn test_long_string_advances_by_carried_bytes() {
        let mut s = surface();
        s.move_to(0, 0);
        let text = "ABCDEFGHIJ".repeat(12);
        s.set_font(Font::Font6x12);
        s.draw_string(&text);
        let frame = s.transport().last().unwrap();
        let carried = frame.len() - 11 - 4;
        assert_eq!(carried, stratum_protocol::MAX_STRING_LEN);
        assert_eq!(s.context().x, (carried * 6) as i16);
    }

    #[test]
    fn test_move_by_relative() {
        let mut s = surface();
        s.move_to(5, 5);
        s.move_by(-10, 20);
        assert_eq!((s.context().x, s.context().y), (-5, 25));
    }

    #[test]
    fn test_draw_float_here_advances_past_point() {
        let mut s = surface();
        s.move_to(0, 0);
        s.draw_float_here(3, 2, 1.5);
        assert_eq!(s.context().x, 6 * 8);
        let frame = s.transport().last().unwrap();
        assert_eq!(frame[1], CMD_DRAW_VALUE);
        assert_eq!(&frame[13..21], &150i64.to_be_bytes());
    }

    #[test]
    fn test_signed_float_two_commands() {
        let mut s = surface();
        let style = NumberStyle::new(Font::MENU, color::WHITE).with_background(color::BG_BLACK);
        s.draw_signed_float(style, 2, 2, 210, 100, -1.25);

        let frames: heapless::Vec<&heapless::Vec<u8, MAX_FRAME_SIZE>, 2> =
            s.transport().frames().collect();
        assert_eq!(frames.len(), 2);

        // Magnitude, unsigned
        assert_eq!(frames[0][1], CMD_DRAW_VALUE);
        assert_eq!(frames[0][2] & 0x40, 0);
        assert_eq!(&frames[0][13..21], &125i64.to_be_bytes());

        // Sign glyph six pixels to the left
        assert_eq!(frames[1][1], CMD_DRAW_STRING);
        assert_eq!(u16_at(frames[1], 7), 204);
        assert_eq!(&frames[1][11..12], b"-");
    }

    #[test]
    fn test_signed_float_positive_blank_sign() {
        let mut s = surface();
        let style = NumberStyle::new(Font::MENU, color::WHITE);
        s.draw_signed_float(style, 2, 2, 210, 100, 0.5);
        assert!(s.transport().contains_text(" "));
        let first = s.transport().frames().next().unwrap();
        assert_eq!(&first[13..21], &50i64.to_be_bytes());
    }

    #[test]
    fn test_centered_string() {
        let mut s = surface();
        let style = TextStyle::new(Font::Font10x20, color::WHITE);
        s.draw_centered_string(style, 100, "Hello");
        let frame = s.transport().last().unwrap();
        // (272 - 50) / 2 - 1
        assert_eq!(u16_at(frame, 7), 110);
    }

    #[test]
    fn test_centered_string_wider_than_display() {
        let mut s = surface();
        let style = TextStyle::new(Font::Font32x64, color::WHITE);
        s.draw_centered_string(style, 0, "TOO WIDE TEXT");
        let frame = s.transport().last().unwrap();
        assert_eq!(u16_at(frame, 7), 0);
    }

    #[test]
    fn test_circle_is_symmetric_and_linear() {
        let mut s = surface();
        s.draw_circle(color::WHITE, 100, 100, 10);
        let points = s.transport().count_command(CMD_DRAW_POINT);
        assert_eq!(points % 8, 0);
        assert!(points > 0 && points <= 8 * 10);
        for frame in s.transport().frames() {
            let px = u16_at(frame, 6) as i32 - 100;
            let py = u16_at(frame, 8) as i32 - 100;
            let d2 = px * px + py * py;
            assert!(d2 <= 100, "point outside radius: {} {}", px, py);
            assert!(d2 >= 64, "point too far inside: {} {}", px, py);
        }
    }

    #[test]
    fn test_fill_circle_uses_lines() {
        let mut s = surface();
        s.draw_fill_circle(color::RED, 50, 50, 6);
        assert_eq!(s.transport().count_command(CMD_DRAW_POINT), 0);
        let lines = s.transport().count_command(CMD_DRAW_LINE);
        assert_eq!(lines % 4, 0);
        assert!(lines > 0);
    }

    #[test]
    fn test_circle_near_origin_clamps() {
        let mut s = surface();
        s.draw_circle(color::WHITE, 2, 2, 5);
        for frame in s.transport().frames() {
            assert!(u16_at(frame, 6) < 10);
        }
    }

    #[test]
    fn test_checkbox() {
        let mut s = surface();
        s.draw_checkbox(color::WHITE, color::BG_BLACK, 230, 48, true);
        let frames: heapless::Vec<&heapless::Vec<u8, MAX_FRAME_SIZE>, 2> =
            s.transport().frames().collect();
        assert_eq!(frames[0][1], CMD_DRAW_STRING);
        assert_eq!(frames[0][2], 0x40 | Font::Font8x16.code());
        assert_eq!(u16_at(frames[0], 7), 234);
        assert_eq!(&frames[0][11..12], b"x");
        assert_eq!(frames[1][1], CMD_DRAW_RECTANGLE);
        assert_eq!(u16_at(frames[1], 4), 232);
        assert_eq!(u16_at(frames[1], 10), 48 + 17);
    }

    #[test]
    fn test_clear_menu_area() {
        let mut s = surface();
        s.set_background_color(0x1234);
        s.clear_menu_area();
        let frame = s.transport().last().unwrap();
        assert_eq!(frame[1], CMD_DRAW_RECTANGLE | 0x01);
        assert_eq!(u16_at(frame, 2), 0x1234);
        assert_eq!(u16_at(frame, 6), 30);
        assert_eq!(u16_at(frame, 8), 271);
        assert_eq!(u16_at(frame, 10), 353);
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
        assert_eq!(isqrt(65025), 255);
    }
}
