//! RGB565 colors, the UI palette and color interpolation

/// Pack 5/6/5-bit channels into an RGB565 word
pub const fn rgb(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0x1F) << 11) | ((g as u16 & 0x3F) << 5) | (b as u16 & 0x1F)
}

/// Red channel (0..=31)
pub const fn red(color: u16) -> u8 {
    ((color >> 11) & 0x1F) as u8
}

/// Green channel (0..=63)
pub const fn green(color: u16) -> u8 {
    ((color >> 5) & 0x3F) as u8
}

/// Blue channel (0..=31)
pub const fn blue(color: u16) -> u8 {
    (color & 0x1F) as u8
}

// Base palette
pub const WHITE: u16 = 0xFFFF;
pub const YELLOW: u16 = rgb(0x1F, 0x3F, 0x00);
pub const RED: u16 = rgb(0x1F, 0x00, 0x00);
pub const ERROR_RED: u16 = 0xB000;
pub const BG_RED: u16 = 0xF00F;
pub const BG_WINDOW: u16 = 0x31E8;
pub const BG_BLUE: u16 = 0x1125;
pub const BG_BLACK: u16 = 0x0841;
pub const ICON_BLUE: u16 = 0x45FA;
pub const POPUP_TEXT: u16 = 0xD6BA;
pub const LINE: u16 = 0x3A6A;
pub const RECTANGLE: u16 = 0xEE2F;
pub const PERCENT: u16 = 0xFE29;
pub const BAR_FILL: u16 = 0x10E4;
pub const SELECT: u16 = 0x33BB;

// Extended palette
pub const AQUA: u16 = rgb(0, 63, 31);
pub const LIGHT_WHITE: u16 = 0xBDD7;
pub const GREEN: u16 = rgb(0, 63, 0);
pub const LIGHT_GREEN: u16 = 0x3460;
pub const CYAN: u16 = 0x07FF;
pub const LIGHT_CYAN: u16 = 0x04F3;
pub const BLUE: u16 = rgb(0, 0, 31);
pub const LIGHT_BLUE: u16 = 0x3A6A;
pub const MAGENTA: u16 = 0xF81F;
pub const LIGHT_MAGENTA: u16 = 0x9813;
pub const LIGHT_RED: u16 = 0x8800;
pub const ORANGE: u16 = 0xFA20;
pub const LIGHT_ORANGE: u16 = 0xFBC0;
pub const LIGHT_YELLOW: u16 = 0x8BE0;
pub const BROWN: u16 = 0xCC27;
pub const LIGHT_BROWN: u16 = 0x6204;
pub const BLACK: u16 = 0x0000;
pub const GREY: u16 = 0x18E3;
pub const CHECK: u16 = 0x4E5C;
pub const CONFIRM: u16 = 0x34B9;
pub const CANCEL: u16 = 0x3186;

// Element defaults, used when a theme slot is set to `Default`
pub const DEF_BACKGROUND: u16 = BG_BLACK;
pub const DEF_CURSOR: u16 = rgb(20, 49, 31);
pub const DEF_TITLE_BG: u16 = rgb(0, 23, 16);
pub const DEF_TITLE_TEXT: u16 = WHITE;
pub const DEF_TEXT: u16 = WHITE;
pub const DEF_SELECTED: u16 = SELECT;
pub const DEF_SPLIT_LINE: u16 = rgb(0, 23, 16);
pub const DEF_HIGHLIGHT: u16 = WHITE;
pub const DEF_STATUS_BG: u16 = rgb(0, 23, 16);
pub const DEF_STATUS_TEXT: u16 = YELLOW;
pub const DEF_POPUP_BG: u16 = BG_WINDOW;
pub const DEF_POPUP_TEXT: u16 = POPUP_TEXT;
pub const DEF_ALERT_BG: u16 = BG_RED;
pub const DEF_ALERT_TEXT: u16 = YELLOW;
pub const DEF_PERCENT_TEXT: u16 = PERCENT;
pub const DEF_BAR_FILL: u16 = BAR_FILL;
pub const DEF_INDICATOR: u16 = WHITE;
pub const DEF_COORDINATE: u16 = WHITE;

/// Selectable colors of a theme slot, by their persisted index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThemeColor {
    Default = 0,
    White = 1,
    Green = 2,
    Cyan = 3,
    Blue = 4,
    Magenta = 5,
    Red = 6,
    Orange = 7,
    Yellow = 8,
    Brown = 9,
    Black = 10,
}

impl ThemeColor {
    /// Highest valid index
    pub const MAX_INDEX: u8 = 10;

    pub fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => ThemeColor::Default,
            1 => ThemeColor::White,
            2 => ThemeColor::Green,
            3 => ThemeColor::Cyan,
            4 => ThemeColor::Blue,
            5 => ThemeColor::Magenta,
            6 => ThemeColor::Red,
            7 => ThemeColor::Orange,
            8 => ThemeColor::Yellow,
            9 => ThemeColor::Brown,
            10 => ThemeColor::Black,
            _ => return None,
        })
    }

    /// RGB565 value, `original` standing in for `Default`
    pub fn resolve(self, original: u16, light: bool) -> u16 {
        let (normal, lighter) = match self {
            ThemeColor::Default => return original,
            ThemeColor::White => (WHITE, LIGHT_WHITE),
            ThemeColor::Green => (GREEN, LIGHT_GREEN),
            ThemeColor::Cyan => (CYAN, LIGHT_CYAN),
            ThemeColor::Blue => (BLUE, LIGHT_BLUE),
            ThemeColor::Magenta => (MAGENTA, LIGHT_MAGENTA),
            ThemeColor::Red => (RED, LIGHT_RED),
            ThemeColor::Orange => (ORANGE, LIGHT_ORANGE),
            ThemeColor::Yellow => (YELLOW, LIGHT_YELLOW),
            ThemeColor::Brown => (BROWN, LIGHT_BROWN),
            ThemeColor::Black => (BLACK, BLACK),
        };
        if light {
            lighter
        } else {
            normal
        }
    }
}

/// Resolve a persisted theme index; unknown indices behave as `Default`
pub fn theme_color(index: u8, original: u16, light: bool) -> u16 {
    ThemeColor::from_index(index)
        .unwrap_or(ThemeColor::Default)
        .resolve(original, light)
}

/// Linear blend from `from` at `minv` to `to` at `maxv`
///
/// `val` outside the range extrapolates; channels saturate at their width.
pub fn color_int(val: i16, minv: i16, maxv: i16, from: u16, to: u16) -> u16 {
    let span = maxv as f32 - minv as f32;
    let n = if span == 0.0 {
        0.0
    } else {
        (val as f32 - minv as f32) / span
    };
    let mix = |a: u8, b: u8| ((1.0 - n) * a as f32 + n * b as f32) as u8;
    rgb(
        mix(red(from), red(to)),
        mix(green(from), green(to)),
        mix(blue(from), blue(to)),
    )
}

/// Normalized position used by [`rainbow_int`], clamped to `[-1, 1]`
///
/// All-positive ranges map `minv..maxv` onto `0..1`. Ranges reaching below
/// zero are scaled by the larger magnitude of the two bounds, so zero stays
/// at zero and negative values land on the blue side.
pub fn rainbow_position(val: i16, minv: i16, maxv: i16) -> f32 {
    let n = if minv >= 0 {
        let span = maxv as f32 - minv as f32;
        if span == 0.0 {
            0.0
        } else {
            (val as f32 - minv as f32) / span
        }
    } else {
        let limv = (minv as i32).abs().max((maxv as i32).abs());
        val as f32 / limv as f32
    };
    n.clamp(-1.0, 1.0)
}

/// Heat-map color: blue below zero, green at zero, through yellow to red
pub fn rainbow_int(val: i16, minv: i16, maxv: i16) -> u16 {
    const MAX_B: f32 = 28.0;
    const MAX_R: f32 = 28.0;
    const MAX_G: f32 = 38.0;

    let n = rainbow_position(val, minv, maxv);
    let (r, g, b) = if n < 0.0 {
        (0.0, (1.0 + n) * MAX_G, -n * MAX_B)
    } else if n < 0.5 {
        (MAX_R * n * 2.0, MAX_G, 0.0)
    } else {
        (MAX_R, MAX_G * (1.0 - n), 0.0)
    };
    rgb(r as u8, g as u8, b as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rgb_packing() {
        assert_eq!(rgb(31, 63, 31), 0xFFFF);
        assert_eq!(rgb(31, 0, 0), 0xF800);
        assert_eq!(rgb(0, 63, 0), 0x07E0);
        assert_eq!(rgb(0, 0, 31), 0x001F);
        assert_eq!(red(0xF800), 31);
        assert_eq!(green(0x07E0), 63);
        assert_eq!(blue(0x001F), 31);
    }

    #[test]
    fn test_theme_default_keeps_original() {
        assert_eq!(theme_color(0, 0x1234, false), 0x1234);
        assert_eq!(theme_color(1, 0x1234, false), WHITE);
        assert_eq!(theme_color(1, 0x1234, true), LIGHT_WHITE);
        assert_eq!(theme_color(10, 0x1234, true), BLACK);
        assert_eq!(theme_color(11, 0x1234, false), 0x1234);
    }

    #[test]
    fn test_color_int_endpoints() {
        assert_eq!(color_int(0, 0, 100, BLACK, WHITE), BLACK);
        assert_eq!(color_int(100, 0, 100, BLACK, WHITE), WHITE);
        assert_eq!(color_int(50, 0, 100, BLACK, rgb(30, 60, 30)), rgb(15, 30, 15));
    }

    // Negative-reaching range: normalized by max(|minv|, |maxv|)
    #[test]
    fn test_rainbow_signed_range_zero_is_green() {
        assert_eq!(rainbow_position(0, -50, 100), 0.0);
        assert_eq!(rainbow_int(0, -50, 100), rgb(0, 38, 0));
        assert_eq!(rainbow_position(-50, -50, 100), -0.5);
    }

    // All-positive range: normalized by (val - minv) / (maxv - minv)
    #[test]
    fn test_rainbow_positive_range_midpoint() {
        assert_eq!(rainbow_position(50, 0, 100), 0.5);
        // 0.5 is the boundary: falls into the upper band
        assert_eq!(rainbow_int(50, 0, 100), rgb(28, 19, 0));
        assert_eq!(rainbow_int(0, 0, 100), rgb(0, 38, 0));
        assert_eq!(rainbow_int(100, 0, 100), rgb(28, 0, 0));
    }

    #[test]
    fn test_rainbow_same_value_different_ranges() {
        // minv itself maps to 0 on a positive range, but not on a signed one
        assert_eq!(rainbow_position(20, 20, 100), 0.0);
        assert_eq!(rainbow_position(-20, -20, 100), -0.2);
    }

    #[test]
    fn test_rainbow_clamped() {
        assert_eq!(rainbow_position(500, 0, 100), 1.0);
        assert_eq!(rainbow_position(-500, -100, 100), -1.0);
        assert_eq!(rainbow_int(-500, -100, 100), rgb(0, 0, 28));
    }

    proptest! {
        #[test]
        fn prop_rainbow_position_bounded(val in any::<i16>(), minv in -1000i16..1000, maxv in -1000i16..1000) {
            let n = rainbow_position(val, minv, maxv);
            prop_assert!((-1.0..=1.0).contains(&n));
        }
    }
}
