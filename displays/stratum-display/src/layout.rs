//! Screen geometry shared by every renderer

use stratum_protocol::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Title bar height
pub const TITLE_HEIGHT: u16 = 30;
/// Menu line height
pub const MLINE: u16 = 53;
/// Top of the status area
pub const STATUS_Y: u16 = 354;
/// Menu rows on one page, back row included
pub const TROWS: u8 = ((STATUS_Y - TITLE_HEIGHT) / MLINE) as u8;
/// Menu rows below the back row
pub const MROWS: u8 = TROWS - 1;
/// Menu item icon x
pub const ICOX: u16 = 26;
/// Menu item label x
pub const LBLX: u16 = 60;
/// Menu item value x
pub const VALX: u16 = 210;
/// Menu font cell
pub const MENU_CHR_W: u16 = 8;
pub const MENU_CHR_H: u16 = 16;
/// Status font cell width
pub const STAT_CHR_W: u16 = 10;
/// Text columns across the screen in the menu font
pub const LCD_COLUMNS: u16 = DISPLAY_WIDTH / 8;

/// Caption offset inside a menu line
pub const CAPOFF: u16 = (MLINE - MENU_CHR_H) / 2;

/// Top of menu line `row`
pub const fn mypos(row: u8) -> u16 {
    TITLE_HEIGHT + MLINE * row as u16
}

/// Caption baseline of menu line `row`
pub const fn mbase(row: u8) -> u16 {
    mypos(row) + CAPOFF
}

/// A rectangle given by corner and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl FrameRect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }
}

/// The menu area between title bar and status area
pub const MENU_AREA: FrameRect = FrameRect::new(0, TITLE_HEIGHT, DISPLAY_WIDTH, STATUS_Y - TITLE_HEIGHT);

/// The whole panel
pub const FULL_SCREEN: FrameRect = FrameRect::new(0, 0, DISPLAY_WIDTH, DISPLAY_HEIGHT);
