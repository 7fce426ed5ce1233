//! Bed mesh viewer
//!
//! Each probed point is a cell colored by its deviation on the rainbow scale.
//! The scale is symmetric around zero so a flat bed stays green.

use stratum_core::traits::MachineHost;
use stratum_display::color::{rainbow_int, GREY};
use stratum_display::layout::{mypos, STATUS_Y};
use stratum_display::{NumberStyle, Surface, TextStyle, Transport};
use stratum_protocol::{Font, RectMode};

use crate::theme::Theme;

const GRID_X: u16 = 16;
const GRID_W: u16 = 240;
const GRID_H: u16 = 232;
const TEXT_Y: u16 = STATUS_Y - 22;

fn grid_y() -> u16 {
    mypos(1) + 4
}

/// Deviation in hundredths of a millimeter
fn centi(z: f32) -> i16 {
    let scaled = z * 100.0;
    let rounded = if scaled >= 0.0 { scaled + 0.5 } else { scaled - 0.5 };
    rounded.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Lowest and highest probed deviation, `None` when nothing is probed
pub fn mesh_extent<H: MachineHost + ?Sized>(host: &H) -> Option<(f32, f32)> {
    let (nx, ny) = host.mesh_size();
    let mut extent: Option<(f32, f32)> = None;
    for y in 0..ny {
        for x in 0..nx {
            if let Some(z) = host.mesh_point(x, y) {
                extent = Some(match extent {
                    Some((lo, hi)) => (lo.min(z), hi.max(z)),
                    None => (z, z),
                });
            }
        }
    }
    extent
}

/// Cell color for a deviation, given the largest deviation magnitude
pub fn cell_color(z: Option<f32>, range: f32) -> u16 {
    match z {
        Some(z) => {
            let limit = centi(range).max(1);
            rainbow_int(centi(z), -limit, limit)
        }
        None => GREY,
    }
}

/// Grid of mesh cells plus the min/max line
pub fn draw_mesh<T: Transport, H: MachineHost + ?Sized>(surface: &mut Surface<T>, theme: &Theme, host: &H) {
    let (nx, ny) = host.mesh_size();
    if nx == 0 || ny == 0 {
        let style = TextStyle::new(Font::MENU, theme.text);
        surface.draw_centered_string(style, grid_y() + GRID_H / 2, "No mesh data");
        return;
    }

    let extent = mesh_extent(host);
    let range = extent.map(|(lo, hi)| lo.abs().max(hi.abs())).unwrap_or(0.0);
    let cell_w = GRID_W / nx as u16;
    let cell_h = GRID_H / ny as u16;
    let top = grid_y();

    for y in 0..ny {
        for x in 0..nx {
            let x0 = GRID_X + x as u16 * cell_w;
            // front row of the bed at the bottom
            let y0 = top + (ny - 1 - y) as u16 * cell_h;
            let color = cell_color(host.mesh_point(x, y), range);
            surface.draw_rectangle(
                RectMode::Fill,
                color,
                x0,
                y0,
                x0 + cell_w.saturating_sub(2),
                y0 + cell_h.saturating_sub(2),
            );
        }
    }

    let label = TextStyle::new(Font::MENU, theme.text);
    let number = NumberStyle::new(Font::MENU, theme.text).with_background(theme.background);
    surface.draw_string_styled(label, GRID_X, TEXT_Y, "Min:");
    surface.draw_string_styled(label, 140, TEXT_Y, "Max:");
    if let Some((lo, hi)) = extent {
        surface.draw_signed_float(number, 1, 3, GRID_X + 46, TEXT_Y, lo);
        surface.draw_signed_float(number, 1, 3, 186, TEXT_Y, hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::MockHost;
    use stratum_display::color::rgb;
    use stratum_display::CaptureTransport;
    use stratum_protocol::command::CMD_DRAW_RECTANGLE;

    #[test]
    fn test_extent_ignores_unprobed() {
        let mut host = MockHost::default();
        host.mesh = [[Some(0.1), None, Some(-0.2)], [Some(0.05), None, None], [None; 3]];
        assert_eq!(mesh_extent(&host), Some((-0.2, 0.1)));
    }

    #[test]
    fn test_unprobed_cell_is_grey() {
        assert_eq!(cell_color(None, 0.5), GREY);
    }

    #[test]
    fn test_flat_point_is_green() {
        assert_eq!(cell_color(Some(0.0), 0.2), rgb(0, 38, 0));
    }

    #[test]
    fn test_one_rectangle_per_cell() {
        let mut host = MockHost::default();
        host.mesh = [[Some(0.0); 3]; 3];
        let mut surface = Surface::new(CaptureTransport::<64>::new());
        draw_mesh(&mut surface, &Theme::default(), &host);
        assert_eq!(surface.transport().count_command(CMD_DRAW_RECTANGLE), 9);
    }
}
