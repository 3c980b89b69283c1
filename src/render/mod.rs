pub mod color;
pub mod raster;
pub mod style;
pub mod surface;

mod bars;
mod nebula;
mod neural;
mod organic;
mod quantum;
mod radial_pulse;

use color::Rgba;
use surface::{Paint, Rect, RenderSurface};

/// Fraction of the shorter canvas side used by the circular styles.
const RADIUS_FRACTION: f32 = 0.4;
const TRAIL_FADE: Rgba = Rgba::new(0, 0, 0, 0.1);

fn normalized(value: u8) -> f32 {
    value as f32 / 255.0
}

fn max_radius(surface: &dyn RenderSurface) -> f32 {
    surface.width().min(surface.height()) as f32 * RADIUS_FRACTION
}

/// Paint a translucent black layer over the previous frame instead of
/// clearing it, so earlier frames linger as a trail.
fn fade_trail(surface: &mut dyn RenderSurface) {
    let full = Rect::new(0.0, 0.0, surface.width() as f32, surface.height() as f32);
    surface.fill_rect(full, &Paint::Solid(TRAIL_FADE));
}
