use std::f32::consts::PI;

use super::color::Rgba;
use super::surface::{Paint, RenderSurface};

const TURNS: f32 = 10.0;
const MAX_RADIUS: f32 = 300.0;

/// One soft blob per bin, spiralling ten turns around the centre.
pub fn paint(frame: &[u8], _time: f32, surface: &mut dyn RenderSurface) {
    surface.clear();

    let center = surface.center();
    let count = frame.len() as f32;
    for (index, &value) in frame.iter().enumerate() {
        let radius = value as f32 / 255.0 * MAX_RADIUS;
        if radius <= 0.0 {
            continue;
        }
        let angle = index as f32 / count * TURNS * 2.0 * PI;

        // The gradient stays centred on the canvas, not on the blob.
        let wave = Paint::radial(
            center,
            0.0,
            radius,
            &[(0.0, Rgba::new(value, 50, 200, 0.3)), (1.0, Rgba::TRANSPARENT)],
        );
        surface.fill_arc(center.polar(angle, radius), radius, &wave);
    }
}
