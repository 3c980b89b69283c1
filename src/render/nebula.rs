use std::f32::consts::TAU;

use super::color::{hsla, Rgba};
use super::surface::{Paint, RenderSurface};
use super::{max_radius, normalized};

const LAYERS: usize = 3;
const DISC_ALPHA: f32 = 0.3;

/// Three static rings displaced outward by magnitude, under a faint disc.
pub fn paint(frame: &[u8], _time: f32, surface: &mut dyn RenderSurface) {
    let center = surface.center();
    let max_radius = max_radius(surface);

    surface.clear();

    let count = frame.len() as f32;
    for layer in 0..LAYERS {
        let l = layer as f32;
        let layer_radius = max_radius * (1.0 - l * 0.3);
        for (index, &value) in frame.iter().enumerate() {
            let i = index as f32;
            let angle = i / count * TAU;
            let offset = normalized(value) * (layer_radius / 2.0);
            let color = hsla(i * 360.0 / count, 70.0, 50.0, 0.7 - l * 0.2);
            surface.fill_arc(center.polar(angle, layer_radius + offset), 2.0 + l, &Paint::Solid(color));
        }
    }

    if frame.is_empty() {
        return;
    }

    let disc = Paint::radial(
        center,
        0.0,
        max_radius,
        &[
            (0.0, Rgba::new(100, 0, 255, 0.7)),
            (0.5, Rgba::new(0, 255, 255, 0.5)),
            (1.0, Rgba::new(255, 0, 255, 0.3)),
        ],
    );
    surface.set_global_alpha(DISC_ALPHA);
    surface.fill_arc(center, max_radius, &disc);
    surface.set_global_alpha(1.0);
}
