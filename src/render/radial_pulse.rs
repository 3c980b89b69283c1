use std::f32::consts::TAU;

use super::color::{hsla, Rgba};
use super::surface::{Paint, RenderSurface};
use super::{fade_trail, max_radius, normalized};

const LAYERS: usize = 3;
const PULSE_AMPLITUDE: f32 = 20.0;
const ROTATION_SPEED: f32 = 0.5;

/// Rotating rings of dots over a translucent disc.
pub fn paint(frame: &[u8], time: f32, surface: &mut dyn RenderSurface) {
    let center = surface.center();
    let max_radius = max_radius(surface);

    fade_trail(surface);
    if frame.is_empty() {
        return;
    }

    let base = Paint::radial(
        center,
        0.0,
        max_radius,
        &[
            (0.0, Rgba::new(0, 255, 255, 0.3)),
            (0.5, Rgba::new(255, 0, 255, 0.2)),
            (1.0, Rgba::new(255, 255, 0, 0.1)),
        ],
    );
    surface.fill_arc(center, max_radius, &base);

    let count = frame.len() as f32;
    let rotation = time * ROTATION_SPEED;
    for (index, &value) in frame.iter().enumerate() {
        let i = index as f32;
        let angle = i / count * TAU + rotation;
        let radius = normalized(value) * max_radius;
        let pulse = (time * 2.0 + i * 0.2).sin() * PULSE_AMPLITUDE;

        for layer in 0..LAYERS {
            let l = layer as f32;
            let layer_radius = radius * (1.0 - l * 0.3) + pulse;
            let hue = (i * 360.0 / count + l * 50.0 + time * 100.0) % 360.0;
            let color = hsla(hue, 70.0, 50.0, 0.7 - l * 0.2);
            surface.fill_arc(center.polar(angle, layer_radius), 2.0 + l, &Paint::Solid(color));
        }
    }
}
