use super::color::{hsla, Rgba};
use super::surface::{Paint, Point, Rect, RenderSurface, Shadow};
use super::{fade_trail, normalized};

const MAX_BARS: usize = 128;
const HEIGHT_FRACTION: f32 = 0.8;
const WAVE_AMPLITUDE: f32 = 10.0;

const CYAN: Rgba = Rgba::new(42, 244, 255, 0.7);
const PURPLE: Rgba = Rgba::new(158, 0, 255, 0.7);
const PINK: Rgba = Rgba::new(255, 0, 170, 0.7);

/// Vertical bars across the canvas, bobbing on a sine wave.
pub fn paint(frame: &[u8], time: f32, surface: &mut dyn RenderSurface) {
    let width = surface.width() as f32;
    let height = surface.height() as f32;

    fade_trail(surface);
    surface.set_shadow(None);

    let count = frame.len().min(MAX_BARS);
    if count == 0 {
        return;
    }

    let gradient = Paint::linear(
        Point::new(0.0, 0.0),
        Point::new(width, height),
        &[(0.0, CYAN), (0.5, PURPLE), (1.0, PINK)],
    );
    let bar_width = width / count as f32;
    let spacing = bar_width * 0.1;
    let corner_radius = (bar_width / 4.0).clamp(0.0, 5.0);

    for (index, &value) in frame[..count].iter().enumerate() {
        let level = normalized(value).powf(1.5);
        let bar_height = (level * height * HEIGHT_FRACTION).max(1.0);
        let wave = (time * 2.0 + index as f32 * 0.2).sin() * WAVE_AMPLITUDE;

        let glow = (level * 5.0).min(10.0);
        let shadow = (glow > 0.0).then(|| Shadow {
            blur: glow,
            color: hsla(index as f32 * 360.0 / count as f32, 100.0, 50.0, 0.5),
        });
        surface.set_shadow(shadow);

        // Bars are spaced wider than the canvas slot, so the tail runs off the right edge.
        let x = index as f32 * (bar_width + spacing);
        let y = height - bar_height + wave;
        surface.fill_round_rect(Rect::new(x, y, bar_width, bar_height), corner_radius, &gradient);
    }

    surface.set_shadow(None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::recording::{DrawCall, RecordingSurface};

    #[test]
    fn silent_frame_draws_one_pixel_bars() {
        let mut surface = RecordingSurface::new(800, 600);
        paint(&[0; 128], 0.0, &mut surface);

        let bars = surface.round_rects();
        assert_eq!(bars.len(), 128);
        assert!(bars.iter().all(|(rect, _)| rect.height == 1.0));
        assert_eq!(bars[0].0.y, 599.0);
        assert!(!surface
            .calls
            .iter()
            .any(|c| matches!(c, DrawCall::Shadow(Some(_)))));
    }

    #[test]
    fn loud_frame_scales_to_eighty_percent() {
        let mut surface = RecordingSurface::new(256, 100);
        paint(&[255; 64], 0.0, &mut surface);

        let bars = surface.round_rects();
        assert_eq!(bars.len(), 64);
        assert!((bars[0].0.height - 80.0).abs() < 1e-4);
        assert_eq!(bars[0].0.width, 4.0);
        assert_eq!(bars[0].1, 1.0);
        assert!((bars[1].0.x - 4.4).abs() < 1e-5);
        assert!(surface
            .calls
            .iter()
            .any(|c| matches!(c, DrawCall::Shadow(Some(s)) if s.blur == 5.0)));
    }

    #[test]
    fn bar_count_is_capped() {
        let mut surface = RecordingSurface::new(1024, 100);
        paint(&[10; 1024], 1.5, &mut surface);
        assert_eq!(surface.round_rects().len(), MAX_BARS);
    }

    #[test]
    fn wave_offset_follows_clock() {
        let mut a = RecordingSurface::new(128, 100);
        let mut b = RecordingSurface::new(128, 100);
        paint(&[0; 4], 0.0, &mut a);
        paint(&[0; 4], std::f32::consts::FRAC_PI_4, &mut b);
        let ya = a.round_rects()[0].0.y;
        let yb = b.round_rects()[0].0.y;
        assert!((yb - ya - 10.0).abs() < 1e-3);
    }

    #[test]
    fn empty_frame_only_fades() {
        let mut surface = RecordingSurface::new(100, 100);
        paint(&[], 0.0, &mut surface);
        assert!(matches!(surface.calls[0], DrawCall::FillRect { .. }));
        assert!(surface.round_rects().is_empty());
    }
}
