use std::f32::consts::{FRAC_PI_4, PI};

use super::color::hsla;
use super::normalized;
use super::surface::{Paint, Path, RenderSurface, Stroke};

const TURNS: f32 = 2.0;
const REACH: f32 = 250.0;
const CONTROL_RADIUS: f32 = 100.0;
const MAX_WIDTH: f32 = 10.0;
/// Line width a fresh canvas context starts with.
const DEFAULT_WIDTH: f32 = 1.0;

/// One continuous Bézier path through every bin, spiralling twice round.
///
/// The stroke style is taken from the last bin and applies to the whole
/// path. A zero width is ignored, as a canvas ignores `lineWidth = 0`, so the
/// last non-zero width of the frame is used.
pub fn paint(frame: &[u8], _time: f32, surface: &mut dyn RenderSurface) {
    surface.clear();
    let Some(&last) = frame.last() else {
        return;
    };

    let center = surface.center();
    let count = frame.len() as f32;
    let mut path = Path::new();
    path.move_to(center);

    let mut width = DEFAULT_WIDTH;
    for (index, &value) in frame.iter().enumerate() {
        let angle = index as f32 / count * TURNS * 2.0 * PI;
        let to = center.polar(angle, normalized(value) * REACH);
        let c1 = center.polar(angle + FRAC_PI_4, CONTROL_RADIUS);
        let c2 = center.polar(angle - FRAC_PI_4, CONTROL_RADIUS);
        path.cubic_to(c1, c2, to);

        let segment_width = normalized(value) * MAX_WIDTH;
        if segment_width > 0.0 {
            width = segment_width;
        }
    }

    let stroke = Stroke {
        paint: Paint::Solid(hsla(last as f32, 70.0, 50.0, 0.5)),
        width,
    };
    surface.stroke_path(&path, &stroke);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::recording::{DrawCall, RecordingSurface};
    use crate::render::surface::{PathSegment, Point};

    #[test]
    fn single_path_with_one_cubic_per_bin() {
        let mut surface = RecordingSurface::new(800, 600);
        paint(&[10, 200, 30, 255], 0.0, &mut surface);

        let strokes = surface.strokes();
        assert_eq!(strokes.len(), 1);
        let (path, stroke) = strokes[0];
        assert_eq!(path.segments().len(), 5);
        assert_eq!(path.segments()[0], PathSegment::MoveTo(Point::new(400.0, 300.0)));
        assert_eq!(stroke.width, MAX_WIDTH);
        assert_eq!(stroke.paint, Paint::Solid(hsla(255.0, 70.0, 50.0, 0.5)));
    }

    #[test]
    fn control_points_sit_on_fixed_ring() {
        let mut surface = RecordingSurface::new(800, 600);
        paint(&[255], 0.0, &mut surface);
        let (path, _) = surface.strokes()[0];
        match path.segments()[1] {
            PathSegment::CubicTo { c1, c2, to } => {
                let d = |p: Point| ((p.x - 400.0).powi(2) + (p.y - 300.0).powi(2)).sqrt();
                assert!((d(c1) - CONTROL_RADIUS).abs() < 1e-3);
                assert!((d(c2) - CONTROL_RADIUS).abs() < 1e-3);
                assert!(c1.y > 300.0 && c2.y < 300.0);
                assert!((to.x - 650.0).abs() < 1e-3);
            }
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn silent_tail_keeps_last_nonzero_width() {
        let mut surface = RecordingSurface::new(800, 600);
        paint(&[51, 0, 0], 0.0, &mut surface);
        let (_, stroke) = surface.strokes()[0];
        assert!((stroke.width - 2.0).abs() < 1e-5);
        assert_eq!(stroke.paint, Paint::Solid(hsla(0.0, 70.0, 50.0, 0.5)));

        let mut silent = RecordingSurface::new(800, 600);
        paint(&[0; 8], 0.0, &mut silent);
        assert_eq!(silent.strokes()[0].1.width, DEFAULT_WIDTH);
    }

    #[test]
    fn empty_frame_only_clears() {
        let mut surface = RecordingSurface::new(800, 600);
        paint(&[], 0.0, &mut surface);
        assert_eq!(surface.calls, vec![DrawCall::Clear]);
    }
}
