use tiny_skia as sk;

use super::color::{Rgba, Theme};
use super::surface::{ColorStop, Paint, Path, PathSegment, Point, Rect, RenderSurface, Shadow, Stroke};

/// Stacked outline strokes used to build a shadow halo.
const SHADOW_LAYERS: usize = 4;
/// Cubic circle approximation constant.
const KAPPA: f32 = 0.552_284_8;

/// CPU canvas backed by a `tiny_skia` pixmap.
///
/// Drawing composites source-over onto whatever the previous frame left, so
/// renderers that fade instead of clearing get a motion trail.
pub struct Raster {
    width: u32,
    height: u32,
    /// `None` while either dimension is zero.
    pixmap: Option<sk::Pixmap>,
    global_alpha: f32,
    shadow: Option<Shadow>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixmap: sk::Pixmap::new(width, height),
            global_alpha: 1.0,
            shadow: None,
        }
    }

    /// Premultiplied pixel at `(x, y)` scaled to `0.0..=1.0`, if inside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        let p = self.pixmap.as_ref()?.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue(), p.alpha()].map(|c| c as f32 / 255.0))
    }

    /// Flatten the canvas over the theme's vertical background gradient into
    /// opaque 8-bit RGBA rows, ready for the encoder.
    pub fn composite_rgba8(&self, theme: &Theme) -> Vec<u8> {
        let Some(pixmap) = self.pixmap.as_ref() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(pixmap.data().len());
        let rows = self.height.max(2) - 1;
        for (y, row) in pixmap.pixels().chunks(self.width as usize).enumerate() {
            let bg = theme.primary.lerp_premultiplied(theme.secondary, y as f32 / rows as f32);
            let bg = [bg.r as f32, bg.g as f32, bg.b as f32];
            for p in row {
                let inv = 1.0 - p.alpha() as f32 / 255.0;
                out.push((p.red() as f32 + bg[0] * inv).round().min(255.0) as u8);
                out.push((p.green() as f32 + bg[1] * inv).round().min(255.0) as u8);
                out.push((p.blue() as f32 + bg[2] * inv).round().min(255.0) as u8);
                out.push(255);
            }
        }
        out
    }

    fn fill(&mut self, outline: &sk::Path, paint: &Paint) {
        let Some(shader) = self.shader(paint) else {
            return;
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_path(outline, &sk_paint(shader), sk::FillRule::Winding, sk::Transform::identity(), None);
        }
    }

    fn stroke(&mut self, outline: &sk::Path, stroke: &Stroke) {
        if stroke.width <= 0.0 {
            return;
        }
        let Some(shader) = self.shader(&stroke.paint) else {
            return;
        };
        let style = sk::Stroke {
            width: stroke.width,
            line_cap: sk::LineCap::Round,
            line_join: sk::LineJoin::Round,
            ..Default::default()
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.stroke_path(outline, &sk_paint(shader), &style, sk::Transform::identity(), None);
        }
    }

    /// Resolve a paint with the current global alpha applied.
    fn shader(&self, paint: &Paint) -> Option<sk::Shader<'static>> {
        let mut shader = match paint {
            Paint::Solid(c) => sk::Shader::SolidColor(sk_color(*c)),
            Paint::Linear(g) => sk::LinearGradient::new(
                sk_point(g.start),
                sk_point(g.end),
                gradient_stops(&g.stops, |offset| offset),
                sk::SpreadMode::Pad,
                sk::Transform::identity(),
            )?,
            Paint::Radial(g) => {
                if g.outer_radius <= 0.0 {
                    return None;
                }
                // tiny-skia gradients start at radius zero; remap stops onto
                // the inner..outer band.
                let span = g.outer_radius - g.inner_radius;
                sk::RadialGradient::new(
                    sk_point(g.center),
                    sk_point(g.center),
                    g.outer_radius,
                    gradient_stops(&g.stops, |offset| (g.inner_radius + offset * span) / g.outer_radius),
                    sk::SpreadMode::Pad,
                    sk::Transform::identity(),
                )?
            }
        };
        shader.apply_opacity(self.global_alpha);
        Some(shader)
    }

    /// Layered strokes whose summed coverage fades out linearly over the blur
    /// distance. The fill drawn afterwards hides the inner half.
    fn shadow_strokes(&self) -> Vec<Stroke> {
        let Some(shadow) = self.shadow.filter(|s| s.blur > 0.0 && s.color.a > 0.0) else {
            return Vec::new();
        };
        let layer_alpha = shadow.color.a / SHADOW_LAYERS as f32;
        (1..=SHADOW_LAYERS)
            .rev()
            .map(|k| Stroke {
                paint: Paint::Solid(Rgba { a: layer_alpha, ..shadow.color }),
                width: 2.0 * shadow.blur * k as f32 / SHADOW_LAYERS as f32,
            })
            .collect()
    }

    fn fill_with_shadow(&mut self, outline: &sk::Path, paint: &Paint) {
        for stroke in self.shadow_strokes() {
            self.stroke(outline, &stroke);
        }
        self.fill(outline, paint);
    }
}

impl RenderSurface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Like a canvas element, resizing discards the content and resets
    /// drawing state.
    fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Raster::new(width, height);
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(sk::Color::TRANSPARENT);
        }
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        if let Some(r) = sk_rect(rect) {
            self.fill_with_shadow(&sk::PathBuilder::from_rect(r), paint);
        }
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        if let Some(outline) = sk_rect(rect).and_then(|r| round_rect(r, radius)) {
            self.fill_with_shadow(&outline, paint);
        }
    }

    fn fill_arc(&mut self, center: Point, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        for stroke in self.shadow_strokes() {
            self.stroke_arc(center, radius, &stroke);
        }
        if let Some(outline) = sk::PathBuilder::from_circle(center.x, center.y, radius) {
            self.fill(&outline, paint);
        }
    }

    fn stroke_arc(&mut self, center: Point, radius: f32, stroke: &Stroke) {
        if radius <= 0.0 {
            return;
        }
        if let Some(outline) = sk::PathBuilder::from_circle(center.x, center.y, radius) {
            self.stroke(&outline, stroke);
        }
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        if let Some(outline) = sk_path(path) {
            self.stroke(&outline, stroke);
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.shadow = shadow;
    }
}

fn sk_paint(shader: sk::Shader<'static>) -> sk::Paint<'static> {
    sk::Paint {
        shader,
        anti_alias: true,
        ..Default::default()
    }
}

fn sk_color(c: Rgba) -> sk::Color {
    sk::Color::from_rgba8(c.r, c.g, c.b, (c.a.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn sk_point(p: Point) -> sk::Point {
    sk::Point::from_xy(p.x, p.y)
}

/// Negative sizes flip the rectangle, as canvas `fillRect` does.
fn sk_rect(rect: Rect) -> Option<sk::Rect> {
    let (x0, x1) = (rect.x.min(rect.x + rect.width), rect.x.max(rect.x + rect.width));
    let (y0, y1) = (rect.y.min(rect.y + rect.height), rect.y.max(rect.y + rect.height));
    sk::Rect::from_ltrb(x0, y0, x1, y1)
}

/// Gradient stops with `offset` remapped. A fully transparent stop takes the
/// colour of its neighbour, so the ramp fades out instead of through black.
fn gradient_stops(stops: &[ColorStop], offset: impl Fn(f32) -> f32) -> Vec<sk::GradientStop> {
    stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let mut color = stop.color;
            if color.a <= 0.0 {
                let neighbour = stops[..i]
                    .iter()
                    .rev()
                    .chain(stops[i + 1..].iter())
                    .find(|s| s.color.a > 0.0);
                if let Some(n) = neighbour {
                    color = Rgba { a: 0.0, ..n.color };
                }
            }
            sk::GradientStop::new(offset(stop.offset).clamp(0.0, 1.0), sk_color(color))
        })
        .collect()
}

fn round_rect(r: sk::Rect, radius: f32) -> Option<sk::Path> {
    let radius = radius.min(r.width() / 2.0).min(r.height() / 2.0).max(0.0);
    if radius == 0.0 {
        return Some(sk::PathBuilder::from_rect(r));
    }
    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    let k = radius * (1.0 - KAPPA);

    let mut pb = sk::PathBuilder::new();
    pb.move_to(l + radius, t);
    pb.line_to(rt - radius, t);
    pb.cubic_to(rt - k, t, rt, t + k, rt, t + radius);
    pb.line_to(rt, b - radius);
    pb.cubic_to(rt, b - k, rt - k, b, rt - radius, b);
    pb.line_to(l + radius, b);
    pb.cubic_to(l + k, b, l, b - k, l, b - radius);
    pb.line_to(l, t + radius);
    pb.cubic_to(l, t + k, l + k, t, l + radius, t);
    pb.close();
    pb.finish()
}

fn sk_path(path: &Path) -> Option<sk::Path> {
    let mut pb = sk::PathBuilder::new();
    for segment in path.segments() {
        match *segment {
            PathSegment::MoveTo(p) => pb.move_to(p.x, p.y),
            PathSegment::LineTo(p) => pb.line_to(p.x, p.y),
            PathSegment::CubicTo { c1, c2, to } => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y),
        }
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    fn alpha(raster: &Raster, x: u32, y: u32) -> f32 {
        raster.pixel(x, y).unwrap()[3]
    }

    #[test]
    fn fill_rect_covers_interior() {
        let mut raster = Raster::new(10, 10);
        raster.fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), &Paint::Solid(WHITE));
        assert_eq!(raster.pixel(3, 3), Some([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(raster.pixel(8, 8), Some([0.0; 4]));
    }

    #[test]
    fn low_alpha_fill_accumulates() {
        let mut raster = Raster::new(4, 4);
        let fade = Paint::Solid(Rgba::new(0, 0, 0, 0.1));
        raster.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &fade);
        let once = alpha(&raster, 1, 1);
        raster.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &fade);
        let twice = alpha(&raster, 1, 1);
        assert!((once - 0.1).abs() < 0.01);
        assert!((twice - 0.19).abs() < 0.01);
    }

    #[test]
    fn global_alpha_scales_fill() {
        let mut raster = Raster::new(10, 10);
        raster.set_global_alpha(0.3);
        raster.fill_arc(Point::new(5.0, 5.0), 3.0, &Paint::Solid(WHITE));
        assert!((alpha(&raster, 5, 5) - 0.3).abs() < 0.01);
    }

    #[test]
    fn shadow_spreads_beyond_shape() {
        let mut raster = Raster::new(20, 20);
        raster.set_shadow(Some(Shadow { blur: 4.0, color: WHITE }));
        raster.fill_rect(Rect::new(8.0, 8.0, 4.0, 4.0), &Paint::Solid(WHITE));
        let near = alpha(&raster, 6, 10);
        let far = alpha(&raster, 4, 10);
        assert!(near > far && far > 0.0);
        assert_eq!(raster.pixel(1, 1), Some([0.0; 4]));
    }

    #[test]
    fn arc_shadow_rings_the_disc() {
        let mut raster = Raster::new(20, 20);
        raster.set_shadow(Some(Shadow { blur: 3.0, color: WHITE }));
        raster.fill_arc(Point::new(10.0, 10.0), 3.0, &Paint::Solid(WHITE));
        assert!(alpha(&raster, 14, 10) > 0.0);
        assert_eq!(raster.pixel(18, 10), Some([0.0; 4]));
    }

    #[test]
    fn stroke_draws_along_line_only() {
        let mut raster = Raster::new(20, 20);
        let mut path = Path::new();
        path.move_to(Point::new(2.0, 10.0)).line_to(Point::new(18.0, 10.0));
        raster.stroke_path(&path, &Stroke { paint: Paint::Solid(WHITE), width: 2.0 });
        assert!(alpha(&raster, 10, 9) > 0.9);
        assert_eq!(raster.pixel(10, 2), Some([0.0; 4]));
    }

    #[test]
    fn zero_width_stroke_draws_nothing() {
        let mut raster = Raster::new(20, 20);
        let mut path = Path::new();
        path.move_to(Point::new(2.0, 10.0)).line_to(Point::new(18.0, 10.0));
        raster.stroke_path(&path, &Stroke { paint: Paint::Solid(WHITE), width: 0.0 });
        assert!((0..20).all(|x| raster.pixel(x, 10) == Some([0.0; 4])));
    }

    #[test]
    fn stroked_ring_leaves_centre_empty() {
        let mut raster = Raster::new(20, 20);
        raster.stroke_arc(Point::new(10.0, 10.0), 6.0, &Stroke { paint: Paint::Solid(WHITE), width: 2.0 });
        assert!(alpha(&raster, 16, 10) > 0.5);
        assert_eq!(raster.pixel(10, 10), Some([0.0; 4]));
    }

    #[test]
    fn radial_gradient_fades_without_darkening() {
        let mut raster = Raster::new(20, 2);
        let paint = Paint::radial(
            Point::new(0.0, 0.0),
            0.0,
            10.0,
            &[(0.0, Rgba::new(200, 50, 200, 0.3)), (1.0, Rgba::TRANSPARENT)],
        );
        raster.fill_rect(Rect::new(0.0, 0.0, 20.0, 2.0), &paint);

        let [r, g, b, a] = raster.pixel(5, 0).unwrap();
        assert!(a > 0.08 && a < 0.2);
        // Unpremultiplied colour stays at the first stop.
        assert!((r / a - 200.0 / 255.0).abs() < 0.08);
        assert!((g / a - 50.0 / 255.0).abs() < 0.08);
        assert!((b - r).abs() < 0.01);
        assert_eq!(raster.pixel(15, 0), Some([0.0; 4]));
    }

    #[test]
    fn linear_gradient_clamps_outside_range() {
        let mut raster = Raster::new(30, 1);
        let red = Rgba::new(255, 0, 0, 1.0);
        let blue = Rgba::new(0, 0, 255, 1.0);
        let paint = Paint::linear(Point::new(10.0, 0.0), Point::new(20.0, 0.0), &[(0.0, red), (1.0, blue)]);
        raster.fill_rect(Rect::new(0.0, 0.0, 30.0, 1.0), &paint);
        assert_eq!(raster.pixel(2, 0), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(raster.pixel(27, 0), Some([0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn zero_sized_canvas_ignores_draws() {
        let mut raster = Raster::new(0, 0);
        raster.clear();
        raster.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &Paint::Solid(WHITE));
        raster.fill_arc(Point::new(0.0, 0.0), 5.0, &Paint::Solid(WHITE));
        assert!(raster.composite_rgba8(&Theme::dark()).is_empty());
    }

    #[test]
    fn resize_discards_content() {
        let mut raster = Raster::new(4, 4);
        raster.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &Paint::Solid(WHITE));
        raster.resize(0, 0);
        assert_eq!(raster.pixel(0, 0), None);
        raster.resize(4, 4);
        assert_eq!(raster.pixel(1, 1), Some([0.0; 4]));
    }

    #[test]
    fn composite_is_opaque_over_theme() {
        let raster = Raster::new(2, 2);
        let rgba = raster.composite_rgba8(&Theme::dark());
        assert_eq!(&rgba[0..4], &[0x1a, 0x1a, 0x1a, 255]);
        assert_eq!(&rgba[12..16], &[0x2c, 0x2c, 0x2c, 255]);
    }
}
