use super::color::Rgba;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` in direction `angle` (radians, canvas orientation).
    pub fn polar(self, angle: f32, radius: f32) -> Self {
        Self::new(self.x + angle.cos() * radius, self.y + angle.sin() * radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Gradient along the line `start -> end`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

/// Gradient between two concentric circles at `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    pub fn linear(start: Point, end: Point, stops: &[(f32, Rgba)]) -> Self {
        Paint::Linear(LinearGradient {
            start,
            end,
            stops: to_stops(stops),
        })
    }

    pub fn radial(center: Point, inner_radius: f32, outer_radius: f32, stops: &[(f32, Rgba)]) -> Self {
        Paint::Radial(RadialGradient {
            center,
            inner_radius,
            outer_radius,
            stops: to_stops(stops),
        })
    }
}

fn to_stops(stops: &[(f32, Rgba)]) -> Vec<ColorStop> {
    stops
        .iter()
        .map(|&(offset, color)| ColorStop { offset, color })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) -> &mut Self {
        self.segments.push(PathSegment::CubicTo { c1, c2, to });
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
}

/// Glow drawn around filled shapes, fading out over `blur` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub color: Rgba,
}

/// A 2D raster target owned by the host and borrowed for one paint call.
///
/// Fill and stroke operations honour the current global alpha and shadow,
/// which stay in effect until changed.
pub trait RenderSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Change the pixel size. Content and drawing state may be discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn fill_round_rect(&mut self, rect: Rect, radius: f32, paint: &Paint);
    /// Fill the full circle (arc from 0 to 2π).
    fn fill_arc(&mut self, center: Point, radius: f32, paint: &Paint);
    fn stroke_arc(&mut self, center: Point, radius: f32, stroke: &Stroke);
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_shadow(&mut self, shadow: Option<Shadow>);

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn center(&self) -> Point {
        Point::new(self.width() as f32 / 2.0, self.height() as f32 / 2.0)
    }
}
