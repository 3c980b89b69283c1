use std::f32::consts::TAU;

use super::color::hsla;
use super::normalized;
use super::surface::{Paint, Path, Point, RenderSurface, Stroke};

pub const NODES: usize = 50;
const BASE_RADIUS: f32 = 200.0;
const REACH: f32 = 100.0;
const NODE_SIZE: f32 = 5.0;
const MAX_EDGE_WIDTH: f32 = 3.0;

/// A ring of nodes, every pair joined by an edge (`NODES * (NODES - 1) / 2`
/// strokes per frame).
pub fn paint(frame: &[u8], _time: f32, surface: &mut dyn RenderSurface) {
    surface.clear();
    if frame.is_empty() {
        return;
    }

    let center = surface.center();
    let magnitude = |node: usize| normalized(frame[node % frame.len()]);
    let position = |node: usize| {
        let angle = node as f32 / NODES as f32 * TAU;
        center.polar(angle, BASE_RADIUS + magnitude(node) * REACH)
    };
    let hue = |node: usize| node as f32 * 360.0 / NODES as f32;

    for i in 0..NODES {
        let from = position(i);
        surface.fill_arc(from, NODE_SIZE, &Paint::Solid(hsla(hue(i), 70.0, 50.0, 0.7)));

        for j in i + 1..NODES {
            let strength = magnitude(j);
            let edge = Stroke {
                paint: Paint::Solid(hsla(hue(j), 70.0, 50.0, strength)),
                width: strength * MAX_EDGE_WIDTH,
            };
            surface.stroke_path(&line(from, position(j)), &edge);
        }
    }
}

fn line(from: Point, to: Point) -> Path {
    let mut path = Path::new();
    path.move_to(from).line_to(to);
    path
}
