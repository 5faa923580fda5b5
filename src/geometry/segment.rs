//! Segment intersection via orientation tests

use glam::Vec2;

/// Turn direction of the triangle A -> B -> C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Orientation of C relative to the directed line A -> B
///
/// Evaluated in f64 so grid-aligned inputs stay exact.
pub fn orientation(a: Vec2, b: Vec2, c: Vec2) -> Orientation {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);
    let cross = (cy - ay) * (bx - ax) - (by - ay) * (cx - ax);
    if cross > 0.0 {
        Orientation::CounterClockwise
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

fn strictly_opposite(p: Orientation, q: Orientation) -> bool {
    matches!(
        (p, q),
        (Orientation::CounterClockwise, Orientation::Clockwise)
            | (Orientation::Clockwise, Orientation::CounterClockwise)
    )
}

/// True iff segment AB properly crosses segment CD.
///
/// Touching endpoints and collinear overlaps count as no intersection.
pub fn intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    strictly_opposite(orientation(a, c, d), orientation(b, c, d))
        && strictly_opposite(orientation(a, b, c), orientation(a, b, d))
}

/// A directed line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn crosses(&self, other: &Segment) -> bool {
        intersect(self.start, self.end, other.start, other.end)
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }
}
