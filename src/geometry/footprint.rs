//! Axis-aligned grid rectangles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::CellCoord;
use crate::geometry::segment::Segment;

/// Orientation of a footprint edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAxis {
    Horizontal,
    Vertical,
}

/// Rectangle of whole cells: `[x, x + width) x [y, y + height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Single-cell footprint
    pub fn cell(coord: CellCoord) -> Self {
        Self::new(coord.x, coord.y, 1, 1)
    }

    pub fn contains_cell(&self, coord: CellCoord) -> bool {
        let dx = coord.x as i64 - self.x as i64;
        let dy = coord.y as i64 - self.y as i64;
        dx >= 0 && dx < self.width as i64 && dy >= 0 && dy < self.height as i64
    }

    /// True if `other` lies entirely inside this footprint
    pub fn contains_footprint(&self, other: &Footprint) -> bool {
        let right = self.x as i64 + self.width as i64;
        let bottom = self.y as i64 + self.height as i64;
        other.x >= self.x
            && other.y >= self.y
            && other.x as i64 + other.width as i64 <= right
            && other.y as i64 + other.height as i64 <= bottom
    }

    /// Hit test in world space. Points exactly on the border do not count.
    pub fn contains_world_point(&self, point: Vec2, scale: f32) -> bool {
        let offset_x = point.x - self.x as f32 * scale;
        let offset_y = point.y - self.y as f32 * scale;
        offset_x > 0.0
            && offset_x < self.width as f32 * scale
            && offset_y > 0.0
            && offset_y < self.height as f32 * scale
    }

    /// The four edges in world space, in the order top, bottom, left, right
    pub fn edges(&self, scale: f32) -> [(EdgeAxis, Segment); 4] {
        let left = self.x as f32 * scale;
        let top = self.y as f32 * scale;
        let right = left + self.width as f32 * scale;
        let bottom = top + self.height as f32 * scale;

        [
            (
                EdgeAxis::Horizontal,
                Segment::new(Vec2::new(left, top), Vec2::new(right, top)),
            ),
            (
                EdgeAxis::Horizontal,
                Segment::new(Vec2::new(left, bottom), Vec2::new(right, bottom)),
            ),
            (
                EdgeAxis::Vertical,
                Segment::new(Vec2::new(left, top), Vec2::new(left, bottom)),
            ),
            (
                EdgeAxis::Vertical,
                Segment::new(Vec2::new(right, top), Vec2::new(right, bottom)),
            ),
        ]
    }

    /// Every cell covered, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.height as i32).flat_map(move |dy| {
            (0..self.width as i32).map(move |dx| CellCoord::new(self.x + dx, self.y + dy))
        })
    }

    /// This footprint reflected through the center of a `grid_w` x `grid_h` board
    pub fn mirrored(&self, grid_w: u32, grid_h: u32) -> Self {
        Self::new(
            grid_w as i32 - self.width as i32 - self.x,
            grid_h as i32 - self.height as i32 - self.y,
            self.width,
            self.height,
        )
    }
}
