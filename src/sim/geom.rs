//! Geometry kernel: rectangles and segment intersection
//!
//! World space is screen-oriented: +x to the right, +y downward. A building
//! roof is therefore the rectangle's *top* edge (smallest y).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Cross products below this magnitude are treated as parallel segments
pub const PARALLEL_EPSILON: f32 = 1e-8;

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// The four edges as (start, end) pairs, clockwise from the top edge
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.left(), self.top());
        let tr = Vec2::new(self.right(), self.top());
        let br = Vec2::new(self.right(), self.bottom());
        let bl = Vec2::new(self.left(), self.bottom());
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    /// Strict interior test (points on the boundary are outside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.left() && p.x < self.right() && p.y > self.top() && p.y < self.bottom()
    }
}

/// A point where a segment crosses something, with its parameter along the segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub point: Vec2,
    /// Parameter along the query segment, 0 at its start and 1 at its end
    pub t: f32,
}

/// Intersect the bounded segments `p + t·r` and `q + u·s`
///
/// Returns the hit only when both `t` and `u` lie in `[0, 1]`. Parallel and
/// collinear segments report no intersection, even when they overlap.
pub fn segment_intersect(p: Vec2, r: Vec2, q: Vec2, s: Vec2) -> Option<SegmentHit> {
    let rxs = r.perp_dot(s);
    if rxs.abs() < PARALLEL_EPSILON {
        return None;
    }

    let qp = q - p;
    let t = qp.perp_dot(s) / rxs;
    let u = qp.perp_dot(r) / rxs;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(SegmentHit { point: p + r * t, t })
    } else {
        None
    }
}

/// Nearest point where the segment `start -> end` crosses an edge of `rect`
pub fn segment_rect_nearest_hit(start: Vec2, end: Vec2, rect: &Rect) -> Option<SegmentHit> {
    let dir = end - start;
    rect.edges()
        .into_iter()
        .filter_map(|(a, b)| segment_intersect(start, dir, a, b - a))
        .min_by(|a, b| a.t.total_cmp(&b.t))
}
