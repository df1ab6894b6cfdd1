use std::{f64::consts::TAU, fmt::{self, Display, Formatter}};

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::{r2::R2, rect::Rect};

/// Longest chord used when approximating a circle by a polygon.
pub const MAX_CHORD: f64 = 4.;
pub const MIN_SEGMENTS: usize = 24;
pub const MAX_SEGMENTS: usize = 360;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Circle<D> {
    pub c: R2<D>,
    pub r: D,
}

impl<D: Display> Display for Circle<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "C({:.3}, {:.3}, {:.3})", self.c.x, self.c.y, self.r)
    }
}

impl Circle<f64> {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Circle { c: R2 { x: cx, y: cy }, r }
    }

    pub fn with_radius(&self, r: f64) -> Self {
        Circle { c: self.c, r }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.c.x - self.r, self.c.y - self.r, 2. * self.r, 2. * self.r)
    }

    pub fn contains(&self, p: &R2<f64>) -> bool {
        self.c.distance(p) <= self.r
    }

    /// Vertices of the polygon approximating this circle, counter-clockwise from angle 0.
    pub fn vertices(&self) -> Vec<R2<f64>> {
        let n = ((TAU * self.r / MAX_CHORD).ceil() as usize).clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        (0..n).map(|i| self.c.polar(self.r, TAU * i as f64 / n as f64)).collect()
    }

    /// The (0 or 2) points where the boundaries of `self` and `o` cross. Tangent, disjoint,
    /// nested, or concentric circles yield `None`.
    pub fn intersect(&self, o: &Circle<f64>) -> Option<[R2<f64>; 2]> {
        let R2 { x: x1, y: y1 } = self.c;
        let R2 { x: x2, y: y2 } = o.c;
        let (r1, r2) = (self.r, o.r);
        let dx = x2 - x1;
        let dy = y2 - y1;
        let d = dx.hypot(dy);
        if d == 0. || d > r1 + r2 || d < (r1 - r2).abs() {
            return None;
        }
        let a = (r1 * r1 - r2 * r2 + d * d) / (2. * d);
        let h = (r1 * r1 - a * a).max(0.).sqrt();
        let base = R2 { x: x1 + a * dx / d, y: y1 + a * dy / d };
        let pa = R2 { x: base.x + h * dy / d, y: base.y - h * dx / d };
        let pb = R2 { x: base.x - h * dy / d, y: base.y + h * dx / d };
        Some([pa, pb])
    }

    pub fn shift(&self, offset: R2<f64>) -> Self {
        Circle { c: self.c + offset, r: self.r }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Circle { c: self.c * factor, r: self.r * factor }
    }
}
