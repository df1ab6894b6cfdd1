use derive_more::From;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::model::AbstractCurve;

use super::{area::Area, circle::Circle, r2::R2, rect::Rect};

/// Radius slop separating "inside a contour" from "outside" it: a zone inside a circle uses the
/// circle grown by this much, a zone outside it uses the circle shrunk by this much.
pub const NUDGE: f64 = 0.1;

/// Closed free-form contour through an ordered list of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Path {
    pub points: Vec<R2<f64>>,
}

#[derive(Debug, Clone, From, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(tag = "kind")]
pub enum Shape {
    Circle(Circle<f64>),
    Path(Path),
}

/// The concrete drawing of one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Contour {
    pub curve: AbstractCurve,
    pub shape: Shape,
}

impl Contour {
    pub fn circle(curve: AbstractCurve, circle: Circle<f64>) -> Self {
        Contour { curve, shape: Shape::Circle(circle) }
    }

    pub fn path(curve: AbstractCurve, points: Vec<R2<f64>>) -> Self {
        Contour { curve, shape: Shape::Path(Path { points }) }
    }

    pub fn as_circle(&self) -> Option<&Circle<f64>> {
        match &self.shape {
            Shape::Circle(c) => Some(c),
            Shape::Path(_) => None,
        }
    }

    pub fn bounds(&self) -> Rect {
        match &self.shape {
            Shape::Circle(c) => c.bounds(),
            Shape::Path(p) => {
                let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
                let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
                for pt in &p.points {
                    min_x = min_x.min(pt.x);
                    min_y = min_y.min(pt.y);
                    max_x = max_x.max(pt.x);
                    max_y = max_y.max(pt.y);
                }
                Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }

    /// Whether `p` lies inside the drawn curve itself (no nudge).
    pub fn contains(&self, p: &R2<f64>) -> bool {
        match &self.shape {
            Shape::Circle(c) => c.contains(p),
            Shape::Path(path) => Area::polygon(&path.points).contains(p),
        }
    }

    /// Region to intersect with for zones inside this contour.
    pub fn big_area(&self) -> Area {
        match &self.shape {
            Shape::Circle(c) => Area::circle(&c.with_radius(c.r + NUDGE)),
            Shape::Path(p) => Area::polygon(&p.points),
        }
    }

    /// Region to subtract for zones outside this contour.
    pub fn small_area(&self) -> Area {
        match &self.shape {
            Shape::Circle(c) => Area::circle(&c.with_radius(c.r - NUDGE)),
            Shape::Path(p) => Area::polygon(&p.points),
        }
    }

    pub fn shift(&mut self, offset: R2<f64>) {
        match &mut self.shape {
            Shape::Circle(c) => *c = c.shift(offset),
            Shape::Path(p) => p.points.iter_mut().for_each(|pt| *pt = *pt + offset),
        }
    }

    pub fn scale(&mut self, factor: f64) {
        match &mut self.shape {
            Shape::Circle(c) => *c = c.scale(factor),
            Shape::Path(p) => p.points.iter_mut().for_each(|pt| *pt = *pt * factor),
        }
    }
}
