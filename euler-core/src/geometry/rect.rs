use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::r2::R2;

/// Axis-aligned rectangle, `(x, y)` being the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> R2<f64> {
        R2 { x: self.x + self.w / 2., y: self.y + self.h / 2. }
    }

    pub fn union(&self, o: &Rect) -> Rect {
        let x = self.x.min(o.x);
        let y = self.y.min(o.y);
        Rect::new(x, y, self.max_x().max(o.max_x()) - x, self.max_y().max(o.max_y()) - y)
    }

    /// Smallest rectangle covering all of `rects`.
    pub fn union_all<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
        rects.into_iter().reduce(|a, b| a.union(&b))
    }

    pub fn corners(&self) -> [R2<f64>; 4] {
        [
            R2 { x: self.x, y: self.y },
            R2 { x: self.max_x(), y: self.y },
            R2 { x: self.max_x(), y: self.max_y() },
            R2 { x: self.x, y: self.max_y() },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn union() {
        let r = Rect::union_all([Rect::new(0., 0., 1., 1.), Rect::new(2., -1., 1., 1.)]).unwrap();
        assert_eq!(r, Rect::new(0., -1., 3., 2.));
        assert_eq!(r.center(), R2::new(1.5, 0.));
        assert_eq!(Rect::union_all([]), None);
    }
}
