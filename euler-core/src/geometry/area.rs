//! Planar regions with boolean algebra, backed by `geo`'s polygon overlay.
//!
//! Curved contours are approximated by polygons (see [`Circle::vertices`]); all queries here are
//! therefore exact only up to that approximation.

use geo::{Area as _, BooleanOps, BoundingRect, Centroid, Contains, Coord, InteriorPoint, LineString, MultiPolygon, Point, Polygon};

use super::{circle::Circle, r2::R2, rect::Rect};

/// Regions with less area than this are considered empty (polygon-overlay slivers).
pub const EMPTY_AREA: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct Area(MultiPolygon<f64>);

impl Default for Area {
    fn default() -> Self {
        Area::empty()
    }
}

impl Area {
    pub fn empty() -> Self {
        Area(MultiPolygon::new(vec![]))
    }

    pub fn polygon(vertices: &[R2<f64>]) -> Self {
        if vertices.len() < 3 {
            return Area::empty();
        }
        let ring: LineString<f64> = vertices.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
        Area(MultiPolygon::new(vec![Polygon::new(ring, vec![])]))
    }

    pub fn rect(rect: &Rect) -> Self {
        Area::polygon(&rect.corners())
    }

    pub fn circle(circle: &Circle<f64>) -> Self {
        if circle.r <= 0. {
            return Area::empty();
        }
        Area::polygon(&circle.vertices())
    }

    pub fn intersect(&self, o: &Area) -> Area {
        if self.is_trivially_empty() || o.is_trivially_empty() {
            return Area::empty();
        }
        Area(self.0.intersection(&o.0))
    }

    pub fn union(&self, o: &Area) -> Area {
        if self.is_trivially_empty() {
            return o.clone();
        }
        if o.is_trivially_empty() {
            return self.clone();
        }
        Area(self.0.union(&o.0))
    }

    pub fn subtract(&self, o: &Area) -> Area {
        if self.is_trivially_empty() || o.is_trivially_empty() {
            return self.clone();
        }
        Area(self.0.difference(&o.0))
    }

    fn is_trivially_empty(&self) -> bool {
        self.0.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.is_trivially_empty() || self.size() <= EMPTY_AREA
    }

    /// Enclosed area (named `size` to keep it apart from the type).
    pub fn size(&self) -> f64 {
        self.0.unsigned_area()
    }

    pub fn contains(&self, p: &R2<f64>) -> bool {
        self.0.contains(&Point::new(p.x, p.y))
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.0.bounding_rect().map(|r| Rect::new(r.min().x, r.min().y, r.width(), r.height()))
    }

    pub fn centroid(&self) -> Option<R2<f64>> {
        self.0.centroid().map(|p| R2 { x: p.x(), y: p.y() })
    }

    /// A point in the interior of one of this area's polygons, found without a grid search.
    pub fn interior_point(&self) -> Option<R2<f64>> {
        if self.is_empty() {
            return None;
        }
        self.0.interior_point().map(|p| R2 { x: p.x(), y: p.y() })
    }

    /// Distance from `p` to the nearest point on any ring (outer or hole) of this area.
    pub fn boundary_distance(&self, p: &R2<f64>) -> f64 {
        self.0
            .iter()
            .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
            .flat_map(|ring| ring.lines())
            .map(|line| segment_distance(p, &line.start, &line.end))
            .fold(f64::INFINITY, f64::min)
    }

    /// Outer rings of each polygon, as point lists (closing point omitted).
    pub fn polygons(&self) -> Vec<Vec<R2<f64>>> {
        self.0
            .iter()
            .map(|poly| {
                let coords = &poly.exterior().0;
                let n = coords.len().saturating_sub(1);
                coords[..n].iter().map(|c| R2 { x: c.x, y: c.y }).collect()
            })
            .collect()
    }
}

fn segment_distance(p: &R2<f64>, a: &Coord<f64>, b: &Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0. { 0. } else { (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0., 1.) };
    let x = a.x + t * dx;
    let y = a.y + t * dy;
    (p.x - x).hypot(p.y - y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use test_log::test;

    fn square(x: f64, y: f64, s: f64) -> Area {
        Area::rect(&Rect::new(x, y, s, s))
    }

    #[test]
    fn boolean_ops() {
        let a = square(0., 0., 2.);
        let b = square(1., 1., 2.);
        assert_relative_eq!(a.intersect(&b).size(), 1., epsilon = 1e-9);
        assert_relative_eq!(a.union(&b).size(), 7., epsilon = 1e-9);
        assert_relative_eq!(a.subtract(&b).size(), 3., epsilon = 1e-9);
        assert!(a.intersect(&square(5., 5., 1.)).is_empty());
        assert!(square(0.5, 0.5, 1.).subtract(&a).is_empty());
        assert!(Area::empty().is_empty());
        assert!(Area::default().is_empty());
        assert_relative_eq!(Area::empty().union(&a).size(), 4., epsilon = 1e-9);
    }

    #[test]
    fn circle_area() {
        let c = Area::circle(&Circle::new(0., 0., 100.));
        assert_relative_eq!(c.size(), PI * 100. * 100., max_relative = 1e-3);
        assert!(c.contains(&R2::new(50., 50.)));
        assert!(!c.contains(&R2::new(80., 80.)));
        let b = c.bounds().unwrap();
        assert_relative_eq!(b.w, 200., epsilon = 1e-6);
        assert_relative_eq!(c.centroid().unwrap(), R2::new(0., 0.), epsilon = 1e-6);
    }

    #[test]
    fn boundary_distance() {
        let a = square(0., 0., 10.);
        assert_relative_eq!(a.boundary_distance(&R2::new(5., 5.)), 5.);
        assert_relative_eq!(a.boundary_distance(&R2::new(1., 3.)), 1.);
        let ring = a.subtract(&square(4., 4., 2.));
        assert_relative_eq!(ring.boundary_distance(&R2::new(5., 3.)), 1., epsilon = 1e-9);
        assert_eq!(a.polygons()[0].len(), 4);
    }

    #[test]
    fn interior_point() {
        let ring = square(0., 0., 10.).subtract(&square(2., 2., 6.));
        let p = ring.interior_point().unwrap();
        assert!(ring.contains(&p), "{}", p);
        assert_eq!(Area::empty().interior_point(), None);
    }
}
