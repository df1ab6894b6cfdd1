use log::{debug, info, trace, warn};

use crate::{
    error::DrawError,
    geometry::{area::Area, circle::Circle, r2::R2, rect::Rect},
    model::{AbstractCurve, Zone},
};

use super::{contained_in, BuildStep, Layout, SMALLEST_RADIUS};

/// Occupancy grid over a zone's bounds, one cell per [`SMALLEST_RADIUS`].
struct Grid {
    base: R2<f64>,
    ni: usize,
    nj: usize,
    ok: Vec<bool>,
}

impl Grid {
    fn new(area: &Area, bounds: &Rect) -> Self {
        let ni = (bounds.w / SMALLEST_RADIUS) as usize + 1;
        let nj = (bounds.h / SMALLEST_RADIUS) as usize + 1;
        let base = R2 { x: bounds.x, y: bounds.y };
        let mut ok = Vec::with_capacity(ni * nj);
        for i in 0..ni {
            for j in 0..nj {
                ok.push(area.contains(&Grid::point(&base, i, j)));
            }
        }
        Grid { base, ni, nj, ok }
    }

    fn point(base: &R2<f64>, i: usize, j: usize) -> R2<f64> {
        R2 { x: base.x + i as f64 * SMALLEST_RADIUS, y: base.y + j as f64 * SMALLEST_RADIUS }
    }

    /// Whether every cell in `[lo_i, hi_i] × [lo_j, hi_j]` (inclusive) is inside the grid and ok.
    fn all_ok(&self, lo_i: usize, hi_i: usize, lo_j: usize, hi_j: usize) -> bool {
        if hi_i >= self.ni || hi_j >= self.nj {
            return false;
        }
        (lo_i..=hi_i).all(|i| (lo_j..=hi_j).all(|j| self.ok[i * self.nj + j]))
    }

    /// Corner and size of the largest square of ok cells that also fits `n` squares side by side,
    /// horizontally (`tall == false`) or vertically.
    fn largest_square(&self, n: usize) -> Option<Square> {
        let mut best: Option<Square> = None;
        for i in 0..self.ni {
            for j in 0..self.nj {
                let max_size = (self.ni - i).min(self.nj - j);
                let mut size = best.as_ref().map_or(0, |b| b.size + 1);
                while size <= max_size {
                    if self.all_ok(i, i + size * n + 1, j, j + size + 1) {
                        best = Some(Square { i, j, size, tall: false });
                    } else if n > 1 && self.all_ok(i, i + size + 1, j, j + size * n + 1) {
                        best = Some(Square { i, j, size, tall: true });
                    } else {
                        break;
                    }
                    size += 1;
                }
            }
        }
        best.filter(|b| b.size > 0)
    }
}

struct Square {
    i: usize,
    j: usize,
    size: usize,
    tall: bool,
}

/// Shift `circle` left by half its radius to make room for a coming piercing, or, if that leaves
/// `area`, shift it a quarter radius and shrink it to three quarters. Keeps `circle` as is when
/// neither fits.
fn make_room(circle: Circle<f64>, area: &Area) -> Circle<f64> {
    let shifted = Circle { c: R2 { x: circle.c.x - circle.r * 0.5, y: circle.c.y }, r: circle.r };
    if contained_in(&shifted, area) {
        return shifted;
    }
    let shrunk = Circle { c: R2 { x: circle.c.x - circle.r * 0.25, y: circle.c.y }, r: circle.r * 0.75 };
    if contained_in(&shrunk, area) {
        return shrunk;
    }
    trace!("No room next to {:?}; leaving it in place", circle);
    circle
}

impl<'a> Layout<'a> {
    /// Whether a later build step single-pierces `curve`.
    pub(super) fn will_pierce(&self, later: &[BuildStep], curve: &AbstractCurve) -> bool {
        later.iter().any(|step| {
            let rd = step.head();
            rd.is_single_piercing() && rd.split_zones[0].straddled_contour(&rd.split_zones[1]).as_ref() == Some(curve)
        })
    }

    pub(super) fn add_nested(&mut self, later: &[BuildStep], curve: &AbstractCurve, zone: &Zone) -> Result<(), DrawError> {
        let will_pierce = self.will_pierce(later, curve);
        let guide = self.guide_size(curve);
        let mut circle = match self.find_circle_contours(zone, std::slice::from_ref(curve), guide)?.first() {
            Some(&circle) => circle,
            None => return Err(DrawError::NestedNoFit { curve: curve.clone(), zone: zone.clone() }),
        };
        if will_pierce && !zone.is_outside() {
            let area = self.area(zone);
            circle = make_room(circle, &area);
        }
        info!("Added a nested contour labelled {}", curve);
        self.add_circle(curve, circle);
        Ok(())
    }

    /// Place every curve of a nested batch at once. `Ok(false)` means fall back to one at a time.
    pub(super) fn add_symmetric_nested(&mut self, step: &BuildStep) -> Result<bool, DrawError> {
        let head = step.head();
        let zone = &head.split_zones[0];
        let guide = self.guide_size(&head.added_curve);
        let curves: Vec<AbstractCurve> = step.data.iter().map(|rd| rd.added_curve.clone()).collect();
        let circles = match self.find_circle_contours(zone, &curves, guide) {
            Ok(circles) => circles,
            Err(e) => {
                warn!("Symmetric nesting of {} contours in {} failed ({}); placing them one at a time", curves.len(), zone, e);
                return Ok(false);
            }
        };
        if circles.is_empty() {
            return Ok(false);
        }
        if circles.len() != curves.len() {
            return Err(DrawError::CircleCount { zone: zone.clone(), expected: curves.len(), found: circles.len() });
        }
        for (curve, circle) in curves.iter().zip(circles) {
            self.add_circle(curve, circle);
        }
        Ok(true)
    }

    /// Circles for `curves`, all nested in `zone`, in order.
    pub(super) fn find_circle_contours(&mut self, zone: &Zone, curves: &[AbstractCurve], guide: f64) -> Result<Vec<Circle<f64>>, DrawError> {
        let n = curves.len();
        if self.contours.is_empty() {
            // First contours: a row through the middle of the canvas
            let mid = self.bbox.center();
            let circles = (0..n)
                .map(|i| Circle::new(mid.x - 0.5 * (guide * 3. * n as f64) + 1.5 * guide + guide * 3. * i as f64, mid.y, guide))
                .collect();
            info!("Added first contours into diagram, labelled {}", curves[0].label);
            return Ok(circles);
        }

        if zone.is_outside() {
            return Ok(self.outside_circles(n, guide));
        }

        let area = self.area(zone);
        if area.is_empty() {
            return Err(DrawError::EmptyZone { zone: zone.clone() });
        }

        if n == 1 {
            if let Some(circle) = self.between_neighbours(zone, &curves[0], &area, guide) {
                return Ok(vec![circle]);
            }
        }

        let Some(bounds) = area.bounds() else {
            return Err(DrawError::EmptyZone { zone: zone.clone() });
        };
        trace!("Putting contour {} inside {}, grid-style", curves[0], zone);
        let grid = Grid::new(&area, &bounds);
        let Some(square) = grid.largest_square(n) else {
            return Err(DrawError::NestedNoFit { curve: curves[0].clone(), zone: zone.clone() });
        };

        let radius = square.size as f64 * SMALLEST_RADIUS * 0.5;
        let mut actual = radius;
        if actual > 2. * SMALLEST_RADIUS {
            actual -= SMALLEST_RADIUS;
        } else if actual > SMALLEST_RADIUS {
            actual = SMALLEST_RADIUS;
        }
        let offset = |k: usize| {
            let d = 2. * radius * k as f64;
            if square.tall { R2 { x: 0., y: d } } else { R2 { x: d, y: 0. } }
        };

        // Centered on the zone's bounds, if they all fit
        let mut start = bounds.center();
        if square.tall {
            start.y -= radius * (n as f64 - 1.);
        } else {
            start.x -= radius * (n as f64 - 1.);
        }
        let centered: Vec<Circle<f64>> = (0..n).map(|k| Circle { c: start + offset(k), r: guide.min(actual) }).collect();
        if centered.iter().all(|c| contained_in(c, &area)) {
            return Ok(centered);
        }

        // Otherwise anchored at the square's corner
        let corner = Grid::point(&grid.base, square.i, square.j);
        Ok((0..n)
            .map(|k| {
                let c = corner + R2 { x: radius, y: radius } + offset(k);
                let attempt = Circle { c, r: guide.min(actual + SMALLEST_RADIUS) };
                if contained_in(&attempt, &area) {
                    attempt
                } else {
                    Circle { c, r: actual }
                }
            })
            .collect())
    }

    /// `n` circles beside everything drawn so far, on the side that keeps the drawing squarer.
    fn outside_circles(&self, n: usize, guide: f64) -> Vec<Circle<f64>> {
        let Some(b) = Rect::union_all(self.contours.iter().map(|c| c.bounds())) else {
            return vec![];
        };
        let (min_x, max_x, min_y, max_y) = (b.x, b.max_x(), b.y, b.max_y());
        let mid = b.center();
        let narrow = max_x - min_x < max_y - min_y;
        match n {
            1 if narrow => vec![Circle::new(max_x + guide * 1.5, mid.y, guide)],
            1 => vec![Circle::new(mid.x, max_y + guide * 1.5, guide)],
            2 if narrow => vec![
                Circle::new(max_x + guide * 1.5, mid.y, guide),
                Circle::new(min_x - guide * 1.5, mid.y, guide),
            ],
            2 => vec![
                Circle::new(mid.x, max_y + guide * 1.5, guide),
                Circle::new(mid.x, min_y - guide * 1.5, guide),
            ],
            _ if narrow => {
                let low_y = mid.y - 0.5 * n as f64 * guide * 3. + guide * 1.5;
                (0..n).map(|i| Circle::new(max_x + guide * 1.5, low_y + i as f64 * 3. * guide, guide)).collect()
            }
            _ => {
                let low_x = mid.x - 0.5 * n as f64 * guide * 3. + guide * 1.5;
                (0..n).map(|i| Circle::new(low_x + i as f64 * 3. * guide, max_y + guide * 1.5, guide)).collect()
            }
        }
    }

    /// A circle for `curve` in `zone` placed relative to the zone's neighbouring contours in the
    /// final diagram: concentric with a single neighbour, or between two.
    fn between_neighbours(&self, zone: &Zone, curve: &AbstractCurve, area: &Area, guide: f64) -> Option<Circle<f64>> {
        if !self.actual.includes_zone(zone) {
            panic!("Failed to locate zone {} in final diagram {}", zone, self.actual);
        }
        let neighbours: Vec<AbstractCurve> = self
            .actual
            .zones()
            .iter()
            .filter_map(|z| zone.straddled_contour(z))
            .filter(|c| !c.matches_label(curve))
            .collect();
        match neighbours.as_slice() {
            [outer] => {
                let Ok(outer_circle) = self.circle(outer) else {
                    debug!("Neighbour {} of {} is not a drawn circle", outer, zone);
                    return None;
                };
                debug!("Placing contour {} inside {}", curve, outer);
                let rad = guide.min(outer_circle.r - SMALLEST_RADIUS);
                if rad <= 0.99 * SMALLEST_RADIUS {
                    return None;
                }
                let attempt = outer_circle.with_radius(rad);
                if !contained_in(&attempt, area) {
                    return None;
                }
                Some(if rad > 2. * SMALLEST_RADIUS { outer_circle.with_radius(rad - SMALLEST_RADIUS) } else { attempt })
            }
            [n1, n2] => {
                let (Ok(c1), Ok(c2)) = (self.circle(n1), self.circle(n2)) else {
                    return None;
                };
                let in1 = zone.contains(n1);
                let in2 = zone.contains(n2);
                let step = c2.c - c1.c;
                let len = step.norm();
                let unit = if len != 0. { step / len } else { R2 { x: 1., y: 0. } };
                let p1 = c1.c + unit * (c1.r * if in2 { 1. } else { -1. });
                let p2 = c2.c + unit * (c2.r * if in1 { -1. } else { 1. });
                let center = (p1 + p2) * 0.5;
                let max_rad = ((p2 - p1) * 0.5).norm();
                let attempt = Circle { c: center, r: max_rad - SMALLEST_RADIUS };
                if !contained_in(&attempt, area) {
                    return None;
                }
                Some(if max_rad > 3. * SMALLEST_RADIUS {
                    Circle { c: center, r: max_rad - 2. * SMALLEST_RADIUS }
                } else {
                    attempt
                })
            }
            _ => None,
        }
    }
}
