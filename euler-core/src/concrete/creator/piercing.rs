use std::f64::consts::{PI, TAU};

use log::{info, trace, warn};

use crate::{
    error::DrawError,
    geometry::{circle::Circle, r2::R2},
    model::{AbstractCurve, Zone},
};

use super::{contained_in, grow_circle, BuildStep, Layout, SMALLEST_RADIUS};

/// Sixteenths of a turn, ordered to spread early samples evenly around the circle before refining.
const ANGLE_ORDER: [u8; 16] = [0, 8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7, 9, 11, 13, 15];

/// Candidate angles for a piercing circle's center around the pierced circle.
pub fn angles() -> impl Iterator<Item = f64> {
    ANGLE_ORDER.iter().map(|&k| TAU * k as f64 / ANGLE_ORDER.len() as f64)
}

impl<'a> Layout<'a> {
    fn pierced(&self, z0: &Zone, z1: &Zone) -> Result<(AbstractCurve, Circle<f64>), DrawError> {
        let curve = z0.straddled_contour(z1).ok_or_else(|| DrawError::NotAdjacent(z0.clone(), z1.clone()))?;
        let circle = self.circle(&curve)?;
        Ok((curve, circle))
    }

    /// Radius of the circle (concentric with the pierced one) the piercing's center lies on: moved
    /// out (in) when more of the added curve's zones lie outside (inside) the pierced curve.
    fn center_radius(&self, added: &AbstractCurve, pierced: &AbstractCurve, pierced_circle: &Circle<f64>, suggested: f64) -> f64 {
        let (inside, outside) = self.split_scores(added, pierced);
        trace!("Scores for {} are inside={} and outside={} of {}", added, inside, outside, pierced);
        let r = pierced_circle.r;
        if outside > inside {
            r + suggested * 0.3
        } else if outside < inside {
            r - (suggested * 0.3).min((r * 2. - suggested) * 0.5)
        } else {
            r
        }
    }

    pub(super) fn add_single_piercing(&mut self, curve: &AbstractCurve, z0: &Zone, z1: &Zone) -> Result<(), DrawError> {
        let (pierced, cc) = self.pierced(z0, z1)?;
        let area = self.union_area(&[z0.clone(), z1.clone()]);
        let suggested = self.guide_size(curve);
        let on_radius = self.center_radius(curve, &pierced, &cc, suggested);

        let mut solution: Option<Circle<f64>> = None;
        for angle in angles() {
            let center = cc.c.polar(on_radius, angle);
            if !area.contains(&center) {
                continue;
            }
            let start = SMALLEST_RADIUS + solution.map_or(0., |s| s.r);
            if let Some(attempt) = grow_circle(&area, center, suggested, start) {
                let done = attempt.r == suggested;
                solution = Some(attempt);
                if done {
                    break;
                }
            }
        }
        let Some(circle) = solution else {
            return Err(DrawError::SinglePiercingNoFit { curve: curve.clone(), zones: vec![z0.clone(), z1.clone()] });
        };
        info!("Added a single piercing labelled {}", curve);
        self.add_circle(curve, circle);
        Ok(())
    }

    pub(super) fn add_double_piercing(&mut self, curve: &AbstractCurve, zones: &[Zone]) -> Result<(), DrawError> {
        let z0 = &zones[0];
        let mut straddled = zones[1..].iter().filter_map(|z| z0.straddled_contour(z));
        let (Some(c1), Some(c2)) = (straddled.next(), straddled.next()) else {
            return Err(DrawError::NotAdjacent(z0.clone(), zones[1].clone()));
        };
        let cc1 = self.circle(&c1)?;
        let cc2 = self.circle(&c2)?;
        let Some(points) = cc1.intersect(&cc2) else {
            return Err(DrawError::NonIntersectingCircles { c1, c2 });
        };
        let area = self.union_area(zones);
        let Some(center) = points.into_iter().find(|p| area.contains(p)) else {
            trace!("No suitable intersection for double piercing");
            return Err(DrawError::DoublePiercingDisjoint { c1, c2, zones: zones.to_vec() });
        };
        trace!("Intersection at {}", center);
        let suggested = self.guide_size(curve);
        let Some(circle) = grow_circle(&area, center, suggested, SMALLEST_RADIUS) else {
            return Err(DrawError::DoublePiercingNoFit { curve: curve.clone(), zones: zones.to_vec() });
        };
        info!("Added a double piercing labelled {}", curve);
        self.add_circle(curve, circle);
        Ok(())
    }

    /// Place a batch of same-label single piercings of one zone pair evenly around the pierced
    /// circle. `Ok(false)` means fall back to one at a time.
    pub(super) fn add_symmetric_single_piercings(&mut self, step: &BuildStep) -> Result<bool, DrawError> {
        let head = step.head();
        let (z0, z1) = (&head.split_zones[0], &head.split_zones[1]);
        let (pierced, cc) = self.pierced(z0, z1)?;
        let area = self.union_area(&[z0.clone(), z1.clone()]);
        let guide = self.guide_size(&head.added_curve);
        let on_radius = self.center_radius(&head.added_curve, &pierced, &cc, guide);
        let n = step.data.len();

        // How many guide-sized circles fit around the pierced one
        let sample_size = (PI / (guide / cc.r).asin()) as usize;
        if sample_size < n {
            return Ok(false);
        }
        let fits = |center: R2<f64>| area.contains(&center) && contained_in(&Circle { c: center, r: guide }, &area);
        let sample = |i: usize, of: usize| cc.c.polar(on_radius, i as f64 * TAU / of as f64);
        let num_ok = (0..sample_size).filter(|&i| fits(sample(i, sample_size))).count();
        if num_ok < n {
            return Ok(false);
        }
        if num_ok == sample_size {
            let centers: Vec<_> = (0..n).map(|i| sample(i, n)).collect();
            if !centers.iter().all(|c| area.contains(c)) {
                warn!("Symmetric piercing of {} by {} contours left the permitted area; placing them one at a time", pierced, n);
                return Ok(false);
            }
            for (rd, center) in step.data.iter().zip(centers) {
                self.add_circle(&rd.added_curve, Circle { c: center, r: guide });
            }
            return Ok(true);
        }
        if num_ok > sample_size {
            // Unreachable: `num_ok` counts a subset of the samples
            let mut placed = 0;
            for i in 0..sample_size {
                let center = sample(i, sample_size);
                if fits(center) {
                    self.add_circle(&step.data[placed].added_curve, Circle { c: center, r: guide });
                    placed += 1;
                    if placed == n {
                        break;
                    }
                }
            }
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DiagramConfig, model::Description};
    use test_log::test;

    fn piercings(labels: &str, pierced: &str) -> BuildStep {
        use crate::recomposition::RecompositionData;
        let zones = vec![Zone::outside(), Zone::from_labels(pierced)];
        BuildStep { data: labels.chars().map(|l| RecompositionData::new(AbstractCurve::new(l), zones.clone())).collect() }
    }

    #[test]
    fn symmetric_single_piercings() {
        let actual: Description = "a b c ab ac".parse().unwrap();
        let config = DiagramConfig::default();
        let mut layout = layout(&config, &actual);
        layout.add_circle(&AbstractCurve::new('a'), Circle::new(500., 500., 100.));
        let bbox = layout.outer_box();
        layout.set_box(bbox);
        assert_eq!(layout.add_symmetric_single_piercings(&piercings("bc", "a")), Ok(true));
        // Two guide-sized circles fit around a; they sit opposite each other on its boundary
        let guide = (1f64 / 3.).powf(0.75) * 200.;
        let b = layout.circle(&AbstractCurve::new('b')).unwrap();
        let c = layout.circle(&AbstractCurve::new('c')).unwrap();
        assert_relative_eq!(b.c, R2::new(600., 500.), epsilon = 1e-9);
        assert_relative_eq!(c.c, R2::new(400., 500.), epsilon = 1e-9);
        assert_relative_eq!(b.r, guide, epsilon = 1e-9);
        assert_relative_eq!(c.r, guide, epsilon = 1e-9);
    }

    #[test]
    fn too_many_symmetric_piercings() {
        let actual: Description = "a b c d ab ac ad".parse().unwrap();
        let config = DiagramConfig::default();
        let mut layout = layout(&config, &actual);
        layout.add_circle(&AbstractCurve::new('a'), Circle::new(500., 500., 80.));
        let bbox = layout.outer_box();
        layout.set_box(bbox);
        // Only two circles of the guide size fit around a
        assert_eq!(layout.add_symmetric_single_piercings(&piercings("bcd", "a")), Ok(false));
        assert_eq!(layout.contours.len(), 1);
    }

    #[test]
    fn angle_order() {
        let angles: Vec<f64> = angles().collect();
        assert_eq!(angles.len(), 16);
        assert_relative_eq!(angles[0], 0.);
        assert_relative_eq!(angles[1], PI);
        assert_relative_eq!(angles[2], PI / 2.);
        assert_relative_eq!(angles[3], 3. * PI / 2.);
        assert_relative_eq!(angles[15], 15. * TAU / 16.);
    }

    fn layout<'a>(config: &'a DiagramConfig, actual: &'a Description) -> Layout<'a> {
        Layout::new(config, actual)
    }

    #[test]
    fn single_piercing() {
        let actual: Description = "a b ab".parse().unwrap();
        let config = DiagramConfig::default();
        let mut layout = layout(&config, &actual);
        let a = AbstractCurve::new('a');
        let b = AbstractCurve::new('b');
        layout.add_circle(&a, Circle::new(500., 500., 100.));
        let bbox = layout.outer_box();
        layout.set_box(bbox);
        layout.add_single_piercing(&b, &Zone::outside(), &Zone::from_labels("a")).unwrap();
        let guide = 0.5f64.powf(0.75) * 200.;
        // Balanced scores: centered on a's boundary at angle 0
        let placed = layout.circle(&b).unwrap();
        assert_relative_eq!(placed.c, R2::new(600., 500.), epsilon = 1e-9);
        assert_relative_eq!(placed.r, guide, epsilon = 1e-9);
    }

    #[test]
    fn double_piercing() {
        let actual: Description = "a b c ab ac bc abc".parse().unwrap();
        let config = DiagramConfig::default();
        let mut layout = layout(&config, &actual);
        let (a, b, c) = (AbstractCurve::new('a'), AbstractCurve::new('b'), AbstractCurve::new('c'));
        layout.add_circle(&b, Circle::new(500., 500., 100.));
        layout.add_circle(&c, Circle::new(600., 500., 100.));
        let bbox = layout.outer_box();
        layout.set_box(bbox);
        let zones: Vec<Zone> = ["", "b", "c", "bc"].iter().map(|l| Zone::from_labels(l)).collect();
        layout.add_double_piercing(&a, &zones).unwrap();
        let placed = layout.circle(&a).unwrap();
        assert_relative_eq!(placed.c.x, 550., epsilon = 1e-9);
        assert_relative_eq!((placed.c.y - 500.).abs(), 7500f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn double_piercing_disjoint() {
        let actual: Description = "a b c ab ac bc abc".parse().unwrap();
        let config = DiagramConfig::default();
        let mut layout = layout(&config, &actual);
        let (a, b, c) = (AbstractCurve::new('a'), AbstractCurve::new('b'), AbstractCurve::new('c'));
        layout.add_circle(&b, Circle::new(0., 0., 10.));
        layout.add_circle(&c, Circle::new(100., 0., 10.));
        let zones: Vec<Zone> = ["", "b", "c", "bc"].iter().map(|l| Zone::from_labels(l)).collect();
        assert_eq!(layout.add_double_piercing(&a, &zones), Err(DrawError::NonIntersectingCircles { c1: b, c2: c }));
    }

    #[test]
    fn piercing_a_missing_contour() {
        let actual: Description = "a b ab".parse().unwrap();
        let config = DiagramConfig::default();
        let mut layout = layout(&config, &actual);
        let err = layout.add_single_piercing(&AbstractCurve::new('b'), &Zone::outside(), &Zone::from_labels("a"));
        assert_eq!(err, Err(DrawError::MissingContour(AbstractCurve::new('a'))));
    }
}
