use std::collections::BTreeSet;

use log::{debug, info, trace};
use ordered_float::OrderedFloat;

use crate::{
    error::DrawError,
    geometry::{area::Area, contour::Contour, r2::R2},
    graph::DualGraph,
    model::{AbstractCurve, Zone},
};

use super::{super::zone::ConcreteZone, Layout};

/// Path vertices sit this far (relative to the centroid of the zone centers) beyond each center.
pub const PATH_INFLATION: f64 = 1.1;

impl<'a> Layout<'a> {
    /// Zones in the order a closed path should visit them: along a dual-graph cycle through all of
    /// them when there is one, otherwise `None`.
    fn cycle_order(zones: &[Zone]) -> Option<Vec<Zone>> {
        let graph = DualGraph::new(zones);
        let cycle = graph.compute_cycle(zones)?;
        Some(cycle.nodes.iter().map(|&n| graph.zone(n).clone()).collect())
    }

    pub(super) fn add_path(&mut self, curve: &AbstractCurve, zones: &[Zone]) -> Result<(), DrawError> {
        let (ordered, by_angle) = match Self::cycle_order(zones) {
            Some(ordered) => {
                trace!("Path for {} follows a dual cycle through {} zones", curve, ordered.len());
                (ordered, false)
            }
            None => (zones.to_vec(), true),
        };
        let mut centers = Vec::with_capacity(ordered.len());
        for zone in &ordered {
            let concrete = ConcreteZone::new(zone.clone(), &self.contours, self.bbox, self.config);
            let Some(center) = concrete.try_center() else {
                return Err(DrawError::EmptyZone { zone: zone.clone() });
            };
            centers.push(center);
        }
        if centers.len() < 3 {
            return Err(DrawError::PathNoFit { curve: curve.clone(), zones: zones.to_vec() });
        }
        let mean = centers.iter().fold(R2::new(0., 0.), |acc, &p| acc + p) / centers.len() as f64;
        if by_angle {
            centers.sort_by_key(|p| OrderedFloat((p.y - mean.y).atan2(p.x - mean.x)));
        }
        let points: Vec<R2<f64>> = centers.into_iter().map(|p| mean + (p - mean) * PATH_INFLATION).collect();
        let num_points = points.len();
        self.add_contour(Contour::path(curve.clone(), points));
        if !self.regions_match() {
            self.contours.pop();
            return Err(DrawError::PathNoFit { curve: curve.clone(), zones: zones.to_vec() });
        }
        info!("Added a path labelled {} through {} zones", curve, num_points);
        Ok(())
    }

    /// Zones of the final diagram, restricted to the curves drawn so far.
    fn expected_zones(&self) -> BTreeSet<Zone> {
        let drawn: BTreeSet<&AbstractCurve> = self.contours.iter().map(|c| &c.curve).collect();
        self.actual
            .zones()
            .iter()
            .map(|z| Zone::new(z.curves().filter(|c| drawn.contains(c)).cloned()))
            .collect()
    }

    /// Whether the contours drawn so far induce exactly the expected zones: each has area, and
    /// together they cover the box.
    fn regions_match(&mut self) -> bool {
        let mut covered = Area::empty();
        for zone in self.expected_zones() {
            let area = self.area(&zone);
            if area.is_empty() {
                debug!("  zone {} is claimed but not drawn", zone);
                return false;
            }
            covered = covered.union(&area);
        }
        let uncovered = Area::rect(&self.bbox).subtract(&covered);
        if !uncovered.is_empty() {
            debug!("  {:.3} of the box lies in no claimed zone", uncovered.size());
            return false;
        }
        true
    }
}
