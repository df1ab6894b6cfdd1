//! Second pass over a finished diagram: every set drawn as several contours (`a`, `a'`, ...) is
//! redrawn as a single path contour threading a dual-graph cycle of the remaining diagram.

use std::collections::BTreeSet;

use log::{debug, info, warn};

use crate::{
    error::DrawError,
    geometry::contour::Contour,
    graph::DualGraph,
    model::{AbstractCurve, Description, Zone},
};

use super::{
    super::{diagram::ConcreteDiagram, zone::ConcreteZone},
    DiagramCreator,
};

impl DiagramCreator {
    /// Merge the contours of each duplicated label. Labels whose merge fails keep their contours.
    pub fn merge_duplicates(&self, diagram: ConcreteDiagram) -> ConcreteDiagram {
        let labels: Vec<char> = diagram.find_duplicate_contours().into_keys().collect();
        let mut diagram = diagram;
        for label in labels {
            match self.merge_label(&diagram, label) {
                Ok(merged) => diagram = merged,
                Err(e) => warn!("Keeping the duplicated contours of {}: {}", label, e),
            }
        }
        diagram
    }

    fn merge_label(&self, diagram: &ConcreteDiagram, label: char) -> Result<ConcreteDiagram, DrawError> {
        let curve = AbstractCurve::new(label);
        let contours: Vec<Contour> = diagram.contours().iter().filter(|c| c.curve.label != label).cloned().collect();
        let remaining: Vec<Zone> = diagram
            .actual
            .zones()
            .iter()
            .map(|z| z.move_outside_label(&curve))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let split: Vec<Zone> = diagram
            .actual
            .zones()
            .iter()
            .filter(|z| z.has_curve_with_label(label))
            .map(|z| z.move_outside_label(&curve))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let graph = DualGraph::new(&remaining);
        let cycle = graph
            .compute_cycle(&split)
            .ok_or_else(|| DrawError::PathNoFit { curve: curve.clone(), zones: split.clone() })?;
        let cycle_zones: Vec<Zone> = cycle.nodes.iter().map(|&n| graph.zone(n).clone()).collect();
        debug!("Merging {}: cycle {}", label, cycle_zones.iter().map(|z| z.to_string()).collect::<Vec<_>>().join(" → "));

        let bbox = diagram.bounding_box();
        let points = cycle_zones
            .iter()
            .map(|zone| ConcreteZone::new(zone.clone(), &contours, bbox, &self.config).center())
            .collect::<Result<Vec<_>, _>>()?;

        let zones = remaining.into_iter().chain(cycle_zones.iter().map(|z| z.move_inside(&curve)));
        let actual = Description::from_zones(zones);
        let mut contours = contours;
        contours.push(Contour::path(curve, points));
        let merged = ConcreteDiagram::new(diagram.original.clone(), actual, contours, bbox.w, &self.config);
        merged.check_zones()?;
        info!("Merged the contours of {} into one path", label);
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DiagramConfig,
        geometry::{circle::Circle, contour::Shape},
    };
    use test_log::test;

    fn creator() -> DiagramCreator {
        DiagramCreator::new(DiagramConfig { parallel: false, ..DiagramConfig::default() })
    }

    #[test]
    fn merge_around_a_lens() {
        // a and a' sit in the crescents of two overlapping circles
        let a = AbstractCurve::new('a');
        let a1 = a.split(1);
        let b = AbstractCurve::new('b');
        let c = AbstractCurve::new('c');
        let contours = vec![
            Contour::circle(b.clone(), Circle::new(150., 200., 60.)),
            Contour::circle(c.clone(), Circle::new(250., 200., 60.)),
            Contour::circle(a.clone(), Circle::new(120., 200., 15.)),
            Contour::circle(a1.clone(), Circle::new(280., 200., 15.)),
        ];
        let actual = Description::from_zones([
            Zone::new([b.clone()]),
            Zone::new([c.clone()]),
            Zone::new([b.clone(), c.clone()]),
            Zone::new([a.clone(), b.clone()]),
            Zone::new([a1, c.clone()]),
        ]);
        let creator = creator();
        let diagram = ConcreteDiagram::new("b c bc ab ac".parse().unwrap(), actual, contours, 400., &creator.config);
        assert_eq!(diagram.check_zones(), Ok(()));
        assert_eq!(diagram.find_duplicate_contours().len(), 1);

        let merged = creator.merge_duplicates(diagram);
        assert!(merged.find_duplicate_contours().is_empty());
        assert_eq!(merged.contours().len(), 3);
        let path = merged.contour(&a).unwrap();
        let Shape::Path(path) = &path.shape else { panic!("expected a path, got {:?}", path.shape) };
        // One vertex per zone of the dual cycle: outside, b, bc, c
        assert_eq!(path.points.len(), 4);
        let labels: BTreeSet<String> = merged.actual.zones().iter().map(|z| z.label()).collect();
        assert_eq!(labels, ["", "a", "b", "c", "ab", "ac", "bc", "abc"].iter().map(|l| l.to_string()).collect::<BTreeSet<String>>());
        assert_eq!(merged.check_zones(), Ok(()));
        // a and abc weren't requested
        assert_eq!(merged.shaded_zones().len(), 2);
    }

    #[test]
    fn no_cycle_keeps_duplicates() {
        let a = AbstractCurve::new('a');
        let contours = vec![
            Contour::circle(a.clone(), Circle::new(100., 100., 30.)),
            Contour::circle(a.split(1), Circle::new(300., 100., 30.)),
        ];
        let actual = Description::from_zones([Zone::new([a.clone()]), Zone::new([a.split(1)])]);
        let creator = creator();
        let diagram = ConcreteDiagram::new("a".parse().unwrap(), actual, contours, 400., &creator.config);
        assert_eq!(
            creator.merge_label(&diagram, 'a').err(),
            Some(DrawError::PathNoFit { curve: a, zones: vec![Zone::outside()] }),
        );
        let kept = creator.merge_duplicates(diagram);
        assert_eq!(kept.contours().len(), 2);
        assert_eq!(kept.find_duplicate_contours().len(), 1);
    }
}
