use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::{
    config::DiagramConfig,
    error::DrawError,
    geometry::{area::Area, contour::Contour, r2::R2, rect::Rect},
    model::{AbstractCurve, Description, Zone},
};

use super::{view::DiagramView, zone::ConcreteZone};

/// Fraction of the target square the drawing is scaled to fill.
pub const FILL: f64 = 0.95;

/// A drawn diagram: contours in placement order plus the zones they induce.
#[derive(Debug, Clone)]
pub struct ConcreteDiagram {
    /// Description that was requested.
    pub original: Description,
    /// Description that was drawn (may carry extra, "shaded", zones and duplicated curves).
    pub actual: Description,
    contours: Vec<Contour>,
    bounding_box: Rect,
    config: DiagramConfig,
    zones: Vec<ConcreteZone>,
}

impl ConcreteDiagram {
    pub fn new(original: Description, actual: Description, contours: Vec<Contour>, size: f64, config: &DiagramConfig) -> Self {
        info!("Initial diagram: {}", original);
        info!("Final diagram  : {}", actual);
        let mut diagram = ConcreteDiagram {
            original,
            actual,
            contours,
            bounding_box: Rect::new(0., 0., size, size),
            config: config.clone(),
            zones: vec![],
        };
        diagram.set_size(size);
        diagram
    }

    /// Recenter and rescale every contour to fill a `size`×`size` box, then rebuild zones.
    pub fn set_size(&mut self, size: f64) {
        if let Some(bounds) = Rect::union_all(self.contours.iter().map(|c| c.bounds())) {
            let mid = bounds.center();
            let biggest = bounds.w.max(bounds.h);
            let scale = if biggest > 0. { size * FILL / biggest } else { 1. };
            let offset = R2 { x: size * 0.5, y: size * 0.5 };
            for contour in &mut self.contours {
                contour.shift(-mid);
                contour.scale(scale);
                contour.shift(offset);
            }
        }
        self.bounding_box = Rect::new(0., 0., size, size);
        self.zones = self
            .actual
            .zones()
            .iter()
            .map(|zone| ConcreteZone::new(zone.clone(), &self.contours, self.bounding_box, &self.config))
            .collect();
        debug!("Concrete zones : {}", self.zones.iter().map(|z| z.to_string()).collect::<Vec<_>>().join(" "));
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn contour(&self, curve: &AbstractCurve) -> Option<&Contour> {
        self.contours.iter().find(|c| &c.curve == curve)
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn zones(&self) -> &[ConcreteZone] {
        &self.zones
    }

    /// Drawn zones absent from the requested description, compared by label so duplicated
    /// curves (`a'`) stand for their originals.
    pub fn is_shaded(&self, zone: &Zone) -> bool {
        !self.original_keys().contains(&zone.label_key())
    }

    fn original_keys(&self) -> BTreeSet<BTreeSet<char>> {
        self.original.zones().iter().map(|z| z.label_key()).collect()
    }

    pub fn shaded_zones(&self) -> Vec<&ConcreteZone> {
        let keys = self.original_keys();
        self.zones.iter().filter(|z| !keys.contains(&z.zone.label_key())).collect()
    }

    pub fn normal_zones(&self) -> Vec<&ConcreteZone> {
        let keys = self.original_keys();
        self.zones.iter().filter(|z| keys.contains(&z.zone.label_key())).collect()
    }

    pub fn outside_zone(&self) -> &ConcreteZone {
        match self.zones.iter().find(|z| z.zone.is_outside()) {
            Some(zone) => zone,
            None => panic!("Diagram {} has no outside zone", self.actual),
        }
    }

    pub fn zones_containing_contour(&self, curve: &AbstractCurve) -> Vec<&ConcreteZone> {
        self.zones.iter().filter(|z| z.contains_contour(curve)).collect()
    }

    /// The zone whose curves are exactly those whose contours contain `p`.
    pub fn zone_at(&self, p: &R2<f64>) -> Zone {
        Zone::new(self.contours.iter().filter(|c| c.contains(p)).map(|c| c.curve.clone()))
    }

    /// Every zone of `actual` has area, and together they cover the bounding box (no region is drawn
    /// that the description doesn't claim).
    pub fn check_zones(&self) -> Result<(), DrawError> {
        let missing: Vec<Zone> = self.zones.iter().filter(|z| z.is_empty()).map(|z| z.zone.clone()).collect();
        let covered = self.zones.iter().fold(Area::empty(), |acc, z| acc.union(z.shape()));
        let uncovered = Area::rect(&self.bounding_box).subtract(&covered);
        if missing.is_empty() && uncovered.is_empty() {
            return Ok(());
        }
        warn!("Drawing of {} is inconsistent: missing {:?}, {:.3} unclaimed", self.actual, missing, uncovered.size());
        Err(DrawError::ZoneMismatch { missing, unclaimed: uncovered.size() })
    }

    /// Labels drawn with more than one contour.
    pub fn find_duplicate_contours(&self) -> BTreeMap<char, Vec<&Contour>> {
        let mut by_label: BTreeMap<char, Vec<&Contour>> = BTreeMap::new();
        for contour in &self.contours {
            by_label.entry(contour.curve.label).or_default().push(contour);
        }
        by_label.retain(|_, contours| contours.len() > 1);
        by_label
    }

    pub fn view(&self) -> DiagramView {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::circle::Circle;
    use test_log::test;

    fn diagram(original: &str, actual: &str, contours: Vec<Contour>, size: f64) -> ConcreteDiagram {
        let config = DiagramConfig { parallel: false, ..DiagramConfig::default() };
        ConcreteDiagram::new(original.parse().unwrap(), actual.parse().unwrap(), contours, size, &config)
    }

    fn two_circles() -> Vec<Contour> {
        vec![
            Contour::circle(AbstractCurve::new('a'), Circle::new(100., 100., 50.)),
            Contour::circle(AbstractCurve::new('b'), Circle::new(160., 100., 50.)),
        ]
    }

    #[test]
    fn set_size() {
        let d = diagram("a b ab", "a b ab", two_circles(), 200.);
        // Bounds 160 wide, scaled to 190 and centered at (100, 100)
        let a = d.contour(&AbstractCurve::new('a')).unwrap().as_circle().unwrap();
        let b = d.contour(&AbstractCurve::new('b')).unwrap().as_circle().unwrap();
        let scale = 190. / 160.;
        assert_relative_eq!(a.r, 50. * scale, epsilon = 1e-9);
        assert_relative_eq!(a.c, R2::new(100. - 30. * scale, 100.), epsilon = 1e-9);
        assert_relative_eq!(b.c, R2::new(100. + 30. * scale, 100.), epsilon = 1e-9);
        assert_eq!(d.bounding_box(), Rect::new(0., 0., 200., 200.));

        let mut d = d;
        d.set_size(400.);
        let a = d.contour(&AbstractCurve::new('a')).unwrap().as_circle().unwrap();
        assert_relative_eq!(a.r, 50. * 380. / 160., epsilon = 1e-9);
        assert_eq!(d.zones().len(), 4);
    }

    #[test]
    fn zones() {
        let d = diagram("a b ab", "a b ab", two_circles(), 200.);
        assert_eq!(d.zones().len(), 4);
        assert!(d.shaded_zones().is_empty());
        assert_eq!(d.normal_zones().len(), 4);
        assert!(d.outside_zone().zone.is_outside());
        let in_a: Vec<String> = d.zones_containing_contour(&AbstractCurve::new('a')).iter().map(|z| z.zone.label()).collect();
        assert_eq!(in_a, vec!["a", "ab"]);
        for zone in d.zones() {
            assert!(zone.shape().contains(&zone.center().unwrap()), "{}", zone);
        }
    }

    #[test]
    fn consistency() {
        let d = diagram("a b ab", "a b ab", two_circles(), 200.);
        assert_eq!(d.check_zones(), Ok(()));
        assert_eq!(d.zone_at(&R2::new(100., 100.)), Zone::from_labels("ab"));
        assert_eq!(d.zone_at(&R2::new(1., 1.)), Zone::outside());

        // The lens is drawn but not claimed
        let d = diagram("a b", "a b", two_circles(), 200.);
        assert!(matches!(d.check_zones(), Err(DrawError::ZoneMismatch { ref missing, unclaimed }) if missing.is_empty() && unclaimed > 1.));

        // Claimed but not drawn
        let disjoint = vec![
            Contour::circle(AbstractCurve::new('a'), Circle::new(100., 100., 50.)),
            Contour::circle(AbstractCurve::new('b'), Circle::new(300., 100., 50.)),
        ];
        let d = diagram("a b ab", "a b ab", disjoint, 200.);
        assert!(matches!(d.check_zones(), Err(DrawError::ZoneMismatch { ref missing, .. }) if missing == &vec![Zone::from_labels("ab")]));
    }

    #[test]
    fn shaded() {
        let d = diagram("a b", "a b ab", two_circles(), 200.);
        let shaded: Vec<String> = d.shaded_zones().iter().map(|z| z.zone.label()).collect();
        assert_eq!(shaded, vec!["ab"]);
        assert!(d.is_shaded(&Zone::from_labels("ab")));
        assert_eq!(d.normal_zones().len(), 3);
    }

    #[test]
    fn duplicates() {
        let a1 = AbstractCurve::new('a').split(1);
        let contours = vec![
            Contour::circle(AbstractCurve::new('a'), Circle::new(0., 0., 10.)),
            Contour::circle(a1.clone(), Circle::new(100., 0., 10.)),
            Contour::circle(AbstractCurve::new('b'), Circle::new(100., 0., 5.)),
        ];
        let actual = Description::from_zones([
            Zone::new([AbstractCurve::new('a')]),
            Zone::new([a1.clone()]),
            Zone::new([a1, AbstractCurve::new('b')]),
        ]);
        let config = DiagramConfig::default();
        let d = ConcreteDiagram::new("a ab".parse().unwrap(), actual, contours, 100., &config);
        let duplicates = d.find_duplicate_contours();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[&'a'].len(), 2);
        // {a'} has label key {a}, which was requested
        assert!(d.shaded_zones().is_empty());
    }
}
