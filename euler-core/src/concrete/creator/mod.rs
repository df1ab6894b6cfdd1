//! Geometric synthesis: realizes each recomposition step as circles (or, for clusters that are
//! neither nested nor pierced, a path) placed relative to the contours drawn so far.

pub mod build_step;
mod nested;
mod path;
mod piercing;
mod two_step;

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::{
    config::DiagramConfig,
    decomposition::{Decomposer, DecompositionStep},
    error::DrawError,
    geometry::{area::Area, circle::Circle, contour::Contour, r2::R2, rect::Rect},
    model::{AbstractCurve, Description, Zone},
    recomposition::{Recomposer, RecompositionStep},
};

use self::build_step::{build_steps, BuildStep};

use super::{diagram::ConcreteDiagram, zone::compose_area};

/// Clearance kept between a placed circle and the boundary of the region it must fit in; also
/// the grid resolution of the nested-contour search.
pub const SMALLEST_RADIUS: f64 = 3.;
/// Factor by which a trial circle grows while it still fits.
pub const GROWTH_FACTOR: f64 = 1.5;
pub const MAX_GROWTH_STEPS: usize = 64;
/// Region used before any contour is drawn.
pub const DEFAULT_BOX: Rect = Rect { x: 0., y: 0., w: 1000., h: 1000. };
const GUIDE_SCALE: f64 = 200.;
const GUIDE_EXPONENT: f64 = 0.75;

/// Whether `circle`, grown by [`SMALLEST_RADIUS`], lies within `area`.
pub fn contained_in(circle: &Circle<f64>, area: &Area) -> bool {
    Area::circle(&circle.with_radius(circle.r + SMALLEST_RADIUS)).subtract(area).is_empty()
}

/// Try `suggested` first; otherwise grow from `start` by [`GROWTH_FACTOR`] while the circle fits,
/// keeping the last radius that did.
pub fn grow_circle(area: &Area, center: R2<f64>, suggested: f64, start: f64) -> Option<Circle<f64>> {
    let attempt = Circle { c: center, r: suggested };
    if contained_in(&attempt, area) {
        return Some(attempt);
    }
    let mut good = None;
    let mut radius = start;
    for _ in 0..MAX_GROWTH_STEPS {
        let attempt = Circle { c: center, r: radius };
        if !contained_in(&attempt, area) {
            break;
        }
        good = Some(attempt);
        radius *= GROWTH_FACTOR;
    }
    good
}

pub struct DiagramCreator {
    pub config: DiagramConfig,
    d_steps: Option<Vec<DecompositionStep>>,
    r_steps: Option<Vec<RecompositionStep>>,
}

impl DiagramCreator {
    pub fn new(config: DiagramConfig) -> Self {
        DiagramCreator { config, d_steps: None, r_steps: None }
    }

    /// Draw from pre-computed steps instead of decomposing the description passed to
    /// [`create_diagram`](Self::create_diagram).
    pub fn from_steps(config: DiagramConfig, d_steps: Vec<DecompositionStep>, r_steps: Vec<RecompositionStep>) -> Self {
        DiagramCreator { config, d_steps: Some(d_steps), r_steps: Some(r_steps) }
    }

    pub fn d_steps(&self) -> &[DecompositionStep] {
        self.d_steps.as_deref().unwrap_or_default()
    }

    pub fn r_steps(&self) -> &[RecompositionStep] {
        self.r_steps.as_deref().unwrap_or_default()
    }

    pub fn create_diagram(&mut self, description: &Description, size: f64) -> Result<ConcreteDiagram, DrawError> {
        if self.d_steps.is_none() {
            self.d_steps = Some(Decomposer::new(self.config.decomposition).decompose(description));
        }
        if self.r_steps.is_none() {
            self.r_steps = Some(Recomposer::new(self.config.recomposition).recompose(self.d_steps()));
        }
        let original = match self.d_steps().first() {
            Some(step) => step.from.clone(),
            None => description.clone(),
        };
        let actual = match self.r_steps().last() {
            Some(step) => step.to.clone(),
            None => Description::from_zones([]),
        };
        let contours = {
            let mut layout = Layout::new(&self.config, &actual);
            layout.place_all(self.r_steps())?;
            layout.contours
        };
        let diagram = ConcreteDiagram::new(original, actual, contours, size, &self.config);
        diagram.check_zones()?;
        if self.config.merge_duplicates {
            return Ok(self.merge_duplicates(diagram));
        }
        Ok(diagram)
    }
}

/// Per-run placement state.
struct Layout<'a> {
    config: &'a DiagramConfig,
    actual: &'a Description,
    zone_scores: BTreeMap<Zone, f64>,
    curve_scores: BTreeMap<AbstractCurve, f64>,
    guide_sizes: BTreeMap<AbstractCurve, f64>,
    contours: Vec<Contour>,
    bbox: Rect,
    /// (containing curves, excluding curves) -> zone area within `bbox`
    areas: BTreeMap<(Vec<AbstractCurve>, Vec<AbstractCurve>), Area>,
}

impl<'a> Layout<'a> {
    fn new(config: &'a DiagramConfig, actual: &'a Description) -> Self {
        // Every zone scores 1
        let zone_scores: BTreeMap<Zone, f64> = actual.zones().iter().map(|z| (z.clone(), 1.)).collect();
        let total: f64 = zone_scores.values().sum();
        let mut curve_scores = BTreeMap::new();
        let mut guide_sizes = BTreeMap::new();
        for curve in actual.curves() {
            let score: f64 = zone_scores.iter().filter(|(z, _)| z.contains(curve)).map(|(_, s)| s).sum();
            curve_scores.insert(curve.clone(), score);
            guide_sizes.insert(curve.clone(), (GUIDE_EXPONENT * (score / total).ln()).exp() * GUIDE_SCALE);
        }
        info!(
            "Guide sizes: {}",
            guide_sizes.iter().map(|(c, r)| format!("{}: {:.1}", c, r)).collect::<Vec<_>>().join(", "),
        );
        Layout {
            config,
            actual,
            zone_scores,
            curve_scores,
            guide_sizes,
            contours: vec![],
            bbox: DEFAULT_BOX,
            areas: BTreeMap::new(),
        }
    }

    fn place_all(&mut self, r_steps: &[RecompositionStep]) -> Result<(), DrawError> {
        let steps = build_steps(r_steps, &self.curve_scores);
        for idx in 0..steps.len() {
            let step = &steps[idx];
            let bbox = self.outer_box();
            self.set_box(bbox);
            debug!("Build step {} begin: {}", idx, step.data.iter().map(|rd| rd.added_curve.to_string()).collect::<Vec<_>>().join(" "));
            if step.is_batch() {
                let placed = if step.head().is_nested() {
                    self.add_symmetric_nested(step)?
                } else if step.head().is_single_piercing() {
                    self.add_symmetric_single_piercings(step)?
                } else {
                    false
                };
                if placed {
                    continue;
                }
            }
            for rd in &step.data {
                let curve = &rd.added_curve;
                if rd.is_nested() {
                    self.add_nested(&steps[idx + 1..], curve, &rd.split_zones[0])?;
                } else if rd.is_single_piercing() {
                    self.add_single_piercing(curve, &rd.split_zones[0], &rd.split_zones[1])?;
                } else if rd.is_double_piercing() {
                    self.add_double_piercing(curve, &rd.split_zones)?;
                } else {
                    warn!("{} splits {} zones; drawing it as a path", curve, rd.split_zones.len());
                    self.add_path(curve, &rd.split_zones)?;
                }
            }
            debug!("Build step {} end: {} contours", idx, self.contours.len());
        }
        Ok(())
    }

    fn guide_size(&self, curve: &AbstractCurve) -> f64 {
        match self.guide_sizes.get(curve) {
            Some(&size) => size,
            None => panic!("No guide size for curve {}, which is missing from {}", curve, self.actual),
        }
    }

    fn add_contour(&mut self, contour: Contour) {
        debug!("  adding {}: {:?}", contour.curve, contour.shape);
        self.contours.push(contour);
    }

    fn add_circle(&mut self, curve: &AbstractCurve, circle: Circle<f64>) {
        self.add_contour(Contour::circle(curve.clone(), circle));
    }

    fn circle(&self, curve: &AbstractCurve) -> Result<Circle<f64>, DrawError> {
        let contour = self.contours.iter().find(|c| &c.curve == curve).ok_or_else(|| DrawError::MissingContour(curve.clone()))?;
        contour.as_circle().copied().ok_or_else(|| DrawError::NotACircle(curve.clone()))
    }

    /// Bounds of everything drawn so far, padded by twice its size on each side.
    fn outer_box(&self) -> Rect {
        match Rect::union_all(self.contours.iter().map(|c| c.bounds())) {
            Some(b) => Rect::new(b.x - 2. * b.w, b.y - 2. * b.h, 5. * b.w, 5. * b.h),
            None => DEFAULT_BOX,
        }
    }

    fn set_box(&mut self, bbox: Rect) {
        if bbox != self.bbox {
            self.bbox = bbox;
            self.areas.clear();
        }
    }

    /// Region of `zone` given the contours drawn so far, memoized per (containing, excluding) set.
    fn area(&mut self, zone: &Zone) -> Area {
        let (containing, excluding): (Vec<&Contour>, Vec<&Contour>) = self.contours.iter().partition(|c| zone.contains(&c.curve));
        let key = (
            containing.iter().map(|c| c.curve.clone()).collect(),
            excluding.iter().map(|c| c.curve.clone()).collect(),
        );
        if let Some(area) = self.areas.get(&key) {
            return area.clone();
        }
        let area = compose_area(&self.bbox, containing, excluding);
        self.areas.insert(key, area.clone());
        area
    }

    fn union_area(&mut self, zones: &[Zone]) -> Area {
        zones.iter().fold(Area::empty(), |acc, zone| acc.union(&self.area(zone)))
    }

    /// Scores of the added curve's zones inside and outside `pierced`.
    fn split_scores(&self, added: &AbstractCurve, pierced: &AbstractCurve) -> (f64, f64) {
        let mut inside = 0.;
        let mut outside = 0.;
        for (zone, score) in &self.zone_scores {
            if !zone.contains(added) {
                continue;
            }
            if zone.contains(pierced) {
                inside += score;
            } else {
                outside += score;
            }
        }
        (inside, outside)
    }
}
