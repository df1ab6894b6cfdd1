use std::{cell::OnceCell, fmt::{self, Display, Formatter}};

use crate::{
    config::DiagramConfig,
    error::DrawError,
    geometry::{area::Area, contour::Contour, r2::R2, rect::Rect},
    model::{AbstractCurve, Zone},
};

use super::visual_center::visual_center;

/// `bbox`, intersected with every containing contour (grown slightly) and minus every excluding
/// contour (shrunk slightly).
pub fn compose_area<'a, C, E>(bbox: &Rect, containing: C, excluding: E) -> Area
where
    C: IntoIterator<Item = &'a Contour>,
    E: IntoIterator<Item = &'a Contour>,
{
    let mut area = Area::rect(bbox);
    for contour in containing {
        area = area.intersect(&contour.big_area());
    }
    for contour in excluding {
        area = area.subtract(&contour.small_area());
    }
    area
}

/// Concrete realization of a [`Zone`]: the part of `bbox` inside its curves' contours and outside
/// all others.
#[derive(Debug, Clone)]
pub struct ConcreteZone {
    pub zone: Zone,
    pub containing: Vec<Contour>,
    pub excluding: Vec<Contour>,
    pub bbox: Rect,
    parallel: bool,
    use_centroid: bool,
    shape: OnceCell<Area>,
    center: OnceCell<Option<R2<f64>>>,
}

impl ConcreteZone {
    pub fn new(zone: Zone, contours: &[Contour], bbox: Rect, config: &DiagramConfig) -> Self {
        let (containing, excluding): (Vec<Contour>, Vec<Contour>) = contours.iter().cloned().partition(|c| zone.contains(&c.curve));
        ConcreteZone {
            zone,
            containing,
            excluding,
            bbox,
            parallel: config.parallel,
            use_centroid: config.use_centroid,
            shape: OnceCell::new(),
            center: OnceCell::new(),
        }
    }

    pub fn shape(&self) -> &Area {
        self.shape.get_or_init(|| compose_area(&self.bbox, &self.containing, &self.excluding))
    }

    pub fn is_empty(&self) -> bool {
        self.shape().is_empty()
    }

    pub fn contains_contour(&self, curve: &AbstractCurve) -> bool {
        self.containing.iter().any(|c| &c.curve == curve)
    }

    /// A point inside this zone's shape, or `None` for an empty zone.
    pub fn try_center(&self) -> Option<R2<f64>> {
        *self.center.get_or_init(|| {
            let shape = self.shape();
            if self.use_centroid {
                if let Some(centroid) = shape.centroid() {
                    if centroid.is_finite() && shape.contains(&centroid) {
                        return Some(centroid);
                    }
                }
            }
            visual_center(shape, self.parallel)
        })
    }

    pub fn center(&self) -> Result<R2<f64>, DrawError> {
        self.try_center().ok_or_else(|| DrawError::EmptyZone { zone: self.zone.clone() })
    }
}

impl Display for ConcreteZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.zone)
    }
}
