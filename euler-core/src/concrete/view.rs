use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::geometry::{contour::Contour, r2::R2, rect::Rect};

use super::{diagram::ConcreteDiagram, zone::ConcreteZone};

#[derive(Clone, Debug, Tsify, Serialize, Deserialize)]
pub struct ZoneView {
    pub label: String,
    pub shaded: bool,
    pub polygons: Vec<Vec<R2<f64>>>,
    pub center: Option<R2<f64>>,
}

impl ZoneView {
    pub fn new(zone: &ConcreteZone, shaded: bool) -> Self {
        ZoneView {
            label: zone.zone.label(),
            shaded,
            polygons: zone.shape().polygons(),
            center: zone.try_center(),
        }
    }
}

/// Renderer-facing snapshot of a [`ConcreteDiagram`].
#[derive(Clone, Debug, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramView {
    pub original: String,
    pub actual: String,
    pub contours: Vec<Contour>,
    pub zones: Vec<ZoneView>,
    pub bounding_box: Rect,
}

impl From<&ConcreteDiagram> for DiagramView {
    fn from(diagram: &ConcreteDiagram) -> Self {
        DiagramView {
            original: diagram.original.informal_description(),
            actual: diagram.actual.informal_description(),
            contours: diagram.contours().to_vec(),
            zones: diagram.zones().iter().map(|z| ZoneView::new(z, diagram.is_shaded(&z.zone))).collect(),
            bounding_box: diagram.bounding_box(),
        }
    }
}
