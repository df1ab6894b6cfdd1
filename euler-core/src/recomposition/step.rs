use crate::model::{Description, Zone};

use super::data::RecompositionData;

/// Addition of one curve label: one [`RecompositionData`] per contour drawn for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecompositionStep {
    pub from: Description,
    pub to: Description,
    pub data: Vec<RecompositionData>,
}

impl RecompositionStep {
    /// Panics unless `data` is non-empty, shares one label, and that label is new in `to`.
    pub fn new(from: Description, to: Description, data: Vec<RecompositionData>) -> Self {
        let Some(first) = data.first() else {
            panic!("Recomposition step {} -> {} adds no contours", from, to);
        };
        let label = first.added_curve.label;
        if let Some(rd) = data.iter().find(|rd| rd.added_curve.label != label) {
            panic!("Mismatched curve labels in one recomposition step: {} and {}", first.added_curve, rd.added_curve);
        }
        if from.includes_label(label) {
            panic!("Recomposition step adds {}, which is already in {}", label, from);
        }
        if !to.includes_label(label) {
            panic!("Recomposition step adds {}, which is missing from {}", label, to);
        }
        RecompositionStep { from, to, data }
    }

    pub fn label(&self) -> char {
        self.data[0].added_curve.label
    }

    pub fn added_zones(&self) -> impl Iterator<Item = &Zone> {
        self.data.iter().flat_map(|rd| rd.added_zones.iter())
    }
}
