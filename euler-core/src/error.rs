use crate::model::{AbstractCurve, Zone};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DescriptionError {
    #[error("Invalid curve label {0:?}: labels are single non-whitespace characters other than '")]
    InvalidLabel(char),

    #[error("Zone {zone} references curve {curve}, which is missing from the curve set")]
    UnknownCurve { zone: Zone, curve: AbstractCurve },

    #[error("Curve {0} is not referenced by any zone")]
    UnusedCurve(AbstractCurve),

    #[error("Description has {0} zones but no outside zone")]
    MissingOutside(usize),
}

/// Recoverable "cannot draw" conditions raised while placing contours.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DrawError {
    #[error("Cannot place nested contour {curve} in zone {zone}")]
    NestedNoFit { curve: AbstractCurve, zone: Zone },

    #[error("Cannot put a nested contour into empty zone {zone}")]
    EmptyZone { zone: Zone },

    #[error("Symmetric nested placement in {zone}: expected {expected} circles, found {found}")]
    CircleCount { zone: Zone, expected: usize, found: usize },

    #[error("1-piercing no fit: {curve} across {zones:?}")]
    SinglePiercingNoFit { curve: AbstractCurve, zones: Vec<Zone> },

    #[error("Double piercing on non-intersecting circles {c1} and {c2}")]
    NonIntersectingCircles { c1: AbstractCurve, c2: AbstractCurve },

    #[error("2-piercing + disjoint: no intersection of {c1} and {c2} lies in {zones:?}")]
    DoublePiercingDisjoint { c1: AbstractCurve, c2: AbstractCurve, zones: Vec<Zone> },

    #[error("2-piercing no fit: {curve} across {zones:?}")]
    DoublePiercingNoFit { curve: AbstractCurve, zones: Vec<Zone> },

    #[error("Curve {0} has no placed contour")]
    MissingContour(AbstractCurve),

    #[error("Curve {0} is drawn as a path and cannot be pierced")]
    NotACircle(AbstractCurve),

    #[error("Zones {0} and {1} are not adjacent")]
    NotAdjacent(Zone, Zone),

    #[error("Cannot draw path contour {curve} through {zones:?}")]
    PathNoFit { curve: AbstractCurve, zones: Vec<Zone> },

    #[error("Drawn regions differ from the description: {missing:?} empty, {unclaimed:.3} area in no zone")]
    ZoneMismatch { missing: Vec<Zone>, unclaimed: f64 },
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Description(#[from] DescriptionError),

    #[error(transparent)]
    Draw(#[from] DrawError),
}
