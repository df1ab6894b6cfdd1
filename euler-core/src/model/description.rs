use std::{collections::BTreeSet, fmt::{self, Display, Formatter}, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::DescriptionError;

use super::{curve::AbstractCurve, zone::Zone};

/// An abstract diagram: the curves (sets) and zones (regions) that should be drawn.
///
/// Invariants, checked by [`Description::new`]:
/// - every curve referenced by a zone is in the curve set,
/// - every curve in the curve set is referenced by some zone,
/// - the outside zone is present whenever any zone is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Description {
    curves: BTreeSet<AbstractCurve>,
    zones: BTreeSet<Zone>,
}

impl Description {
    pub fn new(curves: BTreeSet<AbstractCurve>, zones: BTreeSet<Zone>) -> Result<Self, DescriptionError> {
        for zone in &zones {
            if let Some(curve) = zone.curves().find(|c| !curves.contains(c)) {
                return Err(DescriptionError::UnknownCurve { zone: zone.clone(), curve: curve.clone() });
            }
        }
        if let Some(curve) = curves.iter().find(|c| !zones.iter().any(|z| z.contains(c))) {
            return Err(DescriptionError::UnusedCurve(curve.clone()));
        }
        if !zones.is_empty() && !zones.contains(&Zone::outside()) {
            return Err(DescriptionError::MissingOutside(zones.len()));
        }
        Ok(Description { curves, zones })
    }

    /// Construct from parts produced by the pipeline itself, which preserves the invariants.
    pub(crate) fn from_parts(curves: BTreeSet<AbstractCurve>, zones: BTreeSet<Zone>) -> Self {
        debug_assert!(Description::new(curves.clone(), zones.clone()).is_ok(), "invalid description: {:?} / {:?}", curves, zones);
        Description { curves, zones }
    }

    /// Build from zones alone; the curve set is the union of the zones' curves and the outside zone
    /// is always added.
    pub fn from_zones<I: IntoIterator<Item = Zone>>(zones: I) -> Self {
        let mut zones: BTreeSet<Zone> = zones.into_iter().collect();
        zones.insert(Zone::outside());
        let curves = zones.iter().flat_map(|z| z.curves().cloned()).collect();
        Description { curves, zones }
    }

    pub fn curves(&self) -> &BTreeSet<AbstractCurve> {
        &self.curves
    }

    pub fn zones(&self) -> &BTreeSet<Zone> {
        &self.zones
    }

    pub fn num_curves(&self) -> usize {
        self.curves.len()
    }

    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn num_zones_in(&self, curve: &AbstractCurve) -> usize {
        self.zones.iter().filter(|z| z.contains(curve)).count()
    }

    pub fn includes_label(&self, label: char) -> bool {
        self.curves.iter().any(|c| c.label == label)
    }

    pub fn includes_zone(&self, zone: &Zone) -> bool {
        self.zones.contains(zone)
    }

    pub fn curve_with_label(&self, label: char) -> Option<&AbstractCurve> {
        self.curves.iter().find(|c| c.label == label)
    }

    /// Zone labels joined by spaces, outside zone omitted, e.g. `"a b ab"`.
    pub fn informal_description(&self) -> String {
        self.zones.iter().filter(|z| !z.is_outside()).map(|z| z.label()).join(" ")
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.zones.iter().join(","))
    }
}

impl PartialEq for Description {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Description {}

impl FromStr for Description {
    type Err = DescriptionError;

    /// Parse the whitespace-separated zone mini-language, e.g. `"a ab abc bc ac"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut zones = Vec::new();
        for word in s.split_whitespace() {
            if let Some(bad) = word.chars().find(|&ch| ch == '\'') {
                return Err(DescriptionError::InvalidLabel(bad));
            }
            zones.push(Zone::from_labels(word));
        }
        Ok(Description::from_zones(zones))
    }
}
