use std::{cmp::Ordering, collections::BTreeSet, fmt::{self, Display, Formatter}};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::curve::AbstractCurve;

/// A zone ("abstract basic region"): the set of curves it lies inside. Curves absent from the set
/// are outside, relative to whatever [`Description`](super::Description) holds the zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    curves: BTreeSet<AbstractCurve>,
}

impl Zone {
    /// The zone inside no curve.
    pub fn outside() -> Self {
        Zone::default()
    }

    pub fn new<I: IntoIterator<Item = AbstractCurve>>(curves: I) -> Self {
        Zone { curves: curves.into_iter().collect() }
    }

    /// Parse a concatenation of single-character curve labels, e.g. `"ab"`.
    pub fn from_labels(labels: &str) -> Self {
        Zone::new(labels.chars().map(AbstractCurve::new))
    }

    pub fn curves(&self) -> impl Iterator<Item = &AbstractCurve> {
        self.curves.iter()
    }

    pub fn num_curves(&self) -> usize {
        self.curves.len()
    }

    pub fn is_outside(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn contains(&self, curve: &AbstractCurve) -> bool {
        self.curves.contains(curve)
    }

    pub fn has_curve_with_label(&self, label: char) -> bool {
        self.curves.iter().any(|c| c.label == label)
    }

    pub fn move_inside(&self, curve: &AbstractCurve) -> Zone {
        let mut curves = self.curves.clone();
        curves.insert(curve.clone());
        Zone { curves }
    }

    pub fn move_outside(&self, curve: &AbstractCurve) -> Zone {
        let mut curves = self.curves.clone();
        curves.remove(curve);
        Zone { curves }
    }

    /// Remove every curve sharing `curve`'s label (all copies of a duplicated set).
    pub fn move_outside_label(&self, curve: &AbstractCurve) -> Zone {
        Zone { curves: self.curves.iter().filter(|c| !c.matches_label(curve)).cloned().collect() }
    }

    /// The single curve by which `self` and `other` differ, if they differ by exactly one.
    pub fn straddled_contour(&self, other: &Zone) -> Option<AbstractCurve> {
        let (big, small) = match self.num_curves().cmp(&other.num_curves()) {
            Ordering::Equal => return None,
            Ordering::Greater => (self, other),
            Ordering::Less => (other, self),
        };
        if big.num_curves() != small.num_curves() + 1 {
            return None;
        }
        let mut diff = big.curves.difference(&small.curves);
        match (diff.next(), diff.next()) {
            (Some(c), None) => Some(c.clone()),
            _ => None,
        }
    }

    /// Concatenated curve labels, e.g. `"ab"`; empty for the outside zone.
    pub fn label(&self) -> String {
        self.curves.iter().map(|c| c.label).collect()
    }

    /// Labels of the curves this zone lies in, ignoring duplicate-curve disambiguators.
    pub fn label_key(&self) -> BTreeSet<char> {
        self.curves.iter().map(|c| c.label).collect()
    }
}

impl Ord for Zone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.num_curves()
            .cmp(&other.num_curves())
            .then_with(|| self.curves.iter().cmp(other.curves.iter()))
    }
}

impl PartialOrd for Zone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.curves.iter().join(","))
    }
}
