use std::{fmt::{self, Display, Formatter}, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::model::{AbstractCurve, Description};

/// How [`Decomposer`](super::Decomposer) picks the next curve(s) to remove.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "kebab-case")]
pub enum DecompositionStrategyType {
    /// First curve in curve order.
    Alphabetic,
    /// Every curve containing no other curve, in one batch.
    #[default]
    Innermost,
    /// A curve whose removal merges every one of its zones into an existing zone; else `Innermost`.
    PiercedFirst,
}

pub const DECOMPOSITION_STRATEGIES: [DecompositionStrategyType; 3] = [
    DecompositionStrategyType::Alphabetic,
    DecompositionStrategyType::Innermost,
    DecompositionStrategyType::PiercedFirst,
];

impl DecompositionStrategyType {
    pub fn name(&self) -> &'static str {
        match self {
            DecompositionStrategyType::Alphabetic => "alphabetic",
            DecompositionStrategyType::Innermost => "innermost",
            DecompositionStrategyType::PiercedFirst => "pierced-first",
        }
    }

    pub fn curves_to_remove(&self, d: &Description) -> Vec<AbstractCurve> {
        match self {
            DecompositionStrategyType::Alphabetic => d.curves().iter().take(1).cloned().collect(),
            DecompositionStrategyType::Innermost => innermost(d),
            DecompositionStrategyType::PiercedFirst => match pierced(d) {
                Some(curve) => vec![curve],
                None => innermost(d),
            },
        }
    }
}

/// One curve per label; decomposition removes labels, not individual copies.
fn representatives(d: &Description) -> Vec<&AbstractCurve> {
    d.curves().iter().unique_by(|c| c.label).collect()
}

/// Whether every zone inside a curve labelled `inner` is also inside one labelled `outer`.
fn is_inside(d: &Description, inner: &AbstractCurve, outer: &AbstractCurve) -> bool {
    d.zones()
        .iter()
        .filter(|z| z.has_curve_with_label(inner.label))
        .all(|z| z.has_curve_with_label(outer.label))
}

fn innermost(d: &Description) -> Vec<AbstractCurve> {
    let curves = representatives(d);
    let innermost: Vec<AbstractCurve> = curves
        .iter()
        .filter(|c| !curves.iter().any(|o| o.label != c.label && is_inside(d, o, c)))
        .map(|c| (*c).clone())
        .collect();
    if !innermost.is_empty() {
        return innermost;
    }
    // Mutually nested curves (identical zone sets): take the one in fewest zones
    curves
        .into_iter()
        .min_by_key(|c| d.num_zones_in(c))
        .cloned()
        .into_iter()
        .collect()
}

fn pierced(d: &Description) -> Option<AbstractCurve> {
    representatives(d)
        .into_iter()
        .filter(|c| {
            d.zones()
                .iter()
                .filter(|z| z.has_curve_with_label(c.label))
                .all(|z| d.includes_zone(&z.move_outside_label(c)))
        })
        .min_by_key(|c| d.num_zones_in(c))
        .cloned()
}

impl Display for DecompositionStrategyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DecompositionStrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DECOMPOSITION_STRATEGIES
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| format!("Unknown decomposition strategy {:?} (expected one of: {})", s, DECOMPOSITION_STRATEGIES.iter().join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn labels(curves: Vec<AbstractCurve>) -> String {
        curves.iter().map(|c| c.label).collect()
    }

    fn remove(strategy: DecompositionStrategyType, d: &str) -> String {
        labels(strategy.curves_to_remove(&d.parse().unwrap()))
    }

    #[test]
    fn alphabetic() {
        assert_eq!(remove(DecompositionStrategyType::Alphabetic, "b ab"), "a");
        assert_eq!(remove(DecompositionStrategyType::Alphabetic, ""), "");
    }

    #[test]
    fn innermost() {
        use DecompositionStrategyType::Innermost;
        // b is nested in a
        assert_eq!(remove(Innermost, "a ab"), "b");
        // c in b in a
        assert_eq!(remove(Innermost, "a ab abc"), "c");
        assert_eq!(remove(Innermost, "a b c ab ac bc abc"), "abc");
        // a and b always together: neither contains the other strictly, fewest zones wins (tie: first)
        assert_eq!(remove(Innermost, "ab"), "a");
    }

    #[test]
    fn pierced_first() {
        use DecompositionStrategyType::PiercedFirst;
        // Removing b from "a ab" maps ab -> a, which exists
        assert_eq!(remove(PiercedFirst, "a ab"), "b");
        // "b ab": removing a maps ab -> b (exists); removing b maps ab -> a (missing)
        assert_eq!(remove(PiercedFirst, "b ab"), "a");
        // No curve can be removed without creating a zone: fall back to innermost
        assert_eq!(remove(PiercedFirst, "ab"), "a");
    }

    #[test]
    fn parse() {
        for strategy in DECOMPOSITION_STRATEGIES {
            assert_eq!(strategy.to_string().parse::<DecompositionStrategyType>(), Ok(strategy));
        }
        assert!("outermost".parse::<DecompositionStrategyType>().is_err());
        assert_eq!(DecompositionStrategyType::default(), DecompositionStrategyType::Innermost);
    }
}
