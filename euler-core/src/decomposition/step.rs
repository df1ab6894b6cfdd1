use std::collections::{BTreeMap, BTreeSet};

use crate::model::{AbstractCurve, Description, Zone};

/// Removal of one curve label from a description.
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionStep {
    pub from: Description,
    pub to: Description,
    pub removed: AbstractCurve,
    /// Zones of `from` that changed, mapped to their image in `to`.
    pub zones_moved: BTreeMap<Zone, Zone>,
}

impl DecompositionStep {
    /// Remove `removed` (and any duplicate sharing its label) from every zone of `from`.
    pub fn take(from: &Description, removed: &AbstractCurve) -> Self {
        let mut zones_moved = BTreeMap::new();
        let mut zones = BTreeSet::new();
        for zone in from.zones() {
            let moved = zone.move_outside_label(removed);
            if moved != *zone {
                zones_moved.insert(zone.clone(), moved.clone());
            }
            zones.insert(moved);
        }
        let curves = from.curves().iter().filter(|c| !c.matches_label(removed)).cloned().collect();
        DecompositionStep {
            from: from.clone(),
            to: Description::from_parts(curves, zones),
            removed: removed.clone(),
            zones_moved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn take() {
        let d: Description = "a b ab".parse().unwrap();
        let step = DecompositionStep::take(&d, &AbstractCurve::new('a'));
        assert_eq!(step.to, "b".parse::<Description>().unwrap());
        assert_eq!(step.removed, AbstractCurve::new('a'));
        let moved: Vec<(String, String)> = step.zones_moved.iter().map(|(k, v)| (k.label(), v.label())).collect();
        assert_eq!(moved, vec![("a".to_string(), "".to_string()), ("ab".to_string(), "b".to_string())]);
    }

    #[test]
    fn take_removes_duplicates() {
        let a = AbstractCurve::new('a');
        let a1 = a.split(1);
        let d = Description::from_zones([Zone::new([a.clone()]), Zone::new([a1.clone()])]);
        let step = DecompositionStep::take(&d, &a);
        assert!(step.to.is_empty());
        assert_eq!(step.to.num_zones(), 1);
        assert_eq!(step.zones_moved.len(), 2);
    }
}
