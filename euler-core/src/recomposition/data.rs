use derive_more::{Deref, Display};

use crate::model::{AbstractCurve, Zone};

/// Zones split together by one added contour.
#[derive(Debug, Clone, Deref, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cluster(pub Vec<Zone>);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PiercingKind {
    #[display(fmt = "nested")]
    Nested,
    #[display(fmt = "single piercing")]
    SinglePiercing,
    #[display(fmt = "double piercing")]
    DoublePiercing,
    #[display(fmt = "not piercing")]
    NotPiercing,
}

/// One contour added during recomposition: the zones it splits and the zones it creates
/// (`added_zones[i] == split_zones[i].move_inside(added_curve)`).
#[derive(Debug, Clone, PartialEq)]
pub struct RecompositionData {
    pub added_curve: AbstractCurve,
    pub split_zones: Vec<Zone>,
    pub added_zones: Vec<Zone>,
}

impl RecompositionData {
    pub fn new(added_curve: AbstractCurve, split_zones: Vec<Zone>) -> Self {
        let added_zones = split_zones.iter().map(|z| z.move_inside(&added_curve)).collect();
        RecompositionData { added_curve, split_zones, added_zones }
    }

    pub fn kind(&self) -> PiercingKind {
        match self.split_zones.len() {
            1 => PiercingKind::Nested,
            2 => PiercingKind::SinglePiercing,
            4 => PiercingKind::DoublePiercing,
            _ => PiercingKind::NotPiercing,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.kind() == PiercingKind::Nested
    }

    pub fn is_single_piercing(&self) -> bool {
        self.kind() == PiercingKind::SinglePiercing
    }

    pub fn is_double_piercing(&self) -> bool {
        self.kind() == PiercingKind::DoublePiercing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn kinds() {
        let a = AbstractCurve::new('a');
        let zones = |labels: &[&str]| labels.iter().map(|l| Zone::from_labels(l)).collect::<Vec<_>>();
        let rd = RecompositionData::new(a.clone(), zones(&["b"]));
        assert_eq!(rd.kind(), PiercingKind::Nested);
        assert_eq!(rd.added_zones, zones(&["ab"]));
        assert!(RecompositionData::new(a.clone(), zones(&["", "b"])).is_single_piercing());
        assert!(RecompositionData::new(a.clone(), zones(&["", "b", "c", "bc"])).is_double_piercing());
        let rd = RecompositionData::new(a, zones(&["", "b", "c"]));
        assert_eq!(rd.kind(), PiercingKind::NotPiercing);
        assert_eq!(rd.kind().to_string(), "not piercing");
    }
}
