use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// A named set. Several curves may share a `label` when one logical set is drawn as more than one
/// contour; `idx` disambiguates them (0 is the primary copy).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Tsify)]
pub struct AbstractCurve {
    pub label: char,
    pub idx: usize,
}

impl AbstractCurve {
    pub fn new(label: char) -> Self {
        AbstractCurve { label, idx: 0 }
    }

    /// Copy of this curve with disambiguator `idx` (same logical set, different contour).
    pub fn split(&self, idx: usize) -> Self {
        AbstractCurve { label: self.label, idx }
    }

    pub fn matches_label(&self, other: &AbstractCurve) -> bool {
        self.label == other.label
    }

    pub fn is_duplicate(&self) -> bool {
        self.idx > 0
    }
}

impl Display for AbstractCurve {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        for _ in 0..self.idx {
            write!(f, "'")?;
        }
        Ok(())
    }
}

impl From<char> for AbstractCurve {
    fn from(label: char) -> Self {
        AbstractCurve::new(label)
    }
}
