use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::{decomposition::DecompositionStrategyType, recomposition::RecompositionStrategyType};

pub const DEFAULT_DECOMPOSITION: DecompositionStrategyType = DecompositionStrategyType::Innermost;
pub const DEFAULT_RECOMPOSITION: RecompositionStrategyType = RecompositionStrategyType::DoublyPierced;
pub const DEFAULT_FALLBACK_STRATEGIES: [RecompositionStrategyType; 2] = [
    RecompositionStrategyType::SinglyPierced,
    RecompositionStrategyType::Nested,
];
pub const DEFAULT_SIZE: f64 = 400.;

/// Settings for one synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagramConfig {
    /// Order in which curves are stripped from the description
    pub decomposition: DecompositionStrategyType,
    /// How zones split by each re-added curve are grouped into contours
    pub recomposition: RecompositionStrategyType,
    /// Recomposition strategies to retry with, in order, when drawing fails
    pub fallback_strategies: Vec<RecompositionStrategyType>,
    /// Scan visual-center candidates in parallel
    pub parallel: bool,
    /// Use a zone's centroid as its center when it lies inside the zone
    pub use_centroid: bool,
    /// Redraw each set split over several contours as one path contour once the diagram is drawn
    pub merge_duplicates: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            decomposition: DEFAULT_DECOMPOSITION,
            recomposition: DEFAULT_RECOMPOSITION,
            fallback_strategies: DEFAULT_FALLBACK_STRATEGIES.to_vec(),
            parallel: true,
            use_centroid: true,
            merge_duplicates: false,
        }
    }
}

impl DiagramConfig {
    pub fn with_recomposition(&self, recomposition: RecompositionStrategyType) -> Self {
        DiagramConfig { recomposition, ..self.clone() }
    }

    /// The configured recomposition strategy followed by each distinct fallback.
    pub fn strategies(&self) -> Vec<RecompositionStrategyType> {
        let mut strategies = vec![self.recomposition];
        for &strategy in &self.fallback_strategies {
            if !strategies.contains(&strategy) {
                strategies.push(strategy);
            }
        }
        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn strategies() {
        let config = DiagramConfig::default();
        assert_eq!(
            config.strategies(),
            vec![RecompositionStrategyType::DoublyPierced, RecompositionStrategyType::SinglyPierced, RecompositionStrategyType::Nested],
        );
        let config = config.with_recomposition(RecompositionStrategyType::Nested);
        assert_eq!(config.strategies(), vec![RecompositionStrategyType::Nested, RecompositionStrategyType::SinglyPierced]);
    }

    #[test]
    fn json() {
        let config: DiagramConfig = serde_json::from_str(r#"{"recomposition": "singly-pierced", "parallel": false}"#).unwrap();
        assert_eq!(config.recomposition, RecompositionStrategyType::SinglyPierced);
        assert_eq!(config.decomposition, DEFAULT_DECOMPOSITION);
        assert!(!config.parallel);
        assert!(config.use_centroid);
        assert!(!config.merge_duplicates);
        let json = serde_json::to_string(&DiagramConfig::default()).unwrap();
        assert!(json.contains(r#""fallbackStrategies":["singly-pierced","nested"]"#));
        assert!(json.contains(r#""mergeDuplicates":false"#));
    }
}
