use log::{debug, warn};

use crate::model::Description;

use super::{step::DecompositionStep, strategy::DecompositionStrategyType};

pub struct Decomposer {
    pub strategy: DecompositionStrategyType,
}

impl Decomposer {
    pub fn new(strategy: DecompositionStrategyType) -> Self {
        Decomposer { strategy }
    }

    /// Remove curves until none remain. Each step removes one label, so a well-formed description
    /// yields one step per distinct label.
    pub fn decompose(&self, description: &Description) -> Vec<DecompositionStep> {
        debug!("Begin decomposition ({}): {}", self.strategy, description);
        let mut steps: Vec<DecompositionStep> = vec![];
        let mut current = description.clone();
        loop {
            let to_remove = self.strategy.curves_to_remove(&current);
            if to_remove.is_empty() {
                break;
            }
            let num_steps = steps.len();
            for curve in to_remove {
                if !current.includes_label(curve.label) {
                    continue;
                }
                let step = DecompositionStep::take(&current, &curve);
                debug!("  removed {}: {} -> {}", step.removed, step.from, step.to);
                current = step.to.clone();
                steps.push(step);
            }
            if steps.len() == num_steps {
                warn!("Decomposition stalled at {}: strategy {} removed no curves", current, self.strategy);
                break;
            }
        }
        debug!("End decomposition: {} steps", steps.len());
        steps
    }
}
