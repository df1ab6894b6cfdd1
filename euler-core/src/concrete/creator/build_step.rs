use std::collections::BTreeMap;

use log::trace;

use crate::{model::AbstractCurve, recomposition::{RecompositionData, RecompositionStep}};

/// Contours placed in one pass. More than one entry means a symmetric batch: same-label
/// additions nested in one zone, or piercing one zone pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildStep {
    pub data: Vec<RecompositionData>,
}

impl BuildStep {
    pub fn head(&self) -> &RecompositionData {
        &self.data[0]
    }

    pub fn is_batch(&self) -> bool {
        self.data.len() > 1
    }
}

/// One build step per recomposition cluster, with later nested (resp. single-piercing) additions
/// merged into the earliest one splitting the same zone (resp. zone pair) whose curve has an equal
/// score.
///
/// Panics if a curve has no positive score.
pub fn build_steps(r_steps: &[RecompositionStep], scores: &BTreeMap<AbstractCurve, f64>) -> Vec<BuildStep> {
    let data: Vec<&RecompositionData> = r_steps.iter().flat_map(|s| s.data.iter()).collect();
    let mut taken = vec![false; data.len()];
    let mut steps = vec![];
    for i in 0..data.len() {
        if taken[i] {
            continue;
        }
        taken[i] = true;
        let head = data[i];
        let mut step = BuildStep { data: vec![head.clone()] };
        if head.is_nested() || head.is_single_piercing() {
            for j in i + 1..data.len() {
                if !taken[j] && matches(head, data[j], scores) {
                    trace!("Merging {} into build step of {}", data[j].added_curve, head.added_curve);
                    taken[j] = true;
                    step.data.push(data[j].clone());
                }
            }
        }
        steps.push(step);
    }
    steps
}

fn matches(head: &RecompositionData, other: &RecompositionData, scores: &BTreeMap<AbstractCurve, f64>) -> bool {
    let same_zones = if head.is_nested() {
        other.is_nested() && head.split_zones[0] == other.split_zones[0]
    } else {
        let (z1, z2) = (&head.split_zones[0], &head.split_zones[1]);
        other.is_single_piercing()
            && ((z1 == &other.split_zones[0] && z2 == &other.split_zones[1])
                || (z1 == &other.split_zones[1] && z2 == &other.split_zones[0]))
    };
    if !same_zones {
        return false;
    }
    let s1 = score(head, scores);
    let s2 = score(other, scores);
    s1 == s2
}

fn score(rd: &RecompositionData, scores: &BTreeMap<AbstractCurve, f64>) -> f64 {
    match scores.get(&rd.added_curve) {
        Some(&score) if score > 0. => score,
        _ => panic!("Curve {} must have a positive score", rd.added_curve),
    }
}
