//! Rebuild a description curve by curve, grouping the zones each curve splits into clusters.

pub mod data;
pub mod recomposer;
pub mod step;
pub mod strategy;

pub use data::{Cluster, PiercingKind, RecompositionData};
pub use recomposer::Recomposer;
pub use step::RecompositionStep;
pub use strategy::{RecompositionStrategyType, RECOMPOSITION_STRATEGIES};
