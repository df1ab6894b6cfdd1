//! Reduce a description to nothing, one curve (label) at a time.

pub mod decomposer;
pub mod step;
pub mod strategy;

pub use decomposer::Decomposer;
pub use step::DecompositionStep;
pub use strategy::DecompositionStrategyType;
