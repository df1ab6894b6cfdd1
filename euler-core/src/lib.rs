#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

use log::warn;

pub mod concrete;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod examples;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod recomposition;

pub use concrete::{ConcreteDiagram, ConcreteZone, DiagramCreator, DiagramView};
pub use config::DiagramConfig;
pub use decomposition::{Decomposer, DecompositionStep, DecompositionStrategyType};
pub use error::{DescriptionError, DrawError, Error};
pub use geometry::{circle::Circle, contour::Contour, r2::R2, rect::Rect};
pub use graph::DualGraph;
pub use model::{AbstractCurve, Description, Zone};
pub use recomposition::{Recomposer, RecompositionStep, RecompositionStrategyType};

/// Parse and draw `description` in a `size`×`size` box, retrying with each fallback recomposition
/// strategy in turn while drawing fails. Returns the last strategy's error if none succeed.
pub fn draw(description: &str, size: f64, config: &DiagramConfig) -> Result<ConcreteDiagram, Error> {
    let description: Description = description.parse()?;
    let mut result = DiagramCreator::new(config.clone()).create_diagram(&description, size);
    for strategy in config.strategies().into_iter().skip(1) {
        let Err(err) = &result else { break };
        warn!("Drawing {} failed: {}; retrying with {} recomposition", description, err, strategy);
        result = DiagramCreator::new(config.with_recomposition(strategy)).create_diagram(&description, size);
    }
    Ok(result?)
}

/// Parse a log level string into LevelFilter.
pub fn parse_log_level(level: Option<&str>) -> log::LevelFilter {
    match level {
        Some("error") => log::LevelFilter::Error,
        Some("warn") => log::LevelFilter::Warn,
        Some("info") | Some("") | None => log::LevelFilter::Info,
        Some("debug") => log::LevelFilter::Debug,
        Some("trace") => log::LevelFilter::Trace,
        Some(level) => panic!("invalid log level: {}", level),
    }
}
