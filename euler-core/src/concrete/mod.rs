//! Concrete (geometric) diagrams: contours placed by [`DiagramCreator`] and the zones they induce.

pub mod creator;
pub mod diagram;
pub mod view;
pub mod visual_center;
pub mod zone;

pub use creator::DiagramCreator;
pub use diagram::ConcreteDiagram;
pub use view::{DiagramView, ZoneView};
pub use zone::ConcreteZone;

#[cfg(test)]
mod tests;
