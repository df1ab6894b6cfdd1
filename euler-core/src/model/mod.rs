//! Abstract description of a set system: curves, zones, and the descriptions combining them.

pub mod curve;
pub mod description;
pub mod zone;

pub use curve::AbstractCurve;
pub use description::Description;
pub use zone::Zone;
