pub mod area;
pub mod circle;
pub mod contour;
pub mod r2;
pub mod rect;
