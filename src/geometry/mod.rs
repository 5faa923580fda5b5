//! Geometry kernel: segment intersection, footprints and polar vectors

pub mod footprint;
pub mod segment;
pub mod vector;

pub use footprint::{EdgeAxis, Footprint};
pub use segment::{intersect, orientation, Orientation, Segment};
pub use vector::{DriftingVector, OriginVector, Vector};
