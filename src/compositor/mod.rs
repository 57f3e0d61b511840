//! Region compositor
//!
//! Turns a caller-reported detection into a rectangle in PDF page space.
//! The origin convention and the aspect-ratio handling are selected by a
//! [`PlacementPolicy`]; everything here is pure and side-effect free.

mod placement;
mod types;

pub use placement::{compute_placement, ASPECT_TOLERANCE};
pub use types::{
    CoordinateOrigin, Detection, NativeSize, PageGeometry, ParsePolicyError, Placement,
    PlacementPolicy, PlacementRect,
};
