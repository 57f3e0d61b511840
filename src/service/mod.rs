//! Logo replacement service
//!
//! Ties the pure placement geometry to the PDF compositing strategies for
//! a single request.

mod error;
mod replacer;

pub use error::ReplaceError;
pub use replacer::{
    parse_detections, replace_logos, replace_logos_blocking, ReplaceOptions, ReplaceOutcome,
    ReplaceRequest,
};
