//! Placement types
//!
//! Geometry inputs and outputs of the region compositor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One caller-reported region marking a logo to replace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Page number (1-indexed); values outside the document fail at lookup
    pub page: i64,
    pub x: f64,
    pub y: f64,
    /// Falls back to the replacement image's pixel width when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Falls back to the replacement image's pixel height when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Page extent in PDF user-space units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    /// Lower-left corner of the MediaBox
    pub origin_x: f64,
    pub origin_y: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    /// Build from a `[llx lly urx ury]` box, tolerating swapped corners
    pub fn from_box(bounds: [f64; 4]) -> Self {
        let [ax, ay, bx, by] = bounds;
        Self {
            width: (bx - ax).abs(),
            height: (by - ay).abs(),
            origin_x: ax.min(bx),
            origin_y: ay.min(by),
        }
    }
}

/// Pixel dimensions of the decoded replacement image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSize {
    pub width: u32,
    pub height: u32,
}

impl NativeSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Target rectangle in bottom-left-origin page space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PlacementRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Same rectangle with `x0 <= x1` and `y0 <= y1`
    pub fn normalized(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    /// True unless `x0 < x1` and `y0 < y1` with every coordinate and both
    /// extents finite. Inverted, NaN and overflowing rectangles count as empty.
    pub fn is_empty(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        let finite = [self.x0, self.y0, self.x1, self.y1, w, h]
            .iter()
            .all(|v| v.is_finite());
        !(finite && w > 0.0 && h > 0.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    /// Area shared with `other`, zero when they do not overlap
    pub fn intersection_area(&self, other: &PlacementRect) -> f64 {
        let a = self.normalized();
        let b = other.normalized();
        let w = a.x1.min(b.x1) - a.x0.max(b.x0);
        let h = a.y1.min(b.y1) - a.y0.max(b.y0);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }
}

impl fmt::Display for PlacementRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1}, {:.1})",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

/// Which page edge the caller's y-coordinate is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateOrigin {
    TopLeft,
    BottomLeft,
}

/// Origin convention and aspect-ratio policy for incoming detections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// y measured from the top edge; height re-derived from the logo's aspect
    #[default]
    TopLeftPreserveAspect,
    /// y measured from the bottom edge; height re-derived from the logo's aspect
    BottomLeftPreserveAspect,
    /// y measured from the bottom edge; image stretched to the exact box
    BottomLeftExact,
}

impl PlacementPolicy {
    pub const ALL: [PlacementPolicy; 3] = [
        PlacementPolicy::TopLeftPreserveAspect,
        PlacementPolicy::BottomLeftPreserveAspect,
        PlacementPolicy::BottomLeftExact,
    ];

    pub fn origin(&self) -> CoordinateOrigin {
        match self {
            Self::TopLeftPreserveAspect => CoordinateOrigin::TopLeft,
            Self::BottomLeftPreserveAspect | Self::BottomLeftExact => CoordinateOrigin::BottomLeft,
        }
    }

    pub fn preserves_aspect(&self) -> bool {
        !self.exact_fit()
    }

    /// Whether the compositing primitive should stretch to fill the rectangle
    pub fn exact_fit(&self) -> bool {
        matches!(self, Self::BottomLeftExact)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeftPreserveAspect => "top_left_preserve_aspect",
            Self::BottomLeftPreserveAspect => "bottom_left_preserve_aspect",
            Self::BottomLeftExact => "bottom_left_exact",
        }
    }
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown placement policy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown placement policy '{0}' (expected one of: top_left_preserve_aspect, bottom_left_preserve_aspect, bottom_left_exact)")]
pub struct ParsePolicyError(pub String);

impl FromStr for PlacementPolicy {
    type Err = ParsePolicyError;

    /// Accepts `top_left_preserve_aspect`, `TOP_LEFT_PRESERVE_ASPECT`,
    /// `top-left-preserve-aspect` and so on
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == normalized)
            .ok_or_else(|| ParsePolicyError(s.to_string()))
    }
}

/// Result of placing one detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub rect: PlacementRect,
    /// Stretch to fill `rect` instead of fitting within it
    pub exact_fit: bool,
    /// Height was re-derived from the replacement image's aspect ratio
    pub aspect_adjusted: bool,
}
