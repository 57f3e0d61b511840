//! Detection → placement rectangle conversion

use super::types::{
    CoordinateOrigin, Detection, NativeSize, PageGeometry, Placement, PlacementPolicy,
    PlacementRect,
};

/// Largest aspect-ratio difference tolerated before the height is re-derived
pub const ASPECT_TOLERANCE: f64 = 0.1;

/// Compute where the replacement image goes for one detection.
///
/// Width is authoritative under the aspect-preserving policies: when the
/// requested box and the logo disagree by more than [`ASPECT_TOLERANCE`],
/// the height is recomputed from the width. This is a coarse heuristic,
/// not a true fit. The x/y coordinates are not checked against the page.
pub fn compute_placement(
    page: &PageGeometry,
    detection: &Detection,
    native: NativeSize,
    policy: PlacementPolicy,
) -> Placement {
    let width = detection.width.unwrap_or_else(|| f64::from(native.width));
    let mut height = detection.height.unwrap_or_else(|| f64::from(native.height));

    let mut aspect_adjusted = false;
    if policy.preserves_aspect() {
        if let Some(adjusted) = aspect_corrected_height(width, height, native) {
            height = adjusted;
            aspect_adjusted = true;
        }
    }

    let (x, y) = (detection.x, detection.y);
    let rect = match policy.origin() {
        CoordinateOrigin::TopLeft => {
            PlacementRect::new(x, page.height - y - height, x + width, page.height - y)
        }
        CoordinateOrigin::BottomLeft => PlacementRect::new(x, y, x + width, y + height),
    };

    Placement {
        rect,
        exact_fit: policy.exact_fit(),
        aspect_adjusted,
    }
}

/// New height when the requested box strays from the logo's aspect ratio.
///
/// Returns `None` for a non-positive height so the ratio is never taken.
fn aspect_corrected_height(width: f64, height: f64, native: NativeSize) -> Option<f64> {
    if height <= 0.0 {
        return None;
    }

    let logo_aspect = native.aspect();
    let target_aspect = width / height;

    if (logo_aspect - target_aspect).abs() > ASPECT_TOLERANCE {
        Some(width / logo_aspect)
    } else {
        None
    }
}
