//! Current transformation matrix tracking for content-stream walks

use lopdf::Object;

use super::document::number;
use crate::compositor::PlacementRect;

/// Affine transform `[a b c d e f]`, in the operand order of `cm`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform([f64; 6]);

impl Transform {
    pub const IDENTITY: Transform = Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn new(values: [f64; 6]) -> Self {
        Self(values)
    }

    /// Parse the six operands of a `cm` operator
    pub fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() != 6 {
            return None;
        }
        let mut values = [0.0; 6];
        for (slot, operand) in values.iter_mut().zip(operands) {
            *slot = number(operand)?;
        }
        Some(Self(values))
    }

    /// CTM after `inner cm` runs under `self`; `inner` maps first
    pub fn then_inner(self, inner: Transform) -> Transform {
        let [a, b, c, d, e, f] = self.0;
        let [ia, ib, ic, id, ie, if_] = inner.0;
        Transform([
            ia * a + ib * c,
            ia * b + ib * d,
            ic * a + id * c,
            ic * b + id * d,
            ie * a + if_ * c + e,
            ie * b + if_ * d + f,
        ])
    }

    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Bounding box of the unit square under this transform, which is where
    /// an image XObject lands when painted with `Do`
    pub fn unit_square_bounds(self) -> PlacementRect {
        let corners =
            [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)].map(|(x, y)| self.apply(x, y));
        let (xs, ys): (Vec<f64>, Vec<f64>) = corners.into_iter().unzip();
        PlacementRect::new(
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    }
}
