//! Result records filled by the kernels.
//!
//! Single-plane kernels write `min`, `max` and `sum` and leave `diff_sum` as
//! the caller initialized it. Two-plane kernels write all four fields.

use serde::{Deserialize, Serialize};

/// Statistics of an 8-bit or 16-bit unsigned plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntStats {
    pub min: u32,
    pub max: u32,
    pub sum: u64,
    pub diff_sum: u64,
}

/// Statistics of a 32-bit float plane. Sums are accumulated in double
/// precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatStats {
    pub min: f32,
    pub max: f32,
    pub sum: f64,
    pub diff_sum: f64,
}

impl FloatStats {
    /// Bitwise equality, so that NaN sums compare equal to themselves.
    pub fn bit_eq(&self, other: &FloatStats) -> bool {
        self.min.to_bits() == other.min.to_bits()
            && self.max.to_bits() == other.max.to_bits()
            && self.sum.to_bits() == other.sum.to_bits()
            && self.diff_sum.to_bits() == other.diff_sum.to_bits()
    }
}
