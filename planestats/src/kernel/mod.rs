//! Plane statistics kernels.
//!
//! Every (sample format × plane count) pair has one kernel per tier:
//! - `scalar`: portable reference, defines the expected results
//! - `sse2`: 128-bit registers (16 × u8, 8 × u16, 4 × f32 lanes)
//! - `avx2`: 256-bit registers (32 × u8, 16 × u16, 8 × f32 lanes)
//!
//! Kernels take raw pointers and perform no checks. [`KernelSet`] binds one
//! tier per sample type once and exposes safe entry points over
//! [`PlaneRef`] views, which carry the geometry guarantees.

#![allow(unsafe_op_in_unsafe_fn)]

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod avx2;
#[cfg(target_arch = "x86_64")]
pub mod reduce;
#[cfg(target_arch = "x86_64")]
pub mod sse2;

#[cfg(test)]
mod tests;

use crate::common::{Error, Isa, Result, Sample};
use crate::plane::PlaneRef;

/// Single-plane kernel: `(stats, src, stride_bytes, width, height)`.
pub type SingleKernel<S> = unsafe fn(&mut <S as Sample>::Stats, *const S, isize, u32, u32);

/// Two-plane kernel: `(stats, src1, stride1_bytes, src2, stride2_bytes, width, height)`.
pub type PairKernel<S> =
    unsafe fn(&mut <S as Sample>::Stats, *const S, isize, *const S, isize, u32, u32);

// Lane indices compared against `width % lanes` to build tail masks. The
// 128-bit tier reads the first half of each table.
#[cfg(target_arch = "x86_64")]
pub(crate) static ASCEND_8: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, //
    16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
];
#[cfg(target_arch = "x86_64")]
pub(crate) static ASCEND_16: [u16; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
#[cfg(target_arch = "x86_64")]
pub(crate) static ASCEND_32: [u32; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Sample types with a kernel for every tier.
pub trait Kernels: Sample {
    fn single_kernel(isa: Isa) -> SingleKernel<Self>;
    fn pair_kernel(isa: Isa) -> PairKernel<Self>;
}

macro_rules! impl_kernels {
    ($sample:ty, $single:ident, $pair:ident) => {
        impl Kernels for $sample {
            fn single_kernel(isa: Isa) -> SingleKernel<Self> {
                match isa {
                    #[cfg(target_arch = "x86_64")]
                    Isa::Avx2 => avx2::$single,
                    #[cfg(target_arch = "x86_64")]
                    Isa::Sse2 => sse2::$single,
                    _ => scalar::$single,
                }
            }

            fn pair_kernel(isa: Isa) -> PairKernel<Self> {
                match isa {
                    #[cfg(target_arch = "x86_64")]
                    Isa::Avx2 => avx2::$pair,
                    #[cfg(target_arch = "x86_64")]
                    Isa::Sse2 => sse2::$pair,
                    _ => scalar::$pair,
                }
            }
        }
    };
}

impl_kernels!(u8, plane_stats_1_u8, plane_stats_2_u8);
impl_kernels!(u16, plane_stats_1_u16, plane_stats_2_u16);
impl_kernels!(f32, plane_stats_1_f32, plane_stats_2_f32);

/// The kernels of one tier for sample type `S`, selected once.
#[derive(Debug)]
pub struct KernelSet<S: Kernels> {
    isa: Isa,
    single: SingleKernel<S>,
    pair: PairKernel<S>,
}

impl<S: Kernels> Clone for KernelSet<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Kernels> Copy for KernelSet<S> {}

impl<S: Kernels> KernelSet<S> {
    /// Binds the kernels of `isa`. Fails if the running CPU cannot execute it.
    pub fn new(isa: Isa) -> Result<Self> {
        if !isa.is_supported() {
            return Err(Error::UnsupportedIsa(format!(
                "{} kernels requested but not supported by this CPU",
                isa
            )));
        }

        Ok(Self {
            isa,
            single: S::single_kernel(isa),
            pair: S::pair_kernel(isa),
        })
    }

    pub fn scalar() -> Self {
        Self {
            isa: Isa::Scalar,
            single: S::single_kernel(Isa::Scalar),
            pair: S::pair_kernel(Isa::Scalar),
        }
    }

    pub fn isa(&self) -> Isa {
        self.isa
    }

    /// Fills `min`, `max` and `sum` of `stats` from `plane`.
    pub fn measure(&self, stats: &mut S::Stats, plane: &PlaneRef<'_, S>) {
        // SAFETY: the tier was checked against the CPU in `new`, and
        // `PlaneRef` guarantees size, alignment and the over-read allowance.
        unsafe {
            (self.single)(
                stats,
                plane.as_ptr(),
                plane.stride() as isize,
                plane.width(),
                plane.height(),
            );
        }
    }

    /// Fills `min`, `max` and `sum` from `first` and `diff_sum` from the
    /// absolute differences between `first` and `second`.
    pub fn measure_pair(
        &self,
        stats: &mut S::Stats,
        first: &PlaneRef<'_, S>,
        second: &PlaneRef<'_, S>,
    ) -> Result<()> {
        if !first.same_size(second) {
            return Err(Error::DimensionMismatch {
                first: (first.width(), first.height()),
                second: (second.width(), second.height()),
            });
        }

        // SAFETY: as in `measure`; both views share the same geometry.
        unsafe {
            (self.pair)(
                stats,
                first.as_ptr(),
                first.stride() as isize,
                second.as_ptr(),
                second.stride() as isize,
                first.width(),
                first.height(),
            );
        }
        Ok(())
    }
}
