//! Kernel correctness tests.
//!
//! The scalar kernels define the expected results. Every vector tier must
//! match them exactly for integer samples, and up to summation order for
//! float sums.
//!
//! Test modules:
//! - `common_tests`: hand-checked planes run through every available tier
//! - `scalar_tests`: the reference kernels on their own
//! - `sse2_tests`: x86_64 128-bit kernels against the reference
//! - `avx2_tests`: x86_64 256-bit kernels against the reference

mod scalar_tests;



use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{KernelSet, Kernels};
use crate::common::{Isa, Sample};
use crate::plane::PlaneBuffer;
use crate::stats::FloatStats;

/// Test widths that exercise every tail length:
/// - 1..=8: narrower than any register
/// - 15, 16, 17: around the 128-bit byte width
/// - 31, 32, 33: around the 256-bit byte width
/// - 100, 257: several full registers plus a tail
pub const TEST_WIDTHS: [u32; 16] = [1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 32, 33, 100, 257];

pub const TEST_HEIGHTS: [u32; 3] = [1, 2, 5];

/// Byte patterns written into row padding. A kernel that lets a masked-off
/// lane through sees an extreme (0x00, 0xFF) or, for floats, NaN (0xFF).
pub const POISON: [u8; 2] = [0x00, 0xFF];

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Fills a plane from `gen` and overwrites every padding byte with `poison`.
pub fn poisoned_plane<S: Sample>(
    width: u32,
    height: u32,
    poison: u8,
    mut gen: impl FnMut() -> S,
) -> PlaneBuffer {
    let mut plane = PlaneBuffer::new(S::FORMAT, width, height).unwrap();
    plane.fill_with::<S>(|_, _| gen()).unwrap();

    let row_bytes = width as usize * size_of::<S>();
    let stride = plane.stride();
    for row in plane.bytes_mut().chunks_mut(stride) {
        row[row_bytes..].fill(poison);
    }
    plane
}

/// Samples in `1..=254`, so both byte poisons are out of range.
pub fn random_u8_plane(rng: &mut StdRng, width: u32, height: u32, poison: u8) -> PlaneBuffer {
    poisoned_plane::<u8>(width, height, poison, || rng.random_range(1..=254))
}

/// Samples in `1..=65534`, so both word poisons are out of range.
pub fn random_u16_plane(rng: &mut StdRng, width: u32, height: u32, poison: u8) -> PlaneBuffer {
    poisoned_plane::<u16>(width, height, poison, || rng.random_range(1..=65534))
}

/// Positive, non-zero samples: a zero poison would lower `min`, a NaN poison
/// would turn the sums into NaN.
pub fn random_f32_plane(rng: &mut StdRng, width: u32, height: u32, poison: u8) -> PlaneBuffer {
    poisoned_plane::<f32>(width, height, poison, || rng.random_range(0.5f32..1000.0))
}

pub fn measure<S: Kernels>(isa: Isa, plane: &PlaneBuffer) -> S::Stats {
    let kernels = KernelSet::<S>::new(isa).unwrap();
    let mut stats = S::Stats::default();
    kernels.measure(&mut stats, &plane.view::<S>().unwrap());
    stats
}

pub fn measure_pair<S: Kernels>(isa: Isa, first: &PlaneBuffer, second: &PlaneBuffer) -> S::Stats {
    let kernels = KernelSet::<S>::new(isa).unwrap();
    let mut stats = S::Stats::default();
    kernels
        .measure_pair(
            &mut stats,
            &first.view::<S>().unwrap(),
            &second.view::<S>().unwrap(),
        )
        .unwrap();
    stats
}

/// Two orderings of an `n`-term sum of non-negative terms differ by at most
/// `2 * n * eps` relative to the sum.
fn sums_close(expected: f64, actual: f64, samples: usize) -> bool {
    let bound = 2.0 * samples as f64 * f64::EPSILON * expected.abs().max(1.0);
    (expected - actual).abs() <= bound
}

/// Extrema must match exactly; sums only up to accumulation order.
pub fn assert_float_stats_close(
    expected: &FloatStats,
    actual: &FloatStats,
    samples: usize,
    context: &str,
) {
    assert_eq!(expected.min, actual.min, "min mismatch, {}", context);
    assert_eq!(expected.max, actual.max, "max mismatch, {}", context);
    assert!(
        sums_close(expected.sum, actual.sum, samples),
        "sum mismatch: expected {}, got {}, {}",
        expected.sum,
        actual.sum,
        context
    );
    assert!(
        sums_close(expected.diff_sum, actual.diff_sum, samples),
        "diff_sum mismatch: expected {}, got {}, {}",
        expected.diff_sum,
        actual.diff_sum,
        context
    );
}

/// Every geometry and poison combination, each with its own seed.
fn sweep(mut f: impl FnMut(u32, u32, u8, &mut StdRng)) {
    for &width in &TEST_WIDTHS {
        for &height in &TEST_HEIGHTS {
            for &poison in &POISON {
                let mut rng = rng(((width as u64) << 16) | ((height as u64) << 8) | poison as u64);
                f(width, height, poison, &mut rng);
            }
        }
    }
}

pub fn assert_u8_matches_scalar(isa: Isa) {
    sweep(|width, height, poison, rng| {
        let first = random_u8_plane(rng, width, height, poison);
        let second = random_u8_plane(rng, width, height, !poison);
        let context = format!("{} {}x{} poison={:#04x}", isa, width, height, poison);

        assert_eq!(
            measure::<u8>(isa, &first),
            measure::<u8>(Isa::Scalar, &first),
            "single plane, {}",
            context
        );
        assert_eq!(
            measure_pair::<u8>(isa, &first, &second),
            measure_pair::<u8>(Isa::Scalar, &first, &second),
            "plane pair, {}",
            context
        );
    });
}

pub fn assert_u16_matches_scalar(isa: Isa) {
    sweep(|width, height, poison, rng| {
        let first = random_u16_plane(rng, width, height, poison);
        let second = random_u16_plane(rng, width, height, !poison);
        let context = format!("{} {}x{} poison={:#04x}", isa, width, height, poison);

        assert_eq!(
            measure::<u16>(isa, &first),
            measure::<u16>(Isa::Scalar, &first),
            "single plane, {}",
            context
        );
        assert_eq!(
            measure_pair::<u16>(isa, &first, &second),
            measure_pair::<u16>(Isa::Scalar, &first, &second),
            "plane pair, {}",
            context
        );
    });
}

pub fn assert_f32_matches_scalar(isa: Isa) {
    sweep(|width, height, poison, rng| {
        let first = random_f32_plane(rng, width, height, poison);
        let second = random_f32_plane(rng, width, height, !poison);
        let context = format!("{} {}x{} poison={:#04x}", isa, width, height, poison);
        let samples = (width * height) as usize;

        assert_float_stats_close(
            &measure::<f32>(Isa::Scalar, &first),
            &measure::<f32>(isa, &first),
            samples,
            &format!("single plane, {}", context),
        );
        assert_float_stats_close(
            &measure_pair::<f32>(Isa::Scalar, &first, &second),
            &measure_pair::<f32>(isa, &first, &second),
            samples,
            &format!("plane pair, {}", context),
        );
    });
}
