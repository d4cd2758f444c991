//! Scalar reference kernels.
//!
//! Row-major walk, stride applied once per row. Integer extrema are seeded
//! with `u32::MAX`/`0`, float extrema with `+inf`/`-inf`. NaN samples fail
//! both comparisons and never replace an extremum.

use crate::stats::{FloatStats, IntStats};

/// Row `y` of a plane as a slice of `width` samples.
///
/// # Safety
/// `src + y * stride` must point to `width` readable, aligned samples.
#[inline]
unsafe fn row<'a, S>(src: *const S, stride: isize, y: u32, width: u32) -> &'a [S] {
    let ptr = (src as *const u8).wrapping_offset(y as isize * stride) as *const S;
    std::slice::from_raw_parts(ptr, width as usize)
}

#[inline]
unsafe fn int_stats_1<S: Copy + Into<u32>>(
    stats: &mut IntStats,
    src: *const S,
    stride: isize,
    width: u32,
    height: u32,
) {
    let mut min = u32::MAX;
    let mut max = 0u32;
    let mut sum = 0u64;

    for y in 0..height {
        for &v in row(src, stride, y, width) {
            let v: u32 = v.into();
            min = min.min(v);
            max = max.max(v);
            sum += v as u64;
        }
    }

    stats.min = min;
    stats.max = max;
    stats.sum = sum;
}

#[inline]
#[allow(clippy::too_many_arguments)]
unsafe fn int_stats_2<S: Copy + Into<u32>>(
    stats: &mut IntStats,
    src1: *const S,
    stride1: isize,
    src2: *const S,
    stride2: isize,
    width: u32,
    height: u32,
) {
    let mut min = u32::MAX;
    let mut max = 0u32;
    let mut sum = 0u64;
    let mut diff_sum = 0u64;

    for y in 0..height {
        let row1 = row(src1, stride1, y, width);
        let row2 = row(src2, stride2, y, width);
        for (&v, &t) in row1.iter().zip(row2) {
            let v: u32 = v.into();
            let t: u32 = t.into();
            min = min.min(v);
            max = max.max(v);
            sum += v as u64;
            diff_sum += v.abs_diff(t) as u64;
        }
    }

    stats.min = min;
    stats.max = max;
    stats.sum = sum;
    stats.diff_sum = diff_sum;
}

/// # Safety
/// Buffers must hold `height` rows of `width` aligned samples, `stride` bytes apart.
pub unsafe fn plane_stats_1_u8(
    stats: &mut IntStats,
    src: *const u8,
    stride: isize,
    width: u32,
    height: u32,
) {
    int_stats_1(stats, src, stride, width, height);
}

/// # Safety
/// Buffers must hold `height` rows of `width` aligned samples, `stride` bytes apart.
pub unsafe fn plane_stats_1_u16(
    stats: &mut IntStats,
    src: *const u16,
    stride: isize,
    width: u32,
    height: u32,
) {
    int_stats_1(stats, src, stride, width, height);
}

/// # Safety
/// Buffers must hold `height` rows of `width` aligned samples, `stride` bytes apart.
pub unsafe fn plane_stats_1_f32(
    stats: &mut FloatStats,
    src: *const f32,
    stride: isize,
    width: u32,
    height: u32,
) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0f64;

    for y in 0..height {
        for &v in row(src, stride, y, width) {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
            sum += v as f64;
        }
    }

    stats.min = min;
    stats.max = max;
    stats.sum = sum;
}

/// # Safety
/// Buffers must hold `height` rows of `width` aligned samples, `stride` bytes apart.
pub unsafe fn plane_stats_2_u8(
    stats: &mut IntStats,
    src1: *const u8,
    stride1: isize,
    src2: *const u8,
    stride2: isize,
    width: u32,
    height: u32,
) {
    int_stats_2(stats, src1, stride1, src2, stride2, width, height);
}

/// # Safety
/// Buffers must hold `height` rows of `width` aligned samples, `stride` bytes apart.
pub unsafe fn plane_stats_2_u16(
    stats: &mut IntStats,
    src1: *const u16,
    stride1: isize,
    src2: *const u16,
    stride2: isize,
    width: u32,
    height: u32,
) {
    int_stats_2(stats, src1, stride1, src2, stride2, width, height);
}

/// # Safety
/// Buffers must hold `height` rows of `width` aligned samples, `stride` bytes apart.
pub unsafe fn plane_stats_2_f32(
    stats: &mut FloatStats,
    src1: *const f32,
    stride1: isize,
    src2: *const f32,
    stride2: isize,
    width: u32,
    height: u32,
) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0f64;
    let mut diff_sum = 0f64;

    for y in 0..height {
        let row1 = row(src1, stride1, y, width);
        let row2 = row(src2, stride2, y, width);
        for (&v, &t) in row1.iter().zip(row2) {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
            sum += v as f64;
            diff_sum += (v - t).abs() as f64;
        }
    }

    stats.min = min;
    stats.max = max;
    stats.sum = sum;
    stats.diff_sum = diff_sum;
}
