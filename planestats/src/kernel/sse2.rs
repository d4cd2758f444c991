//! 128-bit kernels.
//!
//! Each row is walked in full registers (16 × u8, 8 × u16, 4 × f32), then one
//! masked load covers the remaining `width % lanes` samples. Masked-off lanes
//! are forced to values that cannot win a comparison and add nothing to a sum.
//!
//! SSE2 has no unsigned 16-bit min/max, so u16 samples are biased by
//! `i16::MIN` into signed range for the comparisons and unbiased at the end.
//! Word sums go through `sad_epu8` as separate low-byte and high-byte partials.
//!
//! Float min/max keep the accumulator as the second operand: `minps`/`maxps`
//! return it whenever the sample is NaN.

use std::arch::x86_64::*;

use super::reduce::*;
use super::{ASCEND_16, ASCEND_32, ASCEND_8};
use crate::stats::{FloatStats, IntStats};

/// Adds the words of `v` into 64-bit partial sums of their low and high bytes.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn add_words(lo: &mut __m128i, hi: &mut __m128i, v: __m128i) {
    let zero = _mm_setzero_si128();
    let low_bytes = _mm_set1_epi16(0x00FF);
    *lo = _mm_add_epi64(*lo, _mm_sad_epu8(_mm_and_si128(low_bytes, v), zero));
    *hi = _mm_add_epi64(*hi, _mm_sad_epu8(_mm_andnot_si128(low_bytes, v), zero));
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn abs_diff_epu16(a: __m128i, b: __m128i) -> __m128i {
    _mm_or_si128(_mm_subs_epu16(a, b), _mm_subs_epu16(b, a))
}

/// Widens the four floats of `v` to double and adds them to `acc`.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn add_widened(acc: __m128d, v: __m128) -> __m128d {
    let acc = _mm_add_pd(acc, _mm_cvtps_pd(v));
    _mm_add_pd(acc, _mm_cvtps_pd(_mm_movehl_ps(v, v)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn abs_ps(v: __m128) -> __m128 {
    _mm_and_ps(_mm_castsi128_ps(_mm_set1_epi32(0x7FFF_FFFF)), v)
}

/// All-ones in the first `width % 16` byte lanes.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn tail_mask_epi8(width: usize) -> __m128i {
    let ascend = _mm_loadu_si128(ASCEND_8.as_ptr() as *const __m128i);
    _mm_cmplt_epi8(ascend, _mm_set1_epi8((width % 16) as i8))
}

/// All-ones in the first `width % 8` word lanes.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn tail_mask_epi16(width: usize) -> __m128i {
    let ascend = _mm_loadu_si128(ASCEND_16.as_ptr() as *const __m128i);
    _mm_cmplt_epi16(ascend, _mm_set1_epi16((width % 8) as i16))
}

/// All-ones in the first `width % 4` float lanes.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn tail_mask_ps(width: usize) -> __m128 {
    let ascend = _mm_loadu_si128(ASCEND_32.as_ptr() as *const __m128i);
    _mm_castsi128_ps(_mm_cmplt_epi32(ascend, _mm_set1_epi32((width % 4) as i32)))
}

/// # Safety
/// Requires SSE2. Each row must stay readable up to the next 16-byte
/// multiple past its last sample.
#[target_feature(enable = "sse2")]
pub unsafe fn plane_stats_1_u8(
    stats: &mut IntStats,
    src: *const u8,
    stride: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !15;
    let zero = _mm_setzero_si128();
    let mask = tail_mask_epi8(width);
    let ones = _mm_andnot_si128(mask, _mm_set1_epi8(-1));

    let mut mmin = _mm_set1_epi8(-1);
    let mut mmax = zero;
    let mut msum = zero;

    let mut row = src;
    for _ in 0..height {
        for x in (0..tail).step_by(16) {
            let v = _mm_loadu_si128(row.add(x) as *const __m128i);
            mmin = _mm_min_epu8(mmin, v);
            mmax = _mm_max_epu8(mmax, v);
            msum = _mm_add_epi64(msum, _mm_sad_epu8(v, zero));
        }

        if tail != width {
            let v = _mm_and_si128(_mm_loadu_si128(row.add(tail) as *const __m128i), mask);
            mmin = _mm_min_epu8(mmin, _mm_or_si128(v, ones));
            mmax = _mm_max_epu8(mmax, v);
            msum = _mm_add_epi64(msum, _mm_sad_epu8(v, zero));
        }

        row = row.wrapping_byte_offset(stride);
    }

    stats.min = horizontal_min_u8(mmin);
    stats.max = horizontal_max_u8(mmax);
    stats.sum = horizontal_sum_u64(msum);
}

/// # Safety
/// Requires SSE2. Each row must stay readable up to the next 16-byte
/// multiple past its last sample.
#[target_feature(enable = "sse2")]
pub unsafe fn plane_stats_1_u16(
    stats: &mut IntStats,
    src: *const u16,
    stride: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !7;
    let bias = _mm_set1_epi16(i16::MIN);
    let mask = tail_mask_epi16(width);
    let ones = _mm_andnot_si128(mask, _mm_set1_epi16(-1));

    let mut mmin = _mm_set1_epi16(i16::MAX);
    let mut mmax = _mm_set1_epi16(i16::MIN);
    let mut msum_lo = _mm_setzero_si128();
    let mut msum_hi = _mm_setzero_si128();

    let mut row = src;
    for _ in 0..height {
        for x in (0..tail).step_by(8) {
            let v = _mm_loadu_si128(row.add(x) as *const __m128i);
            let biased = _mm_add_epi16(v, bias);
            mmin = _mm_min_epi16(mmin, biased);
            mmax = _mm_max_epi16(mmax, biased);
            add_words(&mut msum_lo, &mut msum_hi, v);
        }

        if tail != width {
            let v = _mm_and_si128(_mm_loadu_si128(row.add(tail) as *const __m128i), mask);
            mmin = _mm_min_epi16(mmin, _mm_add_epi16(_mm_or_si128(v, ones), bias));
            mmax = _mm_max_epi16(mmax, _mm_add_epi16(v, bias));
            add_words(&mut msum_lo, &mut msum_hi, v);
        }

        row = row.wrapping_byte_offset(stride);
    }

    stats.min = (horizontal_min_i16(mmin) - i16::MIN as i32) as u32;
    stats.max = (horizontal_max_i16(mmax) - i16::MIN as i32) as u32;
    stats.sum = horizontal_sum_byte_split(msum_lo, msum_hi);
}

/// # Safety
/// Requires SSE2. Each row must stay readable up to the next 16-byte
/// multiple past its last sample.
#[target_feature(enable = "sse2")]
pub unsafe fn plane_stats_1_f32(
    stats: &mut FloatStats,
    src: *const f32,
    stride: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !3;
    let mask = tail_mask_ps(width);
    let posmask = _mm_andnot_ps(mask, _mm_set1_ps(f32::INFINITY));
    let negmask = _mm_andnot_ps(mask, _mm_set1_ps(f32::NEG_INFINITY));

    let mut fmin = _mm_set1_ps(f32::INFINITY);
    let mut fmax = _mm_set1_ps(f32::NEG_INFINITY);
    let mut dsum = _mm_setzero_pd();

    let mut row = src;
    for _ in 0..height {
        for x in (0..tail).step_by(4) {
            let v = _mm_loadu_ps(row.add(x));
            fmin = _mm_min_ps(v, fmin);
            fmax = _mm_max_ps(v, fmax);
            dsum = add_widened(dsum, v);
        }

        if tail != width {
            let v = _mm_and_ps(_mm_loadu_ps(row.add(tail)), mask);
            fmin = _mm_min_ps(_mm_or_ps(v, posmask), fmin);
            fmax = _mm_max_ps(_mm_or_ps(v, negmask), fmax);
            dsum = add_widened(dsum, v);
        }

        row = row.wrapping_byte_offset(stride);
    }

    stats.min = horizontal_min_f32(fmin);
    stats.max = horizontal_max_f32(fmax);
    stats.sum = horizontal_sum_f64(dsum);
}

/// # Safety
/// Requires SSE2. Each row of both planes must stay readable up to the next
/// 16-byte multiple past its last sample.
#[target_feature(enable = "sse2")]
pub unsafe fn plane_stats_2_u8(
    stats: &mut IntStats,
    src1: *const u8,
    stride1: isize,
    src2: *const u8,
    stride2: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !15;
    let zero = _mm_setzero_si128();
    let mask = tail_mask_epi8(width);
    let ones = _mm_andnot_si128(mask, _mm_set1_epi8(-1));

    let mut mmin = _mm_set1_epi8(-1);
    let mut mmax = zero;
    let mut msum = zero;
    let mut mdiff = zero;

    let mut row1 = src1;
    let mut row2 = src2;
    for _ in 0..height {
        for x in (0..tail).step_by(16) {
            let v1 = _mm_loadu_si128(row1.add(x) as *const __m128i);
            let v2 = _mm_loadu_si128(row2.add(x) as *const __m128i);
            mmin = _mm_min_epu8(mmin, v1);
            mmax = _mm_max_epu8(mmax, v1);
            msum = _mm_add_epi64(msum, _mm_sad_epu8(v1, zero));
            mdiff = _mm_add_epi64(mdiff, _mm_sad_epu8(v1, v2));
        }

        if tail != width {
            let v1 = _mm_and_si128(_mm_loadu_si128(row1.add(tail) as *const __m128i), mask);
            let v2 = _mm_and_si128(_mm_loadu_si128(row2.add(tail) as *const __m128i), mask);
            mmin = _mm_min_epu8(mmin, _mm_or_si128(v1, ones));
            mmax = _mm_max_epu8(mmax, v1);
            msum = _mm_add_epi64(msum, _mm_sad_epu8(v1, zero));
            mdiff = _mm_add_epi64(mdiff, _mm_sad_epu8(v1, v2));
        }

        row1 = row1.wrapping_byte_offset(stride1);
        row2 = row2.wrapping_byte_offset(stride2);
    }

    stats.min = horizontal_min_u8(mmin);
    stats.max = horizontal_max_u8(mmax);
    stats.sum = horizontal_sum_u64(msum);
    stats.diff_sum = horizontal_sum_u64(mdiff);
}

/// # Safety
/// Requires SSE2. Each row of both planes must stay readable up to the next
/// 16-byte multiple past its last sample.
#[target_feature(enable = "sse2")]
pub unsafe fn plane_stats_2_u16(
    stats: &mut IntStats,
    src1: *const u16,
    stride1: isize,
    src2: *const u16,
    stride2: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !7;
    let bias = _mm_set1_epi16(i16::MIN);
    let mask = tail_mask_epi16(width);
    let ones = _mm_andnot_si128(mask, _mm_set1_epi16(-1));

    let mut mmin = _mm_set1_epi16(i16::MAX);
    let mut mmax = _mm_set1_epi16(i16::MIN);
    let mut msum_lo = _mm_setzero_si128();
    let mut msum_hi = _mm_setzero_si128();
    let mut mdiff_lo = _mm_setzero_si128();
    let mut mdiff_hi = _mm_setzero_si128();

    let mut row1 = src1;
    let mut row2 = src2;
    for _ in 0..height {
        for x in (0..tail).step_by(8) {
            let v1 = _mm_loadu_si128(row1.add(x) as *const __m128i);
            let v2 = _mm_loadu_si128(row2.add(x) as *const __m128i);
            let biased = _mm_add_epi16(v1, bias);
            mmin = _mm_min_epi16(mmin, biased);
            mmax = _mm_max_epi16(mmax, biased);
            add_words(&mut msum_lo, &mut msum_hi, v1);
            add_words(&mut mdiff_lo, &mut mdiff_hi, abs_diff_epu16(v1, v2));
        }

        if tail != width {
            let v1 = _mm_and_si128(_mm_loadu_si128(row1.add(tail) as *const __m128i), mask);
            let v2 = _mm_and_si128(_mm_loadu_si128(row2.add(tail) as *const __m128i), mask);
            mmin = _mm_min_epi16(mmin, _mm_add_epi16(_mm_or_si128(v1, ones), bias));
            mmax = _mm_max_epi16(mmax, _mm_add_epi16(v1, bias));
            add_words(&mut msum_lo, &mut msum_hi, v1);
            add_words(&mut mdiff_lo, &mut mdiff_hi, abs_diff_epu16(v1, v2));
        }

        row1 = row1.wrapping_byte_offset(stride1);
        row2 = row2.wrapping_byte_offset(stride2);
    }

    stats.min = (horizontal_min_i16(mmin) - i16::MIN as i32) as u32;
    stats.max = (horizontal_max_i16(mmax) - i16::MIN as i32) as u32;
    stats.sum = horizontal_sum_byte_split(msum_lo, msum_hi);
    stats.diff_sum = horizontal_sum_byte_split(mdiff_lo, mdiff_hi);
}

/// # Safety
/// Requires SSE2. Each row of both planes must stay readable up to the next
/// 16-byte multiple past its last sample.
#[target_feature(enable = "sse2")]
pub unsafe fn plane_stats_2_f32(
    stats: &mut FloatStats,
    src1: *const f32,
    stride1: isize,
    src2: *const f32,
    stride2: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !3;
    let mask = tail_mask_ps(width);
    let posmask = _mm_andnot_ps(mask, _mm_set1_ps(f32::INFINITY));
    let negmask = _mm_andnot_ps(mask, _mm_set1_ps(f32::NEG_INFINITY));

    let mut fmin = _mm_set1_ps(f32::INFINITY);
    let mut fmax = _mm_set1_ps(f32::NEG_INFINITY);
    let mut dsum = _mm_setzero_pd();
    let mut ddiff = _mm_setzero_pd();

    let mut row1 = src1;
    let mut row2 = src2;
    for _ in 0..height {
        for x in (0..tail).step_by(4) {
            let v1 = _mm_loadu_ps(row1.add(x));
            let v2 = _mm_loadu_ps(row2.add(x));
            fmin = _mm_min_ps(v1, fmin);
            fmax = _mm_max_ps(v1, fmax);
            dsum = add_widened(dsum, v1);
            ddiff = add_widened(ddiff, abs_ps(_mm_sub_ps(v1, v2)));
        }

        if tail != width {
            let v1 = _mm_and_ps(_mm_loadu_ps(row1.add(tail)), mask);
            let v2 = _mm_and_ps(_mm_loadu_ps(row2.add(tail)), mask);
            fmin = _mm_min_ps(_mm_or_ps(v1, posmask), fmin);
            fmax = _mm_max_ps(_mm_or_ps(v1, negmask), fmax);
            dsum = add_widened(dsum, v1);
            ddiff = add_widened(ddiff, abs_ps(_mm_sub_ps(v1, v2)));
        }

        row1 = row1.wrapping_byte_offset(stride1);
        row2 = row2.wrapping_byte_offset(stride2);
    }

    stats.min = horizontal_min_f32(fmin);
    stats.max = horizontal_max_f32(fmax);
    stats.sum = horizontal_sum_f64(dsum);
    stats.diff_sum = horizontal_sum_f64(ddiff);
}
