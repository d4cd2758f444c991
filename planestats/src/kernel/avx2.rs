//! 256-bit kernels.
//!
//! Same row walk and tail masking as the 128-bit tier with twice the lanes
//! (32 × u8, 16 × u16, 8 × f32). AVX2 has unsigned 16-bit min/max, so u16
//! extrema need no bias.

use std::arch::x86_64::*;

use super::reduce::*;
use super::{ASCEND_16, ASCEND_32, ASCEND_8};
use crate::stats::{FloatStats, IntStats};

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn add_words(lo: &mut __m256i, hi: &mut __m256i, v: __m256i) {
    let zero = _mm256_setzero_si256();
    let low_bytes = _mm256_set1_epi16(0x00FF);
    *lo = _mm256_add_epi64(*lo, _mm256_sad_epu8(_mm256_and_si256(low_bytes, v), zero));
    *hi = _mm256_add_epi64(*hi, _mm256_sad_epu8(_mm256_andnot_si256(low_bytes, v), zero));
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn abs_diff_epu16(a: __m256i, b: __m256i) -> __m256i {
    _mm256_or_si256(_mm256_subs_epu16(a, b), _mm256_subs_epu16(b, a))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn add_widened(acc: __m256d, v: __m256) -> __m256d {
    let acc = _mm256_add_pd(acc, _mm256_cvtps_pd(_mm256_castps256_ps128(v)));
    _mm256_add_pd(acc, _mm256_cvtps_pd(_mm256_extractf128_ps::<1>(v)))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn abs_ps(v: __m256) -> __m256 {
    _mm256_and_ps(_mm256_castsi256_ps(_mm256_set1_epi32(0x7FFF_FFFF)), v)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn tail_mask_epi8(width: usize) -> __m256i {
    let ascend = _mm256_loadu_si256(ASCEND_8.as_ptr() as *const __m256i);
    _mm256_cmpgt_epi8(_mm256_set1_epi8((width % 32) as i8), ascend)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn tail_mask_epi16(width: usize) -> __m256i {
    let ascend = _mm256_loadu_si256(ASCEND_16.as_ptr() as *const __m256i);
    _mm256_cmpgt_epi16(_mm256_set1_epi16((width % 16) as i16), ascend)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn tail_mask_ps(width: usize) -> __m256 {
    let ascend = _mm256_loadu_si256(ASCEND_32.as_ptr() as *const __m256i);
    _mm256_castsi256_ps(_mm256_cmpgt_epi32(
        _mm256_set1_epi32((width % 8) as i32),
        ascend,
    ))
}

/// # Safety
/// Requires AVX2. Each row must stay readable up to the next 32-byte
/// multiple past its last sample.
#[target_feature(enable = "avx2")]
pub unsafe fn plane_stats_1_u8(
    stats: &mut IntStats,
    src: *const u8,
    stride: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !31;
    let zero = _mm256_setzero_si256();
    let mask = tail_mask_epi8(width);
    let ones = _mm256_andnot_si256(mask, _mm256_set1_epi8(-1));

    let mut mmin = _mm256_set1_epi8(-1);
    let mut mmax = zero;
    let mut msum = zero;

    let mut row = src;
    for _ in 0..height {
        for x in (0..tail).step_by(32) {
            let v = _mm256_loadu_si256(row.add(x) as *const __m256i);
            mmin = _mm256_min_epu8(mmin, v);
            mmax = _mm256_max_epu8(mmax, v);
            msum = _mm256_add_epi64(msum, _mm256_sad_epu8(v, zero));
        }

        if tail != width {
            let v = _mm256_and_si256(_mm256_loadu_si256(row.add(tail) as *const __m256i), mask);
            mmin = _mm256_min_epu8(mmin, _mm256_or_si256(v, ones));
            mmax = _mm256_max_epu8(mmax, v);
            msum = _mm256_add_epi64(msum, _mm256_sad_epu8(v, zero));
        }

        row = row.wrapping_byte_offset(stride);
    }

    stats.min = horizontal_min_u8_256(mmin);
    stats.max = horizontal_max_u8_256(mmax);
    stats.sum = horizontal_sum_u64_256(msum);
}

/// # Safety
/// Requires AVX2. Each row must stay readable up to the next 32-byte
/// multiple past its last sample.
#[target_feature(enable = "avx2")]
pub unsafe fn plane_stats_1_u16(
    stats: &mut IntStats,
    src: *const u16,
    stride: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !15;
    let zero = _mm256_setzero_si256();
    let mask = tail_mask_epi16(width);
    let ones = _mm256_andnot_si256(mask, _mm256_set1_epi16(-1));

    let mut mmin = _mm256_set1_epi16(-1);
    let mut mmax = zero;
    let mut msum_lo = zero;
    let mut msum_hi = zero;

    let mut row = src;
    for _ in 0..height {
        for x in (0..tail).step_by(16) {
            let v = _mm256_loadu_si256(row.add(x) as *const __m256i);
            mmin = _mm256_min_epu16(mmin, v);
            mmax = _mm256_max_epu16(mmax, v);
            add_words(&mut msum_lo, &mut msum_hi, v);
        }

        if tail != width {
            let v = _mm256_and_si256(_mm256_loadu_si256(row.add(tail) as *const __m256i), mask);
            mmin = _mm256_min_epu16(mmin, _mm256_or_si256(v, ones));
            mmax = _mm256_max_epu16(mmax, v);
            add_words(&mut msum_lo, &mut msum_hi, v);
        }

        row = row.wrapping_byte_offset(stride);
    }

    stats.min = horizontal_min_u16_256(mmin);
    stats.max = horizontal_max_u16_256(mmax);
    stats.sum = horizontal_sum_byte_split_256(msum_lo, msum_hi);
}

/// # Safety
/// Requires AVX2. Each row must stay readable up to the next 32-byte
/// multiple past its last sample.
#[target_feature(enable = "avx2")]
pub unsafe fn plane_stats_1_f32(
    stats: &mut FloatStats,
    src: *const f32,
    stride: isize,
    width: u32,
    height: u32,
) {
    let width = width as usize;
    let tail = width & !7;
    let mask = tail_mask_ps(width);
    let posmask = _mm256_andnot_ps(mask, _mm256_set1_ps(f32::INFINITY));
    let negmask = _mm256_andnot_ps(mask, _mm256_set1_ps(f32::NEG_INFINITY));

    let mut fmin = _mm256_set1_ps(f32::INFINITY);
    let mut fmax = _mm256_set1_ps(f32::NEG_INFINITY);
    let mut dsum = _mm256_setzero_pd();

    let mut row = src;
    for _ in 0..height {
        for x in (0..tail).step_by(8) {
            let v = _mm256_loadu_ps(row.add(x));
            fmin = _mm256_min_ps(v, fmin);
            fmax = _mm256_max_ps(v, fmax);
            dsum = add_widened(dsum, v);
        }

        if tail != width {
            let v = _mm256_and_ps(_mm256_loadu_ps(row.add(tail)), mask);
            fmin = _mm256_min_ps(_mm256_or_ps(v, posmask), fmin);
            fmax = _mm256_max_ps(_mm256_or_ps(v, negmask), fmax);
            dsum = add_widened(dsum, v);
        }

        row = row.wrapping_byte_offset(stride);
    }

    stats.min = horizontal_min_f32_256(fmin);
    stats.max = horizontal_max_f32_256(fmax);
    stats.sum = horizontal_sum_f64_256(dsum);
}

/// # Safety
/// Requires AVX2. Each row of both planes must stay readable up to the next
/// 32-byte multiple past its last sample.
#[target_feature(enable = "avx2")]
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
    let tail = width & !31;
    let zero = _mm256_setzero_si256();
    let mask = tail_mask_epi8(width);
    let ones = _mm256_andnot_si256(mask, _mm256_set1_epi8(-1));

    let mut mmin = _mm256_set1_epi8(-1);
    let mut mmax = zero;
    let mut msum = zero;
    let mut mdiff = zero;

    let mut row1 = src1;
    let mut row2 = src2;
    for _ in 0..height {
        for x in (0..tail).step_by(32) {
            let v1 = _mm256_loadu_si256(row1.add(x) as *const __m256i);
            let v2 = _mm256_loadu_si256(row2.add(x) as *const __m256i);
            mmin = _mm256_min_epu8(mmin, v1);
            mmax = _mm256_max_epu8(mmax, v1);
            msum = _mm256_add_epi64(msum, _mm256_sad_epu8(v1, zero));
            mdiff = _mm256_add_epi64(mdiff, _mm256_sad_epu8(v1, v2));
        }

        if tail != width {
            let v1 = _mm256_and_si256(_mm256_loadu_si256(row1.add(tail) as *const __m256i), mask);
            let v2 = _mm256_and_si256(_mm256_loadu_si256(row2.add(tail) as *const __m256i), mask);
            mmin = _mm256_min_epu8(mmin, _mm256_or_si256(v1, ones));
            mmax = _mm256_max_epu8(mmax, v1);
            msum = _mm256_add_epi64(msum, _mm256_sad_epu8(v1, zero));
            mdiff = _mm256_add_epi64(mdiff, _mm256_sad_epu8(v1, v2));
        }

        row1 = row1.wrapping_byte_offset(stride1);
        row2 = row2.wrapping_byte_offset(stride2);
    }

    stats.min = horizontal_min_u8_256(mmin);
    stats.max = horizontal_max_u8_256(mmax);
    stats.sum = horizontal_sum_u64_256(msum);
    stats.diff_sum = horizontal_sum_u64_256(mdiff);
}

/// # Safety
/// Requires AVX2. Each row of both planes must stay readable up to the next
/// 32-byte multiple past its last sample.
#[target_feature(enable = "avx2")]
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
    let tail = width & !15;
    let zero = _mm256_setzero_si256();
    let mask = tail_mask_epi16(width);
    let ones = _mm256_andnot_si256(mask, _mm256_set1_epi16(-1));

    let mut mmin = _mm256_set1_epi16(-1);
    let mut mmax = zero;
    let mut msum_lo = zero;
    let mut msum_hi = zero;
    let mut mdiff_lo = zero;
    let mut mdiff_hi = zero;

    let mut row1 = src1;
    let mut row2 = src2;
    for _ in 0..height {
        for x in (0..tail).step_by(16) {
            let v1 = _mm256_loadu_si256(row1.add(x) as *const __m256i);
            let v2 = _mm256_loadu_si256(row2.add(x) as *const __m256i);
            mmin = _mm256_min_epu16(mmin, v1);
            mmax = _mm256_max_epu16(mmax, v1);
            add_words(&mut msum_lo, &mut msum_hi, v1);
            add_words(&mut mdiff_lo, &mut mdiff_hi, abs_diff_epu16(v1, v2));
        }

        if tail != width {
            let v1 = _mm256_and_si256(_mm256_loadu_si256(row1.add(tail) as *const __m256i), mask);
            let v2 = _mm256_and_si256(_mm256_loadu_si256(row2.add(tail) as *const __m256i), mask);
            mmin = _mm256_min_epu16(mmin, _mm256_or_si256(v1, ones));
            mmax = _mm256_max_epu16(mmax, v1);
            add_words(&mut msum_lo, &mut msum_hi, v1);
            add_words(&mut mdiff_lo, &mut mdiff_hi, abs_diff_epu16(v1, v2));
        }

        row1 = row1.wrapping_byte_offset(stride1);
        row2 = row2.wrapping_byte_offset(stride2);
    }

    stats.min = horizontal_min_u16_256(mmin);
    stats.max = horizontal_max_u16_256(mmax);
    stats.sum = horizontal_sum_byte_split_256(msum_lo, msum_hi);
    stats.diff_sum = horizontal_sum_byte_split_256(mdiff_lo, mdiff_hi);
}

/// # Safety
/// Requires AVX2. Each row of both planes must stay readable up to the next
/// 32-byte multiple past its last sample.
#[target_feature(enable = "avx2")]
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
    let tail = width & !7;
    let mask = tail_mask_ps(width);
    let posmask = _mm256_andnot_ps(mask, _mm256_set1_ps(f32::INFINITY));
    let negmask = _mm256_andnot_ps(mask, _mm256_set1_ps(f32::NEG_INFINITY));

    let mut fmin = _mm256_set1_ps(f32::INFINITY);
    let mut fmax = _mm256_set1_ps(f32::NEG_INFINITY);
    let mut dsum = _mm256_setzero_pd();
    let mut ddiff = _mm256_setzero_pd();

    let mut row1 = src1;
    let mut row2 = src2;
    for _ in 0..height {
        for x in (0..tail).step_by(8) {
            let v1 = _mm256_loadu_ps(row1.add(x));
            let v2 = _mm256_loadu_ps(row2.add(x));
            fmin = _mm256_min_ps(v1, fmin);
            fmax = _mm256_max_ps(v1, fmax);
            dsum = add_widened(dsum, v1);
            ddiff = add_widened(ddiff, abs_ps(_mm256_sub_ps(v1, v2)));
        }

        if tail != width {
            let v1 = _mm256_and_ps(_mm256_loadu_ps(row1.add(tail)), mask);
            let v2 = _mm256_and_ps(_mm256_loadu_ps(row2.add(tail)), mask);
            fmin = _mm256_min_ps(_mm256_or_ps(v1, posmask), fmin);
            fmax = _mm256_max_ps(_mm256_or_ps(v1, negmask), fmax);
            dsum = add_widened(dsum, v1);
            ddiff = add_widened(ddiff, abs_ps(_mm256_sub_ps(v1, v2)));
        }

        row1 = row1.wrapping_byte_offset(stride1);
        row2 = row2.wrapping_byte_offset(stride2);
    }

    stats.min = horizontal_min_f32_256(fmin);
    stats.max = horizontal_max_f32_256(fmax);
    stats.sum = horizontal_sum_f64_256(dsum);
    stats.diff_sum = horizontal_sum_f64_256(ddiff);
}
