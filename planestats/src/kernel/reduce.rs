//! Horizontal reductions: collapse every lane of one register into a scalar.
//!
//! The 128-bit versions halve the register by byte shifts or shuffles until
//! one lane is left. The 256-bit versions first fold the upper 128-bit half
//! onto the lower one and then continue with the 128-bit tree.

#![allow(unsafe_op_in_unsafe_fn)]

use std::arch::x86_64::*;

// =============================================================================
// 128-bit registers
// =============================================================================

#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_min_u8(x: __m128i) -> u32 {
    let x = _mm_min_epu8(x, _mm_srli_si128::<8>(x));
    let x = _mm_min_epu8(x, _mm_srli_si128::<4>(x));
    let x = _mm_min_epu8(x, _mm_srli_si128::<2>(x));
    let x = _mm_min_epu8(x, _mm_srli_si128::<1>(x));
    (_mm_cvtsi128_si32(x) & 0xFF) as u32
}

#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_max_u8(x: __m128i) -> u32 {
    let x = _mm_max_epu8(x, _mm_srli_si128::<8>(x));
    let x = _mm_max_epu8(x, _mm_srli_si128::<4>(x));
    let x = _mm_max_epu8(x, _mm_srli_si128::<2>(x));
    let x = _mm_max_epu8(x, _mm_srli_si128::<1>(x));
    (_mm_cvtsi128_si32(x) & 0xFF) as u32
}

/// Signed 16-bit minimum.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_min_i16(x: __m128i) -> i32 {
    let x = _mm_min_epi16(x, _mm_srli_si128::<8>(x));
    let x = _mm_min_epi16(x, _mm_srli_si128::<4>(x));
    let x = _mm_min_epi16(x, _mm_srli_si128::<2>(x));
    _mm_extract_epi16::<0>(x) as i16 as i32
}

/// Signed 16-bit maximum.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_max_i16(x: __m128i) -> i32 {
    let x = _mm_max_epi16(x, _mm_srli_si128::<8>(x));
    let x = _mm_max_epi16(x, _mm_srli_si128::<4>(x));
    let x = _mm_max_epi16(x, _mm_srli_si128::<2>(x));
    _mm_extract_epi16::<0>(x) as i16 as i32
}

/// Unsigned 16-bit minimum. Needs SSE4.1, so only the 256-bit tier uses it.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn horizontal_min_u16(x: __m128i) -> u32 {
    let x = _mm_min_epu16(x, _mm_srli_si128::<8>(x));
    let x = _mm_min_epu16(x, _mm_srli_si128::<4>(x));
    let x = _mm_min_epu16(x, _mm_srli_si128::<2>(x));
    _mm_extract_epi16::<0>(x) as u16 as u32
}

/// Unsigned 16-bit maximum. Needs SSE4.1, so only the 256-bit tier uses it.
#[inline]
#[target_feature(enable = "sse4.1")]
pub unsafe fn horizontal_max_u16(x: __m128i) -> u32 {
    let x = _mm_max_epu16(x, _mm_srli_si128::<8>(x));
    let x = _mm_max_epu16(x, _mm_srli_si128::<4>(x));
    let x = _mm_max_epu16(x, _mm_srli_si128::<2>(x));
    _mm_extract_epi16::<0>(x) as u16 as u32
}

#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_min_f32(x: __m128) -> f32 {
    let x = _mm_min_ps(x, _mm_shuffle_ps::<0x4E>(x, x));
    let x = _mm_min_ps(x, _mm_shuffle_ps::<0xB1>(x, x));
    _mm_cvtss_f32(x)
}

#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_max_f32(x: __m128) -> f32 {
    let x = _mm_max_ps(x, _mm_shuffle_ps::<0x4E>(x, x));
    let x = _mm_max_ps(x, _mm_shuffle_ps::<0xB1>(x, x));
    _mm_cvtss_f32(x)
}

/// Sum of the two 64-bit lanes.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_sum_u64(x: __m128i) -> u64 {
    _mm_cvtsi128_si64(_mm_add_epi64(x, _mm_srli_si128::<8>(x))) as u64
}

/// Sum of the two double lanes.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_sum_f64(x: __m128d) -> f64 {
    _mm_cvtsd_f64(_mm_add_sd(x, _mm_unpackhi_pd(x, x)))
}

/// Recombines word sums that were accumulated as separate low-byte and
/// high-byte partials: `sum(lo) + (sum(hi) << 8)`.
#[inline]
#[target_feature(enable = "sse2")]
pub unsafe fn horizontal_sum_byte_split(lo: __m128i, hi: __m128i) -> u64 {
    // [lo0 + lo1, hi0 + hi1]
    let x = _mm_add_epi64(_mm_unpacklo_epi64(lo, hi), _mm_unpackhi_epi64(lo, hi));
    let x = _mm_add_epi64(x, _mm_slli_epi64::<8>(_mm_unpackhi_epi64(x, x)));
    _mm_cvtsi128_si64(x) as u64
}

// =============================================================================
// 256-bit registers
// =============================================================================

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_min_u8_256(x: __m256i) -> u32 {
    horizontal_min_u8(_mm_min_epu8(
        _mm256_castsi256_si128(x),
        _mm256_extracti128_si256::<1>(x),
    ))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_max_u8_256(x: __m256i) -> u32 {
    horizontal_max_u8(_mm_max_epu8(
        _mm256_castsi256_si128(x),
        _mm256_extracti128_si256::<1>(x),
    ))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_min_u16_256(x: __m256i) -> u32 {
    horizontal_min_u16(_mm_min_epu16(
        _mm256_castsi256_si128(x),
        _mm256_extracti128_si256::<1>(x),
    ))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_max_u16_256(x: __m256i) -> u32 {
    horizontal_max_u16(_mm_max_epu16(
        _mm256_castsi256_si128(x),
        _mm256_extracti128_si256::<1>(x),
    ))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_min_f32_256(x: __m256) -> f32 {
    horizontal_min_f32(_mm_min_ps(
        _mm256_castps256_ps128(x),
        _mm256_extractf128_ps::<1>(x),
    ))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_max_f32_256(x: __m256) -> f32 {
    horizontal_max_f32(_mm_max_ps(
        _mm256_castps256_ps128(x),
        _mm256_extractf128_ps::<1>(x),
    ))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_u64_256(x: __m256i) -> u64 {
    horizontal_sum_u64(fold_epi64(x))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_f64_256(x: __m256d) -> f64 {
    horizontal_sum_f64(_mm_add_pd(
        _mm256_castpd256_pd128(x),
        _mm256_extractf128_pd::<1>(x),
    ))
}

#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_byte_split_256(lo: __m256i, hi: __m256i) -> u64 {
    horizontal_sum_byte_split(fold_epi64(lo), fold_epi64(hi))
}

/// Adds the upper 64-bit lane pair onto the lower one.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn fold_epi64(x: __m256i) -> __m128i {
    _mm_add_epi64(_mm256_castsi256_si128(x), _mm256_extracti128_si256::<1>(x))
}
