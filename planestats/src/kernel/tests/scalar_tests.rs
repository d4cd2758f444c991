//! Reference kernel tests. These pin down the expected results every other
//! tier is compared against.

use crate::kernel::scalar;
use crate::stats::{FloatStats, IntStats};

#[test]
fn test_scalar_u8_single_plane() {
    let src = [10u8, 20, 5, 250];
    let mut stats = IntStats::default();
    unsafe {
        scalar::plane_stats_1_u8(&mut stats, src.as_ptr(), 4, 4, 1);
    }

    assert_eq!(stats.min, 5);
    assert_eq!(stats.max, 250);
    assert_eq!(stats.sum, 285);
}

#[test]
fn test_scalar_single_plane_keeps_diff_sum() {
    let src = [1u16, 2, 3];
    let mut stats = IntStats {
        diff_sum: 77,
        ..Default::default()
    };
    unsafe {
        scalar::plane_stats_1_u16(&mut stats, src.as_ptr(), 6, 3, 1);
    }

    assert_eq!(stats.sum, 6);
    assert_eq!(stats.diff_sum, 77);
}

#[test]
fn test_scalar_honors_stride_padding() {
    // 3x2 plane, stride of 5 samples; padding values must be skipped.
    let src = [1u16, 2, 3, 60000, 60000, 4, 5, 6, 0, 0];
    let mut stats = IntStats::default();
    unsafe {
        scalar::plane_stats_1_u16(&mut stats, src.as_ptr(), 10, 3, 2);
    }

    assert_eq!(stats.min, 1);
    assert_eq!(stats.max, 6);
    assert_eq!(stats.sum, 21);
}

#[test]
fn test_scalar_pair_uses_own_strides() {
    let a = [10u8, 20, 0, 0, 30, 40, 0, 0];
    let b = [12u8, 18, 25, 45];
    let mut stats = IntStats::default();
    unsafe {
        scalar::plane_stats_2_u8(&mut stats, a.as_ptr(), 4, b.as_ptr(), 2, 2, 2);
    }

    assert_eq!(stats.min, 10);
    assert_eq!(stats.max, 40);
    assert_eq!(stats.sum, 100);
    assert_eq!(stats.diff_sum, 2 + 2 + 5 + 5);
}

#[test]
fn test_scalar_f32_nan_skips_extrema() {
    let src = [3.0f32, f32::NAN, -1.0, 2.0];
    let mut stats = FloatStats::default();
    unsafe {
        scalar::plane_stats_1_f32(&mut stats, src.as_ptr(), 16, 4, 1);
    }

    assert_eq!(stats.min, -1.0);
    assert_eq!(stats.max, 3.0);
    assert!(stats.sum.is_nan());
}

#[test]
fn test_scalar_f32_all_nan_leaves_seeds() {
    let src = [f32::NAN; 3];
    let mut stats = FloatStats::default();
    unsafe {
        scalar::plane_stats_1_f32(&mut stats, src.as_ptr(), 12, 3, 1);
    }

    assert_eq!(stats.min, f32::INFINITY);
    assert_eq!(stats.max, f32::NEG_INFINITY);
}

#[test]
fn test_scalar_f32_pair() {
    let a = [1.5f32, -2.0];
    let b = [1.0f32, -2.5];
    let mut stats = FloatStats::default();
    unsafe {
        scalar::plane_stats_2_f32(&mut stats, a.as_ptr(), 8, b.as_ptr(), 8, 2, 1);
    }

    assert_eq!(stats.min, -2.0);
    assert_eq!(stats.max, 1.5);
    assert_eq!(stats.sum, -0.5);
    assert_eq!(stats.diff_sum, 1.0);
}
