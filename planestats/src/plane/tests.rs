use super::*;
use crate::common::SampleFormat;

#[test]
fn test_align_stride() {
    assert_eq!(align_stride(1), 32);
    assert_eq!(align_stride(32), 32);
    assert_eq!(align_stride(33), 64);
    assert_eq!(align_stride(0), 0);
}

#[test]
fn test_buffer_layout() {
    let plane = PlaneBuffer::new(SampleFormat::U16, 17, 3).unwrap();
    assert_eq!(plane.stride(), 64);
    assert_eq!(plane.bytes().len(), 64 * 3);
    assert_eq!(plane.bytes().as_ptr() as usize % ALIGNMENT, 0);
    assert!(plane.bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_buffer_rejects_empty() {
    assert!(matches!(
        PlaneBuffer::new(SampleFormat::U8, 0, 4),
        Err(Error::InvalidGeometry(_))
    ));
    assert!(matches!(
        PlaneBuffer::new(SampleFormat::F32, 4, 0),
        Err(Error::InvalidGeometry(_))
    ));
}

#[test]
fn test_from_samples_round_trips_rows() {
    let samples: Vec<f32> = (0..15).map(|i| i as f32 * 0.5).collect();
    let plane = PlaneBuffer::from_samples(5, 3, &samples).unwrap();
    let view = plane.view::<f32>().unwrap();

    for y in 0..3 {
        assert_eq!(view.row(y), &samples[y as usize * 5..(y as usize + 1) * 5]);
    }
}

#[test]
fn test_from_samples_rejects_wrong_count() {
    let result = PlaneBuffer::from_samples(4, 4, &[0u8; 15]);
    assert!(matches!(result, Err(Error::InvalidGeometry(_))));
}

#[test]
fn test_typed_access_checks_format() {
    let mut plane = PlaneBuffer::new(SampleFormat::U8, 8, 2).unwrap();
    assert!(matches!(plane.view::<u16>(), Err(Error::FormatMismatch(_))));
    assert!(matches!(plane.row_mut::<f32>(0), Err(Error::FormatMismatch(_))));
    assert!(plane.view::<u8>().is_ok());
}

#[test]
fn test_row_mut_bounds() {
    let mut plane = PlaneBuffer::new(SampleFormat::U8, 8, 2).unwrap();
    assert_eq!(plane.row_mut::<u8>(1).unwrap().len(), 8);
    assert!(matches!(plane.row_mut::<u8>(2), Err(Error::InvalidGeometry(_))));
}

#[test]
fn test_fill_with_leaves_padding() {
    let mut plane = PlaneBuffer::new(SampleFormat::U8, 3, 2).unwrap();
    plane.fill_with::<u8>(|x, y| (x + 10 * y) as u8 + 1).unwrap();

    let stride = plane.stride();
    let bytes = plane.bytes();
    assert_eq!(&bytes[..3], &[1, 2, 3]);
    assert_eq!(&bytes[stride..stride + 3], &[11, 12, 13]);
    assert!(bytes[3..stride].iter().all(|&b| b == 0));
}

#[test]
fn test_view_over_caller_memory() {
    // 6x2 u8 plane with stride 8; the last row must stay readable to byte 32.
    let bytes = [7u8; 40];
    let view = PlaneRef::<u8>::new(&bytes, 8, 6, 2).unwrap();
    assert_eq!(view.width(), 6);
    assert_eq!(view.height(), 2);
    assert_eq!(view.stride(), 8);
    assert_eq!(view.row(1), &[7u8; 6]);
}

#[test]
fn test_view_requires_over_read_allowance() {
    assert_eq!(PlaneRef::<u8>::required_len(8, 6, 2), Some(8 + 32));
    assert_eq!(PlaneRef::<f32>::required_len(64, 9, 3), Some(128 + 64));

    let bytes = [0u8; 39];
    assert!(matches!(
        PlaneRef::<u8>::new(&bytes, 8, 6, 2),
        Err(Error::InvalidGeometry(_))
    ));
}

#[test]
fn test_view_rejects_narrow_stride() {
    let bytes = [0u8; 128];
    assert!(matches!(
        PlaneRef::<u8>::new(&bytes, 4, 6, 2),
        Err(Error::InvalidGeometry(_))
    ));
}

#[test]
fn test_view_rejects_misaligned_stride() {
    let samples = [0u16; 64];
    let bytes: &[u8] = bytemuck::cast_slice(&samples);
    assert!(matches!(
        PlaneRef::<u16>::new(bytes, 13, 4, 2),
        Err(Error::InvalidGeometry(_))
    ));
}

#[test]
fn test_view_from_samples_counts_stride_in_samples() {
    let samples = [1.0f32; 24];
    let view = PlaneRef::from_samples(&samples, 8, 3, 2).unwrap();
    assert_eq!(view.stride(), 32);
    assert_eq!(view.row(1), &[1.0f32; 3]);
}

#[test]
fn test_same_size() {
    let a = PlaneBuffer::new(SampleFormat::U8, 4, 4).unwrap();
    let b = PlaneBuffer::new(SampleFormat::U8, 4, 4).unwrap();
    let c = PlaneBuffer::new(SampleFormat::U8, 4, 5).unwrap();
    let a = a.view::<u8>().unwrap();
    assert!(a.same_size(&b.view::<u8>().unwrap()));
    assert!(!a.same_size(&c.view::<u8>().unwrap()));
}

#[test]
fn test_required_len_overflow() {
    assert_eq!(PlaneRef::<u8>::required_len(usize::MAX, 1, 3), None);
    assert_eq!(PlaneRef::<u8>::required_len(isize::MAX as usize, 1, 3), None);
}

#[test]
fn test_view_rejects_overflowing_geometry() {
    let bytes = [0u8; 64];
    assert!(matches!(
        PlaneRef::<u8>::new(&bytes, isize::MAX as usize, 1, 3),
        Err(Error::InvalidGeometry(_))
    ));

    let samples = [0u16; 32];
    assert!(matches!(
        PlaneRef::<u16>::from_samples(&samples, usize::MAX / 2 + 1, 1, 2),
        Err(Error::InvalidGeometry(_))
    ));
}
