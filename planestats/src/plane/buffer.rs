use aligned_vec::{AVec, ConstAlign};

use super::{align_stride, PlaneRef, ALIGNMENT};
use crate::common::{Error, Result, Sample, SampleFormat};

/// Owned plane storage.
///
/// The allocation is [`ALIGNMENT`]-byte aligned and every row is padded to a
/// multiple of [`ALIGNMENT`] bytes, so views of it always satisfy the
/// over-read allowance of the vectorized kernels. Padding bytes start zeroed.
#[derive(Clone, Debug)]
pub struct PlaneBuffer {
    format: SampleFormat,
    width: u32,
    height: u32,
    stride: usize,
    bytes: AVec<u8, ConstAlign<ALIGNMENT>>,
}

impl PlaneBuffer {
    /// Allocates a zero-filled plane.
    pub fn new(format: SampleFormat, width: u32, height: u32) -> Result<PlaneBuffer> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry(format!(
                "plane must not be empty, got {}x{}",
                width, height
            )));
        }

        let stride = align_stride(width as usize * format.byte_count());
        let len = stride * height as usize;
        let mut bytes = AVec::with_capacity(ALIGNMENT, len);
        bytes.resize(len, 0);

        Ok(PlaneBuffer {
            format,
            width,
            height,
            stride,
            bytes,
        })
    }

    /// Copies tightly packed, row-major samples into a new padded plane.
    pub fn from_samples<S: Sample>(width: u32, height: u32, samples: &[S]) -> Result<PlaneBuffer> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(Error::InvalidGeometry(format!(
                "{} samples given for a {}x{} plane",
                samples.len(),
                width,
                height
            )));
        }

        let mut plane = PlaneBuffer::new(S::FORMAT, width, height)?;
        for (y, src_row) in samples.chunks_exact(width as usize).enumerate() {
            plane.row_mut::<S>(y as u32)?.copy_from_slice(src_row);
        }
        Ok(plane)
    }

    #[inline]
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// All bytes including row padding.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Typed view for the kernels.
    pub fn view<S: Sample>(&self) -> Result<PlaneRef<'_, S>> {
        self.check_format::<S>()?;
        PlaneRef::new(&self.bytes, self.stride, self.width, self.height)
    }

    /// The `width` samples of row `y`.
    pub fn row_mut<S: Sample>(&mut self, y: u32) -> Result<&mut [S]> {
        self.check_format::<S>()?;
        if y >= self.height {
            return Err(Error::InvalidGeometry(format!(
                "row {} out of range for height {}",
                y, self.height
            )));
        }
        let start = y as usize * self.stride;
        let end = start + self.width as usize * size_of::<S>();
        Ok(bytemuck::cast_slice_mut(&mut self.bytes[start..end]))
    }

    /// Sets every sample from `f(x, y)`. Padding is left untouched.
    pub fn fill_with<S: Sample>(&mut self, mut f: impl FnMut(u32, u32) -> S) -> Result<()> {
        for y in 0..self.height {
            for (x, sample) in self.row_mut::<S>(y)?.iter_mut().enumerate() {
                *sample = f(x as u32, y);
            }
        }
        Ok(())
    }

    fn check_format<S: Sample>(&self) -> Result<()> {
        if S::FORMAT != self.format {
            return Err(Error::FormatMismatch(format!(
                "plane holds {} samples, accessed as {}",
                self.format,
                S::FORMAT
            )));
        }
        Ok(())
    }
}
