mod buffer;

#[cfg(test)]
mod tests;

use std::marker::PhantomData;

use crate::common::{Error, Result, Sample};

pub use buffer::PlaneBuffer;

/// Byte alignment of owned plane rows, and the granularity up to which the
/// vectorized kernels may read past the end of a row.
pub const ALIGNMENT: usize = 32;

/// Rounds a row length in bytes up to the next [`ALIGNMENT`] boundary.
#[inline]
pub(crate) fn align_stride(row_bytes: usize) -> usize {
    row_bytes.next_multiple_of(ALIGNMENT)
}

/// Read-only view of one plane of `S` samples in caller memory.
///
/// Construction checks everything the kernels assume and never check
/// themselves: non-zero size, `stride >= width * size_of::<S>()`, sample
/// alignment, and that the last row stays readable up to the next
/// [`ALIGNMENT`] boundary.
#[derive(Debug)]
pub struct PlaneRef<'a, S: Sample> {
    bytes: &'a [u8],
    stride: usize,
    width: u32,
    height: u32,
    _sample: PhantomData<S>,
}

impl<S: Sample> Clone for PlaneRef<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Sample> Copy for PlaneRef<'_, S> {}

impl<'a, S: Sample> PlaneRef<'a, S> {
    /// Creates a view over `bytes` with rows `stride` bytes apart.
    pub fn new(bytes: &'a [u8], stride: usize, width: u32, height: u32) -> Result<Self> {
        let sample_size = size_of::<S>();

        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry(format!(
                "plane must not be empty, got {}x{}",
                width, height
            )));
        }

        let row_bytes = width as usize * sample_size;
        if stride < row_bytes {
            return Err(Error::InvalidGeometry(format!(
                "stride {} is smaller than row size {}",
                stride, row_bytes
            )));
        }
        if stride % sample_size != 0 || bytes.as_ptr() as usize % align_of::<S>() != 0 {
            return Err(Error::InvalidGeometry(format!(
                "plane is not aligned to {} samples",
                S::FORMAT
            )));
        }
        if stride > isize::MAX as usize {
            return Err(Error::InvalidGeometry(format!("stride {} overflows", stride)));
        }

        let required = Self::required_len(stride, width, height).ok_or_else(|| {
            Error::InvalidGeometry(format!(
                "{}x{} plane with stride {} overflows the address space",
                width, height, stride
            ))
        })?;
        if bytes.len() < required {
            return Err(Error::InvalidGeometry(format!(
                "buffer holds {} bytes, {}x{} plane with stride {} needs {}",
                bytes.len(),
                width,
                height,
                stride,
                required
            )));
        }

        Ok(Self {
            bytes,
            stride,
            width,
            height,
            _sample: PhantomData,
        })
    }

    /// Creates a view over a sample slice; `stride` is counted in samples.
    pub fn from_samples(samples: &'a [S], stride: usize, width: u32, height: u32) -> Result<Self> {
        let stride = stride.checked_mul(size_of::<S>()).ok_or_else(|| {
            Error::InvalidGeometry(format!("stride of {} samples overflows", stride))
        })?;
        Self::new(bytemuck::cast_slice(samples), stride, width, height)
    }

    /// Bytes a buffer must hold for a plane of this geometry, including the
    /// over-read allowance after the last row. `None` if that overflows.
    pub fn required_len(stride: usize, width: u32, height: u32) -> Option<usize> {
        let row_bytes = (width as usize).checked_mul(size_of::<S>())?;
        let last_row = row_bytes.checked_next_multiple_of(ALIGNMENT)?;
        (height as usize)
            .saturating_sub(1)
            .checked_mul(stride)?
            .checked_add(last_row)
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

    #[inline]
    pub fn as_ptr(&self) -> *const S {
        self.bytes.as_ptr() as *const S
    }

    /// The `width` samples of row `y`, without padding.
    pub fn row(&self, y: u32) -> &'a [S] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * size_of::<S>();
        bytemuck::cast_slice(&self.bytes[start..end])
    }

    pub fn same_size<T: Sample>(&self, other: &PlaneRef<'_, T>) -> bool {
        self.width == other.width && self.height == other.height
    }
}
