use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::props::FrameProps;
use crate::common::{Error, Result, SampleFormat};
use crate::plane::PlaneBuffer;

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Display, EnumIter, Serialize, Deserialize)]
pub enum SampleType {
    Integer,
    Float,
}

/// Sample layout shared by every plane of a frame.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct VideoFormat {
    pub sample_type: SampleType,
    pub bits_per_sample: u32,
    pub num_planes: usize,
}

impl VideoFormat {
    pub fn integer(bits_per_sample: u32, num_planes: usize) -> VideoFormat {
        VideoFormat {
            sample_type: SampleType::Integer,
            bits_per_sample,
            num_planes,
        }
    }

    pub fn float(num_planes: usize) -> VideoFormat {
        VideoFormat {
            sample_type: SampleType::Float,
            bits_per_sample: 32,
            num_planes,
        }
    }

    /// Storage of one sample: 8-bit integers as `u8`, 9 to 16-bit integers
    /// as `u16`, 32-bit floats as `f32`.
    pub fn sample_format(&self) -> Result<SampleFormat> {
        match (self.sample_type, self.bits_per_sample) {
            (SampleType::Integer, 8) => Ok(SampleFormat::U8),
            (SampleType::Integer, 9..=16) => Ok(SampleFormat::U16),
            (SampleType::Float, 32) => Ok(SampleFormat::F32),
            _ => Err(Error::UnsupportedFormat(format!(
                "{}, expected integer 8-16 bit or float 32 bit",
                self
            ))),
        }
    }

    /// Largest representable integer sample value. Float samples are
    /// normalized to `1.0`.
    pub fn peak(&self) -> f64 {
        match self.sample_type {
            SampleType::Integer => 2f64.powi(self.bits_per_sample as i32) - 1.0,
            SampleType::Float => 1.0,
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-bit, {} plane(s)",
            self.sample_type, self.bits_per_sample, self.num_planes
        )
    }
}

/// One video frame: its planes and the properties attached to it.
#[derive(Clone, Debug)]
pub struct Frame {
    format: VideoFormat,
    planes: Vec<PlaneBuffer>,
    props: FrameProps,
}

impl Frame {
    pub fn new(format: VideoFormat, planes: Vec<PlaneBuffer>) -> Result<Frame> {
        let sample_format = format.sample_format()?;

        if planes.len() != format.num_planes {
            return Err(Error::InvalidGeometry(format!(
                "{} planes given for format {}",
                planes.len(),
                format
            )));
        }
        if let Some(plane) = planes.iter().find(|p| p.format() != sample_format) {
            return Err(Error::FormatMismatch(format!(
                "plane holds {} samples, format {} stores {}",
                plane.format(),
                format,
                sample_format
            )));
        }

        Ok(Frame {
            format,
            planes,
            props: FrameProps::default(),
        })
    }

    /// A frame of zero-filled planes, all of the same size.
    pub fn blank(format: VideoFormat, width: u32, height: u32) -> Result<Frame> {
        let sample_format = format.sample_format()?;
        let planes = (0..format.num_planes)
            .map(|_| PlaneBuffer::new(sample_format, width, height))
            .collect::<Result<Vec<_>>>()?;

        Frame::new(format, planes)
    }

    pub fn format(&self) -> VideoFormat {
        self.format
    }

    pub fn plane(&self, index: usize) -> Result<&PlaneBuffer> {
        self.planes.get(index).ok_or(Error::InvalidPlane {
            plane: index,
            num_planes: self.planes.len(),
        })
    }

    pub fn plane_mut(&mut self, index: usize) -> Result<&mut PlaneBuffer> {
        let num_planes = self.planes.len();
        self.planes.get_mut(index).ok_or(Error::InvalidPlane {
            plane: index,
            num_planes,
        })
    }

    pub fn props(&self) -> &FrameProps {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut FrameProps {
        &mut self.props
    }
}
