//! Frame-level plane statistics.
//!
//! [`PlaneStatsFilter`] measures one plane of every frame and attaches
//! `<prop>Min`, `<prop>Max`, `<prop>Average` and, when a reference clip is
//! given, `<prop>Diff` to the frame's properties. Averages and differences
//! are normalized to the format's peak value.

mod config;
mod frame;
mod props;


use rayon::prelude::*;

pub use config::PlaneStatsConfig;
pub use frame::{Frame, SampleType, VideoFormat};
pub use props::{FrameProps, PropValue};

use crate::common::{Error, Isa, Result, SampleFormat};
use crate::kernel::{KernelSet, Kernels};
use crate::stats::{FloatStats, IntStats};

/// Kernel set bound to the sample type of the filter's format.
#[derive(Clone, Copy, Debug)]
enum FormatKernels {
    U8(KernelSet<u8>),
    U16(KernelSet<u16>),
    F32(KernelSet<f32>),
}

impl FormatKernels {
    fn new(format: SampleFormat, isa: Isa) -> Result<FormatKernels> {
        Ok(match format {
            SampleFormat::U8 => FormatKernels::U8(KernelSet::new(isa)?),
            SampleFormat::U16 => FormatKernels::U16(KernelSet::new(isa)?),
            SampleFormat::F32 => FormatKernels::F32(KernelSet::new(isa)?),
        })
    }
}

#[derive(Clone, Debug)]
struct PropNames {
    min: String,
    max: String,
    average: String,
    diff: String,
}

impl PropNames {
    fn new(prefix: &str) -> PropNames {
        PropNames {
            min: format!("{}Min", prefix),
            max: format!("{}Max", prefix),
            average: format!("{}Average", prefix),
            diff: format!("{}Diff", prefix),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlaneStatsFilter {
    format: VideoFormat,
    plane: usize,
    with_reference: bool,
    kernels: FormatKernels,
    names: PropNames,
}

impl PlaneStatsFilter {
    /// Validates the clip formats and binds the best kernels allowed by
    /// `config.cpu`. `reference` is the format of the second clip, if any.
    pub fn new(
        config: &PlaneStatsConfig,
        format: VideoFormat,
        reference: Option<VideoFormat>,
    ) -> Result<PlaneStatsFilter> {
        let sample_format = format.sample_format()?;

        if config.plane >= format.num_planes {
            return Err(Error::InvalidPlane {
                plane: config.plane,
                num_planes: format.num_planes,
            });
        }

        if let Some(reference) = reference {
            if reference != format {
                return Err(Error::FormatMismatch(format!(
                    "both clips must have the same format, got {} and {}",
                    format, reference
                )));
            }
        }

        let isa = Isa::detect(config.cpu);
        let kernels = FormatKernels::new(sample_format, isa)?;
        log::info!(
            "plane stats on plane {} of {} using {} kernels",
            config.plane,
            format,
            isa
        );

        Ok(PlaneStatsFilter {
            format,
            plane: config.plane,
            with_reference: reference.is_some(),
            kernels,
            names: PropNames::new(&config.prop),
        })
    }

    pub fn format(&self) -> VideoFormat {
        self.format
    }

    pub fn isa(&self) -> Isa {
        match &self.kernels {
            FormatKernels::U8(k) => k.isa(),
            FormatKernels::U16(k) => k.isa(),
            FormatKernels::F32(k) => k.isa(),
        }
    }

    /// Measures `frame` and stores the results in its properties, replacing
    /// earlier values under the same names.
    pub fn process(&self, frame: &mut Frame, reference: Option<&Frame>) -> Result<()> {
        let props = self.measure(frame, reference)?;
        for (key, value) in props.iter() {
            frame.props_mut().set(key, value);
        }
        Ok(())
    }

    /// Computes the properties of one frame without attaching them.
    pub fn measure(&self, frame: &Frame, reference: Option<&Frame>) -> Result<FrameProps> {
        self.check_frame(frame)?;
        match reference {
            Some(reference) if self.with_reference => self.check_frame(reference)?,
            Some(_) => {
                return Err(Error::FormatMismatch(
                    "reference frame given to a filter without reference clip".to_string(),
                ));
            }
            None if self.with_reference => {
                return Err(Error::FormatMismatch(
                    "filter with reference clip needs a reference frame".to_string(),
                ));
            }
            None => {}
        }

        let plane = frame.plane(self.plane)?;
        let samples = plane.width() as f64 * plane.height() as f64;

        let props = match &self.kernels {
            FormatKernels::U8(k) => {
                let stats = measure_plane(k, self.plane, frame, reference)?;
                self.int_props(stats, samples)
            }
            FormatKernels::U16(k) => {
                let stats = measure_plane(k, self.plane, frame, reference)?;
                self.int_props(stats, samples)
            }
            FormatKernels::F32(k) => {
                let stats = measure_plane(k, self.plane, frame, reference)?;
                self.float_props(stats, samples)
            }
        };
        Ok(props)
    }

    /// Processes independent frames in parallel. `references`, when given,
    /// pairs up with `frames` by index.
    pub fn process_batch(&self, frames: &mut [Frame], references: Option<&[Frame]>) -> Result<()> {
        if let Some(references) = references {
            if references.len() != frames.len() {
                return Err(Error::FormatMismatch(format!(
                    "{} frames but {} reference frames",
                    frames.len(),
                    references.len()
                )));
            }
        }

        log::debug!("processing {} frames", frames.len());
        frames
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(index, frame)| self.process(frame, references.map(|r| &r[index])))
    }

    fn check_frame(&self, frame: &Frame) -> Result<()> {
        if frame.format() != self.format {
            return Err(Error::FormatMismatch(format!(
                "frame is {}, filter expects {}",
                frame.format(),
                self.format
            )));
        }
        Ok(())
    }

    fn int_props(&self, stats: IntStats, samples: f64) -> FrameProps {
        let scale = samples * self.format.peak();
        let mut props = FrameProps::default();
        props.set(&self.names.min, PropValue::Int(stats.min as i64));
        props.set(&self.names.max, PropValue::Int(stats.max as i64));
        props.set(&self.names.average, PropValue::Float(stats.sum as f64 / scale));
        if self.with_reference {
            props.set(&self.names.diff, PropValue::Float(stats.diff_sum as f64 / scale));
        }
        props
    }

    fn float_props(&self, stats: FloatStats, samples: f64) -> FrameProps {
        let mut props = FrameProps::default();
        props.set(&self.names.min, PropValue::Float(stats.min as f64));
        props.set(&self.names.max, PropValue::Float(stats.max as f64));
        props.set(&self.names.average, PropValue::Float(stats.sum / samples));
        if self.with_reference {
            props.set(&self.names.diff, PropValue::Float(stats.diff_sum / samples));
        }
        props
    }
}

fn measure_plane<S: Kernels>(
    kernels: &KernelSet<S>,
    plane: usize,
    frame: &Frame,
    reference: Option<&Frame>,
) -> Result<S::Stats> {
    let mut stats = S::Stats::default();
    let first = frame.plane(plane)?.view::<S>()?;
    match reference {
        Some(reference) => {
            let second = reference.plane(plane)?.view::<S>()?;
            kernels.measure_pair(&mut stats, &first, &second)?;
        }
        None => kernels.measure(&mut stats, &first),
    }
    Ok(stats)
}
