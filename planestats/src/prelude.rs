// Sample formats and tiers
pub use crate::common::{CpuLevel, Isa, Sample, SampleFormat};

// Error handling
pub use crate::common::{Error, Result};

// Planes and results
pub use crate::plane::{PlaneBuffer, PlaneRef, ALIGNMENT};
pub use crate::stats::{FloatStats, IntStats};

// Kernel dispatch
pub use crate::kernel::{KernelSet, Kernels, PairKernel, SingleKernel};

// Filter
pub use crate::filter::{
    Frame, FrameProps, PlaneStatsConfig, PlaneStatsFilter, PropValue, SampleType, VideoFormat,
};
