pub(crate) mod cpu_level;
pub(crate) mod error;
pub(crate) mod sample_format;

pub use cpu_level::{CpuLevel, Isa};
pub use error::{Error, Result};
pub use sample_format::{Sample, SampleFormat};
