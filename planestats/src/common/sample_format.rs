use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::stats::{FloatStats, IntStats};

/// Storage format of a single sample.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Display, EnumIter, Serialize, Deserialize)]
#[repr(u8)]
pub enum SampleFormat {
    #[strum(serialize = "u8")]
    U8 = 1,
    #[strum(serialize = "u16")]
    U16 = 2,
    #[strum(serialize = "f32")]
    F32 = 4,
}

impl SampleFormat {
    pub fn byte_count(&self) -> usize {
        *self as usize
    }
}

/// A sample type the kernels can reduce.
///
/// The result record is fixed by the type: integer samples produce
/// [`IntStats`], float samples produce [`FloatStats`]. Nothing in the
/// record itself says which one it is.
pub trait Sample: bytemuck::Pod + Debug + Send + Sync + 'static {
    const FORMAT: SampleFormat;

    type Stats: Copy + Default + Debug + PartialEq + Send + Sync;
}

impl Sample for u8 {
    const FORMAT: SampleFormat = SampleFormat::U8;
    type Stats = IntStats;
}

impl Sample for u16 {
    const FORMAT: SampleFormat = SampleFormat::U16;
    type Stats = IntStats;
}

impl Sample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;
    type Stats = FloatStats;
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_byte_counts_match_types() {
        assert_eq!(<u8 as Sample>::FORMAT.byte_count(), size_of::<u8>());
        assert_eq!(<u16 as Sample>::FORMAT.byte_count(), size_of::<u16>());
        assert_eq!(<f32 as Sample>::FORMAT.byte_count(), size_of::<f32>());
    }

    #[test]
    fn test_display_names() {
        let names: Vec<String> = SampleFormat::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["u8", "u16", "f32"]);
    }
}
