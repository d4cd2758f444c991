//! CPU feature detection for runtime SIMD dispatch.
//!
//! Detection runs once, on first use, and the result is cached for the
//! lifetime of the process. Kernel selection reads this cache instead of
//! calling `is_x86_feature_detected!` at every call site.

use std::fmt;
use std::sync::OnceLock;

/// Instruction-set extensions relevant to the vectorized kernels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuFeatures {
    pub sse2: bool,
    pub sse4_1: bool,
    pub avx2: bool,
}

static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Get cached CPU features (detected once on first call).
#[cfg(target_arch = "x86_64")]
#[inline]
pub fn get() -> CpuFeatures {
    *FEATURES.get_or_init(|| {
        let features = CpuFeatures {
            sse2: is_x86_feature_detected!("sse2"),
            sse4_1: is_x86_feature_detected!("sse4.1"),
            avx2: is_x86_feature_detected!("avx2"),
        };
        log::debug!("detected CPU features: {}", features);
        features
    })
}

/// Non-x86 targets have none of the tracked extensions.
#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn get() -> CpuFeatures {
    *FEATURES.get_or_init(CpuFeatures::default)
}

#[inline]
pub fn has_sse2() -> bool {
    get().sse2
}

#[inline]
pub fn has_sse4_1() -> bool {
    get().sse4_1
}

#[inline]
pub fn has_avx2() -> bool {
    get().avx2
}

impl fmt::Display for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (self.sse2, "sse2"),
            (self.sse4_1, "sse4.1"),
            (self.avx2, "avx2"),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_is_cached() {
        assert_eq!(get(), get());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_sse2_is_baseline_on_x86_64() {
        assert!(has_sse2());
    }

    #[test]
    fn test_display_lists_present_features() {
        let features = CpuFeatures {
            sse2: true,
            sse4_1: false,
            avx2: true,
        };
        assert_eq!(features.to_string(), "sse2 avx2");
        assert_eq!(CpuFeatures::default().to_string(), "none");
    }
}
