use ::common::cpu_features;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Upper bound on the instruction-set tier a filter may use.
///
/// Parsing is lenient: any name other than `none`, `sse2` or `avx2` means
/// "no cap".
#[derive(
    Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Display, EnumIter,
    Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum CpuLevel {
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "sse2")]
    Sse2,
    #[strum(serialize = "avx2")]
    Avx2,
    #[default]
    #[strum(serialize = "max")]
    Max,
}

impl CpuLevel {
    pub fn from_name(name: &str) -> CpuLevel {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => CpuLevel::None,
            "sse2" => CpuLevel::Sse2,
            "avx2" => CpuLevel::Avx2,
            _ => CpuLevel::Max,
        }
    }
}

impl From<String> for CpuLevel {
    fn from(name: String) -> Self {
        CpuLevel::from_name(&name)
    }
}

impl From<CpuLevel> for String {
    fn from(level: CpuLevel) -> Self {
        level.to_string()
    }
}

/// Kernel tier actually used for a call site.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Display, EnumIter)]
pub enum Isa {
    #[strum(serialize = "scalar")]
    Scalar,
    #[strum(serialize = "sse2")]
    Sse2,
    #[strum(serialize = "avx2")]
    Avx2,
}

impl Isa {
    /// Lowest [`CpuLevel`] that permits this tier.
    pub fn level(self) -> CpuLevel {
        match self {
            Isa::Scalar => CpuLevel::None,
            Isa::Sse2 => CpuLevel::Sse2,
            Isa::Avx2 => CpuLevel::Avx2,
        }
    }

    /// Whether the running CPU can execute this tier.
    pub fn is_supported(self) -> bool {
        match self {
            Isa::Scalar => true,
            Isa::Sse2 => cfg!(target_arch = "x86_64") && cpu_features::has_sse2(),
            Isa::Avx2 => cfg!(target_arch = "x86_64") && cpu_features::has_avx2(),
        }
    }

    /// Best supported tier not above `cap`.
    pub fn detect(cap: CpuLevel) -> Isa {
        let isa = Isa::iter()
            .rev()
            .find(|isa| isa.level() <= cap && isa.is_supported())
            .unwrap_or(Isa::Scalar);
        log::debug!("cpu level {} resolved to {} kernels", cap, isa);
        isa
    }

    /// All tiers the running CPU supports, narrowest first.
    pub fn available() -> Vec<Isa> {
        Isa::iter().filter(|isa| isa.is_supported()).collect()
    }

    /// Register width in bytes, zero for the scalar tier.
    pub fn vector_bytes(self) -> usize {
        match self {
            Isa::Scalar => 0,
            Isa::Sse2 => 16,
            Isa::Avx2 => 32,
        }
    }
}
