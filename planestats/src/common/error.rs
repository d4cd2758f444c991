use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidGeometry(String),
    DimensionMismatch {
        first: (u32, u32),
        second: (u32, u32),
    },
    UnsupportedFormat(String),
    InvalidPlane {
        plane: usize,
        num_planes: usize,
    },
    FormatMismatch(String),
    UnsupportedIsa(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidGeometry(msg) => write!(f, "Invalid plane geometry: {}", msg),
            Error::DimensionMismatch { first, second } => write!(
                f,
                "Plane dimensions differ: {}x{} vs {}x{}",
                first.0, first.1, second.0, second.1
            ),
            Error::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            Error::InvalidPlane { plane, num_planes } => write!(
                f,
                "Invalid plane {} specified, format has {} plane(s)",
                plane, num_planes
            ),
            Error::FormatMismatch(msg) => write!(f, "Format mismatch: {}", msg),
            Error::UnsupportedIsa(msg) => write!(f, "Unsupported instruction set: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_yml::Error> for Error {
    fn from(e: serde_yml::Error) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
