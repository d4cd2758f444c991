mod common;
mod filter;
mod plane;
mod stats;

pub mod kernel;
pub mod prelude;

pub use prelude::*;
