pub mod cpu_features;
pub mod log_setup;

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}
