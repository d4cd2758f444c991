use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use std::sync::OnceLock;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

/// Initializes process-wide logging: rotating files under `logs/`, everything
/// mirrored to stdout and warnings to stderr.
///
/// `base_level` is a flexi_logger spec such as `"info"` or
/// `"planestats=debug"`. Calling it again after a successful start is a no-op.
pub fn setup_logging(base_level: &str) {
    if LOGGER.get().is_some() {
        return;
    }

    let handle = Logger::try_with_str(base_level)
        .unwrap_or_else(|e| panic!("Invalid log spec {}: {}", base_level, e))
        .log_to_file(
            FileSpec::default()
                .directory("logs")
                .basename("planestats"),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e));

    let _ = LOGGER.set(handle);
}
