//! Process-wide logging setup shared by binaries and tests.

pub mod tracing;

pub use tracing::LogFormat;

/// Initialize tracing/logging with the format chosen by `LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
