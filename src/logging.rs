//! File-based logging setup.
//!
//! The terminal belongs to the UI for the whole process lifetime, so log
//! output goes to a daily-rolling file under the platform data directory
//! instead of stderr. Filtering follows `RUST_LOG`, defaulting to `info`.

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Best-effort: returns `None`
/// (and the app runs unlogged) when the log directory can't be created.
/// The returned guard must be held until process exit so buffered log
/// lines are flushed.
pub fn init() -> Option<WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "yd")?;
  let log_dir = proj_dirs.data_local_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::daily(log_dir, "yd.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();

  Some(guard)
}
