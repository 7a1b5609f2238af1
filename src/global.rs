use std::path::PathBuf;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::{Flag, FlagSet, Logger, ROTATION_DEFAULT};

/// Path used when no [`GlobalLogger::set_path`] call preceded the first log.
pub const DEFAULT_GLOBAL_PATH: &str = "fixlog.log";

static GLOBAL: OnceCell<Logger> = OnceCell::new();
static PATH: Mutex<Option<PathBuf>> = Mutex::new(None);

/// The process-wide engine, lazily constructed on first use and backed by a
/// rotating logfile.
///
/// Configure before first use: `set_path` only takes effect while the engine
/// has not yet been constructed; once any static operation has run, the path
/// is fixed for the life of the process. Default flags are `Timestamp`,
/// `Sequence`, and `ThreadCode`.
pub struct GlobalLogger;

impl GlobalLogger {
    /// Set the logfile path. A no-op once the engine exists, so call it before
    /// the first `log`.
    pub fn set_path<P: Into<PathBuf>>(path: P) {
        *PATH.lock() = Some(path.into());
    }

    /// Borrow the underlying engine, constructing it on first use.
    pub fn handle() -> &'static Logger {
        GLOBAL.get_or_init(|| {
            let path = PATH
                .lock()
                .take()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GLOBAL_PATH));
            let flags = Flag::Timestamp | Flag::Sequence | Flag::ThreadCode;
            match Logger::to_file(&path, flags, ROTATION_DEFAULT) {
                Ok(logger) => logger,
                Err(e) => {
                    // degraded but alive: fall back to stdout
                    log::warn!("global logfile {} unavailable ({e}), logging to stdout", path.display());
                    Logger::builder().flags(flags).build()
                }
            }
        })
    }

    /// Send a line to the process-wide engine.
    pub fn log<T: Into<String>>(text: T) -> bool {
        Self::handle().send(text)
    }

    /// Flush the process-wide engine.
    pub fn flush() {
        Self::handle().flush();
    }

    /// Replace the process-wide engine's flags.
    pub fn set_flags(flags: FlagSet) {
        Self::handle().set_flags(flags);
    }

    /// Stop the process-wide engine. Does nothing if it was never used.
    pub fn stop() {
        if let Some(logger) = GLOBAL.get() {
            logger.stop();
        }
    }
}
