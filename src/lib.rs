//! This crate provides the asynchronous logging engine used by a FIX protocol
//! engine: protocol events, administrative messages, and diagnostic lines are
//! handed off by any number of application or network threads to a single
//! background thread which formats them and writes them to a configurable
//! output, without ever blocking a producer or interleaving lines.
//!
//! The core type is the [`Logger`], constructed through [`Builder`] or one of
//! the transport conveniences ([`Logger::to_file`], [`Logger::to_pipe`],
//! [`Logger::to_broadcast`]). Producers call [`Logger::send`], which enqueues
//! onto a bounded queue and reports a full queue as a failed (dropped) send
//! rather than blocking. The consumer thread applies the [`FlagSet`] options
//! to each record: timestamps in full or short form, a gapless output
//! sequence number, a single-character code identifying the producing thread,
//! and inbound/outbound direction markers.
//!
//! File-backed engines rotate on demand: backups are numbered `<path>.1`
//! through `<path>.N` with backup 1 the most recent, optionally gzipped.
//! Append-mode logfiles are only rotated when forced.
//!
//! A process-wide instance is available through [`GlobalLogger`] and the
//! [`glog!`] macro; configure its path before the first log call.

#[macro_use]
mod macros;

mod errors;
mod flags;
mod format;
mod global;
mod logger;
mod outputs;
mod queue;
mod record;
mod stream;
mod threadcode;
mod traits;

pub use errors::*;
pub use flags::*;
pub use global::*;
pub use logger::*;
pub use outputs::*;
pub use record::*;
pub use stream::*;
pub use threadcode::*;
pub use traits::*;

#[cfg(feature = "metrics")]
mod metrics;

/// Backups retained by default when rotating a logfile.
pub const ROTATION_DEFAULT: u32 = 5;

/// Ceiling on retained backups, regardless of the requested count.
pub const MAX_ROTATION: u32 = 64;
