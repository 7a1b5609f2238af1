use core::fmt;

use crate::Logger;

/// A scoped stream for composing one log line at a call site.
///
/// Text inserted with `write!` is buffered locally and submitted as a single
/// `send` when the stream goes out of scope, so a multi-part line is never
/// interleaved with other producers. A stream that was never written to
/// submits nothing.
///
/// ```no_run
/// use std::fmt::Write;
/// use fixlog::Logger;
///
/// let logger = Logger::builder().build();
/// {
///     let mut line = logger.stream();
///     let _ = write!(line, "35=D order {} qty {}", "AAPL", 100);
/// } // submitted here
/// ```
pub struct LogStream<'a> {
    logger: &'a Logger,
    buffer: String,
    tag: u32,
}

impl<'a> LogStream<'a> {
    pub(crate) fn new(logger: &'a Logger, tag: u32) -> Self {
        Self {
            logger,
            buffer: String::new(),
            tag,
        }
    }
}

impl fmt::Write for LogStream<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

impl Drop for LogStream<'_> {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            let _ = self
                .logger
                .send_tagged(core::mem::take(&mut self.buffer), self.tag);
        }
    }
}
