use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::format::format_record;
use crate::queue::{handoff, LogReceiver, LogSender, DEFAULT_QUEUE_CAPACITY};
use crate::{
    BroadcastOutput, Error, FileOutput, Flag, FlagSet, LogRecord, LogStream, Output, PipeOutput,
    Stdout, ThreadCodeRegistry, TAG_INBOUND, TAG_OUTBOUND,
};

#[cfg(feature = "metrics")]
use crate::metrics::*;

/// Lines written between flushes when the `Buffer` flag is set.
pub const BUFFER_FLUSH_LINES: u64 = 20;

// How often the consumer reclaims codes of terminated producer threads.
const PURGE_LINES: u64 = 1024;

struct Shared {
    flags: AtomicU32,
    stopping: AtomicBool,
    output: Mutex<Box<dyn Output>>,
    lines: AtomicU64,
    sequence: AtomicU64,
}

impl Shared {
    fn flags(&self) -> FlagSet {
        FlagSet::from_bits(self.flags.load(Ordering::Acquire))
    }
}

/// The asynchronous logging engine.
///
/// Producer threads hand records off through a bounded queue; a dedicated
/// consumer thread owned by the engine formats them and writes them to the
/// output. `send` never blocks and never formats on the calling thread, so
/// producer latency stays independent of output speed.
///
/// ```no_run
/// use fixlog::{Flag, Logger};
///
/// let logger = Logger::to_file("session.log", Flag::Timestamp | Flag::Sequence, 5).unwrap();
/// logger.send("20=0 logon accepted");
/// logger.stop();
/// ```
pub struct Logger {
    shared: Arc<Shared>,
    tx: LogSender,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// Constructs a [`Logger`]: flags, queue capacity, and the output it writes
/// to. Without an explicit output the engine logs to stdout.
pub struct Builder {
    flags: FlagSet,
    capacity: usize,
    output: Option<Box<dyn Output>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            flags: FlagSet::none(),
            capacity: DEFAULT_QUEUE_CAPACITY,
            output: None,
        }
    }

    /// Set the flag set the engine starts with.
    pub fn flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    /// Bound the hand-off queue. When the queue is full, `send` fails rather
    /// than blocking the producer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the output the consumer thread writes to.
    pub fn output(mut self, output: Box<dyn Output>) -> Self {
        self.output = Some(output);
        self
    }

    /// Consume the builder, spawn the consumer thread, and return the running
    /// engine.
    pub fn build(self) -> Logger {
        let output = self.output.unwrap_or_else(|| Box::new(Stdout::new()));
        let (tx, rx) = handoff(self.capacity);
        let shared = Arc::new(Shared {
            flags: AtomicU32::new(self.flags.bits()),
            stopping: AtomicBool::new(false),
            output: Mutex::new(output),
            lines: AtomicU64::new(0),
            sequence: AtomicU64::new(0),
        });

        let consumer = shared.clone();
        let handle = std::thread::Builder::new()
            .name("fixlog".to_string())
            .spawn(move || consume(rx, consumer))
            .expect("failed to spawn log consumer thread");

        Logger {
            shared,
            tx,
            handle: Mutex::new(Some(handle)),
        }
    }
}

impl Logger {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// A logger writing to `pathname` with numbered rotation, retaining
    /// `rotations` backups.
    pub fn to_file<P: AsRef<Path>>(
        pathname: P,
        flags: FlagSet,
        rotations: u32,
    ) -> Result<Logger, Error> {
        let output = FileOutput::open(
            pathname,
            rotations,
            flags.has(Flag::Append),
            flags.has(Flag::Compress),
        )?;
        Ok(Self::builder()
            .flags(flags)
            .output(Box::new(output))
            .build())
    }

    /// A logger writing to the standard input of `command`, spawned through
    /// the shell.
    pub fn to_pipe(command: &str, flags: FlagSet) -> Result<Logger, Error> {
        let output = PipeOutput::spawn(command)?;
        Ok(Self::builder()
            .flags(flags | Flag::Pipe)
            .output(Box::new(output))
            .build())
    }

    /// A logger broadcasting each line as a UDP datagram to `addr`.
    pub fn to_broadcast<A: std::net::ToSocketAddrs>(
        addr: A,
        flags: FlagSet,
    ) -> Result<Logger, Error> {
        let output = BroadcastOutput::connect(addr)?;
        Ok(Self::builder()
            .flags(flags | Flag::Broadcast)
            .output(Box::new(output))
            .build())
    }

    /// Submit a line for logging. Returns false when the queue is full and the
    /// record was dropped. Never blocks.
    pub fn send<T: Into<String>>(&self, text: T) -> bool {
        self.send_tagged(text, 0)
    }

    /// Submit a line with a numeric tag, used for direction marking and
    /// inbound/outbound filtering.
    pub fn send_tagged<T: Into<String>>(&self, text: T, tag: u32) -> bool {
        metrics! {
            LOG_SEND.increment();
        }
        let accepted = self.tx.try_push(LogRecord::new(text.into(), tag));
        if !accepted {
            metrics! {
                LOG_DROP.increment();
            }
        }
        accepted
    }

    /// A scoped stream that submits its buffered text as a single record when
    /// it goes out of scope.
    pub fn stream(&self) -> LogStream<'_> {
        LogStream::new(self, 0)
    }

    /// Like [`stream`](Self::stream) with a record tag.
    pub fn stream_tagged(&self, tag: u32) -> LogStream<'_> {
        LogStream::new(self, tag)
    }

    /// Replace the engine's flag set. Takes effect for records formatted after
    /// the call.
    pub fn set_flags(&self, flags: FlagSet) {
        self.shared.flags.store(flags.bits(), Ordering::Release);
    }

    pub fn flags(&self) -> FlagSet {
        self.shared.flags()
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags().has(flag)
    }

    /// Lines written to the output since construction or the last successful
    /// rotation.
    pub fn lines(&self) -> u64 {
        self.shared.lines.load(Ordering::Acquire)
    }

    /// Records written so far; the sequence number of the most recent line.
    pub fn sequence(&self) -> u64 {
        self.shared.sequence.load(Ordering::Acquire)
    }

    /// Force buffered bytes down to the output. Callable from any thread;
    /// serialized against in-progress consumer writes.
    pub fn flush(&self) {
        metrics! {
            LOG_FLUSH.increment();
        }
        if let Err(e) = self.shared.output.lock().flush() {
            metrics! {
                LOG_FLUSH_EX.increment();
            }
            log::warn!("log flush failed: {e}");
        }
    }

    /// Rotate the output if it supports rotation. Append-mode logfiles only
    /// rotate when `force` is true; non-file outputs succeed without effect.
    pub fn rotate(&self, force: bool) -> Result<(), Error> {
        metrics! {
            LOG_ROTATE.increment();
        }
        let result = self.shared.output.lock().rotate(force);
        match &result {
            Ok(()) => self.shared.lines.store(0, Ordering::Release),
            Err(e) => {
                metrics! {
                    LOG_ROTATE_EX.increment();
                }
                log::error!("log rotation failed: {e}");
            }
        }
        result
    }

    /// Stop the engine: wake the consumer, drain everything already queued,
    /// flush, and join the thread. Idempotent and callable from any thread.
    pub fn stop(&self) {
        self.shared.stopping.store(true, Ordering::Release);
        // wake a consumer parked in the blocking pop; a full queue already
        // guarantees it is awake
        let _ = self.tx.try_push(LogRecord::wakeup());
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

fn consume(rx: LogReceiver, shared: Arc<Shared>) {
    let mut codes = ThreadCodeRegistry::new();
    let mut line: Vec<u8> = Vec::with_capacity(256);

    loop {
        let record = if shared.stopping.load(Ordering::Acquire) {
            // drain without blocking once shutdown is requested
            match rx.try_pop() {
                Some(record) => record,
                None => break,
            }
        } else {
            match rx.pop_blocking() {
                Some(record) => record,
                None => break,
            }
        };

        if record.is_wakeup() {
            continue;
        }

        let flags = shared.flags();

        if flags.has(Flag::Inbound) && record.tag() != TAG_INBOUND {
            continue;
        }
        if flags.has(Flag::Outbound) && record.tag() != TAG_OUTBOUND {
            continue;
        }

        let sequence = shared.sequence.fetch_add(1, Ordering::AcqRel) + 1;
        let code = if flags.has(Flag::ThreadCode) {
            Some(codes.code_for(record.thread(), record.alive()))
        } else {
            None
        };

        line.clear();
        if let Err(e) = format_record(&mut line, flags, sequence, code, &record) {
            log::error!("log record formatting failed: {e}");
            continue;
        }

        let mut output = shared.output.lock();
        match output.write(&line) {
            Ok(()) => {
                metrics! {
                    LOG_WRITE.increment();
                    LOG_WRITE_BYTE.add(line.len() as u64);
                }
            }
            Err(e) => {
                metrics! {
                    LOG_WRITE_EX.increment();
                }
                log::error!("log write failed: {e}");
            }
        }

        let lines = shared.lines.fetch_add(1, Ordering::AcqRel) + 1;
        if lines % PURGE_LINES == 0 {
            codes.purge();
        }
        if !flags.has(Flag::Buffer) || lines % BUFFER_FLUSH_LINES == 0 {
            if let Err(e) = output.flush() {
                metrics! {
                    LOG_FLUSH_EX.increment();
                }
                log::warn!("log flush failed: {e}");
            }
        }
    }

    // nothing queued remains; leave nothing buffered either
    if let Err(e) = shared.output.lock().flush() {
        log::warn!("final log flush failed: {e}");
    }
}
