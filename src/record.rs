use std::sync::{Arc, Weak};
use std::thread::ThreadId;

use clocksource::precise::UnixInstant;

/// Record tag marking a line as inbound protocol traffic.
pub const TAG_INBOUND: u32 = 1;

/// Record tag marking a line as outbound protocol traffic.
pub const TAG_OUTBOUND: u32 = 2;

thread_local! {
    // Dropped when the owning thread exits, which lets the thread code
    // registry observe producer termination through the weak handles carried
    // by records.
    static ALIVE: Arc<()> = Arc::new(());
}

pub(crate) fn current_thread() -> (ThreadId, Weak<()>) {
    (std::thread::current().id(), ALIVE.with(Arc::downgrade))
}

/// One queued message: the producing thread's identity, the payload text, an
/// optional numeric tag, and the capture timestamp.
///
/// Records are immutable once enqueued. A record with empty text is the
/// consumer wake-up sentinel and is never formatted or written.
pub struct LogRecord {
    thread: ThreadId,
    alive: Weak<()>,
    text: String,
    tag: u32,
    when: UnixInstant,
}

impl LogRecord {
    pub(crate) fn new(text: String, tag: u32) -> Self {
        let (thread, alive) = current_thread();
        Self {
            thread,
            alive,
            text,
            tag,
            when: UnixInstant::now(),
        }
    }

    pub(crate) fn wakeup() -> Self {
        Self::new(String::new(), 0)
    }

    pub(crate) fn is_wakeup(&self) -> bool {
        self.text.is_empty()
    }

    /// The identity of the thread that submitted this record.
    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub(crate) fn alive(&self) -> &Weak<()> {
        &self.alive
    }

    /// The payload text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The numeric tag supplied at submission, zero if none was given.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// The instant the record was captured on the producing thread.
    pub fn when(&self) -> UnixInstant {
        self.when
    }
}
