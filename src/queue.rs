use crossbeam_channel::{bounded, Receiver, Sender};

use crate::LogRecord;

/// Default capacity of the hand-off queue.
pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Create the bounded hand-off between producer threads and the consumer.
///
/// Producers only ever hold the sending half, so nothing they do can touch the
/// consumer's state. A full queue is a backpressure signal: the push fails
/// immediately and the caller treats the record as dropped.
pub(crate) fn handoff(capacity: usize) -> (LogSender, LogReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    (LogSender { tx }, LogReceiver { rx })
}

#[derive(Clone)]
pub(crate) struct LogSender {
    tx: Sender<LogRecord>,
}

impl LogSender {
    /// Non-blocking bounded push. Returns false when the queue is at capacity
    /// or the consumer is gone.
    pub(crate) fn try_push(&self, record: LogRecord) -> bool {
        self.tx.try_send(record).is_ok()
    }
}

pub(crate) struct LogReceiver {
    rx: Receiver<LogRecord>,
}

impl LogReceiver {
    /// Block until a record is available. Returns `None` once every sender has
    /// been dropped and the queue is drained.
    pub(crate) fn pop_blocking(&self) -> Option<LogRecord> {
        self.rx.recv().ok()
    }

    /// Non-blocking pop, used while draining during shutdown.
    pub(crate) fn try_pop(&self) -> Option<LogRecord> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> LogRecord {
        LogRecord::new(text.to_string(), 0)
    }

    #[test]
    fn push_fails_at_capacity() {
        let (tx, rx) = handoff(2);

        assert!(tx.try_push(record("a")));
        assert!(tx.try_push(record("b")));
        // capacity 2: the third push is rejected, not blocked
        assert!(!tx.try_push(record("c")));

        assert_eq!(rx.try_pop().map(|r| r.text().to_string()).as_deref(), Some("a"));
        // space freed, pushes succeed again
        assert!(tx.try_push(record("d")));
        assert!(!tx.try_push(record("e")));
    }

    #[test]
    fn pops_in_push_order() {
        let (tx, rx) = handoff(8);
        for text in ["one", "two", "three"] {
            assert!(tx.try_push(record(text)));
        }
        assert_eq!(rx.pop_blocking().map(|r| r.text().to_string()).as_deref(), Some("one"));
        assert_eq!(rx.pop_blocking().map(|r| r.text().to_string()).as_deref(), Some("two"));
        assert_eq!(rx.pop_blocking().map(|r| r.text().to_string()).as_deref(), Some("three"));
    }

    #[test]
    fn pop_returns_none_once_closed() {
        let (tx, rx) = handoff(2);
        assert!(tx.try_push(record("last")));
        drop(tx);
        assert!(rx.pop_blocking().is_some());
        assert!(rx.pop_blocking().is_none());
        assert!(rx.try_pop().is_none());
    }

    #[test]
    fn concurrent_pushes_never_exceed_capacity() {
        let (tx, rx) = handoff(2);

        let handles: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|text| {
                let tx = tx.clone();
                std::thread::spawn(move || tx.try_push(record(text)))
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        // exactly one of the three concurrent pushes is rejected
        assert_eq!(accepted, 2);

        let mut drained = Vec::new();
        while let Some(r) = rx.try_pop() {
            drained.push(r.text().to_string());
        }
        assert_eq!(drained.len(), 2);
    }
}
