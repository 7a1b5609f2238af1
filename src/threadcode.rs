use std::sync::Weak;
use std::thread::ThreadId;

use ahash::{HashMap, HashMapExt};

// The code space: one printable character per live producer thread.
const CODES: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The code handed out once every character is claimed by a live thread.
const EXHAUSTED: char = '?';

struct Entry {
    code: char,
    index: usize,
    alive: Weak<()>,
}

/// Maps producer thread identities to single-character codes for compact line
/// annotation.
///
/// A code is unique among live threads. Codes belonging to threads that have
/// terminated are reclaimed by [`purge`](Self::purge) and may be reused. The
/// registry is owned by the consumer thread, so it needs no synchronization of
/// its own.
pub struct ThreadCodeRegistry {
    codes: HashMap<ThreadId, Entry>,
    // one bit per entry in CODES
    in_use: u64,
}

impl Default for ThreadCodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadCodeRegistry {
    pub fn new() -> Self {
        Self {
            codes: HashMap::new(),
            in_use: 0,
        }
    }

    /// Look up the code for a thread, allocating one on first sight.
    ///
    /// The `alive` handle comes from the record and dangles once the producing
    /// thread has exited. When the code space is exhausted the registry purges
    /// dead threads and retries before falling back to `'?'`.
    pub fn code_for(&mut self, thread: ThreadId, alive: &Weak<()>) -> char {
        if let Some(entry) = self.codes.get(&thread) {
            return entry.code;
        }

        match self.free_index().or_else(|| {
            self.purge();
            self.free_index()
        }) {
            Some(index) => {
                let code = CODES[index] as char;
                self.in_use |= 1 << index;
                self.codes.insert(
                    thread,
                    Entry {
                        code,
                        index,
                        alive: alive.clone(),
                    },
                );
                code
            }
            None => EXHAUSTED,
        }
    }

    /// Reclaim the codes of threads that have since terminated, making them
    /// available for reuse. Codes of still-live threads are untouched.
    pub fn purge(&mut self) {
        let in_use = &mut self.in_use;
        self.codes.retain(|_, entry| {
            if entry.alive.strong_count() == 0 {
                *in_use &= !(1 << entry.index);
                false
            } else {
                true
            }
        });
    }

    /// The number of threads currently holding a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn free_index(&self) -> Option<usize> {
        (0..CODES.len()).find(|index| self.in_use & (1 << index) == 0)
    }
}
