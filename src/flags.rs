use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// Boolean options controlling how the engine opens its output and annotates
/// each written record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Flag {
    /// Open the logfile in append mode. Append-mode logs are only rotated when
    /// forced.
    Append,
    /// Prefix each line with the full datetime of record capture.
    Timestamp,
    /// Prefix each line with a zero-padded output sequence number.
    Sequence,
    /// Gzip the most recent backup on rotation.
    Compress,
    /// The output is a pipe to an external process.
    Pipe,
    /// The output is a UDP broadcast socket.
    Broadcast,
    /// Annotate each line with the single-character code of the producing
    /// thread.
    ThreadCode,
    /// Annotate each line with an inbound/outbound direction marker taken from
    /// the record tag.
    Direction,
    /// Flush the output every [`BUFFER_FLUSH_LINES`](crate::BUFFER_FLUSH_LINES)
    /// lines instead of after every line.
    Buffer,
    /// Write only records tagged as inbound.
    Inbound,
    /// Write only records tagged as outbound.
    Outbound,
    /// Suppress the trailing line terminator.
    NoEol,
    /// Prefix each line with a short HH:MM:SS.mmm timestamp. `Timestamp` takes
    /// precedence when both are set.
    MiniTimestamp,
}

impl Flag {
    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// A value-semantics set of [`Flag`]s.
///
/// Sets are built up with the `|` operator and stored by the engine as a single
/// word, so they are cheap to copy into the consumer loop for every record.
///
/// ```
/// use fixlog::{Flag, FlagSet};
///
/// let flags = FlagSet::default() | Flag::Timestamp | Flag::Sequence;
/// assert!(flags.has(Flag::Sequence));
/// assert!(!flags.has(Flag::Append));
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    bits: u32,
}

impl FlagSet {
    /// An empty set.
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    /// Returns true if the given flag is set.
    pub const fn has(&self, flag: Flag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Returns a copy of this set with the given flag added.
    pub const fn with(self, flag: Flag) -> Self {
        Self {
            bits: self.bits | flag.bit(),
        }
    }

    /// Returns a copy of this set with the given flag removed.
    pub const fn without(self, flag: Flag) -> Self {
        Self {
            bits: self.bits & !flag.bit(),
        }
    }

    pub(crate) const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    pub(crate) const fn bits(self) -> u32 {
        self.bits
    }
}

impl From<Flag> for FlagSet {
    fn from(flag: Flag) -> Self {
        Self::none().with(flag)
    }
}

impl BitOr<Flag> for FlagSet {
    type Output = FlagSet;

    fn bitor(self, rhs: Flag) -> Self::Output {
        self.with(rhs)
    }
}

impl BitOr<Flag> for Flag {
    type Output = FlagSet;

    fn bitor(self, rhs: Flag) -> Self::Output {
        FlagSet::from(self).with(rhs)
    }
}

impl BitOr<FlagSet> for FlagSet {
    type Output = FlagSet;

    fn bitor(self, rhs: FlagSet) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign<Flag> for FlagSet {
    fn bitor_assign(&mut self, rhs: Flag) {
        self.bits |= rhs.bit();
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlagSet({:#015b})", self.bits)
    }
}
