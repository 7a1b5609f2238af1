use metriken::{metric, Counter};

#[metric(name = "log_send", description = "records submitted to the engine")]
pub static LOG_SEND: Counter = Counter::new();

#[metric(
    name = "log_drop",
    description = "records dropped because the hand-off queue was full"
)]
pub static LOG_DROP: Counter = Counter::new();

#[metric(name = "log_write", description = "records written to the output")]
pub static LOG_WRITE: Counter = Counter::new();

#[metric(name = "log_write_byte", description = "bytes written to the output")]
pub static LOG_WRITE_BYTE: Counter = Counter::new();

#[metric(
    name = "log_write_ex",
    description = "number of exceptions while writing to the output"
)]
pub static LOG_WRITE_EX: Counter = Counter::new();

#[metric(name = "log_flush", description = "number of times the output has been flushed")]
pub static LOG_FLUSH: Counter = Counter::new();

#[metric(
    name = "log_flush_ex",
    description = "number of exceptions while flushing the output"
)]
pub static LOG_FLUSH_EX: Counter = Counter::new();

#[metric(name = "log_rotate", description = "logfile rotations requested")]
pub static LOG_ROTATE: Counter = Counter::new();

#[metric(
    name = "log_rotate_ex",
    description = "number of exceptions while rotating the logfile"
)]
pub static LOG_ROTATE_EX: Counter = Counter::new();
