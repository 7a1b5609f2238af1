use std::io::Write;

use clocksource::datetime::DateTime;
use clocksource::precise::UnixInstant;

use crate::{Flag, FlagSet, LogRecord, TAG_INBOUND, TAG_OUTBOUND};

/// Render one record into `w` according to the flag set, in fixed order:
/// timestamp, sequence number, thread code, direction marker, payload, line
/// terminator.
///
/// The thread code is resolved by the caller so that the registry stays owned
/// by the consumer loop.
pub(crate) fn format_record(
    w: &mut dyn Write,
    flags: FlagSet,
    sequence: u64,
    code: Option<char>,
    record: &LogRecord,
) -> Result<(), std::io::Error> {
    if flags.has(Flag::Timestamp) {
        write!(w, "{} ", DateTime::from(record.when()))?;
    } else if flags.has(Flag::MiniTimestamp) {
        write_mini_timestamp(w, record.when())?;
    }

    if flags.has(Flag::Sequence) {
        write!(w, "{:07} ", sequence)?;
    }

    if let Some(code) = code {
        write!(w, "{} ", code)?;
    }

    if flags.has(Flag::Direction) {
        write!(w, "{} ", direction_marker(record.tag()))?;
    }

    w.write_all(record.text().as_bytes())?;

    if !flags.has(Flag::NoEol) {
        w.write_all(b"\n")?;
    }

    Ok(())
}

/// The marker written for the `Direction` flag, derived from the record tag.
fn direction_marker(tag: u32) -> &'static str {
    match tag {
        TAG_INBOUND => " in",
        TAG_OUTBOUND => "out",
        _ => "---",
    }
}

/// Short form timestamp: time of day with millisecond precision.
fn write_mini_timestamp(w: &mut dyn Write, when: UnixInstant) -> Result<(), std::io::Error> {
    let nanos = when.duration_since(UnixInstant::EPOCH).as_nanos();
    let millis = (nanos / 1_000_000) % 1_000;
    let secs = nanos / 1_000_000_000;
    write!(
        w,
        "{:02}:{:02}:{:02}.{:03} ",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
        millis,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, tag: u32) -> LogRecord {
        LogRecord::new(text.to_string(), tag)
    }

    fn formatted(flags: FlagSet, sequence: u64, code: Option<char>, record: &LogRecord) -> String {
        let mut line = Vec::new();
        format_record(&mut line, flags, sequence, code, record).unwrap();
        String::from_utf8(line).unwrap()
    }

    #[test]
    fn plain_payload_with_terminator() {
        let out = formatted(FlagSet::none(), 1, None, &record("logon sent", 0));
        assert_eq!(out, "logon sent\n");
    }

    #[test]
    fn noeol_suppresses_terminator() {
        let out = formatted(FlagSet::from(Flag::NoEol), 1, None, &record("partial", 0));
        assert_eq!(out, "partial");
    }

    #[test]
    fn sequence_is_zero_padded() {
        let out = formatted(FlagSet::from(Flag::Sequence), 42, None, &record("x", 0));
        assert_eq!(out, "0000042 x\n");
    }

    #[test]
    fn thread_code_precedes_direction() {
        let flags = Flag::Sequence | Flag::Direction;
        let out = formatted(flags, 7, Some('a'), &record("35=A", TAG_INBOUND));
        assert_eq!(out, "0000007 a  in 35=A\n");
    }

    #[test]
    fn direction_markers() {
        let flags = FlagSet::from(Flag::Direction);
        assert_eq!(formatted(flags, 1, None, &record("m", TAG_INBOUND)), " in m\n");
        assert_eq!(formatted(flags, 1, None, &record("m", TAG_OUTBOUND)), "out m\n");
        assert_eq!(formatted(flags, 1, None, &record("m", 9)), "--- m\n");
    }

    #[test]
    fn mini_timestamp_is_time_of_day() {
        let mut line = Vec::new();
        // 01:02:03.456 UTC on day two of the epoch
        let when = UnixInstant::EPOCH
            + core::time::Duration::from_millis((86_400 + 3_723) * 1_000 + 456);
        write_mini_timestamp(&mut line, when).unwrap();
        assert_eq!(String::from_utf8(line).unwrap(), "01:02:03.456 ");
    }

    #[test]
    fn full_timestamp_present_when_flagged() {
        let out = formatted(FlagSet::from(Flag::Timestamp), 1, None, &record("x", 0));
        // 2024-01-01T00:00:00.000+00:00 <payload>
        assert!(out.len() > "x\n".len() + 20);
        assert!(out.ends_with(" x\n"));
        assert!(out.contains('T'));
    }

    #[test]
    fn timestamp_wins_over_mini() {
        let flags = Flag::Timestamp | Flag::MiniTimestamp;
        let out = formatted(flags, 1, None, &record("x", 0));
        // the full form alone: two colons in the time, one in the offset
        assert!(out.contains('T'));
        assert_eq!(out.matches(':').count(), 3);
    }
}
