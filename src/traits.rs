use crate::Error;

/// A byte sink the consumer thread writes formatted records into.
///
/// The engine writes one formatted record per `write` call, so datagram-style
/// outputs map each call to one payload. Rotation is meaningful only for
/// file-backed outputs; every other variant reports success without effect.
pub trait Output: Send {
    /// Write one formatted record.
    fn write(&mut self, buf: &[u8]) -> Result<(), std::io::Error>;

    /// Push any buffered bytes down to the underlying target.
    fn flush(&mut self) -> Result<(), std::io::Error>;

    /// Rotate the underlying target, if rotation applies to it.
    fn rotate(&mut self, _force: bool) -> Result<(), Error> {
        Ok(())
    }
}
