use thiserror::Error;

/// Errors surfaced at sink construction and rotation time.
///
/// None of these are fatal to an engine that is already running: a degraded
/// sink keeps the consumer thread alive and `send` keeps accepting records.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to open the logfile")]
    Open(#[source] std::io::Error),
    #[error("logfile rotation failed")]
    Rotate(#[source] std::io::Error),
    #[error("unable to spawn the pipe command")]
    Spawn(#[source] std::io::Error),
    #[error("unable to construct the broadcast socket")]
    Socket(#[source] std::io::Error),
}
