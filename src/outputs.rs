use std::fs::{File, OpenOptions};
use std::io::Write;
use std::net::{ToSocketAddrs, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::{Error, Output, MAX_ROTATION};

/// Writes each record to standard out. The builder's default output.
pub struct Stdout {
    stream: std::io::Stdout,
}

impl Default for Stdout {
    fn default() -> Self {
        Self::new()
    }
}

impl Stdout {
    pub fn new() -> Self {
        Self {
            stream: std::io::stdout(),
        }
    }
}

impl Output for Stdout {
    fn write(&mut self, buf: &[u8]) -> Result<(), std::io::Error> {
        self.stream.lock().write_all(buf)
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.stream.lock().flush()
    }
}

/// A logfile with numbered rotation.
///
/// The active file is always the unnumbered pathname. Backups live at
/// `<path>.1` through `<path>.N` with backup 1 the most recent rotation, and
/// gain a `.gz` suffix when compression is on. `N` is capped at
/// [`MAX_ROTATION`] regardless of the requested count.
pub struct FileOutput {
    file: Option<File>,
    pathname: PathBuf,
    rotations: u32,
    append: bool,
    compress: bool,
}

impl FileOutput {
    /// Open the active logfile, creating it if needed. Append mode preserves
    /// existing content and exempts the file from unforced rotation.
    pub fn open<P: AsRef<Path>>(
        pathname: P,
        rotations: u32,
        append: bool,
        compress: bool,
    ) -> Result<Self, Error> {
        let pathname = pathname.as_ref().to_path_buf();
        let file = open_active(&pathname, append).map_err(Error::Open)?;
        Ok(Self {
            file: Some(file),
            pathname,
            rotations: rotations.clamp(1, MAX_ROTATION),
            append,
            compress,
        })
    }

    fn backup_path(&self, n: u32) -> PathBuf {
        let mut path = self.pathname.clone().into_os_string();
        path.push(format!(".{n}"));
        if self.compress {
            path.push(".gz");
        }
        path.into()
    }

    fn reopen(&mut self, fresh: bool) -> Result<(), std::io::Error> {
        // after a failed shuffle the active file still holds records, so it
        // must never be truncated
        let append = self.append || !fresh;
        self.file = Some(open_active(&self.pathname, append)?);
        Ok(())
    }
}

impl Output for FileOutput {
    fn write(&mut self, buf: &[u8]) -> Result<(), std::io::Error> {
        match self.file.as_mut() {
            Some(file) => file.write_all(buf),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "no active logfile",
            )),
        }
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Shift `<path>.N` to `<path>.N+1` (dropping the backup past the retained
    /// count), move the active file to `<path>.1`, and reopen a fresh active
    /// file. Append-mode files only rotate when forced.
    fn rotate(&mut self, force: bool) -> Result<(), Error> {
        if self.append && !force {
            return Ok(());
        }

        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        // vacate the oldest slot so no rename lands on an existing file
        let oldest = self.backup_path(self.rotations);
        if oldest.exists() {
            let _ = std::fs::remove_file(&oldest);
        }

        for n in (1..self.rotations).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                let _ = std::fs::rename(&from, self.backup_path(n + 1));
            }
        }

        let shuffled = if self.compress {
            compress_backup(&self.pathname, &self.backup_path(1))
        } else {
            std::fs::rename(&self.pathname, self.backup_path(1))
        };

        match shuffled {
            Ok(()) => {
                self.reopen(true).map_err(Error::Rotate)?;
                Ok(())
            }
            Err(e) => {
                // the active file still holds its records, keep writing to it
                let _ = self.reopen(false);
                Err(Error::Rotate(e))
            }
        }
    }
}

fn open_active(pathname: &Path, append: bool) -> Result<File, std::io::Error> {
    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    options.open(pathname)
}

fn compress_backup(src: &Path, dst: &Path) -> Result<(), std::io::Error> {
    let mut input = File::open(src)?;
    let mut encoder = GzEncoder::new(File::create(dst)?, Compression::default());
    std::io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    std::fs::remove_file(src)
}

/// Writes records to the standard input of a spawned command.
///
/// Dropping the output closes the subprocess's input and waits for it to exit.
pub struct PipeOutput {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl PipeOutput {
    /// Spawn `command` through the shell and attach to its standard input.
    pub fn spawn(command: &str) -> Result<Self, Error> {
        let mut child = shell(command)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(Error::Spawn)?;
        let stdin = child.stdin.take();
        Ok(Self { child, stdin })
    }
}

impl Output for PipeOutput {
    fn write(&mut self, buf: &[u8]) -> Result<(), std::io::Error> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.write_all(buf),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "pipe input closed",
            )),
        }
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PipeOutput {
    fn drop(&mut self) {
        drop(self.stdin.take());
        let _ = self.child.wait();
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Writes each record as one UDP datagram to a fixed endpoint.
pub struct BroadcastOutput {
    socket: UdpSocket,
}

impl BroadcastOutput {
    /// Bind an ephemeral broadcast-enabled socket and connect it to `addr`.
    /// Construction failure is the caller's to observe; nothing is deferred to
    /// the consumer thread.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, Error> {
        let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(Error::Socket)?;
        socket.set_broadcast(true).map_err(Error::Socket)?;
        socket.connect(addr).map_err(Error::Socket)?;
        Ok(Self { socket })
    }
}

impl Output for BroadcastOutput {
    fn write(&mut self, buf: &[u8]) -> Result<(), std::io::Error> {
        self.socket.send(buf).map(|_| ())
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        Ok(())
    }
}
