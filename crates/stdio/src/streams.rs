//! Rebinding the process's standard streams to redirect writers

use crate::{AutoFlushWriter, Result};

/// One of the two standard output streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardStream {
    /// File descriptor 1
    Stdout,
    /// File descriptor 2
    Stderr,
}

impl StandardStream {
    /// Lower-case stream name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl std::fmt::Display for StandardStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Where the redirect writers built by [`crate::initialize`] are installed.
///
/// [`ProcessStreams`] swaps the real descriptors; [`HeldStreams`] just keeps
/// the writers for the caller.
pub trait StreamTargets {
    /// Replace both standard streams.
    ///
    /// Either both are replaced or, on error, the previous streams remain in
    /// effect.
    fn replace(&mut self, stdout: AutoFlushWriter, stderr: AutoFlushWriter) -> Result<()>;
}

/// Targets that hold on to the writers instead of touching the process
#[derive(Debug, Default)]
pub struct HeldStreams {
    stdout: Option<AutoFlushWriter>,
    stderr: Option<AutoFlushWriter>,
}

impl HeldStreams {
    /// Nothing held yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The installed stdout writer
    pub fn stdout(&mut self) -> Option<&mut AutoFlushWriter> {
        self.stdout.as_mut()
    }

    /// The installed stderr writer
    pub fn stderr(&mut self) -> Option<&mut AutoFlushWriter> {
        self.stderr.as_mut()
    }

    /// Drop both writers, flushing whatever they still buffer
    pub fn clear(&mut self) {
        self.stdout = None;
        self.stderr = None;
    }
}

impl StreamTargets for HeldStreams {
    fn replace(&mut self, stdout: AutoFlushWriter, stderr: AutoFlushWriter) -> Result<()> {
        self.stdout = Some(stdout);
        self.stderr = Some(stderr);
        Ok(())
    }
}

/// The process's real file descriptors 1 and 2.
///
/// Each stream is pointed at an OS pipe whose read end is drained by a pump
/// thread into the matching writer, so anything writing to the descriptor
/// (Rust's `print!`, C libraries, child processes that inherit it) ends up
/// in the dispatcher. Dropping this value restores the original descriptors.
#[derive(Debug, Default)]
pub struct ProcessStreams {
    #[cfg(unix)]
    active: Option<unix::Redirected>,
}

impl ProcessStreams {
    /// Targets for the current process; nothing is redirected until
    /// [`StreamTargets::replace`] runs
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a redirection is currently installed
    pub fn is_redirected(&self) -> bool {
        #[cfg(unix)]
        {
            self.active.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Put the original descriptors back and wait until everything captured
    /// so far has been dispatched.
    ///
    /// Blocks while another process still holds an inherited copy of a
    /// redirected descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if a descriptor could not be restored. The
    /// other stream is still restored.
    pub fn restore(&mut self) -> Result<()> {
        #[cfg(unix)]
        {
            match self.active.take() {
                Some(redirected) => redirected.restore(),
                None => Ok(()),
            }
        }
        #[cfg(not(unix))]
        {
            Ok(())
        }
    }
}

impl StreamTargets for ProcessStreams {
    /// Installs the new pipes before the previous ones are torn down, so a
    /// failure leaves the earlier redirection (or the original streams) in
    /// effect.
    #[cfg(unix)]
    fn replace(&mut self, stdout: AutoFlushWriter, stderr: AutoFlushWriter) -> Result<()> {
        match self.active.as_mut() {
            Some(redirected) => redirected.retarget(stdout, stderr),
            None => {
                self.active = Some(unix::Redirected::install(stdout, stderr)?);
                Ok(())
            }
        }
    }

    #[cfg(not(unix))]
    fn replace(&mut self, _stdout: AutoFlushWriter, _stderr: AutoFlushWriter) -> Result<()> {
        Err(crate::Error::Io(
            "redirecting standard streams",
            std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "descriptor redirection needs a unix platform",
            ),
        ))
    }
}

impl Drop for ProcessStreams {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(unix)]
mod unix {
    use super::StandardStream;
    use crate::{AutoFlushWriter, Error, Result};
    use nix::unistd::dup2;
    use std::io::{self, Read, Write};
    use std::os::fd::{AsFd, AsRawFd, OwnedFd, RawFd};
    use std::thread::{self, JoinHandle};
    use tracing::{debug, warn};

    const PUMP_BUFFER: usize = 8 * 1024;

    /// Both standard streams pointed at pipes
    #[derive(Debug)]
    pub(super) struct Redirected {
        stdout: Redirection,
        stderr: Redirection,
    }

    impl Redirected {
        pub(super) fn install(stdout: AutoFlushWriter, stderr: AutoFlushWriter) -> Result<Self> {
            let stdout = Redirection::install(StandardStream::Stdout, stdout)?;
            let stderr = match Redirection::install(StandardStream::Stderr, stderr) {
                Ok(stderr) => stderr,
                Err(e) => {
                    let _ = stdout.restore();
                    return Err(e);
                }
            };
            Ok(Self { stdout, stderr })
        }

        /// Point both streams at new writers, keeping the saved originals.
        /// On error both streams still feed their previous writers.
        pub(super) fn retarget(
            &mut self,
            stdout: AutoFlushWriter,
            stderr: AutoFlushWriter,
        ) -> Result<()> {
            let previous_stdout = self.stdout.retarget(stdout)?;
            if let Err(e) = self.stderr.retarget(stderr) {
                if let Err(rollback) = self.stdout.retarget(previous_stdout) {
                    warn!("could not put back the previous stdout redirection: {rollback}");
                }
                return Err(e);
            }
            Ok(())
        }

        pub(super) fn restore(self) -> Result<()> {
            // Stderr was installed last.
            let stderr = self.stderr.restore();
            let stdout = self.stdout.restore();
            stderr.and(stdout).map(|_| ())
        }
    }

    /// One standard stream pointed at a pipe, plus what is needed to undo it
    #[derive(Debug)]
    struct Redirection {
        stream: StandardStream,
        original: OwnedFd,
        pump: JoinHandle<AutoFlushWriter>,
    }

    impl Redirection {
        fn install(stream: StandardStream, writer: AutoFlushWriter) -> Result<Self> {
            let original =
                duplicate(stream).map_err(|e| Error::Io("saving original stream", e))?;
            let pump = redirect(stream, writer)?;

            debug!("redirected {stream} into the log dispatcher");
            Ok(Self {
                stream,
                original,
                pump,
            })
        }

        /// Swap in a new pipe feeding `writer`. Returns the previous writer
        /// once its pump has drained; on error the current pipe stays.
        fn retarget(&mut self, writer: AutoFlushWriter) -> Result<AutoFlushWriter> {
            let pump = redirect(self.stream, writer)?;
            // The old pipe lost its last write end to dup2, so its pump stops.
            let previous = std::mem::replace(&mut self.pump, pump);
            join(self.stream, previous)
        }

        fn restore(self) -> Result<AutoFlushWriter> {
            flush_std(self.stream);
            dup2(self.original.as_raw_fd(), raw_fd(self.stream))
                .map_err(|errno| Error::Io("restoring stream", io::Error::from(errno)))?;
            drop(self.original);

            // The descriptor no longer refers to the pipe, so the pump drains
            // what is left and stops.
            let writer = join(self.stream, self.pump)?;
            debug!("restored {}", self.stream);
            Ok(writer)
        }
    }

    /// Point `stream` at a fresh pipe drained into `writer`. The descriptor is
    /// only touched once everything else is in place.
    fn redirect(
        stream: StandardStream,
        writer: AutoFlushWriter,
    ) -> Result<JoinHandle<AutoFlushWriter>> {
        let (reader, pipe_writer) =
            os_pipe::pipe().map_err(|e| Error::Io("creating redirect pipe", e))?;

        let pump = thread::Builder::new()
            .name(format!("streamlog-{stream}"))
            .spawn(move || pump(reader, writer))
            .map_err(|e| Error::Io("spawning redirect pump", e))?;

        flush_std(stream);
        if let Err(errno) = dup2(pipe_writer.as_raw_fd(), raw_fd(stream)) {
            // Closing our write end lets the pump see EOF and exit.
            drop(pipe_writer);
            let _ = pump.join();
            return Err(Error::Io("redirecting stream", io::Error::from(errno)));
        }
        Ok(pump)
    }

    fn join(stream: StandardStream, pump: JoinHandle<AutoFlushWriter>) -> Result<AutoFlushWriter> {
        pump.join().map_err(|_| {
            Error::Io(
                "joining redirect pump",
                io::Error::other(format!("{stream} pump panicked")),
            )
        })
    }

    fn duplicate(stream: StandardStream) -> io::Result<OwnedFd> {
        match stream {
            StandardStream::Stdout => io::stdout().as_fd().try_clone_to_owned(),
            StandardStream::Stderr => io::stderr().as_fd().try_clone_to_owned(),
        }
    }

    fn raw_fd(stream: StandardStream) -> RawFd {
        match stream {
            StandardStream::Stdout => io::stdout().as_raw_fd(),
            StandardStream::Stderr => io::stderr().as_raw_fd(),
        }
    }

    fn flush_std(stream: StandardStream) {
        let _ = match stream {
            StandardStream::Stdout => io::stdout().flush(),
            StandardStream::Stderr => io::stderr().flush(),
        };
    }

    fn pump(mut reader: os_pipe::PipeReader, mut writer: AutoFlushWriter) -> AutoFlushWriter {
        let mut buf = [0u8; PUMP_BUFFER];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let _ = writer.write_all(&buf[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
        let _ = writer.flush();
        writer
    }
}
