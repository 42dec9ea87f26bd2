//! The command execution seam and its production implementation.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::{ExecError, Result};

/// Runs an external command and returns its captured stdout.
///
/// This is the only way gtk-titlebar touches the outside world. Production
/// code uses [`SystemRunner`]; tests use the scripted runners in
/// [`crate::scripted`].
pub trait CommandRunner: Send + Sync {
    /// Run `argv` to completion.
    ///
    /// `argv[0]` is the program, the rest are its arguments. Returns the
    /// command's stdout, or an error if it could not be run or exited with a
    /// non-zero status.
    fn run(&self, argv: &[String]) -> Result<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, argv: &[String]) -> Result<String> {
        (**self).run(argv)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, argv: &[String]) -> Result<String> {
        (**self).run(argv)
    }
}

/// Build an owned argument vector from anything string-like.
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

/// Render an argument vector for logs and error messages.
pub fn display_command(argv: &[String]) -> String {
    argv.join(" ")
}

/// Check whether `tool` can be resolved to an executable.
///
/// Accepts bare names (looked up on `PATH`) as well as paths.
pub fn tool_available(tool: &str) -> bool {
    which::which(tool).is_ok()
}

/// Runs commands as real child processes.
///
/// The program is spawned directly (no shell), stdin is closed, and stdout and
/// stderr are captured. Each child is bounded by a timeout; on expiry it is
/// killed and [`ExecError::Timeout`] is returned.
///
/// # Notes
///
/// Stdout and stderr are drained on helper threads while the child runs, so
/// large outputs cannot stall it. Both are buffered in memory.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Timeout applied by [`SystemRunner::new`].
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self {
            timeout: Some(Self::DEFAULT_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wait for children indefinitely.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String]) -> Result<String> {
        let (program, args) = argv.split_first().ok_or(ExecError::EmptyCommand)?;
        let command = display_command(argv);
        tracing::debug!(command = %command, "running command");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ExecError::NotFound(program.clone()),
                _ => ExecError::io(&command, e),
            })?;

        // Drain both pipes while waiting so a chatty child never blocks on a
        // full pipe buffer.
        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let status = match self.timeout {
            Some(duration) => match child
                .wait_timeout(duration)
                .map_err(|e| ExecError::io(&command, e))?
            {
                Some(status) => status,
                None => {
                    child.kill().map_err(|e| ExecError::io(&command, e))?;
                    // Reap the killed child so it does not linger as a zombie.
                    // The reader threads are left to finish on their own; a
                    // grandchild may still hold the pipes open.
                    let _ = child.wait();
                    return Err(ExecError::Timeout(command, duration));
                }
            },
            None => child.wait().map_err(|e| ExecError::io(&command, e))?,
        };

        let stdout = collect(stdout_reader).map_err(|e| ExecError::io(&command, e))?;

        if !status.success() {
            let stderr = collect(stderr_reader).unwrap_or_default();
            return Err(ExecError::CommandFailed {
                command,
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8(stdout)?)
    }
}

/// Read a pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match reader {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("pipe reader panicked"))),
        None => Ok(Vec::new()),
    }
}
