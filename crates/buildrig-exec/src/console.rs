//! The harness's own console: where echoed command lines and mirrored
//! child output are written.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// One console stream.
#[derive(Debug, Clone)]
enum Stream {
    Stdout,
    Stderr,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

impl Stream {
    fn buffer() -> Self {
        Self::Buffer(Arc::new(Mutex::new(Vec::new())))
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Stdout => {
                let mut handle = io::stdout().lock();
                handle.write_all(buf)?;
                handle.flush()
            }
            Self::Stderr => {
                let mut handle = io::stderr().lock();
                handle.write_all(buf)?;
                handle.flush()
            }
            Self::Buffer(bytes) => {
                bytes
                    .lock()
                    .map_err(|_| io::Error::other("console buffer lock poisoned"))?
                    .extend_from_slice(buf);
                Ok(())
            }
        }
    }

    fn contents(&self) -> Vec<u8> {
        match self {
            Self::Stdout | Self::Stderr => Vec::new(),
            Self::Buffer(bytes) => bytes.lock().map(|b| b.to_vec()).unwrap_or_default(),
        }
    }
}

/// Output and error streams of the harness console.
///
/// Cloning is cheap; clones of a captured console share their buffers.
#[derive(Debug, Clone)]
pub struct Console {
    out: Stream,
    err: Stream,
}

impl Console {
    /// The process's real stdout and stderr.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            out: Stream::Stdout,
            err: Stream::Stderr,
        }
    }

    /// An in-memory console whose contents can be read back.
    #[must_use]
    pub fn captured() -> Self {
        Self {
            out: Stream::buffer(),
            err: Stream::buffer(),
        }
    }

    /// Writes raw bytes to the output stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream rejects the write.
    pub fn write_out(&self, buf: &[u8]) -> io::Result<()> {
        self.out.write_all(buf)
    }

    /// Writes raw bytes to the error stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream rejects the write.
    pub fn write_err(&self, buf: &[u8]) -> io::Result<()> {
        self.err.write_all(buf)
    }

    /// Writes one line (newline appended) to the output stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream rejects the write.
    pub fn line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.out.write_all(&buf)
    }

    /// Bytes written to a captured output stream (empty for stdio).
    #[must_use]
    pub fn stdout_bytes(&self) -> Vec<u8> {
        self.out.contents()
    }

    /// Bytes written to a captured error stream (empty for stdio).
    #[must_use]
    pub fn stderr_bytes(&self) -> Vec<u8> {
        self.err.contents()
    }

    /// Captured output stream as text.
    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout_bytes()).into_owned()
    }
}

/// [`Write`] adapter over a console's error stream.
pub struct ConsoleErr<'a>(pub &'a Console);

impl Write for ConsoleErr<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_err(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdio()
    }
}
